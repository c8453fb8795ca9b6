use crate::schema::SchemaError;
use crate::signing::SigningError;
use crate::storage::StorageError;

/// A selected item could not be turned into a content reference.
///
/// These are reported verbatim to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("nothing selected to share")]
    EmptySelection,
    #[error("cannot share item, it's missing a blobRef")]
    MissingBlobRef,
    #[error("cannot share {0:?}, not a valid blobRef")]
    InvalidBlobRef(String),
    #[error("cannot share item, it's missing isDir")]
    MissingIsDir,
    #[error("invalid boolean value {0:?} for isDir")]
    InvalidIsDir(String),
}

#[derive(Debug, thiserror::Error)]
#[error("could not guess our URL prefix: {ui_root:?} not found in {location:?}")]
pub struct PrefixResolutionError {
    pub location: String,
    pub ui_root: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("could not get signer: {0}")]
    Identity(#[source] StorageError),
    #[error("could not get signed share claim: {0}")]
    Signing(#[from] SigningError),
    #[error("failed creating new directory for selected items: {0}")]
    Assemble(#[source] StorageError),
    #[error("could not upload share claim: {0}")]
    ClaimUpload(#[source] StorageError),
    #[error("could not get share root: {0}")]
    ShareRoot(#[source] StorageError),
    #[error("could not encode schema blob: {0}")]
    Schema(#[from] SchemaError),
    #[error("cannot display full share URL: {0}")]
    PrefixResolution(#[from] PrefixResolutionError),
}
