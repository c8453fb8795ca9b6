//! Schema blobs
//!
//! Every structured object we store is a small JSON document carrying a
//! `camliVersion` and a `camliType` discriminator:
//!
//! - **[`StaticSet`]**: ordered members, or links to subsets when a set is
//!   too large for one blob
//! - **[`Directory`]**: a named folder whose entries are one static set
//! - **[`ShareClaim`]**: the unsigned body of a transitive `haveref` share
//!
//! Encoding is deterministic (fixed field order), so encoding the same value
//! twice yields the same bytes and therefore the same [`BlobRef`](crate::blob_ref::BlobRef).

mod claim;
mod directory;
mod static_set;

pub use claim::{ShareClaim, AUTH_TYPE_HAVE_REF, CLAIM_TYPE_SHARE};
pub use directory::Directory;
pub use static_set::{flatten_static_set, FlattenError, StaticSet};

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::blob_ref::BlobRef;

/// Schema version written into every blob
pub const CAMLI_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("schema encode error: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("schema decode error: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("unexpected camliType {found:?}, expected {expected:?}")]
    UnexpectedType {
        expected: &'static str,
        found: String,
    },
}

/// A typed JSON schema blob
pub trait SchemaBlob: Serialize + DeserializeOwned {
    /// Value of the `camliType` field for this blob type
    const CAMLI_TYPE: &'static str;

    /// The `camliType` carried by this value
    fn camli_type(&self) -> &str;

    fn encode(&self) -> Result<Bytes, SchemaError> {
        let mut data = serde_json::to_vec_pretty(self).map_err(SchemaError::Encode)?;
        data.push(b'\n');
        Ok(Bytes::from(data))
    }

    fn decode(data: &[u8]) -> Result<Self, SchemaError> {
        let value: Self = serde_json::from_slice(data).map_err(SchemaError::Decode)?;
        if value.camli_type() != Self::CAMLI_TYPE {
            return Err(SchemaError::UnexpectedType {
                expected: Self::CAMLI_TYPE,
                found: value.camli_type().to_string(),
            });
        }
        Ok(value)
    }

    /// Reference the encoded blob will be stored under
    fn blob_ref(&self) -> Result<BlobRef, SchemaError> {
        Ok(BlobRef::from_content(&self.encode()?))
    }
}
