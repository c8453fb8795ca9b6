/**
 * Content-hash references to stored blobs
 */
pub mod blob_ref;
/**
 * JSON schema blobs: static sets, directories
 *  and share claims.
 */
pub mod schema;
/**
 * The sharing protocol itself: selection
 *  resolution, set and directory assembly,
 *  claim issue and share URLs.
 */
pub mod share;
/**
 * Claim signing and the local Ed25519 signer
 */
pub mod signing;
/**
 * Blob storage traits and an in-memory store
 */
pub mod storage;

pub mod prelude {
    pub use crate::blob_ref::{BlobRef, BlobRefError};
    pub use crate::schema::{Directory, SchemaBlob, SchemaError, ShareClaim, StaticSet};
    pub use crate::share::{
        SelectedItem, Share, ShareAction, ShareError, ShareNotifier, Sharer, ValidationError,
    };
    pub use crate::signing::{KeySigner, SigningError, SigningService};
    pub use crate::storage::{BlobFetcher, BlobStorage, MemoryStore, StorageError};
}
