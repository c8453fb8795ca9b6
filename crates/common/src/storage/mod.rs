//! Storage collaborators
//!
//! The sharing core talks to the blob server through two small async traits:
//! [`BlobStorage`] for the write side (uploads plus the two bits of server
//! configuration a share needs) and [`BlobFetcher`] for reading blobs back.
//! [`MemoryStore`] implements both in memory.

mod memory;

pub use memory::MemoryStore;

use std::fmt::Debug;

use async_trait::async_trait;
use bytes::Bytes;

use crate::blob_ref::BlobRef;

/// Share handler path used when a server enables sharing without
///  overriding the path
pub const DEFAULT_SHARE_ROOT: &str = "/share/";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage error: {0}")]
    Default(#[from] anyhow::Error),
    #[error("blob not found: {0}")]
    NotFound(BlobRef),
    #[error("server has no signing identity")]
    NoIdentity,
    #[error("server has no share handler")]
    NoShareHandler,
}

#[async_trait]
pub trait BlobStorage: Send + Sync + Debug + Clone + 'static {
    /// Store a blob and return its reference.
    ///
    /// Uploading a blob that is already present is a no-op that returns
    ///  the same reference.
    async fn upload(&self, data: Bytes) -> Result<BlobRef, StorageError>;

    /// Reference of the server's public key blob, used as claim signer
    async fn server_identity_ref(&self) -> Result<BlobRef, StorageError>;

    /// Base path of the server's share handler, e.g. `/share/`
    async fn share_root(&self) -> Result<String, StorageError>;
}

#[async_trait]
pub trait BlobFetcher: Send + Sync {
    async fn fetch(&self, blob_ref: &BlobRef) -> Result<Bytes, StorageError>;
}
