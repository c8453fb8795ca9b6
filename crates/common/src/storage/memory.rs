use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use anyhow::anyhow;
use async_trait::async_trait;
use bytes::Bytes;

use super::{BlobFetcher, BlobStorage, StorageError, DEFAULT_SHARE_ROOT};
use crate::blob_ref::BlobRef;

/// In-memory blob store
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryStoreInner>>,
}

#[derive(Debug)]
struct MemoryStoreInner {
    /// blob_ref -> content
    blobs: HashMap<BlobRef, Bytes>,
    /// Number of upload calls, including duplicates
    uploads: usize,
    identity: Option<BlobRef>,
    share_root: Option<String>,
}

impl MemoryStore {
    /// A store with the default share handler and no identity
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryStoreInner {
                blobs: HashMap::new(),
                uploads: 0,
                identity: None,
                share_root: Some(DEFAULT_SHARE_ROOT.to_string()),
            })),
        }
    }

    /// Set (or with `None`, disable) the share handler path
    pub fn with_share_root(self, share_root: Option<String>) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            inner.share_root = share_root;
        }
        self
    }

    /// Store the server's public key blob and use it as signing identity
    pub fn with_identity(self, public_key_blob: Bytes) -> Self {
        let identity = BlobRef::from_content(&public_key_blob);
        if let Ok(mut inner) = self.inner.write() {
            inner.blobs.insert(identity.clone(), public_key_blob);
            inner.identity = Some(identity);
        }
        self
    }

    /// Whether a blob is present
    pub fn contains(&self, blob_ref: &BlobRef) -> bool {
        self.inner
            .read()
            .map(|inner| inner.blobs.contains_key(blob_ref))
            .unwrap_or(false)
    }

    /// Number of distinct blobs held
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.blobs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of upload calls served so far
    pub fn upload_count(&self) -> usize {
        self.inner.read().map(|inner| inner.uploads).unwrap_or(0)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Default(anyhow!("failed to acquire memory store lock: {}", e))
}

#[async_trait]
impl BlobStorage for MemoryStore {
    async fn upload(&self, data: Bytes) -> Result<BlobRef, StorageError> {
        let blob_ref = BlobRef::from_content(&data);
        let mut inner = self.inner.write().map_err(lock_error)?;
        inner.uploads += 1;
        inner.blobs.entry(blob_ref.clone()).or_insert(data);
        tracing::debug!("memory store: stored {}", blob_ref);
        Ok(blob_ref)
    }

    async fn server_identity_ref(&self) -> Result<BlobRef, StorageError> {
        let inner = self.inner.read().map_err(lock_error)?;
        inner.identity.clone().ok_or(StorageError::NoIdentity)
    }

    async fn share_root(&self) -> Result<String, StorageError> {
        let inner = self.inner.read().map_err(lock_error)?;
        inner.share_root.clone().ok_or(StorageError::NoShareHandler)
    }
}

#[async_trait]
impl BlobFetcher for MemoryStore {
    async fn fetch(&self, blob_ref: &BlobRef) -> Result<Bytes, StorageError> {
        let inner = self.inner.read().map_err(lock_error)?;
        inner
            .blobs
            .get(blob_ref)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(blob_ref.clone()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn test_upload_is_idempotent() {
        let store = MemoryStore::new();
        let a = store.upload(Bytes::from_static(b"hello")).await.unwrap();
        let b = store.upload(Bytes::from_static(b"hello")).await.unwrap();

        assert_eq!(a, b);
        assert_eq!(a, BlobRef::from_content(b"hello"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.upload_count(), 2);
        assert_eq!(store.fetch(&a).await.unwrap(), Bytes::from_static(b"hello"));
    }

    #[tokio::test]
    async fn test_fetch_missing() {
        let store = MemoryStore::new();
        let missing = BlobRef::from_content(b"missing");
        assert!(matches!(
            store.fetch(&missing).await,
            Err(StorageError::NotFound(r)) if r == missing
        ));
    }

    #[tokio::test]
    async fn test_identity_and_share_root() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.server_identity_ref().await,
            Err(StorageError::NoIdentity)
        ));
        assert_eq!(store.share_root().await.unwrap(), DEFAULT_SHARE_ROOT);

        let store = store
            .with_identity(Bytes::from_static(b"key"))
            .with_share_root(None);
        let identity = store.server_identity_ref().await.unwrap();
        assert!(store.contains(&identity));
        assert!(matches!(
            store.share_root().await,
            Err(StorageError::NoShareHandler)
        ));
    }
}
