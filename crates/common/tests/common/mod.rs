//! Shared test utilities for share integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use bytes::Bytes;

use common::blob_ref::BlobRef;
use common::share::Sharer;
use common::signing::KeySigner;
use common::storage::{BlobStorage, MemoryStore, StorageError};

/// Set up a store whose identity is the returned signer, and a sharer over both
pub fn setup_test_env() -> (Sharer<MemoryStore, KeySigner>, MemoryStore, KeySigner) {
    let signer = KeySigner::generate();
    let store = MemoryStore::new().with_identity(signer.public_key_blob());
    let sharer = Sharer::new(store.clone(), signer.clone());
    (sharer, store, signer)
}

/// `n` distinct refs derived from content
pub fn refs(n: usize) -> Vec<BlobRef> {
    (0..n)
        .map(|i| BlobRef::from_content(format!("item-{i}").as_bytes()))
        .collect()
}

/// Memory store that fails every upload after the first `allowed`
#[derive(Debug, Clone)]
pub struct FailingStore {
    pub inner: MemoryStore,
    allowed: usize,
    attempts: Arc<AtomicUsize>,
}

impl FailingStore {
    pub fn new(inner: MemoryStore, allowed: usize) -> Self {
        Self {
            inner,
            allowed,
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl BlobStorage for FailingStore {
    async fn upload(&self, data: Bytes) -> Result<BlobRef, StorageError> {
        if self.attempts.fetch_add(1, Ordering::SeqCst) >= self.allowed {
            return Err(StorageError::Default(anyhow!("connection reset")));
        }
        self.inner.upload(data).await
    }

    async fn server_identity_ref(&self) -> Result<BlobRef, StorageError> {
        self.inner.server_identity_ref().await
    }

    async fn share_root(&self) -> Result<String, StorageError> {
        self.inner.share_root().await
    }
}
