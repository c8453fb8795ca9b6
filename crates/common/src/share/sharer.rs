use crate::blob_ref::BlobRef;
use crate::signing::SigningService;
use crate::storage::BlobStorage;

use super::assemble::{assemble_selection, DEFAULT_MAX_SET_MEMBERS};
use super::claim::issue_share_claim;
use super::error::ShareError;
use super::resolve::{resolve_selection, SelectedItem};
use super::url::share_path;

/// Result of a successful share
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    /// What the claim grants access to
    pub target: BlobRef,
    /// The signed share claim
    pub claim: BlobRef,
    /// Whether the target is shared as a directory
    pub is_dir: bool,
    /// Share URL relative to the server
    pub path: String,
}

/// Turns a selection into a share claim and its URL path.
///
/// One selected item is shared as-is. Several items are first gathered into
///  a fresh directory, which is then shared as a directory whatever the
///  items themselves were.
#[derive(Debug, Clone)]
pub struct Sharer<S, G> {
    storage: S,
    signer: G,
    max_set_members: usize,
}

impl<S: BlobStorage, G: SigningService> Sharer<S, G> {
    pub fn new(storage: S, signer: G) -> Self {
        Self {
            storage,
            signer,
            max_set_members: DEFAULT_MAX_SET_MEMBERS,
        }
    }

    /// Override the static-set member limit
    pub fn with_max_set_members(mut self, max_set_members: usize) -> Self {
        self.max_set_members = max_set_members;
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub async fn share(&self, selection: &[SelectedItem]) -> Result<Share, ShareError> {
        let items = resolve_selection(selection)?;

        let (target, is_dir) = match items.as_slice() {
            [item] => (item.blob_ref.clone(), item.is_dir),
            _ => {
                let refs = items
                    .iter()
                    .map(|item| item.blob_ref.clone())
                    .collect::<Vec<_>>();
                tracing::debug!("gathering {} selected items into a directory", refs.len());
                let dir = assemble_selection(&self.storage, &refs, self.max_set_members).await?;
                (dir, true)
            }
        };

        self.share_target(target, is_dir).await
    }

    /// Issue a claim for an already-known target
    pub async fn share_target(&self, target: BlobRef, is_dir: bool) -> Result<Share, ShareError> {
        let claim = issue_share_claim(&self.storage, &self.signer, &target).await?;
        let share_root = self
            .storage
            .share_root()
            .await
            .map_err(ShareError::ShareRoot)?;
        let path = share_path(&share_root, &claim, &target, is_dir);

        Ok(Share {
            target,
            claim,
            is_dir,
            path,
        })
    }
}
