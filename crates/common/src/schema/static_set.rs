use serde::{Deserialize, Serialize};

use crate::blob_ref::BlobRef;
use crate::storage::{BlobFetcher, StorageError};

use super::{SchemaBlob, SchemaError, CAMLI_VERSION};

/// An ordered, immutable set of references.
///
/// A leaf set lists its `members` directly. When a collection is too large
/// for one blob it is split into subsets, and the parent lists the subsets
/// under `mergeSets`; reading the subsets in link order gives back the
/// original members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticSet {
    camli_version: u32,
    camli_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    members: Vec<BlobRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    merge_sets: Vec<BlobRef>,
}

impl SchemaBlob for StaticSet {
    const CAMLI_TYPE: &'static str = "static-set";

    fn camli_type(&self) -> &str {
        &self.camli_type
    }
}

impl StaticSet {
    /// A leaf set over the given members
    pub fn with_members(members: Vec<BlobRef>) -> Self {
        Self {
            camli_version: CAMLI_VERSION,
            camli_type: Self::CAMLI_TYPE.to_string(),
            members,
            merge_sets: Vec::new(),
        }
    }

    /// A set whose contents are the union, in order, of the given subsets
    pub fn with_merge_sets(merge_sets: Vec<BlobRef>) -> Self {
        Self {
            camli_version: CAMLI_VERSION,
            camli_type: Self::CAMLI_TYPE.to_string(),
            members: Vec::new(),
            merge_sets,
        }
    }

    pub fn members(&self) -> &[BlobRef] {
        &self.members
    }

    pub fn merge_sets(&self) -> &[BlobRef] {
        &self.merge_sets
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FlattenError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
}

/// Walk a static set rooted at `root` and return its leaf members in link
/// order. Direct members of a set come before the contents of its subsets.
pub async fn flatten_static_set<F: BlobFetcher>(
    fetcher: &F,
    root: &BlobRef,
) -> Result<Vec<BlobRef>, FlattenError> {
    let mut members = Vec::new();
    let mut stack = vec![root.clone()];

    while let Some(next) = stack.pop() {
        let data = fetcher.fetch(&next).await?;
        let set = StaticSet::decode(&data)?;
        members.extend(set.members.iter().cloned());
        // reversed so the first subset is popped first
        stack.extend(set.merge_sets.iter().rev().cloned());
    }

    Ok(members)
}
