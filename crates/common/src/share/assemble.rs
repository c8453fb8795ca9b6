use chrono::{DateTime, Utc};
use futures::future::try_join_all;

use crate::blob_ref::BlobRef;
use crate::schema::{Directory, SchemaBlob, StaticSet};
use crate::storage::BlobStorage;

use super::error::ShareError;

/// Largest member count the storage format accepts in one static set
pub const DEFAULT_MAX_SET_MEMBERS: usize = 10_000;
/// Smallest usable limit; with one member per set splitting never converges
pub const MIN_SET_MEMBERS: usize = 2;

const SHARED_DIR_PREFIX: &str = "shared-";
const SHARED_DIR_LAYOUT: &str = "%Y%m%d%H%M%S";

/// Upload `refs` as a static set and return the top-level set's reference.
///
/// If the refs fit in one set, that set is the result. Otherwise they are
///  split into leaf sets of at most `max_members`, and those are grouped
///  under `mergeSets` parents, level by level, until one set remains.
///  Sibling sets on a level are uploaded concurrently; a level is complete
///  before its parents are built.
///
/// Any upload failure aborts the assembly. Sets uploaded before the failure
///  are left in place.
pub async fn assemble_static_set<S: BlobStorage>(
    storage: &S,
    refs: &[BlobRef],
    max_members: usize,
) -> Result<BlobRef, ShareError> {
    let max_members = max_members.max(MIN_SET_MEMBERS);
    let mut level = refs.to_vec();
    let mut leaf = true;

    loop {
        let build = |chunk: Vec<BlobRef>| {
            if leaf {
                StaticSet::with_members(chunk)
            } else {
                StaticSet::with_merge_sets(chunk)
            }
        };

        if level.len() <= max_members {
            let root = upload_schema(storage, &build(level)).await?;
            tracing::debug!("assembled static set {}", root);
            return Ok(root);
        }

        let sets = level
            .chunks(max_members)
            .map(|chunk| build(chunk.to_vec()))
            .collect::<Vec<_>>();
        tracing::debug!(
            "splitting {} refs into {} static sets (leaf: {})",
            level.len(),
            sets.len(),
            leaf
        );

        level = try_join_all(sets.iter().map(|set| upload_schema(storage, set))).await?;
        leaf = false;
    }
}

/// Name for a directory assembled at `at`, e.g. `shared-20240102030405`
pub fn shared_dir_name(at: DateTime<Utc>) -> String {
    format!("{}{}", SHARED_DIR_PREFIX, at.format(SHARED_DIR_LAYOUT))
}

/// Upload a directory named `name` over the static set `entries` and
///  return the directory's reference
pub async fn assemble_directory<S: BlobStorage>(
    storage: &S,
    name: &str,
    entries: BlobRef,
) -> Result<BlobRef, ShareError> {
    let dir = Directory::new(name, entries);
    let dir_ref = upload_schema(storage, &dir).await?;
    tracing::debug!("assembled directory {} ({})", name, dir_ref);
    Ok(dir_ref)
}

/// Build a fresh directory holding `refs`, named after the current time
pub async fn assemble_selection<S: BlobStorage>(
    storage: &S,
    refs: &[BlobRef],
    max_members: usize,
) -> Result<BlobRef, ShareError> {
    let entries = assemble_static_set(storage, refs, max_members).await?;
    assemble_directory(storage, &shared_dir_name(Utc::now()), entries).await
}

pub(crate) async fn upload_schema<S: BlobStorage, B: SchemaBlob>(
    storage: &S,
    blob: &B,
) -> Result<BlobRef, ShareError> {
    let data = blob.encode()?;
    storage.upload(data).await.map_err(ShareError::Assemble)
}
