use chrono::Utc;

use crate::blob_ref::BlobRef;
use crate::schema::{SchemaBlob, ShareClaim};
use crate::signing::SigningService;
use crate::storage::BlobStorage;

use super::error::ShareError;

/// Create, sign and upload a transitive `haveref` share claim for `target`,
///  returning the claim's reference.
///
/// The signer is the server's own public key. Identity lookup, signing and
///  upload run in sequence; a failure in any of them ends the issue.
pub async fn issue_share_claim<S: BlobStorage, G: SigningService>(
    storage: &S,
    signer: &G,
    target: &BlobRef,
) -> Result<BlobRef, ShareError> {
    let identity = storage
        .server_identity_ref()
        .await
        .map_err(ShareError::Identity)?;

    let unsigned = ShareClaim::have_ref(identity, target.clone(), Utc::now()).encode()?;
    let signed = signer.sign(unsigned).await?;

    let claim = storage.upload(signed).await.map_err(ShareError::ClaimUpload)?;
    tracing::info!("issued share claim {} for {}", claim, target);
    Ok(claim)
}
