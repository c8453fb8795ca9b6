use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::blob_ref::BlobRef;

use super::{SchemaBlob, CAMLI_VERSION};

pub const CLAIM_TYPE_SHARE: &str = "share";
/// Possession of the claim's reference is enough to use it
pub const AUTH_TYPE_HAVE_REF: &str = "haveref";

/// Unsigned body of a share claim.
///
/// A transitive share of a directory grants access to everything reachable
/// from it. The claim only becomes valid once a signing service has appended
/// its signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareClaim {
    camli_version: u32,
    auth_type: String,
    camli_signer: BlobRef,
    camli_type: String,
    claim_date: String,
    claim_type: String,
    target: BlobRef,
    transitive: bool,
}

impl SchemaBlob for ShareClaim {
    const CAMLI_TYPE: &'static str = "claim";

    fn camli_type(&self) -> &str {
        &self.camli_type
    }
}

impl ShareClaim {
    /// A transitive `haveref` share of `target`, to be signed by `signer`
    pub fn have_ref(signer: BlobRef, target: BlobRef, date: DateTime<Utc>) -> Self {
        Self {
            camli_version: CAMLI_VERSION,
            auth_type: AUTH_TYPE_HAVE_REF.to_string(),
            camli_signer: signer,
            camli_type: Self::CAMLI_TYPE.to_string(),
            claim_date: date.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            claim_type: CLAIM_TYPE_SHARE.to_string(),
            target,
            transitive: true,
        }
    }

    pub fn signer(&self) -> &BlobRef {
        &self.camli_signer
    }

    pub fn target(&self) -> &BlobRef {
        &self.target
    }

    pub fn auth_type(&self) -> &str {
        &self.auth_type
    }

    pub fn claim_type(&self) -> &str {
        &self.claim_type
    }

    pub fn claim_date(&self) -> &str {
        &self.claim_date
    }

    pub fn is_transitive(&self) -> bool {
        self.transitive
    }
}
