mod client;
mod error;

pub use client::ServerClient;
pub use error::ApiError;

use common::blob_ref::BlobRef;
use serde::{Deserialize, Serialize};

/// Accept header that asks the server root for its discovery document
pub const DISCOVERY_CONTENT_TYPE: &str = "text/x-camli-configuration";
/// Query that asks the server root for its discovery document
pub const DISCOVERY_QUERY: (&str, &str) = ("camli.mode", "config");
/// Upload path, relative to the blob root
pub const UPLOAD_PATH: &str = "camli/upload";

/// What a server advertises about itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discovery {
    /// Path of the blob handler, e.g. `/bs/`
    pub blob_root: String,
    /// Path of the share handler; absent when sharing is disabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_root: Option<String>,
    /// Path the web UI is served from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_root: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing: Option<SigningDiscovery>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningDiscovery {
    /// Reference of the server's public key blob
    pub public_key_blob_ref: BlobRef,
    /// Path of the signing handler
    pub sign_handler: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub received: Vec<ReceivedBlob>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedBlob {
    pub blob_ref: BlobRef,
    pub size: u64,
}
