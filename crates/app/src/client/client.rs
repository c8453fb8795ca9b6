use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{multipart, Client, Response};
use tokio::sync::OnceCell;
use url::Url;

use common::blob_ref::BlobRef;
use common::signing::{SigningError, SigningService};
use common::storage::{BlobStorage, StorageError};

use super::error::ApiError;
use super::{Discovery, UploadResponse, DISCOVERY_CONTENT_TYPE, DISCOVERY_QUERY, UPLOAD_PATH};

/// Client for a blob server.
///
/// The server's discovery document is fetched on first use and cached for
///  the life of the client (and its clones).
#[derive(Debug, Clone)]
pub struct ServerClient {
    pub remote: Url,
    client: Client,
    discovery: Arc<OnceCell<Discovery>>,
}

impl ServerClient {
    pub fn new(remote: &Url, auth_token: Option<&str>) -> Result<Self, ApiError> {
        let mut default_headers = HeaderMap::new();
        if let Some(token) = auth_token {
            default_headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Token {}", token))?,
            );
        }
        let client = Client::builder().default_headers(default_headers).build()?;

        Ok(Self {
            remote: remote.clone(),
            client,
            discovery: Arc::new(OnceCell::new()),
        })
    }

    /// Get the server's discovery document
    pub async fn discovery(&self) -> Result<&Discovery, ApiError> {
        self.discovery
            .get_or_try_init(|| self.fetch_discovery())
            .await
    }

    async fn fetch_discovery(&self) -> Result<Discovery, ApiError> {
        let mut url = self.remote.clone();
        url.query_pairs_mut()
            .append_pair(DISCOVERY_QUERY.0, DISCOVERY_QUERY.1);
        tracing::debug!("fetching discovery from {}", url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, DISCOVERY_CONTENT_TYPE)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Upload one blob, named by the hash of its content
    pub async fn upload_blob(&self, data: Bytes) -> Result<BlobRef, ApiError> {
        let discovery = self.discovery().await?;
        let blob_ref = BlobRef::from_content(&data);
        let url = self.remote.join(&discovery.blob_root)?.join(UPLOAD_PATH)?;

        let part = multipart::Part::bytes(data.to_vec())
            .file_name(blob_ref.to_string())
            .mime_str("application/octet-stream")?;
        let form = multipart::Form::new().part(blob_ref.to_string(), part);

        let response = self.client.post(url).multipart(form).send().await?;
        let response = check_status(response).await?;
        let upload: UploadResponse = response.json().await?;

        if !upload.received.iter().any(|r| r.blob_ref == blob_ref) {
            return Err(ApiError::NotReceived(blob_ref));
        }
        tracing::debug!("uploaded {} ({} bytes)", blob_ref, data.len());
        Ok(blob_ref)
    }

    /// Have the server sign a claim
    pub async fn sign_claim(&self, payload: Bytes) -> Result<Bytes, ApiError> {
        let discovery = self.discovery().await?;
        let signing = discovery.signing.as_ref().ok_or(ApiError::NoSignHandler)?;
        let url = self.remote.join(&signing.sign_handler)?;

        let json = String::from_utf8_lossy(&payload).into_owned();
        let response = self
            .client
            .post(url)
            .form(&[("json", json)])
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.bytes().await?)
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(ApiError::HttpStatus(
            response.status(),
            response.text().await?,
        ))
    }
}

#[async_trait]
impl BlobStorage for ServerClient {
    async fn upload(&self, data: Bytes) -> Result<BlobRef, StorageError> {
        self.upload_blob(data)
            .await
            .map_err(|e| StorageError::Default(e.into()))
    }

    async fn server_identity_ref(&self) -> Result<BlobRef, StorageError> {
        let discovery = self
            .discovery()
            .await
            .map_err(|e| StorageError::Default(e.into()))?;
        discovery
            .signing
            .as_ref()
            .map(|signing| signing.public_key_blob_ref.clone())
            .ok_or(StorageError::NoIdentity)
    }

    async fn share_root(&self) -> Result<String, StorageError> {
        let discovery = self
            .discovery()
            .await
            .map_err(|e| StorageError::Default(e.into()))?;
        discovery
            .share_root
            .clone()
            .filter(|root| !root.is_empty())
            .ok_or(StorageError::NoShareHandler)
    }
}

#[async_trait]
impl SigningService for ServerClient {
    async fn sign(&self, payload: Bytes) -> Result<Bytes, SigningError> {
        self.sign_claim(payload)
            .await
            .map_err(|e| SigningError::Default(e.into()))
    }
}
