//! ServerClient against an in-process fake blob server

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use bytes::Bytes;
use serde_json::json;
use url::Url;

use blobshare::client::{ApiError, ServerClient};
use common::prelude::*;
use common::signing::{parse_public_key_blob, verify_signed};

const TOKEN: &str = "sekrit";

#[derive(Clone)]
struct FakeServer {
    store: MemoryStore,
    signer: KeySigner,
    share_root: Option<String>,
    token: Option<String>,
    /// Advertise the signing section in discovery
    signing: bool,
    /// Answer uploads with an empty `received` list
    drop_received: bool,
    /// Make the sign handler fail with this status
    sign_failure: Option<StatusCode>,
}

impl FakeServer {
    fn new() -> Self {
        let signer = KeySigner::generate();
        let store = MemoryStore::new().with_identity(signer.public_key_blob());
        Self {
            store,
            signer,
            share_root: Some("/share/".to_string()),
            token: None,
            signing: true,
            drop_received: false,
            sign_failure: None,
        }
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        match &self.token {
            None => true,
            Some(token) => headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(|v| v == format!("Token {}", token))
                .unwrap_or(false),
        }
    }

    async fn spawn(self) -> Url {
        let app = Router::new()
            .route("/", get(discovery))
            .route("/bs/camli/upload", post(upload))
            .route("/sighelper", post(sign))
            .with_state(self);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Url::parse(&format!("http://{}/", addr)).unwrap()
    }
}

async fn discovery(State(server): State<FakeServer>) -> Json<serde_json::Value> {
    let mut doc = json!({
        "blobRoot": "/bs/",
        "uiRoot": "/ui/",
    });
    if server.signing {
        doc["signing"] = json!({
            "publicKeyBlobRef": server.signer.identity().to_string(),
            "signHandler": "/sighelper",
        });
    }
    if let Some(share_root) = &server.share_root {
        doc["shareRoot"] = json!(share_root);
    }
    Json(doc)
}

async fn upload(
    State(server): State<FakeServer>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if !server.authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "bad token").into_response();
    }

    let mut received = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let data = field.bytes().await.unwrap();
        let size = data.len();
        let blob_ref = server.store.upload(data).await.unwrap();
        if blob_ref.to_string() != name {
            return (StatusCode::BAD_REQUEST, "digest mismatch").into_response();
        }
        if !server.drop_received {
            received.push(json!({ "blobRef": blob_ref.to_string(), "size": size }));
        }
    }

    Json(json!({ "received": received })).into_response()
}

async fn sign(
    State(server): State<FakeServer>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    if let Some(status) = server.sign_failure {
        return (status, "signing unavailable").into_response();
    }
    let Some(payload) = form.get("json") else {
        return (StatusCode::BAD_REQUEST, "missing json").into_response();
    };
    match server.signer.sign_payload(payload.as_bytes()) {
        Ok(signed) => signed.into_response(),
        Err(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    }
}

#[tokio::test]
async fn test_discovery() {
    let server = FakeServer::new();
    let identity = server.signer.identity();
    let remote = server.spawn().await;

    let client = ServerClient::new(&remote, None).unwrap();
    let discovery = client.discovery().await.unwrap();
    assert_eq!(discovery.blob_root, "/bs/");
    assert_eq!(discovery.share_root.as_deref(), Some("/share/"));
    assert_eq!(discovery.ui_root.as_deref(), Some("/ui/"));

    assert_eq!(client.server_identity_ref().await.unwrap(), identity);
    assert_eq!(client.share_root().await.unwrap(), "/share/");
}

#[tokio::test]
async fn test_upload_blob() {
    let server = FakeServer::new();
    let store = server.store.clone();
    let remote = server.spawn().await;

    let client = ServerClient::new(&remote, None).unwrap();
    let data = Bytes::from_static(b"hello blob");
    let blob_ref = client.upload_blob(data.clone()).await.unwrap();

    assert_eq!(blob_ref, BlobRef::from_content(&data));
    assert_eq!(store.fetch(&blob_ref).await.unwrap(), data);
}

#[tokio::test]
async fn test_upload_requires_token() {
    let mut server = FakeServer::new();
    server.token = Some(TOKEN.to_string());
    let remote = server.spawn().await;

    let anonymous = ServerClient::new(&remote, None).unwrap();
    let err = anonymous
        .upload_blob(Bytes::from_static(b"x"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::HttpStatus(StatusCode::UNAUTHORIZED, _)));

    let authorized = ServerClient::new(&remote, Some(TOKEN)).unwrap();
    authorized
        .upload_blob(Bytes::from_static(b"x"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_share_single_file() {
    let server = FakeServer::new();
    let store = server.store.clone();
    let key = server.signer.verifying_key();
    let remote = server.spawn().await;

    let client = ServerClient::new(&remote, None).unwrap();
    let sharer = Sharer::new(client.clone(), client);
    let share = sharer
        .share(&[SelectedItem::new("sha1-aaa", false)])
        .await
        .unwrap();

    assert_eq!(
        share.path,
        format!("/share/sha1-aaa?via={}&assemble=1", share.claim)
    );

    let signed = store.fetch(&share.claim).await.unwrap();
    verify_signed(&signed, &key).unwrap();

    let claim = ShareClaim::decode(&signed).unwrap();
    assert_eq!(claim.target().to_string(), "sha1-aaa");

    // The signer named in the claim resolves to the server's key
    let public_key_blob = store.fetch(claim.signer()).await.unwrap();
    assert_eq!(parse_public_key_blob(&public_key_blob).unwrap(), key);
}

#[tokio::test]
async fn test_share_multiple_items() {
    let server = FakeServer::new();
    let store = server.store.clone();
    let remote = server.spawn().await;

    let client = ServerClient::new(&remote, None).unwrap();
    let sharer = Sharer::new(client.clone(), client).with_max_set_members(2);
    let share = sharer
        .share(&[
            SelectedItem::new("sha1-aaa", false),
            SelectedItem::new("sha1-bbb", true),
            SelectedItem::new("sha1-ccc", false),
        ])
        .await
        .unwrap();

    assert!(share.is_dir);
    assert_eq!(share.path, format!("/share/{}", share.claim));

    let dir = Directory::decode(&store.fetch(&share.target).await.unwrap()).unwrap();
    assert!(dir.file_name().starts_with("shared-"));
    let members = common::schema::flatten_static_set(&store, dir.entries())
        .await
        .unwrap();
    let members = members.iter().map(ToString::to_string).collect::<Vec<_>>();
    assert_eq!(members, vec!["sha1-aaa", "sha1-bbb", "sha1-ccc"]);
}

#[tokio::test]
async fn test_share_without_share_handler() {
    let mut server = FakeServer::new();
    server.share_root = None;
    let remote = server.spawn().await;

    let client = ServerClient::new(&remote, None).unwrap();
    let sharer = Sharer::new(client.clone(), client);
    let err = sharer
        .share(&[SelectedItem::new("sha1-aaa", false)])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ShareError::ShareRoot(StorageError::NoShareHandler)
    ));
}

#[tokio::test]
async fn test_discovery_without_signing() {
    let mut server = FakeServer::new();
    server.signing = false;
    let remote = server.spawn().await;

    let client = ServerClient::new(&remote, None).unwrap();
    assert!(matches!(
        client.server_identity_ref().await,
        Err(StorageError::NoIdentity)
    ));

    let err = client.sign_claim(Bytes::from_static(b"{}")).await.unwrap_err();
    assert!(matches!(err, ApiError::NoSignHandler));
    assert!(matches!(
        client.sign(Bytes::from_static(b"{}")).await,
        Err(SigningError::Default(_))
    ));

    let sharer = Sharer::new(client.clone(), client);
    let result = sharer.share(&[SelectedItem::new("sha1-aaa", false)]).await;
    assert!(matches!(
        result,
        Err(ShareError::Identity(StorageError::NoIdentity))
    ));
}

#[tokio::test]
async fn test_upload_not_acknowledged() {
    let mut server = FakeServer::new();
    server.drop_received = true;
    let remote = server.spawn().await;

    let client = ServerClient::new(&remote, None).unwrap();
    let data = Bytes::from_static(b"lost blob");
    let err = client.upload_blob(data.clone()).await.unwrap_err();
    match err {
        ApiError::NotReceived(blob_ref) => assert_eq!(blob_ref, BlobRef::from_content(&data)),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_sign_handler_failure() {
    let mut server = FakeServer::new();
    server.sign_failure = Some(StatusCode::SERVICE_UNAVAILABLE);
    let store = server.store.clone();
    let remote = server.spawn().await;

    let client = ServerClient::new(&remote, None).unwrap();
    let err = client.sign_claim(Bytes::from_static(b"{}")).await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::HttpStatus(StatusCode::SERVICE_UNAVAILABLE, _)
    ));

    let sharer = Sharer::new(client.clone(), client);
    let result = sharer.share(&[SelectedItem::new("sha1-aaa", false)]).await;
    assert!(matches!(
        result,
        Err(ShareError::Signing(SigningError::Default(_)))
    ));
    // only the identity blob, no claim
    assert_eq!(store.len(), 1);
}
