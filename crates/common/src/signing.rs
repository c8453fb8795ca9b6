//! Claim signing
//!
//! Claims are JSON objects signed in place: the signature covers the bytes of
//! the unsigned object up to (not including) its closing brace, and is
//! appended as a final `camliSig` field. The signer is named inside the
//! object by the reference of its public key blob (`camliSigner`), so a
//! verifier fetches that blob to check the signature.

use std::fmt::Debug;

use anyhow::anyhow;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};

use crate::blob_ref::BlobRef;

/// Size of an Ed25519 private key in bytes
pub const PRIVATE_KEY_SIZE: usize = 32;
/// PEM tag of a public key blob
pub const PUBLIC_KEY_PEM_TAG: &str = "PUBLIC KEY";

const SIG_FIELD: &str = ",\"camliSig\":\"";

#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    #[error("signing error: {0}")]
    Default(#[from] anyhow::Error),
    #[error("malformed payload: {0}")]
    Malformed(String),
    #[error("payload names signer {found}, expected {expected}")]
    SignerMismatch { expected: BlobRef, found: String },
    #[error("bad signature")]
    BadSignature,
}

#[async_trait]
pub trait SigningService: Send + Sync + Debug + Clone + 'static {
    /// Sign an unsigned claim, returning the signed claim bytes
    async fn sign(&self, payload: Bytes) -> Result<Bytes, SigningError>;
}

/// Local Ed25519 signing service
#[derive(Clone)]
pub struct KeySigner {
    key: SigningKey,
}

impl Debug for KeySigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeySigner")
            .field("identity", &self.identity())
            .finish()
    }
}

impl From<[u8; PRIVATE_KEY_SIZE]> for KeySigner {
    fn from(secret: [u8; PRIVATE_KEY_SIZE]) -> Self {
        Self {
            key: SigningKey::from_bytes(&secret),
        }
    }
}

impl KeySigner {
    /// Generate a new random key using a cryptographically secure RNG
    pub fn generate() -> Self {
        let mut bytes = [0u8; PRIVATE_KEY_SIZE];
        getrandom::getrandom(&mut bytes).expect("failed to generate random bytes");
        Self::from(bytes)
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.key.verifying_key()
    }

    /// PEM-encoded public key, as stored on the server
    pub fn public_key_blob(&self) -> Bytes {
        let pem = pem::Pem::new(PUBLIC_KEY_PEM_TAG, self.verifying_key().to_bytes().to_vec());
        Bytes::from(pem::encode(&pem))
    }

    /// Reference of the public key blob; the `camliSigner` of our claims
    pub fn identity(&self) -> BlobRef {
        BlobRef::from_content(&self.public_key_blob())
    }

    /// Sign `payload` in place, without async plumbing
    pub fn sign_payload(&self, payload: &[u8]) -> Result<Bytes, SigningError> {
        let text = std::str::from_utf8(payload)
            .map_err(|_| SigningError::Malformed("payload is not utf-8".to_string()))?;
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| SigningError::Malformed(format!("payload is not json: {}", e)))?;
        let signer = value
            .get("camliSigner")
            .and_then(|s| s.as_str())
            .ok_or_else(|| SigningError::Malformed("missing camliSigner".to_string()))?;

        let identity = self.identity();
        if signer != identity.to_string() {
            return Err(SigningError::SignerMismatch {
                expected: identity,
                found: signer.to_string(),
            });
        }

        let body = text
            .trim_end()
            .strip_suffix('}')
            .ok_or_else(|| SigningError::Malformed("payload is not a json object".to_string()))?;

        let signature = self.key.sign(body.as_bytes());
        let signed = format!(
            "{}{}{}\"}}\n",
            body,
            SIG_FIELD,
            STANDARD.encode(signature.to_bytes())
        );
        Ok(Bytes::from(signed))
    }
}

#[async_trait]
impl SigningService for KeySigner {
    async fn sign(&self, payload: Bytes) -> Result<Bytes, SigningError> {
        self.sign_payload(&payload)
    }
}

/// Parse a PEM public key blob
pub fn parse_public_key_blob(data: &[u8]) -> Result<VerifyingKey, SigningError> {
    let pem = pem::parse(data).map_err(|e| anyhow!("failed to parse PEM: {}", e))?;
    if pem.tag() != PUBLIC_KEY_PEM_TAG {
        return Err(anyhow!("invalid PEM tag, expected {}", PUBLIC_KEY_PEM_TAG).into());
    }
    let bytes: [u8; 32] = pem
        .contents()
        .try_into()
        .map_err(|_| anyhow!("invalid public key size, got {}", pem.contents().len()))?;
    Ok(VerifyingKey::from_bytes(&bytes).map_err(|e| anyhow!("invalid public key: {}", e))?)
}

/// Check the trailing `camliSig` of a signed claim against `key`
pub fn verify_signed(signed: &[u8], key: &VerifyingKey) -> Result<(), SigningError> {
    let text = std::str::from_utf8(signed)
        .map_err(|_| SigningError::Malformed("signed claim is not utf-8".to_string()))?
        .trim_end();
    let idx = text
        .rfind(SIG_FIELD)
        .ok_or_else(|| SigningError::Malformed("missing camliSig".to_string()))?;
    let (body, rest) = text.split_at(idx);
    let encoded = rest[SIG_FIELD.len()..]
        .strip_suffix("\"}")
        .ok_or_else(|| SigningError::Malformed("camliSig is not the last field".to_string()))?;

    let raw = STANDARD
        .decode(encoded)
        .map_err(|_| SigningError::BadSignature)?;
    let signature = Signature::from_slice(&raw).map_err(|_| SigningError::BadSignature)?;
    key.verify_strict(body.as_bytes(), &signature)
        .map_err(|_| SigningError::BadSignature)
}
