//! Content references
//!
//! A [`BlobRef`] names an immutable stored object by the hash of its
//! content, in the textual form `<hashname>-<hexdigest>` (e.g.
//! `sha224-d14a028c2a3a2bc9476102bb288234c415a2b01f828ea62ac5b3e42f`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha224};

/// Hash used when deriving a reference from content
pub const DEFAULT_HASH: &str = "sha224";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlobRefError {
    #[error("{0:?} is not a valid blobRef")]
    Invalid(String),
}

/// Content-hash identifier for a stored object.
///
/// Equality is equality of the hash name and digest. Parsing is lenient
/// about digest length so references produced by other hash widths (or
/// abbreviated in fixtures) still round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlobRef {
    hash: String,
    digest: String,
}

impl BlobRef {
    /// Parse a reference from its textual form
    pub fn parse(s: &str) -> Result<Self, BlobRefError> {
        let invalid = || BlobRefError::Invalid(s.to_string());
        let (hash, digest) = s.split_once('-').ok_or_else(invalid)?;

        let mut hash_chars = hash.chars();
        match hash_chars.next() {
            Some(c) if c.is_ascii_lowercase() => {}
            _ => return Err(invalid()),
        }
        if !hash_chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()) {
            return Err(invalid());
        }

        if digest.is_empty()
            || !digest
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        {
            return Err(invalid());
        }

        Ok(Self {
            hash: hash.to_string(),
            digest: digest.to_string(),
        })
    }

    /// Derive the reference of a blob from its bytes
    pub fn from_content(data: &[u8]) -> Self {
        Self {
            hash: DEFAULT_HASH.to_string(),
            digest: hex::encode(Sha224::digest(data)),
        }
    }

    /// Name of the hash function, e.g. `sha224`
    pub fn hash_name(&self) -> &str {
        &self.hash
    }

    /// Lowercase hex digest
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

impl fmt::Display for BlobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.hash, self.digest)
    }
}

impl FromStr for BlobRef {
    type Err = BlobRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for BlobRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BlobRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        BlobRef::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_display() {
        let br = BlobRef::parse("sha1-0beec7b5ea3f0fdbc95d0dd47f3c5bc275da8a33").unwrap();
        assert_eq!(br.hash_name(), "sha1");
        assert_eq!(br.to_string(), "sha1-0beec7b5ea3f0fdbc95d0dd47f3c5bc275da8a33");

        // short digests are accepted
        let short: BlobRef = "sha1-aaa".parse().unwrap();
        assert_eq!(short.digest(), "aaa");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in [
            "",
            "sha1",
            "sha1-",
            "-abc",
            "SHA1-abc",
            "sha1-ABC",
            "sha1-xyz",
            "1sha-abc",
            "sha1-ab-cd",
            "not a ref",
        ] {
            assert!(BlobRef::parse(bad).is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn test_from_content() {
        let br = BlobRef::from_content(b"");
        assert_eq!(
            br.to_string(),
            "sha224-d14a028c2a3a2bc9476102bb288234c415a2b01f828ea62ac5b3e42f"
        );
        assert_eq!(BlobRef::from_content(b"foo"), BlobRef::from_content(b"foo"));
        assert_ne!(BlobRef::from_content(b"foo"), BlobRef::from_content(b"bar"));
    }

    #[test]
    fn test_serde_as_string() {
        let br = BlobRef::parse("sha224-abcdef").unwrap();
        let json = serde_json::to_string(&br).unwrap();
        assert_eq!(json, "\"sha224-abcdef\"");
        let back: BlobRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, br);
        assert!(serde_json::from_str::<BlobRef>("\"nope\"").is_err());
    }
}
