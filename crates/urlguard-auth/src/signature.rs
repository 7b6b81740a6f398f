//! Keyed-hash signatures over the canonical signing message.
//!
//! Signatures are HMAC digests rendered as uppercase hexadecimal with no
//! separators. Two algorithms are available:
//!
//! - [`SignatureAlgorithm::HmacSha256`] - 256-bit digest, the default
//! - [`SignatureAlgorithm::HmacMd5`] - 128-bit digest, for URLs minted by older deployments
//!
//! Both produce the same `sig` query parameter shape; only its length differs.

use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, KeyInit, Mac};
use md5::Md5;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::UnsupportedAlgorithm;

type HmacSha256 = Hmac<Sha256>;
type HmacMd5 = Hmac<Md5>;

/// The keyed-hash function used to sign URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignatureAlgorithm {
    /// HMAC-SHA256.
    #[default]
    HmacSha256,
    /// HMAC-MD5.
    HmacMd5,
}

impl SignatureAlgorithm {
    /// The configuration name of the algorithm.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HmacSha256 => "hmac-sha256",
            Self::HmacMd5 => "hmac-md5",
        }
    }

    /// Length of the hex-encoded signature in characters.
    #[must_use]
    pub const fn signature_len(self) -> usize {
        match self {
            Self::HmacSha256 => 64,
            Self::HmacMd5 => 32,
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = UnsupportedAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hmac-sha256" | "sha256" => Ok(Self::HmacSha256),
            "hmac-md5" | "md5" => Ok(Self::HmacMd5),
            _ => Err(UnsupportedAlgorithm(s.to_owned())),
        }
    }
}

/// Compute the signature of `message` keyed with `key`.
///
/// Returns the uppercase hex-encoded digest.
///
/// # Examples
///
/// ```
/// use urlguard_auth::signature::{SignatureAlgorithm, compute_signature};
///
/// let sig = compute_signature(SignatureAlgorithm::HmacMd5, b"key", "/a:0:127.0.0.1");
/// assert_eq!(sig.len(), 32);
/// assert!(sig.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
/// ```
#[must_use]
pub fn compute_signature(algorithm: SignatureAlgorithm, key: &[u8], message: &str) -> String {
    let digest = match algorithm {
        SignatureAlgorithm::HmacSha256 => hmac_sha256(key, message.as_bytes()),
        SignatureAlgorithm::HmacMd5 => hmac_md5(key, message.as_bytes()),
    };
    hex::encode_upper(digest)
}

/// Compare a provided signature against the expected one in constant time.
#[must_use]
pub fn signatures_match(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Compute HMAC-SHA256 and return the raw bytes.
fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Compute HMAC-MD5 and return the raw bytes.
fn hmac_md5(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacMd5::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}
