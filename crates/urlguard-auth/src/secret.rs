//! The HMAC secret owned by a guard.

use std::fmt;

/// Opaque secret key bytes.
///
/// The value is never displayed; its `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(Vec<u8>);

impl SecretKey {
    /// Create a secret from raw bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(***)")
    }
}

impl From<&str> for SecretKey {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes())
    }
}

impl From<String> for SecretKey {
    fn from(value: String) -> Self {
        Self::new(value.into_bytes())
    }
}

impl From<Vec<u8>> for SecretKey {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl From<&[u8]> for SecretKey {
    fn from(value: &[u8]) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_redact_debug_output() {
        let key = SecretKey::from("MySecret");
        let debug = format!("{key:?}");
        assert!(!debug.contains("MySecret"));
        assert_eq!(debug, "SecretKey(***)");
    }

    #[test]
    fn test_should_expose_utf8_bytes() {
        let key = SecretKey::from("abc".to_owned());
        assert_eq!(key.as_bytes(), b"abc");
        assert_eq!(SecretKey::from(b"abc".as_slice()), key);
    }
}
