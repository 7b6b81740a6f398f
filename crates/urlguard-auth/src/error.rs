//! Error types for signed URL handling.
//!
//! Validation failures are reported through [`ValidationError`], a closed set of
//! reasons whose display text is safe to return verbatim to HTTP clients.
//! [`UriError`] covers inputs rejected before any signing takes place.

/// Reasons a signed URL fails validation.
///
/// The variants are checked in declaration order; the first failing check wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ValidationError {
    /// The `sig` query parameter is absent or empty.
    #[error("missing signature")]
    MissingSignature,

    /// The `exp` query parameter is absent or not a Unix timestamp in seconds.
    #[error("malformed timestamp")]
    MalformedTimestamp,

    /// The current time is past the `exp` instant.
    #[error("expired")]
    Expired,

    /// The recomputed signature differs from the `sig` query parameter.
    #[error("signature mismatch")]
    SignatureMismatch,
}

impl ValidationError {
    /// The human-readable reason text, identical to the `Display` output.
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::MissingSignature => "missing signature",
            Self::MalformedTimestamp => "malformed timestamp",
            Self::Expired => "expired",
            Self::SignatureMismatch => "signature mismatch",
        }
    }
}

/// Errors raised while parsing a URI to sign or validate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UriError {
    /// The input is neither an absolute URL nor a relative reference.
    #[error("invalid URI: {0}")]
    Parse(#[from] url::ParseError),

    /// The input is an absolute URL without a hierarchical path (e.g. `mailto:`).
    #[error("URI has no hierarchical path: {0}")]
    NotHierarchical(String),

    /// A request authority that is not a bare `host[:port]`.
    #[error("invalid authority: {0}")]
    InvalidAuthority(String),

    /// A request path that changes when resolved (dot segments, a leading `//`).
    #[error("request path is not in normal form: {0}")]
    NonNormalPath(String),
}

/// A signature algorithm name that is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported signature algorithm: {0}")]
pub struct UnsupportedAlgorithm(pub String);
