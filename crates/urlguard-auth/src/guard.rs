//! The signed URL engine.
//!
//! [`SignedUrlGuard`] generates URLs carrying `sig` and `exp` query parameters
//! and validates them against the requesting client's address:
//!
//! 1. Resolve the URI to absolute form
//! 2. Extract `sig` (missing or empty fails with [`ValidationError::MissingSignature`])
//! 3. Extract and parse `exp` (fails with [`ValidationError::MalformedTimestamp`])
//! 4. Compare the clock to `exp`, inclusive (fails with [`ValidationError::Expired`])
//! 5. Recompute the signature over `path:exp:address` and compare in constant time
//!    (fails with [`ValidationError::SignatureMismatch`])

use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::canonical::{EXPIRES_PARAM, SIGNATURE_PARAM, build_string_to_sign};
use crate::clock::{self, Clock, SystemClock};
use crate::error::ValidationError;
use crate::secret::SecretKey;
use crate::signature::{SignatureAlgorithm, compute_signature, signatures_match};
use crate::uri::TargetUri;

/// The outcome of validating a signed URL.
pub type ValidationOutcome = Result<VerifiedUrl, ValidationError>;

/// A successfully validated signed URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedUrl {
    /// The instant after which the URL stops validating.
    pub expires_at: DateTime<Utc>,
}

/// Generates and validates signed URLs under one secret.
///
/// The guard is immutable after construction and safe to share between threads.
///
/// # Examples
///
/// ```
/// use std::net::{IpAddr, Ipv4Addr};
/// use std::time::Duration;
///
/// use urlguard_auth::{SignedUrlGuard, TargetUri};
///
/// let guard = SignedUrlGuard::new("MySecret");
/// let client = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7));
///
/// let target = TargetUri::parse("/static/report.pdf").unwrap();
/// let signed = guard.generate(&target, Duration::from_secs(300), client);
///
/// assert!(guard.validate(&signed, client).is_ok());
/// ```
pub struct SignedUrlGuard {
    secret: SecretKey,
    algorithm: SignatureAlgorithm,
    clock: Arc<dyn Clock>,
}

impl SignedUrlGuard {
    /// Create a guard using HMAC-SHA256 and the system clock.
    ///
    /// The secret is used as given; rejecting an empty secret is left to the
    /// embedding application's configuration checks.
    #[must_use]
    pub fn new(secret: impl Into<SecretKey>) -> Self {
        Self {
            secret: secret.into(),
            algorithm: SignatureAlgorithm::default(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the signature algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: SignatureAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// The signature algorithm in use.
    #[must_use]
    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    /// Sign `target` for `client_addr`, valid for `ttl` from now.
    ///
    /// The returned URI keeps the absolute or relative form of `target`, keeps
    /// its other query parameters in order and carries fresh `sig` and `exp`
    /// parameters. Expiration is truncated to whole seconds.
    #[must_use]
    pub fn generate(&self, target: &TargetUri, ttl: Duration, client_addr: IpAddr) -> TargetUri {
        let expires_at = clock::saturating_add(self.clock.now(), ttl);
        let expires = expires_at.timestamp();
        let signature = self.sign(target.path(), expires, client_addr);

        debug!(
            path = target.path(),
            expires,
            %client_addr,
            algorithm = %self.algorithm,
            "Generated signed URL"
        );

        target.with_signature(&signature, expires)
    }

    /// Validate a signed URL presented by `client_addr`.
    ///
    /// Checks run in a fixed order and the first failure is returned; see the
    /// module documentation.
    pub fn validate(&self, target: &TargetUri, client_addr: IpAddr) -> ValidationOutcome {
        let signature = target
            .query_param(SIGNATURE_PARAM)
            .filter(|sig| !sig.is_empty())
            .ok_or(ValidationError::MissingSignature)?;

        let expires: i64 = target
            .query_param(EXPIRES_PARAM)
            .and_then(|exp| exp.trim().parse().ok())
            .ok_or(ValidationError::MalformedTimestamp)?;
        let expires_at =
            DateTime::<Utc>::from_timestamp(expires, 0).ok_or(ValidationError::MalformedTimestamp)?;

        let now = self.clock.now();
        if now > expires_at {
            debug!(path = target.path(), %expires_at, %now, "Signed URL expired");
            return Err(ValidationError::Expired);
        }

        let expected = self.sign(target.path(), expires, client_addr);
        if signatures_match(&signature, &expected) {
            debug!(path = target.path(), %client_addr, "Signed URL verification succeeded");
            Ok(VerifiedUrl { expires_at })
        } else {
            debug!(path = target.path(), %client_addr, "Signed URL signature mismatch");
            Err(ValidationError::SignatureMismatch)
        }
    }

    /// Compute the signature for one `(path, expiration, address)` triple.
    fn sign(&self, path: &str, expires: i64, client_addr: IpAddr) -> String {
        let message = build_string_to_sign(path, expires, client_addr);
        compute_signature(self.algorithm, self.secret.as_bytes(), &message)
    }
}

impl fmt::Debug for SignedUrlGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedUrlGuard")
            .field("secret", &self.secret)
            .field("algorithm", &self.algorithm)
            .field("clock", &"...")
            .finish()
    }
}
