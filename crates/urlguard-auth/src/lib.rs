//! Time-limited, client-bound signed URLs.
//!
//! A signed URL carries two query parameters:
//!
//! - `sig` - uppercase hex HMAC over `path:expiration:client-address`
//! - `exp` - expiration as integer Unix seconds
//!
//! Validation recomputes the HMAC for the presenting client's address, so a URL
//! only works for the client it was minted for, on the path it was minted for,
//! until it expires. No session or token store is involved.
//!
//! # Usage
//!
//! ```rust
//! use std::net::{IpAddr, Ipv4Addr};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use chrono::{DateTime, Utc};
//! use urlguard_auth::clock::ManualClock;
//! use urlguard_auth::{SignedUrlGuard, TargetUri, ValidationError};
//!
//! let clock = Arc::new(ManualClock::new(DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap()));
//! let guard = SignedUrlGuard::new("MySecret").with_clock(clock.clone());
//! let client = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
//!
//! let target = TargetUri::parse("/static/sensitive-info.pdf").unwrap();
//! let signed = guard.generate(&target, Duration::from_secs(300), client);
//!
//! clock.advance(Duration::from_secs(240));
//! assert!(guard.validate(&signed, client).is_ok());
//!
//! clock.advance(Duration::from_secs(120));
//! assert_eq!(guard.validate(&signed, client), Err(ValidationError::Expired));
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Signing message construction and query parameter names
//! - [`clock`] - Injectable time sources
//! - [`error`] - Validation and URI errors
//! - [`guard`] - The [`SignedUrlGuard`] engine
//! - [`secret`] - Redacted secret key holder
//! - [`signature`] - HMAC computation and constant-time comparison
//! - [`uri`] - Absolute and relative target URIs

pub mod canonical;
pub mod clock;
pub mod error;
pub mod guard;
pub mod secret;
pub mod signature;
pub mod uri;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{UnsupportedAlgorithm, UriError, ValidationError};
pub use guard::{SignedUrlGuard, ValidationOutcome, VerifiedUrl};
pub use secret::SecretKey;
pub use signature::SignatureAlgorithm;
pub use uri::TargetUri;
