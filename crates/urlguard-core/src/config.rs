//! Configuration management for UrlGuard.
//!
//! All configuration is driven by environment variables. The signing secret
//! lives in the `SignedUrl` section, exposed as `SIGNED_URL_*` variables.

use std::fmt;
use std::time::Duration;

use urlguard_auth::{SignatureAlgorithm, SignedUrlGuard};

use crate::error::{UrlGuardError, UrlGuardResult};

/// Global configuration for UrlGuard.
#[derive(Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlGuardConfig {
    /// HMAC secret for signing URLs. Never serialized.
    #[serde(skip_serializing, default)]
    pub secret: String,
    /// Signature algorithm name (`hmac-sha256` or `hmac-md5`).
    pub signature_algorithm: String,
    /// Lifetime in seconds of URLs minted by the server.
    pub default_ttl_secs: u64,
    /// Route patterns protected by the guard. `*` suffix matches a prefix.
    /// An empty list guards every route.
    pub guarded_routes: Vec<String>,
    /// Bind address for the server.
    pub gateway_listen: String,
    /// Scheme clients use to reach the server, used to rebuild request URIs.
    pub public_scheme: String,
    /// Log level.
    pub log_level: String,
}

impl fmt::Debug for UrlGuardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlGuardConfig")
            .field("secret", &"***")
            .field("signature_algorithm", &self.signature_algorithm)
            .field("default_ttl_secs", &self.default_ttl_secs)
            .field("guarded_routes", &self.guarded_routes)
            .field("gateway_listen", &self.gateway_listen)
            .field("public_scheme", &self.public_scheme)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Default for UrlGuardConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            signature_algorithm: SignatureAlgorithm::default().as_str().to_owned(),
            default_ttl_secs: 300,
            guarded_routes: vec!["/".to_owned()],
            gateway_listen: "0.0.0.0:8080".to_owned(),
            public_scheme: "http".to_owned(),
            log_level: "info".to_owned(),
        }
    }
}

impl UrlGuardConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// Unset variables keep their defaults; an unparsable TTL is ignored.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("SIGNED_URL_SECRET") {
            config.secret = v;
        }
        if let Some(v) = lookup("SIGNED_URL_ALGORITHM") {
            config.signature_algorithm = v;
        }
        if let Some(v) = lookup("SIGNED_URL_DEFAULT_TTL") {
            match v.trim().parse() {
                Ok(secs) => config.default_ttl_secs = secs,
                Err(_) => tracing::warn!(value = %v, "ignoring invalid SIGNED_URL_DEFAULT_TTL"),
            }
        }
        if let Some(v) = lookup("SIGNED_URL_ROUTES") {
            config.guarded_routes = v
                .split(',')
                .map(str::trim)
                .filter(|route| !route.is_empty())
                .map(ToOwned::to_owned)
                .collect();
        }
        if let Some(v) = lookup("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Some(v) = lookup("PUBLIC_SCHEME") {
            config.public_scheme = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// The configured signature algorithm.
    ///
    /// # Errors
    ///
    /// Returns [`UrlGuardError::Config`] for an unknown algorithm name.
    pub fn algorithm(&self) -> UrlGuardResult<SignatureAlgorithm> {
        self.signature_algorithm
            .parse()
            .map_err(|e| UrlGuardError::Config(format!("SIGNED_URL_ALGORITHM: {e}")))
    }

    /// Lifetime of URLs minted by the server.
    #[must_use]
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    /// Check that the configuration can be used to sign URLs.
    ///
    /// # Errors
    ///
    /// Returns [`UrlGuardError::Config`] if the secret is empty or the
    /// algorithm is unknown.
    pub fn validate(&self) -> UrlGuardResult<()> {
        if self.secret.is_empty() {
            return Err(UrlGuardError::Config(
                "SIGNED_URL_SECRET must be set to a non-empty value".to_owned(),
            ));
        }
        self.algorithm()?;
        Ok(())
    }

    /// Validate the configuration and build a guard from it.
    ///
    /// # Errors
    ///
    /// Returns [`UrlGuardError::Config`] if [`validate`](Self::validate) fails.
    pub fn build_guard(&self) -> UrlGuardResult<SignedUrlGuard> {
        self.validate()?;
        Ok(SignedUrlGuard::new(self.secret.as_str()).with_algorithm(self.algorithm()?))
    }
}
