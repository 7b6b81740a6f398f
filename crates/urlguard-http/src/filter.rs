//! The signed URL request filter.
//!
//! [`SignedUrlFilter`] is the middleware capability: given a request URI and the
//! client address it decides whether processing continues or the request is
//! short-circuited with a `403 Forbidden` plain-text response carrying the
//! validation failure reason.
//!
//! A [`GuardPolicy`] selects which requests are checked, either every request
//! (`Global`) or only requests whose path matches a configured route
//! (`Routes`). Both modes run the same check and produce the same outcome.

use std::net::IpAddr;
use std::sync::Arc;

use tracing::{debug, warn};
use urlguard_auth::{SignedUrlGuard, TargetUri, UriError, VerifiedUrl};

use crate::response::{GuardResponseBody, bad_request_response, forbidden_response};

/// Which requests a filter guards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GuardPolicy {
    /// Every request must carry a valid signature.
    #[default]
    Global,
    /// Only requests whose path matches one of the patterns are checked.
    ///
    /// A pattern ending in `*` matches any path starting with the text before
    /// the `*`; any other pattern must equal the path exactly.
    Routes(Vec<String>),
}

impl GuardPolicy {
    /// Build a policy from route patterns; an empty list guards everything.
    #[must_use]
    pub fn from_routes(routes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let routes: Vec<String> = routes.into_iter().map(Into::into).collect();
        if routes.is_empty() {
            Self::Global
        } else {
            Self::Routes(routes)
        }
    }

    /// Whether requests to `path` must be validated.
    #[must_use]
    pub fn applies_to(&self, path: &str) -> bool {
        match self {
            Self::Global => true,
            Self::Routes(routes) => routes.iter().any(|pattern| route_matches(pattern, path)),
        }
    }
}

/// Match one route pattern against a request path.
fn route_matches(pattern: &str, path: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => path.starts_with(prefix),
        None => path == pattern,
    }
}

/// Outcome of running the filter on a request.
#[derive(Debug)]
pub enum FilterDecision {
    /// The request may proceed to the handler.
    Continue(Option<VerifiedUrl>),
    /// The request is answered with this response instead.
    Reject(http::Response<GuardResponseBody>),
}

impl FilterDecision {
    /// Whether the request may proceed.
    #[must_use]
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue(_))
    }
}

/// Request-level signed URL check.
#[derive(Debug, Clone)]
pub struct SignedUrlFilter {
    guard: Arc<SignedUrlGuard>,
    policy: GuardPolicy,
    scheme: String,
}

impl SignedUrlFilter {
    /// Create a filter guarding every request, rebuilding URIs with `http`.
    #[must_use]
    pub fn new(guard: Arc<SignedUrlGuard>) -> Self {
        Self {
            guard,
            policy: GuardPolicy::Global,
            scheme: "http".to_owned(),
        }
    }

    /// Replace the guard policy.
    #[must_use]
    pub fn with_policy(mut self, policy: GuardPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the scheme clients use to reach the server.
    #[must_use]
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// The guard used for validation.
    #[must_use]
    pub fn guard(&self) -> &Arc<SignedUrlGuard> {
        &self.guard
    }

    /// The active guard policy.
    #[must_use]
    pub fn policy(&self) -> &GuardPolicy {
        &self.policy
    }

    /// Validate an already reconstructed request URI.
    ///
    /// Ignores the policy; callers use this when they have decided the
    /// request must be guarded.
    #[must_use]
    pub fn check(&self, uri: &TargetUri, client_addr: IpAddr) -> FilterDecision {
        match self.guard.validate(uri, client_addr) {
            Ok(verified) => {
                debug!(path = uri.path(), %client_addr, "signed URL accepted");
                FilterDecision::Continue(Some(verified))
            }
            Err(err) => {
                warn!(path = uri.path(), %client_addr, reason = %err, "signed URL rejected");
                FilterDecision::Reject(forbidden_response(err.reason()))
            }
        }
    }

    /// Apply the policy and validate an inbound request.
    ///
    /// Requests outside the policy continue unchecked. Requests whose URI
    /// cannot be reconstructed are rejected with `400 Bad Request`.
    #[must_use]
    pub fn check_request(
        &self,
        parts: &http::request::Parts,
        client_addr: IpAddr,
    ) -> FilterDecision {
        if !self.policy.applies_to(parts.uri.path()) {
            return FilterDecision::Continue(None);
        }

        match request_uri(parts, &self.scheme) {
            Ok(uri) => self.check(&uri, client_addr),
            Err(err) => {
                warn!(uri = %parts.uri, %client_addr, error = %err, "cannot rebuild request URI");
                FilterDecision::Reject(bad_request_response("malformed request URI"))
            }
        }
    }
}

/// Rebuild the absolute URI the client requested.
///
/// The authority comes from the `Host` header, falling back to the authority of
/// an absolute-form request target, and must be a bare `host[:port]`. The scheme
/// of an absolute-form target wins over `default_scheme`. Without any authority
/// the path and query are returned as a relative URI.
///
/// The path of the result is always the request target's own path: a target
/// whose path would be rewritten by resolution is refused, so the path that is
/// validated is the path the handler sees.
pub fn request_uri(
    parts: &http::request::Parts,
    default_scheme: &str,
) -> Result<TargetUri, UriError> {
    let path_and_query = parts
        .uri
        .path_and_query()
        .map_or("/", http::uri::PathAndQuery::as_str);

    let host = parts
        .headers
        .get(http::header::HOST)
        .and_then(|value| value.to_str().ok())
        .filter(|host| !host.is_empty())
        .or_else(|| parts.uri.authority().map(http::uri::Authority::as_str));

    let uri = match host {
        Some(host) => {
            let authority = bare_authority(host)?;
            let scheme = parts.uri.scheme_str().unwrap_or(default_scheme);
            TargetUri::parse(&format!("{scheme}://{authority}{path_and_query}"))?
        }
        None => TargetUri::parse(path_and_query)?,
    };

    let request_path = parts.uri.path();
    if uri.path() != request_path {
        return Err(UriError::NonNormalPath(request_path.to_owned()));
    }
    Ok(uri)
}

/// Parse `host` as an authority without userinfo.
fn bare_authority(host: &str) -> Result<http::uri::Authority, UriError> {
    let authority: http::uri::Authority = host
        .parse()
        .map_err(|_| UriError::InvalidAuthority(host.to_owned()))?;
    if authority.as_str().contains('@') {
        return Err(UriError::InvalidAuthority(host.to_owned()));
    }
    Ok(authority)
}
