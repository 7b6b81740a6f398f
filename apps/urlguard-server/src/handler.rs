//! Demo application served behind the signed URL guard.
//!
//! `/` is the protected resource. `/backdoor` is left unguarded and hands out a
//! short-lived signed link to `/` bound to the caller's address, redirecting
//! the client to it.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::info;
use urlguard_auth::{SignedUrlGuard, TargetUri, UriError};
use urlguard_http::handler::{HandlerFuture, RequestHandler};
use urlguard_http::response::{not_found_response, redirect_response, text_response};

/// Path of the protected resource.
pub const PROTECTED_PATH: &str = "/";

/// Path that mints signed links to [`PROTECTED_PATH`].
pub const BACKDOOR_PATH: &str = "/backdoor";

/// Body served at [`PROTECTED_PATH`].
const GREETING: &str = "Hello World!";

/// Handler for the demo routes.
#[derive(Debug, Clone)]
pub struct DemoHandler {
    guard: Arc<SignedUrlGuard>,
    target: TargetUri,
    ttl: Duration,
}

impl DemoHandler {
    /// Create a handler minting links with `guard` that stay valid for `ttl`.
    ///
    /// # Errors
    ///
    /// Returns [`UriError`] if the protected path is not a valid relative URI.
    pub fn new(guard: Arc<SignedUrlGuard>, ttl: Duration) -> Result<Self, UriError> {
        Ok(Self {
            guard,
            target: TargetUri::parse(PROTECTED_PATH)?,
            ttl,
        })
    }

    /// The signed link to the protected resource for `client_addr`.
    fn mint_link(&self, client_addr: IpAddr) -> TargetUri {
        self.guard.generate(&self.target, self.ttl, client_addr)
    }
}

impl RequestHandler for DemoHandler {
    fn handle(
        &self,
        parts: http::request::Parts,
        _body: Bytes,
        client_addr: IpAddr,
    ) -> HandlerFuture {
        let response = match (&parts.method, parts.uri.path()) {
            (&http::Method::GET, PROTECTED_PATH) => text_response(http::StatusCode::OK, GREETING),
            (&http::Method::GET, BACKDOOR_PATH) => {
                let link = self.mint_link(client_addr).to_string();
                info!(%client_addr, ttl_secs = self.ttl.as_secs(), "minted signed link");
                redirect_response(&link)
            }
            _ => not_found_response(),
        };
        Box::pin(async move { response })
    }
}
