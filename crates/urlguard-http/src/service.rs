//! The guarded HTTP service implementing hyper's `Service` trait.
//!
//! [`GuardedService`] puts a [`SignedUrlFilter`] in front of a [`RequestHandler`]:
//!
//! 1. Health check interception (`GET /_health`)
//! 2. Signed URL validation for requests covered by the guard policy
//! 3. Request body collection, only for requests that passed the guard
//! 4. Dispatch to the handler
//!
//! hyper serves one service clone per connection; [`GuardedService::with_peer`]
//! binds that clone to the connection's remote address, which is the client
//! address signatures are checked against.

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::pin::Pin;
use std::sync::Arc;

use http_body::Body;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::service::Service;
use tracing::{debug, error};

use crate::filter::{FilterDecision, SignedUrlFilter};
use crate::handler::RequestHandler;
use crate::response::{GuardResponseBody, health_check_response, internal_error_response};

/// A hyper service validating signed URLs before invoking a handler.
///
/// # Type Parameters
///
/// - `H`: The application handler implementing [`RequestHandler`].
#[derive(Debug)]
pub struct GuardedService<H: RequestHandler> {
    handler: Arc<H>,
    filter: Arc<SignedUrlFilter>,
    peer: Option<SocketAddr>,
}

impl<H: RequestHandler> GuardedService<H> {
    /// Create a new guarded service.
    #[must_use]
    pub fn new(handler: H, filter: SignedUrlFilter) -> Self {
        Self::from_shared(Arc::new(handler), filter)
    }

    /// Create a new guarded service from an `Arc<H>` handler.
    #[must_use]
    pub fn from_shared(handler: Arc<H>, filter: SignedUrlFilter) -> Self {
        Self {
            handler,
            filter: Arc::new(filter),
            peer: None,
        }
    }

    /// A clone of this service bound to the remote address of one connection.
    #[must_use]
    pub fn with_peer(&self, peer: SocketAddr) -> Self {
        Self {
            peer: Some(peer),
            ..self.clone()
        }
    }

    /// The remote address this service is bound to, if any.
    #[must_use]
    pub fn peer(&self) -> Option<SocketAddr> {
        self.peer
    }

    /// The address signatures are checked against.
    ///
    /// IPv4-mapped IPv6 peers (`::ffff:a.b.c.d`) are reported as plain IPv4.
    #[must_use]
    pub fn client_addr(&self) -> Option<IpAddr> {
        self.peer.map(|peer| peer.ip().to_canonical())
    }
}

impl<H: RequestHandler> Clone for GuardedService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            filter: Arc::clone(&self.filter),
            peer: self.peer,
        }
    }
}

impl<H: RequestHandler> Service<http::Request<Incoming>> for GuardedService<H> {
    type Response = http::Response<GuardResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        let filter = Arc::clone(&self.filter);
        let client_addr = self.client_addr();

        Box::pin(async move {
            let (parts, body) = req.into_parts();
            Ok(process_request(parts, body, handler.as_ref(), &filter, client_addr).await)
        })
    }
}

/// Run one request through the guard pipeline.
///
/// The body is only read once the request head has passed the guard; rejected
/// requests are answered without consuming it.
pub async fn process_request<H, B>(
    parts: http::request::Parts,
    body: B,
    handler: &H,
    filter: &SignedUrlFilter,
    client_addr: Option<IpAddr>,
) -> http::Response<GuardResponseBody>
where
    H: RequestHandler + ?Sized,
    B: Body,
    B::Error: fmt::Display,
{
    debug!(
        method = %parts.method,
        uri = %parts.uri,
        client_addr = ?client_addr,
        "processing request"
    );

    if is_health_check(&parts.method, parts.uri.path()) {
        return health_check_response();
    }

    let Some(client_addr) = client_addr else {
        error!(uri = %parts.uri, "request has no client address");
        return internal_error_response("client address unavailable");
    };

    match filter.check_request(&parts, client_addr) {
        FilterDecision::Reject(response) => response,
        FilterDecision::Continue(verified) => {
            if let Some(verified) = verified {
                debug!(expires_at = %verified.expires_at, "dispatching signed request");
            }
            let body = match body.collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(err) => {
                    error!(error = %err, "failed to collect request body");
                    return internal_error_response("failed to read request body");
                }
            };
            handler.handle(parts, body, client_addr).await
        }
    }
}

/// Check if the request is a health check probe.
fn is_health_check(method: &http::Method, path: &str) -> bool {
    *method == http::Method::GET && path == "/_health"
}
