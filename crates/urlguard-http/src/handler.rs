//! The handler wrapped by a guarded service.
//!
//! [`RequestHandler`] is the boundary between the guard and application logic:
//! it only sees requests the filter let through, together with the client
//! address the request arrived from.

use std::future::Future;
use std::net::IpAddr;
use std::pin::Pin;

use bytes::Bytes;

use crate::response::{GuardResponseBody, not_found_response};

/// Boxed response future returned by handlers.
pub type HandlerFuture = Pin<Box<dyn Future<Output = http::Response<GuardResponseBody>> + Send>>;

/// Application logic behind the signed URL guard.
///
/// Uses boxed futures so it can be held as `Arc<dyn RequestHandler>`.
pub trait RequestHandler: Send + Sync + 'static {
    /// Produce the response for a request that passed the guard.
    fn handle(
        &self,
        parts: http::request::Parts,
        body: Bytes,
        client_addr: IpAddr,
    ) -> HandlerFuture;
}

/// A handler answering `404 Not Found` to everything.
///
/// Useful for exercising the guard in isolation.
#[derive(Debug, Clone, Default)]
pub struct NotFoundHandler;

impl RequestHandler for NotFoundHandler {
    fn handle(
        &self,
        _parts: http::request::Parts,
        _body: Bytes,
        _client_addr: IpAddr,
    ) -> HandlerFuture {
        Box::pin(async { not_found_response() })
    }
}
