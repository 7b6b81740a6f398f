//! Signed URL request guard and hyper service.
//!
//! This crate is the request-interception hook around `urlguard-auth`:
//!
//! - **Filter** ([`filter`]): The [`SignedUrlFilter`](filter::SignedUrlFilter)
//!   middleware capability. Rebuilds the client-visible request URI, applies the
//!   [`GuardPolicy`](filter::GuardPolicy) and validates the signature against the
//!   client address.
//!
//! - **Service** ([`service`]): [`GuardedService`](service::GuardedService), a hyper
//!   `Service` running the filter in front of a [`RequestHandler`](handler::RequestHandler).
//!
//! - **Responses** ([`response`]): Plain-text rejection responses over the
//!   buffered [`GuardResponseBody`](response::GuardResponseBody).
//!
//! # Architecture
//!
//! ```text
//! HTTP Request
//!   -> GuardedService (hyper Service, bound to the peer address)
//!     -> Health check interception
//!     -> SignedUrlFilter (policy match + validate, on the head only)
//!        -> 403 text/plain with the failure reason
//!     -> Body collection
//!     -> RequestHandler
//!   <- HTTP Response
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use urlguard_auth::SignedUrlGuard;
//! use urlguard_http::filter::{GuardPolicy, SignedUrlFilter};
//! use urlguard_http::handler::NotFoundHandler;
//! use urlguard_http::service::GuardedService;
//!
//! let guard = Arc::new(SignedUrlGuard::new("MySecret"));
//! let filter = SignedUrlFilter::new(guard).with_policy(GuardPolicy::from_routes(["/static/*"]));
//! let service = GuardedService::new(NotFoundHandler, filter);
//! // Call `service.with_peer(peer_addr)` per accepted connection and serve it with hyper.
//! ```

pub mod filter;
pub mod handler;
pub mod response;
pub mod service;

// Re-export key types for convenience.
pub use filter::{FilterDecision, GuardPolicy, SignedUrlFilter, request_uri};
pub use handler::{HandlerFuture, NotFoundHandler, RequestHandler};
pub use response::GuardResponseBody;
pub use service::{GuardedService, process_request};
