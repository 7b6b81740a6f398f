//! Integration tests for UrlGuard.
//!
//! Most tests start a guarded service in-process on an ephemeral port and talk
//! to it over real TCP with `reqwest`. Tests marked `#[ignore]` instead target
//! a running `urlguard-server` at `localhost:8080`.
//!
//! Run those with:
//! ```text
//! SIGNED_URL_SECRET=MySecret cargo run -p urlguard-server &
//! cargo test -p urlguard-integration -- --ignored
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Once};

use anyhow::Result;
use bytes::Bytes;
use chrono::SubsecRound;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::warn;
use urlguard_auth::{ManualClock, SignedUrlGuard};
use urlguard_http::handler::{HandlerFuture, RequestHandler};
use urlguard_http::response::{not_found_response, text_response};
use urlguard_http::{GuardPolicy, GuardedService, SignedUrlFilter};

static INIT: Once = Once::new();

/// Secret shared by every in-process server.
pub const TEST_SECRET: &str = "MySecret";

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Endpoint URL of an externally started server.
#[must_use]
pub fn endpoint_url() -> String {
    std::env::var("URLGUARD_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:8080".to_owned())
}

/// Address in-process servers see test requests coming from.
#[must_use]
pub fn loopback() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

/// HTTP client that reports redirects instead of following them.
#[must_use]
pub fn http_client() -> reqwest::Client {
    init_tracing();
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("client configuration is valid")
}

/// Answers every request with its path.
#[derive(Debug, Clone, Copy)]
pub struct PathEchoHandler;

impl RequestHandler for PathEchoHandler {
    fn handle(
        &self,
        parts: http::request::Parts,
        _body: Bytes,
        _client_addr: IpAddr,
    ) -> HandlerFuture {
        let response = if parts.uri.path() == "/missing" {
            not_found_response()
        } else {
            text_response(http::StatusCode::OK, parts.uri.path().to_owned())
        };
        Box::pin(async move { response })
    }
}

/// An in-process guarded server.
#[derive(Debug)]
pub struct TestServer {
    addr: SocketAddr,
    guard: Arc<SignedUrlGuard>,
    clock: Arc<ManualClock>,
    task: JoinHandle<()>,
}

impl TestServer {
    /// Start a server guarding `routes` (every route when empty).
    pub async fn start(routes: &[&str]) -> Result<Self> {
        init_tracing();

        let clock = Arc::new(ManualClock::new(chrono::Utc::now().trunc_subsecs(0)));
        let guard = Arc::new(SignedUrlGuard::new(TEST_SECRET).with_clock(clock.clone()));
        let filter = SignedUrlFilter::new(Arc::clone(&guard))
            .with_policy(GuardPolicy::from_routes(routes.iter().copied()));
        let service = GuardedService::new(PathEchoHandler, filter);

        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;

        let task = tokio::spawn(async move {
            let http = HttpConnBuilder::new(TokioExecutor::new());
            loop {
                let (stream, peer_addr) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "test listener stopped accepting");
                        break;
                    }
                };
                let conn = http
                    .serve_connection(TokioIo::new(stream), service.with_peer(peer_addr))
                    .into_owned();
                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        warn!(%peer_addr, error = %e, "connection error");
                    }
                });
            }
        });

        Ok(Self {
            addr,
            guard,
            clock,
            task,
        })
    }

    /// Absolute URL for `path_and_query` on this server.
    #[must_use]
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{path_and_query}", self.addr)
    }

    /// The address the server listens on.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// The guard validating requests.
    #[must_use]
    pub fn guard(&self) -> &SignedUrlGuard {
        &self.guard
    }

    /// The clock the guard reads.
    #[must_use]
    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

mod test_guard;
mod test_server;
