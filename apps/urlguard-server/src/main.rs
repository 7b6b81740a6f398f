//! UrlGuard Server - demo HTTP server protected by signed URLs.
//!
//! Serves a greeting at `/` that can only be fetched through a valid signed
//! link, and an open `/backdoor` route that mints such a link for the caller
//! and redirects to it. Links are bound to the caller's IP address and expire
//! after `SIGNED_URL_DEFAULT_TTL` seconds.
//!
//! # Usage
//!
//! ```text
//! SIGNED_URL_SECRET=MySecret GATEWAY_LISTEN=127.0.0.1:8080 urlguard-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SIGNED_URL_SECRET` | *(required)* | HMAC signing secret |
//! | `SIGNED_URL_ALGORITHM` | `hmac-sha256` | `hmac-sha256` or `hmac-md5` |
//! | `SIGNED_URL_DEFAULT_TTL` | `300` | Lifetime of minted links, in seconds |
//! | `SIGNED_URL_ROUTES` | `/` | Comma-separated guarded routes, `*` suffix for prefixes |
//! | `GATEWAY_LISTEN` | `0.0.0.0:8080` | Bind address |
//! | `PUBLIC_SCHEME` | `http` | Scheme clients use to reach the server |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod handler;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use urlguard_core::UrlGuardConfig;
use urlguard_http::handler::RequestHandler;
use urlguard_http::{GuardPolicy, GuardedService, SignedUrlFilter};

use crate::handler::DemoHandler;

/// Server version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Build the request filter described by `config`.
fn build_filter(config: &UrlGuardConfig) -> Result<SignedUrlFilter> {
    let guard = config.build_guard()?;
    Ok(SignedUrlFilter::new(Arc::new(guard))
        .with_policy(GuardPolicy::from_routes(config.guarded_routes.clone()))
        .with_scheme(config.public_scheme.clone()))
}

/// Run the accept loop, serving connections until a shutdown signal is received.
///
/// Each connection gets a service clone bound to its remote address.
async fn serve<H: RequestHandler>(listener: TcpListener, service: GuardedService<H>) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.with_peer(peer_addr);
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

/// Perform a health check by connecting to the server and requesting the health endpoint.
async fn run_health_check(addr: &str) -> Result<()> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {addr}"))?;

    let (mut reader, mut writer) = stream.into_split();

    let request = format!("GET /_health HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    writer.write_all(request.as_bytes()).await?;
    writer.shutdown().await?;

    let mut response = String::new();
    reader.read_to_string(&mut response).await?;

    if response.contains("200 OK") && response.contains("\"status\":\"running\"") {
        Ok(())
    } else {
        anyhow::bail!("unhealthy response from {addr}")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle --health-check flag for Docker HEALTHCHECK.
    if std::env::args().any(|a| a == "--health-check") {
        let config = UrlGuardConfig::from_env();
        let addr = config.gateway_listen.replace("0.0.0.0", "127.0.0.1");
        let healthy = run_health_check(&addr).await.is_ok();
        std::process::exit(i32::from(!healthy));
    }

    let config = UrlGuardConfig::from_env();

    init_tracing(&config.log_level)?;

    info!(
        gateway_listen = %config.gateway_listen,
        signature_algorithm = %config.signature_algorithm,
        default_ttl_secs = config.default_ttl_secs,
        guarded_routes = ?config.guarded_routes,
        version = VERSION,
        "starting UrlGuard Server",
    );

    let filter = build_filter(&config)?;
    let handler = DemoHandler::new(Arc::clone(filter.guard()), config.default_ttl())?;
    let service = GuardedService::new(handler, filter);

    let addr: SocketAddr = config
        .gateway_listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.gateway_listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, "listening for connections");

    serve(listener, service).await
}
