//! Guarded service integration tests over real TCP.

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use urlguard_auth::TargetUri;

    use crate::{TestServer, http_client, loopback};

    fn sign(server: &TestServer, target: &str, ttl: Duration) -> String {
        server
            .guard()
            .generate(&TargetUri::parse(target).unwrap(), ttl, loopback())
            .to_string()
    }

    /// Send `request` verbatim and return the whole response.
    async fn send_raw(addr: SocketAddr, request: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_should_serve_valid_signed_relative_url() {
        let server = TestServer::start(&[]).await.unwrap();
        let signed = sign(&server, "/report.pdf", Duration::from_secs(300));

        let resp = http_client().get(server.url(&signed)).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        assert_eq!(resp.text().await.unwrap(), "/report.pdf");
    }

    #[tokio::test]
    async fn test_should_serve_valid_signed_absolute_url() {
        let server = TestServer::start(&[]).await.unwrap();
        let signed = sign(&server, &server.url("/a?x=1"), Duration::from_secs(300));

        let resp = http_client().get(&signed).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
    }

    #[tokio::test]
    async fn test_should_reject_unsigned_request_with_reason() {
        let server = TestServer::start(&[]).await.unwrap();

        let resp = http_client().get(server.url("/")).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::FORBIDDEN);
        assert_eq!(
            resp.headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("text/plain; charset=utf-8"),
        );
        assert_eq!(resp.text().await.unwrap(), "missing signature");
    }

    #[tokio::test]
    async fn test_should_reject_tampered_path() {
        let server = TestServer::start(&[]).await.unwrap();
        let signed = sign(&server, "/a", Duration::from_secs(300));
        let tampered = signed.replacen("/a", "/b", 1);

        let resp = http_client().get(server.url(&tampered)).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::FORBIDDEN);
        assert_eq!(resp.text().await.unwrap(), "signature mismatch");
    }

    #[tokio::test]
    async fn test_should_reject_malformed_expiry() {
        let server = TestServer::start(&[]).await.unwrap();

        let resp = http_client()
            .get(server.url("/?sig=ABCDEF&exp=tomorrow"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::FORBIDDEN);
        assert_eq!(resp.text().await.unwrap(), "malformed timestamp");
    }

    #[tokio::test]
    async fn test_should_expire_after_ttl() {
        let server = TestServer::start(&[]).await.unwrap();
        let signed = sign(&server, "/", Duration::from_secs(300));
        let client = http_client();

        server.clock().advance(Duration::from_secs(300));
        let resp = client.get(server.url(&signed)).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        server.clock().advance(Duration::from_secs(1));
        let resp = client.get(server.url(&signed)).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::FORBIDDEN);
        assert_eq!(resp.text().await.unwrap(), "expired");
    }

    #[tokio::test]
    async fn test_should_reject_link_signed_for_other_address() {
        let server = TestServer::start(&[]).await.unwrap();
        let signed = server
            .guard()
            .generate(
                &TargetUri::parse("/").unwrap(),
                Duration::from_secs(300),
                "203.0.113.9".parse().unwrap(),
            )
            .to_string();

        let resp = http_client().get(server.url(&signed)).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::FORBIDDEN);
        assert_eq!(resp.text().await.unwrap(), "signature mismatch");
    }

    #[tokio::test]
    async fn test_should_leave_unguarded_routes_open() {
        let server = TestServer::start(&["/private/*"]).await.unwrap();
        let client = http_client();

        let resp = client.get(server.url("/public")).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        let resp = client.get(server.url("/missing")).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

        let resp = client.get(server.url("/private/x")).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_should_answer_health_check_unsigned() {
        let server = TestServer::start(&[]).await.unwrap();

        let resp = http_client().get(server.url("/_health")).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let body = resp.text().await.unwrap();
        assert!(body.contains("\"status\":\"running\""));
    }

    #[tokio::test]
    async fn test_should_refuse_signature_smuggled_through_host_header() {
        let server = TestServer::start(&["/private/*", "/public"]).await.unwrap();
        let signed = sign(&server, "/public", Duration::from_secs(300));

        let request = format!(
            "GET /private/secret HTTP/1.1\r\nHost: {}{signed}#\r\nConnection: close\r\n\r\n",
            server.addr()
        );
        let response = send_raw(server.addr(), &request).await;
        assert!(response.starts_with("HTTP/1.1 400"), "{response}");
        assert!(!response.contains("/private/secret"), "{response}");
    }

    #[tokio::test]
    async fn test_should_not_reuse_signature_on_other_path() {
        let server = TestServer::start(&["/private/*", "/public"]).await.unwrap();
        let signed = sign(&server, "/public", Duration::from_secs(300));
        let reused = signed.replacen("/public", "/private/secret", 1);

        let resp = http_client().get(server.url(&reused)).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::FORBIDDEN);
        assert_eq!(resp.text().await.unwrap(), "signature mismatch");
    }
}
