//! Response builders shared by the guard and handlers.
//!
//! Guard responses are small and fully buffered: a plain-text rejection reason,
//! a redirect or the health probe payload.

use bytes::Bytes;
use http_body_util::Full;

/// Body of every response produced by a guarded service.
pub type GuardResponseBody = Full<Bytes>;

/// Content type of every plain-text response.
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Build a plain-text response with the given status.
#[must_use]
pub fn text_response(
    status: http::StatusCode,
    text: impl Into<String>,
) -> http::Response<GuardResponseBody> {
    let text: String = text.into();
    let mut response = http::Response::new(Full::new(Bytes::from(text)));
    *response.status_mut() = status;
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static(TEXT_PLAIN),
    );
    response
}

/// `403 Forbidden` carrying the rejection reason as plain text.
#[must_use]
pub fn forbidden_response(reason: &str) -> http::Response<GuardResponseBody> {
    text_response(http::StatusCode::FORBIDDEN, reason)
}

/// `400 Bad Request` for request targets that cannot be interpreted.
#[must_use]
pub fn bad_request_response(reason: &str) -> http::Response<GuardResponseBody> {
    text_response(http::StatusCode::BAD_REQUEST, reason)
}

/// `404 Not Found`.
#[must_use]
pub fn not_found_response() -> http::Response<GuardResponseBody> {
    text_response(http::StatusCode::NOT_FOUND, "not found")
}

/// `500 Internal Server Error`.
#[must_use]
pub fn internal_error_response(reason: &str) -> http::Response<GuardResponseBody> {
    text_response(http::StatusCode::INTERNAL_SERVER_ERROR, reason)
}

/// `302 Found` pointing at `location`.
///
/// Falls back to a `500` response if `location` is not a valid header value.
#[must_use]
pub fn redirect_response(location: &str) -> http::Response<GuardResponseBody> {
    match http::HeaderValue::from_str(location) {
        Ok(value) => {
            let mut response = http::Response::new(Full::default());
            *response.status_mut() = http::StatusCode::FOUND;
            response.headers_mut().insert(http::header::LOCATION, value);
            response
        }
        Err(_) => internal_error_response("invalid redirect location"),
    }
}

/// Produce a health check response.
#[must_use]
pub fn health_check_response() -> http::Response<GuardResponseBody> {
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from_static(
            br#"{"status":"running","service":"urlguard"}"#,
        )))
        .expect("static health response should be valid")
}
