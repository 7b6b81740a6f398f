//! Canonical signing message construction.
//!
//! The message signed for a URL is the three fields
//!
//! ```text
//! <absolute path>:<expiration unix seconds>:<client address>
//! ```
//!
//! joined by `:` in that fixed order. Fields are not escaped, so a `:` inside
//! the path or an IPv6 address is part of the message as-is. The query string is
//! never part of the message, which keeps `sig` and `exp` out of what they sign.

use std::net::IpAddr;

/// Query parameter carrying the hex signature.
pub const SIGNATURE_PARAM: &str = "sig";

/// Query parameter carrying the expiration as integer Unix seconds.
pub const EXPIRES_PARAM: &str = "exp";

/// Field delimiter of the signing message.
const DELIMITER: char = ':';

/// Build the message to sign for a path, expiration and client address.
///
/// # Examples
///
/// ```
/// use std::net::{IpAddr, Ipv4Addr};
///
/// use urlguard_auth::canonical::build_string_to_sign;
///
/// let message = build_string_to_sign("/static/a.pdf", 1_700_000_000, IpAddr::V4(Ipv4Addr::LOCALHOST));
/// assert_eq!(message, "/static/a.pdf:1700000000:127.0.0.1");
/// ```
#[must_use]
pub fn build_string_to_sign(path: &str, expires: i64, client_addr: IpAddr) -> String {
    format!("{path}{DELIMITER}{expires}{DELIMITER}{client_addr}")
}
