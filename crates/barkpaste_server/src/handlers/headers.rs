//! Bearer token, TTL and URL helpers for request/response headers.

use axum::http::{header, HeaderMap, HeaderValue};
use barkpaste_core::{models::paste::Paste, AppError};
use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// Relative lifetime in whole seconds.
pub const EXPIRES_AFTER: &str = "x-expires-after";
/// Absolute expiry as RFC 3339. Wins over [`EXPIRES_AFTER`] when both are sent.
pub const EXPIRES_AT: &str = "x-expires-at";

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Extract the bearer token from `Authorization`.
///
/// Returns an empty string (anonymous) when the header is missing or not a
/// bearer credential.
pub fn bearer_token(headers: &HeaderMap) -> String {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().strip_prefix("Bearer "))
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap_or_default()
        .to_string()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, AppError> {
    headers
        .get(name)
        .map(|value| {
            value
                .to_str()
                .map(str::trim)
                .map_err(|_| AppError::InvalidRequest(format!("{} is not valid text", name)))
        })
        .transpose()
}

/// Resolve the requested TTL from the expiry headers.
///
/// # Returns
/// `default` when neither header is present.
///
/// # Errors
/// [`AppError::InvalidRequest`] when a header is malformed.
pub fn requested_ttl(
    headers: &HeaderMap,
    now: DateTime<Utc>,
    default: Duration,
) -> Result<Duration, AppError> {
    let mut ttl = default;

    if let Some(raw) = header_str(headers, EXPIRES_AFTER)? {
        let seconds: i64 = raw.parse().map_err(|_| {
            AppError::InvalidRequest(format!("{} must be a whole number of seconds", EXPIRES_AFTER))
        })?;
        ttl = Duration::try_seconds(seconds).ok_or_else(|| {
            AppError::InvalidRequest(format!("{} is out of range", EXPIRES_AFTER))
        })?;
    }

    if let Some(raw) = header_str(headers, EXPIRES_AT)? {
        let at = DateTime::parse_from_rfc3339(raw).map_err(|_| {
            AppError::InvalidRequest(format!("{} must be an RFC 3339 timestamp", EXPIRES_AT))
        })?;
        ttl = at.with_timezone(&Utc).signed_duration_since(now);
    }

    Ok(ttl)
}

/// RFC 3339 rendering of a paste's expiry for the `X-Expires-At` response header.
pub fn expires_at_value(paste: &Paste) -> HeaderValue {
    let rendered = paste.expires_at.to_rfc3339_opts(SecondsFormat::Secs, true);
    HeaderValue::from_str(&rendered).unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// Absolute URL of a paste as seen by the requesting client.
///
/// The id is the path-decoded form, so non-ASCII ids stay readable. The host
/// is used as sent; a punycode host is not converted back to Unicode.
pub fn paste_url(headers: &HeaderMap, id: &str) -> String {
    let scheme = match headers
        .get(FORWARDED_PROTO)
        .and_then(|value| value.to_str().ok())
    {
        Some(proto) if proto.eq_ignore_ascii_case("https") => "https",
        _ => "http",
    };
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost");
    format!("{}://{}/{}", scheme, host, id)
}
