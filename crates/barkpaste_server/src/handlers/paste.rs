//! Paste HTTP handlers.

use super::headers::{bearer_token, expires_at_value, paste_url, requested_ttl, EXPIRES_AT};
use crate::{error::HttpError, models::paste::*, AppError, AppState};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Duration;

fn with_expiry_header(mut response: Response, paste: &Paste) -> Response {
    response
        .headers_mut()
        .insert(EXPIRES_AT, expires_at_value(paste));
    response
}

fn created_response(headers: &HeaderMap, paste: &Paste) -> Response {
    let mut response = (StatusCode::CREATED, paste_url(headers, &paste.id)).into_response();
    if let Ok(location) = HeaderValue::from_str(&format!("/{}", paste.id)) {
        response
            .headers_mut()
            .insert(header::CONTENT_LOCATION, location);
    }
    with_expiry_header(response, paste)
}

fn content_type_for(content: &[u8]) -> HeaderValue {
    if std::str::from_utf8(content).is_ok() {
        HeaderValue::from_static("text/plain; charset=utf-8")
    } else {
        HeaderValue::from_static("application/octet-stream")
    }
}

/// Create a system-named paste.
///
/// # Errors
/// 401 for an unknown bearer token, 400 for empty content or a bad/non-positive
/// TTL, 413 for anonymous content over the limit, 409 on an id collision.
pub async fn create_regular(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, HttpError> {
    let token = bearer_token(&headers);
    let ttl = requested_ttl(&headers, state.service.now(), state.service.default_ttl())?;
    if ttl <= Duration::zero() {
        return Err(AppError::InvalidRequest("expiry must be in the future".to_string()).into());
    }

    let paste = state.service.create_regular(&token, body.to_vec(), ttl)?;
    Ok(created_response(&headers, &paste))
}

/// Create a caller-named paste at `/:id`.
///
/// Without expiry headers the paste never expires.
///
/// # Errors
/// 401 without a valid token, 400 for empty content or bad headers, 409 when
/// the id is taken.
pub async fn create_persistent(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, HttpError> {
    let token = bearer_token(&headers);
    let ttl = requested_ttl(&headers, state.service.now(), Duration::zero())?;

    let paste = state
        .service
        .create_persistent(&token, &id, body.to_vec(), ttl)?;
    Ok(created_response(&headers, &paste))
}

/// Fetch raw paste content.
///
/// # Errors
/// 404 when the paste is missing or already expired.
pub async fn get_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, HttpError> {
    let paste = state.service.get_live(&id)?;
    let content_type = content_type_for(&paste.content);
    let expires = expires_at_value(&paste);
    let mut response = paste.content.into_response();
    let response_headers = response.headers_mut();
    response_headers.insert(header::CONTENT_TYPE, content_type);
    response_headers.insert(EXPIRES_AT, expires);
    Ok(response)
}

/// Replace content and/or extend the lifetime of a paste.
///
/// An empty body keeps the current content; no expiry header keeps the
/// current expiry.
///
/// # Errors
/// 401 without a valid token, 400 for bad headers, 404 when missing or expired.
pub async fn update_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, HttpError> {
    let token = bearer_token(&headers);
    let ttl = requested_ttl(&headers, state.service.now(), Duration::zero())?;

    let changes = PasteUpdate {
        content: (!body.is_empty()).then(|| body.to_vec()),
        ttl: Some(ttl),
    };
    let paste = state.service.update_with(&token, &id, changes)?;
    Ok(with_expiry_header(StatusCode::OK.into_response(), &paste))
}

/// Delete a paste.
///
/// # Errors
/// 401 without a valid token, 404 when missing.
pub async fn delete_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, HttpError> {
    let token = bearer_token(&headers);
    state.service.delete(&token, &id)?;
    Ok(StatusCode::OK)
}
