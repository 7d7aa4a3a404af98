//! Token HTTP handlers.

use super::headers::bearer_token;
use crate::{error::HttpError, AppState};
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};

/// Mint a new token; the body is the token itself.
///
/// # Errors
/// 401 unless the request carries a valid bearer token.
pub async fn create_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<String, HttpError> {
    let access_token = bearer_token(&headers);
    Ok(state.service.create_token(&access_token)?)
}

/// Revoke the token named in the path.
///
/// # Errors
/// 401 unless the request carries a valid bearer token, 404 for an unknown target.
pub async fn revoke_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, HttpError> {
    let access_token = bearer_token(&headers);
    state.service.revoke_token(&access_token, &token)?;
    Ok(StatusCode::OK)
}
