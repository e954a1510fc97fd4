use crate::server::AppState;
use crate::server::error::ApiError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "api_key";

/// Rejects the request unless `api_key` matches the configured secret.
///
/// With no secret configured every request is rejected.
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.api_key.as_deref() else {
        return Err(ApiError::Forbidden);
    };

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::Forbidden)?;

    if provided != expected {
        return Err(ApiError::Forbidden);
    }

    Ok(next.run(request).await)
}
