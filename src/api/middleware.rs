//! API Middleware
//!
//! Bearer-token authentication and request logging middleware.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::auth::AuthError;

use super::AppState;

/// The client authenticated for the current request.
#[derive(Debug, Clone)]
pub struct AuthenticatedClient {
    pub client_id: String,
}

// =========================================================================
// Bearer-token authentication middleware
// =========================================================================

/// Extract and verify the bearer token from the Authorization header.
pub async fn auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let token = match token {
        Some(token) => token,
        None => {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Missing bearer token",
                    "error_code": "missing_token"
                })),
            )
                .into_response());
        }
    };

    let claims = match state.tokens.verify(token) {
        Ok(claims) => claims,
        Err(e) => {
            let error_code = match e {
                AuthError::Expired => "token_expired",
                AuthError::Malformed | AuthError::BadSignature => "invalid_token",
            };
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": e.to_string(),
                    "error_code": error_code
                })),
            )
                .into_response());
        }
    };

    request.extensions_mut().insert(AuthenticatedClient {
        client_id: claims.client_id,
    });

    Ok(next.run(request).await)
}

// =========================================================================
// Request logging middleware
// =========================================================================

/// Headers that should be masked in logs
const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "set-cookie"];

/// Mask sensitive headers for logging
pub fn mask_headers_for_logging(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let name_lower = name.as_str().to_lowercase();
            let masked_value = if SENSITIVE_HEADERS.contains(&name_lower.as_str()) {
                "[REDACTED]".to_string()
            } else {
                value.to_str().unwrap_or("[invalid utf8]").to_string()
            };
            (name.to_string(), masked_value)
        })
        .collect()
}

/// Request logging middleware
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let headers = mask_headers_for_logging(request.headers());

    let start = std::time::Instant::now();

    tracing::info!(
        method = %method,
        uri = %uri,
        headers = ?headers,
        "Incoming request"
    );

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = %duration.as_millis(),
        "Request completed"
    );

    response
}
