//! API module
//!
//! HTTP endpoints, middleware, and application assembly.

use std::sync::Arc;

use axum::{routing::get, routing::post, Router};
use tower_http::trace::TraceLayer;

use crate::auth::TokenService;
use crate::gateway::GatewayProvider;

pub mod middleware;
pub mod routes;

/// Shared state for all routes.
#[derive(Clone)]
pub struct AppState {
    /// Opens one persistence unit of work per request.
    pub gateways: Arc<dyn GatewayProvider>,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(gateways: Arc<dyn GatewayProvider>, tokens: TokenService) -> Self {
        Self { gateways, tokens }
    }
}

/// Assemble the application router.
///
/// Loan routes sit behind the auth middleware; token issuance and the health
/// check are the only unauthenticated endpoints.
pub fn app(state: AppState) -> Router {
    // Axum layers run in reverse order of addition: logging -> auth -> handler
    let protected_routes = routes::loan_routes()
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::logging_middleware));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/token", post(routes::issue_token))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
