//! API Routes
//!
//! HTTP endpoint definitions. Each loan route runs the validation pipeline,
//! opens a fresh unit of work, and hands off to the matching handler; the
//! boundary maps classified outcomes to transport status codes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::error::AppError;
use crate::handlers::{
    CreateLoanCommand, CreateLoanHandler, LoanQueries, RegisterPaymentCommand,
    RegisterPaymentHandler,
};
use crate::validation;

use super::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPaymentRequest {
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientAuthRequest {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

// =========================================================================
// Routers
// =========================================================================

/// Loan routes; mounted behind the auth middleware.
pub fn loan_routes() -> Router<AppState> {
    Router::new()
        .route("/loans", post(create_loan).get(list_loans))
        .route("/loans/:id", get(get_loan))
        .route("/loans/:id/payment", post(register_payment))
}

// =========================================================================
// POST /auth/token
// =========================================================================

/// Issue a bearer token for a known client.
pub async fn issue_token(
    State(state): State<AppState>,
    Json(request): Json<ClientAuthRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    if !state
        .tokens
        .validate_client(&request.client_id, &request.client_secret)
    {
        return Err(AppError::InvalidClientCredentials);
    }

    let issued = state.tokens.issue(&request.client_id);

    Ok(Json(TokenResponse {
        access_token: issued.token,
        expires_in: issued.expires_in,
    }))
}

// =========================================================================
// POST /loans
// =========================================================================

/// Create a new loan, returning its id.
async fn create_loan(
    State(state): State<AppState>,
    Json(command): Json<CreateLoanCommand>,
) -> Result<Json<Uuid>, AppError> {
    validation::validate_create_loan(&command)?;

    let mut handler = CreateLoanHandler::new(state.gateways.open());
    let loan_id = handler.execute(command).await?;

    Ok(Json(loan_id))
}

// =========================================================================
// GET /loans/:id
// =========================================================================

/// Get loan details by id.
async fn get_loan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let mut queries = LoanQueries::new(state.gateways.open());

    match queries.get_by_id(id).await? {
        Some(details) => Ok(Json(details).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Loan with ID {} was not found.", id) })),
        )
            .into_response()),
    }
}

// =========================================================================
// GET /loans
// =========================================================================

/// List all loans ordered by applicant name; 204 when there are none.
async fn list_loans(State(state): State<AppState>) -> Result<Response, AppError> {
    let mut queries = LoanQueries::new(state.gateways.open());
    let loans = queries.list_all().await?;

    if loans.is_empty() {
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Ok(Json(loans).into_response())
    }
}

// =========================================================================
// POST /loans/:id/payment
// =========================================================================

/// Register a payment against a loan.
async fn register_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RegisterPaymentRequest>,
) -> Result<StatusCode, AppError> {
    let command = RegisterPaymentCommand {
        loan_id: id,
        amount: request.amount,
    };
    validation::validate_register_payment(&command)?;

    let mut handler = RegisterPaymentHandler::new(state.gateways.open());
    handler.execute(command).await?;

    Ok(StatusCode::NO_CONTENT)
}
