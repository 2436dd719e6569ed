//! End-to-end API tests
//!
//! Drive the full router (auth middleware included) against the in-memory
//! gateway, so no database is required.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt;
use uuid::Uuid;

use loanbook::api::{self, AppState};
use loanbook::auth::TokenService;
use loanbook::gateway::MemoryGatewayProvider;

fn test_app() -> Router {
    let clients = HashMap::from([("portal".to_string(), "portal-secret".to_string())]);
    let state = AppState::new(
        Arc::new(MemoryGatewayProvider::new()),
        TokenService::new("test-signing-secret", 60, clients),
    );
    api::app(state)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).expect("request builds")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn issue_token(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/token",
            None,
            json!({"clientId": "portal", "clientSecret": "portal-secret"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK, "Token issuance failed");

    let body = body_json(response).await;
    assert!(body["expiresIn"].as_i64().unwrap() > 0);
    body["accessToken"].as_str().unwrap().to_string()
}

async fn create_loan(app: &Router, token: &str, body: Value) -> Uuid {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/loans", Some(token), body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK, "Loan creation failed");

    let body = body_json(response).await;
    body.as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_loan_endpoints_require_bearer_token() {
    let app = test_app();

    let response = app.clone().oneshot(get_request("/loans", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(get_request("/loans", Some("garbage-token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error_code"], "invalid_token");
}

#[tokio::test]
async fn test_token_issuance_rejects_unknown_client() {
    let app = test_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/auth/token",
            None,
            json!({"clientId": "portal", "clientSecret": "wrong"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_is_unauthenticated() {
    let app = test_app();
    let response = app.oneshot(get_request("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_loan_lifecycle_e2e() {
    let app = test_app();
    let token = issue_token(&app).await;

    // 1. Create a loan
    let loan_id = create_loan(
        &app,
        &token,
        json!({"amount": "1500", "currentBalance": "500", "applicantName": "Maria Silva"}),
    )
    .await;

    // 2. Read it back
    let response = app
        .clone()
        .oneshot(get_request(&format!("/loans/{}", loan_id), Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let details = body_json(response).await;
    assert_eq!(details["applicantName"], "Maria Silva");
    assert_eq!(details["status"], "Active");

    // 3. Pay off the full balance
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/loans/{}/payment", loan_id),
            Some(&token),
            json!({"amount": "500"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // 4. The loan is now paid with a zero balance
    let response = app
        .clone()
        .oneshot(get_request(&format!("/loans/{}", loan_id), Some(&token)))
        .await
        .unwrap();
    let details = body_json(response).await;
    assert_eq!(details["status"], "Paid");
    assert_eq!(details["currentBalance"], "0");
    assert_eq!(details["amount"], "1500");
}

#[tokio::test]
async fn test_payment_on_paid_loan_conflicts() {
    let app = test_app();
    let token = issue_token(&app).await;

    let loan_id = create_loan(
        &app,
        &token,
        json!({"amount": "1000", "currentBalance": "100", "applicantName": "Bob"}),
    )
    .await;

    let pay = |amount: &str| {
        json_request(
            "POST",
            &format!("/loans/{}/payment", loan_id),
            Some(&token),
            json!({ "amount": amount }),
        )
    };

    let response = app.clone().oneshot(pay("100")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.clone().oneshot(pay("1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Loan is already paid.");
    assert_eq!(body["error_code"], "conflict");
}

#[tokio::test]
async fn test_create_loan_validation_failure_reports_all_fields() {
    let app = test_app();
    let token = issue_token(&app).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/loans",
            Some(&token),
            json!({"amount": "-10", "currentBalance": "-1", "applicantName": ""}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["title"], "Validation Failed");
    assert_eq!(body["errors"]["amount"][0], "Amount must be greater than zero.");
    assert_eq!(
        body["errors"]["currentBalance"][0],
        "Current balance must be zero or more."
    );
    assert_eq!(
        body["errors"]["applicantName"][0],
        "Applicant name is required."
    );
}

#[tokio::test]
async fn test_payment_on_unknown_loan_is_404() {
    let app = test_app();
    let token = issue_token(&app).await;

    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/loans/{}/payment", Uuid::new_v4()),
            Some(&token),
            json!({"amount": "100"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Loan not found.");
}

#[tokio::test]
async fn test_get_unknown_loan_is_404() {
    let app = test_app();
    let token = issue_token(&app).await;
    let unknown = Uuid::new_v4();

    let response = app
        .oneshot(get_request(&format!("/loans/{}", unknown), Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(
        body["error"],
        format!("Loan with ID {} was not found.", unknown)
    );
}

#[tokio::test]
async fn test_list_loans_sorted_and_empty_list_is_no_content() {
    let app = test_app();
    let token = issue_token(&app).await;

    // Empty store -> 204
    let response = app.clone().oneshot(get_request("/loans", Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    for (amount, name) in [("1000", "charlie"), ("2000", "Alice"), ("3000", "Bob")] {
        create_loan(
            &app,
            &token,
            json!({"amount": amount, "currentBalance": "100", "applicantName": name}),
        )
        .await;
    }

    let response = app.clone().oneshot(get_request("/loans", Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["applicantName"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Alice", "Bob", "charlie"]);
}
