//! Validation pipeline
//!
//! Pure, side-effect-free rule sets evaluated against incoming commands
//! before a handler touches the gateway or the aggregate. All violations
//! are collected per field and reported together, not short-circuited.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::handlers::{CreateLoanCommand, RegisterPaymentCommand};

/// Maximum applicant name length accepted by the create validator.
/// The storage column allows 150; the API contract is stricter.
const APPLICANT_NAME_MAX_LEN: usize = 100;

/// Mapping from field name to the list of violation messages for that field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Violation messages recorded for a field, if any.
    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Rules for the create-loan command.
pub fn validate_create_loan(command: &CreateLoanCommand) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if command.amount <= Decimal::ZERO {
        errors.add("amount", "Amount must be greater than zero.");
    }

    if command.current_balance < Decimal::ZERO {
        errors.add("currentBalance", "Current balance must be zero or more.");
    } else if command.current_balance > command.amount {
        errors.add(
            "currentBalance",
            "Current balance cannot exceed the loan amount.",
        );
    }

    if command.applicant_name.trim().is_empty() {
        errors.add("applicantName", "Applicant name is required.");
    } else if command.applicant_name.chars().count() > APPLICANT_NAME_MAX_LEN {
        errors.add(
            "applicantName",
            "Applicant name must not exceed 100 characters.",
        );
    }

    errors.into_result()
}

/// Rules for the register-payment command.
pub fn validate_register_payment(command: &RegisterPaymentCommand) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if command.loan_id.is_nil() {
        errors.add("loanId", "Loan ID is required.");
    }

    if command.amount <= Decimal::ZERO {
        errors.add("amount", "Payment amount must be greater than zero.");
    }

    errors.into_result()
}
