//! Command definitions
//!
//! Commands represent intentions to change the system state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Command to create a new loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoanCommand {
    pub amount: Decimal,
    pub current_balance: Decimal,
    pub applicant_name: String,
}

/// Command to register a balance-reducing payment against a loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPaymentCommand {
    pub loan_id: Uuid,
    pub amount: Decimal,
}

/// User-facing messages for classified handler failures.
pub(crate) mod messages {
    pub const LOAN_AMOUNT_AND_BALANCE_MUST_BE_POSITIVE: &str =
        "Loan amount and balance must be greater than zero.";
    pub const LOAN_SAVE_INTERNAL_ERROR: &str =
        "An unexpected error occurred while saving the loan.";
    pub const LOAN_NOT_FOUND: &str = "Loan not found.";
    pub const PAYMENT_REGISTRATION_FAILED: &str =
        "An unexpected error occurred while processing the payment.";
}
