//! Loan Aggregate
//!
//! Loan is the aggregate root for the lending domain. It owns the numeric
//! invariants (positive principal, balance bounded by the principal) and the
//! status derivation rule. State is only mutated through `register_payment`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Loan status, derived from the current balance.
///
/// Persisted as a small integer; the discriminants match the stored codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    Active = 1,
    Paid = 2,
}

impl LoanStatus {
    /// Storage code for the status column.
    pub fn code(self) -> i16 {
        self as i16
    }

    /// Decode a stored status value. Unknown codes fall back to `Active`.
    pub fn from_code(code: i16) -> Self {
        match code {
            2 => Self::Paid,
            _ => Self::Active,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Paid => "Paid",
        }
    }
}

/// Errors raised by the aggregate's guards.
///
/// Argument faults and the state fault (`AlreadyPaid`) are distinct variants
/// so handlers can classify outcomes without matching on message text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoanError {
    #[error("Loan amount must be greater than zero.")]
    NonPositiveAmount,

    #[error("Current balance cannot be negative.")]
    NegativeBalance,

    #[error("Current balance cannot exceed the loan amount.")]
    BalanceExceedsAmount,

    #[error("Applicant name is required.")]
    ApplicantNameRequired,

    #[error("Payment amount must be positive.")]
    NonPositivePayment,

    #[error("Loan is already paid.")]
    AlreadyPaid,
}

impl LoanError {
    /// True for the fault raised when the loan is in a state that forbids the
    /// operation (as opposed to a bad argument).
    pub fn is_state_fault(&self) -> bool {
        matches!(self, Self::AlreadyPaid)
    }
}

/// Loan Aggregate
///
/// Invariants:
/// - `amount > 0`, immutable after creation
/// - `0 <= current_balance <= amount` at all times
/// - `status == Paid` iff `current_balance <= 0`, recomputed after every
///   balance change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    id: Uuid,
    amount: Decimal,
    current_balance: Decimal,
    applicant_name: String,
    status: LoanStatus,
}

impl Loan {
    /// Create a new loan, validating every invariant up front.
    ///
    /// Construction fails instead of clamping; no partially valid aggregate
    /// ever exists. A fresh id is assigned on success.
    pub fn create(
        amount: Decimal,
        current_balance: Decimal,
        applicant_name: impl Into<String>,
    ) -> Result<Self, LoanError> {
        let applicant_name = applicant_name.into();

        if amount <= Decimal::ZERO {
            return Err(LoanError::NonPositiveAmount);
        }
        if current_balance < Decimal::ZERO {
            return Err(LoanError::NegativeBalance);
        }
        if current_balance > amount {
            return Err(LoanError::BalanceExceedsAmount);
        }
        if applicant_name.trim().is_empty() {
            return Err(LoanError::ApplicantNameRequired);
        }

        let mut loan = Self {
            id: Uuid::new_v4(),
            amount,
            current_balance,
            applicant_name,
            status: LoanStatus::Active,
        };
        loan.update_status();

        Ok(loan)
    }

    /// Rehydrate a loan from persisted state, trusting stored values.
    pub fn from_stored(
        id: Uuid,
        amount: Decimal,
        current_balance: Decimal,
        applicant_name: String,
        status_code: i16,
    ) -> Self {
        Self {
            id,
            amount,
            current_balance,
            applicant_name,
            status: LoanStatus::from_code(status_code),
        }
    }

    /// Apply a balance-reducing payment.
    ///
    /// The balance floors at zero: paying more than the outstanding balance
    /// succeeds and the excess is absorbed, not tracked or refunded. A loan
    /// that is already paid rejects further payments and keeps its balance.
    pub fn register_payment(&mut self, amount: Decimal) -> Result<(), LoanError> {
        if amount <= Decimal::ZERO {
            return Err(LoanError::NonPositivePayment);
        }
        if self.is_paid() {
            return Err(LoanError::AlreadyPaid);
        }

        self.current_balance = (self.current_balance - amount).max(Decimal::ZERO);
        self.update_status();

        Ok(())
    }

    pub fn is_paid(&self) -> bool {
        self.current_balance <= Decimal::ZERO
    }

    fn update_status(&mut self) {
        self.status = if self.is_paid() {
            LoanStatus::Paid
        } else {
            LoanStatus::Active
        };
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn current_balance(&self) -> Decimal {
        self.current_balance
    }

    pub fn applicant_name(&self) -> &str {
        &self.applicant_name
    }

    pub fn status(&self) -> LoanStatus {
        self.status
    }
}
