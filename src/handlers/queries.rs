//! Loan queries
//!
//! Read-side handlers. The read path has no validation stage and reports
//! absence through an empty value rather than a classified error; gateway
//! faults propagate to the boundary's generic fallback.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::Loan;
use crate::gateway::{GatewayError, LoanGateway};

/// Full read view of a single loan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanDetails {
    pub id: Uuid,
    pub amount: Decimal,
    pub current_balance: Decimal,
    pub applicant_name: String,
    pub status: String,
}

/// Lightweight read view for listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanListItem {
    pub id: Uuid,
    pub applicant_name: String,
    pub current_balance: Decimal,
    pub amount: Decimal,
    pub status: String,
}

pub struct LoanQueries {
    gateway: Box<dyn LoanGateway>,
}

impl LoanQueries {
    pub fn new(gateway: Box<dyn LoanGateway>) -> Self {
        Self { gateway }
    }

    /// Fetch a single loan by id; `None` when it does not exist.
    pub async fn get_by_id(&mut self, id: Uuid) -> Result<Option<LoanDetails>, GatewayError> {
        tracing::info!(loan_id = %id, "Retrieving loan");

        let loan = self.gateway.get_loan_by_id(id).await?;
        if loan.is_none() {
            tracing::warn!(loan_id = %id, "Loan not found");
        }

        Ok(loan.map(|loan| LoanDetails {
            id: loan.id(),
            amount: loan.amount(),
            current_balance: loan.current_balance(),
            applicant_name: loan.applicant_name().to_string(),
            status: loan.status().as_str().to_string(),
        }))
    }

    /// Fetch all loans ordered by applicant name ascending. An empty list is
    /// a valid result, not an error.
    pub async fn list_all(&mut self) -> Result<Vec<LoanListItem>, GatewayError> {
        tracing::info!("Fetching all loans");

        let mut loans = self.gateway.list_loans().await?;
        loans.sort_by(|a, b| a.applicant_name().cmp(b.applicant_name()));

        let items: Vec<LoanListItem> = loans.into_iter().map(to_list_item).collect();

        tracing::info!(count = items.len(), "Loans fetched successfully");

        Ok(items)
    }
}

fn to_list_item(loan: Loan) -> LoanListItem {
    LoanListItem {
        id: loan.id(),
        applicant_name: loan.applicant_name().to_string(),
        current_balance: loan.current_balance(),
        amount: loan.amount(),
        status: loan.status().as_str().to_string(),
    }
}
