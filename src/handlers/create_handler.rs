//! Create Loan Handler
//!
//! Orchestrates validation guard, aggregate construction, and persistence
//! for new loans.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{Error, Loan, OperationResult};
use crate::gateway::LoanGateway;

use super::commands::messages;
use super::CreateLoanCommand;

pub struct CreateLoanHandler {
    gateway: Box<dyn LoanGateway>,
}

impl CreateLoanHandler {
    pub fn new(gateway: Box<dyn LoanGateway>) -> Self {
        Self { gateway }
    }

    /// Execute the create-loan command, returning the new loan id.
    pub async fn execute(&mut self, command: CreateLoanCommand) -> OperationResult<Uuid> {
        tracing::info!(applicant = %command.applicant_name, "Starting loan creation");

        if command.amount <= Decimal::ZERO || command.current_balance < Decimal::ZERO {
            tracing::warn!(applicant = %command.applicant_name, "Invalid loan request");
            return Err(Error::validation(
                messages::LOAN_AMOUNT_AND_BALANCE_MUST_BE_POSITIVE,
            ));
        }

        let loan = Loan::create(
            command.amount,
            command.current_balance,
            command.applicant_name,
        )
        .map_err(|e| Error::validation(e.to_string()))?;

        self.persist(&loan).await?;

        tracing::info!(
            applicant = %loan.applicant_name(),
            loan_id = %loan.id(),
            "Loan created successfully"
        );

        Ok(loan.id())
    }

    async fn persist(&mut self, loan: &Loan) -> OperationResult<()> {
        let staged = self.gateway.add_loan(loan).await;
        let committed = match staged {
            Ok(()) => self.gateway.commit().await,
            Err(e) => Err(e),
        };

        committed
            .map(|_| ())
            .map_err(|e| {
                tracing::error!(
                    applicant = %loan.applicant_name(),
                    error = %e,
                    "Failed to persist loan"
                );
                Error::internal(messages::LOAN_SAVE_INTERNAL_ERROR)
            })
    }
}
