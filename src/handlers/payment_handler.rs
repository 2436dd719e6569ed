//! Register Payment Handler
//!
//! Loads the loan, applies the payment through the aggregate, and commits.
//! Aggregate faults are translated into the classified outcome model:
//! argument faults become `Validation`, the already-paid state fault becomes
//! `Conflict`, and gateway faults become `Internal`.

use crate::domain::{Error, OperationResult};
use crate::gateway::LoanGateway;

use super::commands::messages;
use super::RegisterPaymentCommand;

pub struct RegisterPaymentHandler {
    gateway: Box<dyn LoanGateway>,
}

impl RegisterPaymentHandler {
    pub fn new(gateway: Box<dyn LoanGateway>) -> Self {
        Self { gateway }
    }

    /// Execute the register-payment command.
    pub async fn execute(&mut self, command: RegisterPaymentCommand) -> OperationResult<()> {
        tracing::info!(loan_id = %command.loan_id, "Starting payment registration");

        let loan = self
            .gateway
            .get_loan_by_id(command.loan_id)
            .await
            .map_err(|e| {
                tracing::error!(loan_id = %command.loan_id, error = %e, "Failed to load loan");
                Error::internal(messages::PAYMENT_REGISTRATION_FAILED)
            })?;

        let Some(mut loan) = loan else {
            tracing::warn!(loan_id = %command.loan_id, "Loan not found");
            return Err(Error::not_found(messages::LOAN_NOT_FOUND));
        };

        loan.register_payment(command.amount).map_err(|e| {
            if e.is_state_fault() {
                tracing::warn!(loan_id = %command.loan_id, "Payment on already paid loan");
                Error::conflict(e.to_string())
            } else {
                tracing::warn!(loan_id = %command.loan_id, error = %e, "Invalid payment");
                Error::validation(e.to_string())
            }
        })?;

        let staged = self.gateway.add_loan(&loan).await;
        let committed = match staged {
            Ok(()) => self.gateway.commit().await,
            Err(e) => Err(e),
        };

        if let Err(e) = committed {
            tracing::error!(loan_id = %command.loan_id, error = %e, "Failed to persist payment");
            return Err(Error::internal(messages::PAYMENT_REGISTRATION_FAILED));
        }

        tracing::info!(
            amount = %command.amount,
            loan_id = %command.loan_id,
            "Payment registered successfully"
        );

        Ok(())
    }
}
