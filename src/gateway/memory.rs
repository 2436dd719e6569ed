//! In-memory gateway
//!
//! Keeps committed loans in a shared map while staging stays per-gateway,
//! mirroring the unit-of-work behavior of the Postgres implementation.
//! Used by handler unit tests and the router-level end-to-end tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::Loan;

use super::{GatewayError, GatewayProvider, LoanGateway};

/// Shared in-memory loan storage.
#[derive(Default)]
pub struct MemoryGatewayProvider {
    loans: Arc<Mutex<BTreeMap<Uuid, Loan>>>,
    fail_commits: bool,
}

impl MemoryGatewayProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider whose gateways fail every `commit`, for exercising the
    /// persistence-fault classification in handlers.
    pub fn failing() -> Self {
        Self {
            loans: Arc::default(),
            fail_commits: true,
        }
    }

    /// A failing provider that shares this one's committed loans, so tests
    /// can seed state through working gateways and then hit commit faults.
    pub fn failing_view(&self) -> Self {
        Self {
            loans: Arc::clone(&self.loans),
            fail_commits: true,
        }
    }
}

impl GatewayProvider for MemoryGatewayProvider {
    fn open(&self) -> Box<dyn LoanGateway> {
        Box::new(MemoryLoanGateway {
            loans: Arc::clone(&self.loans),
            staged: Vec::new(),
            fail_commits: self.fail_commits,
        })
    }
}

pub struct MemoryLoanGateway {
    loans: Arc<Mutex<BTreeMap<Uuid, Loan>>>,
    staged: Vec<Loan>,
    fail_commits: bool,
}

#[async_trait]
impl LoanGateway for MemoryLoanGateway {
    async fn add_loan(&mut self, loan: &Loan) -> Result<(), GatewayError> {
        self.staged.push(loan.clone());
        Ok(())
    }

    async fn get_loan_by_id(&mut self, id: Uuid) -> Result<Option<Loan>, GatewayError> {
        Ok(self.loans.lock().await.get(&id).cloned())
    }

    async fn list_loans(&mut self) -> Result<Vec<Loan>, GatewayError> {
        Ok(self.loans.lock().await.values().cloned().collect())
    }

    async fn commit(&mut self) -> Result<u64, GatewayError> {
        if self.fail_commits {
            return Err(GatewayError::Unavailable(
                "commit failure injected for tests".to_string(),
            ));
        }

        let mut loans = self.loans.lock().await;
        let written = self.staged.len() as u64;
        for loan in self.staged.drain(..) {
            loans.insert(loan.id(), loan);
        }

        Ok(written)
    }
}
