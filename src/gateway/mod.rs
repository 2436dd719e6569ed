//! Persistence gateway
//!
//! The only seam through which handlers reach storage. One gateway instance
//! is opened per request and doubles as the unit of work: `add_loan` stages
//! an insert-or-update, `commit` flushes everything staged in one atomic
//! write. A request canceled before `commit` persists nothing.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Loan;

pub mod memory;
pub mod postgres;

pub use memory::MemoryGatewayProvider;
pub use postgres::PgGatewayProvider;

/// Storage-layer fault.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Per-request persistence contract.
///
/// Handlers depend on these four operations and nothing else; the concrete
/// storage engine stays behind this trait.
#[async_trait]
pub trait LoanGateway: Send {
    /// Stage a loan for persistence. New loans are inserted, existing loans
    /// (same id) are updated. Nothing is written until `commit`.
    async fn add_loan(&mut self, loan: &Loan) -> Result<(), GatewayError>;

    /// Load a loan by id from committed state.
    async fn get_loan_by_id(&mut self, id: Uuid) -> Result<Option<Loan>, GatewayError>;

    /// Load all committed loans.
    async fn list_loans(&mut self) -> Result<Vec<Loan>, GatewayError>;

    /// Atomically flush all staged records. Returns the number of rows
    /// written; either everything staged is persisted or nothing is.
    async fn commit(&mut self) -> Result<u64, GatewayError>;
}

/// Opens a fresh gateway (unit of work) for each request.
pub trait GatewayProvider: Send + Sync {
    fn open(&self) -> Box<dyn LoanGateway>;
}
