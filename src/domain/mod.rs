//! Domain module
//!
//! Core domain types and business rules.

pub mod loan;
pub mod outcome;

pub use loan::{Loan, LoanError, LoanStatus};
pub use outcome::{Error, ErrorKind, OperationResult};
