//! loanbook Library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod auth;
pub mod domain;
pub mod gateway;
pub mod handlers;
pub mod validation;

// Modules used primarily by the binary
pub mod config;
pub mod db;
mod error;

pub use config::Config;
pub use domain::{Error, ErrorKind, Loan, LoanError, LoanStatus, OperationResult};
pub use error::{AppError, AppResult};
