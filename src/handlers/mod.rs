//! Command and query handlers
//!
//! Each handler orchestrates validation, aggregate mutation or read, and
//! persistence through the gateway, mapping every outcome into the
//! classified result model.

mod commands;
mod create_handler;
mod payment_handler;
mod queries;


pub use commands::{CreateLoanCommand, RegisterPaymentCommand};
pub use create_handler::CreateLoanHandler;
pub use payment_handler::RegisterPaymentHandler;
pub use queries::{LoanDetails, LoanListItem, LoanQueries};
