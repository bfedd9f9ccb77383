//! Domain module
//!
//! Core domain types and business rules shared by the company and
//! transaction contexts.

pub mod amount;
pub mod error;
pub mod types;

pub use amount::Amount;
pub use error::DomainError;
pub use types::{CompanyType, MembershipStatus, ParseEnumError, TransactionStatus, TransactionType};
