//! company_membership Library
//!
//! Re-exports modules for integration testing and the binaries.

pub mod aggregate;
pub mod api;
pub mod domain;
pub mod handlers;
pub mod id;
pub mod repository;
pub mod services;

pub mod config;
pub mod db;
mod error;

pub use config::Config;
pub use domain::{Amount, CompanyType, DomainError, MembershipStatus, TransactionStatus, TransactionType};
pub use error::{AppError, AppResult};
