//! Use-case handlers
//!
//! Each handler orchestrates aggregates and repositories for one operation
//! of the company context.

mod commands;
mod recent_memberships_handler;
mod recent_transfers_handler;
mod register_membership_handler;


pub use commands::*;
pub use recent_memberships_handler::GetRecentMembershipsHandler;
pub use recent_transfers_handler::GetCompaniesWithRecentTransfersHandler;
pub use register_membership_handler::RegisterCompanyMembershipHandler;

/// Reporting window, in days, of the two read use cases
pub const RECENT_WINDOW_DAYS: i64 = 30;
