//! Aggregate module
//!
//! Entities of the company and transaction contexts.

use chrono::{DateTime, Duration, Utc};

pub mod company;
pub mod membership;
pub mod transaction;

pub use company::{Company, CompanyData};
pub use membership::{Membership, MembershipData};
pub use transaction::{Transaction, TransactionData};

/// Trait that all aggregates implement
pub trait Aggregate {
    /// Get the aggregate type name (used in storage error context)
    fn aggregate_type() -> &'static str;

    /// Get the aggregate ID
    fn id(&self) -> &str;
}

/// Blank means empty or whitespace only
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Start of the `days` long window ending at `now`. A negative `days` is an
/// empty window starting at `now`. `None` when the start falls before the
/// earliest representable time, i.e. the window is unbounded.
pub(crate) fn days_before(now: DateTime<Utc>, days: i64) -> Option<DateTime<Utc>> {
    Duration::try_days(days.max(0)).and_then(|span| now.checked_sub_signed(span))
}
