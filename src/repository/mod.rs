//! Repository module
//!
//! Persistence contracts for the three aggregates and their SQLite
//! implementations. Handlers depend on the traits; the server wires the
//! `Sqlite*` types.

mod company;
mod error;
mod membership;
mod transaction;

use std::collections::HashMap;
use std::future::Future;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::aggregate::{days_before, Company, Membership, Transaction};
use crate::db::DbConnection;
use crate::domain::MembershipStatus;

pub use company::SqliteCompanyRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use membership::SqliteMembershipRepository;
pub use transaction::SqliteTransactionRepository;

// ---------------------------------------------------------------------------
// Company
// ---------------------------------------------------------------------------

pub trait CompanyRepository: Send + Sync {
    /// Insert or update a company. With `conn`, the write joins the caller's
    /// open transaction.
    fn save(
        &self,
        company: &Company,
        conn: Option<&mut DbConnection>,
    ) -> impl Future<Output = RepositoryResult<()>> + Send;
    fn find_by_id(&self, id: &str) -> impl Future<Output = RepositoryResult<Option<Company>>> + Send;
    fn find_by_cuit(
        &self,
        cuit: &str,
    ) -> impl Future<Output = RepositoryResult<Option<Company>>> + Send;
    /// Companies for the given ids; unknown ids are skipped.
    fn find_by_ids(&self, ids: &[String])
        -> impl Future<Output = RepositoryResult<Vec<Company>>> + Send;
    fn find_all(&self) -> impl Future<Output = RepositoryResult<Vec<Company>>> + Send;
    fn delete(&self, id: &str) -> impl Future<Output = RepositoryResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

pub trait MembershipRepository: Send + Sync {
    fn save(
        &self,
        membership: &Membership,
        conn: Option<&mut DbConnection>,
    ) -> impl Future<Output = RepositoryResult<()>> + Send;
    fn find_by_id(
        &self,
        id: &str,
    ) -> impl Future<Output = RepositoryResult<Option<Membership>>> + Send;
    fn find_by_company_id(
        &self,
        company_id: &str,
    ) -> impl Future<Output = RepositoryResult<Vec<Membership>>> + Send;
    /// Memberships requested in `[start, end]`, newest first.
    fn find_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> impl Future<Output = RepositoryResult<Vec<Membership>>> + Send;
    fn find_by_status(
        &self,
        status: MembershipStatus,
    ) -> impl Future<Output = RepositoryResult<Vec<Membership>>> + Send;
    fn delete(&self, id: &str) -> impl Future<Output = RepositoryResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

pub trait TransactionRepository: Send + Sync {
    /// Distinct ids of companies with at least one TRANSFER in the last
    /// `days_ago` days.
    fn find_companies_with_recent_transfers(
        &self,
        days_ago: i64,
    ) -> impl Future<Output = RepositoryResult<Vec<String>>> + Send;
    /// TRANSFER count per company over the last `days_ago` days. Companies
    /// without transfers are absent from the map.
    fn count_recent_transfers_by_company_ids(
        &self,
        company_ids: &[String],
        days_ago: i64,
    ) -> impl Future<Output = RepositoryResult<HashMap<String, i64>>> + Send;
    fn find_recent_by_company_ids(
        &self,
        company_ids: &[String],
        days_ago: i64,
    ) -> impl Future<Output = RepositoryResult<Vec<Transaction>>> + Send;
    fn find_by_company_id(
        &self,
        company_id: &str,
    ) -> impl Future<Output = RepositoryResult<Vec<Transaction>>> + Send;
    fn find_by_id(
        &self,
        id: &str,
    ) -> impl Future<Output = RepositoryResult<Option<Transaction>>> + Send;
    fn save(&self, transaction: &Transaction) -> impl Future<Output = RepositoryResult<()>> + Send;
}

/// Column encoding for timestamps. Fixed-width UTC text so that SQL string
/// comparison orders the same way as time.
pub(crate) fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Decode a stored timestamp column
pub(crate) fn parse_timestamp(
    operation: &'static str,
    entity_type: &'static str,
    value: &str,
) -> RepositoryResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|e| {
            RepositoryError::invalid_stored_data(
                operation,
                entity_type,
                format!("invalid timestamp '{value}': {e}"),
            )
        })
}

/// Lower bound of a "last `days_ago` days" window
pub(crate) fn window_start(days_ago: i64) -> String {
    match days_before(Utc::now(), days_ago) {
        Some(since) => timestamp(since),
        // Unbounded: every stored timestamp sorts after ""
        None => String::new(),
    }
}
