//! Application services
//!
//! Facades one context exposes to another. The company context reads
//! transfer activity only through [`TransferActivity`].

mod transaction_service;

use std::collections::HashMap;
use std::future::Future;

use crate::repository::RepositoryResult;

pub use transaction_service::TransactionService;

/// Transfer activity as seen from outside the transaction context
pub trait TransferActivity: Send + Sync {
    /// Ids of companies with at least one TRANSFER in the last `days_ago` days
    fn company_ids_with_recent_transfers(
        &self,
        days_ago: i64,
    ) -> impl Future<Output = RepositoryResult<Vec<String>>> + Send;

    /// TRANSFER count per company over the last `days_ago` days
    fn transfer_counts_by_company_ids(
        &self,
        company_ids: &[String],
        days_ago: i64,
    ) -> impl Future<Output = RepositoryResult<HashMap<String, i64>>> + Send;
}
