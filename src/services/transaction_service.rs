//! Transaction application service

use std::collections::HashMap;

use crate::db::DbPool;
use crate::repository::{RepositoryResult, SqliteTransactionRepository, TransactionRepository};

use super::TransferActivity;

/// Transaction context facade over a [`TransactionRepository`]
#[derive(Debug, Clone)]
pub struct TransactionService<R> {
    transactions: R,
}

impl<R: TransactionRepository> TransactionService<R> {
    pub fn new(transactions: R) -> Self {
        Self { transactions }
    }
}

impl TransactionService<SqliteTransactionRepository> {
    pub fn from_pool(pool: DbPool) -> Self {
        Self::new(SqliteTransactionRepository::new(pool))
    }
}

impl<R: TransactionRepository> TransferActivity for TransactionService<R> {
    async fn company_ids_with_recent_transfers(&self, days_ago: i64) -> RepositoryResult<Vec<String>> {
        tracing::debug!(days_ago, "Looking up companies with recent transfers");

        let company_ids = self
            .transactions
            .find_companies_with_recent_transfers(days_ago)
            .await?;

        tracing::debug!(count = company_ids.len(), "Companies with recent transfers found");
        Ok(company_ids)
    }

    async fn transfer_counts_by_company_ids(
        &self,
        company_ids: &[String],
        days_ago: i64,
    ) -> RepositoryResult<HashMap<String, i64>> {
        tracing::debug!(
            companies = company_ids.len(),
            days_ago,
            "Counting recent transfers"
        );

        let counts = self
            .transactions
            .count_recent_transfers_by_company_ids(company_ids, days_ago)
            .await?;

        tracing::debug!(companies = counts.len(), "Transfer counts retrieved");
        Ok(counts)
    }
}
