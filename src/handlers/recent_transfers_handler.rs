//! Get Companies With Recent Transfers Handler
//!
//! Companies with at least one TRANSFER in the last 30 days, with their
//! transfer counts.

use crate::aggregate::Aggregate;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::repository::{CompanyRepository, SqliteCompanyRepository, SqliteTransactionRepository};
use crate::services::{TransactionService, TransferActivity};

use super::{CompanyWithTransfers, RECENT_WINDOW_DAYS};

/// Handler for the recent transfers report
pub struct GetCompaniesWithRecentTransfersHandler<C, A> {
    companies: C,
    activity: A,
}

impl
    GetCompaniesWithRecentTransfersHandler<
        SqliteCompanyRepository,
        TransactionService<SqliteTransactionRepository>,
    >
{
    pub fn from_pool(pool: DbPool) -> Self {
        Self::new(
            SqliteCompanyRepository::new(pool.clone()),
            TransactionService::from_pool(pool),
        )
    }
}

impl<C: CompanyRepository, A: TransferActivity> GetCompaniesWithRecentTransfersHandler<C, A> {
    pub fn new(companies: C, activity: A) -> Self {
        Self {
            companies,
            activity,
        }
    }

    pub async fn execute(&self) -> AppResult<Vec<CompanyWithTransfers>> {
        let company_ids = self
            .activity
            .company_ids_with_recent_transfers(RECENT_WINDOW_DAYS)
            .await?;

        if company_ids.is_empty() {
            tracing::debug!("No companies with recent transfers");
            return Ok(Vec::new());
        }

        let (companies, counts) = tokio::try_join!(
            self.companies.find_by_ids(&company_ids),
            self.activity
                .transfer_counts_by_company_ids(&company_ids, RECENT_WINDOW_DAYS),
        )?;

        let result: Vec<CompanyWithTransfers> = companies
            .iter()
            .map(|company| {
                let count = counts.get(company.id()).copied().unwrap_or(0);
                CompanyWithTransfers::from_entity(company, count)
            })
            .collect();

        tracing::info!(count = result.len(), "Companies with recent transfers retrieved");
        Ok(result)
    }
}
