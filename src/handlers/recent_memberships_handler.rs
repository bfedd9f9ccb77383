//! Get Recent Memberships Handler
//!
//! Memberships requested in the last 30 days, joined with their companies.

use std::collections::{HashMap, HashSet};

use chrono::{Duration, Utc};

use crate::aggregate::{Aggregate, Company};
use crate::db::DbPool;
use crate::error::AppResult;
use crate::repository::{
    CompanyRepository, MembershipRepository, SqliteCompanyRepository, SqliteMembershipRepository,
};

use super::{RecentMembership, RECENT_WINDOW_DAYS};

/// Handler for the recent memberships report
pub struct GetRecentMembershipsHandler<C, M> {
    companies: C,
    memberships: M,
}

impl GetRecentMembershipsHandler<SqliteCompanyRepository, SqliteMembershipRepository> {
    pub fn from_pool(pool: DbPool) -> Self {
        Self::new(
            SqliteCompanyRepository::new(pool.clone()),
            SqliteMembershipRepository::new(pool),
        )
    }
}

impl<C: CompanyRepository, M: MembershipRepository> GetRecentMembershipsHandler<C, M> {
    pub fn new(companies: C, memberships: M) -> Self {
        Self {
            companies,
            memberships,
        }
    }

    /// Memberships newest first. A membership whose company no longer
    /// exists is left out.
    pub async fn execute(&self) -> AppResult<Vec<RecentMembership>> {
        let now = Utc::now();
        let since = now - Duration::days(RECENT_WINDOW_DAYS);

        let memberships = self.memberships.find_by_date_range(since, now).await?;
        if memberships.is_empty() {
            tracing::debug!("No recent memberships found");
            return Ok(Vec::new());
        }

        let mut seen = HashSet::new();
        let company_ids: Vec<String> = memberships
            .iter()
            .map(|membership| membership.company_id())
            .filter(|company_id| seen.insert(*company_id))
            .map(str::to_string)
            .collect();

        let companies = self.companies.find_by_ids(&company_ids).await?;
        let companies_by_id: HashMap<&str, &Company> = companies
            .iter()
            .map(|company| (company.id(), company))
            .collect();

        let result: Vec<RecentMembership> = memberships
            .iter()
            .filter_map(|membership| {
                companies_by_id
                    .get(membership.company_id())
                    .map(|company| RecentMembership::from_entities(company, membership))
            })
            .collect();

        tracing::info!(count = result.len(), "Recent memberships retrieved");
        Ok(result)
    }
}
