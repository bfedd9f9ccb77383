//! Register Company Membership Handler
//!
//! Registers a new company together with its PENDING membership request.

use crate::aggregate::{Aggregate, Company, Membership};
use crate::db::{DbPool, TransactionManager};
use crate::domain::DomainError;
use crate::error::{AppError, AppResult};
use crate::id::{IdGenerator, UuidGenerator};
use crate::repository::{
    CompanyRepository, MembershipRepository, RepositoryError, SqliteCompanyRepository,
    SqliteMembershipRepository,
};

use super::{MembershipCreated, RegisterMembershipCommand};

/// Handler for company membership registration
pub struct RegisterCompanyMembershipHandler<C, M, G> {
    companies: C,
    memberships: M,
    ids: G,
    tx_manager: TransactionManager,
}

impl
    RegisterCompanyMembershipHandler<
        SqliteCompanyRepository,
        SqliteMembershipRepository,
        UuidGenerator,
    >
{
    pub fn from_pool(pool: DbPool) -> Self {
        Self::new(
            SqliteCompanyRepository::new(pool.clone()),
            SqliteMembershipRepository::new(pool.clone()),
            UuidGenerator,
            TransactionManager::new(pool),
        )
    }
}

impl<C, M, G> RegisterCompanyMembershipHandler<C, M, G>
where
    C: CompanyRepository + Clone + 'static,
    M: MembershipRepository + Clone + 'static,
    G: IdGenerator,
{
    pub fn new(companies: C, memberships: M, ids: G, tx_manager: TransactionManager) -> Self {
        Self {
            companies,
            memberships,
            ids,
            tx_manager,
        }
    }

    /// Execute the registration command
    ///
    /// # Errors
    /// - `CompanyWithCuitAlreadyExists` if the CUIT is already registered,
    ///   whether found up front or rejected by the store's unique constraint
    /// - any `Company` / `Membership` validation error; nothing is written
    /// - repository errors; neither row is written
    pub async fn execute(&self, command: RegisterMembershipCommand) -> AppResult<MembershipCreated> {
        let cuit = command.cuit.trim();

        if self.companies.find_by_cuit(cuit).await?.is_some() {
            tracing::warn!(cuit = %cuit, "Registration rejected: CUIT already registered");
            return Err(DomainError::cuit_already_exists(cuit).into());
        }

        let company_id = self.ids.generate();
        let membership_id = self.ids.generate();

        let company = Company::new(company_id, &command.name, cuit, command.company_type)?;
        let membership = Membership::new(membership_id, company.id(), command.company_type)?;

        // Both rows or neither
        let companies = self.companies.clone();
        let memberships = self.memberships.clone();
        let (company_row, membership_row) = (company.clone(), membership.clone());
        self.tx_manager
            .execute(move |conn| {
                Box::pin(async move {
                    companies.save(&company_row, Some(&mut *conn)).await?;
                    memberships.save(&membership_row, Some(conn)).await?;
                    Ok::<(), RepositoryError>(())
                })
            })
            .await
            .map_err(|e: RepositoryError| {
                if e.is_unique_violation() {
                    tracing::warn!(cuit = %company.cuit(), "Registration lost a race on CUIT");
                    AppError::from(DomainError::cuit_already_exists(company.cuit()))
                } else {
                    AppError::from(e)
                }
            })?;

        tracing::info!(
            company_id = %company.id(),
            membership_id = %membership.id(),
            cuit = %company.cuit(),
            "Company membership registered"
        );

        Ok(MembershipCreated::from_entities(&company, &membership))
    }
}
