//! Integration tests for the use-case handlers against SQLite

mod common;

use company_membership::aggregate::{Aggregate, Company};
use company_membership::db::{DbConnection, TransactionManager};
use company_membership::handlers::{
    GetCompaniesWithRecentTransfersHandler, GetRecentMembershipsHandler,
    RegisterCompanyMembershipHandler, RegisterMembershipCommand,
};
use company_membership::id::UuidGenerator;
use company_membership::repository::{
    CompanyRepository, RepositoryResult, SqliteCompanyRepository, SqliteMembershipRepository,
};
use company_membership::{AppError, CompanyType, DomainError, TransactionType};

/// Company store whose CUIT lookup never finds anything, so a duplicate
/// only surfaces when the insert hits the unique constraint.
#[derive(Clone)]
struct BlindCuitLookup(SqliteCompanyRepository);

impl CompanyRepository for BlindCuitLookup {
    async fn save(&self, company: &Company, conn: Option<&mut DbConnection>) -> RepositoryResult<()> {
        self.0.save(company, conn).await
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Company>> {
        self.0.find_by_id(id).await
    }

    async fn find_by_cuit(&self, _cuit: &str) -> RepositoryResult<Option<Company>> {
        Ok(None)
    }

    async fn find_by_ids(&self, ids: &[String]) -> RepositoryResult<Vec<Company>> {
        self.0.find_by_ids(ids).await
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Company>> {
        self.0.find_all().await
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        self.0.delete(id).await
    }
}

async fn count(pool: &company_membership::db::DbPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

// =========================================================================
// Registration
// =========================================================================

#[tokio::test]
async fn test_unique_constraint_reports_duplicate_cuit() {
    let pool = common::setup_test_db().await;
    let handler = RegisterCompanyMembershipHandler::new(
        BlindCuitLookup(SqliteCompanyRepository::new(pool.clone())),
        SqliteMembershipRepository::new(pool.clone()),
        UuidGenerator,
        TransactionManager::new(pool.clone()),
    );

    handler
        .execute(RegisterMembershipCommand::new(
            "Acme SA",
            "20-12345678-9",
            CompanyType::Pyme,
        ))
        .await
        .unwrap();

    let err = handler
        .execute(RegisterMembershipCommand::new(
            "Acme Copy SA",
            "20-12345678-9",
            CompanyType::Pyme,
        ))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::Domain(DomainError::CompanyWithCuitAlreadyExists { .. })
    ));
    assert_eq!(count(&pool, "companies").await, 1);
    assert_eq!(count(&pool, "memberships").await, 1);
}

#[tokio::test]
async fn test_failed_membership_insert_rolls_back_company() {
    let pool = common::setup_test_db().await;
    sqlx::query(
        "CREATE TRIGGER fail_membership BEFORE INSERT ON memberships \
         BEGIN SELECT RAISE(ABORT, 'membership insert refused'); END",
    )
    .execute(&pool)
    .await
    .unwrap();

    let err = RegisterCompanyMembershipHandler::from_pool(pool.clone())
        .execute(RegisterMembershipCommand::new(
            "Acme SA",
            "20-12345678-9",
            CompanyType::Corporate,
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Repository(_)));
    assert_eq!(count(&pool, "companies").await, 0);
    assert_eq!(count(&pool, "memberships").await, 0);
}

// =========================================================================
// Reports
// =========================================================================

#[tokio::test]
async fn test_registration_shows_up_in_recent_memberships() {
    let pool = common::setup_test_db().await;
    let old = common::insert_company(&pool, "c-old", "Legacy SA", "20-78912345-6", CompanyType::Pyme, 90).await;
    common::insert_membership(&pool, "m-old", &old, 45).await;

    let created = RegisterCompanyMembershipHandler::from_pool(pool.clone())
        .execute(RegisterMembershipCommand::new(
            "TechCorp Argentina",
            "20-12345678-9",
            CompanyType::Corporate,
        ))
        .await
        .unwrap();

    let recent = GetRecentMembershipsHandler::from_pool(pool.clone())
        .execute()
        .await
        .unwrap();

    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].id, created.membership_id);
    assert_eq!(recent[0].company_id, created.company_id);
    assert_eq!(recent[0].company_name, "TechCorp Argentina");
    assert_eq!(recent[0].membership_type, CompanyType::Corporate);
}

#[tokio::test]
async fn test_companies_with_recent_transfers() {
    let pool = common::setup_test_db().await;
    let a = common::insert_company(&pool, "c-a", "Alpha SA", "20-11111111-1", CompanyType::Pyme, 90).await;
    let b = common::insert_company(&pool, "c-b", "Beta SRL", "20-22222222-2", CompanyType::Corporate, 90).await;
    let c = common::insert_company(&pool, "c-c", "Gamma SA", "20-33333333-3", CompanyType::Pyme, 90).await;

    common::insert_transaction(&pool, "t-a1", &a, TransactionType::Transfer, 2).await;
    common::insert_transaction(&pool, "t-a2", &a, TransactionType::Transfer, 12).await;
    common::insert_transaction(&pool, "t-a3", &a, TransactionType::Deposit, 3).await;
    common::insert_transaction(&pool, "t-b1", &b, TransactionType::Transfer, 29).await;
    common::insert_transaction(&pool, "t-c1", &c, TransactionType::Transfer, 60).await;
    common::insert_transaction(&pool, "t-c2", &c, TransactionType::Deposit, 1).await;

    let mut result = GetCompaniesWithRecentTransfersHandler::from_pool(pool.clone())
        .execute()
        .await
        .unwrap();
    result.sort_by(|x, y| x.id.cmp(&y.id));

    let summary: Vec<(&str, i64)> = result
        .iter()
        .map(|company| (company.id.as_str(), company.transaction_count))
        .collect();
    assert_eq!(summary, [("c-a", 2), ("c-b", 1)]);
    assert_eq!(result[1].cuit, b.cuit());
    assert_eq!(result[0].name, a.name());
    assert_ne!(result[0].id, c.id());
}

#[tokio::test]
async fn test_reports_empty_database() {
    let pool = common::setup_test_db().await;

    assert!(GetRecentMembershipsHandler::from_pool(pool.clone())
        .execute()
        .await
        .unwrap()
        .is_empty());
    assert!(GetCompaniesWithRecentTransfersHandler::from_pool(pool)
        .execute()
        .await
        .unwrap()
        .is_empty());
}
