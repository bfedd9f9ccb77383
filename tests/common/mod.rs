//! Common test utilities

#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use company_membership::aggregate::{
    Company, CompanyData, Membership, MembershipData, Transaction,
};
use company_membership::db::{self, DbPool};
use company_membership::repository::{
    CompanyRepository, MembershipRepository, SqliteCompanyRepository, SqliteMembershipRepository,
    SqliteTransactionRepository, TransactionRepository,
};
use company_membership::{CompanyType, MembershipStatus, TransactionStatus, TransactionType};

/// Fresh in-memory database with the schema applied
pub async fn setup_test_db() -> DbPool {
    let pool = db::connect_in_memory()
        .await
        .expect("Failed to open in-memory database");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(days)
}

/// Persist a company created `created_days_ago` days ago
pub async fn insert_company(
    pool: &DbPool,
    id: &str,
    name: &str,
    cuit: &str,
    company_type: CompanyType,
    created_days_ago: i64,
) -> Company {
    let company = Company::from_trusted_state(CompanyData {
        id: id.to_string(),
        name: name.to_string(),
        cuit: cuit.to_string(),
        company_type,
        active: true,
        created_at: days_ago(created_days_ago),
    });
    SqliteCompanyRepository::new(pool.clone())
        .save(&company, None)
        .await
        .expect("Failed to seed company");
    company
}

/// Persist a PENDING membership requested `requested_days_ago` days ago
pub async fn insert_membership(
    pool: &DbPool,
    id: &str,
    company: &Company,
    requested_days_ago: i64,
) -> Membership {
    let membership = Membership::from_trusted_state(MembershipData {
        id: id.to_string(),
        company_id: company_id(company),
        membership_type: company.company_type(),
        status: MembershipStatus::Pending,
        request_date: days_ago(requested_days_ago),
        approval_date: None,
        approved_by: None,
    });
    SqliteMembershipRepository::new(pool.clone())
        .save(&membership, None)
        .await
        .expect("Failed to seed membership");
    membership
}

/// Persist an APPROVED transaction created `created_days_ago` days ago
pub async fn insert_transaction(
    pool: &DbPool,
    id: &str,
    company: &Company,
    transaction_type: TransactionType,
    created_days_ago: i64,
) -> Transaction {
    let created_at = days_ago(created_days_ago);
    let transaction = Transaction::new(
        id,
        company_id(company),
        transaction_type,
        Decimal::new(150_000, 2),
        format!("{transaction_type} {id}"),
        TransactionStatus::Approved,
        created_at,
        created_at,
    )
    .expect("Invalid test transaction");
    SqliteTransactionRepository::new(pool.clone())
        .save(&transaction)
        .await
        .expect("Failed to seed transaction");
    transaction
}

fn company_id(company: &Company) -> String {
    use company_membership::aggregate::Aggregate;
    company.id().to_string()
}
