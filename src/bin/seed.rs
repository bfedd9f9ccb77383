//! Demo Data Seeder
//!
//! Clears the database and loads a demo data set covering both reports:
//! recent and old memberships, recent transfers, deposits and old transfers.
//!
//! Run with: cargo run --bin seed

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rust_decimal::Decimal;

use company_membership::aggregate::{
    Aggregate, Company, CompanyData, Membership, MembershipData, Transaction,
};
use company_membership::db::{self, DbPool};
use company_membership::id::{IdGenerator, UuidGenerator};
use company_membership::repository::{
    CompanyRepository, MembershipRepository, SqliteCompanyRepository, SqliteMembershipRepository,
    SqliteTransactionRepository, TransactionRepository,
};
use company_membership::{CompanyType, Config, MembershipStatus, TransactionStatus, TransactionType};

const APPROVER: &str = "system-admin";

/// (name, cuit, type, active, created days ago)
const COMPANIES: [(&str, &str, CompanyType, bool, i64); 8] = [
    // Recent memberships
    ("TechCorp Argentina", "20-12345678-9", CompanyType::Corporate, true, 5),
    ("PyME Solutions SRL", "20-98765432-1", CompanyType::Pyme, true, 15),
    ("Digital Ventures SA", "20-45678912-3", CompanyType::Corporate, true, 25),
    // Older memberships
    ("Legacy Systems Corp", "20-78912345-6", CompanyType::Corporate, true, 45),
    ("Startup Inc", "20-32165498-7", CompanyType::Pyme, true, 60),
    // Recent transfers
    ("Tech Buenos Aires", "20-65432198-7", CompanyType::Corporate, true, 90),
    ("Digital Commerce SA", "20-14725836-9", CompanyType::Pyme, true, 120),
    // Inactive
    ("Inactive Company SA", "20-96385274-1", CompanyType::Corporate, false, 180),
];

/// Index of the company whose membership was rejected
const INACTIVE_COMPANY: usize = 7;

/// Companies that get recent transfers and a deposit
const RECENT_TRANSFER_COMPANIES: [usize; 4] = [0, 1, 5, 6];

/// Companies that only get one transfer outside the 30 day window
const OLD_TRANSFER_COMPANIES: std::ops::Range<usize> = 2..5;

fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(days)
}

struct Seeder {
    pool: DbPool,
    ids: UuidGenerator,
    companies: SqliteCompanyRepository,
    memberships: SqliteMembershipRepository,
    transactions: SqliteTransactionRepository,
}

impl Seeder {
    fn new(pool: DbPool) -> Self {
        Self {
            companies: SqliteCompanyRepository::new(pool.clone()),
            memberships: SqliteMembershipRepository::new(pool.clone()),
            transactions: SqliteTransactionRepository::new(pool.clone()),
            ids: UuidGenerator,
            pool,
        }
    }

    async fn clear(&self) -> anyhow::Result<()> {
        println!("Clearing database...");
        for table in ["transactions", "memberships", "companies"] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }

    async fn create_companies(&self) -> anyhow::Result<Vec<Company>> {
        println!("Creating companies...");
        let mut companies = Vec::with_capacity(COMPANIES.len());

        for (name, cuit, company_type, active, created_days_ago) in COMPANIES {
            let company = Company::from_trusted_state(CompanyData {
                id: self.ids.generate(),
                name: name.to_string(),
                cuit: cuit.to_string(),
                company_type,
                active,
                created_at: days_ago(created_days_ago),
            });
            self.companies.save(&company, None).await?;
            companies.push(company);
        }

        Ok(companies)
    }

    async fn create_memberships(&self, companies: &[Company]) -> anyhow::Result<Vec<Membership>> {
        println!("Creating memberships...");
        let mut memberships = Vec::with_capacity(companies.len());

        for (i, company) in companies.iter().enumerate() {
            let offset = i as i64;
            let (status, request_date, approval_date, approved_by) = if i < 3 {
                (
                    MembershipStatus::Active,
                    days_ago(5 + offset * 10),
                    Some(days_ago(3 + offset * 10)),
                    Some(APPROVER.to_string()),
                )
            } else if i == INACTIVE_COMPANY {
                (MembershipStatus::Inactive, days_ago(45 + offset * 15), None, None)
            } else {
                (
                    MembershipStatus::Active,
                    days_ago(45 + offset * 15),
                    Some(days_ago(40 + offset * 15)),
                    Some(APPROVER.to_string()),
                )
            };

            let membership = Membership::from_trusted_state(MembershipData {
                id: self.ids.generate(),
                company_id: company.id().to_string(),
                membership_type: company.company_type(),
                status,
                request_date,
                approval_date,
                approved_by,
            });
            self.memberships.save(&membership, None).await?;
            memberships.push(membership);
        }

        Ok(memberships)
    }

    async fn create_transactions(&self, companies: &[Company]) -> anyhow::Result<Vec<Transaction>> {
        println!("Creating transactions...");
        let mut transactions = Vec::new();

        for index in RECENT_TRANSFER_COMPANIES {
            let company = &companies[index];
            let transfer_count = rand::thread_rng().gen_range(2..=6);

            for i in 0..transfer_count {
                let amount = Decimal::from(rand::thread_rng().gen_range(10_000i64..110_000));
                let created_at = days_ago(rand::thread_rng().gen_range(1..=30));
                transactions.push(
                    self.record(
                        company,
                        TransactionType::Transfer,
                        amount,
                        format!("Transfer {} from {}", i + 1, company.name()),
                        created_at,
                    )
                    .await?,
                );
            }

            // Deposits must not show up in transfer reports
            let created_at = days_ago(rand::thread_rng().gen_range(1..=15));
            transactions.push(
                self.record(
                    company,
                    TransactionType::Deposit,
                    Decimal::from(50_000i64),
                    format!("Deposit from {}", company.name()),
                    created_at,
                )
                .await?,
            );
        }

        for company in &companies[OLD_TRANSFER_COMPANIES] {
            let created_at = days_ago(45 + rand::thread_rng().gen_range(0..30));
            transactions.push(
                self.record(
                    company,
                    TransactionType::Transfer,
                    Decimal::from(75_000i64),
                    format!("Old transfer from {}", company.name()),
                    created_at,
                )
                .await?,
            );
        }

        Ok(transactions)
    }

    async fn record(
        &self,
        company: &Company,
        transaction_type: TransactionType,
        amount: Decimal,
        description: String,
        created_at: DateTime<Utc>,
    ) -> anyhow::Result<Transaction> {
        let transaction = Transaction::new(
            self.ids.generate(),
            company.id(),
            transaction_type,
            amount,
            description,
            TransactionStatus::Approved,
            created_at,
            created_at,
        )?;
        self.transactions.save(&transaction).await?;
        Ok(transaction)
    }
}

fn print_summary(companies: &[Company], memberships: &[Membership], transactions: &[Transaction]) {
    let company_by_id: BTreeMap<&str, &Company> =
        companies.iter().map(|c| (c.id(), c)).collect();
    let label = |company_id: &str| {
        company_by_id
            .get(company_id)
            .map(|c| c.display_name())
            .unwrap_or_else(|| company_id.to_string())
    };

    println!("\n=== Testing Information ===");

    let recent: Vec<&Membership> = memberships
        .iter()
        .filter(|m| m.is_recent_request(30))
        .collect();
    println!("\nCompanies with recent memberships (last 30 days): {}", recent.len());
    for membership in recent {
        println!(
            "   - {} - {}",
            label(membership.company_id()),
            membership.request_date().format("%d/%m/%Y")
        );
    }

    let mut transfer_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for transaction in transactions
        .iter()
        .filter(|t| t.is_transfer() && t.is_recent(30))
    {
        *transfer_counts.entry(transaction.company_id()).or_default() += 1;
    }
    println!(
        "\nCompanies with recent transfers (last 30 days): {}",
        transfer_counts.len()
    );
    for (company_id, count) in transfer_counts {
        println!("   - {} - {} transfers", label(company_id), count);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    println!("Starting database seeding...");
    db::ensure_database_dir(&config.database_url)?;
    let pool = db::connect(&config.database_url, 1).await?;
    db::run_migrations(&pool).await?;

    let seeder = Seeder::new(pool.clone());
    seeder.clear().await?;

    let companies = seeder.create_companies().await?;
    let memberships = seeder.create_memberships(&companies).await?;
    let transactions = seeder.create_transactions(&companies).await?;

    println!("Seeding completed successfully!");
    println!("Data created:");
    println!("   - {} companies", companies.len());
    println!("   - {} memberships", memberships.len());
    println!("   - {} transactions", transactions.len());

    print_summary(&companies, &memberships, &transactions);

    pool.close().await;
    println!("Connection closed");

    Ok(())
}
