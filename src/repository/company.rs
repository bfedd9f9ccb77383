//! SQLite implementation of [`CompanyRepository`].

use sqlx::{QueryBuilder, Sqlite};

use crate::aggregate::{Aggregate, Company, CompanyData};
use crate::db::{DbConnection, DbPool};

use super::{parse_timestamp, timestamp, CompanyRepository, RepositoryError, RepositoryResult};

const SELECT_COLUMNS: &str = "SELECT id, name, cuit, type AS company_type, active, created_at FROM companies";

#[derive(Debug, sqlx::FromRow)]
struct CompanyRow {
    id: String,
    name: String,
    cuit: String,
    company_type: String,
    active: bool,
    created_at: String,
}

impl CompanyRow {
    fn into_company(self, operation: &'static str) -> RepositoryResult<Company> {
        let company_type = self
            .company_type
            .parse()
            .map_err(|e| RepositoryError::from_parse(operation, Company::aggregate_type(), e))?;
        let created_at = parse_timestamp(operation, Company::aggregate_type(), &self.created_at)?;

        Ok(Company::from_trusted_state(CompanyData {
            id: self.id,
            name: self.name,
            cuit: self.cuit,
            company_type,
            active: self.active,
            created_at,
        }))
    }
}

fn into_companies(rows: Vec<CompanyRow>, operation: &'static str) -> RepositoryResult<Vec<Company>> {
    rows.into_iter().map(|row| row.into_company(operation)).collect()
}

/// Company repository backed by the `companies` table
#[derive(Debug, Clone)]
pub struct SqliteCompanyRepository {
    pool: DbPool,
}

impl SqliteCompanyRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CompanyRepository for SqliteCompanyRepository {
    async fn save(&self, company: &Company, conn: Option<&mut DbConnection>) -> RepositoryResult<()> {
        let now = timestamp(chrono::Utc::now());
        let query = sqlx::query(
            r#"
            INSERT INTO companies (id, name, cuit, type, active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                name = excluded.name,
                cuit = excluded.cuit,
                type = excluded.type,
                active = excluded.active,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(company.id())
        .bind(company.name())
        .bind(company.cuit())
        .bind(company.company_type().as_str())
        .bind(company.is_active())
        .bind(timestamp(company.created_at()))
        .bind(now);

        let result = match conn {
            Some(conn) => query.execute(conn).await,
            None => query.execute(&self.pool).await,
        };
        result.map_err(|e| RepositoryError::operation_failed("save", Company::aggregate_type(), e))?;

        tracing::debug!(company_id = %company.id(), cuit = %company.cuit(), "Company saved");
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Company>> {
        let row: Option<CompanyRow> = sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::operation_failed("find_by_id", Company::aggregate_type(), e))?;

        row.map(|row| row.into_company("find_by_id")).transpose()
    }

    async fn find_by_cuit(&self, cuit: &str) -> RepositoryResult<Option<Company>> {
        let row: Option<CompanyRow> = sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE cuit = ?"))
            .bind(cuit)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::operation_failed("find_by_cuit", Company::aggregate_type(), e))?;

        row.map(|row| row.into_company("find_by_cuit")).transpose()
    }

    async fn find_by_ids(&self, ids: &[String]) -> RepositoryResult<Vec<Company>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new(SELECT_COLUMNS);
        builder.push(" WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id.clone());
        }
        separated.push_unseparated(")");

        let rows: Vec<CompanyRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::operation_failed("find_by_ids", Company::aggregate_type(), e))?;

        into_companies(rows, "find_by_ids")
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Company>> {
        let rows: Vec<CompanyRow> =
            sqlx::query_as(&format!("{SELECT_COLUMNS} ORDER BY created_at DESC"))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| RepositoryError::operation_failed("find_all", Company::aggregate_type(), e))?;

        into_companies(rows, "find_all")
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM companies WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::operation_failed("delete", Company::aggregate_type(), e))?;

        tracing::debug!(company_id = %id, "Company deleted");
        Ok(())
    }
}
