//! SQLite implementation of [`MembershipRepository`].

use chrono::{DateTime, Utc};

use crate::aggregate::{Aggregate, Membership, MembershipData};
use crate::db::{DbConnection, DbPool};
use crate::domain::MembershipStatus;

use super::{parse_timestamp, timestamp, MembershipRepository, RepositoryError, RepositoryResult};

const SELECT_COLUMNS: &str = r#"
    SELECT id, company_id, type AS membership_type, status, request_date, approval_date, approved_by
    FROM memberships
"#;

#[derive(Debug, sqlx::FromRow)]
struct MembershipRow {
    id: String,
    company_id: String,
    membership_type: String,
    status: String,
    request_date: String,
    approval_date: Option<String>,
    approved_by: Option<String>,
}

impl MembershipRow {
    fn into_membership(self, operation: &'static str) -> RepositoryResult<Membership> {
        let membership_type = self
            .membership_type
            .parse()
            .map_err(|e| RepositoryError::from_parse(operation, Membership::aggregate_type(), e))?;
        let status = self
            .status
            .parse()
            .map_err(|e| RepositoryError::from_parse(operation, Membership::aggregate_type(), e))?;
        let request_date = parse_timestamp(operation, Membership::aggregate_type(), &self.request_date)?;
        let approval_date = self
            .approval_date
            .as_deref()
            .map(|value| parse_timestamp(operation, Membership::aggregate_type(), value))
            .transpose()?;

        Ok(Membership::from_trusted_state(MembershipData {
            id: self.id,
            company_id: self.company_id,
            membership_type,
            status,
            request_date,
            approval_date,
            approved_by: self.approved_by,
        }))
    }
}

fn into_memberships(
    rows: Vec<MembershipRow>,
    operation: &'static str,
) -> RepositoryResult<Vec<Membership>> {
    rows.into_iter().map(|row| row.into_membership(operation)).collect()
}

/// Membership repository backed by the `memberships` table
#[derive(Debug, Clone)]
pub struct SqliteMembershipRepository {
    pool: DbPool,
}

impl SqliteMembershipRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl MembershipRepository for SqliteMembershipRepository {
    async fn save(
        &self,
        membership: &Membership,
        conn: Option<&mut DbConnection>,
    ) -> RepositoryResult<()> {
        let query = sqlx::query(
            r#"
            INSERT INTO memberships
                (id, company_id, type, status, request_date, approval_date, approved_by)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                status = excluded.status,
                approval_date = excluded.approval_date,
                approved_by = excluded.approved_by
            "#,
        )
        .bind(membership.id())
        .bind(membership.company_id())
        .bind(membership.membership_type().as_str())
        .bind(membership.status().as_str())
        .bind(timestamp(membership.request_date()))
        .bind(membership.approval_date().map(timestamp))
        .bind(membership.approved_by());

        let result = match conn {
            Some(conn) => query.execute(conn).await,
            None => query.execute(&self.pool).await,
        };
        result.map_err(|e| RepositoryError::operation_failed("save", Membership::aggregate_type(), e))?;

        tracing::debug!(
            membership_id = %membership.id(),
            company_id = %membership.company_id(),
            status = %membership.status(),
            "Membership saved"
        );
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Membership>> {
        let row: Option<MembershipRow> = sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::operation_failed("find_by_id", Membership::aggregate_type(), e))?;

        row.map(|row| row.into_membership("find_by_id")).transpose()
    }

    async fn find_by_company_id(&self, company_id: &str) -> RepositoryResult<Vec<Membership>> {
        let rows: Vec<MembershipRow> = sqlx::query_as(&format!(
            "{SELECT_COLUMNS} WHERE company_id = ? ORDER BY request_date DESC"
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::operation_failed("find_by_company_id", Membership::aggregate_type(), e))?;

        into_memberships(rows, "find_by_company_id")
    }

    async fn find_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Membership>> {
        let rows: Vec<MembershipRow> = sqlx::query_as(&format!(
            "{SELECT_COLUMNS} WHERE request_date >= ? AND request_date <= ? ORDER BY request_date DESC"
        ))
        .bind(timestamp(start))
        .bind(timestamp(end))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::operation_failed("find_by_date_range", Membership::aggregate_type(), e))?;

        into_memberships(rows, "find_by_date_range")
    }

    async fn find_by_status(&self, status: MembershipStatus) -> RepositoryResult<Vec<Membership>> {
        let rows: Vec<MembershipRow> = sqlx::query_as(&format!(
            "{SELECT_COLUMNS} WHERE status = ? ORDER BY request_date DESC"
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::operation_failed("find_by_status", Membership::aggregate_type(), e))?;

        into_memberships(rows, "find_by_status")
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM memberships WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::operation_failed("delete", Membership::aggregate_type(), e))?;

        tracing::debug!(membership_id = %id, "Membership deleted");
        Ok(())
    }
}
