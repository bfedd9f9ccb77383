//! SQLite implementation of [`TransactionRepository`].

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::{QueryBuilder, Sqlite};

use crate::aggregate::{Aggregate, Transaction, TransactionData};
use crate::db::DbPool;
use crate::domain::TransactionType;

use super::{
    parse_timestamp, timestamp, window_start, RepositoryError, RepositoryResult,
    TransactionRepository,
};

const SELECT_COLUMNS: &str = r#"
    SELECT id, company_id, type AS transaction_type, amount, description, status, created_at, updated_at
    FROM transactions
"#;

#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: String,
    company_id: String,
    transaction_type: String,
    amount: String,
    description: String,
    status: String,
    created_at: String,
    updated_at: String,
}

impl TransactionRow {
    fn into_transaction(self, operation: &'static str) -> RepositoryResult<Transaction> {
        let transaction_type = self
            .transaction_type
            .parse()
            .map_err(|e| RepositoryError::from_parse(operation, Transaction::aggregate_type(), e))?;
        let status = self
            .status
            .parse()
            .map_err(|e| RepositoryError::from_parse(operation, Transaction::aggregate_type(), e))?;
        let amount = Decimal::from_str(&self.amount).map_err(|e| {
            RepositoryError::invalid_stored_data(
                operation,
                Transaction::aggregate_type(),
                format!("invalid amount '{}': {e}", self.amount),
            )
        })?;

        Ok(Transaction::from_trusted_state(TransactionData {
            id: self.id,
            company_id: self.company_id,
            transaction_type,
            amount,
            description: self.description,
            status,
            created_at: parse_timestamp(operation, Transaction::aggregate_type(), &self.created_at)?,
            updated_at: parse_timestamp(operation, Transaction::aggregate_type(), &self.updated_at)?,
        }))
    }
}

fn into_transactions(
    rows: Vec<TransactionRow>,
    operation: &'static str,
) -> RepositoryResult<Vec<Transaction>> {
    rows.into_iter().map(|row| row.into_transaction(operation)).collect()
}

/// Push `IN (?, ?, ...)` for `ids`
fn push_id_list(builder: &mut QueryBuilder<'_, Sqlite>, ids: &[String]) {
    builder.push(" IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(id.clone());
    }
    separated.push_unseparated(")");
}

/// Transaction repository backed by the `transactions` table
#[derive(Debug, Clone)]
pub struct SqliteTransactionRepository {
    pool: DbPool,
}

impl SqliteTransactionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl TransactionRepository for SqliteTransactionRepository {
    async fn find_companies_with_recent_transfers(&self, days_ago: i64) -> RepositoryResult<Vec<String>> {
        let company_ids: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT company_id
            FROM transactions
            WHERE type = ? AND created_at >= ?
            ORDER BY company_id
            "#,
        )
        .bind(TransactionType::Transfer.as_str())
        .bind(window_start(days_ago))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            RepositoryError::operation_failed("find_companies_with_recent_transfers", Transaction::aggregate_type(), e)
        })?;

        Ok(company_ids)
    }

    async fn count_recent_transfers_by_company_ids(
        &self,
        company_ids: &[String],
        days_ago: i64,
    ) -> RepositoryResult<HashMap<String, i64>> {
        if company_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new(
            "SELECT company_id, COUNT(*) FROM transactions WHERE type = ",
        );
        builder.push_bind(TransactionType::Transfer.as_str());
        builder.push(" AND created_at >= ");
        builder.push_bind(window_start(days_ago));
        builder.push(" AND company_id");
        push_id_list(&mut builder, company_ids);
        builder.push(" GROUP BY company_id");

        let counts: Vec<(String, i64)> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                RepositoryError::operation_failed("count_recent_transfers_by_company_ids", Transaction::aggregate_type(), e)
            })?;

        Ok(counts.into_iter().collect())
    }

    async fn find_recent_by_company_ids(
        &self,
        company_ids: &[String],
        days_ago: i64,
    ) -> RepositoryResult<Vec<Transaction>> {
        if company_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new(SELECT_COLUMNS);
        builder.push(" WHERE created_at >= ");
        builder.push_bind(window_start(days_ago));
        builder.push(" AND company_id");
        push_id_list(&mut builder, company_ids);
        builder.push(" ORDER BY created_at DESC");

        let rows: Vec<TransactionRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::operation_failed("find_recent_by_company_ids", Transaction::aggregate_type(), e))?;

        into_transactions(rows, "find_recent_by_company_ids")
    }

    async fn find_by_company_id(&self, company_id: &str) -> RepositoryResult<Vec<Transaction>> {
        let rows: Vec<TransactionRow> = sqlx::query_as(&format!(
            "{SELECT_COLUMNS} WHERE company_id = ? ORDER BY created_at DESC"
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::operation_failed("find_by_company_id", Transaction::aggregate_type(), e))?;

        into_transactions(rows, "find_by_company_id")
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Transaction>> {
        let row: Option<TransactionRow> =
            sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepositoryError::operation_failed("find_by_id", Transaction::aggregate_type(), e))?;

        row.map(|row| row.into_transaction("find_by_id")).transpose()
    }

    async fn save(&self, transaction: &Transaction) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions
                (id, company_id, type, amount, description, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                status = excluded.status,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(transaction.id())
        .bind(transaction.company_id())
        .bind(transaction.transaction_type().as_str())
        .bind(transaction.amount().to_string())
        .bind(transaction.description())
        .bind(transaction.status().as_str())
        .bind(timestamp(transaction.created_at()))
        .bind(timestamp(transaction.updated_at()))
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::operation_failed("save", Transaction::aggregate_type(), e))?;

        tracing::debug!(
            transaction_id = %transaction.id(),
            company_id = %transaction.company_id(),
            transaction_type = %transaction.transaction_type(),
            "Transaction saved"
        );
        Ok(())
    }
}
