//! Transaction Aggregate
//!
//! Immutable record of a financial movement tied to a company. There are no
//! mutators: a changed transaction is a new instance.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::{Amount, DomainError, TransactionStatus, TransactionType};

use super::{days_before, Aggregate};

/// Maximum description length (characters)
pub const DESCRIPTION_MAX_LENGTH: usize = 500;

/// Persisted transaction state, accepted without validation
#[derive(Debug, Clone)]
pub struct TransactionData {
    pub id: String,
    pub company_id: String,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub description: String,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Transaction Aggregate
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    id: String,
    company_id: String,
    transaction_type: TransactionType,
    amount: Amount,
    description: String,
    status: TransactionStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a validated transaction.
    ///
    /// # Errors
    /// - `InvalidTransactionAmount` if amount <= 0
    /// - `InvalidTransactionDate` if `created_at` is in the future
    /// - `InvalidTransactionDescription` if the description is blank or too long
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        company_id: impl Into<String>,
        transaction_type: TransactionType,
        amount: Decimal,
        description: impl Into<String>,
        status: TransactionStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let amount = Amount::new(amount)?;

        if created_at > Utc::now() {
            return Err(DomainError::InvalidTransactionDate);
        }

        let description = description.into();
        if description.trim().is_empty() || description.chars().count() > DESCRIPTION_MAX_LENGTH {
            return Err(DomainError::InvalidTransactionDescription);
        }

        Ok(Self {
            id: id.into(),
            company_id: company_id.into(),
            transaction_type,
            amount,
            description,
            status,
            created_at,
            updated_at,
        })
    }

    /// Rebuild a transaction from trusted storage state, skipping validation.
    pub fn from_trusted_state(data: TransactionData) -> Self {
        Self {
            id: data.id,
            company_id: data.company_id,
            transaction_type: data.transaction_type,
            amount: Amount::from_decimal_unchecked(data.amount),
            description: data.description,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Whether the transaction was created within the last `days_ago` days
    pub fn is_recent(&self, days_ago: i64) -> bool {
        match days_before(Utc::now(), days_ago) {
            Some(since) => self.created_at >= since,
            None => true,
        }
    }

    pub fn is_transfer(&self) -> bool {
        self.transaction_type == TransactionType::Transfer
    }

    pub fn is_deposit(&self) -> bool {
        self.transaction_type == TransactionType::Deposit
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn company_id(&self) -> &str {
        &self.company_id
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Aggregate for Transaction {
    fn aggregate_type() -> &'static str {
        "Transaction"
    }

    fn id(&self) -> &str {
        &self.id
    }
}
