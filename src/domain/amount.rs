//! Amount type
//!
//! Domain primitive for transaction amounts. Amounts are validated at
//! construction time, so a non-positive amount cannot exist in the system.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::DomainError;

/// Amount represents a validated monetary value.
///
/// # Invariants
/// - Value is always positive (> 0)
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use company_membership::domain::Amount;
///
/// let amount = Amount::new(Decimal::new(100, 0)).unwrap();
/// assert_eq!(amount.value(), Decimal::new(100, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(Decimal);

impl Amount {
    /// Create a new Amount with validation.
    ///
    /// # Errors
    /// - `DomainError::InvalidTransactionAmount` if value <= 0
    pub fn new(value: Decimal) -> Result<Self, DomainError> {
        if value <= Decimal::ZERO {
            return Err(DomainError::InvalidTransactionAmount { amount: value });
        }

        Ok(Self(value))
    }

    /// Create an Amount from an integer (no decimal places).
    pub fn from_integer(value: i64) -> Result<Self, DomainError> {
        Self::new(Decimal::from(value))
    }

    /// Wrap a stored value without validation (storage rehydration only)
    pub(crate) fn from_decimal_unchecked(value: Decimal) -> Self {
        Self(value)
    }

    /// Get the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Unparseable input is reported the same way as a non-positive one
        let decimal = Decimal::from_str(s.trim())
            .map_err(|_| DomainError::InvalidTransactionAmount { amount: Decimal::ZERO })?;
        Amount::new(decimal)
    }
}

impl TryFrom<String> for Amount {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Amount::from_str(&value)
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.0.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_positive() {
        let amount = Amount::new(Decimal::new(100, 0));
        assert!(amount.is_ok());
        assert_eq!(amount.unwrap().value(), Decimal::new(100, 0));
    }

    #[test]
    fn test_amount_zero_rejected() {
        let amount = Amount::new(Decimal::ZERO);
        assert!(matches!(
            amount,
            Err(DomainError::InvalidTransactionAmount { .. })
        ));
    }

    #[test]
    fn test_amount_negative_rejected() {
        let amount = Amount::from_integer(-5);
        assert_eq!(
            amount,
            Err(DomainError::InvalidTransactionAmount {
                amount: Decimal::new(-5, 0)
            })
        );
    }

    #[test]
    fn test_amount_from_str() {
        let amount: Result<Amount, _> = "123.45".parse();
        assert_eq!(amount.unwrap().value(), Decimal::new(12345, 2));

        let garbage: Result<Amount, _> = "twelve".parse();
        assert!(garbage.is_err());
    }

    #[test]
    fn test_amount_serde_as_string() {
        let amount = Amount::new(Decimal::new(5000050, 2)).unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, r#""50000.50""#);

        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);

        let rejected: Result<Amount, _> = serde_json::from_str(r#""-1""#);
        assert!(rejected.is_err());
    }
}
