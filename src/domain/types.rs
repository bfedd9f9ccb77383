//! Domain enumerations
//!
//! Classification and lifecycle enums shared by the company and transaction
//! contexts. All of them are stored and serialized by their upper-case name.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a stored or submitted value doesn't name a variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {kind} value: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Company size classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompanyType {
    Pyme,
    Corporate,
}

impl CompanyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyType::Pyme => "PYME",
            CompanyType::Corporate => "CORPORATE",
        }
    }
}

impl fmt::Display for CompanyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompanyType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PYME" => Ok(CompanyType::Pyme),
            "CORPORATE" => Ok(CompanyType::Corporate),
            other => Err(ParseEnumError::new("company type", other)),
        }
    }
}

/// Membership lifecycle status
///
/// `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipStatus {
    Pending,
    Active,
    Inactive,
}

impl MembershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipStatus::Pending => "PENDING",
            MembershipStatus::Active => "ACTIVE",
            MembershipStatus::Inactive => "INACTIVE",
        }
    }
}

impl Default for MembershipStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MembershipStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(MembershipStatus::Pending),
            "ACTIVE" => Ok(MembershipStatus::Active),
            "INACTIVE" => Ok(MembershipStatus::Inactive),
            other => Err(ParseEnumError::new("membership status", other)),
        }
    }
}

/// Kind of financial movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Transfer,
    Deposit,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Transfer => "TRANSFER",
            TransactionType::Deposit => "DEPOSIT",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TRANSFER" => Ok(TransactionType::Transfer),
            "DEPOSIT" => Ok(TransactionType::Deposit),
            other => Err(ParseEnumError::new("transaction type", other)),
        }
    }
}

/// Transaction processing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Approved,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Approved => "APPROVED",
        }
    }
}

impl Default for TransactionStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(TransactionStatus::Pending),
            "APPROVED" => Ok(TransactionStatus::Approved),
            other => Err(ParseEnumError::new("transaction status", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_type_serialization() {
        let json = serde_json::to_string(&CompanyType::Pyme).unwrap();
        assert_eq!(json, r#""PYME""#);

        let parsed: CompanyType = serde_json::from_str(r#""CORPORATE""#).unwrap();
        assert_eq!(parsed, CompanyType::Corporate);
    }

    #[test]
    fn test_display_matches_serde_name() {
        assert_eq!(MembershipStatus::Inactive.to_string(), "INACTIVE");
        assert_eq!(
            serde_json::to_string(&MembershipStatus::Inactive).unwrap(),
            r#""INACTIVE""#
        );
        assert_eq!(TransactionType::Transfer.to_string(), "TRANSFER");
    }

    #[test]
    fn test_from_str_rejects_unknown_value() {
        let err = "SMALL".parse::<CompanyType>().unwrap_err();
        assert_eq!(err.kind, "company type");
        assert_eq!(err.value, "SMALL");

        assert!("pending".parse::<MembershipStatus>().is_err());
        assert_eq!(
            "APPROVED".parse::<TransactionStatus>(),
            Ok(TransactionStatus::Approved)
        );
    }

    #[test]
    fn test_membership_status_defaults_to_pending() {
        assert_eq!(MembershipStatus::default(), MembershipStatus::Pending);
    }
}
