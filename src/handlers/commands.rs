//! Command and result definitions
//!
//! Inputs accepted by the use-case handlers and the read models they
//! return. Everything here serializes as camelCase JSON.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::{Aggregate, Company, Membership};
use crate::domain::{CompanyType, MembershipStatus};

/// Timestamps in responses: RFC 3339, UTC, millisecond precision
/// (`2024-01-31T12:00:00.000Z`)
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// =========================================================================
// RegisterMembershipCommand
// =========================================================================

/// Command to register a company together with its membership request.
/// Bodies carrying any other field are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterMembershipCommand {
    pub name: String,
    pub cuit: String,
    #[serde(rename = "type")]
    pub company_type: CompanyType,
}

impl RegisterMembershipCommand {
    pub fn new(name: impl Into<String>, cuit: impl Into<String>, company_type: CompanyType) -> Self {
        Self {
            name: name.into(),
            cuit: cuit.into(),
            company_type,
        }
    }
}

/// Result of a successful registration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipCreated {
    pub company_id: String,
    pub company_name: String,
    pub company_type: CompanyType,
    pub membership_id: String,
    pub membership_status: MembershipStatus,
    pub message: String,
}

impl MembershipCreated {
    pub fn from_entities(company: &Company, membership: &Membership) -> Self {
        Self {
            company_id: company.id().to_string(),
            company_name: company.name().to_string(),
            company_type: company.company_type(),
            membership_id: membership.id().to_string(),
            membership_status: membership.status(),
            message: format!(
                "Company \"{}\" registered successfully with membership status: {}",
                company.name(),
                membership.status()
            ),
        }
    }
}

// =========================================================================
// Read models
// =========================================================================

/// A recent membership joined with its company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentMembership {
    pub id: String,
    pub company_id: String,
    pub company_name: String,
    pub company_cuit: String,
    pub company_type: CompanyType,
    pub membership_type: CompanyType,
    pub membership_status: MembershipStatus,
    pub request_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_date: Option<String>,
}

impl RecentMembership {
    pub fn from_entities(company: &Company, membership: &Membership) -> Self {
        Self {
            id: membership.id().to_string(),
            company_id: company.id().to_string(),
            company_name: company.name().to_string(),
            company_cuit: company.cuit().to_string(),
            company_type: company.company_type(),
            membership_type: membership.membership_type(),
            membership_status: membership.status(),
            request_date: format_timestamp(membership.request_date()),
            approval_date: membership.approval_date().map(format_timestamp),
        }
    }
}

/// A company with its recent TRANSFER count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyWithTransfers {
    pub id: String,
    pub name: String,
    pub cuit: String,
    #[serde(rename = "type")]
    pub company_type: CompanyType,
    pub active: bool,
    pub transaction_count: i64,
    pub created_at: String,
}

impl CompanyWithTransfers {
    pub fn from_entity(company: &Company, transaction_count: i64) -> Self {
        Self {
            id: company.id().to_string(),
            name: company.name().to_string(),
            cuit: company.cuit().to_string(),
            company_type: company.company_type(),
            active: company.is_active(),
            transaction_count,
            created_at: format_timestamp(company.created_at()),
        }
    }
}
