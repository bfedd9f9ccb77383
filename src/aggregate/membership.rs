//! Membership Aggregate
//!
//! A company's membership application and its approval workflow.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{CompanyType, DomainError, MembershipStatus};

use super::{is_blank, Aggregate};

/// Default window, in days, for `is_recent_request`
pub const DEFAULT_RECENT_DAYS: i64 = 30;

/// Persisted membership state, accepted without validation
#[derive(Debug, Clone)]
pub struct MembershipData {
    pub id: String,
    pub company_id: String,
    pub membership_type: CompanyType,
    pub status: MembershipStatus,
    pub request_date: DateTime<Utc>,
    pub approval_date: Option<DateTime<Utc>>,
    pub approved_by: Option<String>,
}

/// Membership Aggregate
///
/// State machine:
/// - `Pending` → `Active` via `approve(user_id)`
/// - `Pending` → `Inactive` via `reject()`
///
/// `Active` and `Inactive` are terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct Membership {
    id: String,
    company_id: String,
    membership_type: CompanyType,
    status: MembershipStatus,
    request_date: DateTime<Utc>,
    approval_date: Option<DateTime<Utc>>,
    approved_by: Option<String>,
}

impl Membership {
    /// Open a new membership request in `Pending` state
    pub fn new(
        id: impl Into<String>,
        company_id: impl Into<String>,
        membership_type: CompanyType,
    ) -> Result<Self, DomainError> {
        let id = id.into();
        let company_id = company_id.into();

        if is_blank(&id) {
            return Err(DomainError::MembershipIdRequired);
        }
        if is_blank(&company_id) {
            return Err(DomainError::CompanyIdRequired);
        }

        Ok(Self {
            id,
            company_id,
            membership_type,
            status: MembershipStatus::Pending,
            request_date: Utc::now(),
            approval_date: None,
            approved_by: None,
        })
    }

    /// Rebuild a membership from trusted storage state, skipping validation.
    pub fn from_trusted_state(data: MembershipData) -> Self {
        Self {
            id: data.id,
            company_id: data.company_id,
            membership_type: data.membership_type,
            status: data.status,
            request_date: data.request_date,
            approval_date: data.approval_date,
            approved_by: data.approved_by,
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Approve a pending membership on behalf of `user_id`
    pub fn approve(&mut self, user_id: &str) -> Result<(), DomainError> {
        if is_blank(user_id) {
            return Err(DomainError::UserIdRequiredForApproval);
        }

        if self.status != MembershipStatus::Pending {
            return Err(DomainError::MembershipCannotBeApproved {
                membership_id: self.id.clone(),
                current_status: self.status,
            });
        }

        self.status = MembershipStatus::Active;
        self.approval_date = Some(Utc::now());
        self.approved_by = Some(user_id.to_string());
        Ok(())
    }

    /// Reject a pending membership. `approved_by` stays unset.
    pub fn reject(&mut self) -> Result<(), DomainError> {
        if self.status != MembershipStatus::Pending {
            return Err(DomainError::MembershipCannotBeRejected {
                membership_id: self.id.clone(),
                current_status: self.status,
            });
        }

        self.status = MembershipStatus::Inactive;
        self.approval_date = Some(Utc::now());
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn is_active(&self) -> bool {
        self.status == MembershipStatus::Active
    }

    pub fn is_pending(&self) -> bool {
        self.status == MembershipStatus::Pending
    }

    pub fn is_inactive(&self) -> bool {
        self.status == MembershipStatus::Inactive
    }

    pub fn is_pyme_type(&self) -> bool {
        self.membership_type == CompanyType::Pyme
    }

    pub fn is_corporate_type(&self) -> bool {
        self.membership_type == CompanyType::Corporate
    }

    /// Whether the request was made within the last `days` days.
    pub fn is_recent_request(&self, days: i64) -> bool {
        self.is_recent_request_at(days, Utc::now())
    }

    /// `is_recent_request` against an explicit clock.
    ///
    /// The distance is rounded up to whole days, so a request made 29 days
    /// and one hour ago counts as 30 days old.
    pub fn is_recent_request_at(&self, days: i64, now: DateTime<Utc>) -> bool {
        let day_ms = Duration::days(1).num_milliseconds();
        let diff_ms = (now - self.request_date).num_milliseconds().abs();
        let days_diff = (diff_ms + day_ms - 1) / day_ms;
        days_diff <= days
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn company_id(&self) -> &str {
        &self.company_id
    }

    pub fn membership_type(&self) -> CompanyType {
        self.membership_type
    }

    pub fn status(&self) -> MembershipStatus {
        self.status
    }

    pub fn request_date(&self) -> DateTime<Utc> {
        self.request_date
    }

    pub fn approval_date(&self) -> Option<DateTime<Utc>> {
        self.approval_date
    }

    pub fn approved_by(&self) -> Option<&str> {
        self.approved_by.as_deref()
    }
}

impl Aggregate for Membership {
    fn aggregate_type() -> &'static str {
        "Membership"
    }

    fn id(&self) -> &str {
        &self.id
    }
}
