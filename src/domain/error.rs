//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use rust_decimal::Decimal;
use thiserror::Error;

use super::MembershipStatus;

/// Domain-specific errors
///
/// One variant per violated business rule or invariant. Messages are stable;
/// the HTTP layer maps each variant to a status code via `error_code()`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ---------------------------------------------------------------------
    // Company
    // ---------------------------------------------------------------------
    #[error("Company ID is required")]
    CompanyIdRequired,

    #[error("Company name is required")]
    CompanyNameRequired,

    #[error("Company name must be at least {min_length} characters long")]
    CompanyNameTooShort { min_length: usize },

    #[error("Company name must not exceed {max_length} characters")]
    CompanyNameTooLong { max_length: usize },

    #[error("Company name \"{name}\" contains invalid characters")]
    CompanyNameInvalidCharacters { name: String },

    #[error("CUIT is required")]
    CuitRequired,

    #[error("CUIT \"{cuit}\" must be in the format XX-XXXXXXXX-X")]
    InvalidCuitFormat { cuit: String },

    #[error("Company {company_id} is already active")]
    CompanyAlreadyActive { company_id: String },

    #[error("Company {company_id} is already inactive")]
    CompanyAlreadyInactive { company_id: String },

    #[error("Company with CUIT {cuit} already exists")]
    CompanyWithCuitAlreadyExists { cuit: String },

    // ---------------------------------------------------------------------
    // Membership
    // ---------------------------------------------------------------------
    #[error("Membership ID is required")]
    MembershipIdRequired,

    #[error("User ID is required for approval")]
    UserIdRequiredForApproval,

    #[error("Membership {membership_id} cannot be approved. Current status: {current_status}")]
    MembershipCannotBeApproved {
        membership_id: String,
        current_status: MembershipStatus,
    },

    #[error("Membership {membership_id} cannot be rejected. Current status: {current_status}")]
    MembershipCannotBeRejected {
        membership_id: String,
        current_status: MembershipStatus,
    },

    // ---------------------------------------------------------------------
    // Transaction
    // ---------------------------------------------------------------------
    #[error("Invalid transaction amount: {amount}. Amount must be positive.")]
    InvalidTransactionAmount { amount: Decimal },

    #[error("Transaction date cannot be in the future.")]
    InvalidTransactionDate,

    #[error("Transaction description must be provided and cannot exceed 500 characters.")]
    InvalidTransactionDescription,
}

impl DomainError {
    /// Create a duplicate CUIT error
    pub fn cuit_already_exists(cuit: impl Into<String>) -> Self {
        Self::CompanyWithCuitAlreadyExists { cuit: cuit.into() }
    }

    /// Stable machine-readable code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::CompanyIdRequired => "company_id_required",
            Self::CompanyNameRequired => "company_name_required",
            Self::CompanyNameTooShort { .. } => "company_name_too_short",
            Self::CompanyNameTooLong { .. } => "company_name_too_long",
            Self::CompanyNameInvalidCharacters { .. } => "company_name_invalid_characters",
            Self::CuitRequired => "cuit_required",
            Self::InvalidCuitFormat { .. } => "invalid_cuit_format",
            Self::CompanyAlreadyActive { .. } => "company_already_active",
            Self::CompanyAlreadyInactive { .. } => "company_already_inactive",
            Self::CompanyWithCuitAlreadyExists { .. } => "company_with_cuit_already_exists",
            Self::MembershipIdRequired => "membership_id_required",
            Self::UserIdRequiredForApproval => "user_id_required_for_approval",
            Self::MembershipCannotBeApproved { .. } => "membership_cannot_be_approved",
            Self::MembershipCannotBeRejected { .. } => "membership_cannot_be_rejected",
            Self::InvalidTransactionAmount { .. } => "invalid_transaction_amount",
            Self::InvalidTransactionDate => "invalid_transaction_date",
            Self::InvalidTransactionDescription => "invalid_transaction_description",
        }
    }

    /// Check if this is an input validation error (caller's fault)
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::CompanyIdRequired
                | Self::CompanyNameRequired
                | Self::CompanyNameTooShort { .. }
                | Self::CompanyNameTooLong { .. }
                | Self::CompanyNameInvalidCharacters { .. }
                | Self::CuitRequired
                | Self::InvalidCuitFormat { .. }
                | Self::MembershipIdRequired
                | Self::UserIdRequiredForApproval
                | Self::InvalidTransactionAmount { .. }
                | Self::InvalidTransactionDate
                | Self::InvalidTransactionDescription
        )
    }

    /// Check if this is a conflict with current state (not retryable)
    pub fn is_conflict_error(&self) -> bool {
        matches!(
            self,
            Self::CompanyAlreadyActive { .. }
                | Self::CompanyAlreadyInactive { .. }
                | Self::CompanyWithCuitAlreadyExists { .. }
                | Self::MembershipCannotBeApproved { .. }
                | Self::MembershipCannotBeRejected { .. }
        )
    }
}
