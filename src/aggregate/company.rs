//! Company Aggregate
//!
//! A registered company and its activation state.

use chrono::{DateTime, Utc};

use crate::domain::{CompanyType, DomainError};

use super::{is_blank, Aggregate};

/// Minimum company name length (characters, after trimming)
pub const NAME_MIN_LENGTH: usize = 2;

/// Maximum company name length (characters, after trimming)
pub const NAME_MAX_LENGTH: usize = 100;

/// Punctuation allowed in company names besides letters, digits and spaces
const NAME_PUNCTUATION: &[char] = &['.', '-', '&', ',', '°', 'ª', '(', ')'];

/// Persisted company state, accepted without validation
#[derive(Debug, Clone)]
pub struct CompanyData {
    pub id: String,
    pub name: String,
    pub cuit: String,
    pub company_type: CompanyType,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Company Aggregate
///
/// # Invariants
/// - `id`, `name` and `cuit` are validated on construction and on rename
/// - `name` and `cuit` are stored trimmed
/// - `active` only changes through `activate` / `deactivate`
#[derive(Debug, Clone, PartialEq)]
pub struct Company {
    id: String,
    name: String,
    cuit: String,
    company_type: CompanyType,
    active: bool,
    created_at: DateTime<Utc>,
}

impl Company {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Register a new company. The company starts inactive.
    pub fn new(
        id: impl Into<String>,
        name: &str,
        cuit: &str,
        company_type: CompanyType,
    ) -> Result<Self, DomainError> {
        let id = id.into();
        validate_id(&id)?;
        validate_name(name)?;
        validate_cuit(cuit)?;

        Ok(Self {
            id,
            name: name.trim().to_string(),
            cuit: cuit.trim().to_string(),
            company_type,
            active: false,
            created_at: Utc::now(),
        })
    }

    /// Rebuild a company from trusted storage state, skipping validation.
    pub fn from_trusted_state(data: CompanyData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            cuit: data.cuit,
            company_type: data.company_type,
            active: data.active,
            created_at: data.created_at,
        }
    }

    // =========================================================================
    // Behaviour
    // =========================================================================

    pub fn activate(&mut self) -> Result<(), DomainError> {
        if self.active {
            return Err(DomainError::CompanyAlreadyActive {
                company_id: self.id.clone(),
            });
        }
        self.active = true;
        Ok(())
    }

    pub fn deactivate(&mut self) -> Result<(), DomainError> {
        if !self.active {
            return Err(DomainError::CompanyAlreadyInactive {
                company_id: self.id.clone(),
            });
        }
        self.active = false;
        Ok(())
    }

    /// Rename the company; the new name goes through the same validation.
    pub fn update_name(&mut self, new_name: &str) -> Result<(), DomainError> {
        validate_name(new_name)?;
        self.name = new_name.trim().to_string();
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn is_pyme(&self) -> bool {
        self.company_type == CompanyType::Pyme
    }

    pub fn is_corporate(&self) -> bool {
        self.company_type == CompanyType::Corporate
    }

    pub fn can_perform_transactions(&self) -> bool {
        self.active
    }

    /// `"{name} ({cuit})"`
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.cuit)
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cuit(&self) -> &str {
        &self.cuit
    }

    pub fn company_type(&self) -> CompanyType {
        self.company_type
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Aggregate for Company {
    fn aggregate_type() -> &'static str {
        "Company"
    }

    fn id(&self) -> &str {
        &self.id
    }
}

// =========================================================================
// Validation rules
// =========================================================================

fn validate_id(id: &str) -> Result<(), DomainError> {
    if is_blank(id) {
        return Err(DomainError::CompanyIdRequired);
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::CompanyNameRequired);
    }

    let length = trimmed.chars().count();
    if length < NAME_MIN_LENGTH {
        return Err(DomainError::CompanyNameTooShort {
            min_length: NAME_MIN_LENGTH,
        });
    }
    if length > NAME_MAX_LENGTH {
        return Err(DomainError::CompanyNameTooLong {
            max_length: NAME_MAX_LENGTH,
        });
    }

    if !trimmed.chars().all(is_allowed_name_char) {
        return Err(DomainError::CompanyNameInvalidCharacters {
            name: trimmed.to_string(),
        });
    }
    Ok(())
}

/// ASCII letters and digits, the Latin-1 range À..=ÿ, whitespace and
/// `NAME_PUNCTUATION`.
fn is_allowed_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || ('\u{C0}'..='\u{FF}').contains(&c)
        || c.is_whitespace()
        || NAME_PUNCTUATION.contains(&c)
}

fn validate_cuit(cuit: &str) -> Result<(), DomainError> {
    let trimmed = cuit.trim();
    if trimmed.is_empty() {
        return Err(DomainError::CuitRequired);
    }

    if !is_cuit_format(trimmed) {
        return Err(DomainError::InvalidCuitFormat {
            cuit: trimmed.to_string(),
        });
    }
    Ok(())
}

/// Exactly `DD-DDDDDDDD-D`
fn is_cuit_format(cuit: &str) -> bool {
    let parts: Vec<&str> = cuit.split('-').collect();
    match parts.as_slice() {
        [prefix, number, check] => {
            prefix.len() == 2
                && number.len() == 8
                && check.len() == 1
                && parts
                    .iter()
                    .all(|part| part.bytes().all(|b| b.is_ascii_digit()))
        }
        _ => false,
    }
}
