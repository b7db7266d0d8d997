//! Error types for the accreditation workflow engine.

use std::fmt;

use thiserror::Error;

/// Stable identifiers for registration-time duplicate conditions.
///
/// Callers branch on [`ConflictCode::as_str`], so the rendered values
/// must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictCode {
    DuplicateOrganizationName,
    DuplicateOrganizationProfile,
    UserAlreadyHasOrganization,
    AdviserAlreadyAssigned,
    AdviserEmailAlreadyInUse,
    /// Store-level unique-constraint fallback.
    DuplicateDatabaseEntry,
}

impl ConflictCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DuplicateOrganizationName => "DUPLICATE_ORGANIZATION_NAME",
            Self::DuplicateOrganizationProfile => "DUPLICATE_ORGANIZATION_PROFILE",
            Self::UserAlreadyHasOrganization => "USER_ALREADY_HAS_ORGANIZATION",
            Self::AdviserAlreadyAssigned => "ADVISER_ALREADY_ASSIGNED",
            Self::AdviserEmailAlreadyInUse => "ADVISER_EMAIL_ALREADY_IN_USE",
            Self::DuplicateDatabaseEntry => "DUPLICATE_DATABASE_ENTRY",
        }
    }
}

impl fmt::Display for ConflictCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse failure category every [`AccreditError`] falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Forbidden,
    Conflict,
    Internal,
}

#[derive(Debug, Error)]
pub enum AccreditError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    #[error("Conflict ({code}): {message}")]
    Conflict { code: ConflictCode, message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AccreditError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn conflict(code: ConflictCode, message: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Database(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Machine-readable code for API consumers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::Conflict { code, .. } => code.as_str(),
            Self::Database(_) | Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// The conflict code, if this is a [`AccreditError::Conflict`].
    pub fn conflict_code(&self) -> Option<ConflictCode> {
        match self {
            Self::Conflict { code, .. } => Some(*code),
            _ => None,
        }
    }
}

pub type AccreditResult<T> = Result<T, AccreditError>;
