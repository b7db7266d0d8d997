//! Credential error types.

use accredit_core::error::AccreditError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("invalid hash format: {0}")]
    MalformedHash(String),

    #[error("verify error: {0}")]
    Verify(String),
}

impl From<CredentialError> for AccreditError {
    fn from(err: CredentialError) -> Self {
        AccreditError::Internal(err.to_string())
    }
}
