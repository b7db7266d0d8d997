//! SurrealDB repository implementations.

mod accreditation;
mod adviser;
mod conduct;
mod document;
mod organization;
mod profile;
mod proposal;
mod roster;
mod user;

pub use accreditation::SurrealAccreditationRepository;
pub use adviser::SurrealAdviserRepository;
pub use conduct::SurrealProposalConductRepository;
pub use document::SurrealDocumentRepository;
pub use organization::SurrealOrganizationRepository;
pub use profile::SurrealOrganizationProfileRepository;
pub use proposal::SurrealProposalRepository;
pub use roster::SurrealRosterRepository;
pub use user::SurrealUserRepository;

use crate::error::DbError;

/// Takes the single row a by-id statement is expected to return.
fn single<T>(rows: Vec<T>, entity: &str, id: impl Into<String>) -> Result<T, DbError> {
    rows.into_iter().next().ok_or_else(|| DbError::NotFound {
        entity: entity.into(),
        id: id.into(),
    })
}

/// Lowercased, trimmed key used for case-insensitive lookups.
fn fold(value: &str) -> String {
    value.trim().to_lowercase()
}
