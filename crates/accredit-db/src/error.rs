//! Database-specific error types and conversions.

use accredit_core::error::{AccreditError, ConflictCode};

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Unique index violation: {0}")]
    Duplicate(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Invalid database configuration: {0}")]
    Config(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl DbError {
    /// Classifies a statement error returned by `Response::check`.
    ///
    /// SurrealDB reports unique index violations as "Database index `…`
    /// already contains …".
    pub(crate) fn statement(err: surrealdb::Error) -> Self {
        let message = err.to_string();
        if message.contains("already contains") {
            DbError::Duplicate(message)
        } else {
            DbError::Query(message)
        }
    }
}

impl From<DbError> for AccreditError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => AccreditError::not_found(&entity, id),
            DbError::Duplicate(message) => AccreditError::Conflict {
                code: ConflictCode::DuplicateDatabaseEntry,
                message,
            },
            other => AccreditError::Database(other.to_string()),
        }
    }
}

/// Parses a UUID stored as a string column.
pub(crate) fn parse_uuid(field: &str, value: &str) -> Result<uuid::Uuid, DbError> {
    uuid::Uuid::parse_str(value).map_err(|e| DbError::Corrupt(format!("invalid {field} UUID: {e}")))
}

pub(crate) fn parse_opt_uuid(
    field: &str,
    value: Option<String>,
) -> Result<Option<uuid::Uuid>, DbError> {
    value.map(|v| parse_uuid(field, &v)).transpose()
}

pub(crate) fn parse_uuids(field: &str, values: Vec<String>) -> Result<Vec<uuid::Uuid>, DbError> {
    values.iter().map(|v| parse_uuid(field, v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_maps_to_database_entry_conflict() {
        let err: AccreditError = DbError::Duplicate("index already contains".into()).into();
        assert_eq!(
            err.conflict_code(),
            Some(ConflictCode::DuplicateDatabaseEntry)
        );
    }

    #[test]
    fn not_found_is_preserved() {
        let err: AccreditError = DbError::NotFound {
            entity: "roster".into(),
            id: "r1".into(),
        }
        .into();
        assert!(matches!(err, AccreditError::NotFound { .. }));
    }

    #[test]
    fn bad_uuid_is_corrupt() {
        assert!(matches!(
            parse_uuid("roster", "not-a-uuid"),
            Err(DbError::Corrupt(_))
        ));
        assert_eq!(parse_opt_uuid("roster", None).unwrap(), None);
    }
}
