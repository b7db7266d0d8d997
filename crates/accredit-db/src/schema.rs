//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Status labels are free text; the
//! workflow layer owns their meaning.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1: initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Organizations (identity across re-registrations)
-- =======================================================================
DEFINE TABLE organization SCHEMAFULL;
DEFINE FIELD original_name ON TABLE organization TYPE string;
DEFINE FIELD current_name ON TABLE organization TYPE string;
DEFINE FIELD profile_ids ON TABLE organization TYPE array DEFAULT [];
DEFINE FIELD profile_ids.* ON TABLE organization TYPE string;
DEFINE FIELD registration_complete ON TABLE organization TYPE bool \
    DEFAULT false;
DEFINE FIELD created_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Organization profiles (one per accreditation cycle)
-- =======================================================================
DEFINE TABLE organization_profile SCHEMAFULL;
DEFINE FIELD organization_id ON TABLE organization_profile TYPE string;
DEFINE FIELD org_name ON TABLE organization_profile TYPE string;
DEFINE FIELD org_acronym ON TABLE organization_profile TYPE string;
DEFINE FIELD org_email ON TABLE organization_profile TYPE string;
DEFINE FIELD org_class ON TABLE organization_profile TYPE string;
DEFINE FIELD org_department ON TABLE organization_profile \
    TYPE option<string>;
DEFINE FIELD org_course ON TABLE organization_profile \
    TYPE option<string>;
DEFINE FIELD org_specialization ON TABLE organization_profile \
    TYPE option<string>;
DEFINE FIELD adviser_id ON TABLE organization_profile \
    TYPE option<string>;
DEFINE FIELD president_id ON TABLE organization_profile \
    TYPE option<string>;
DEFINE FIELD is_active ON TABLE organization_profile TYPE bool \
    DEFAULT true;
DEFINE FIELD is_allowed_for_reuse ON TABLE organization_profile \
    TYPE bool DEFAULT false;
DEFINE FIELD created_at ON TABLE organization_profile TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE organization_profile TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_profile_organization ON TABLE organization_profile \
    COLUMNS organization_id;

-- =======================================================================
-- Advisers
-- =======================================================================
DEFINE TABLE adviser SCHEMAFULL;
DEFINE FIELD name ON TABLE adviser TYPE string;
DEFINE FIELD email ON TABLE adviser TYPE string;
DEFINE FIELD department ON TABLE adviser TYPE option<string>;
DEFINE FIELD organization_profile_id ON TABLE adviser \
    TYPE option<string>;
DEFINE FIELD created_at ON TABLE adviser TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE adviser TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_adviser_email ON TABLE adviser COLUMNS email UNIQUE;

-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD name ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD position ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE option<string>;
DEFINE FIELD adviser_id ON TABLE user TYPE option<string>;
DEFINE FIELD organization_profile_id ON TABLE user TYPE option<string>;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;
DEFINE INDEX idx_user_profile ON TABLE user \
    COLUMNS organization_profile_id;

-- =======================================================================
-- Accreditations (one per profile)
-- =======================================================================
DEFINE TABLE accreditation SCHEMAFULL;
DEFINE FIELD organization_profile_id ON TABLE accreditation TYPE string;
DEFINE FIELD overall_status ON TABLE accreditation TYPE string \
    DEFAULT 'Pending';
DEFINE FIELD revision_notes ON TABLE accreditation TYPE option<string>;
DEFINE FIELD is_active ON TABLE accreditation TYPE bool DEFAULT true;
DEFINE FIELD joint_statement_id ON TABLE accreditation \
    TYPE option<string>;
DEFINE FIELD pledge_against_hazing_id ON TABLE accreditation \
    TYPE option<string>;
DEFINE FIELD constitution_and_by_laws_id ON TABLE accreditation \
    TYPE option<string>;
DEFINE FIELD roster_id ON TABLE accreditation TYPE option<string>;
DEFINE FIELD financial_report_id ON TABLE accreditation \
    TYPE option<string>;
DEFINE FIELD president_profile_id ON TABLE accreditation \
    TYPE option<string>;
DEFINE FIELD created_at ON TABLE accreditation TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE accreditation TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_accreditation_profile ON TABLE accreditation \
    COLUMNS organization_profile_id UNIQUE;

-- =======================================================================
-- Documents (upload metadata, append-only audit log)
-- =======================================================================
DEFINE TABLE document SCHEMAFULL;
DEFINE FIELD label ON TABLE document TYPE string;
DEFINE FIELD file_name ON TABLE document TYPE string;
DEFINE FIELD status ON TABLE document TYPE string DEFAULT 'Pending';
DEFINE FIELD revision_notes ON TABLE document TYPE option<string>;
DEFINE FIELD logs ON TABLE document TYPE array DEFAULT [];
DEFINE FIELD logs.* ON TABLE document TYPE string;
DEFINE FIELD organization_profile_id ON TABLE document \
    TYPE option<string>;
DEFINE FIELD created_at ON TABLE document TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE document TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Proposals (authored upstream, read for conduct snapshots)
-- =======================================================================
DEFINE TABLE proposal SCHEMAFULL;
DEFINE FIELD title ON TABLE proposal TYPE string;
DEFINE FIELD sdgs ON TABLE proposal TYPE array DEFAULT [];
DEFINE FIELD sdgs.* ON TABLE proposal TYPE string;
DEFINE FIELD budget ON TABLE proposal TYPE float;
DEFINE FIELD venue ON TABLE proposal TYPE string;
DEFINE FIELD details ON TABLE proposal TYPE string;
DEFINE FIELD proposed_date ON TABLE proposal TYPE option<datetime>;
DEFINE FIELD proponents ON TABLE proposal TYPE array DEFAULT [];
DEFINE FIELD proponents.* ON TABLE proposal TYPE string;
DEFINE FIELD organization_profile_id ON TABLE proposal TYPE string;
DEFINE FIELD created_at ON TABLE proposal TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE proposal TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Proposal conduct (embedded proposal snapshot)
-- =======================================================================
DEFINE TABLE proposal_conduct SCHEMAFULL;
DEFINE FIELD proposal_id ON TABLE proposal_conduct TYPE string;
DEFINE FIELD proposal ON TABLE proposal_conduct TYPE object;
DEFINE FIELD proposal.title ON TABLE proposal_conduct TYPE string;
DEFINE FIELD proposal.sdgs ON TABLE proposal_conduct TYPE array;
DEFINE FIELD proposal.sdgs.* ON TABLE proposal_conduct TYPE string;
DEFINE FIELD proposal.budget ON TABLE proposal_conduct TYPE float;
DEFINE FIELD proposal.venue ON TABLE proposal_conduct TYPE string;
DEFINE FIELD proposal.details ON TABLE proposal_conduct TYPE string;
DEFINE FIELD proposal.proposed_date ON TABLE proposal_conduct \
    TYPE option<datetime>;
DEFINE FIELD proposal.proponents ON TABLE proposal_conduct TYPE array;
DEFINE FIELD proposal.proponents.* ON TABLE proposal_conduct \
    TYPE string;
DEFINE FIELD overall_status ON TABLE proposal_conduct TYPE string \
    DEFAULT 'Pending';
DEFINE FIELD revision ON TABLE proposal_conduct TYPE option<string>;
DEFINE FIELD document_ids ON TABLE proposal_conduct TYPE array \
    DEFAULT [];
DEFINE FIELD document_ids.* ON TABLE proposal_conduct TYPE string;
DEFINE FIELD collaborating_entities ON TABLE proposal_conduct \
    TYPE array DEFAULT [];
DEFINE FIELD collaborating_entities.* ON TABLE proposal_conduct \
    TYPE string;
DEFINE FIELD organization_profile_id ON TABLE proposal_conduct \
    TYPE string;
DEFINE FIELD organization_id ON TABLE proposal_conduct \
    TYPE option<string>;
DEFINE FIELD accreditation_id ON TABLE proposal_conduct \
    TYPE option<string>;
DEFINE FIELD created_at ON TABLE proposal_conduct TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE proposal_conduct TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_conduct_profile ON TABLE proposal_conduct \
    COLUMNS organization_profile_id;
DEFINE INDEX idx_conduct_status ON TABLE proposal_conduct \
    COLUMNS overall_status;

-- =======================================================================
-- Rosters (one per profile) and members
-- =======================================================================
DEFINE TABLE roster SCHEMAFULL;
DEFINE FIELD organization_profile_id ON TABLE roster TYPE string;
DEFINE FIELD over_all_status ON TABLE roster TYPE string \
    DEFAULT 'Pending';
DEFINE FIELD revision_notes ON TABLE roster TYPE option<string>;
DEFINE FIELD is_complete ON TABLE roster TYPE bool DEFAULT false;
DEFINE FIELD created_at ON TABLE roster TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE roster TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_roster_profile ON TABLE roster \
    COLUMNS organization_profile_id UNIQUE;

DEFINE TABLE roster_member SCHEMAFULL;
DEFINE FIELD roster_id ON TABLE roster_member TYPE string;
DEFINE FIELD name ON TABLE roster_member TYPE string;
DEFINE FIELD email ON TABLE roster_member TYPE string;
DEFINE FIELD position ON TABLE roster_member TYPE option<string>;
DEFINE FIELD student_number ON TABLE roster_member \
    TYPE option<string>;
DEFINE FIELD contact_number ON TABLE roster_member \
    TYPE option<string>;
DEFINE FIELD created_at ON TABLE roster_member TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_roster_member_roster ON TABLE roster_member \
    COLUMNS roster_id;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );
        db.query(migration.sql).await?.check().map_err(|e| {
            DbError::Migration(format!(
                "Migration v{} '{}' failed: {}",
                migration.version, migration.name, e,
            ))
        })?;

        db.query(
            "CREATE _migration SET version = $version, \
             name = $name",
        )
        .bind(("version", migration.version))
        .bind(("name", migration.name))
        .await?
        .check()
        .map_err(|e| {
            DbError::Migration(format!(
                "Failed to record migration v{}: {}",
                migration.version, e,
            ))
        })?;

        info!(version = migration.version, "Migration applied");
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_defines_every_table() {
        for table in [
            "organization",
            "organization_profile",
            "adviser",
            "user",
            "accreditation",
            "document",
            "proposal",
            "proposal_conduct",
            "roster",
            "roster_member",
        ] {
            assert!(
                SCHEMA_V1.contains(&format!("DEFINE TABLE {table} SCHEMAFULL")),
                "missing table {table}"
            );
        }
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }
}
