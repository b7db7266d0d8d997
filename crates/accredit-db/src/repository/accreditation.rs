//! SurrealDB implementation of [`AccreditationRepository`].

use accredit_core::error::AccreditResult;
use accredit_core::models::accreditation::{Accreditation, DocumentSlot, UpdateAccreditation};
use accredit_core::repository::AccreditationRepository;
use accredit_core::status::ReviewStatus;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::single;
use crate::error::{DbError, parse_opt_uuid, parse_uuid};

const SELECT_BY_ID: &str =
    "SELECT meta::id(id) AS record_id, * FROM type::record('accreditation', $id)";

#[derive(Debug, SurrealValue)]
struct AccreditationRow {
    record_id: String,
    organization_profile_id: String,
    overall_status: String,
    revision_notes: Option<String>,
    is_active: bool,
    joint_statement_id: Option<String>,
    pledge_against_hazing_id: Option<String>,
    constitution_and_by_laws_id: Option<String>,
    roster_id: Option<String>,
    financial_report_id: Option<String>,
    president_profile_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccreditationRow {
    fn try_into_accreditation(self) -> Result<Accreditation, DbError> {
        Ok(Accreditation {
            id: parse_uuid("accreditation", &self.record_id)?,
            organization_profile_id: parse_uuid(
                "organization_profile",
                &self.organization_profile_id,
            )?,
            overall_status: ReviewStatus::from(self.overall_status),
            revision_notes: self.revision_notes,
            is_active: self.is_active,
            joint_statement_id: parse_opt_uuid("document", self.joint_statement_id)?,
            pledge_against_hazing_id: parse_opt_uuid("document", self.pledge_against_hazing_id)?,
            constitution_and_by_laws_id: parse_opt_uuid(
                "document",
                self.constitution_and_by_laws_id,
            )?,
            roster_id: parse_opt_uuid("roster", self.roster_id)?,
            financial_report_id: parse_opt_uuid("document", self.financial_report_id)?,
            president_profile_id: parse_opt_uuid("president", self.president_profile_id)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Accreditation repository.
#[derive(Clone)]
pub struct SurrealAccreditationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAccreditationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AccreditationRepository for SurrealAccreditationRepository<C> {
    async fn create(&self, organization_profile_id: Uuid) -> AccreditResult<Accreditation> {
        let id_str = Uuid::new_v4().to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('accreditation', $id) SET \
                 organization_profile_id = $organization_profile_id, \
                 overall_status = 'Pending', \
                 revision_notes = NONE, \
                 is_active = true, \
                 joint_statement_id = NONE, \
                 pledge_against_hazing_id = NONE, \
                 constitution_and_by_laws_id = NONE, \
                 roster_id = NONE, \
                 financial_report_id = NONE, \
                 president_profile_id = NONE",
            )
            .query(SELECT_BY_ID)
            .bind(("id", id_str.clone()))
            .bind((
                "organization_profile_id",
                organization_profile_id.to_string(),
            ))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::statement)?;
        let rows: Vec<AccreditationRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, "accreditation", id_str)?.try_into_accreditation()?)
    }

    async fn get_by_id(&self, id: Uuid) -> AccreditResult<Accreditation> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(SELECT_BY_ID)
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AccreditationRow> = result.take(0).map_err(DbError::from)?;
        Ok(single(rows, "accreditation", id_str)?.try_into_accreditation()?)
    }

    async fn find_by_profile(
        &self,
        organization_profile_id: Uuid,
    ) -> AccreditResult<Option<Accreditation>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM accreditation \
                 WHERE organization_profile_id = $organization_profile_id \
                 LIMIT 1",
            )
            .bind((
                "organization_profile_id",
                organization_profile_id.to_string(),
            ))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AccreditationRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .next()
            .map(AccreditationRow::try_into_accreditation)
            .transpose()?)
    }

    async fn update(&self, id: Uuid, input: UpdateAccreditation) -> AccreditResult<Accreditation> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.overall_status.is_some() {
            sets.push("overall_status = $overall_status");
        }
        if input.revision_notes.is_some() {
            sets.push("revision_notes = $revision_notes");
        }
        if input.is_active.is_some() {
            sets.push("is_active = $is_active");
        }
        if input.roster_id.is_some() {
            sets.push("roster_id = $roster_id");
        }
        if input.financial_report_id.is_some() {
            sets.push("financial_report_id = $financial_report_id");
        }
        if input.president_profile_id.is_some() {
            sets.push("president_profile_id = $president_profile_id");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('accreditation', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .query(SELECT_BY_ID)
            .bind(("id", id_str.clone()));

        if let Some(status) = input.overall_status {
            builder = builder.bind(("overall_status", String::from(status)));
        }
        if let Some(notes) = input.revision_notes {
            builder = builder.bind(("revision_notes", notes));
        }
        if let Some(is_active) = input.is_active {
            builder = builder.bind(("is_active", is_active));
        }
        if let Some(roster_id) = input.roster_id {
            builder = builder.bind(("roster_id", roster_id.to_string()));
        }
        if let Some(report_id) = input.financial_report_id {
            builder = builder.bind(("financial_report_id", report_id.to_string()));
        }
        if let Some(president_id) = input.president_profile_id {
            builder = builder.bind(("president_profile_id", president_id.to_string()));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::statement)?;

        let rows: Vec<AccreditationRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, "accreditation", id_str)?.try_into_accreditation()?)
    }

    async fn set_slot(
        &self,
        id: Uuid,
        slot: DocumentSlot,
        document_id: Uuid,
    ) -> AccreditResult<Accreditation> {
        let id_str = id.to_string();

        // Field names come from a closed enum, never from caller input.
        let query = format!(
            "UPDATE type::record('accreditation', $id) SET \
             {} = $document_id, updated_at = time::now()",
            slot.field()
        );

        let result = self
            .db
            .query(&query)
            .query(SELECT_BY_ID)
            .bind(("id", id_str.clone()))
            .bind(("document_id", document_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::statement)?;
        let rows: Vec<AccreditationRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, "accreditation", id_str)?.try_into_accreditation()?)
    }

    async fn list(&self) -> AccreditResult<Vec<Accreditation>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM accreditation \
                 ORDER BY created_at ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AccreditationRow> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(AccreditationRow::try_into_accreditation)
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(items)
    }

    async fn deactivate_all(&self) -> AccreditResult<u64> {
        let result = self
            .db
            .query(
                "UPDATE accreditation SET is_active = false, \
                 updated_at = time::now() RETURN NONE",
            )
            .query("SELECT count() AS total FROM accreditation GROUP ALL")
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::statement)?;
        let counts: Vec<CountRow> = result.take(1).map_err(DbError::from)?;
        Ok(counts.first().map(|r| r.total).unwrap_or(0))
    }
}
