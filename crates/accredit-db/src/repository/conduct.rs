//! SurrealDB implementation of [`ProposalConductRepository`].
//!
//! The proposal snapshot is stored as an embedded object, not as a
//! record link, so later edits to the source proposal cannot reach it.

use accredit_core::error::AccreditResult;
use accredit_core::models::conduct::{
    CreateProposalConduct, ProposalConduct, ReplaceProposalConduct, UpdateConductStatus,
};
use accredit_core::models::proposal::ProposalSnapshot;
use accredit_core::repository::ProposalConductRepository;
use accredit_core::status::ReviewStatus;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::single;
use crate::error::{DbError, parse_opt_uuid, parse_uuid, parse_uuids};

const SELECT_BY_ID: &str =
    "SELECT meta::id(id) AS record_id, * FROM type::record('proposal_conduct', $id)";

#[derive(Debug, SurrealValue)]
struct SnapshotRow {
    title: String,
    sdgs: Vec<String>,
    budget: f64,
    venue: String,
    details: String,
    proposed_date: Option<DateTime<Utc>>,
    proponents: Vec<String>,
}

impl From<ProposalSnapshot> for SnapshotRow {
    fn from(s: ProposalSnapshot) -> Self {
        Self {
            title: s.title,
            sdgs: s.sdgs,
            budget: s.budget,
            venue: s.venue,
            details: s.details,
            proposed_date: s.proposed_date,
            proponents: s.proponents,
        }
    }
}

impl From<SnapshotRow> for ProposalSnapshot {
    fn from(r: SnapshotRow) -> Self {
        Self {
            title: r.title,
            sdgs: r.sdgs,
            budget: r.budget,
            venue: r.venue,
            details: r.details,
            proposed_date: r.proposed_date,
            proponents: r.proponents,
        }
    }
}

#[derive(Debug, SurrealValue)]
struct ConductRow {
    record_id: String,
    proposal_id: String,
    proposal: SnapshotRow,
    overall_status: String,
    revision: Option<String>,
    document_ids: Vec<String>,
    collaborating_entities: Vec<String>,
    organization_profile_id: String,
    organization_id: Option<String>,
    accreditation_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ConductRow {
    fn try_into_conduct(self) -> Result<ProposalConduct, DbError> {
        Ok(ProposalConduct {
            id: parse_uuid("proposal_conduct", &self.record_id)?,
            proposal_id: parse_uuid("proposal", &self.proposal_id)?,
            proposal: self.proposal.into(),
            overall_status: ReviewStatus::from(self.overall_status),
            revision: self.revision,
            document_ids: parse_uuids("document", self.document_ids)?,
            collaborating_entities: self.collaborating_entities,
            organization_profile_id: parse_uuid(
                "organization_profile",
                &self.organization_profile_id,
            )?,
            organization_id: parse_opt_uuid("organization", self.organization_id)?,
            accreditation_id: parse_opt_uuid("accreditation", self.accreditation_id)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn into_conducts(rows: Vec<ConductRow>) -> Result<Vec<ProposalConduct>, DbError> {
    rows.into_iter().map(ConductRow::try_into_conduct).collect()
}

fn id_strings(ids: &[Uuid]) -> Vec<String> {
    ids.iter().map(Uuid::to_string).collect()
}

/// SurrealDB implementation of the ProposalConduct repository.
#[derive(Clone)]
pub struct SurrealProposalConductRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealProposalConductRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn list_where(
        &self,
        condition: &str,
        binding: (&'static str, Vec<String>),
    ) -> Result<Vec<ProposalConduct>, DbError> {
        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM proposal_conduct \
             WHERE {condition} ORDER BY created_at ASC"
        );
        let mut result = self.db.query(&query).bind(binding).await?;
        let rows: Vec<ConductRow> = result.take(0)?;
        into_conducts(rows)
    }
}

impl<C: Connection> ProposalConductRepository for SurrealProposalConductRepository<C> {
    async fn create(&self, input: CreateProposalConduct) -> AccreditResult<ProposalConduct> {
        let id_str = Uuid::new_v4().to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('proposal_conduct', $id) SET \
                 proposal_id = $proposal_id, proposal = $proposal, \
                 overall_status = $overall_status, revision = NONE, \
                 document_ids = $document_ids, \
                 collaborating_entities = $collaborating_entities, \
                 organization_profile_id = $organization_profile_id, \
                 organization_id = $organization_id, \
                 accreditation_id = $accreditation_id",
            )
            .query(SELECT_BY_ID)
            .bind(("id", id_str.clone()))
            .bind(("proposal_id", input.proposal_id.to_string()))
            .bind(("proposal", SnapshotRow::from(input.proposal)))
            .bind(("overall_status", String::from(input.overall_status)))
            .bind(("document_ids", id_strings(&input.document_ids)))
            .bind(("collaborating_entities", input.collaborating_entities))
            .bind((
                "organization_profile_id",
                input.organization_profile_id.to_string(),
            ))
            .bind((
                "organization_id",
                input.organization_id.map(|o| o.to_string()),
            ))
            .bind((
                "accreditation_id",
                input.accreditation_id.map(|a| a.to_string()),
            ))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::statement)?;
        let rows: Vec<ConductRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, "proposal_conduct", id_str)?.try_into_conduct()?)
    }

    async fn get_by_id(&self, id: Uuid) -> AccreditResult<ProposalConduct> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(SELECT_BY_ID)
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ConductRow> = result.take(0).map_err(DbError::from)?;
        Ok(single(rows, "proposal_conduct", id_str)?.try_into_conduct()?)
    }

    async fn replace(
        &self,
        id: Uuid,
        input: ReplaceProposalConduct,
    ) -> AccreditResult<ProposalConduct> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('proposal_conduct', $id) SET \
                 proposal = $proposal, \
                 overall_status = $overall_status, \
                 document_ids = $document_ids, \
                 collaborating_entities = $collaborating_entities, \
                 organization_id = $organization_id, \
                 accreditation_id = $accreditation_id, \
                 updated_at = time::now()",
            )
            .query(SELECT_BY_ID)
            .bind(("id", id_str.clone()))
            .bind(("proposal", SnapshotRow::from(input.proposal)))
            .bind(("overall_status", String::from(input.overall_status)))
            .bind(("document_ids", id_strings(&input.document_ids)))
            .bind(("collaborating_entities", input.collaborating_entities))
            .bind((
                "organization_id",
                input.organization_id.map(|o| o.to_string()),
            ))
            .bind((
                "accreditation_id",
                input.accreditation_id.map(|a| a.to_string()),
            ))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::statement)?;
        let rows: Vec<ConductRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, "proposal_conduct", id_str)?.try_into_conduct()?)
    }

    async fn update_status(
        &self,
        id: Uuid,
        input: UpdateConductStatus,
    ) -> AccreditResult<ProposalConduct> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.overall_status.is_some() {
            sets.push("overall_status = $overall_status");
        }
        if input.revision.is_some() {
            sets.push("revision = $revision");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('proposal_conduct', $id) SET {}",
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
        if let Some(revision) = input.revision {
            builder = builder.bind(("revision", revision));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::statement)?;

        let rows: Vec<ConductRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, "proposal_conduct", id_str)?.try_into_conduct()?)
    }

    async fn delete(&self, id: Uuid) -> AccreditResult<()> {
        self.db
            .query("DELETE type::record('proposal_conduct', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::statement)?;

        Ok(())
    }

    async fn list_by_profile(
        &self,
        organization_profile_id: Uuid,
    ) -> AccreditResult<Vec<ProposalConduct>> {
        Ok(self
            .list_where(
                "organization_profile_id IN $ids",
                ("ids", vec![organization_profile_id.to_string()]),
            )
            .await?)
    }

    async fn list_by_profiles(
        &self,
        organization_profile_ids: &[Uuid],
    ) -> AccreditResult<Vec<ProposalConduct>> {
        if organization_profile_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .list_where(
                "organization_profile_id IN $ids",
                ("ids", id_strings(organization_profile_ids)),
            )
            .await?)
    }

    async fn list_by_status(&self, overall_status: &str) -> AccreditResult<Vec<ProposalConduct>> {
        Ok(self
            .list_where(
                "overall_status IN $statuses",
                ("statuses", vec![overall_status.to_string()]),
            )
            .await?)
    }
}
