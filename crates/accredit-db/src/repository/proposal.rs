//! SurrealDB implementation of [`ProposalRepository`].

use accredit_core::error::AccreditResult;
use accredit_core::models::proposal::{CreateProposal, Proposal, UpdateProposal};
use accredit_core::repository::ProposalRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::single;
use crate::error::{DbError, parse_uuid};

const SELECT_BY_ID: &str =
    "SELECT meta::id(id) AS record_id, * FROM type::record('proposal', $id)";

#[derive(Debug, SurrealValue)]
struct ProposalRow {
    record_id: String,
    title: String,
    sdgs: Vec<String>,
    budget: f64,
    venue: String,
    details: String,
    proposed_date: Option<DateTime<Utc>>,
    proponents: Vec<String>,
    organization_profile_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProposalRow {
    fn try_into_proposal(self) -> Result<Proposal, DbError> {
        Ok(Proposal {
            id: parse_uuid("proposal", &self.record_id)?,
            title: self.title,
            sdgs: self.sdgs,
            budget: self.budget,
            venue: self.venue,
            details: self.details,
            proposed_date: self.proposed_date,
            proponents: self.proponents,
            organization_profile_id: parse_uuid(
                "organization_profile",
                &self.organization_profile_id,
            )?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Proposal repository.
#[derive(Clone)]
pub struct SurrealProposalRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealProposalRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ProposalRepository for SurrealProposalRepository<C> {
    async fn create(&self, input: CreateProposal) -> AccreditResult<Proposal> {
        let id_str = Uuid::new_v4().to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('proposal', $id) SET \
                 title = $title, sdgs = $sdgs, budget = $budget, \
                 venue = $venue, details = $details, \
                 proposed_date = $proposed_date, \
                 proponents = $proponents, \
                 organization_profile_id = $organization_profile_id",
            )
            .query(SELECT_BY_ID)
            .bind(("id", id_str.clone()))
            .bind(("title", input.title))
            .bind(("sdgs", input.sdgs))
            .bind(("budget", input.budget))
            .bind(("venue", input.venue))
            .bind(("details", input.details))
            .bind(("proposed_date", input.proposed_date))
            .bind(("proponents", input.proponents))
            .bind((
                "organization_profile_id",
                input.organization_profile_id.to_string(),
            ))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::statement)?;
        let rows: Vec<ProposalRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, "proposal", id_str)?.try_into_proposal()?)
    }

    async fn get_by_id(&self, id: Uuid) -> AccreditResult<Proposal> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(SELECT_BY_ID)
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProposalRow> = result.take(0).map_err(DbError::from)?;
        Ok(single(rows, "proposal", id_str)?.try_into_proposal()?)
    }

    async fn update(&self, id: Uuid, input: UpdateProposal) -> AccreditResult<Proposal> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.title.is_some() {
            sets.push("title = $title");
        }
        if input.budget.is_some() {
            sets.push("budget = $budget");
        }
        if input.venue.is_some() {
            sets.push("venue = $venue");
        }
        if input.details.is_some() {
            sets.push("details = $details");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('proposal', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .query(SELECT_BY_ID)
            .bind(("id", id_str.clone()));

        if let Some(title) = input.title {
            builder = builder.bind(("title", title));
        }
        if let Some(budget) = input.budget {
            builder = builder.bind(("budget", budget));
        }
        if let Some(venue) = input.venue {
            builder = builder.bind(("venue", venue));
        }
        if let Some(details) = input.details {
            builder = builder.bind(("details", details));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::statement)?;

        let rows: Vec<ProposalRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, "proposal", id_str)?.try_into_proposal()?)
    }
}
