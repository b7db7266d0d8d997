//! SurrealDB implementation of [`RosterRepository`].
//!
//! Members live in their own `roster_member` table keyed by `roster_id`.

use accredit_core::error::AccreditResult;
use accredit_core::models::roster::{CreateRosterMember, Roster, RosterMember, UpdateRoster};
use accredit_core::repository::RosterRepository;
use accredit_core::status::ReviewStatus;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::single;
use crate::error::{DbError, parse_uuid};

const SELECT_BY_ID: &str = "SELECT meta::id(id) AS record_id, * FROM type::record('roster', $id)";

const SELECT_MEMBER_BY_ID: &str =
    "SELECT meta::id(id) AS record_id, * FROM type::record('roster_member', $id)";

#[derive(Debug, SurrealValue)]
struct RosterRow {
    record_id: String,
    organization_profile_id: String,
    over_all_status: String,
    revision_notes: Option<String>,
    is_complete: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RosterRow {
    fn try_into_roster(self) -> Result<Roster, DbError> {
        Ok(Roster {
            id: parse_uuid("roster", &self.record_id)?,
            organization_profile_id: parse_uuid(
                "organization_profile",
                &self.organization_profile_id,
            )?,
            over_all_status: ReviewStatus::from(self.over_all_status),
            revision_notes: self.revision_notes,
            is_complete: self.is_complete,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct MemberRow {
    record_id: String,
    roster_id: String,
    name: String,
    email: String,
    position: Option<String>,
    student_number: Option<String>,
    contact_number: Option<String>,
    created_at: DateTime<Utc>,
}

impl MemberRow {
    fn try_into_member(self) -> Result<RosterMember, DbError> {
        Ok(RosterMember {
            id: parse_uuid("roster_member", &self.record_id)?,
            roster_id: parse_uuid("roster", &self.roster_id)?,
            name: self.name,
            email: self.email,
            position: self.position,
            student_number: self.student_number,
            contact_number: self.contact_number,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the Roster repository.
#[derive(Clone)]
pub struct SurrealRosterRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRosterRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> RosterRepository for SurrealRosterRepository<C> {
    async fn create(&self, organization_profile_id: Uuid) -> AccreditResult<Roster> {
        let id_str = Uuid::new_v4().to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('roster', $id) SET \
                 organization_profile_id = $organization_profile_id, \
                 over_all_status = 'Pending', revision_notes = NONE, \
                 is_complete = false",
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
        let rows: Vec<RosterRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, "roster", id_str)?.try_into_roster()?)
    }

    async fn get_by_id(&self, id: Uuid) -> AccreditResult<Roster> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(SELECT_BY_ID)
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RosterRow> = result.take(0).map_err(DbError::from)?;
        Ok(single(rows, "roster", id_str)?.try_into_roster()?)
    }

    async fn find_by_profile(&self, organization_profile_id: Uuid) -> AccreditResult<Option<Roster>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM roster \
                 WHERE organization_profile_id = $organization_profile_id \
                 LIMIT 1",
            )
            .bind((
                "organization_profile_id",
                organization_profile_id.to_string(),
            ))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RosterRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .next()
            .map(RosterRow::try_into_roster)
            .transpose()?)
    }

    async fn update(&self, id: Uuid, input: UpdateRoster) -> AccreditResult<Roster> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.over_all_status.is_some() {
            sets.push("over_all_status = $over_all_status");
        }
        if input.revision_notes.is_some() {
            sets.push("revision_notes = $revision_notes");
        }
        if input.is_complete.is_some() {
            sets.push("is_complete = $is_complete");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('roster', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .query(SELECT_BY_ID)
            .bind(("id", id_str.clone()));

        if let Some(status) = input.over_all_status {
            builder = builder.bind(("over_all_status", String::from(status)));
        }
        if let Some(notes) = input.revision_notes {
            builder = builder.bind(("revision_notes", notes));
        }
        if let Some(is_complete) = input.is_complete {
            builder = builder.bind(("is_complete", is_complete));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::statement)?;

        let rows: Vec<RosterRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, "roster", id_str)?.try_into_roster()?)
    }

    async fn add_member(&self, input: CreateRosterMember) -> AccreditResult<RosterMember> {
        let id_str = Uuid::new_v4().to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('roster_member', $id) SET \
                 roster_id = $roster_id, name = $name, email = $email, \
                 position = $position, student_number = $student_number, \
                 contact_number = $contact_number",
            )
            .query(SELECT_MEMBER_BY_ID)
            .bind(("id", id_str.clone()))
            .bind(("roster_id", input.roster_id.to_string()))
            .bind(("name", input.name))
            .bind(("email", input.email))
            .bind(("position", input.position))
            .bind(("student_number", input.student_number))
            .bind(("contact_number", input.contact_number))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::statement)?;
        let rows: Vec<MemberRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, "roster_member", id_str)?.try_into_member()?)
    }

    async fn list_members(&self, roster_id: Uuid) -> AccreditResult<Vec<RosterMember>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM roster_member \
                 WHERE roster_id = $roster_id ORDER BY created_at ASC",
            )
            .bind(("roster_id", roster_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MemberRow> = result.take(0).map_err(DbError::from)?;
        let members = rows
            .into_iter()
            .map(MemberRow::try_into_member)
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(members)
    }

    async fn remove_member(&self, member_id: Uuid) -> AccreditResult<()> {
        let id_str = member_id.to_string();

        let mut result = self
            .db
            .query(SELECT_MEMBER_BY_ID)
            .query("DELETE type::record('roster_member', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MemberRow> = result.take(0).map_err(DbError::from)?;
        single(rows, "roster_member", id_str)?;
        Ok(())
    }
}
