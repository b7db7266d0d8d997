//! SurrealDB implementation of [`OrganizationRepository`].

use accredit_core::error::AccreditResult;
use accredit_core::models::organization::{
    CreateOrganization, Organization, UpdateOrganization,
};
use accredit_core::repository::OrganizationRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{fold, single};
use crate::error::{DbError, parse_uuid, parse_uuids};

const SELECT_BY_ID: &str =
    "SELECT meta::id(id) AS record_id, * FROM type::record('organization', $id)";

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct OrganizationRow {
    record_id: String,
    original_name: String,
    current_name: String,
    profile_ids: Vec<String>,
    registration_complete: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrganizationRow {
    fn try_into_organization(self) -> Result<Organization, DbError> {
        Ok(Organization {
            id: parse_uuid("organization", &self.record_id)?,
            original_name: self.original_name,
            current_name: self.current_name,
            profile_ids: parse_uuids("profile", self.profile_ids)?,
            registration_complete: self.registration_complete,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Organization repository.
#[derive(Clone)]
pub struct SurrealOrganizationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealOrganizationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> OrganizationRepository for SurrealOrganizationRepository<C> {
    async fn create(&self, input: CreateOrganization) -> AccreditResult<Organization> {
        let id_str = Uuid::new_v4().to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('organization', $id) SET \
                 original_name = $original_name, \
                 current_name = $current_name, \
                 profile_ids = [], \
                 registration_complete = false",
            )
            .query(SELECT_BY_ID)
            .bind(("id", id_str.clone()))
            .bind(("original_name", input.original_name))
            .bind(("current_name", input.current_name))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::statement)?;
        let rows: Vec<OrganizationRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, "organization", id_str)?.try_into_organization()?)
    }

    async fn get_by_id(&self, id: Uuid) -> AccreditResult<Organization> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(SELECT_BY_ID)
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        Ok(single(rows, "organization", id_str)?.try_into_organization()?)
    }

    async fn find_by_name(&self, name: &str) -> AccreditResult<Option<Organization>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM organization \
                 WHERE string::lowercase(original_name) = $name \
                 OR string::lowercase(current_name) = $name \
                 LIMIT 1",
            )
            .bind(("name", fold(name)))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .next()
            .map(OrganizationRow::try_into_organization)
            .transpose()?)
    }

    async fn update(&self, id: Uuid, input: UpdateOrganization) -> AccreditResult<Organization> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.current_name.is_some() {
            sets.push("current_name = $current_name");
        }
        if input.registration_complete.is_some() {
            sets.push("registration_complete = $registration_complete");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('organization', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .query(SELECT_BY_ID)
            .bind(("id", id_str.clone()));

        if let Some(current_name) = input.current_name {
            builder = builder.bind(("current_name", current_name));
        }
        if let Some(registration_complete) = input.registration_complete {
            builder = builder.bind(("registration_complete", registration_complete));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::statement)?;

        let rows: Vec<OrganizationRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, "organization", id_str)?.try_into_organization()?)
    }

    async fn append_profile(&self, id: Uuid, profile_id: Uuid) -> AccreditResult<Organization> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('organization', $id) SET \
                 profile_ids += $profile_id, updated_at = time::now()",
            )
            .query(SELECT_BY_ID)
            .bind(("id", id_str.clone()))
            .bind(("profile_id", profile_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::statement)?;
        let rows: Vec<OrganizationRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, "organization", id_str)?.try_into_organization()?)
    }

    async fn delete(&self, id: Uuid) -> AccreditResult<()> {
        self.db
            .query("DELETE type::record('organization', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::statement)?;

        Ok(())
    }
}
