//! SurrealDB implementation of [`OrganizationProfileRepository`].

use accredit_core::error::AccreditResult;
use accredit_core::models::profile::{
    CreateOrganizationProfile, OrganizationProfile, UpdateOrganizationProfile,
};
use accredit_core::repository::OrganizationProfileRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{fold, single};
use crate::error::{DbError, parse_opt_uuid, parse_uuid};

const SELECT_BY_ID: &str =
    "SELECT meta::id(id) AS record_id, * FROM type::record('organization_profile', $id)";

#[derive(Debug, SurrealValue)]
struct ProfileRow {
    record_id: String,
    organization_id: String,
    org_name: String,
    org_acronym: String,
    org_email: String,
    org_class: String,
    org_department: Option<String>,
    org_course: Option<String>,
    org_specialization: Option<String>,
    adviser_id: Option<String>,
    president_id: Option<String>,
    is_active: bool,
    is_allowed_for_reuse: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProfileRow {
    fn try_into_profile(self) -> Result<OrganizationProfile, DbError> {
        Ok(OrganizationProfile {
            id: parse_uuid("organization_profile", &self.record_id)?,
            organization_id: parse_uuid("organization", &self.organization_id)?,
            org_name: self.org_name,
            org_acronym: self.org_acronym,
            org_email: self.org_email,
            org_class: self.org_class,
            org_department: self.org_department,
            org_course: self.org_course,
            org_specialization: self.org_specialization,
            adviser_id: parse_opt_uuid("adviser", self.adviser_id)?,
            president_id: parse_opt_uuid("president", self.president_id)?,
            is_active: self.is_active,
            is_allowed_for_reuse: self.is_allowed_for_reuse,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn into_profiles(rows: Vec<ProfileRow>) -> Result<Vec<OrganizationProfile>, DbError> {
    rows.into_iter().map(ProfileRow::try_into_profile).collect()
}

/// SurrealDB implementation of the OrganizationProfile repository.
#[derive(Clone)]
pub struct SurrealOrganizationProfileRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealOrganizationProfileRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> OrganizationProfileRepository for SurrealOrganizationProfileRepository<C> {
    async fn create(&self, input: CreateOrganizationProfile) -> AccreditResult<OrganizationProfile> {
        let id_str = Uuid::new_v4().to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('organization_profile', $id) SET \
                 organization_id = $organization_id, \
                 org_name = $org_name, org_acronym = $org_acronym, \
                 org_email = $org_email, org_class = $org_class, \
                 org_department = $org_department, \
                 org_course = $org_course, \
                 org_specialization = $org_specialization, \
                 adviser_id = $adviser_id, \
                 president_id = NONE, \
                 is_active = true, \
                 is_allowed_for_reuse = false",
            )
            .query(SELECT_BY_ID)
            .bind(("id", id_str.clone()))
            .bind(("organization_id", input.organization_id.to_string()))
            .bind(("org_name", input.org_name))
            .bind(("org_acronym", input.org_acronym))
            .bind(("org_email", input.org_email))
            .bind(("org_class", input.org_class))
            .bind(("org_department", input.org_department))
            .bind(("org_course", input.org_course))
            .bind(("org_specialization", input.org_specialization))
            .bind(("adviser_id", input.adviser_id.map(|a| a.to_string())))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::statement)?;
        let rows: Vec<ProfileRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, "organization_profile", id_str)?.try_into_profile()?)
    }

    async fn get_by_id(&self, id: Uuid) -> AccreditResult<OrganizationProfile> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(SELECT_BY_ID)
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProfileRow> = result.take(0).map_err(DbError::from)?;
        Ok(single(rows, "organization_profile", id_str)?.try_into_profile()?)
    }

    async fn find_by_name_or_acronym(
        &self,
        name: &str,
        acronym: &str,
    ) -> AccreditResult<Option<OrganizationProfile>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM organization_profile \
                 WHERE string::lowercase(org_name) = $name \
                 OR string::lowercase(org_acronym) = $acronym \
                 LIMIT 1",
            )
            .bind(("name", fold(name)))
            .bind(("acronym", fold(acronym)))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProfileRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .next()
            .map(ProfileRow::try_into_profile)
            .transpose()?)
    }

    async fn update(
        &self,
        id: Uuid,
        input: UpdateOrganizationProfile,
    ) -> AccreditResult<OrganizationProfile> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.adviser_id.is_some() {
            sets.push("adviser_id = $adviser_id");
        }
        if input.president_id.is_some() {
            sets.push("president_id = $president_id");
        }
        if input.is_active.is_some() {
            sets.push("is_active = $is_active");
        }
        if input.is_allowed_for_reuse.is_some() {
            sets.push("is_allowed_for_reuse = $is_allowed_for_reuse");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('organization_profile', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .query(SELECT_BY_ID)
            .bind(("id", id_str.clone()));

        if let Some(adviser_id) = input.adviser_id {
            builder = builder.bind(("adviser_id", adviser_id.to_string()));
        }
        if let Some(president_id) = input.president_id {
            builder = builder.bind(("president_id", president_id.to_string()));
        }
        if let Some(is_active) = input.is_active {
            builder = builder.bind(("is_active", is_active));
        }
        if let Some(is_allowed_for_reuse) = input.is_allowed_for_reuse {
            builder = builder.bind(("is_allowed_for_reuse", is_allowed_for_reuse));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::statement)?;

        let rows: Vec<ProfileRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, "organization_profile", id_str)?.try_into_profile()?)
    }

    async fn list_active_by_class(&self, org_class: &str) -> AccreditResult<Vec<OrganizationProfile>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM organization_profile \
                 WHERE org_class = $org_class AND is_active = true \
                 ORDER BY created_at ASC",
            )
            .bind(("org_class", org_class.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ProfileRow> = result.take(0).map_err(DbError::from)?;
        Ok(into_profiles(rows)?)
    }

    async fn deactivate_all(&self) -> AccreditResult<u64> {
        let result = self
            .db
            .query(
                "UPDATE organization_profile SET is_active = false, \
                 updated_at = time::now() RETURN NONE",
            )
            .query("SELECT count() AS total FROM organization_profile GROUP ALL")
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::statement)?;
        let counts: Vec<CountRow> = result.take(1).map_err(DbError::from)?;
        Ok(counts.first().map(|r| r.total).unwrap_or(0))
    }

    async fn delete(&self, id: Uuid) -> AccreditResult<()> {
        self.db
            .query("DELETE type::record('organization_profile', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::statement)?;

        Ok(())
    }
}
