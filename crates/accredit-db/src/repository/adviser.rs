//! SurrealDB implementation of [`AdviserRepository`].

use accredit_core::error::AccreditResult;
use accredit_core::models::adviser::{Adviser, CreateAdviser, UpdateAdviser};
use accredit_core::repository::AdviserRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{fold, single};
use crate::error::{DbError, parse_opt_uuid, parse_uuid};

const SELECT_BY_ID: &str =
    "SELECT meta::id(id) AS record_id, * FROM type::record('adviser', $id)";

#[derive(Debug, SurrealValue)]
struct AdviserRow {
    record_id: String,
    name: String,
    email: String,
    department: Option<String>,
    organization_profile_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AdviserRow {
    fn try_into_adviser(self) -> Result<Adviser, DbError> {
        Ok(Adviser {
            id: parse_uuid("adviser", &self.record_id)?,
            name: self.name,
            email: self.email,
            department: self.department,
            organization_profile_id: parse_opt_uuid(
                "organization_profile",
                self.organization_profile_id,
            )?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Adviser repository.
///
/// Emails are folded to lowercase on write so the unique index on
/// `email` is case-insensitive.
#[derive(Clone)]
pub struct SurrealAdviserRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAdviserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AdviserRepository for SurrealAdviserRepository<C> {
    async fn create(&self, input: CreateAdviser) -> AccreditResult<Adviser> {
        let id_str = Uuid::new_v4().to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('adviser', $id) SET \
                 name = $name, email = $email, \
                 department = $department, \
                 organization_profile_id = NONE",
            )
            .query(SELECT_BY_ID)
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("email", fold(&input.email)))
            .bind(("department", input.department))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::statement)?;
        let rows: Vec<AdviserRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, "adviser", id_str)?.try_into_adviser()?)
    }

    async fn get_by_id(&self, id: Uuid) -> AccreditResult<Adviser> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(SELECT_BY_ID)
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AdviserRow> = result.take(0).map_err(DbError::from)?;
        Ok(single(rows, "adviser", id_str)?.try_into_adviser()?)
    }

    async fn find_by_email(&self, email: &str) -> AccreditResult<Option<Adviser>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM adviser \
                 WHERE email = $email LIMIT 1",
            )
            .bind(("email", fold(email)))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AdviserRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .next()
            .map(AdviserRow::try_into_adviser)
            .transpose()?)
    }

    async fn update(&self, id: Uuid, input: UpdateAdviser) -> AccreditResult<Adviser> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.organization_profile_id.is_some() {
            sets.push("organization_profile_id = $organization_profile_id");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('adviser', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .query(SELECT_BY_ID)
            .bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(profile_id) = input.organization_profile_id {
            // Some(None) clears the binding.
            builder = builder.bind((
                "organization_profile_id",
                profile_id.map(|p| p.to_string()),
            ));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::statement)?;

        let rows: Vec<AdviserRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, "adviser", id_str)?.try_into_adviser()?)
    }

    async fn delete(&self, id: Uuid) -> AccreditResult<()> {
        self.db
            .query("DELETE type::record('adviser', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::statement)?;

        Ok(())
    }
}
