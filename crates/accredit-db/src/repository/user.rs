//! SurrealDB implementation of [`UserRepository`].
//!
//! Password hashing happens in the workflow layer; this repository only
//! stores the resulting PHC string.

use accredit_core::error::AccreditResult;
use accredit_core::models::user::{CreateUser, UpdateUser, User};
use accredit_core::repository::UserRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{fold, single};
use crate::error::{DbError, parse_opt_uuid, parse_uuid};

const SELECT_BY_ID: &str = "SELECT meta::id(id) AS record_id, * FROM type::record('user', $id)";

#[derive(Debug, SurrealValue)]
struct UserRow {
    record_id: String,
    name: String,
    email: String,
    position: String,
    password_hash: Option<String>,
    adviser_id: Option<String>,
    organization_profile_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn try_into_user(self) -> Result<User, DbError> {
        Ok(User {
            id: parse_uuid("user", &self.record_id)?,
            name: self.name,
            email: self.email,
            position: self.position,
            password_hash: self.password_hash,
            adviser_id: parse_opt_uuid("adviser", self.adviser_id)?,
            organization_profile_id: parse_opt_uuid(
                "organization_profile",
                self.organization_profile_id,
            )?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the User repository.
#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, input: CreateUser) -> AccreditResult<User> {
        let id_str = Uuid::new_v4().to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('user', $id) SET \
                 name = $name, email = $email, position = $position, \
                 password_hash = $password_hash, \
                 adviser_id = $adviser_id, \
                 organization_profile_id = $organization_profile_id",
            )
            .query(SELECT_BY_ID)
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("email", fold(&input.email)))
            .bind(("position", input.position))
            .bind(("password_hash", input.password_hash))
            .bind(("adviser_id", input.adviser_id.map(|a| a.to_string())))
            .bind((
                "organization_profile_id",
                input.organization_profile_id.map(|p| p.to_string()),
            ))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::statement)?;
        let rows: Vec<UserRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, "user", id_str)?.try_into_user()?)
    }

    async fn get_by_id(&self, id: Uuid) -> AccreditResult<User> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(SELECT_BY_ID)
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        Ok(single(rows, "user", id_str)?.try_into_user()?)
    }

    async fn find_by_email(&self, email: &str) -> AccreditResult<Option<User>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE email = $email LIMIT 1",
            )
            .bind(("email", fold(email)))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .next()
            .map(UserRow::try_into_user)
            .transpose()?)
    }

    async fn update(&self, id: Uuid, input: UpdateUser) -> AccreditResult<User> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.position.is_some() {
            sets.push("position = $position");
        }
        if input.password_hash.is_some() {
            sets.push("password_hash = $password_hash");
        }
        if input.adviser_id.is_some() {
            sets.push("adviser_id = $adviser_id");
        }
        if input.organization_profile_id.is_some() {
            sets.push("organization_profile_id = $organization_profile_id");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('user', $id) SET {}",
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
        if let Some(position) = input.position {
            builder = builder.bind(("position", position));
        }
        if let Some(password_hash) = input.password_hash {
            builder = builder.bind(("password_hash", password_hash));
        }
        if let Some(adviser_id) = input.adviser_id {
            builder = builder.bind(("adviser_id", adviser_id.map(|a| a.to_string())));
        }
        if let Some(profile_id) = input.organization_profile_id {
            builder = builder.bind((
                "organization_profile_id",
                profile_id.map(|p| p.to_string()),
            ));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::statement)?;

        let rows: Vec<UserRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, "user", id_str)?.try_into_user()?)
    }

    async fn list_by_profile(&self, organization_profile_id: Uuid) -> AccreditResult<Vec<User>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE organization_profile_id = $organization_profile_id \
                 ORDER BY created_at ASC",
            )
            .bind((
                "organization_profile_id",
                organization_profile_id.to_string(),
            ))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let users = rows
            .into_iter()
            .map(UserRow::try_into_user)
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(users)
    }

    async fn delete(&self, id: Uuid) -> AccreditResult<()> {
        self.db
            .query("DELETE type::record('user', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(DbError::statement)?;

        Ok(())
    }
}
