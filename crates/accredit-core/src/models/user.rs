//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Position held by users created for an organization's adviser.
pub const ADVISER_POSITION: &str = "Adviser";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Stored trimmed and lowercased.
    pub email: String,
    /// Free-text position, e.g. `"Student Leader"` or `"Adviser"`.
    pub position: String,
    /// Argon2id PHC string, absent for users provisioned elsewhere.
    pub password_hash: Option<String>,
    /// Role linkage to an adviser record.
    pub adviser_id: Option<Uuid>,
    /// Membership linkage to an organization profile.
    pub organization_profile_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub position: String,
    pub password_hash: Option<String>,
    pub adviser_id: Option<Uuid>,
    pub organization_profile_id: Option<Uuid>,
}

/// `Some(None)` clears a linkage, `None` leaves it unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub position: Option<String>,
    pub password_hash: Option<String>,
    pub adviser_id: Option<Option<Uuid>>,
    pub organization_profile_id: Option<Option<Uuid>>,
}
