//! Membership roster domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::status::ReviewStatus;

/// One roster per organization profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    pub id: Uuid,
    pub organization_profile_id: Uuid,
    pub over_all_status: ReviewStatus,
    pub revision_notes: Option<String>,
    pub is_complete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update; only supplied fields change.
#[derive(Debug, Clone, Default)]
pub struct UpdateRoster {
    pub over_all_status: Option<ReviewStatus>,
    pub revision_notes: Option<String>,
    pub is_complete: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterMember {
    pub id: Uuid,
    pub roster_id: Uuid,
    pub name: String,
    pub email: String,
    pub position: Option<String>,
    pub student_number: Option<String>,
    pub contact_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRosterMember {
    pub roster_id: Uuid,
    pub name: String,
    pub email: String,
    pub position: Option<String>,
    pub student_number: Option<String>,
    pub contact_number: Option<String>,
}
