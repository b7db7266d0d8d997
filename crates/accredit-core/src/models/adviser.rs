//! Adviser domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A faculty adviser. An adviser email resolves to at most one
/// organization profile binding at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adviser {
    pub id: Uuid,
    pub name: String,
    /// Stored trimmed and lowercased.
    pub email: String,
    pub department: Option<String>,
    pub organization_profile_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Adviser {
    pub fn is_bound(&self) -> bool {
        self.organization_profile_id.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAdviser {
    pub name: String,
    pub email: String,
    pub department: Option<String>,
}

/// Rebinds an adviser. `Some(None)` clears the binding.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateAdviser {
    pub name: Option<String>,
    pub organization_profile_id: Option<Option<Uuid>>,
}
