//! Organization domain model.
//!
//! An organization is the identity container that survives across
//! re-registrations. Each accreditation cycle is an
//! [`OrganizationProfile`](super::profile::OrganizationProfile) appended to
//! its profile list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    /// Name at first registration. Never changes.
    pub original_name: String,
    /// Name of the most recent profile.
    pub current_name: String,
    /// Profiles in registration order.
    pub profile_ids: Vec<Uuid>,
    /// False until every step of the registration that created this
    /// organization has succeeded.
    pub registration_complete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganization {
    pub original_name: String,
    pub current_name: String,
}

/// Fields that can be updated on an existing organization.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateOrganization {
    pub current_name: Option<String>,
    pub registration_complete: Option<bool>,
}
