//! Organization profile domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `org_class` value for organizations that operate across the whole
/// institution.
pub const SYSTEM_WIDE_CLASS: &str = "System-wide";

/// One accreditation cycle of an [`Organization`](super::organization::Organization).
///
/// `is_active` is advisory: the store does not enforce a single active
/// profile per organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationProfile {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub org_name: String,
    pub org_acronym: String,
    pub org_email: String,
    pub org_class: String,
    pub org_department: Option<String>,
    pub org_course: Option<String>,
    pub org_specialization: Option<String>,
    pub adviser_id: Option<Uuid>,
    /// Elected president, once recorded.
    pub president_id: Option<Uuid>,
    pub is_active: bool,
    /// Set by an administrator to permit re-registration from this profile.
    pub is_allowed_for_reuse: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganizationProfile {
    pub organization_id: Uuid,
    pub org_name: String,
    pub org_acronym: String,
    pub org_email: String,
    pub org_class: String,
    pub org_department: Option<String>,
    pub org_course: Option<String>,
    pub org_specialization: Option<String>,
    pub adviser_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateOrganizationProfile {
    pub adviser_id: Option<Uuid>,
    pub president_id: Option<Uuid>,
    pub is_active: Option<bool>,
    pub is_allowed_for_reuse: Option<bool>,
}
