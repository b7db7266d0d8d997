//! Accreditation domain model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AccreditError;
use crate::status::ReviewStatus;

/// The review package of one organization profile.
///
/// Created lazily on first access and never hard-deleted, only
/// deactivated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Accreditation {
    pub id: Uuid,
    pub organization_profile_id: Uuid,
    pub overall_status: ReviewStatus,
    pub revision_notes: Option<String>,
    pub is_active: bool,
    pub joint_statement_id: Option<Uuid>,
    pub pledge_against_hazing_id: Option<Uuid>,
    pub constitution_and_by_laws_id: Option<Uuid>,
    pub roster_id: Option<Uuid>,
    pub financial_report_id: Option<Uuid>,
    pub president_profile_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Accreditation {
    pub fn slot(&self, slot: DocumentSlot) -> Option<Uuid> {
        match slot {
            DocumentSlot::JointStatement => self.joint_statement_id,
            DocumentSlot::PledgeAgainstHazing => self.pledge_against_hazing_id,
            DocumentSlot::ConstitutionAndByLaws => self.constitution_and_by_laws_id,
        }
    }
}

/// The fixed document slots that can be attached through the generic
/// slot mechanism. Roster, financial report and president profile have
/// dedicated operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentSlot {
    JointStatement,
    PledgeAgainstHazing,
    ConstitutionAndByLaws,
}

impl DocumentSlot {
    pub const ALL: [DocumentSlot; 3] = [
        DocumentSlot::JointStatement,
        DocumentSlot::PledgeAgainstHazing,
        DocumentSlot::ConstitutionAndByLaws,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JointStatement => "JointStatement",
            Self::PledgeAgainstHazing => "PledgeAgainstHazing",
            Self::ConstitutionAndByLaws => "ConstitutionAndByLaws",
        }
    }

    /// Column holding this slot's document reference.
    pub fn field(&self) -> &'static str {
        match self {
            Self::JointStatement => "joint_statement_id",
            Self::PledgeAgainstHazing => "pledge_against_hazing_id",
            Self::ConstitutionAndByLaws => "constitution_and_by_laws_id",
        }
    }
}

impl fmt::Display for DocumentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentSlot {
    type Err = AccreditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "JointStatement" => Ok(Self::JointStatement),
            "PledgeAgainstHazing" => Ok(Self::PledgeAgainstHazing),
            "ConstitutionAndByLaws" => Ok(Self::ConstitutionAndByLaws),
            other => Err(AccreditError::validation(format!(
                "invalid document type '{other}', expected one of \
                 JointStatement, PledgeAgainstHazing, ConstitutionAndByLaws"
            ))),
        }
    }
}

/// Partial update. Reference fields only ever get set, never cleared.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccreditation {
    pub overall_status: Option<ReviewStatus>,
    /// `Some(None)` clears the notes.
    pub revision_notes: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub roster_id: Option<Uuid>,
    pub financial_report_id: Option<Uuid>,
    pub president_profile_id: Option<Uuid>,
}
