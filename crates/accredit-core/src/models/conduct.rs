//! Proposal conduct domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::proposal::ProposalSnapshot;
use crate::status::ReviewStatus;

/// Execution-tracking record for an approved proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalConduct {
    pub id: Uuid,
    pub proposal_id: Uuid,
    pub proposal: ProposalSnapshot,
    pub overall_status: ReviewStatus,
    /// Latest revision text from a reviewer.
    pub revision: Option<String>,
    pub document_ids: Vec<Uuid>,
    pub collaborating_entities: Vec<String>,
    pub organization_profile_id: Uuid,
    pub organization_id: Option<Uuid>,
    pub accreditation_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateProposalConduct {
    pub proposal_id: Uuid,
    pub proposal: ProposalSnapshot,
    pub overall_status: ReviewStatus,
    pub document_ids: Vec<Uuid>,
    pub collaborating_entities: Vec<String>,
    pub organization_profile_id: Uuid,
    pub organization_id: Option<Uuid>,
    pub accreditation_id: Option<Uuid>,
}

/// Full replacement of the student-editable part of a conduct record.
#[derive(Debug, Clone)]
pub struct ReplaceProposalConduct {
    pub proposal: ProposalSnapshot,
    pub overall_status: ReviewStatus,
    pub document_ids: Vec<Uuid>,
    pub collaborating_entities: Vec<String>,
    pub organization_id: Option<Uuid>,
    pub accreditation_id: Option<Uuid>,
}

/// Reviewer-side partial update.
#[derive(Debug, Clone, Default)]
pub struct UpdateConductStatus {
    pub overall_status: Option<ReviewStatus>,
    pub revision: Option<String>,
}
