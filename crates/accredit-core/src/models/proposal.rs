//! Activity proposal model.
//!
//! Proposals are authored and approved upstream of this engine. They are
//! read here only to seed a conduct record's snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub id: Uuid,
    pub title: String,
    pub sdgs: Vec<String>,
    pub budget: f64,
    pub venue: String,
    pub details: String,
    pub proposed_date: Option<DateTime<Utc>>,
    pub proponents: Vec<String>,
    pub organization_profile_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Proposal {
    /// Point-in-time copy of the fields a conduct record carries.
    pub fn snapshot(&self) -> ProposalSnapshot {
        ProposalSnapshot {
            title: self.title.clone(),
            sdgs: self.sdgs.clone(),
            budget: self.budget,
            venue: self.venue.clone(),
            details: self.details.clone(),
            proposed_date: self.proposed_date,
            proponents: self.proponents.clone(),
        }
    }
}

/// The proposal fields embedded in a conduct record. Owned by the conduct
/// record; later edits to the source proposal never reach it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalSnapshot {
    pub title: String,
    pub sdgs: Vec<String>,
    pub budget: f64,
    pub venue: String,
    pub details: String,
    pub proposed_date: Option<DateTime<Utc>>,
    pub proponents: Vec<String>,
}

/// Caller-supplied replacements applied on top of a fresh snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotOverrides {
    pub title: Option<String>,
    pub sdgs: Option<Vec<String>>,
    pub budget: Option<f64>,
    pub venue: Option<String>,
    pub details: Option<String>,
    pub proposed_date: Option<DateTime<Utc>>,
    pub proponents: Option<Vec<String>>,
}

impl ProposalSnapshot {
    pub fn with_overrides(mut self, overrides: SnapshotOverrides) -> Self {
        if let Some(title) = overrides.title {
            self.title = title;
        }
        if let Some(sdgs) = overrides.sdgs {
            self.sdgs = sdgs;
        }
        if let Some(budget) = overrides.budget {
            self.budget = budget;
        }
        if let Some(venue) = overrides.venue {
            self.venue = venue;
        }
        if let Some(details) = overrides.details {
            self.details = details;
        }
        if let Some(date) = overrides.proposed_date {
            self.proposed_date = Some(date);
        }
        if let Some(proponents) = overrides.proponents {
            self.proponents = proponents;
        }
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProposal {
    pub title: String,
    pub sdgs: Vec<String>,
    pub budget: f64,
    pub venue: String,
    pub details: String,
    pub proposed_date: Option<DateTime<Utc>>,
    pub proponents: Vec<String>,
    pub organization_profile_id: Uuid,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProposal {
    pub title: Option<String>,
    pub budget: Option<f64>,
    pub venue: Option<String>,
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> ProposalSnapshot {
        ProposalSnapshot {
            title: "Coastal Cleanup".into(),
            sdgs: vec!["SDG 14".into()],
            budget: 1500.0,
            venue: "Bay Walk".into(),
            details: "Morning cleanup drive".into(),
            proposed_date: None,
            proponents: vec!["Alpha Club".into()],
        }
    }

    #[test]
    fn overrides_replace_only_supplied_fields() {
        let out = snapshot().with_overrides(SnapshotOverrides {
            venue: Some("North Pier".into()),
            budget: Some(2000.0),
            ..Default::default()
        });
        assert_eq!(out.venue, "North Pier");
        assert_eq!(out.budget, 2000.0);
        assert_eq!(out.title, "Coastal Cleanup");
        assert_eq!(out.sdgs, vec!["SDG 14".to_string()]);
    }
}
