//! Review status labels.
//!
//! Statuses are persisted and exchanged as free text. Internally they are
//! parsed into [`ReviewStatus`] so that the revision rule is checked in
//! one place. Any label whose lowercase form contains `"revision"` is a
//! revision state and must be accompanied by notes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AccreditError, AccreditResult};

pub const PENDING: &str = "Pending";
pub const APPROVED: &str = "Approved";
pub const CONDUCT_APPROVED: &str = "Conduct Approved";
/// Forced onto a conduct record whenever a student leader edits it.
pub const REVISION_FROM_STUDENT_LEADER: &str = "Revision Update from Student Leader";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    ConductApproved,
    /// Any label containing "revision", kept verbatim.
    RevisionRequested { label: String },
    /// Reviewer-defined label with no special meaning.
    Other(String),
}

impl ReviewStatus {
    pub fn parse(label: &str) -> Self {
        match label {
            PENDING => Self::Pending,
            APPROVED => Self::Approved,
            CONDUCT_APPROVED => Self::ConductApproved,
            other if other.to_lowercase().contains("revision") => Self::RevisionRequested {
                label: other.to_string(),
            },
            other => Self::Other(other.to_string()),
        }
    }

    /// `"Revision from {position}"`, the label used when a reviewer sends
    /// a record back.
    pub fn revision_from(position: &str) -> Self {
        Self::RevisionRequested {
            label: format!("Revision from {position}"),
        }
    }

    pub fn revision_from_student_leader() -> Self {
        Self::RevisionRequested {
            label: REVISION_FROM_STUDENT_LEADER.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => PENDING,
            Self::Approved => APPROVED,
            Self::ConductApproved => CONDUCT_APPROVED,
            Self::RevisionRequested { label } | Self::Other(label) => label,
        }
    }

    pub fn is_revision(&self) -> bool {
        matches!(self, Self::RevisionRequested { .. })
    }

    /// True for an empty or whitespace-only label.
    pub fn is_blank(&self) -> bool {
        self.as_str().trim().is_empty()
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ReviewStatus {
    fn from(label: &str) -> Self {
        Self::parse(label)
    }
}

impl From<String> for ReviewStatus {
    fn from(label: String) -> Self {
        Self::parse(&label)
    }
}

impl From<ReviewStatus> for String {
    fn from(status: ReviewStatus) -> Self {
        match status {
            ReviewStatus::RevisionRequested { label } | ReviewStatus::Other(label) => label,
            other => other.as_str().to_string(),
        }
    }
}

/// A validated status transition: a status plus the notes that go with it.
///
/// Construction fails when the status label is blank, or when the status
/// is a revision state and the notes are missing or blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    status: ReviewStatus,
    notes: Option<String>,
}

impl StatusChange {
    pub fn new(status: impl Into<ReviewStatus>, notes: Option<String>) -> AccreditResult<Self> {
        let status = status.into();
        if status.is_blank() {
            return Err(AccreditError::validation("status is required"));
        }
        let notes = notes.filter(|n| !n.trim().is_empty());
        if status.is_revision() && notes.is_none() {
            return Err(AccreditError::validation(format!(
                "revision notes are required when status is '{status}'"
            )));
        }
        Ok(Self { status, notes })
    }

    pub fn status(&self) -> &ReviewStatus {
        &self.status
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn into_parts(self) -> (ReviewStatus, Option<String>) {
        (self.status, self.notes)
    }
}
