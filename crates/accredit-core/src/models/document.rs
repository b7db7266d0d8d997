//! Uploaded document metadata.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::status::ReviewStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub label: String,
    pub file_name: String,
    pub status: ReviewStatus,
    pub revision_notes: Option<String>,
    /// Append-only audit lines, oldest first.
    pub logs: Vec<String>,
    pub organization_profile_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDocument {
    pub label: String,
    pub file_name: String,
    pub organization_profile_id: Option<Uuid>,
}

/// Formats one audit line:
/// `[2024-05-01T09:30:00.000Z] Updated by Jane Cruz (Adviser) → Status: Approved`.
pub fn audit_line(at: DateTime<Utc>, actor: &str, role: &str, status: &ReviewStatus) -> String {
    format!(
        "[{}] Updated by {actor} ({role}) → Status: {status}",
        at.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn audit_line_format() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let line = audit_line(
            at,
            "Jane Cruz",
            "Adviser",
            &ReviewStatus::parse("Revision from Adviser"),
        );
        assert_eq!(
            line,
            "[2024-05-01T09:30:00.000Z] Updated by Jane Cruz (Adviser) → Status: Revision from Adviser"
        );
    }
}
