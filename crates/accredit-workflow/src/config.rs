//! Workflow configuration.

use serde::Deserialize;

/// Configuration shared by the workflow components.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Optional pepper prepended to adviser passwords before Argon2id
    /// hashing.
    pub pepper: Option<String>,
    /// Random bytes behind each generated adviser password
    /// (default: 12, which encodes to 16 characters).
    pub generated_password_bytes: usize,
    /// Portal name used in notification subjects and bodies.
    pub portal_name: String,
    /// Lifetime of a registration verification code in seconds
    /// (default: 600 = 10 minutes).
    pub verification_code_ttl_secs: u64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            pepper: None,
            generated_password_bytes: 12,
            portal_name: "Student Organization Accreditation Portal".into(),
            verification_code_ttl_secs: 600,
        }
    }
}
