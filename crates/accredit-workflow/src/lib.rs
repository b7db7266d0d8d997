//! Accreditation workflow: organization registration, accreditation
//! packages and document slots, proposal conduct, membership rosters,
//! and the notification and one-time-code capabilities they consume.

pub mod accreditation;
pub mod conduct;
pub mod config;
pub mod credentials;
pub mod documents;
pub mod error;
pub mod notify;
pub mod registry;
pub mod roster;
pub mod verification;

pub use accreditation::{AccreditationLifecycle, DeactivationSummary, SlotState};
pub use conduct::{
    ConductStatusResult, ConductStatusUpdate, CreateConductRequest, FullConductUpdate,
    NotifyRequest, ProposalConductWorkflow,
};
pub use config::WorkflowConfig;
pub use documents::{Actor, DocumentSlotManager};
pub use error::CredentialError;
pub use notify::{DispatchOutcome, Notification, NotificationDispatcher, TracingDispatcher};
pub use registry::{AdviserFields, OrganizationFields, OrganizationRegistry, Registration};
pub use roster::{AddRosterMember, RosterCompliance};
pub use verification::{CodeStore, MemoryCodeStore, StoredCode, VerificationCodes};
