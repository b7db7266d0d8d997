//! Workflow components wired to SurrealDB and the log-only dispatcher.

use accredit_core::error::AccreditResult;
use accredit_db::repository::{
    SurrealAccreditationRepository, SurrealAdviserRepository, SurrealDocumentRepository,
    SurrealOrganizationProfileRepository, SurrealOrganizationRepository,
    SurrealProposalConductRepository, SurrealProposalRepository, SurrealRosterRepository,
    SurrealUserRepository,
};
use accredit_workflow::{
    AccreditationLifecycle, MemoryCodeStore, OrganizationRegistry, ProposalConductWorkflow,
    RosterCompliance, TracingDispatcher, VerificationCodes, WorkflowConfig,
};
use surrealdb::Surreal;
use surrealdb::engine::remote::ws::Client;

pub type Registry = OrganizationRegistry<
    SurrealOrganizationRepository<Client>,
    SurrealOrganizationProfileRepository<Client>,
    SurrealAdviserRepository<Client>,
    SurrealUserRepository<Client>,
    TracingDispatcher,
>;

pub type Lifecycle = AccreditationLifecycle<
    SurrealAccreditationRepository<Client>,
    SurrealOrganizationProfileRepository<Client>,
    SurrealDocumentRepository<Client>,
>;

pub type Conducts = ProposalConductWorkflow<
    SurrealProposalConductRepository<Client>,
    SurrealProposalRepository<Client>,
    SurrealOrganizationProfileRepository<Client>,
    SurrealUserRepository<Client>,
    SurrealDocumentRepository<Client>,
    TracingDispatcher,
>;

pub type Rosters = RosterCompliance<
    SurrealRosterRepository<Client>,
    SurrealAccreditationRepository<Client>,
    SurrealOrganizationProfileRepository<Client>,
>;

pub struct Services {
    pub registry: Registry,
    pub accreditations: Lifecycle,
    pub conducts: Conducts,
    pub rosters: Rosters,
    pub verification: VerificationCodes<MemoryCodeStore>,
}

impl Services {
    pub fn new(db: &Surreal<Client>, config: &WorkflowConfig) -> AccreditResult<Self> {
        Ok(Self {
            registry: OrganizationRegistry::new(
                SurrealOrganizationRepository::new(db.clone()),
                SurrealOrganizationProfileRepository::new(db.clone()),
                SurrealAdviserRepository::new(db.clone()),
                SurrealUserRepository::new(db.clone()),
                TracingDispatcher,
                config.clone(),
            ),
            accreditations: AccreditationLifecycle::new(
                SurrealAccreditationRepository::new(db.clone()),
                SurrealOrganizationProfileRepository::new(db.clone()),
                SurrealDocumentRepository::new(db.clone()),
            ),
            conducts: ProposalConductWorkflow::new(
                SurrealProposalConductRepository::new(db.clone()),
                SurrealProposalRepository::new(db.clone()),
                SurrealOrganizationProfileRepository::new(db.clone()),
                SurrealUserRepository::new(db.clone()),
                SurrealDocumentRepository::new(db.clone()),
                TracingDispatcher,
                config.clone(),
            ),
            rosters: RosterCompliance::new(
                SurrealRosterRepository::new(db.clone()),
                SurrealAccreditationRepository::new(db.clone()),
                SurrealOrganizationProfileRepository::new(db.clone()),
            ),
            verification: VerificationCodes::new(MemoryCodeStore::new(), config)?,
        })
    }
}
