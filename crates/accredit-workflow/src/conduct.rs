//! Proposal conduct workflow.
//!
//! A conduct record embeds a snapshot of its proposal taken at creation.
//! Reviewer status changes cascade onto every attached document; a
//! student-leader edit always moves the record to
//! `Revision Update from Student Leader`.

use accredit_core::error::{AccreditError, AccreditResult};
use accredit_core::models::conduct::{
    CreateProposalConduct, ProposalConduct, ReplaceProposalConduct, UpdateConductStatus,
};
use accredit_core::models::profile::SYSTEM_WIDE_CLASS;
use accredit_core::models::proposal::{ProposalSnapshot, SnapshotOverrides};
use accredit_core::models::user::ADVISER_POSITION;
use accredit_core::repository::{
    DocumentRepository, OrganizationProfileRepository, ProposalConductRepository,
    ProposalRepository, UserRepository,
};
use accredit_core::status::{CONDUCT_APPROVED, ReviewStatus, StatusChange};
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::WorkflowConfig;
use crate::documents::{Actor, DocumentSlotManager};
use crate::notify::{DispatchOutcome, Notification, NotificationDispatcher, dispatch_logged};

/// Student-leader request to start tracking a proposal's conduct.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateConductRequest {
    pub proposal_id: Uuid,
    #[serde(default)]
    pub overrides: SnapshotOverrides,
    /// Document produced by the upload collaborator. Required.
    pub document_id: Option<Uuid>,
    pub organization_profile_id: Uuid,
    pub overall_status: Option<String>,
    #[serde(default)]
    pub collaborating_entities: Vec<String>,
    pub organization_id: Option<Uuid>,
    pub accreditation_id: Option<Uuid>,
}

/// Who to tell about a status change.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifyRequest {
    pub subject: String,
    pub organization_profile_id: Uuid,
}

/// Reviewer-side status update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConductStatusUpdate {
    pub overall_status: Option<String>,
    pub revision: Option<String>,
    pub notify: Option<NotifyRequest>,
}

/// Result of [`ProposalConductWorkflow::update_status`].
#[derive(Debug, Clone)]
pub struct ConductStatusResult {
    pub conduct: ProposalConduct,
    /// `None` when no notification was requested or nobody qualified.
    pub notification: Option<DispatchOutcome>,
}

/// Student-leader full edit. `overall_status` is accepted for wire
/// compatibility and ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct FullConductUpdate {
    pub proposal: ProposalSnapshot,
    pub overall_status: Option<String>,
    #[serde(default)]
    pub document_ids: Vec<Uuid>,
    #[serde(default)]
    pub collaborating_entities: Vec<String>,
    pub organization_id: Option<Uuid>,
    pub accreditation_id: Option<Uuid>,
}

pub struct ProposalConductWorkflow<C, S, P, U, D, N>
where
    C: ProposalConductRepository,
    S: ProposalRepository,
    P: OrganizationProfileRepository,
    U: UserRepository,
    D: DocumentRepository,
    N: NotificationDispatcher,
{
    conducts: C,
    proposals: S,
    profiles: P,
    users: U,
    slots: DocumentSlotManager<D>,
    dispatcher: N,
    config: WorkflowConfig,
}

impl<C, S, P, U, D, N> ProposalConductWorkflow<C, S, P, U, D, N>
where
    C: ProposalConductRepository,
    S: ProposalRepository,
    P: OrganizationProfileRepository,
    U: UserRepository,
    D: DocumentRepository,
    N: NotificationDispatcher,
{
    pub fn new(
        conducts: C,
        proposals: S,
        profiles: P,
        users: U,
        documents: D,
        dispatcher: N,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            conducts,
            proposals,
            profiles,
            users,
            slots: DocumentSlotManager::new(documents),
            dispatcher,
            config,
        }
    }

    pub async fn create(&self, request: CreateConductRequest) -> AccreditResult<ProposalConduct> {
        let Some(document_id) = request.document_id else {
            return Err(AccreditError::validation(
                "a conduct document must be uploaded before submission",
            ));
        };
        self.slots.get(document_id).await?;
        self.profiles
            .get_by_id(request.organization_profile_id)
            .await?;
        let proposal = self.proposals.get_by_id(request.proposal_id).await?;

        let overall_status = request
            .overall_status
            .filter(|s| !s.trim().is_empty())
            .map(ReviewStatus::from)
            .unwrap_or_default();

        let conduct = self
            .conducts
            .create(CreateProposalConduct {
                proposal_id: proposal.id,
                proposal: proposal.snapshot().with_overrides(request.overrides),
                overall_status,
                document_ids: vec![document_id],
                collaborating_entities: request.collaborating_entities,
                organization_profile_id: request.organization_profile_id,
                organization_id: request.organization_id,
                accreditation_id: request.accreditation_id,
            })
            .await?;
        info!(
            conduct_id = %conduct.id,
            proposal_id = %proposal.id,
            "Proposal conduct created"
        );
        Ok(conduct)
    }

    pub async fn get(&self, conduct_id: Uuid) -> AccreditResult<ProposalConduct> {
        self.conducts.get_by_id(conduct_id).await
    }

    /// Set status and/or revision text on the conduct record and cascade
    /// both onto every attached document with one audit line each.
    ///
    /// Notification delivery failures are logged and reported in the
    /// result, never returned as errors.
    pub async fn update_status(
        &self,
        conduct_id: Uuid,
        update: ConductStatusUpdate,
        actor: &Actor,
    ) -> AccreditResult<ConductStatusResult> {
        let status = match update.overall_status {
            Some(label) => {
                let change = StatusChange::new(label, update.revision.clone())?;
                Some(change.status().clone())
            }
            None => None,
        };
        let revision = update.revision.filter(|r| !r.trim().is_empty());

        let existing = self.conducts.get_by_id(conduct_id).await?;

        let conduct = self
            .conducts
            .update_status(
                conduct_id,
                UpdateConductStatus {
                    overall_status: status.clone(),
                    revision: revision.clone(),
                },
            )
            .await?;

        self.slots
            .cascade(
                &existing.document_ids,
                status.as_ref(),
                revision.as_deref(),
                actor,
            )
            .await?;
        info!(
            conduct_id = %conduct_id,
            status = %conduct.overall_status,
            actor = %actor.name,
            "Proposal conduct status updated"
        );

        let notification = match update.notify {
            Some(request) => self.notify_members(&conduct, request).await?,
            None => None,
        };

        Ok(ConductStatusResult {
            conduct,
            notification,
        })
    }

    async fn notify_members(
        &self,
        conduct: &ProposalConduct,
        request: NotifyRequest,
    ) -> AccreditResult<Option<DispatchOutcome>> {
        let recipients: Vec<String> = self
            .users
            .list_by_profile(request.organization_profile_id)
            .await?
            .into_iter()
            .filter(|u| u.position != ADVISER_POSITION)
            .map(|u| u.email)
            .collect();

        if recipients.is_empty() {
            debug!(
                profile_id = %request.organization_profile_id,
                "No members to notify"
            );
            return Ok(None);
        }

        let mut message = format!(
            "The conduct record for \"{}\" is now \"{}\".",
            conduct.proposal.title, conduct.overall_status
        );
        if let Some(revision) = &conduct.revision {
            message.push_str(&format!("\n\nReviewer notes: {revision}"));
        }
        message.push_str(&format!("\n\n{}", self.config.portal_name));

        let outcome = dispatch_logged(
            &self.dispatcher,
            Notification {
                recipients,
                subject: request.subject,
                message,
            },
        )
        .await;
        Ok(Some(outcome))
    }

    /// Student-leader edit of the whole record.
    pub async fn update_full(
        &self,
        conduct_id: Uuid,
        input: FullConductUpdate,
    ) -> AccreditResult<ProposalConduct> {
        self.submit_revision_from_student(conduct_id, input).await
    }

    /// Overwrite the snapshot and references from student input and move
    /// the record to `Revision Update from Student Leader`, whatever status
    /// the input carries.
    pub async fn submit_revision_from_student(
        &self,
        conduct_id: Uuid,
        input: FullConductUpdate,
    ) -> AccreditResult<ProposalConduct> {
        self.conducts.get_by_id(conduct_id).await?;

        if let Some(requested) = &input.overall_status {
            debug!(
                conduct_id = %conduct_id,
                requested = %requested,
                "Ignoring caller status on student revision"
            );
        }

        let conduct = self
            .conducts
            .replace(
                conduct_id,
                ReplaceProposalConduct {
                    proposal: input.proposal,
                    overall_status: ReviewStatus::revision_from_student_leader(),
                    document_ids: input.document_ids,
                    collaborating_entities: input.collaborating_entities,
                    organization_id: input.organization_id,
                    accreditation_id: input.accreditation_id,
                },
            )
            .await?;
        info!(conduct_id = %conduct_id, "Student revision submitted");
        Ok(conduct)
    }

    pub async fn delete(&self, conduct_id: Uuid) -> AccreditResult<()> {
        self.conducts.get_by_id(conduct_id).await?;
        self.conducts.delete(conduct_id).await?;
        info!(conduct_id = %conduct_id, "Proposal conduct deleted");
        Ok(())
    }

    pub async fn list_by_profile(
        &self,
        organization_profile_id: Uuid,
    ) -> AccreditResult<Vec<ProposalConduct>> {
        self.conducts.list_by_profile(organization_profile_id).await
    }

    /// Conducts whose status is exactly `Conduct Approved`.
    pub async fn list_done(&self) -> AccreditResult<Vec<ProposalConduct>> {
        self.conducts.list_by_status(CONDUCT_APPROVED).await
    }

    /// Conducts of active `System-wide` profiles.
    pub async fn list_system_wide(&self) -> AccreditResult<Vec<ProposalConduct>> {
        let profile_ids: Vec<Uuid> = self
            .profiles
            .list_active_by_class(SYSTEM_WIDE_CLASS)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();
        self.conducts.list_by_profiles(&profile_ids).await
    }
}
