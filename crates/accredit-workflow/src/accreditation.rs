//! Accreditation lifecycle: lazy per-profile packages, document slots,
//! overall status and the administrative deactivation broadcast.

use accredit_core::error::{AccreditError, AccreditResult, ConflictCode};
use accredit_core::models::accreditation::{Accreditation, DocumentSlot, UpdateAccreditation};
use accredit_core::models::document::Document;
use accredit_core::repository::{
    AccreditationRepository, DocumentRepository, OrganizationProfileRepository,
};
use accredit_core::status::{ReviewStatus, StatusChange};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::documents::DocumentSlotManager;

/// Records touched by [`AccreditationLifecycle::deactivate_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeactivationSummary {
    pub accreditations: u64,
    pub profiles: u64,
}

/// One fixed slot of a package with the attached document's status.
#[derive(Debug, Clone, Serialize)]
pub struct SlotState {
    pub slot: DocumentSlot,
    pub document_id: Option<Uuid>,
    /// `None` when the slot is empty or the referenced document is gone.
    pub status: Option<ReviewStatus>,
}

pub struct AccreditationLifecycle<A, P, D>
where
    A: AccreditationRepository,
    P: OrganizationProfileRepository,
    D: DocumentRepository,
{
    accreditations: A,
    profiles: P,
    slots: DocumentSlotManager<D>,
}

impl<A, P, D> AccreditationLifecycle<A, P, D>
where
    A: AccreditationRepository,
    P: OrganizationProfileRepository,
    D: DocumentRepository,
{
    pub fn new(accreditations: A, profiles: P, documents: D) -> Self {
        Self {
            accreditations,
            profiles,
            slots: DocumentSlotManager::new(documents),
        }
    }

    pub fn documents(&self) -> &DocumentSlotManager<D> {
        &self.slots
    }

    /// Return the profile's accreditation, creating a `Pending`, active one
    /// with empty slots if none exists.
    pub async fn get_or_create(&self, organization_profile_id: Uuid) -> AccreditResult<Accreditation> {
        if let Some(existing) = self
            .accreditations
            .find_by_profile(organization_profile_id)
            .await?
        {
            return Ok(existing);
        }

        self.profiles.get_by_id(organization_profile_id).await?;

        match self.accreditations.create(organization_profile_id).await {
            Ok(created) => {
                info!(
                    accreditation_id = %created.id,
                    profile_id = %organization_profile_id,
                    "Accreditation created"
                );
                Ok(created)
            }
            // Lost a race with a concurrent create; the unique index kept
            // the other one.
            Err(AccreditError::Conflict {
                code: ConflictCode::DuplicateDatabaseEntry,
                ..
            }) => self
                .accreditations
                .find_by_profile(organization_profile_id)
                .await?
                .ok_or_else(|| {
                    AccreditError::Internal(format!(
                        "accreditation for profile {organization_profile_id} vanished after conflict"
                    ))
                }),
            Err(e) => Err(e),
        }
    }

    pub async fn get(&self, accreditation_id: Uuid) -> AccreditResult<Accreditation> {
        self.accreditations.get_by_id(accreditation_id).await
    }

    pub async fn list(&self) -> AccreditResult<Vec<Accreditation>> {
        self.accreditations.list().await
    }

    /// Clear `is_active` on every accreditation and every organization
    /// profile in the store. Unscoped.
    pub async fn deactivate_all(&self) -> AccreditResult<DeactivationSummary> {
        let accreditations = self.accreditations.deactivate_all().await?;
        let profiles = self.profiles.deactivate_all().await?;
        warn!(accreditations, profiles, "All accreditations and profiles deactivated");
        Ok(DeactivationSummary {
            accreditations,
            profiles,
        })
    }

    /// Attach a document to one of the fixed slots. `doc_type` must name a
    /// [`DocumentSlot`] exactly.
    pub async fn attach_document(
        &self,
        accreditation_id: Uuid,
        doc_type: &str,
        document_id: Uuid,
    ) -> AccreditResult<Accreditation> {
        let slot: DocumentSlot = doc_type.parse()?;
        self.accreditations.get_by_id(accreditation_id).await?;
        self.slots.get(document_id).await?;

        let accreditation = self
            .accreditations
            .set_slot(accreditation_id, slot, document_id)
            .await?;
        info!(
            accreditation_id = %accreditation_id,
            slot = %slot,
            document_id = %document_id,
            "Document attached"
        );
        Ok(accreditation)
    }

    pub async fn attach_financial_report(
        &self,
        accreditation_id: Uuid,
        document_id: Uuid,
    ) -> AccreditResult<Accreditation> {
        self.accreditations.get_by_id(accreditation_id).await?;
        self.slots.get(document_id).await?;

        self.accreditations
            .update(
                accreditation_id,
                UpdateAccreditation {
                    financial_report_id: Some(document_id),
                    ..Default::default()
                },
            )
            .await
    }

    pub async fn attach_president_profile(
        &self,
        accreditation_id: Uuid,
        president_profile_id: Uuid,
    ) -> AccreditResult<Accreditation> {
        self.accreditations.get_by_id(accreditation_id).await?;

        self.accreditations
            .update(
                accreditation_id,
                UpdateAccreditation {
                    president_profile_id: Some(president_profile_id),
                    ..Default::default()
                },
            )
            .await
    }

    /// Reviewer status update on a single document. A revision status
    /// requires non-empty notes.
    pub async fn update_document_status(
        &self,
        document_id: Uuid,
        status: &str,
        revision_notes: Option<String>,
    ) -> AccreditResult<Document> {
        let change = StatusChange::new(status, revision_notes)?;
        self.slots.update_status(document_id, change).await
    }

    /// Set the package's overall status. Same notes rule as documents;
    /// notes are cleared when the new status carries none.
    pub async fn update_overall_status(
        &self,
        accreditation_id: Uuid,
        status: &str,
        revision_notes: Option<String>,
    ) -> AccreditResult<Accreditation> {
        let (status, notes) = StatusChange::new(status, revision_notes)?.into_parts();
        self.accreditations.get_by_id(accreditation_id).await?;

        let accreditation = self
            .accreditations
            .update(
                accreditation_id,
                UpdateAccreditation {
                    overall_status: Some(status),
                    revision_notes: Some(notes),
                    ..Default::default()
                },
            )
            .await?;
        info!(
            accreditation_id = %accreditation_id,
            status = %accreditation.overall_status,
            "Accreditation status updated"
        );
        Ok(accreditation)
    }

    /// Each fixed slot with its attached document's current status.
    pub async fn slot_overview(&self, accreditation_id: Uuid) -> AccreditResult<Vec<SlotState>> {
        let accreditation = self.accreditations.get_by_id(accreditation_id).await?;

        let attached: Vec<Uuid> = DocumentSlot::ALL
            .iter()
            .filter_map(|slot| accreditation.slot(*slot))
            .collect();
        let documents = self.slots.get_many(&attached).await?;

        Ok(DocumentSlot::ALL
            .iter()
            .map(|slot| {
                let document_id = accreditation.slot(*slot);
                let status = document_id.and_then(|id| {
                    documents
                        .iter()
                        .find(|d| d.id == id)
                        .map(|d| d.status.clone())
                });
                SlotState {
                    slot: *slot,
                    document_id,
                    status,
                }
            })
            .collect())
    }
}
