//! Document slot manager: upload registration, reviewer status updates
//! and cascades from a parent record onto its attached documents.

use accredit_core::error::{AccreditError, AccreditResult};
use accredit_core::models::document::{CreateDocument, Document, audit_line};
use accredit_core::repository::DocumentRepository;
use accredit_core::status::{ReviewStatus, StatusChange};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// Who performed a reviewer action, as written into audit lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    /// Role label, e.g. `Adviser` or `SDU Coordinator`.
    pub position: String,
}

impl Actor {
    pub fn new(name: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: position.into(),
        }
    }
}

pub struct DocumentSlotManager<D: DocumentRepository> {
    documents: D,
}

impl<D: DocumentRepository> DocumentSlotManager<D> {
    pub fn new(documents: D) -> Self {
        Self { documents }
    }

    /// Record metadata for a file the upload collaborator has stored.
    pub async fn register_upload(&self, input: CreateDocument) -> AccreditResult<Document> {
        if input.label.trim().is_empty() {
            return Err(AccreditError::validation("document label is required"));
        }
        if input.file_name.trim().is_empty() {
            return Err(AccreditError::validation("document file name is required"));
        }

        let document = self.documents.create(input).await?;
        info!(document_id = %document.id, label = %document.label, "Document registered");
        Ok(document)
    }

    pub async fn get(&self, document_id: Uuid) -> AccreditResult<Document> {
        self.documents.get_by_id(document_id).await
    }

    /// The documents that still exist among `document_ids`.
    pub async fn get_many(&self, document_ids: &[Uuid]) -> AccreditResult<Vec<Document>> {
        self.documents.get_many(document_ids).await
    }

    /// Persist a reviewer decision on one document. No audit line is
    /// written; only cascades log.
    pub async fn update_status(
        &self,
        document_id: Uuid,
        change: StatusChange,
    ) -> AccreditResult<Document> {
        self.documents.get_by_id(document_id).await?;

        let (status, notes) = change.into_parts();
        let document = self.documents.set_review(document_id, status, notes).await?;
        info!(
            document_id = %document.id,
            status = %document.status,
            "Document status updated"
        );
        Ok(document)
    }

    /// Apply `status` and `notes` (each optional) to every document in
    /// `document_ids` that exists, appending exactly one audit line to each.
    ///
    /// The audit line records the status the document holds after the
    /// update.
    pub async fn cascade(
        &self,
        document_ids: &[Uuid],
        status: Option<&ReviewStatus>,
        notes: Option<&str>,
        actor: &Actor,
    ) -> AccreditResult<Vec<Document>> {
        let documents = self.documents.get_many(document_ids).await?;
        let mut updated = Vec::with_capacity(documents.len());

        for document in documents {
            let logged_status = status.unwrap_or(&document.status);
            let line = audit_line(Utc::now(), &actor.name, &actor.position, logged_status);
            let document = self
                .documents
                .apply_review_logged(
                    document.id,
                    status.cloned(),
                    notes.map(str::to_string),
                    line,
                )
                .await?;
            updated.push(document);
        }

        info!(
            documents = updated.len(),
            actor = %actor.name,
            "Status cascaded onto attached documents"
        );
        Ok(updated)
    }
}
