//! SurrealDB implementation of [`DocumentRepository`].
//!
//! The `logs` array is append-only: no statement in this module assigns
//! it, they only push onto it with `+=`.

use accredit_core::error::AccreditResult;
use accredit_core::models::document::{CreateDocument, Document};
use accredit_core::repository::DocumentRepository;
use accredit_core::status::ReviewStatus;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::single;
use crate::error::{DbError, parse_opt_uuid, parse_uuid};

const SELECT_BY_ID: &str =
    "SELECT meta::id(id) AS record_id, * FROM type::record('document', $id)";

#[derive(Debug, SurrealValue)]
struct DocumentRow {
    record_id: String,
    label: String,
    file_name: String,
    status: String,
    revision_notes: Option<String>,
    logs: Vec<String>,
    organization_profile_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DocumentRow {
    fn try_into_document(self) -> Result<Document, DbError> {
        Ok(Document {
            id: parse_uuid("document", &self.record_id)?,
            label: self.label,
            file_name: self.file_name,
            status: ReviewStatus::from(self.status),
            revision_notes: self.revision_notes,
            logs: self.logs,
            organization_profile_id: parse_opt_uuid(
                "organization_profile",
                self.organization_profile_id,
            )?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Document repository.
#[derive(Clone)]
pub struct SurrealDocumentRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealDocumentRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> DocumentRepository for SurrealDocumentRepository<C> {
    async fn create(&self, input: CreateDocument) -> AccreditResult<Document> {
        let id_str = Uuid::new_v4().to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('document', $id) SET \
                 label = $label, file_name = $file_name, \
                 status = 'Pending', revision_notes = NONE, logs = [], \
                 organization_profile_id = $organization_profile_id",
            )
            .query(SELECT_BY_ID)
            .bind(("id", id_str.clone()))
            .bind(("label", input.label))
            .bind(("file_name", input.file_name))
            .bind((
                "organization_profile_id",
                input.organization_profile_id.map(|p| p.to_string()),
            ))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::statement)?;
        let rows: Vec<DocumentRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, "document", id_str)?.try_into_document()?)
    }

    async fn get_by_id(&self, id: Uuid) -> AccreditResult<Document> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(SELECT_BY_ID)
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DocumentRow> = result.take(0).map_err(DbError::from)?;
        Ok(single(rows, "document", id_str)?.try_into_document()?)
    }

    async fn get_many(&self, ids: &[Uuid]) -> AccreditResult<Vec<Document>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let id_strs: Vec<String> = ids.iter().map(Uuid::to_string).collect();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM document \
                 WHERE meta::id(id) IN $ids",
            )
            .bind(("ids", id_strs))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DocumentRow> = result.take(0).map_err(DbError::from)?;
        let mut documents = rows
            .into_iter()
            .map(DocumentRow::try_into_document)
            .collect::<Result<Vec<_>, DbError>>()?;
        documents.sort_by_key(|d| ids.iter().position(|id| *id == d.id));
        Ok(documents)
    }

    async fn set_review(
        &self,
        id: Uuid,
        status: ReviewStatus,
        revision_notes: Option<String>,
    ) -> AccreditResult<Document> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('document', $id) SET \
                 status = $status, revision_notes = $revision_notes, \
                 updated_at = time::now()",
            )
            .query(SELECT_BY_ID)
            .bind(("id", id_str.clone()))
            .bind(("status", String::from(status)))
            .bind(("revision_notes", revision_notes))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::statement)?;
        let rows: Vec<DocumentRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, "document", id_str)?.try_into_document()?)
    }

    async fn apply_review_logged(
        &self,
        id: Uuid,
        status: Option<ReviewStatus>,
        revision_notes: Option<String>,
        log_line: String,
    ) -> AccreditResult<Document> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if status.is_some() {
            sets.push("status = $status");
        }
        if revision_notes.is_some() {
            sets.push("revision_notes = $revision_notes");
        }
        sets.push("logs += $log_line");
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('document', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .query(SELECT_BY_ID)
            .bind(("id", id_str.clone()))
            .bind(("log_line", log_line));

        if let Some(status) = status {
            builder = builder.bind(("status", String::from(status)));
        }
        if let Some(notes) = revision_notes {
            builder = builder.bind(("revision_notes", notes));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::statement)?;

        let rows: Vec<DocumentRow> = result.take(1).map_err(DbError::from)?;
        Ok(single(rows, "document", id_str)?.try_into_document()?)
    }
}
