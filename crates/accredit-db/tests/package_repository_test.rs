//! Integration tests for the accreditation, document and roster
//! repositories using in-memory SurrealDB.

use accredit_core::error::{AccreditError, ConflictCode};
use accredit_core::models::accreditation::{DocumentSlot, UpdateAccreditation};
use accredit_core::models::document::CreateDocument;
use accredit_core::models::roster::{CreateRosterMember, UpdateRoster};
use accredit_core::repository::{AccreditationRepository, DocumentRepository, RosterRepository};
use accredit_core::status::ReviewStatus;
use accredit_db::repository::{
    SurrealAccreditationRepository, SurrealDocumentRepository, SurrealRosterRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    accredit_db::run_migrations(&db).await.unwrap();
    db
}

fn document(label: &str) -> CreateDocument {
    CreateDocument {
        label: label.into(),
        file_name: format!("{label}.pdf"),
        organization_profile_id: None,
    }
}

#[tokio::test]
async fn accreditation_starts_pending_with_empty_slots() {
    let db = setup().await;
    let repo = SurrealAccreditationRepository::new(db);
    let profile_id = Uuid::new_v4();

    let acc = repo.create(profile_id).await.unwrap();
    assert_eq!(acc.overall_status, ReviewStatus::Pending);
    assert!(acc.is_active);
    for slot in DocumentSlot::ALL {
        assert!(acc.slot(slot).is_none());
    }
    assert!(acc.roster_id.is_none());

    let found = repo.find_by_profile(profile_id).await.unwrap();
    assert_eq!(found.map(|a| a.id), Some(acc.id));
}

#[tokio::test]
async fn accreditation_second_create_for_profile_conflicts() {
    let db = setup().await;
    let repo = SurrealAccreditationRepository::new(db);
    let profile_id = Uuid::new_v4();

    repo.create(profile_id).await.unwrap();
    let err = repo.create(profile_id).await.unwrap_err();
    assert_eq!(
        err.conflict_code(),
        Some(ConflictCode::DuplicateDatabaseEntry)
    );
}

#[tokio::test]
async fn accreditation_set_slot_touches_only_that_slot() {
    let db = setup().await;
    let repo = SurrealAccreditationRepository::new(db);
    let acc = repo.create(Uuid::new_v4()).await.unwrap();

    let doc_id = Uuid::new_v4();
    let acc = repo
        .set_slot(acc.id, DocumentSlot::PledgeAgainstHazing, doc_id)
        .await
        .unwrap();

    assert_eq!(acc.pledge_against_hazing_id, Some(doc_id));
    assert!(acc.joint_statement_id.is_none());
    assert!(acc.constitution_and_by_laws_id.is_none());
}

#[tokio::test]
async fn accreditation_update_is_partial() {
    let db = setup().await;
    let repo = SurrealAccreditationRepository::new(db);
    let acc = repo.create(Uuid::new_v4()).await.unwrap();
    let report_id = Uuid::new_v4();

    let acc = repo
        .update(
            acc.id,
            UpdateAccreditation {
                financial_report_id: Some(report_id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(acc.financial_report_id, Some(report_id));
    assert_eq!(acc.overall_status, ReviewStatus::Pending);

    let acc = repo
        .update(
            acc.id,
            UpdateAccreditation {
                overall_status: Some(ReviewStatus::revision_from("SDU")),
                revision_notes: Some(Some("Missing signatures".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(acc.overall_status.as_str(), "Revision from SDU");
    assert_eq!(acc.revision_notes.as_deref(), Some("Missing signatures"));
    assert_eq!(acc.financial_report_id, Some(report_id));
}

#[tokio::test]
async fn accreditation_list_and_deactivate_all() {
    let db = setup().await;
    let repo = SurrealAccreditationRepository::new(db);
    repo.create(Uuid::new_v4()).await.unwrap();
    repo.create(Uuid::new_v4()).await.unwrap();

    assert_eq!(repo.deactivate_all().await.unwrap(), 2);
    let all = repo.list().await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|a| !a.is_active));
}

#[tokio::test]
async fn accreditation_missing_is_not_found() {
    let db = setup().await;
    let repo = SurrealAccreditationRepository::new(db);

    let err = repo.get_by_id(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AccreditError::NotFound { .. }));
}

#[tokio::test]
async fn document_logged_review_appends_lines() {
    let db = setup().await;
    let repo = SurrealDocumentRepository::new(db);
    let doc = repo.create(document("constitution")).await.unwrap();
    assert_eq!(doc.status, ReviewStatus::Pending);
    assert!(doc.logs.is_empty());

    repo.apply_review_logged(
        doc.id,
        Some(ReviewStatus::Approved),
        None,
        "first".into(),
    )
    .await
    .unwrap();
    let doc = repo
        .apply_review_logged(doc.id, None, Some("note".into()), "second".into())
        .await
        .unwrap();

    assert_eq!(doc.logs, vec!["first".to_string(), "second".to_string()]);
    assert_eq!(doc.status, ReviewStatus::Approved);
    assert_eq!(doc.revision_notes.as_deref(), Some("note"));
}

#[tokio::test]
async fn document_set_review_leaves_logs_alone() {
    let db = setup().await;
    let repo = SurrealDocumentRepository::new(db);
    let doc = repo.create(document("pledge")).await.unwrap();

    let doc = repo
        .set_review(
            doc.id,
            ReviewStatus::revision_from("Adviser"),
            Some("Sign page 2".into()),
        )
        .await
        .unwrap();
    assert!(doc.status.is_revision());
    assert!(doc.logs.is_empty());
}

#[tokio::test]
async fn document_get_many_skips_missing_and_keeps_order() {
    let db = setup().await;
    let repo = SurrealDocumentRepository::new(db);
    let a = repo.create(document("a")).await.unwrap();
    let b = repo.create(document("b")).await.unwrap();

    let docs = repo.get_many(&[b.id, Uuid::new_v4(), a.id]).await.unwrap();
    let ids: Vec<Uuid> = docs.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![b.id, a.id]);

    assert!(repo.get_many(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn roster_is_unique_per_profile() {
    let db = setup().await;
    let repo = SurrealRosterRepository::new(db);
    let profile_id = Uuid::new_v4();

    let roster = repo.create(profile_id).await.unwrap();
    assert_eq!(roster.over_all_status, ReviewStatus::Pending);
    assert!(!roster.is_complete);

    let err = repo.create(profile_id).await.unwrap_err();
    assert_eq!(
        err.conflict_code(),
        Some(ConflictCode::DuplicateDatabaseEntry)
    );

    let found = repo.find_by_profile(profile_id).await.unwrap();
    assert_eq!(found.map(|r| r.id), Some(roster.id));
}

#[tokio::test]
async fn roster_update_only_touches_supplied_fields() {
    let db = setup().await;
    let repo = SurrealRosterRepository::new(db);
    let roster = repo.create(Uuid::new_v4()).await.unwrap();

    let roster = repo
        .update(
            roster.id,
            UpdateRoster {
                revision_notes: Some("Add student numbers".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(roster.over_all_status, ReviewStatus::Pending);
    assert_eq!(roster.revision_notes.as_deref(), Some("Add student numbers"));

    let roster = repo
        .update(
            roster.id,
            UpdateRoster {
                is_complete: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(roster.is_complete);
    assert_eq!(roster.revision_notes.as_deref(), Some("Add student numbers"));
}

#[tokio::test]
async fn roster_members_add_list_remove() {
    let db = setup().await;
    let repo = SurrealRosterRepository::new(db);
    let roster = repo.create(Uuid::new_v4()).await.unwrap();

    let member = repo
        .add_member(CreateRosterMember {
            roster_id: roster.id,
            name: "Ben".into(),
            email: "ben@school.edu".into(),
            position: Some("Treasurer".into()),
            student_number: Some("2021-0001".into()),
            contact_number: None,
        })
        .await
        .unwrap();

    let members = repo.list_members(roster.id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].id, member.id);

    repo.remove_member(member.id).await.unwrap();
    assert!(repo.list_members(roster.id).await.unwrap().is_empty());

    let err = repo.remove_member(member.id).await.unwrap_err();
    assert!(matches!(err, AccreditError::NotFound { .. }));
}
