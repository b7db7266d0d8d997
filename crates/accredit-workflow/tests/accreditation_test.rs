//! Integration tests for the accreditation lifecycle and roster
//! compliance using in-memory SurrealDB.

use accredit_core::error::{AccreditError, ErrorKind};
use accredit_core::models::document::CreateDocument;
use accredit_core::models::profile::CreateOrganizationProfile;
use accredit_core::models::roster::UpdateRoster;
use accredit_core::repository::{AccreditationRepository, OrganizationProfileRepository};
use accredit_core::status::ReviewStatus;
use accredit_db::repository::{
    SurrealAccreditationRepository, SurrealDocumentRepository,
    SurrealOrganizationProfileRepository, SurrealRosterRepository,
};
use accredit_workflow::{AccreditationLifecycle, AddRosterMember, RosterCompliance};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

type Lifecycle = AccreditationLifecycle<
    SurrealAccreditationRepository<Db>,
    SurrealOrganizationProfileRepository<Db>,
    SurrealDocumentRepository<Db>,
>;

type Rosters = RosterCompliance<
    SurrealRosterRepository<Db>,
    SurrealAccreditationRepository<Db>,
    SurrealOrganizationProfileRepository<Db>,
>;

async fn setup() -> (Surreal<Db>, Lifecycle, Rosters) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    accredit_db::run_migrations(&db).await.unwrap();

    let lifecycle = AccreditationLifecycle::new(
        SurrealAccreditationRepository::new(db.clone()),
        SurrealOrganizationProfileRepository::new(db.clone()),
        SurrealDocumentRepository::new(db.clone()),
    );
    let rosters = RosterCompliance::new(
        SurrealRosterRepository::new(db.clone()),
        SurrealAccreditationRepository::new(db.clone()),
        SurrealOrganizationProfileRepository::new(db.clone()),
    );
    (db, lifecycle, rosters)
}

async fn create_profile(db: &Surreal<Db>, name: &str, acronym: &str) -> Uuid {
    SurrealOrganizationProfileRepository::new(db.clone())
        .create(CreateOrganizationProfile {
            organization_id: Uuid::new_v4(),
            org_name: name.into(),
            org_acronym: acronym.into(),
            org_email: format!("{}@school.edu", acronym.to_lowercase()),
            org_class: "Department-based".into(),
            org_department: Some("Engineering".into()),
            org_course: None,
            org_specialization: None,
            adviser_id: None,
        })
        .await
        .unwrap()
        .id
}

async fn upload(lifecycle: &Lifecycle, label: &str) -> Uuid {
    lifecycle
        .documents()
        .register_upload(CreateDocument {
            label: label.into(),
            file_name: format!("{label}.pdf"),
            organization_profile_id: None,
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn get_or_create_is_idempotent() {
    let (db, lifecycle, _) = setup().await;
    let profile_id = create_profile(&db, "Alpha Club", "AC").await;

    let first = lifecycle.get_or_create(profile_id).await.unwrap();
    let second = lifecycle.get_or_create(profile_id).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.overall_status, ReviewStatus::Pending);
    assert!(first.is_active);
    assert!(first.joint_statement_id.is_none());
    assert!(first.pledge_against_hazing_id.is_none());
    assert!(first.constitution_and_by_laws_id.is_none());
}

#[tokio::test]
async fn get_or_create_unknown_profile_is_not_found() {
    let (_db, lifecycle, _) = setup().await;
    let err = lifecycle.get_or_create(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn deactivate_all_clears_every_active_flag() {
    let (db, lifecycle, _) = setup().await;
    let a = create_profile(&db, "Alpha Club", "AC").await;
    let b = create_profile(&db, "Beta Club", "BC").await;
    create_profile(&db, "Gamma Club", "GC").await;

    let acc_a = lifecycle.get_or_create(a).await.unwrap();
    lifecycle.get_or_create(b).await.unwrap();

    let summary = lifecycle.deactivate_all().await.unwrap();
    assert_eq!(summary.accreditations, 2);
    assert_eq!(summary.profiles, 3);

    assert!(lifecycle.list().await.unwrap().iter().all(|a| !a.is_active));
    let active_profiles = SurrealOrganizationProfileRepository::new(db.clone())
        .list_active_by_class("Department-based")
        .await
        .unwrap();
    assert!(active_profiles.is_empty());

    let again = lifecycle.get_or_create(a).await.unwrap();
    assert_eq!(again.id, acc_a.id);
    assert!(!again.is_active);
}

#[tokio::test]
async fn attach_document_to_fixed_slot() {
    let (db, lifecycle, _) = setup().await;
    let profile_id = create_profile(&db, "Alpha Club", "AC").await;
    let acc = lifecycle.get_or_create(profile_id).await.unwrap();
    let doc_id = upload(&lifecycle, "joint-statement").await;

    let acc = lifecycle
        .attach_document(acc.id, "JointStatement", doc_id)
        .await
        .unwrap();
    assert_eq!(acc.joint_statement_id, Some(doc_id));

    let overview = lifecycle.slot_overview(acc.id).await.unwrap();
    assert_eq!(overview.len(), 3);
    let joint = overview
        .iter()
        .find(|s| s.document_id == Some(doc_id))
        .unwrap();
    assert_eq!(joint.status, Some(ReviewStatus::Pending));
    assert_eq!(overview.iter().filter(|s| s.status.is_none()).count(), 2);
}

#[tokio::test]
async fn attach_document_rejects_unknown_slot() {
    let (db, lifecycle, _) = setup().await;
    let profile_id = create_profile(&db, "Alpha Club", "AC").await;
    let acc = lifecycle.get_or_create(profile_id).await.unwrap();
    let doc_id = upload(&lifecycle, "roster").await;

    let err = lifecycle
        .attach_document(acc.id, "Roster", doc_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AccreditError::Validation { .. }));

    let err = lifecycle
        .attach_document(acc.id, "JointStatement", Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn dedicated_attachments_set_their_references() {
    let (db, lifecycle, _) = setup().await;
    let profile_id = create_profile(&db, "Alpha Club", "AC").await;
    let acc = lifecycle.get_or_create(profile_id).await.unwrap();
    let report_id = upload(&lifecycle, "financial-report").await;
    let president_id = Uuid::new_v4();

    lifecycle
        .attach_financial_report(acc.id, report_id)
        .await
        .unwrap();
    let acc = lifecycle
        .attach_president_profile(acc.id, president_id)
        .await
        .unwrap();

    assert_eq!(acc.financial_report_id, Some(report_id));
    assert_eq!(acc.president_profile_id, Some(president_id));
}

#[tokio::test]
async fn revision_status_requires_notes() {
    let (_db, lifecycle, _) = setup().await;
    let doc_id = upload(&lifecycle, "constitution").await;

    let err = lifecycle
        .update_document_status(doc_id, "Needs Revision", Some(String::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, AccreditError::Validation { .. }));

    let doc = lifecycle
        .update_document_status(doc_id, "Needs Revision", Some("fix page 2".into()))
        .await
        .unwrap();
    assert_eq!(doc.status.as_str(), "Needs Revision");
    assert_eq!(doc.revision_notes.as_deref(), Some("fix page 2"));
    assert!(doc.logs.is_empty());

    let doc = lifecycle
        .update_document_status(doc_id, "Approved", None)
        .await
        .unwrap();
    assert_eq!(doc.status, ReviewStatus::Approved);
}

#[tokio::test]
async fn overall_status_follows_notes_rule() {
    let (db, lifecycle, _) = setup().await;
    let profile_id = create_profile(&db, "Alpha Club", "AC").await;
    let acc = lifecycle.get_or_create(profile_id).await.unwrap();

    let err = lifecycle
        .update_overall_status(acc.id, "Revision from SDU", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AccreditError::Validation { .. }));

    let acc = lifecycle
        .update_overall_status(acc.id, "Revision from SDU", Some("Missing pledge".into()))
        .await
        .unwrap();
    assert!(acc.overall_status.is_revision());
    assert_eq!(acc.revision_notes.as_deref(), Some("Missing pledge"));

    let acc = lifecycle
        .update_overall_status(acc.id, "Approved", None)
        .await
        .unwrap();
    assert_eq!(acc.overall_status, ReviewStatus::Approved);
    assert!(acc.revision_notes.is_none());
}

#[tokio::test]
async fn blank_status_is_rejected() {
    let (db, lifecycle, rosters) = setup().await;
    let doc_id = upload(&lifecycle, "constitution").await;

    let err = lifecycle
        .update_document_status(doc_id, "   ", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let doc = lifecycle.documents().get(doc_id).await.unwrap();
    assert_eq!(doc.status, ReviewStatus::Pending);
    assert!(doc.logs.is_empty());

    let profile_id = create_profile(&db, "Alpha Club", "AC").await;
    let acc = lifecycle.get_or_create(profile_id).await.unwrap();
    let err = lifecycle
        .update_overall_status(acc.id, "", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    let acc = lifecycle.get(acc.id).await.unwrap();
    assert_eq!(acc.overall_status, ReviewStatus::Pending);

    let roster = rosters.get_or_create(profile_id).await.unwrap();
    let err = rosters
        .update_overall_status(
            roster.id,
            UpdateRoster {
                over_all_status: Some(ReviewStatus::parse(" ")),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn roster_get_or_create_backfills_accreditation() {
    let (db, lifecycle, rosters) = setup().await;
    let profile_id = create_profile(&db, "Alpha Club", "AC").await;
    let acc = lifecycle.get_or_create(profile_id).await.unwrap();
    assert!(acc.roster_id.is_none());

    let roster = rosters.get_or_create(profile_id).await.unwrap();
    let again = rosters.get_or_create(profile_id).await.unwrap();
    assert_eq!(roster.id, again.id);

    let acc = SurrealAccreditationRepository::new(db.clone())
        .get_by_id(acc.id)
        .await
        .unwrap();
    assert_eq!(acc.roster_id, Some(roster.id));
}

#[tokio::test]
async fn roster_links_accreditation_created_later() {
    let (db, lifecycle, rosters) = setup().await;
    let profile_id = create_profile(&db, "Alpha Club", "AC").await;

    let roster = rosters.get_or_create(profile_id).await.unwrap();
    let acc = lifecycle.get_or_create(profile_id).await.unwrap();
    assert!(acc.roster_id.is_none());

    rosters.get_or_create(profile_id).await.unwrap();
    let acc = lifecycle.get(acc.id).await.unwrap();
    assert_eq!(acc.roster_id, Some(roster.id));
}

#[tokio::test]
async fn add_member_requires_profile_name_and_email() {
    let (db, _, rosters) = setup().await;
    let profile_id = create_profile(&db, "Alpha Club", "AC").await;

    let missing_profile = rosters
        .add_member(AddRosterMember {
            name: "Ben".into(),
            email: "ben@school.edu".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(missing_profile, AccreditError::Validation { .. }));

    let missing_email = rosters
        .add_member(AddRosterMember {
            organization_profile_id: Some(profile_id),
            name: "Ben".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(missing_email, AccreditError::Validation { .. }));

    let member = rosters
        .add_member(AddRosterMember {
            organization_profile_id: Some(profile_id),
            name: "Ben".into(),
            email: "ben@school.edu".into(),
            position: Some("Treasurer".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    let roster = rosters.get_or_create(profile_id).await.unwrap();
    assert_eq!(member.roster_id, roster.id);
    let members = rosters.list_members(roster.id).await.unwrap();
    assert_eq!(members.len(), 1);

    rosters.remove_member(member.id).await.unwrap();
    assert!(rosters.list_members(roster.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn roster_status_updates() {
    let (db, _, rosters) = setup().await;
    let profile_id = create_profile(&db, "Alpha Club", "AC").await;
    let roster = rosters.get_or_create(profile_id).await.unwrap();

    let roster = rosters
        .update_overall_status(
            roster.id,
            UpdateRoster {
                is_complete: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(roster.is_complete);
    assert_eq!(roster.over_all_status, ReviewStatus::Pending);

    let roster = rosters
        .mark_revision(roster.id, "Add contact numbers", "Adviser")
        .await
        .unwrap();
    assert_eq!(roster.over_all_status.as_str(), "Revision from Adviser");
    assert_eq!(roster.revision_notes.as_deref(), Some("Add contact numbers"));
    assert!(roster.is_complete);

    let err = rosters
        .mark_revision(roster.id, "  ", "Adviser")
        .await
        .unwrap_err();
    assert!(matches!(err, AccreditError::Validation { .. }));

    let err = rosters
        .update_overall_status(Uuid::new_v4(), UpdateRoster::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
