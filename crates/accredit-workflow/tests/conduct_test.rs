//! Integration tests for the proposal conduct workflow using in-memory
//! SurrealDB and in-test notification dispatchers.

use std::sync::{Arc, Mutex};

use accredit_core::error::{AccreditError, ErrorKind};
use accredit_core::models::document::CreateDocument;
use accredit_core::models::profile::{CreateOrganizationProfile, UpdateOrganizationProfile};
use accredit_core::models::proposal::{CreateProposal, SnapshotOverrides, UpdateProposal};
use accredit_core::models::user::CreateUser;
use accredit_core::repository::{
    DocumentRepository, OrganizationProfileRepository, ProposalRepository, UserRepository,
};
use accredit_core::status::ReviewStatus;
use accredit_db::repository::{
    SurrealDocumentRepository, SurrealOrganizationProfileRepository,
    SurrealProposalConductRepository, SurrealProposalRepository, SurrealUserRepository,
};
use accredit_workflow::{
    Actor, ConductStatusUpdate, CreateConductRequest, DispatchOutcome, FullConductUpdate,
    Notification, NotificationDispatcher, NotifyRequest, ProposalConductWorkflow, WorkflowConfig,
};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

/// Records every notification; fails delivery when `fail` is set.
#[derive(Clone, Default)]
struct RecordingDispatcher {
    sent: Arc<Mutex<Vec<Notification>>>,
    fail: bool,
}

impl RecordingDispatcher {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

impl NotificationDispatcher for RecordingDispatcher {
    async fn send(&self, notification: &Notification) -> DispatchOutcome {
        self.sent.lock().unwrap().push(notification.clone());
        if self.fail {
            DispatchOutcome::failed("smtp unavailable")
        } else {
            DispatchOutcome::delivered()
        }
    }
}

type Workflow = ProposalConductWorkflow<
    SurrealProposalConductRepository<Db>,
    SurrealProposalRepository<Db>,
    SurrealOrganizationProfileRepository<Db>,
    SurrealUserRepository<Db>,
    SurrealDocumentRepository<Db>,
    RecordingDispatcher,
>;

struct Fixture {
    db: Surreal<Db>,
    workflow: Workflow,
    dispatcher: RecordingDispatcher,
    profile_id: Uuid,
    proposal_id: Uuid,
}

async fn setup_with(dispatcher: RecordingDispatcher) -> Fixture {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    accredit_db::run_migrations(&db).await.unwrap();

    let profile_id = create_profile(&db, "Alpha Club", "AC", "System-wide").await;

    let proposal = SurrealProposalRepository::new(db.clone())
        .create(CreateProposal {
            title: "Coastal Cleanup".into(),
            sdgs: vec!["SDG 14".into()],
            budget: 1500.0,
            venue: "Bay Walk".into(),
            details: "Morning cleanup drive".into(),
            proposed_date: None,
            proponents: vec!["Alpha Club".into()],
            organization_profile_id: profile_id,
        })
        .await
        .unwrap();

    let workflow = ProposalConductWorkflow::new(
        SurrealProposalConductRepository::new(db.clone()),
        SurrealProposalRepository::new(db.clone()),
        SurrealOrganizationProfileRepository::new(db.clone()),
        SurrealUserRepository::new(db.clone()),
        SurrealDocumentRepository::new(db.clone()),
        dispatcher.clone(),
        WorkflowConfig::default(),
    );

    Fixture {
        db,
        workflow,
        dispatcher,
        profile_id,
        proposal_id: proposal.id,
    }
}

async fn setup() -> Fixture {
    setup_with(RecordingDispatcher::default()).await
}

async fn create_profile(db: &Surreal<Db>, name: &str, acronym: &str, class: &str) -> Uuid {
    SurrealOrganizationProfileRepository::new(db.clone())
        .create(CreateOrganizationProfile {
            organization_id: Uuid::new_v4(),
            org_name: name.into(),
            org_acronym: acronym.into(),
            org_email: format!("{}@school.edu", acronym.to_lowercase()),
            org_class: class.into(),
            org_department: None,
            org_course: None,
            org_specialization: None,
            adviser_id: None,
        })
        .await
        .unwrap()
        .id
}

async fn upload(db: &Surreal<Db>, label: &str) -> Uuid {
    SurrealDocumentRepository::new(db.clone())
        .create(CreateDocument {
            label: label.into(),
            file_name: format!("{label}.pdf"),
            organization_profile_id: None,
        })
        .await
        .unwrap()
        .id
}

async fn add_user(db: &Surreal<Db>, email: &str, position: &str, profile_id: Uuid) {
    SurrealUserRepository::new(db.clone())
        .create(CreateUser {
            name: email.into(),
            email: email.into(),
            position: position.into(),
            password_hash: None,
            adviser_id: None,
            organization_profile_id: Some(profile_id),
        })
        .await
        .unwrap();
}

fn request(f: &Fixture, document_id: Option<Uuid>) -> CreateConductRequest {
    CreateConductRequest {
        proposal_id: f.proposal_id,
        document_id,
        organization_profile_id: f.profile_id,
        ..Default::default()
    }
}

fn adviser() -> Actor {
    Actor::new("Dr. Reyes", "Adviser")
}

#[tokio::test]
async fn create_requires_uploaded_document() {
    let f = setup().await;

    let err = f.workflow.create(request(&f, None)).await.unwrap_err();
    assert!(matches!(err, AccreditError::Validation { .. }));

    let err = f
        .workflow
        .create(request(&f, Some(Uuid::new_v4())))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn create_snapshots_proposal_with_overrides() {
    let f = setup().await;
    let doc_id = upload(&f.db, "conduct-report").await;

    let conduct = f
        .workflow
        .create(CreateConductRequest {
            overrides: SnapshotOverrides {
                venue: Some("North Pier".into()),
                ..Default::default()
            },
            ..request(&f, Some(doc_id))
        })
        .await
        .unwrap();

    assert_eq!(conduct.overall_status, ReviewStatus::Pending);
    assert_eq!(conduct.document_ids, vec![doc_id]);
    assert_eq!(conduct.proposal.venue, "North Pier");
    assert_eq!(conduct.proposal.title, "Coastal Cleanup");

    SurrealProposalRepository::new(f.db.clone())
        .update(
            f.proposal_id,
            UpdateProposal {
                title: Some("Renamed".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let conduct = f.workflow.get(conduct.id).await.unwrap();
    assert_eq!(conduct.proposal.title, "Coastal Cleanup");
}

#[tokio::test]
async fn create_keeps_caller_status() {
    let f = setup().await;
    let doc_id = upload(&f.db, "conduct-report").await;

    let conduct = f
        .workflow
        .create(CreateConductRequest {
            overall_status: Some("For Review".into()),
            ..request(&f, Some(doc_id))
        })
        .await
        .unwrap();
    assert_eq!(conduct.overall_status.as_str(), "For Review");
}

#[tokio::test]
async fn update_status_cascades_to_documents() {
    let f = setup().await;
    let first = upload(&f.db, "report").await;
    let second = upload(&f.db, "attendance").await;

    let conduct = f
        .workflow
        .create(request(&f, Some(first)))
        .await
        .unwrap();
    f.workflow
        .update_full(
            conduct.id,
            FullConductUpdate {
                proposal: conduct.proposal.clone(),
                overall_status: None,
                document_ids: vec![first, second],
                collaborating_entities: Vec::new(),
                organization_id: None,
                accreditation_id: None,
            },
        )
        .await
        .unwrap();

    let result = f
        .workflow
        .update_status(
            conduct.id,
            ConductStatusUpdate {
                overall_status: Some("Revision from Adviser".into()),
                revision: Some("missing budget".into()),
                notify: None,
            },
            &adviser(),
        )
        .await
        .unwrap();

    assert_eq!(result.conduct.overall_status.as_str(), "Revision from Adviser");
    assert_eq!(result.conduct.revision.as_deref(), Some("missing budget"));
    assert!(result.notification.is_none());

    let documents = SurrealDocumentRepository::new(f.db.clone())
        .get_many(&[first, second])
        .await
        .unwrap();
    assert_eq!(documents.len(), 2);
    for doc in documents {
        assert_eq!(doc.status.as_str(), "Revision from Adviser");
        assert_eq!(doc.revision_notes.as_deref(), Some("missing budget"));
        assert_eq!(doc.logs.len(), 1);
        assert!(
            doc.logs[0].ends_with("Updated by Dr. Reyes (Adviser) → Status: Revision from Adviser")
        );
    }
}

#[tokio::test]
async fn revision_status_without_text_is_rejected() {
    let f = setup().await;
    let doc_id = upload(&f.db, "report").await;
    let conduct = f
        .workflow
        .create(request(&f, Some(doc_id)))
        .await
        .unwrap();

    let err = f
        .workflow
        .update_status(
            conduct.id,
            ConductStatusUpdate {
                overall_status: Some("Revision from Adviser".into()),
                ..Default::default()
            },
            &adviser(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AccreditError::Validation { .. }));
}

#[tokio::test]
async fn blank_status_is_rejected_without_cascade() {
    let f = setup().await;
    let doc_id = upload(&f.db, "report").await;
    let conduct = f
        .workflow
        .create(request(&f, Some(doc_id)))
        .await
        .unwrap();

    for label in ["", "   "] {
        let err = f
            .workflow
            .update_status(
                conduct.id,
                ConductStatusUpdate {
                    overall_status: Some(label.into()),
                    revision: Some("missing budget".into()),
                    notify: None,
                },
                &adviser(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    let stored = f.workflow.get(conduct.id).await.unwrap();
    assert_eq!(stored.overall_status, ReviewStatus::Pending);
    assert!(stored.revision.is_none());

    let doc = SurrealDocumentRepository::new(f.db.clone())
        .get_by_id(doc_id)
        .await
        .unwrap();
    assert_eq!(doc.status, ReviewStatus::Pending);
    assert!(doc.logs.is_empty());
}

#[tokio::test]
async fn notification_excludes_advisers() {
    let f = setup().await;
    add_user(&f.db, "president@school.edu", "President", f.profile_id).await;
    add_user(&f.db, "secretary@school.edu", "Secretary", f.profile_id).await;
    add_user(&f.db, "adviser@school.edu", "Adviser", f.profile_id).await;

    let doc_id = upload(&f.db, "report").await;
    let conduct = f
        .workflow
        .create(request(&f, Some(doc_id)))
        .await
        .unwrap();

    let result = f
        .workflow
        .update_status(
            conduct.id,
            ConductStatusUpdate {
                overall_status: Some("Conduct Approved".into()),
                revision: None,
                notify: Some(NotifyRequest {
                    subject: "Conduct approved".into(),
                    organization_profile_id: f.profile_id,
                }),
            },
            &adviser(),
        )
        .await
        .unwrap();

    assert_eq!(result.notification, Some(DispatchOutcome::delivered()));
    let sent = f.dispatcher.sent();
    assert_eq!(sent.len(), 1);
    let mut recipients = sent[0].recipients.clone();
    recipients.sort();
    assert_eq!(
        recipients,
        vec![
            "president@school.edu".to_string(),
            "secretary@school.edu".to_string()
        ]
    );
    assert_eq!(sent[0].subject, "Conduct approved");
}

#[tokio::test]
async fn failed_notification_keeps_status_change() {
    let f = setup_with(RecordingDispatcher::failing()).await;
    add_user(&f.db, "president@school.edu", "President", f.profile_id).await;

    let doc_id = upload(&f.db, "report").await;
    let conduct = f
        .workflow
        .create(request(&f, Some(doc_id)))
        .await
        .unwrap();

    let result = f
        .workflow
        .update_status(
            conduct.id,
            ConductStatusUpdate {
                overall_status: Some("Conduct Approved".into()),
                revision: None,
                notify: Some(NotifyRequest {
                    subject: "Conduct approved".into(),
                    organization_profile_id: f.profile_id,
                }),
            },
            &adviser(),
        )
        .await
        .unwrap();

    let outcome = result.notification.unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("smtp unavailable"));

    let stored = f.workflow.get(conduct.id).await.unwrap();
    assert_eq!(stored.overall_status, ReviewStatus::ConductApproved);
}

#[tokio::test]
async fn update_full_forces_student_revision_status() {
    let f = setup().await;
    let doc_id = upload(&f.db, "report").await;
    let conduct = f
        .workflow
        .create(request(&f, Some(doc_id)))
        .await
        .unwrap();

    let mut snapshot = conduct.proposal.clone();
    snapshot.details = "Afternoon cleanup drive".into();

    let updated = f
        .workflow
        .update_full(
            conduct.id,
            FullConductUpdate {
                proposal: snapshot,
                overall_status: Some("Conduct Approved".into()),
                document_ids: vec![doc_id],
                collaborating_entities: vec!["Coast Guard".into()],
                organization_id: None,
                accreditation_id: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(
        updated.overall_status.as_str(),
        "Revision Update from Student Leader"
    );
    assert_eq!(updated.proposal.details, "Afternoon cleanup drive");
    assert_eq!(updated.collaborating_entities, vec!["Coast Guard".to_string()]);
}

#[tokio::test]
async fn queries_filter_by_profile_done_and_system_wide() {
    let f = setup().await;
    let other_profile = create_profile(&f.db, "Beta Club", "BC", "Department-based").await;
    let doc_id = upload(&f.db, "report").await;

    let system_wide = f
        .workflow
        .create(request(&f, Some(doc_id)))
        .await
        .unwrap();
    let departmental = f
        .workflow
        .create(CreateConductRequest {
            organization_profile_id: other_profile,
            ..request(&f, Some(doc_id))
        })
        .await
        .unwrap();

    f.workflow
        .update_status(
            departmental.id,
            ConductStatusUpdate {
                overall_status: Some("Conduct Approved".into()),
                ..Default::default()
            },
            &adviser(),
        )
        .await
        .unwrap();

    let by_profile = f.workflow.list_by_profile(other_profile).await.unwrap();
    assert_eq!(by_profile.len(), 1);
    assert_eq!(by_profile[0].id, departmental.id);

    let done = f.workflow.list_done().await.unwrap();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].id, departmental.id);

    let wide = f.workflow.list_system_wide().await.unwrap();
    assert_eq!(wide.len(), 1);
    assert_eq!(wide[0].id, system_wide.id);

    SurrealOrganizationProfileRepository::new(f.db.clone())
        .update(
            f.profile_id,
            UpdateOrganizationProfile {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(f.workflow.list_system_wide().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_missing_conduct_is_not_found() {
    let f = setup().await;
    let doc_id = upload(&f.db, "report").await;
    let conduct = f
        .workflow
        .create(request(&f, Some(doc_id)))
        .await
        .unwrap();

    f.workflow.delete(conduct.id).await.unwrap();
    let err = f.workflow.delete(conduct.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
