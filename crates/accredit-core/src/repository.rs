//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Lookups that may legitimately
//! miss (`find_*`) return `Option`; lookups by identifier return
//! [`AccreditError::NotFound`](crate::error::AccreditError::NotFound).

use uuid::Uuid;

use crate::error::AccreditResult;
use crate::models::{
    accreditation::{Accreditation, DocumentSlot, UpdateAccreditation},
    adviser::{Adviser, CreateAdviser, UpdateAdviser},
    conduct::{
        CreateProposalConduct, ProposalConduct, ReplaceProposalConduct, UpdateConductStatus,
    },
    document::{CreateDocument, Document},
    organization::{CreateOrganization, Organization, UpdateOrganization},
    profile::{CreateOrganizationProfile, OrganizationProfile, UpdateOrganizationProfile},
    proposal::{CreateProposal, Proposal, UpdateProposal},
    roster::{CreateRosterMember, Roster, RosterMember, UpdateRoster},
    user::{CreateUser, UpdateUser, User},
};
use crate::status::ReviewStatus;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

pub trait OrganizationRepository: Send + Sync {
    fn create(
        &self,
        input: CreateOrganization,
    ) -> impl Future<Output = AccreditResult<Organization>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AccreditResult<Organization>> + Send;
    /// Case-insensitive match against either the original or the current name.
    fn find_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = AccreditResult<Option<Organization>>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateOrganization,
    ) -> impl Future<Output = AccreditResult<Organization>> + Send;
    fn append_profile(
        &self,
        id: Uuid,
        profile_id: Uuid,
    ) -> impl Future<Output = AccreditResult<Organization>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = AccreditResult<()>> + Send;
}

pub trait OrganizationProfileRepository: Send + Sync {
    fn create(
        &self,
        input: CreateOrganizationProfile,
    ) -> impl Future<Output = AccreditResult<OrganizationProfile>> + Send;
    fn get_by_id(
        &self,
        id: Uuid,
    ) -> impl Future<Output = AccreditResult<OrganizationProfile>> + Send;
    /// Case-insensitive match on either the name or the acronym.
    fn find_by_name_or_acronym(
        &self,
        name: &str,
        acronym: &str,
    ) -> impl Future<Output = AccreditResult<Option<OrganizationProfile>>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateOrganizationProfile,
    ) -> impl Future<Output = AccreditResult<OrganizationProfile>> + Send;
    fn list_active_by_class(
        &self,
        org_class: &str,
    ) -> impl Future<Output = AccreditResult<Vec<OrganizationProfile>>> + Send;
    /// Clears `is_active` on every profile. Returns the number of records
    /// touched.
    fn deactivate_all(&self) -> impl Future<Output = AccreditResult<u64>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = AccreditResult<()>> + Send;
}

pub trait AdviserRepository: Send + Sync {
    fn create(&self, input: CreateAdviser) -> impl Future<Output = AccreditResult<Adviser>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AccreditResult<Adviser>> + Send;
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = AccreditResult<Option<Adviser>>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateAdviser,
    ) -> impl Future<Output = AccreditResult<Adviser>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = AccreditResult<()>> + Send;
}

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = AccreditResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AccreditResult<User>> + Send;
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = AccreditResult<Option<User>>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = AccreditResult<User>> + Send;
    fn list_by_profile(
        &self,
        organization_profile_id: Uuid,
    ) -> impl Future<Output = AccreditResult<Vec<User>>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = AccreditResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Accreditation package
// ---------------------------------------------------------------------------

pub trait AccreditationRepository: Send + Sync {
    /// Creates a `Pending`, active accreditation with every slot empty.
    fn create(
        &self,
        organization_profile_id: Uuid,
    ) -> impl Future<Output = AccreditResult<Accreditation>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AccreditResult<Accreditation>> + Send;
    fn find_by_profile(
        &self,
        organization_profile_id: Uuid,
    ) -> impl Future<Output = AccreditResult<Option<Accreditation>>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateAccreditation,
    ) -> impl Future<Output = AccreditResult<Accreditation>> + Send;
    fn set_slot(
        &self,
        id: Uuid,
        slot: DocumentSlot,
        document_id: Uuid,
    ) -> impl Future<Output = AccreditResult<Accreditation>> + Send;
    fn list(&self) -> impl Future<Output = AccreditResult<Vec<Accreditation>>> + Send;
    /// Clears `is_active` on every accreditation. Returns the number of
    /// records touched.
    fn deactivate_all(&self) -> impl Future<Output = AccreditResult<u64>> + Send;
}

pub trait DocumentRepository: Send + Sync {
    fn create(&self, input: CreateDocument)
    -> impl Future<Output = AccreditResult<Document>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AccreditResult<Document>> + Send;
    /// Returns the documents that exist among `ids`, in `ids` order.
    fn get_many(&self, ids: &[Uuid]) -> impl Future<Output = AccreditResult<Vec<Document>>> + Send;
    /// Overwrites status and notes without touching the audit log.
    fn set_review(
        &self,
        id: Uuid,
        status: ReviewStatus,
        revision_notes: Option<String>,
    ) -> impl Future<Output = AccreditResult<Document>> + Send;
    /// Applies an optional status and optional notes and appends one audit
    /// line in the same write.
    fn apply_review_logged(
        &self,
        id: Uuid,
        status: Option<ReviewStatus>,
        revision_notes: Option<String>,
        log_line: String,
    ) -> impl Future<Output = AccreditResult<Document>> + Send;
}

pub trait RosterRepository: Send + Sync {
    fn create(
        &self,
        organization_profile_id: Uuid,
    ) -> impl Future<Output = AccreditResult<Roster>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AccreditResult<Roster>> + Send;
    fn find_by_profile(
        &self,
        organization_profile_id: Uuid,
    ) -> impl Future<Output = AccreditResult<Option<Roster>>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateRoster,
    ) -> impl Future<Output = AccreditResult<Roster>> + Send;
    fn add_member(
        &self,
        input: CreateRosterMember,
    ) -> impl Future<Output = AccreditResult<RosterMember>> + Send;
    fn list_members(
        &self,
        roster_id: Uuid,
    ) -> impl Future<Output = AccreditResult<Vec<RosterMember>>> + Send;
    fn remove_member(&self, member_id: Uuid) -> impl Future<Output = AccreditResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Proposals and conduct
// ---------------------------------------------------------------------------

pub trait ProposalRepository: Send + Sync {
    fn create(&self, input: CreateProposal)
    -> impl Future<Output = AccreditResult<Proposal>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AccreditResult<Proposal>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateProposal,
    ) -> impl Future<Output = AccreditResult<Proposal>> + Send;
}

pub trait ProposalConductRepository: Send + Sync {
    fn create(
        &self,
        input: CreateProposalConduct,
    ) -> impl Future<Output = AccreditResult<ProposalConduct>> + Send;
    fn get_by_id(&self, id: Uuid)
    -> impl Future<Output = AccreditResult<ProposalConduct>> + Send;
    fn replace(
        &self,
        id: Uuid,
        input: ReplaceProposalConduct,
    ) -> impl Future<Output = AccreditResult<ProposalConduct>> + Send;
    fn update_status(
        &self,
        id: Uuid,
        input: UpdateConductStatus,
    ) -> impl Future<Output = AccreditResult<ProposalConduct>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = AccreditResult<()>> + Send;
    fn list_by_profile(
        &self,
        organization_profile_id: Uuid,
    ) -> impl Future<Output = AccreditResult<Vec<ProposalConduct>>> + Send;
    fn list_by_profiles(
        &self,
        organization_profile_ids: &[Uuid],
    ) -> impl Future<Output = AccreditResult<Vec<ProposalConduct>>> + Send;
    fn list_by_status(
        &self,
        overall_status: &str,
    ) -> impl Future<Output = AccreditResult<Vec<ProposalConduct>>> + Send;
}
