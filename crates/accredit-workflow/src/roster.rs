//! Roster compliance: one lazily created roster per organization profile,
//! its members, and reviewer status updates.

use accredit_core::error::{AccreditError, AccreditResult, ConflictCode};
use accredit_core::models::accreditation::UpdateAccreditation;
use accredit_core::models::roster::{CreateRosterMember, Roster, RosterMember, UpdateRoster};
use accredit_core::repository::{
    AccreditationRepository, OrganizationProfileRepository, RosterRepository,
};
use accredit_core::status::{ReviewStatus, StatusChange};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

/// Member fields as submitted by a student leader.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddRosterMember {
    pub organization_profile_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub position: Option<String>,
    pub student_number: Option<String>,
    pub contact_number: Option<String>,
}

pub struct RosterCompliance<R, A, P>
where
    R: RosterRepository,
    A: AccreditationRepository,
    P: OrganizationProfileRepository,
{
    rosters: R,
    accreditations: A,
    profiles: P,
}

impl<R, A, P> RosterCompliance<R, A, P>
where
    R: RosterRepository,
    A: AccreditationRepository,
    P: OrganizationProfileRepository,
{
    pub fn new(rosters: R, accreditations: A, profiles: P) -> Self {
        Self {
            rosters,
            accreditations,
            profiles,
        }
    }

    /// Return the profile's roster, creating it if absent, then link it
    /// from the profile's accreditation if that exists without a roster.
    pub async fn get_or_create(&self, organization_profile_id: Uuid) -> AccreditResult<Roster> {
        let roster = match self.rosters.find_by_profile(organization_profile_id).await? {
            Some(roster) => roster,
            None => self.create_roster(organization_profile_id).await?,
        };

        self.backfill_accreditation(organization_profile_id, roster.id)
            .await?;
        Ok(roster)
    }

    async fn create_roster(&self, organization_profile_id: Uuid) -> AccreditResult<Roster> {
        self.profiles.get_by_id(organization_profile_id).await?;

        match self.rosters.create(organization_profile_id).await {
            Ok(roster) => {
                info!(
                    roster_id = %roster.id,
                    profile_id = %organization_profile_id,
                    created_at = %roster.created_at,
                    "Roster created"
                );
                Ok(roster)
            }
            Err(AccreditError::Conflict {
                code: ConflictCode::DuplicateDatabaseEntry,
                ..
            }) => self
                .rosters
                .find_by_profile(organization_profile_id)
                .await?
                .ok_or_else(|| {
                    AccreditError::Internal(format!(
                        "roster for profile {organization_profile_id} vanished after conflict"
                    ))
                }),
            Err(e) => Err(e),
        }
    }

    async fn backfill_accreditation(
        &self,
        organization_profile_id: Uuid,
        roster_id: Uuid,
    ) -> AccreditResult<()> {
        let Some(accreditation) = self
            .accreditations
            .find_by_profile(organization_profile_id)
            .await?
        else {
            return Ok(());
        };

        if accreditation.roster_id.is_none() {
            self.accreditations
                .update(
                    accreditation.id,
                    UpdateAccreditation {
                        roster_id: Some(roster_id),
                        ..Default::default()
                    },
                )
                .await?;
            info!(
                accreditation_id = %accreditation.id,
                roster_id = %roster_id,
                "Roster linked to accreditation"
            );
        }
        Ok(())
    }

    pub async fn add_member(&self, input: AddRosterMember) -> AccreditResult<RosterMember> {
        let Some(profile_id) = input.organization_profile_id else {
            return Err(AccreditError::validation("organization profile is required"));
        };
        if input.name.trim().is_empty() {
            return Err(AccreditError::validation("member name is required"));
        }
        if input.email.trim().is_empty() {
            return Err(AccreditError::validation("member email is required"));
        }

        let roster = self.get_or_create(profile_id).await?;
        let member = self
            .rosters
            .add_member(CreateRosterMember {
                roster_id: roster.id,
                name: input.name.trim().to_string(),
                email: input.email.trim().to_string(),
                position: input.position,
                student_number: input.student_number,
                contact_number: input.contact_number,
            })
            .await?;
        info!(roster_id = %roster.id, member_id = %member.id, "Roster member added");
        Ok(member)
    }

    pub async fn list_members(&self, roster_id: Uuid) -> AccreditResult<Vec<RosterMember>> {
        self.rosters.get_by_id(roster_id).await?;
        self.rosters.list_members(roster_id).await
    }

    pub async fn remove_member(&self, member_id: Uuid) -> AccreditResult<()> {
        self.rosters.remove_member(member_id).await?;
        info!(member_id = %member_id, "Roster member removed");
        Ok(())
    }

    /// Partial update; only supplied fields change.
    pub async fn update_overall_status(
        &self,
        roster_id: Uuid,
        input: UpdateRoster,
    ) -> AccreditResult<Roster> {
        if input.over_all_status.as_ref().is_some_and(ReviewStatus::is_blank) {
            return Err(AccreditError::validation("status is required"));
        }
        self.rosters.get_by_id(roster_id).await?;
        let roster = self.rosters.update(roster_id, input).await?;
        info!(
            roster_id = %roster_id,
            status = %roster.over_all_status,
            "Roster status updated"
        );
        Ok(roster)
    }

    /// Set the status to `Revision from {actor_position}` and store the
    /// notes, which must not be blank.
    pub async fn mark_revision(
        &self,
        roster_id: Uuid,
        revision_notes: &str,
        actor_position: &str,
    ) -> AccreditResult<Roster> {
        let change = StatusChange::new(
            ReviewStatus::revision_from(actor_position),
            Some(revision_notes.to_string()),
        )?;
        let (status, notes) = change.into_parts();

        self.update_overall_status(
            roster_id,
            UpdateRoster {
                over_all_status: Some(status),
                revision_notes: notes,
                ..Default::default()
            },
        )
        .await
    }
}
