//! Organization registry: initial registration and re-registration.
//!
//! Registration touches up to five records (organization, adviser,
//! profile, adviser user, requesting user) without a store transaction.
//! Every write pushes its undo step onto a [`Compensation`] list; if a
//! later step fails the list is replayed in reverse. The organization's
//! `registration_complete` flag is only set once every step succeeded, so
//! an organization left behind by a failed cleanup is visibly incomplete.

use accredit_core::error::{AccreditError, AccreditResult, ConflictCode};
use accredit_core::models::adviser::{Adviser, CreateAdviser, UpdateAdviser};
use accredit_core::models::organization::{CreateOrganization, Organization, UpdateOrganization};
use accredit_core::models::profile::{
    CreateOrganizationProfile, OrganizationProfile, UpdateOrganizationProfile,
};
use accredit_core::models::user::{ADVISER_POSITION, CreateUser, UpdateUser, User};
use accredit_core::repository::{
    AdviserRepository, OrganizationProfileRepository, OrganizationRepository, UserRepository,
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::WorkflowConfig;
use crate::credentials;
use crate::notify::{DispatchOutcome, Notification, NotificationDispatcher, dispatch_logged};

#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationFields {
    pub org_name: String,
    pub org_acronym: String,
    pub org_email: String,
    pub org_class: String,
    pub org_department: Option<String>,
    pub org_course: Option<String>,
    pub org_specialization: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdviserFields {
    pub name: String,
    pub email: String,
    pub department: Option<String>,
}

/// Records produced by a successful registration.
#[derive(Debug, Clone)]
pub struct Registration {
    pub organization: Organization,
    pub profile: OrganizationProfile,
    pub adviser: Adviser,
    pub adviser_user: User,
    pub credentials_notice: DispatchOutcome,
    pub confirmation_notice: DispatchOutcome,
}

/// Undo step for one completed registration write.
#[derive(Debug, Clone)]
enum Compensation {
    DeleteOrganization(Uuid),
    RestoreOrganizationName {
        organization_id: Uuid,
        name: String,
    },
    DeleteProfile(Uuid),
    DeleteAdviser(Uuid),
    RebindAdviser {
        adviser_id: Uuid,
        profile_id: Option<Uuid>,
    },
    DeleteUser(Uuid),
    RestoreUser {
        user_id: Uuid,
        position: String,
        adviser_id: Option<Uuid>,
        profile_id: Option<Uuid>,
    },
}

impl Compensation {
    fn restore_user(user: &User) -> Self {
        Self::RestoreUser {
            user_id: user.id,
            position: user.position.clone(),
            adviser_id: user.adviser_id,
            profile_id: user.organization_profile_id,
        }
    }
}

/// Existing adviser-side records that registration may reuse.
#[derive(Debug, Default)]
struct AdviserMatch {
    adviser: Option<Adviser>,
    user: Option<User>,
}

/// Adviser-side records after provisioning, plus the generated password
/// when one was issued.
struct ProvisionedAdviser {
    adviser: Adviser,
    profile: OrganizationProfile,
    user: User,
    password: Option<String>,
}

pub struct OrganizationRegistry<O, P, V, U, N>
where
    O: OrganizationRepository,
    P: OrganizationProfileRepository,
    V: AdviserRepository,
    U: UserRepository,
    N: NotificationDispatcher,
{
    organizations: O,
    profiles: P,
    advisers: V,
    users: U,
    dispatcher: N,
    config: WorkflowConfig,
}

fn fold(value: &str) -> String {
    value.trim().to_lowercase()
}

fn require(value: &str, field: &str) -> AccreditResult<()> {
    if value.trim().is_empty() {
        return Err(AccreditError::validation(format!("{field} is required")));
    }
    Ok(())
}

fn validate(org: &OrganizationFields, adviser: &AdviserFields) -> AccreditResult<()> {
    require(&org.org_name, "organization name")?;
    require(&org.org_acronym, "organization acronym")?;
    require(&org.org_email, "organization email")?;
    require(&org.org_class, "organization class")?;
    require(&adviser.name, "adviser name")?;
    require(&adviser.email, "adviser email")?;
    if fold(&adviser.email) == fold(&org.org_email) {
        return Err(AccreditError::conflict(
            ConflictCode::AdviserEmailAlreadyInUse,
            "adviser email must differ from the organization email",
        ));
    }
    Ok(())
}

impl<O, P, V, U, N> OrganizationRegistry<O, P, V, U, N>
where
    O: OrganizationRepository,
    P: OrganizationProfileRepository,
    V: AdviserRepository,
    U: UserRepository,
    N: NotificationDispatcher,
{
    pub fn new(
        organizations: O,
        profiles: P,
        advisers: V,
        users: U,
        dispatcher: N,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            organizations,
            profiles,
            advisers,
            users,
            dispatcher,
            config,
        }
    }

    /// Register a new organization for `requesting_user_id`.
    pub async fn register_initial(
        &self,
        org: OrganizationFields,
        adviser: AdviserFields,
        requesting_user_id: Uuid,
    ) -> AccreditResult<Registration> {
        validate(&org, &adviser)?;
        let requester = self.users.get_by_id(requesting_user_id).await?;

        if self
            .organizations
            .find_by_name(&org.org_name)
            .await?
            .is_some()
        {
            return Err(AccreditError::conflict(
                ConflictCode::DuplicateOrganizationName,
                format!("organization name '{}' is already registered", org.org_name),
            ));
        }
        if self
            .profiles
            .find_by_name_or_acronym(&org.org_name, &org.org_acronym)
            .await?
            .is_some()
        {
            return Err(AccreditError::conflict(
                ConflictCode::DuplicateOrganizationProfile,
                format!(
                    "an organization profile named '{}' or '{}' already exists",
                    org.org_name, org.org_acronym
                ),
            ));
        }
        if requester.organization_profile_id.is_some() {
            return Err(AccreditError::conflict(
                ConflictCode::UserAlreadyHasOrganization,
                "requesting user already belongs to an organization",
            ));
        }
        let existing = self
            .match_adviser(&adviser.email, &requester, None)
            .await?;

        let mut undo = Vec::new();
        let result = self
            .run_initial(&org, &adviser, existing, &requester, &mut undo)
            .await;

        match result {
            Ok((organization, provisioned)) => {
                info!(
                    organization_id = %organization.id,
                    profile_id = %provisioned.profile.id,
                    "Organization registered"
                );
                Ok(self.finish(organization, provisioned, &org).await)
            }
            Err(e) => {
                warn!(error = %e, "Registration failed, compensating");
                self.compensate(undo).await;
                Err(e)
            }
        }
    }

    async fn run_initial(
        &self,
        org: &OrganizationFields,
        adviser: &AdviserFields,
        existing: AdviserMatch,
        requester: &User,
        undo: &mut Vec<Compensation>,
    ) -> AccreditResult<(Organization, ProvisionedAdviser)> {
        let organization = self
            .organizations
            .create(CreateOrganization {
                original_name: org.org_name.trim().to_string(),
                current_name: org.org_name.trim().to_string(),
            })
            .await?;
        undo.push(Compensation::DeleteOrganization(organization.id));

        let provisioned = self
            .provision(organization.id, org, adviser, existing, undo)
            .await?;

        self.organizations
            .append_profile(organization.id, provisioned.profile.id)
            .await?;

        self.bind_requester(requester, provisioned.profile.id, undo)
            .await?;

        let organization = self
            .organizations
            .update(
                organization.id,
                UpdateOrganization {
                    registration_complete: Some(true),
                    ..Default::default()
                },
            )
            .await?;

        Ok((organization, provisioned))
    }

    /// Start a new accreditation cycle for the organization behind
    /// `profile_id`. Name checks are skipped; adviser checks still apply,
    /// except that an adviser already bound within the same organization
    /// is carried over.
    pub async fn re_register(
        &self,
        requesting_user_id: Uuid,
        profile_id: Uuid,
        org: OrganizationFields,
        adviser: AdviserFields,
    ) -> AccreditResult<Registration> {
        validate(&org, &adviser)?;
        let requester = self.users.get_by_id(requesting_user_id).await?;
        let previous = self.profiles.get_by_id(profile_id).await?;

        if requester.organization_profile_id != Some(previous.id) {
            return Err(AccreditError::Forbidden {
                reason: "profile does not belong to the requesting user".into(),
            });
        }
        if !previous.is_allowed_for_reuse {
            return Err(AccreditError::Forbidden {
                reason: "profile is not allowed for re-registration".into(),
            });
        }
        let organization = self
            .organizations
            .get_by_id(previous.organization_id)
            .await?;

        let existing = self
            .match_adviser(&adviser.email, &requester, Some(organization.id))
            .await?;

        let mut undo = Vec::new();
        let result = self
            .run_reregister(&organization, &org, &adviser, existing, &requester, &mut undo)
            .await;

        match result {
            Ok((organization, provisioned)) => {
                info!(
                    organization_id = %organization.id,
                    previous_profile_id = %previous.id,
                    profile_id = %provisioned.profile.id,
                    "Organization re-registered"
                );
                Ok(self.finish(organization, provisioned, &org).await)
            }
            Err(e) => {
                warn!(error = %e, "Re-registration failed, compensating");
                self.compensate(undo).await;
                Err(e)
            }
        }
    }

    /// Administrative grant that lets the profile's members start a new
    /// cycle through [`Self::re_register`].
    pub async fn allow_reuse(&self, profile_id: Uuid) -> AccreditResult<OrganizationProfile> {
        self.profiles.get_by_id(profile_id).await?;
        let profile = self
            .profiles
            .update(
                profile_id,
                UpdateOrganizationProfile {
                    is_allowed_for_reuse: Some(true),
                    ..Default::default()
                },
            )
            .await?;
        info!(profile_id = %profile_id, "Profile allowed for re-registration");
        Ok(profile)
    }

    async fn run_reregister(
        &self,
        organization: &Organization,
        org: &OrganizationFields,
        adviser: &AdviserFields,
        existing: AdviserMatch,
        requester: &User,
        undo: &mut Vec<Compensation>,
    ) -> AccreditResult<(Organization, ProvisionedAdviser)> {
        let provisioned = self
            .provision(organization.id, org, adviser, existing, undo)
            .await?;

        self.bind_requester(requester, provisioned.profile.id, undo)
            .await?;

        self.organizations
            .update(
                organization.id,
                UpdateOrganization {
                    current_name: Some(org.org_name.trim().to_string()),
                    ..Default::default()
                },
            )
            .await?;
        undo.push(Compensation::RestoreOrganizationName {
            organization_id: organization.id,
            name: organization.current_name.clone(),
        });

        let organization = self
            .organizations
            .append_profile(organization.id, provisioned.profile.id)
            .await?;

        Ok((organization, provisioned))
    }

    /// Look up adviser-side records for `email` and reject bindings that
    /// registration may not take over. With `same_organization` set, a
    /// binding to any profile of that organization is allowed.
    async fn match_adviser(
        &self,
        email: &str,
        requester: &User,
        same_organization: Option<Uuid>,
    ) -> AccreditResult<AdviserMatch> {
        let adviser = self.advisers.find_by_email(email).await?;
        if let Some(profile_id) = adviser.as_ref().and_then(|a| a.organization_profile_id) {
            if !self.within(profile_id, same_organization).await? {
                return Err(AccreditError::conflict(
                    ConflictCode::AdviserAlreadyAssigned,
                    format!("adviser {} is already assigned to an organization", fold(email)),
                ));
            }
        }

        let user = self.users.find_by_email(email).await?;
        if let Some(user) = &user {
            let foreign_binding = match user.organization_profile_id {
                Some(profile_id) => !self.within(profile_id, same_organization).await?,
                None => false,
            };
            if foreign_binding || user.id == requester.id {
                return Err(AccreditError::conflict(
                    ConflictCode::AdviserEmailAlreadyInUse,
                    format!("email {} is already in use by a member account", fold(email)),
                ));
            }
        }

        Ok(AdviserMatch { adviser, user })
    }

    async fn within(&self, profile_id: Uuid, organization_id: Option<Uuid>) -> AccreditResult<bool> {
        let Some(organization_id) = organization_id else {
            return Ok(false);
        };
        match self.profiles.get_by_id(profile_id).await {
            Ok(profile) => Ok(profile.organization_id == organization_id),
            Err(AccreditError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Create or reuse the adviser, create the profile, bind the adviser
    /// and provision the adviser's user account.
    async fn provision(
        &self,
        organization_id: Uuid,
        org: &OrganizationFields,
        fields: &AdviserFields,
        existing: AdviserMatch,
        undo: &mut Vec<Compensation>,
    ) -> AccreditResult<ProvisionedAdviser> {
        let (adviser, reused_adviser) = match existing.adviser {
            Some(adviser) => (adviser, true),
            None => {
                let adviser = self
                    .advisers
                    .create(CreateAdviser {
                        name: fields.name.trim().to_string(),
                        email: fields.email.clone(),
                        department: fields.department.clone(),
                    })
                    .await?;
                undo.push(Compensation::DeleteAdviser(adviser.id));
                (adviser, false)
            }
        };

        let profile = self
            .profiles
            .create(CreateOrganizationProfile {
                organization_id,
                org_name: org.org_name.trim().to_string(),
                org_acronym: org.org_acronym.trim().to_string(),
                org_email: org.org_email.trim().to_string(),
                org_class: org.org_class.trim().to_string(),
                org_department: org.org_department.clone(),
                org_course: org.org_course.clone(),
                org_specialization: org.org_specialization.clone(),
                adviser_id: Some(adviser.id),
            })
            .await?;
        undo.push(Compensation::DeleteProfile(profile.id));

        let previous_binding = adviser.organization_profile_id;
        let adviser = self
            .advisers
            .update(
                adviser.id,
                UpdateAdviser {
                    organization_profile_id: Some(Some(profile.id)),
                    ..Default::default()
                },
            )
            .await?;
        if reused_adviser {
            undo.push(Compensation::RebindAdviser {
                adviser_id: adviser.id,
                profile_id: previous_binding,
            });
        }

        let (user, password) = match existing.user {
            Some(user) => {
                let password = user
                    .password_hash
                    .is_none()
                    .then(|| credentials::generate_password(self.config.generated_password_bytes));
                let password_hash = password
                    .as_deref()
                    .map(|p| credentials::hash_password(p, self.config.pepper.as_deref()))
                    .transpose()?;

                let updated = self
                    .users
                    .update(
                        user.id,
                        UpdateUser {
                            position: Some(ADVISER_POSITION.to_string()),
                            password_hash,
                            adviser_id: Some(Some(adviser.id)),
                            organization_profile_id: Some(Some(profile.id)),
                            ..Default::default()
                        },
                    )
                    .await?;
                undo.push(Compensation::restore_user(&user));
                (updated, password)
            }
            None => {
                let password =
                    credentials::generate_password(self.config.generated_password_bytes);
                let password_hash =
                    credentials::hash_password(&password, self.config.pepper.as_deref())?;

                let user = self
                    .users
                    .create(CreateUser {
                        name: adviser.name.clone(),
                        email: adviser.email.clone(),
                        position: ADVISER_POSITION.to_string(),
                        password_hash: Some(password_hash),
                        adviser_id: Some(adviser.id),
                        organization_profile_id: Some(profile.id),
                    })
                    .await?;
                undo.push(Compensation::DeleteUser(user.id));
                (user, Some(password))
            }
        };

        info!(
            adviser_id = %adviser.id,
            user_id = %user.id,
            reused_adviser,
            "Adviser provisioned"
        );
        Ok(ProvisionedAdviser {
            adviser,
            profile,
            user,
            password,
        })
    }

    async fn bind_requester(
        &self,
        requester: &User,
        profile_id: Uuid,
        undo: &mut Vec<Compensation>,
    ) -> AccreditResult<()> {
        self.users
            .update(
                requester.id,
                UpdateUser {
                    organization_profile_id: Some(Some(profile_id)),
                    ..Default::default()
                },
            )
            .await?;
        undo.push(Compensation::restore_user(requester));
        Ok(())
    }

    /// Replay undo steps newest first. Failures are logged and skipped so
    /// the remaining steps still run.
    async fn compensate(&self, undo: Vec<Compensation>) {
        for step in undo.into_iter().rev() {
            let outcome = match &step {
                Compensation::DeleteOrganization(id) => self.organizations.delete(*id).await,
                Compensation::RestoreOrganizationName {
                    organization_id,
                    name,
                } => self
                    .organizations
                    .update(
                        *organization_id,
                        UpdateOrganization {
                            current_name: Some(name.clone()),
                            ..Default::default()
                        },
                    )
                    .await
                    .map(|_| ()),
                Compensation::DeleteProfile(id) => self.profiles.delete(*id).await,
                Compensation::DeleteAdviser(id) => self.advisers.delete(*id).await,
                Compensation::RebindAdviser {
                    adviser_id,
                    profile_id,
                } => self
                    .advisers
                    .update(
                        *adviser_id,
                        UpdateAdviser {
                            organization_profile_id: Some(*profile_id),
                            ..Default::default()
                        },
                    )
                    .await
                    .map(|_| ()),
                Compensation::DeleteUser(id) => self.users.delete(*id).await,
                Compensation::RestoreUser {
                    user_id,
                    position,
                    adviser_id,
                    profile_id,
                } => self
                    .users
                    .update(
                        *user_id,
                        UpdateUser {
                            position: Some(position.clone()),
                            adviser_id: Some(*adviser_id),
                            organization_profile_id: Some(*profile_id),
                            ..Default::default()
                        },
                    )
                    .await
                    .map(|_| ()),
            };

            if let Err(e) = outcome {
                warn!(step = ?step, error = %e, "Registration compensation failed");
            }
        }
    }

    /// Send the two best-effort notifications and assemble the result.
    async fn finish(
        &self,
        organization: Organization,
        provisioned: ProvisionedAdviser,
        org: &OrganizationFields,
    ) -> Registration {
        let portal = &self.config.portal_name;

        let login = match &provisioned.password {
            Some(password) => format!(
                "Email: {}\nTemporary password: {password}\n\n\
                 Please change your password after signing in.",
                provisioned.user.email
            ),
            None => "Sign in with your existing account.".to_string(),
        };
        let credentials_notice = dispatch_logged(
            &self.dispatcher,
            Notification {
                recipients: vec![provisioned.adviser.email.clone()],
                subject: format!("{portal}: adviser account"),
                message: format!(
                    "Hello {},\n\nYou have been registered as the adviser of {} ({}).\n\n{login}",
                    provisioned.adviser.name,
                    provisioned.profile.org_name,
                    provisioned.profile.org_acronym,
                ),
            },
        )
        .await;

        let confirmation_notice = dispatch_logged(
            &self.dispatcher,
            Notification {
                recipients: vec![org.org_email.trim().to_string()],
                subject: format!("{portal}: registration received"),
                message: format!(
                    "{} ({}) has been registered. Your adviser is {}.",
                    provisioned.profile.org_name,
                    provisioned.profile.org_acronym,
                    provisioned.adviser.name,
                ),
            },
        )
        .await;

        Registration {
            organization,
            profile: provisioned.profile,
            adviser: provisioned.adviser,
            adviser_user: provisioned.user,
            credentials_notice,
            confirmation_notice,
        }
    }
}
