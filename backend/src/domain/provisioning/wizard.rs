//! Wizard state machine.

use std::fmt;

use serde::Serialize;
use serde_json::json;

use crate::domain::schema::{EXPERIENCE_PREFILL_SLOTS, Role};
use crate::domain::{
    AccountCredentials, Error, ExperienceEntry, PhotoUpload, PrincipalValidationError, ProfileDetails,
    ProfileValidationError,
};

/// Steps of the provisioning wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WizardStep {
    /// Collecting sign-in email and credential.
    Credentials,
    /// Collecting role-specific profile attributes.
    ProfileDetails,
    /// Collecting case history for experienced lawyers.
    ExperienceDetails,
    /// The commit sequence finished; the wizard is spent.
    Committed,
}

impl WizardStep {
    fn label(self) -> &'static str {
        match self {
            Self::Credentials => "credentials",
            Self::ProfileDetails => "profile details",
            Self::ExperienceDetails => "experience details",
            Self::Committed => "committed",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors that keep the wizard on its current step.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    /// Credentials failed validation.
    #[error(transparent)]
    Credentials(#[from] PrincipalValidationError),
    /// Profile details failed validation.
    #[error(transparent)]
    Profile(#[from] ProfileValidationError),
    /// The requested action does not apply to the current step.
    #[error("cannot {action} while in the {step} step")]
    WrongStep {
        /// Step the wizard is in.
        step: WizardStep,
        /// Attempted action.
        action: &'static str,
    },
}

impl WizardError {
    /// Form field the error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Credentials(PrincipalValidationError::EmptyEmail) => "email",
            Self::Credentials(PrincipalValidationError::EmptyId | PrincipalValidationError::PaddedId) => {
                "id"
            }
            Self::Credentials(_) => "password",
            Self::Profile(err) => err.field(),
            Self::WrongStep { .. } => "step",
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Credentials(
                PrincipalValidationError::EmptyEmail | PrincipalValidationError::EmptyCredential,
            ) => "required",
            Self::Credentials(PrincipalValidationError::CredentialTooShort { .. }) => "too_short",
            Self::Credentials(_) => "invalid",
            Self::Profile(ProfileValidationError::NotAWholeNumber { .. }) => "not_a_number",
            Self::Profile(ProfileValidationError::RoleMismatch { .. }) => "role_mismatch",
            Self::Profile(_) => "required",
            Self::WrongStep { .. } => "wrong_step",
        }
    }
}

impl From<WizardError> for Error {
    fn from(value: WizardError) -> Self {
        Error::invalid_request(value.to_string())
            .with_details(json!({ "field": value.field(), "code": value.code() }))
    }
}

/// Everything the commit sequence needs, borrowed from a ready wizard.
#[derive(Debug)]
pub(crate) struct CommitPlan<'a> {
    pub credentials: &'a AccountCredentials,
    pub profile: &'a ProfileDetails,
    pub photo: Option<&'a PhotoUpload>,
    pub experiences: Vec<&'a ExperienceEntry>,
}

/// Multi-step account creation form.
///
/// The role is fixed when the wizard opens. Moving backwards never discards
/// entered data, and dropping the wizard before commit has no remote
/// effect.
///
/// # Examples
/// ```
/// use vakaalat_console::domain::{ClientDetails, ContactDetails, ProfileDetails};
/// use vakaalat_console::domain::{ProvisioningWizard, Role, WizardStep};
///
/// let mut wizard = ProvisioningWizard::new(Role::Client);
/// wizard.submit_credentials("ravi@example.in", "s3cret!").unwrap();
/// let details = ProfileDetails::Client(ClientDetails {
///     contact: ContactDetails { full_name: "Ravi".into(), ..Default::default() },
///     occupation: String::new(),
/// });
/// wizard.submit_profile(details, None).unwrap();
/// assert_eq!(wizard.step(), WizardStep::ProfileDetails);
/// assert!(wizard.is_ready());
/// ```
#[derive(Debug, Clone)]
pub struct ProvisioningWizard {
    role: Role,
    step: WizardStep,
    credentials: Option<AccountCredentials>,
    profile: Option<ProfileDetails>,
    photo: Option<PhotoUpload>,
    experiences: Vec<ExperienceEntry>,
}

impl ProvisioningWizard {
    /// Open a wizard for `role`.
    pub fn new(role: Role) -> Self {
        Self {
            role,
            step: WizardStep::Credentials,
            credentials: None,
            profile: None,
            photo: None,
            experiences: Vec::new(),
        }
    }

    /// Role chosen when the wizard opened.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Current step.
    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Accepted credentials, if any.
    pub fn credentials(&self) -> Option<&AccountCredentials> {
        self.credentials.as_ref()
    }

    /// Accepted profile details, if any.
    pub fn profile(&self) -> Option<&ProfileDetails> {
        self.profile.as_ref()
    }

    /// Staged photo, if any.
    pub fn photo(&self) -> Option<&PhotoUpload> {
        self.photo.as_ref()
    }

    /// Case-history entries as currently entered.
    pub fn experiences(&self) -> &[ExperienceEntry] {
        &self.experiences
    }

    /// Accept sign-in credentials and move to profile details.
    pub fn submit_credentials(
        &mut self,
        email: &str,
        credential: &str,
    ) -> Result<WizardStep, WizardError> {
        self.require(WizardStep::Credentials, "submit credentials")?;
        self.credentials = Some(AccountCredentials::try_from_parts(email, credential)?);
        self.step = WizardStep::ProfileDetails;
        Ok(self.step)
    }

    /// Accept profile details and an optional photo.
    ///
    /// Experienced lawyers move on to case history, pre-filled with blank
    /// entries when none were entered before. Everyone else stays on this
    /// step, ready to commit. Photos are dropped for roles that do not
    /// accept them.
    pub fn submit_profile(
        &mut self,
        details: ProfileDetails,
        photo: Option<PhotoUpload>,
    ) -> Result<WizardStep, WizardError> {
        self.require(WizardStep::ProfileDetails, "submit profile details")?;
        if details.role() != self.role {
            return Err(ProfileValidationError::RoleMismatch {
                expected: self.role,
                found: details.role(),
            }
            .into());
        }
        details.validate()?;

        let mut details = details;
        if let ProfileDetails::Lawyer(lawyer) = &mut details {
            lawyer.normalise_specializations();
        }
        self.photo = photo.filter(|_| self.role.schema().accepts_photo);

        if details.requires_experience() {
            if self.experiences.is_empty() {
                self.experiences = vec![ExperienceEntry::blank(); EXPERIENCE_PREFILL_SLOTS];
            }
            self.step = WizardStep::ExperienceDetails;
        }
        self.profile = Some(details);
        Ok(self.step)
    }

    /// Replace the case-history entries.
    pub fn set_experiences(&mut self, entries: Vec<ExperienceEntry>) -> Result<(), WizardError> {
        self.require(WizardStep::ExperienceDetails, "edit case history")?;
        self.experiences = entries;
        Ok(())
    }

    /// Step back one page, keeping what was entered.
    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        self.step = match self.step {
            WizardStep::ExperienceDetails => WizardStep::ProfileDetails,
            WizardStep::ProfileDetails => WizardStep::Credentials,
            step @ (WizardStep::Credentials | WizardStep::Committed) => {
                return Err(WizardError::WrongStep {
                    step,
                    action: "go back",
                });
            }
        };
        Ok(self.step)
    }

    /// Whether the commit sequence may start from the current step.
    pub fn is_ready(&self) -> bool {
        match (self.step, &self.profile) {
            (WizardStep::ExperienceDetails, Some(_)) => self.credentials.is_some(),
            (WizardStep::ProfileDetails, Some(profile)) => {
                self.credentials.is_some() && !profile.requires_experience()
            }
            _ => false,
        }
    }

    pub(crate) fn plan(&self) -> Result<CommitPlan<'_>, WizardError> {
        let not_ready = WizardError::WrongStep {
            step: self.step,
            action: "commit",
        };
        if !self.is_ready() {
            return Err(not_ready);
        }
        let (Some(credentials), Some(profile)) = (&self.credentials, &self.profile) else {
            return Err(not_ready);
        };
        let experiences = if profile.requires_experience() {
            self.experiences.iter().collect()
        } else {
            Vec::new()
        };
        Ok(CommitPlan {
            credentials,
            profile,
            photo: self.photo.as_ref(),
            experiences,
        })
    }

    pub(crate) fn mark_committed(&mut self) {
        self.step = WizardStep::Committed;
    }

    fn require(&self, expected: WizardStep, action: &'static str) -> Result<(), WizardError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(WizardError::WrongStep {
                step: self.step,
                action,
            })
        }
    }
}
