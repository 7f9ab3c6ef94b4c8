//! Ordered, non-transactional commit of a ready wizard.
//!
//! Steps run strictly in sequence:
//!
//! 1. create the principal (fatal),
//! 2. upload the lawyer's photo (best-effort),
//! 3. insert the profile row (fatal, the principal is already live),
//! 4. bulk-insert complete case-history entries (best-effort).
//!
//! No step is retried. A failure in step 3 leaves an orphaned principal
//! unless the provisioner was built with [`OrphanPolicy::DeletePrincipal`].

use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};

use super::wizard::{CommitPlan, ProvisioningWizard, WizardError};
use crate::domain::ports::{BlobPath, StoreContext, StoreError, WriteMode};
use crate::domain::schema::{Role, Table};
use crate::domain::{Error, NewPrincipal, PrincipalId};

/// What to do with a principal whose profile insert failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrphanPolicy {
    /// Leave the principal in place and report a partial commit.
    #[default]
    Retain,
    /// Delete the principal again before reporting the failure.
    DeletePrincipal,
}

/// Steps of the commit sequence, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CommitStep {
    /// Create the identity-store principal.
    CreatePrincipal,
    /// Upload the profile photo.
    UploadPhoto,
    /// Insert the profile row.
    InsertProfile,
    /// Insert case-history rows.
    InsertExperience,
}

/// Result of one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum StepOutcome {
    /// The step wrote to its store.
    Completed,
    /// Nothing to do for this account.
    Skipped,
    /// A best-effort step failed; the sequence continued.
    Failed {
        /// Store message.
        message: String,
    },
}

/// Outcome of one step, as reported to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    /// Which step.
    pub step: CommitStep,
    /// How it went.
    #[serde(flatten)]
    pub outcome: StepOutcome,
}

/// What a successful commit produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningReceipt {
    /// Identifier shared by the principal and the profile.
    pub principal_id: PrincipalId,
    /// Role of the new account.
    pub role: Role,
    /// Public URL of the uploaded photo, when one was stored.
    pub photo_url: Option<String>,
    /// Number of case-history rows written.
    pub experience_rows: usize,
    /// Per-step outcomes in execution order.
    pub steps: Vec<StepReport>,
}

impl ProvisioningReceipt {
    /// Outcome of `step`.
    pub fn outcome(&self, step: CommitStep) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|report| report.step == step)
            .map(|report| &report.outcome)
    }
}

/// What happened to the principal left behind by a failed profile insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum OrphanOutcome {
    /// The principal still exists without a profile.
    Retained,
    /// The principal was deleted again.
    Deleted,
    /// Deleting the principal failed; it still exists.
    DeleteFailed {
        /// Store message.
        message: String,
    },
}

/// Reasons a commit did not produce an account.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProvisioningError {
    /// The wizard was not ready to commit.
    #[error(transparent)]
    Wizard(#[from] WizardError),
    /// Principal creation failed; nothing was written.
    #[error("{0}")]
    CreatePrincipal(StoreError),
    /// The principal exists but its profile row could not be inserted.
    #[error("{source}")]
    InsertProfile {
        /// Principal created in the first step.
        principal_id: PrincipalId,
        /// Profile store failure.
        source: StoreError,
        /// Steps that ran before the failure.
        steps: Vec<StepReport>,
        /// Fate of the principal.
        orphan: OrphanOutcome,
    },
}

impl ProvisioningError {
    /// Whether some earlier write is still live in a store.
    pub fn is_partial(&self) -> bool {
        matches!(
            self,
            Self::InsertProfile {
                orphan: OrphanOutcome::Retained | OrphanOutcome::DeleteFailed { .. },
                ..
            }
        )
    }
}

impl From<ProvisioningError> for Error {
    fn from(value: ProvisioningError) -> Self {
        let partial = value.is_partial();
        match value {
            ProvisioningError::Wizard(err) => err.into(),
            ProvisioningError::CreatePrincipal(err) => Error::store_failure(err.message())
                .with_details(json!({ "store": err.store() })),
            ProvisioningError::InsertProfile {
                principal_id,
                source,
                steps,
                orphan,
            } => {
                let details = json!({
                    "store": source.store(),
                    "principalId": principal_id,
                    "committedSteps": steps,
                    "orphan": orphan,
                });
                if partial {
                    Error::partial_commit(source.message()).with_details(details)
                } else {
                    Error::store_failure(source.message()).with_details(details)
                }
            }
        }
    }
}

/// Runs the commit sequence against the store context.
#[derive(Debug, Clone, Copy)]
pub struct AccountProvisioner<'a> {
    stores: &'a StoreContext,
    orphan_policy: OrphanPolicy,
}

impl<'a> AccountProvisioner<'a> {
    /// Provisioner that retains orphaned principals.
    pub fn new(stores: &'a StoreContext) -> Self {
        Self {
            stores,
            orphan_policy: OrphanPolicy::default(),
        }
    }

    /// Choose how a failed profile insert is compensated.
    #[must_use]
    pub fn with_orphan_policy(mut self, policy: OrphanPolicy) -> Self {
        self.orphan_policy = policy;
        self
    }

    /// Commit `wizard` to the stores.
    ///
    /// The exclusive borrow keeps a second commit of the same wizard from
    /// starting while this one is in flight. On success the wizard moves to
    /// [`super::WizardStep::Committed`]; on failure it keeps its step so the
    /// operator can retry from the top.
    pub async fn commit(
        &self,
        wizard: &mut ProvisioningWizard,
    ) -> Result<ProvisioningReceipt, ProvisioningError> {
        let receipt = {
            let plan = wizard.plan()?;
            self.run(plan).await?
        };
        wizard.mark_committed();
        Ok(receipt)
    }

    async fn run(&self, plan: CommitPlan<'_>) -> Result<ProvisioningReceipt, ProvisioningError> {
        let role = plan.profile.role();
        let email = plan.credentials.email();
        let mut steps = Vec::with_capacity(4);

        let principal_id = self
            .stores
            .identity()
            .create_principal(&NewPrincipal::from(plan.credentials))
            .await
            .map_err(|err| {
                error!(%role, store_error = %err, "principal creation failed");
                ProvisioningError::CreatePrincipal(err.into())
            })?;
        steps.push(StepReport {
            step: CommitStep::CreatePrincipal,
            outcome: StepOutcome::Completed,
        });

        let (photo_url, photo_outcome) = self.upload_photo(&principal_id, &plan).await;
        steps.push(StepReport {
            step: CommitStep::UploadPhoto,
            outcome: photo_outcome,
        });

        let row = plan
            .profile
            .to_row(&principal_id, email, photo_url.as_deref());
        if let Err(err) = self.stores.profiles().insert(role.table(), &[row]).await {
            error!(%principal_id, %role, store_error = %err, "profile insert failed");
            let orphan = self.compensate(&principal_id).await;
            return Err(ProvisioningError::InsertProfile {
                principal_id,
                source: err.into(),
                steps,
                orphan,
            });
        }
        steps.push(StepReport {
            step: CommitStep::InsertProfile,
            outcome: StepOutcome::Completed,
        });

        let (experience_rows, experience_outcome) =
            self.insert_experience(&principal_id, &plan).await;
        steps.push(StepReport {
            step: CommitStep::InsertExperience,
            outcome: experience_outcome,
        });

        info!(%principal_id, %role, experience_rows, "account provisioned");
        Ok(ProvisioningReceipt {
            principal_id,
            role,
            photo_url,
            experience_rows,
            steps,
        })
    }

    async fn upload_photo(
        &self,
        owner: &PrincipalId,
        plan: &CommitPlan<'_>,
    ) -> (Option<String>, StepOutcome) {
        let Some(photo) = plan.photo.filter(|_| plan.profile.role().schema().accepts_photo) else {
            return (None, StepOutcome::Skipped);
        };
        let path = BlobPath::photo_of(owner, photo);
        match self
            .stores
            .blobs()
            .upload(&path, photo, WriteMode::CreateOnly)
            .await
        {
            Ok(()) => (
                Some(self.stores.blobs().public_url(&path)),
                StepOutcome::Completed,
            ),
            Err(err) => {
                warn!(principal_id = %owner, %path, store_error = %err, "photo upload failed; continuing without photo");
                (
                    None,
                    StepOutcome::Failed {
                        message: err.message().to_owned(),
                    },
                )
            }
        }
    }

    async fn insert_experience(
        &self,
        lawyer: &PrincipalId,
        plan: &CommitPlan<'_>,
    ) -> (usize, StepOutcome) {
        let rows: Vec<_> = plan
            .experiences
            .iter()
            .filter(|entry| entry.is_complete())
            .map(|entry| entry.to_row(lawyer))
            .collect();
        if rows.is_empty() {
            return (0, StepOutcome::Skipped);
        }
        match self
            .stores
            .profiles()
            .insert(Table::LawyerExperience, &rows)
            .await
        {
            Ok(()) => (rows.len(), StepOutcome::Completed),
            Err(err) => {
                warn!(principal_id = %lawyer, store_error = %err, "case history insert failed; account kept");
                (
                    0,
                    StepOutcome::Failed {
                        message: err.message().to_owned(),
                    },
                )
            }
        }
    }

    async fn compensate(&self, orphan: &PrincipalId) -> OrphanOutcome {
        match self.orphan_policy {
            OrphanPolicy::Retain => {
                warn!(principal_id = %orphan, "principal retained without profile");
                OrphanOutcome::Retained
            }
            OrphanPolicy::DeletePrincipal => {
                match self.stores.identity().delete_principal(orphan).await {
                    Ok(()) => {
                        info!(principal_id = %orphan, "orphaned principal deleted");
                        OrphanOutcome::Deleted
                    }
                    Err(err) => {
                        error!(principal_id = %orphan, store_error = %err, "orphaned principal could not be deleted");
                        OrphanOutcome::DeleteFailed {
                            message: err.message().to_owned(),
                        }
                    }
                }
            }
        }
    }
}
