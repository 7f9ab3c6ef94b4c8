//! Account provisioning: the step-by-step wizard and its commit sequence.
//!
//! [`ProvisioningWizard`] is pure and synchronous; it only validates and
//! moves between steps. [`AccountProvisioner`] drains a ready wizard into
//! the three stores in a fixed order, classifying each step as fatal or
//! best-effort.

mod commit;
mod wizard;

pub use commit::{
    AccountProvisioner, CommitStep, OrphanOutcome, OrphanPolicy, ProvisioningError,
    ProvisioningReceipt, StepOutcome, StepReport,
};
pub use wizard::{ProvisioningWizard, WizardError, WizardStep};
