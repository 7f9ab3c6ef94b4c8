//! Domain primitives and services.
//!
//! Purpose: define the account model shared by the Provisioning Wizard and
//! the Record Synchronizer, the ports for the three external stores, and the
//! services that sequence writes across them. Nothing here performs I/O
//! except through a port.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic error payload.
//! - ProvisioningWizard / AccountProvisioner: create an account.
//! - RecordSynchronizer: apply an operator edit to an existing record.
//! - AccountAdministrator: delete, ban and notify.

pub mod account_admin;
pub mod error;
pub mod locations;
pub mod ports;
pub mod principal;
pub mod profile;
pub mod provisioning;
pub mod record_sync;
pub mod schema;
pub mod trace_id;

pub use self::account_admin::{
    AccountAdministrator, AdminError, BanRequest, Broadcast, DeletionReceipt, verify_operator_secret,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::principal::{
    AccountCredentials, Credential, NewPrincipal, PrincipalId, PrincipalUpdate,
    PrincipalValidationError,
};
pub use self::profile::{
    ClientDetails, ContactDetails, ExperienceEntry, LawyerDetails, PhotoUpload, ProfileDetails,
    ProfileValidationError,
};
pub use self::provisioning::{
    AccountProvisioner, CommitStep, OrphanOutcome, OrphanPolicy, ProvisioningError,
    ProvisioningReceipt, ProvisioningWizard, StepOutcome, StepReport, WizardError, WizardStep,
};
pub use self::record_sync::{EditableRecord, RecordEdit, RecordSynchronizer, SyncError, SyncOutcome};
pub use self::schema::{Role, Specialization, Table};
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use vakaalat_console::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::unauthorized("Invalid key or unauthorized access"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
