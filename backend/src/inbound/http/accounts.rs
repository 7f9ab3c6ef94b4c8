//! Account lifecycle handlers.
//!
//! ```text
//! POST   /api/v1/accounts            {"role":"lawyer","email":"...","password":"...","profile":{...}}
//! DELETE /api/v1/accounts/{role}/{id}
//! POST   /api/v1/accounts/{id}/ban   {"hours":24}
//! ```
//!
//! Account creation drives the provisioning wizard through every page in
//! one request and then commits it.

use actix_web::{HttpResponse, delete, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    AccountAdministrator, AccountProvisioner, BanRequest, ClientDetails, CommitStep, ContactDetails,
    Error, ExperienceEntry, LawyerDetails, ProfileDetails, ProvisioningReceipt, ProvisioningWizard,
    Role, Specialization, StepOutcome, WizardStep,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Operator;
use crate::inbound::http::payloads::{PhotoPayload, principal_from_path, text_or_number};
use crate::inbound::http::state::HttpState;

/// Profile attributes for either role.
///
/// Fields that do not apply to the requested role are ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfilePayload {
    pub full_name: String,
    #[serde(deserialize_with = "text_or_number")]
    pub age: String,
    pub phone: String,
    pub address_line1: String,
    pub city: String,
    pub state: String,
    /// Client only.
    pub occupation: String,
    /// Lawyer only.
    pub bar_council_number: String,
    /// Lawyer only.
    pub law_school: String,
    /// Lawyer only.
    pub primary_specialization: Option<Specialization>,
    /// Lawyer only.
    pub other_specializations: Vec<Specialization>,
    /// Lawyer only; two or more opens case history.
    #[serde(deserialize_with = "text_or_number")]
    pub experience_years: String,
}

impl ProfilePayload {
    fn into_details(self, role: Role) -> ProfileDetails {
        let contact = ContactDetails {
            full_name: self.full_name,
            age: self.age,
            phone: self.phone,
            address_line1: self.address_line1,
            city: self.city,
            state: self.state,
        };
        match role {
            Role::Client => ProfileDetails::Client(ClientDetails {
                contact,
                occupation: self.occupation,
            }),
            Role::Lawyer => ProfileDetails::Lawyer(LawyerDetails {
                contact,
                bar_council_number: self.bar_council_number,
                law_school: self.law_school,
                primary_specialization: self.primary_specialization,
                other_specializations: self.other_specializations.into_iter().collect(),
                experience_years: self.experience_years,
            }),
        }
    }
}

/// One past case.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperiencePayload {
    pub case_title: String,
    pub case_domain: Option<Specialization>,
    pub case_description: String,
    pub case_outcome: String,
}

impl From<ExperiencePayload> for ExperienceEntry {
    fn from(value: ExperiencePayload) -> Self {
        Self {
            case_title: value.case_title,
            case_domain: value.case_domain,
            case_description: value.case_description,
            case_outcome: value.case_outcome,
        }
    }
}

/// Request body for `POST /api/v1/accounts`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub role: Role,
    pub email: String,
    pub password: String,
    pub profile: ProfilePayload,
    /// Lawyer only; ignored for clients.
    #[serde(default)]
    pub photo: Option<PhotoPayload>,
    /// Case history; only kept for lawyers with two or more years.
    #[serde(default)]
    pub experiences: Vec<ExperiencePayload>,
}

/// Outcome of one commit step.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepSummary {
    /// `createPrincipal`, `uploadPhoto`, `insertProfile` or `insertExperience`.
    pub step: String,
    /// `completed`, `skipped` or `failed`.
    pub status: String,
    /// Store message for failed steps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response body for a committed account.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountCreatedResponse {
    pub principal_id: String,
    pub role: Role,
    pub photo_url: Option<String>,
    pub experience_rows: usize,
    pub steps: Vec<StepSummary>,
}

impl From<ProvisioningReceipt> for AccountCreatedResponse {
    fn from(value: ProvisioningReceipt) -> Self {
        let steps = value
            .steps
            .into_iter()
            .map(|report| {
                let (status, message) = match report.outcome {
                    StepOutcome::Completed => ("completed", None),
                    StepOutcome::Skipped => ("skipped", None),
                    StepOutcome::Failed { message } => ("failed", Some(message)),
                };
                StepSummary {
                    step: step_name(report.step).to_owned(),
                    status: status.to_owned(),
                    message,
                }
            })
            .collect();
        Self {
            principal_id: value.principal_id.into(),
            role: value.role,
            photo_url: value.photo_url,
            experience_rows: value.experience_rows,
            steps,
        }
    }
}

fn step_name(step: CommitStep) -> &'static str {
    match step {
        CommitStep::CreatePrincipal => "createPrincipal",
        CommitStep::UploadPhoto => "uploadPhoto",
        CommitStep::InsertProfile => "insertProfile",
        CommitStep::InsertExperience => "insertExperience",
    }
}

/// Create a principal and its profile.
///
/// Store failures after the principal exists surface as `partial_commit`
/// with the committed steps in `details`.
#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = AccountCreatedResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 502, description = "Store failure or partial commit", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "createAccount"
)]
#[post("/accounts")]
pub async fn create_account(
    _operator: Operator,
    state: web::Data<HttpState>,
    payload: web::Json<CreateAccountRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let photo = request.photo.map(PhotoPayload::decode).transpose()?;

    let mut wizard = ProvisioningWizard::new(request.role);
    wizard.submit_credentials(&request.email, &request.password)?;
    wizard.submit_profile(request.profile.into_details(request.role), photo)?;
    if wizard.step() == WizardStep::ExperienceDetails {
        wizard.set_experiences(
            request
                .experiences
                .into_iter()
                .map(ExperienceEntry::from)
                .collect(),
        )?;
    }

    let receipt = AccountProvisioner::new(&state.stores)
        .with_orphan_policy(state.orphan_policy)
        .commit(&mut wizard)
        .await?;
    Ok(HttpResponse::Created().json(AccountCreatedResponse::from(receipt)))
}

/// Response body for a deleted account.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountDeletedResponse {
    /// `false` when the profile is gone but the principal could not be removed.
    pub principal_deleted: bool,
}

/// Delete a profile row and then its principal.
#[utoipa::path(
    delete,
    path = "/api/v1/accounts/{role}/{id}",
    params(
        ("role" = Role, Path, description = "Profile role"),
        ("id" = String, Path, description = "Principal identifier")
    ),
    responses(
        (status = 200, description = "Account deleted", body = AccountDeletedResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 502, description = "Store failure", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "deleteAccount"
)]
#[delete("/accounts/{role}/{id}")]
pub async fn delete_account(
    _operator: Operator,
    state: web::Data<HttpState>,
    path: web::Path<(Role, String)>,
) -> ApiResult<web::Json<AccountDeletedResponse>> {
    let (role, raw_id) = path.into_inner();
    let id = principal_from_path(&raw_id)?;
    let receipt = AccountAdministrator::new(&state.stores, state.clock.clone())
        .delete_account(role, &id)
        .await?;
    Ok(web::Json(AccountDeletedResponse {
        principal_deleted: receipt.principal_deleted,
    }))
}

/// Request body for `POST /api/v1/accounts/{id}/ban`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BanAccountRequest {
    /// Ban length; defaults to roughly one hundred years.
    #[serde(default)]
    pub hours: Option<u32>,
}

/// Ban a principal from signing in.
#[utoipa::path(
    post,
    path = "/api/v1/accounts/{id}/ban",
    params(("id" = String, Path, description = "Principal identifier")),
    request_body = BanAccountRequest,
    responses(
        (status = 204, description = "Principal banned"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 502, description = "Store failure", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "banAccount"
)]
#[post("/accounts/{id}/ban")]
pub async fn ban_account(
    _operator: Operator,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<BanAccountRequest>,
) -> ApiResult<HttpResponse> {
    let id = principal_from_path(&path.into_inner())?;
    let request = BanRequest::new(payload.into_inner().hours)?;
    AccountAdministrator::new(&state.stores, state.clock.clone())
        .ban(&id, request)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
