//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every operator endpoint, the health probes, the
//! request and response bodies, and the bearer scheme carrying the
//! operator's shared secret.
//!
//! The generated document is served by Swagger UI in debug builds and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::domain::{Error, ErrorCode, Role, Specialization, Table};
use crate::inbound::http::accounts::{
    AccountCreatedResponse, AccountDeletedResponse, BanAccountRequest, CreateAccountRequest,
    ExperiencePayload, ProfilePayload, StepSummary,
};
use crate::inbound::http::notifications::{BroadcastRequest, BroadcastResponse};
use crate::inbound::http::payloads::PhotoPayload;
use crate::inbound::http::records::{EditRecordRequest, RecordResponse, RecordSavedResponse};
use crate::inbound::http::reference::{ReferenceData, StateCitiesDto};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Security scheme name referenced by every operator endpoint.
pub const OPERATOR_SCHEME: &str = "OperatorKey";

/// Enrich the generated document with the operator bearer scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            OPERATOR_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("The backend service key the console was started with."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Vakaalat admin console API",
        description = "Operator endpoints for provisioning, editing and moderating marketplace accounts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("OperatorKey" = [])),
    paths(
        crate::inbound::http::accounts::create_account,
        crate::inbound::http::accounts::delete_account,
        crate::inbound::http::accounts::ban_account,
        crate::inbound::http::records::get_record,
        crate::inbound::http::records::edit_record,
        crate::inbound::http::notifications::broadcast,
        crate::inbound::http::reference::reference_data,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Role,
        Specialization,
        Table,
        CreateAccountRequest,
        ProfilePayload,
        ExperiencePayload,
        PhotoPayload,
        AccountCreatedResponse,
        StepSummary,
        AccountDeletedResponse,
        BanAccountRequest,
        EditRecordRequest,
        RecordResponse,
        RecordSavedResponse,
        BroadcastRequest,
        BroadcastResponse,
        ReferenceData,
        StateCitiesDto,
    )),
    tags(
        (name = "accounts", description = "Provision, delete and ban accounts"),
        (name = "records", description = "Edit stored records"),
        (name = "notifications", description = "In-app notifications"),
        (name = "reference", description = "Picker catalogues"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
