//! Record editing handlers.
//!
//! ```text
//! GET   /api/v1/records/{table}/{key}
//! PATCH /api/v1/records/{table}/{key} {"fields":{"phone":"98100 00000"},"newPassword":"..."}
//! ```
//!
//! Profile tables are keyed by principal id, cases by `case_id`, all other
//! tables by `id`.

use actix_web::{get, patch, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::Row;
use crate::domain::{Error, RecordEdit, RecordSynchronizer, SyncOutcome, Table};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Operator;
use crate::inbound::http::payloads::PhotoPayload;
use crate::inbound::http::state::HttpState;

/// A stored record with the columns the console may edit.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    pub table: Table,
    /// Every column as stored.
    #[schema(value_type = Object)]
    pub record: Row,
    /// Columns offered for editing.
    pub editable: Vec<String>,
}

/// Request body for `PATCH /api/v1/records/{table}/{key}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditRecordRequest {
    /// Column values as edited; unchanged and read-only columns are ignored.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub fields: Row,
    /// New sign-in credential; profile tables only, blank means unchanged.
    #[serde(default)]
    pub new_password: Option<String>,
    /// Replacement photo; profile tables only.
    #[serde(default)]
    pub photo: Option<PhotoPayload>,
}

/// Response body for a saved edit.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordSavedResponse {
    /// Record after the edit.
    #[schema(value_type = Object)]
    pub record: Row,
    /// Columns that were written.
    #[schema(value_type = Object)]
    pub applied: Row,
    /// Whether the principal was updated as well.
    pub identity_updated: bool,
}

impl From<SyncOutcome> for RecordSavedResponse {
    fn from(value: SyncOutcome) -> Self {
        Self {
            record: value.record.into_fields(),
            applied: value.applied,
            identity_updated: value.identity_updated,
        }
    }
}

/// Fetch one record for editing.
#[utoipa::path(
    get,
    path = "/api/v1/records/{table}/{key}",
    params(
        ("table" = Table, Path, description = "Backend table"),
        ("key" = String, Path, description = "Record key")
    ),
    responses(
        (status = 200, description = "Record", body = RecordResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 502, description = "Store failure", body = Error)
    ),
    tags = ["records"],
    operation_id = "getRecord"
)]
#[get("/records/{table}/{key}")]
pub async fn get_record(
    _operator: Operator,
    state: web::Data<HttpState>,
    path: web::Path<(Table, String)>,
) -> ApiResult<web::Json<RecordResponse>> {
    let (table, key) = path.into_inner();
    let record = RecordSynchronizer::new(&state.stores)
        .load(table, &key)
        .await?;
    let editable = record
        .editable_fields()
        .map(|(column, _)| column.to_owned())
        .collect();
    Ok(web::Json(RecordResponse {
        table,
        record: record.into_fields(),
        editable,
    }))
}

/// Apply an operator edit to one record.
///
/// The relational row is written first. Profile edits then push changed
/// email, phone and credential to the principal; a failure there after the
/// row was written surfaces as `partial_commit`.
#[utoipa::path(
    patch,
    path = "/api/v1/records/{table}/{key}",
    params(
        ("table" = Table, Path, description = "Backend table"),
        ("key" = String, Path, description = "Record key")
    ),
    request_body = EditRecordRequest,
    responses(
        (status = 200, description = "Edit applied", body = RecordSavedResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 502, description = "Store failure or partial commit", body = Error)
    ),
    tags = ["records"],
    operation_id = "editRecord"
)]
#[patch("/records/{table}/{key}")]
pub async fn edit_record(
    _operator: Operator,
    state: web::Data<HttpState>,
    path: web::Path<(Table, String)>,
    payload: web::Json<EditRecordRequest>,
) -> ApiResult<web::Json<RecordSavedResponse>> {
    let (table, key) = path.into_inner();
    let request = payload.into_inner();
    let edit = RecordEdit {
        fields: request.fields,
        new_credential: request.new_password,
        photo: request.photo.map(PhotoPayload::decode).transpose()?,
    };

    let synchronizer = RecordSynchronizer::new(&state.stores);
    let original = synchronizer.load(table, &key).await?;
    let outcome = synchronizer.save(&original, edit).await?;
    Ok(web::Json(outcome.into()))
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod tests;
