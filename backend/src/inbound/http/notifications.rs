//! Notification broadcast handler.
//!
//! ```text
//! POST /api/v1/notifications {"recipients":["<id>"],"title":"...","message":"..."}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AccountAdministrator, Broadcast, Error, PrincipalId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Operator;
use crate::inbound::http::payloads::invalid_field;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/v1/notifications`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastRequest {
    /// Principal ids; duplicates are notified once.
    pub recipients: Vec<String>,
    pub title: String,
    pub message: String,
}

/// Response body for a sent broadcast.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastResponse {
    /// Notification rows written.
    pub delivered: usize,
}

/// Send one in-app notification to each recipient.
#[utoipa::path(
    post,
    path = "/api/v1/notifications",
    request_body = BroadcastRequest,
    responses(
        (status = 201, description = "Notifications written", body = BroadcastResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 502, description = "Store failure", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "broadcastNotification"
)]
#[post("/notifications")]
pub async fn broadcast(
    _operator: Operator,
    state: web::Data<HttpState>,
    payload: web::Json<BroadcastRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let recipients = request
        .recipients
        .iter()
        .map(PrincipalId::new)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| invalid_field("recipients", "invalid", &err.to_string()))?;
    let broadcast = Broadcast::new(recipients, request.title, request.message)?;
    let delivered = AccountAdministrator::new(&state.stores, state.clock.clone())
        .broadcast(&broadcast)
        .await?;
    Ok(HttpResponse::Created().json(BroadcastResponse { delivered }))
}
