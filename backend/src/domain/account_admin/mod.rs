//! Administrative actions outside the wizard: deleting and banning
//! accounts, broadcasting notifications, and proving the operator's secret.

use std::collections::HashSet;
use std::sync::Arc;

use mockable::Clock;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::domain::ports::{MatchKey, Row, StoreContext, StoreError};
use crate::domain::schema::{DEFAULT_BAN_HOURS, Role, Table};
use crate::domain::{Error, PrincipalId, PrincipalUpdate};

/// Reasons an administrative action failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdminError {
    /// The shared secret does not grant admin access.
    #[error("Invalid key or unauthorized access")]
    Unauthorized(StoreError),
    /// Input rejected before any remote call.
    #[error("{message}")]
    Invalid {
        /// Offending input field.
        field: &'static str,
        /// Operator-facing message.
        message: &'static str,
    },
    /// A fatal store call failed.
    #[error("{0}")]
    Store(StoreError),
}

impl From<AdminError> for Error {
    fn from(value: AdminError) -> Self {
        match value {
            AdminError::Unauthorized(err) => Error::unauthorized(unauthorized_message(&err))
                .with_details(json!({ "store": err.store() })),
            AdminError::Invalid { field, message } => Error::invalid_request(message)
                .with_details(json!({ "field": field, "code": "invalid" })),
            AdminError::Store(err) => {
                Error::store_failure(err.message()).with_details(json!({ "store": err.store() }))
            }
        }
    }
}

fn unauthorized_message(err: &StoreError) -> String {
    format!("Invalid key or unauthorized access: {}", err.message())
}

/// Prove the configured secret grants admin access to the identity store.
///
/// Lists a single principal; any failure means the secret is unusable.
pub async fn verify_operator_secret(stores: &StoreContext) -> Result<(), AdminError> {
    stores
        .identity()
        .list_principals(1, 1)
        .await
        .map(|_| ())
        .map_err(|err| AdminError::Unauthorized(err.into()))
}

/// Ban length in hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BanRequest {
    hours: u32,
}

impl BanRequest {
    /// Ban for `hours`, or effectively forever when `None`.
    pub fn new(hours: Option<u32>) -> Result<Self, AdminError> {
        match hours.unwrap_or(DEFAULT_BAN_HOURS) {
            0 => Err(AdminError::Invalid {
                field: "hours",
                message: "Ban duration must be at least one hour",
            }),
            hours => Ok(Self { hours }),
        }
    }

    /// Ban length in hours.
    pub fn hours(&self) -> u32 {
        self.hours
    }
}

impl Default for BanRequest {
    fn default() -> Self {
        Self {
            hours: DEFAULT_BAN_HOURS,
        }
    }
}

/// A notification addressed to one or more accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Broadcast {
    recipients: Vec<PrincipalId>,
    title: String,
    message: String,
}

impl Broadcast {
    /// Validate a broadcast. Duplicate recipients are notified once.
    pub fn new(
        recipients: Vec<PrincipalId>,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, AdminError> {
        let (title, message) = (title.into(), message.into());
        if recipients.is_empty() {
            return Err(AdminError::Invalid {
                field: "recipients",
                message: "Select at least one recipient",
            });
        }
        if title.trim().is_empty() || message.trim().is_empty() {
            return Err(AdminError::Invalid {
                field: if title.trim().is_empty() { "title" } else { "message" },
                message: "Title and message are required",
            });
        }
        let mut seen = HashSet::new();
        let recipients = recipients
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();
        Ok(Self {
            recipients,
            title,
            message,
        })
    }

    /// Distinct recipients in submission order.
    pub fn recipients(&self) -> &[PrincipalId] {
        &self.recipients
    }
}

/// Result of deleting an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletionReceipt {
    /// Whether the identity principal was removed as well as the profile.
    pub principal_deleted: bool,
}

/// Runs administrative actions against the store context.
#[derive(Clone)]
pub struct AccountAdministrator<'a> {
    stores: &'a StoreContext,
    clock: Arc<dyn Clock>,
}

impl<'a> AccountAdministrator<'a> {
    /// Administrator stamping notifications with `clock`.
    pub fn new(stores: &'a StoreContext, clock: Arc<dyn Clock>) -> Self {
        Self { stores, clock }
    }

    /// Delete the profile row, then the principal.
    ///
    /// The profile delete is fatal. A failed principal delete only logs a
    /// warning; the account is already gone from every listing.
    pub async fn delete_account(
        &self,
        role: Role,
        id: &PrincipalId,
    ) -> Result<DeletionReceipt, AdminError> {
        self.stores
            .profiles()
            .delete(role.table(), &MatchKey::new("id", id.as_str()))
            .await
            .map_err(|err| AdminError::Store(err.into()))?;

        let principal_deleted = match self.stores.identity().delete_principal(id).await {
            Ok(()) => true,
            Err(err) => {
                warn!(principal_id = %id, %role, store_error = %err, "profile deleted but principal remains");
                false
            }
        };
        info!(principal_id = %id, %role, principal_deleted, "account deleted");
        Ok(DeletionReceipt { principal_deleted })
    }

    /// Ban a principal from signing in.
    pub async fn ban(&self, id: &PrincipalId, request: BanRequest) -> Result<(), AdminError> {
        let update = PrincipalUpdate {
            ban_duration_hours: Some(request.hours()),
            ..PrincipalUpdate::default()
        };
        self.stores
            .identity()
            .update_principal(id, &update)
            .await
            .map_err(|err| AdminError::Store(err.into()))?;
        info!(principal_id = %id, hours = request.hours(), "account banned");
        Ok(())
    }

    /// Insert one unread notification per recipient in a single call.
    pub async fn broadcast(&self, broadcast: &Broadcast) -> Result<usize, AdminError> {
        let created_at = self.clock.utc().to_rfc3339();
        let rows: Vec<Row> = broadcast
            .recipients
            .iter()
            .map(|recipient| {
                let mut row = Row::new();
                row.insert("user_id".to_owned(), Value::from(recipient.as_str()));
                row.insert("title".to_owned(), Value::from(broadcast.title.as_str()));
                row.insert("message".to_owned(), Value::from(broadcast.message.as_str()));
                row.insert("created_at".to_owned(), Value::from(created_at.as_str()));
                row.insert("is_read".to_owned(), Value::Bool(false));
                row
            })
            .collect();
        self.stores
            .profiles()
            .insert(Table::Notifications, &rows)
            .await
            .map_err(|err| AdminError::Store(err.into()))?;
        info!(recipients = rows.len(), "notification broadcast");
        Ok(rows.len())
    }
}
