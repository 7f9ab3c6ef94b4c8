//! Record Synchronizer: applies an operator's edit to an existing row.
//!
//! A save reconciles up to three stores in order: the blob store (staged
//! photo), the profile store (minimal diff), and the identity store
//! (credential, email and phone). Every failure aborts the rest of the
//! save; nothing already written is reverted.

use serde_json::{Value, json};
use tracing::{error, info};

use crate::domain::ports::{BlobPath, MatchKey, Row, SelectQuery, StoreContext, StoreError, WriteMode};
use crate::domain::schema::{PHOTO_URL_COLUMN, ProfileField, Table, is_read_only};
use crate::domain::{Credential, Error, PhotoUpload, PrincipalId, PrincipalUpdate, PrincipalValidationError};

/// An existing row together with the table it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct EditableRecord {
    table: Table,
    fields: Row,
}

impl EditableRecord {
    /// Wrap a row read from `table`.
    pub fn new(table: Table, fields: Row) -> Self {
        Self { table, fields }
    }

    /// Source table.
    pub fn table(&self) -> Table {
        self.table
    }

    /// Every column as stored, including read-only ones.
    pub fn fields(&self) -> &Row {
        &self.fields
    }

    /// Consume the record, returning its columns.
    pub fn into_fields(self) -> Row {
        self.fields
    }

    /// Columns an operator may change.
    ///
    /// Excludes the fixed read-only set and every nested value.
    pub fn editable_fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .filter(|(key, value)| is_editable(key, value))
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Primary-key match: `id`, else the table's fallback key.
    pub fn key(&self) -> Option<MatchKey> {
        let resolvable = |column: &str| {
            self.fields
                .get(column)
                .filter(|value| !value.is_null())
                .map(|value| MatchKey::new(column, value.clone()))
        };
        resolvable("id").or_else(|| self.table.fallback_key().and_then(resolvable))
    }

    /// Principal owning the record, for profile tables.
    pub fn principal_id(&self) -> Option<PrincipalId> {
        if !self.table.is_profile() {
            return None;
        }
        self.fields
            .get("id")
            .and_then(Value::as_str)
            .and_then(|id| PrincipalId::new(id).ok())
    }

    fn text(&self, column: &str) -> Option<String> {
        self.fields.get(column).map(as_text)
    }
}

/// Operator changes to one record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordEdit {
    /// Edited column values; may include untouched and read-only columns.
    pub fields: Row,
    /// Replacement sign-in credential; blank means unchanged.
    pub new_credential: Option<String>,
    /// Replacement profile photo.
    pub photo: Option<PhotoUpload>,
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOutcome {
    /// Original record overlaid with the applied patch.
    pub record: EditableRecord,
    /// Patch sent to the profile store; empty when no update was issued.
    pub applied: Row,
    /// Whether an identity-store update was issued.
    pub identity_updated: bool,
}

/// Reasons a save failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyncError {
    /// The record carries neither `id` nor a fallback key.
    #[error("{table} record has no key to match on")]
    MissingKey {
        /// Table of the record.
        table: Table,
    },
    /// The replacement credential was rejected before any write.
    #[error(transparent)]
    Credential(#[from] PrincipalValidationError),
    /// No row matched the requested key.
    #[error("no {table} record with key {key}")]
    NotFound {
        /// Table searched.
        table: Table,
        /// Key value searched for.
        key: String,
    },
    /// Loading the original record failed.
    #[error("{0}")]
    Load(StoreError),
    /// The staged photo could not be stored; nothing else was written.
    #[error("Photo upload failed: {0}")]
    PhotoUpload(StoreError),
    /// The relational update failed.
    #[error("{0}")]
    Update(StoreError),
    /// The identity cascade failed.
    #[error("Auth Update Failed: {source}")]
    IdentityCascade {
        /// Identity store failure.
        source: StoreError,
        /// Record as it stands after the relational update.
        record: Row,
        /// Whether the relational update had already been applied.
        relational_applied: bool,
    },
}

impl SyncError {
    /// Whether part of the save is live in a store.
    pub fn is_partial(&self) -> bool {
        matches!(
            self,
            Self::IdentityCascade {
                relational_applied: true,
                ..
            }
        )
    }
}

impl From<SyncError> for Error {
    fn from(value: SyncError) -> Self {
        let partial = value.is_partial();
        let message = value.to_string();
        match value {
            SyncError::MissingKey { .. } => Error::invalid_request(message)
                .with_details(json!({ "field": "id", "code": "missing_key" })),
            SyncError::Credential(err) => Error::invalid_request(message).with_details(json!({
                "field": "password",
                "code": match err {
                    PrincipalValidationError::CredentialTooShort { .. } => "too_short",
                    _ => "invalid",
                },
            })),
            SyncError::NotFound { .. } => Error::not_found(message),
            SyncError::Load(err) | SyncError::Update(err) | SyncError::PhotoUpload(err) => {
                Error::store_failure(message).with_details(json!({ "store": err.store() }))
            }
            SyncError::IdentityCascade { source, record, .. } => {
                let details = json!({ "store": source.store(), "record": record });
                if partial {
                    Error::partial_commit(message).with_details(details)
                } else {
                    Error::store_failure(message).with_details(details)
                }
            }
        }
    }
}

/// Applies edits to existing records.
#[derive(Debug, Clone, Copy)]
pub struct RecordSynchronizer<'a> {
    stores: &'a StoreContext,
}

impl<'a> RecordSynchronizer<'a> {
    /// Synchronizer writing through `stores`.
    pub fn new(stores: &'a StoreContext) -> Self {
        Self { stores }
    }

    /// Read the current row of `table` whose key column equals `key`.
    ///
    /// Tables with a fallback key are looked up by it; all others by `id`.
    pub async fn load(&self, table: Table, key: &str) -> Result<EditableRecord, SyncError> {
        let column = table.fallback_key().unwrap_or("id");
        let query = SelectQuery::by_key(&MatchKey::new(column, key));
        let mut rows = self
            .stores
            .profiles()
            .select(table, &query)
            .await
            .map_err(|err| SyncError::Load(err.into()))?;
        if rows.is_empty() {
            return Err(SyncError::NotFound {
                table,
                key: key.to_owned(),
            });
        }
        Ok(EditableRecord::new(table, rows.swap_remove(0)))
    }

    /// Apply `edit` to `original`.
    pub async fn save(
        &self,
        original: &EditableRecord,
        edit: RecordEdit,
    ) -> Result<SyncOutcome, SyncError> {
        let table = original.table();
        let key = original.key().ok_or(SyncError::MissingKey { table })?;
        let principal = original.principal_id();

        let credential = match (&principal, edit.new_credential.as_deref()) {
            (Some(_), Some(raw)) if !raw.trim().is_empty() => Some(Credential::new(raw)?),
            _ => None,
        };

        let mut patch = diff(original, &edit.fields);
        if let (Some(photo), Some(owner)) = (edit.photo.as_ref(), principal.as_ref()) {
            let url = self.upload_photo(owner, photo).await?;
            patch.insert(PHOTO_URL_COLUMN.to_owned(), Value::from(url));
        }

        let relational_applied = !patch.is_empty();
        if relational_applied {
            self.stores
                .profiles()
                .update(table, &key, &patch)
                .await
                .map_err(|err| {
                    error!(%table, key = %key.value, store_error = %err, "record update failed");
                    SyncError::Update(err.into())
                })?;
        }

        let mut merged = original.fields().clone();
        merged.extend(patch.iter().map(|(k, v)| (k.clone(), v.clone())));

        let identity_updated = match principal {
            Some(owner) => {
                let update = PrincipalUpdate {
                    credential,
                    ..stage_contact_changes(original, &edit.fields)
                };
                self.cascade(&owner, &update, &merged, relational_applied)
                    .await?
            }
            None => false,
        };

        info!(%table, key = %key.value, columns = patch.len(), identity_updated, "record saved");
        Ok(SyncOutcome {
            record: EditableRecord::new(table, merged),
            applied: patch,
            identity_updated,
        })
    }

    async fn upload_photo(&self, owner: &PrincipalId, photo: &PhotoUpload) -> Result<String, SyncError> {
        let path = BlobPath::photo_of(owner, photo);
        self.stores
            .blobs()
            .upload(&path, photo, WriteMode::Overwrite)
            .await
            .map_err(|err| {
                error!(principal_id = %owner, %path, store_error = %err, "photo upload failed");
                SyncError::PhotoUpload(err.into())
            })?;
        Ok(self.stores.blobs().public_url(&path))
    }

    async fn cascade(
        &self,
        owner: &PrincipalId,
        update: &PrincipalUpdate,
        merged: &Row,
        relational_applied: bool,
    ) -> Result<bool, SyncError> {
        if update.is_empty() {
            return Ok(false);
        }
        self.stores
            .identity()
            .update_principal(owner, update)
            .await
            .map_err(|err| {
                error!(principal_id = %owner, relational_applied, store_error = %err, "identity cascade failed");
                SyncError::IdentityCascade {
                    source: err.into(),
                    record: merged.clone(),
                    relational_applied,
                }
            })?;
        Ok(true)
    }
}

fn is_editable(key: &str, value: &Value) -> bool {
    !is_read_only(key) && !matches!(value, Value::Object(_) | Value::Array(_))
}

/// Editable columns whose edited value differs from the original.
fn diff(original: &EditableRecord, edited: &Row) -> Row {
    edited
        .iter()
        .filter(|(key, value)| is_editable(key, value))
        .filter(|(key, value)| original.fields().get(key.as_str()) != Some(*value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Email and phone changes for the identity store.
///
/// A blank email is never staged; the identity store requires one.
fn stage_contact_changes(original: &EditableRecord, edited: &Row) -> PrincipalUpdate {
    let changed = |column: &str| {
        edited
            .get(column)
            .map(as_text)
            .filter(|value| original.text(column).unwrap_or_default() != *value)
    };
    PrincipalUpdate {
        email: changed(ProfileField::Email.column()).filter(|email| !email.trim().is_empty()),
        phone: changed(ProfileField::Phone.column()),
        ..PrincipalUpdate::default()
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
