//! In-memory stand-ins for the three hosted stores.
//!
//! Behaviour mirrors the hosted adapters closely enough for end-to-end
//! flows: duplicate emails and existing objects are refused, keyed
//! updates patch every matching row, and selections honour filters, order
//! and limit.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use vakaalat_console::domain::ports::{
    BlobPath, BlobStore, BlobStoreError, Filter, IdentityStore, IdentityStoreError, MatchKey,
    ProfileStore, ProfileStoreError, Row, SelectQuery, StoreContext, WriteMode,
};
use vakaalat_console::domain::{NewPrincipal, PhotoUpload, PrincipalId, PrincipalUpdate, Table};

/// A stored principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPrincipal {
    pub email: String,
    pub credential: String,
    pub phone: Option<String>,
    pub ban_hours: Option<u32>,
}

#[derive(Default)]
struct State {
    principals: BTreeMap<String, StoredPrincipal>,
    tables: HashMap<Table, Vec<Row>>,
    objects: BTreeMap<String, Vec<u8>>,
    issued: u32,
    principal_updates: Vec<PrincipalUpdate>,
    refuse_inserts_into: Option<Table>,
}

/// All three stores over shared in-memory state.
#[derive(Default)]
pub struct InMemoryBackend {
    state: Mutex<State>,
}

impl InMemoryBackend {
    /// Empty stores.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Store context whose three ports all point at `self`.
    pub fn context(self: &Arc<Self>) -> StoreContext {
        StoreContext::new(self.clone(), self.clone(), self.clone())
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Refuse every insert into `table` from now on.
    pub fn refuse_inserts_into(&self, table: Table) {
        self.lock().refuse_inserts_into = Some(table);
    }

    /// Seed `row` into `table`.
    pub fn seed(&self, table: Table, row: Value) {
        if let Value::Object(row) = row {
            self.lock().tables.entry(table).or_default().push(row);
        }
    }

    /// Principal with `id`, if any.
    pub fn principal(&self, id: &str) -> Option<StoredPrincipal> {
        self.lock().principals.get(id).cloned()
    }

    /// Number of principals.
    pub fn principal_count(&self) -> usize {
        self.lock().principals.len()
    }

    /// Snapshot of `table`.
    pub fn rows(&self, table: Table) -> Vec<Row> {
        self.lock().tables.get(&table).cloned().unwrap_or_default()
    }

    /// Every principal update received, oldest first.
    pub fn principal_updates(&self) -> Vec<PrincipalUpdate> {
        self.lock().principal_updates.clone()
    }

    /// Stored object paths.
    pub fn object_paths(&self) -> Vec<String> {
        self.lock().objects.keys().cloned().collect()
    }
}

fn matches(row: &Row, filter: &Filter) -> bool {
    match filter {
        Filter::Eq { column, value } => row.get(column) == Some(value),
        Filter::In { column, values } => row.get(column).is_some_and(|v| values.contains(v)),
    }
}

fn matches_key(row: &Row, key: &MatchKey) -> bool {
    row.get(&key.column) == Some(&key.value)
}

fn sort_key(row: &Row, column: &str) -> String {
    match row.get(column) {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

#[async_trait]
impl IdentityStore for InMemoryBackend {
    async fn create_principal(
        &self,
        principal: &NewPrincipal,
    ) -> Result<PrincipalId, IdentityStoreError> {
        let mut state = self.lock();
        if state.principals.values().any(|p| p.email == principal.email) {
            return Err(IdentityStoreError::rejected(
                "A user with this email address has already been registered",
            ));
        }
        state.issued += 1;
        let id = format!("00000000-0000-4000-8000-{:012}", state.issued);
        state.principals.insert(
            id.clone(),
            StoredPrincipal {
                email: principal.email.clone(),
                credential: principal.credential.expose().to_owned(),
                phone: None,
                ban_hours: None,
            },
        );
        PrincipalId::new(id).map_err(|err| IdentityStoreError::decode(err.to_string()))
    }

    async fn update_principal(
        &self,
        id: &PrincipalId,
        update: &PrincipalUpdate,
    ) -> Result<(), IdentityStoreError> {
        let mut state = self.lock();
        state.principal_updates.push(update.clone());
        let principal = state
            .principals
            .get_mut(id.as_str())
            .ok_or_else(|| IdentityStoreError::rejected("User not found"))?;
        if let Some(credential) = &update.credential {
            principal.credential = credential.expose().to_owned();
        }
        if let Some(email) = &update.email {
            principal.email = email.clone();
        }
        if let Some(phone) = &update.phone {
            principal.phone = Some(phone.clone());
        }
        if let Some(hours) = update.ban_duration_hours {
            principal.ban_hours = Some(hours);
        }
        Ok(())
    }

    async fn delete_principal(&self, id: &PrincipalId) -> Result<(), IdentityStoreError> {
        self.lock()
            .principals
            .remove(id.as_str())
            .map(|_| ())
            .ok_or_else(|| IdentityStoreError::rejected("User not found"))
    }

    async fn list_principals(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PrincipalId>, IdentityStoreError> {
        let skip = page.saturating_sub(1).saturating_mul(per_page) as usize;
        self.lock()
            .principals
            .keys()
            .skip(skip)
            .take(per_page as usize)
            .map(|id| {
                PrincipalId::new(id.clone()).map_err(|err| IdentityStoreError::decode(err.to_string()))
            })
            .collect()
    }
}

#[async_trait]
impl ProfileStore for InMemoryBackend {
    async fn insert(&self, table: Table, rows: &[Row]) -> Result<(), ProfileStoreError> {
        let mut state = self.lock();
        if state.refuse_inserts_into == Some(table) {
            return Err(ProfileStoreError::rejected(format!(
                "permission denied for table {table}"
            )));
        }
        state.tables.entry(table).or_default().extend_from_slice(rows);
        Ok(())
    }

    async fn update(
        &self,
        table: Table,
        key: &MatchKey,
        patch: &Row,
    ) -> Result<(), ProfileStoreError> {
        let mut state = self.lock();
        for row in state.tables.entry(table).or_default().iter_mut() {
            if matches_key(row, key) {
                row.extend(patch.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }
        Ok(())
    }

    async fn delete(&self, table: Table, key: &MatchKey) -> Result<(), ProfileStoreError> {
        self.lock()
            .tables
            .entry(table)
            .or_default()
            .retain(|row| !matches_key(row, key));
        Ok(())
    }

    async fn select(&self, table: Table, query: &SelectQuery) -> Result<Vec<Row>, ProfileStoreError> {
        let state = self.lock();
        let mut rows: Vec<Row> = state
            .tables
            .get(&table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.filters.iter().all(|filter| matches(row, filter)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        if let Some(order) = &query.order {
            rows.sort_by_key(|row| sort_key(row, &order.column));
            if !order.ascending {
                rows.reverse();
            }
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit as usize);
        }
        Ok(rows)
    }
}

#[async_trait]
impl BlobStore for InMemoryBackend {
    async fn upload(
        &self,
        path: &BlobPath,
        photo: &PhotoUpload,
        mode: WriteMode,
    ) -> Result<(), BlobStoreError> {
        let mut state = self.lock();
        if mode == WriteMode::CreateOnly && state.objects.contains_key(path.as_str()) {
            return Err(BlobStoreError::rejected("The resource already exists"));
        }
        state
            .objects
            .insert(path.as_str().to_owned(), photo.bytes().to_vec());
        Ok(())
    }

    fn public_url(&self, path: &BlobPath) -> String {
        format!("https://store.test/storage/v1/object/public/Photos/{path}")
    }
}
