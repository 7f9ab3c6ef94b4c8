//! Tests for the console bootstrap, covering readiness signalling and
//! route wiring.

use std::sync::Arc;

use actix_web::web;
use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

use super::server::{AppDependencies, create_server};
use vakaalat_console::domain::ports::{
    BlobPath, BlobStore, BlobStoreError, IdentityStore, IdentityStoreError, MatchKey, ProfileStore,
    ProfileStoreError, Row, SelectQuery, StoreContext, WriteMode,
};
use vakaalat_console::domain::{NewPrincipal, PhotoUpload, PrincipalId, PrincipalUpdate, Table};
use vakaalat_console::inbound::http::auth::OperatorKey;
use vakaalat_console::inbound::http::health::HealthState;
use vakaalat_console::inbound::http::state::HttpState;

/// Stores that fail every call; bootstrap tests never reach them.
struct Offline;

#[async_trait]
impl IdentityStore for Offline {
    async fn create_principal(&self, _: &NewPrincipal) -> Result<PrincipalId, IdentityStoreError> {
        Err(IdentityStoreError::transport("offline"))
    }

    async fn update_principal(
        &self,
        _: &PrincipalId,
        _: &PrincipalUpdate,
    ) -> Result<(), IdentityStoreError> {
        Err(IdentityStoreError::transport("offline"))
    }

    async fn delete_principal(&self, _: &PrincipalId) -> Result<(), IdentityStoreError> {
        Err(IdentityStoreError::transport("offline"))
    }

    async fn list_principals(&self, _: u32, _: u32) -> Result<Vec<PrincipalId>, IdentityStoreError> {
        Err(IdentityStoreError::transport("offline"))
    }
}

#[async_trait]
impl ProfileStore for Offline {
    async fn insert(&self, _: Table, _: &[Row]) -> Result<(), ProfileStoreError> {
        Err(ProfileStoreError::transport("offline"))
    }

    async fn update(&self, _: Table, _: &MatchKey, _: &Row) -> Result<(), ProfileStoreError> {
        Err(ProfileStoreError::transport("offline"))
    }

    async fn delete(&self, _: Table, _: &MatchKey) -> Result<(), ProfileStoreError> {
        Err(ProfileStoreError::transport("offline"))
    }

    async fn select(&self, _: Table, _: &SelectQuery) -> Result<Vec<Row>, ProfileStoreError> {
        Err(ProfileStoreError::transport("offline"))
    }
}

#[async_trait]
impl BlobStore for Offline {
    async fn upload(
        &self,
        _: &BlobPath,
        _: &PhotoUpload,
        _: WriteMode,
    ) -> Result<(), BlobStoreError> {
        Err(BlobStoreError::transport("offline"))
    }

    fn public_url(&self, path: &BlobPath) -> String {
        format!("offline://{path}")
    }
}

#[fixture]
fn deps() -> AppDependencies {
    let stores = StoreContext::new(Arc::new(Offline), Arc::new(Offline), Arc::new(Offline));
    AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: web::Data::new(HttpState::new(Arc::new(stores), Arc::new(DefaultClock))),
        operator_key: web::Data::new(OperatorKey::from_secret("bootstrap-secret")),
    }
}

#[rstest]
#[actix_rt::test]
async fn create_server_marks_ready(deps: AppDependencies) {
    let health_state = deps.health_state.clone();
    assert!(!health_state.is_ready(), "state should start unready");

    let _server = create_server(deps, "127.0.0.1:0".parse().expect("literal address"))
        .expect("server should bind an ephemeral port");

    assert!(
        health_state.is_ready(),
        "server creation should mark readiness"
    );
}
