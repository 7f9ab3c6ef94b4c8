//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::{MockBlobStore, MockIdentityStore, MockProfileStore, StoreContext};
use crate::inbound::http::auth::OperatorKey;
use crate::inbound::http::error::json_error_handler;
use crate::inbound::http::state::HttpState;

/// Secret the test app accepts.
pub const TEST_SECRET: &str = "operator-secret";

/// Authorization header value carrying [`TEST_SECRET`].
pub const BEARER: (&str, &str) = ("Authorization", "Bearer operator-secret");

/// Clock frozen at 2025-01-15T09:30:00Z.
pub struct FrozenClock;

impl Clock for FrozenClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0)
            .single()
            .unwrap_or_default()
    }
}

/// Mocked ports behind the test app. Unset expectations fail the test.
#[derive(Default)]
pub struct MockStores {
    pub identity: MockIdentityStore,
    pub profiles: MockProfileStore,
    pub blobs: MockBlobStore,
}

/// Build the API scope over `stores`, guarded by [`TEST_SECRET`].
pub fn test_app(
    stores: MockStores,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let context = StoreContext::new(
        Arc::new(stores.identity),
        Arc::new(stores.profiles),
        Arc::new(stores.blobs),
    );
    let state = HttpState::new(Arc::new(context), Arc::new(FrozenClock));
    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::Data::new(OperatorKey::from_secret(TEST_SECRET)))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(web::scope("/api/v1").configure(super::configure))
}
