//! Shared helpers for console integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! the in-memory stores and the app builder live here rather than being
//! copied into each test file.

pub mod in_memory;

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use mockable::DefaultClock;

use vakaalat_console::Trace;
use vakaalat_console::domain::OrphanPolicy;
use vakaalat_console::inbound::http::auth::OperatorKey;
use vakaalat_console::inbound::http::configure;
use vakaalat_console::inbound::http::error::json_error_handler;
use vakaalat_console::inbound::http::state::HttpState;

pub use in_memory::InMemoryBackend;

/// Secret the console under test was started with.
pub const SECRET: &str = "integration-service-key";

/// `Authorization` header carrying [`SECRET`].
pub fn bearer() -> (&'static str, String) {
    ("Authorization", format!("Bearer {SECRET}"))
}

/// Build the console app over `backend` as the server wires it.
pub fn console_app(
    backend: &Arc<InMemoryBackend>,
    orphan_policy: OrphanPolicy,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let state = HttpState::new(Arc::new(backend.context()), Arc::new(DefaultClock))
        .with_orphan_policy(orphan_policy);
    App::new()
        .app_data(web::Data::new(state))
        .app_data(web::Data::new(OperatorKey::from_secret(SECRET)))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(Trace)
        .service(web::scope("/api/v1").configure(configure))
}
