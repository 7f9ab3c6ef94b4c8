//! Server construction and middleware wiring.

mod config;

pub use config::{ConsoleSettings, SettingsError};

use std::net::SocketAddr;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use vakaalat_console::Trace;
#[cfg(debug_assertions)]
use vakaalat_console::doc::ApiDoc;
use vakaalat_console::inbound::http::auth::OperatorKey;
use vakaalat_console::inbound::http::configure;
use vakaalat_console::inbound::http::error::json_error_handler;
use vakaalat_console::inbound::http::health::{HealthState, live, ready};
use vakaalat_console::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Largest accepted JSON body; inline photos dominate.
const JSON_LIMIT_BYTES: usize = 8 * 1024 * 1024;

/// Everything the server needs beyond its listen address.
#[derive(Clone)]
pub struct AppDependencies {
    pub health_state: web::Data<HealthState>,
    pub http_state: web::Data<HttpState>,
    pub operator_key: web::Data<OperatorKey>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        operator_key,
    } = deps;

    let api = web::scope("/api/v1").configure(configure);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(operator_key)
        .app_data(
            web::JsonConfig::default()
                .limit(JSON_LIMIT_BYTES)
                .error_handler(json_error_handler),
        )
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct the HTTP server and mark it ready.
///
/// Call only after the operator secret has been verified.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(deps: AppDependencies, bind_addr: SocketAddr) -> std::io::Result<Server> {
    let health_state = deps.health_state.clone();
    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(bind_addr)?
        .run();
    health_state.mark_ready();
    Ok(server)
}
