//! Console entry-point: loads settings, proves the operator secret and
//! serves the REST API.

mod server;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Context, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{AppDependencies, ConsoleSettings, create_server};
use vakaalat_console::domain::verify_operator_secret;
use vakaalat_console::inbound::http::auth::OperatorKey;
use vakaalat_console::inbound::http::health::HealthState;
use vakaalat_console::inbound::http::state::HttpState;
use vakaalat_console::outbound::hosted::HostedBackend;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ConsoleSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let hosted = settings.hosted()?;
    let operator_key = OperatorKey::from_secret(hosted.service_key.as_str());
    let bind_addr = settings.bind_addr()?;

    let stores = HostedBackend::connect(hosted).wrap_err("failed to build HTTP client")?;
    verify_operator_secret(&stores)
        .await
        .map_err(|err| eyre!("{err}"))
        .wrap_err("operator secret rejected by the identity store")?;
    info!(
        key_fingerprint = %operator_key.fingerprint(),
        orphan_policy = ?settings.orphan_policy(),
        %bind_addr,
        "operator secret verified"
    );

    let http_state = HttpState::new(Arc::new(stores), Arc::new(DefaultClock))
        .with_orphan_policy(settings.orphan_policy());
    let deps = AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: web::Data::new(http_state),
        operator_key: web::Data::new(operator_key),
    };
    create_server(deps, bind_addr)?.await?;
    Ok(())
}
