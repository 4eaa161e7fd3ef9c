//! Backend entry-point: loads settings, wires adapters, and serves HTTP.

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use benefits_backend::inbound::http::health::HealthState;
use benefits_backend::server::{ServerConfig, build_http_state, create_server};
use benefits_backend::settings::BenefitsSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = BenefitsSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?
        .resolve()
        .map_err(std::io::Error::other)?;
    info!(
        upstream = %settings.upstream_base_url,
        timeout = ?settings.upstream_timeout,
        bind_addr = %settings.bind_addr,
        cors_origin = settings.cors_origin.as_str(),
        "settings resolved"
    );

    let http_state = build_http_state(settings.upstream_base_url, settings.upstream_timeout)
        .map_err(|e| std::io::Error::other(format!("failed to build upstream client: {e}")))?;
    let config = ServerConfig::new(settings.bind_addr, settings.cors_origin, http_state);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
