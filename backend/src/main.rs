//! Favourites service entry point: loads settings, migrates the database and
//! serves the REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use favorites::inbound::http::health::HealthState;
use favorites::outbound::persistence::{DbPool, run_pending_migrations};
use favorites::settings::AppSettings;
use ortho_config::OrthoConfig;

use server::{ServerConfig, create_server};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    let database_url = settings.database_url()?;

    run_pending_migrations(database_url)
        .await
        .wrap_err("failed to apply database migrations")?;
    let pool = DbPool::connect(database_url, settings.pool_settings()?)
        .await
        .wrap_err("failed to build database pool")?;

    let config = ServerConfig::from_settings(&settings, pool)?;
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(
        actix_web_prom::PrometheusMetricsBuilder::new("favorites")
            .endpoint("/metrics")
            .build()
            .map_err(|err| eyre!("failed to configure Prometheus metrics: {err}"))?,
    );

    let bind_addr = config.bind_addr();
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("failed to start HTTP server")?;
    info!(%bind_addr, "favourites service listening");

    server.await.wrap_err("HTTP server failed")
}
