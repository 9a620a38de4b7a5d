//! battery-monitor server entry point.
//!
//! Loads configuration, opens the store, optionally seeds sample data and
//! serves the REST and WebSocket endpoints until Ctrl-C.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use battery_monitor::api;
use battery_monitor::app_state::AppState;
use battery_monitor::config::{LogFormat, MonitorConfig};
use battery_monitor::domain::EventBus;
use battery_monitor::persistence::{PostgresStore, Store};
use battery_monitor::seed::load_sample_data;
use battery_monitor::service::{BatteryService, DashboardService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = MonitorConfig::from_env().context("invalid LISTEN_ADDR")?;
    init_tracing(config.log_format);
    tracing::info!(addr = %config.listen_addr, "starting battery-monitor");

    let store = if config.persistence_enabled {
        let pg = PostgresStore::connect(&config)
            .await
            .context("failed to open PostgreSQL store")?;
        Store::Postgres(pg)
    } else {
        tracing::warn!("persistence disabled, data lives in memory only");
        Store::memory()
    };
    let store = Arc::new(store);
    tracing::info!(backend = store.backend(), "store ready");

    let event_bus = EventBus::new(config.event_bus_capacity);
    let battery_service = Arc::new(BatteryService::new(
        Arc::clone(&store),
        event_bus.clone(),
        config.thresholds(),
        config.low_health_threshold,
    ));
    let dashboard_service = Arc::new(DashboardService::new(store));

    if config.seed_sample_data {
        load_sample_data(&battery_service)
            .await
            .context("failed to load sample data")?;
    }

    let app_state = AppState {
        battery_service,
        dashboard_service,
        event_bus,
    };
    let app = api::build_app(app_state, &config);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
