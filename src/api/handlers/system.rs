//! System endpoints: welcome document and health check.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: &'static str,
    timestamp: String,
    version: &'static str,
    storage: &'static str,
}

/// Where each resource lives.
#[derive(Debug, Serialize, ToSchema)]
pub struct EndpointIndex {
    batteries: &'static str,
    alerts: &'static str,
    logs: &'static str,
    devices: &'static str,
    dashboard_stats: &'static str,
    chart_data: &'static str,
    battery_details: &'static str,
    alerts_summary: &'static str,
    battery_trends: &'static str,
    dashboard_export: &'static str,
    dashboard_ws: &'static str,
}

/// Root document.
#[derive(Debug, Serialize, ToSchema)]
pub struct WelcomeResponse {
    message: &'static str,
    version: &'static str,
    api_endpoints: EndpointIndex,
    features: Vec<&'static str>,
}

/// `GET /`: Entry point listing the API.
#[utoipa::path(
    get,
    path = "/",
    tag = "System",
    summary = "Welcome document",
    responses(
        (status = 200, description = "Endpoint index", body = WelcomeResponse),
    )
)]
pub async fn welcome_handler() -> impl IntoResponse {
    Json(WelcomeResponse {
        message: "Welcome to the Battery Monitor",
        version: env!("CARGO_PKG_VERSION"),
        api_endpoints: EndpointIndex {
            batteries: "/api/batteries",
            alerts: "/api/alerts",
            logs: "/api/logs",
            devices: "/api/devices",
            dashboard_stats: "/api/dashboard/stats",
            chart_data: "/api/dashboard/chart-data",
            battery_details: "/api/dashboard/battery-details",
            alerts_summary: "/api/dashboard/alerts",
            battery_trends: "/api/dashboard/trend",
            dashboard_export: "/api/dashboard/export",
            dashboard_ws: "/ws/dashboard",
        },
        features: vec![
            "Real-time battery monitoring",
            "Threshold alerting",
            "Historical reading log",
            "Device management",
            "Dashboard aggregations",
        ],
    })
}

/// `GET /health`: Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, storage backend and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy",
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION"),
            storage: state.battery_service.store().backend(),
        }),
    )
}

/// System routes mounted at the root level (not under /api).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(welcome_handler))
        .route("/health", get(health_handler))
}
