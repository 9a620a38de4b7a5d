//! Read-only dashboard aggregation handlers.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::TrendQuery;
use crate::app_state::AppState;
use crate::error::{ErrorResponse, MonitorError};
use crate::service::dashboard_service::{
    AlertSummary, BatteryDetails, ChartData, DashboardExport, DashboardStats, Trend,
};

/// `GET /api/dashboard/stats`
///
/// # Errors
///
/// Returns [`MonitorError`] on store failures.
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    tag = "Dashboard",
    summary = "Fleet statistics",
    description = "Battery, health, charge, temperature, alert and device counters. Averages are rounded to two decimals.",
    responses(
        (status = 200, description = "Statistics", body = DashboardStats),
    )
)]
pub async fn stats(State(state): State<AppState>) -> Result<impl IntoResponse, MonitorError> {
    Ok(Json(state.dashboard_service.stats().await?))
}

/// `GET /api/dashboard/chart-data`
///
/// # Errors
///
/// Returns [`MonitorError`] on store failures.
#[utoipa::path(
    get,
    path = "/api/dashboard/chart-data",
    tag = "Dashboard",
    summary = "Chart distributions",
    description = "Status and type distributions plus health, charge and cycle range buckets.",
    responses(
        (status = 200, description = "Chart data", body = ChartData),
    )
)]
pub async fn chart_data(State(state): State<AppState>) -> Result<impl IntoResponse, MonitorError> {
    Ok(Json(state.dashboard_service.chart_data().await?))
}

/// `GET /api/dashboard/battery-details`
///
/// # Errors
///
/// Returns [`MonitorError`] on store failures.
#[utoipa::path(
    get,
    path = "/api/dashboard/battery-details",
    tag = "Dashboard",
    summary = "Battery summaries",
    responses(
        (status = 200, description = "Every battery in summary form", body = BatteryDetails),
    )
)]
pub async fn battery_details(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, MonitorError> {
    Ok(Json(state.dashboard_service.battery_details().await?))
}

/// `GET /api/dashboard/alerts`
///
/// # Errors
///
/// Returns [`MonitorError`] on store failures.
#[utoipa::path(
    get,
    path = "/api/dashboard/alerts",
    tag = "Dashboard",
    summary = "Alert summary",
    description = "Counts by type and level, unresolved counts by level, and the ten most recent unresolved alerts.",
    responses(
        (status = 200, description = "Alert summary", body = AlertSummary),
    )
)]
pub async fn alert_summary(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, MonitorError> {
    Ok(Json(state.dashboard_service.alert_summary().await?))
}

/// `GET /api/dashboard/trend`
///
/// # Errors
///
/// Returns [`MonitorError::InvalidField`] when `battery_id` is not a
/// number.
#[utoipa::path(
    get,
    path = "/api/dashboard/trend",
    tag = "Dashboard",
    summary = "Reading trend",
    description = "The 100 most recent readings in chronological order as parallel arrays. An unknown battery yields empty arrays.",
    params(TrendQuery),
    responses(
        (status = 200, description = "Trend series", body = Trend),
        (status = 400, description = "Invalid battery id", body = ErrorResponse),
    )
)]
pub async fn trend(
    State(state): State<AppState>,
    Query(query): Query<TrendQuery>,
) -> Result<impl IntoResponse, MonitorError> {
    let battery = query.battery_id()?;
    Ok(Json(state.dashboard_service.trend(battery).await?))
}

/// `GET /api/dashboard/export`
///
/// # Errors
///
/// Returns [`MonitorError`] on store failures.
#[utoipa::path(
    get,
    path = "/api/dashboard/export",
    tag = "Dashboard",
    summary = "Full dashboard export",
    responses(
        (status = 200, description = "Stats, charts, batteries and alerts in one document", body = DashboardExport),
    )
)]
pub async fn export(State(state): State<AppState>) -> Result<impl IntoResponse, MonitorError> {
    Ok(Json(state.dashboard_service.export().await?))
}

/// Dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/stats", get(stats))
        .route("/dashboard/chart-data", get(chart_data))
        .route("/dashboard/battery-details", get(battery_details))
        .route("/dashboard/alerts", get(alert_summary))
        .route("/dashboard/trend", get(trend))
        .route("/dashboard/export", get(export))
}
