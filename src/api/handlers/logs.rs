//! Read-only log handlers. Entries are only written by status updates.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{LogListQuery, LogListResponse, PaginationParams};
use crate::app_state::AppState;
use crate::domain::{BatteryLog, LogId};
use crate::error::{ErrorResponse, MonitorError};

/// `GET /api/logs`: List log entries.
///
/// # Errors
///
/// Returns [`MonitorError`] on invalid filters or store failures.
#[utoipa::path(
    get,
    path = "/api/logs",
    tag = "Logs",
    summary = "List log entries",
    description = "Returns a paginated list of readings. Default ordering is `-logged_at`.",
    params(PaginationParams, LogListQuery),
    responses(
        (status = 200, description = "Paginated log list", body = LogListResponse),
        (status = 400, description = "Invalid filter value", body = ErrorResponse),
    )
)]
pub async fn list_logs(
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
    Query(query): Query<LogListQuery>,
) -> Result<impl IntoResponse, MonitorError> {
    let filter = query.into_filter()?;
    let logs = state.battery_service.logs(&filter).await?;
    let (data, pagination) = page.paginate(logs);
    Ok(Json(LogListResponse { data, pagination }))
}

/// `GET /api/logs/{id}`
///
/// # Errors
///
/// Returns [`MonitorError::LogNotFound`] if it does not exist.
#[utoipa::path(
    get,
    path = "/api/logs/{id}",
    tag = "Logs",
    summary = "Get a log entry",
    params(("id" = i64, Path, description = "Log entry id")),
    responses(
        (status = 200, description = "Log entry", body = BatteryLog),
        (status = 404, description = "Log entry not found", body = ErrorResponse),
    )
)]
pub async fn get_log(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, MonitorError> {
    Ok(Json(state.battery_service.log(LogId::new(id)).await?))
}

/// Log routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/logs", get(list_logs))
        .route("/logs/{id}", get(get_log))
}
