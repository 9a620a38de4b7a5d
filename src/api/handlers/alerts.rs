//! Alert handlers: CRUD, resolve and the unresolved listing.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{AlertListQuery, AlertListResponse, PaginationParams};
use crate::app_state::AppState;
use crate::domain::{AlertChanges, AlertId, BatteryAlert, NewAlert};
use crate::error::{ErrorResponse, MonitorError};

/// `GET /api/alerts`: List alerts.
///
/// # Errors
///
/// Returns [`MonitorError`] on invalid filters or store failures.
#[utoipa::path(
    get,
    path = "/api/alerts",
    tag = "Alerts",
    summary = "List alerts",
    description = "Returns a paginated, filterable list of alerts. Default ordering is `-created_at`; `alert_level` orders by severity.",
    params(PaginationParams, AlertListQuery),
    responses(
        (status = 200, description = "Paginated alert list", body = AlertListResponse),
        (status = 400, description = "Invalid filter value", body = ErrorResponse),
    )
)]
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
    Query(query): Query<AlertListQuery>,
) -> Result<impl IntoResponse, MonitorError> {
    let filter = query.into_filter()?;
    let alerts = state.battery_service.alerts(&filter).await?;
    let (data, pagination) = page.paginate(alerts);
    Ok(Json(AlertListResponse { data, pagination }))
}

/// `POST /api/alerts`: Create an alert by hand.
///
/// # Errors
///
/// Returns [`MonitorError`] on an unknown battery or an empty message.
#[utoipa::path(
    post,
    path = "/api/alerts",
    tag = "Alerts",
    summary = "Create an alert",
    request_body = NewAlert,
    responses(
        (status = 201, description = "Alert created", body = BatteryAlert),
        (status = 400, description = "Invalid field or unknown battery", body = ErrorResponse),
    )
)]
pub async fn create_alert(
    State(state): State<AppState>,
    Json(new): Json<NewAlert>,
) -> Result<impl IntoResponse, MonitorError> {
    let alert = state.battery_service.create_alert(new).await?;
    Ok((StatusCode::CREATED, Json(alert)))
}

/// `GET /api/alerts/{id}`
///
/// # Errors
///
/// Returns [`MonitorError::AlertNotFound`] if it does not exist.
#[utoipa::path(
    get,
    path = "/api/alerts/{id}",
    tag = "Alerts",
    summary = "Get an alert",
    params(("id" = i64, Path, description = "Alert id")),
    responses(
        (status = 200, description = "Alert", body = BatteryAlert),
        (status = 404, description = "Alert not found", body = ErrorResponse),
    )
)]
pub async fn get_alert(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, MonitorError> {
    Ok(Json(state.battery_service.alert(AlertId::new(id)).await?))
}

/// `PUT /api/alerts/{id}`
///
/// # Errors
///
/// Returns [`MonitorError`] on a missing alert, an unknown battery or an
/// empty message.
#[utoipa::path(
    put,
    path = "/api/alerts/{id}",
    tag = "Alerts",
    summary = "Replace an alert",
    params(("id" = i64, Path, description = "Alert id")),
    request_body = NewAlert,
    responses(
        (status = 200, description = "Updated alert", body = BatteryAlert),
        (status = 400, description = "Invalid field", body = ErrorResponse),
        (status = 404, description = "Alert not found", body = ErrorResponse),
    )
)]
pub async fn replace_alert(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(new): Json<NewAlert>,
) -> Result<impl IntoResponse, MonitorError> {
    let alert = state
        .battery_service
        .update_alert(AlertId::new(id), AlertChanges::from(new))
        .await?;
    Ok(Json(alert))
}

/// `PATCH /api/alerts/{id}`
///
/// # Errors
///
/// Returns [`MonitorError`] on a missing alert, an unknown battery or an
/// empty message.
#[utoipa::path(
    patch,
    path = "/api/alerts/{id}",
    tag = "Alerts",
    summary = "Partially update an alert",
    params(("id" = i64, Path, description = "Alert id")),
    request_body = AlertChanges,
    responses(
        (status = 200, description = "Updated alert", body = BatteryAlert),
        (status = 400, description = "Invalid field", body = ErrorResponse),
        (status = 404, description = "Alert not found", body = ErrorResponse),
    )
)]
pub async fn patch_alert(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(changes): Json<AlertChanges>,
) -> Result<impl IntoResponse, MonitorError> {
    let alert = state
        .battery_service
        .update_alert(AlertId::new(id), changes)
        .await?;
    Ok(Json(alert))
}

/// `DELETE /api/alerts/{id}`
///
/// # Errors
///
/// Returns [`MonitorError::AlertNotFound`] if it does not exist.
#[utoipa::path(
    delete,
    path = "/api/alerts/{id}",
    tag = "Alerts",
    summary = "Delete an alert",
    params(("id" = i64, Path, description = "Alert id")),
    responses(
        (status = 204, description = "Alert deleted"),
        (status = 404, description = "Alert not found", body = ErrorResponse),
    )
)]
pub async fn delete_alert(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, MonitorError> {
    state.battery_service.delete_alert(AlertId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/alerts/{id}/resolve`: Mark an alert resolved.
///
/// Resolving an already resolved alert keeps its original `resolved_at`.
///
/// # Errors
///
/// Returns [`MonitorError::AlertNotFound`] if it does not exist.
#[utoipa::path(
    post,
    path = "/api/alerts/{id}/resolve",
    tag = "Alerts",
    summary = "Resolve an alert",
    params(("id" = i64, Path, description = "Alert id")),
    responses(
        (status = 200, description = "Resolved alert", body = BatteryAlert),
        (status = 404, description = "Alert not found", body = ErrorResponse),
    )
)]
pub async fn resolve_alert(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, MonitorError> {
    Ok(Json(state.battery_service.resolve_alert(AlertId::new(id)).await?))
}

/// `GET /api/alerts/unresolved`
///
/// # Errors
///
/// Returns [`MonitorError`] on store failures.
#[utoipa::path(
    get,
    path = "/api/alerts/unresolved",
    tag = "Alerts",
    summary = "Unresolved alerts",
    description = "Every unresolved alert, newest first.",
    responses(
        (status = 200, description = "Unresolved alerts", body = Vec<BatteryAlert>),
    )
)]
pub async fn unresolved_alerts(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, MonitorError> {
    Ok(Json(state.battery_service.unresolved_alerts().await?))
}

/// Alert routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/alerts", get(list_alerts).post(create_alert))
        .route("/alerts/unresolved", get(unresolved_alerts))
        .route(
            "/alerts/{id}",
            get(get_alert)
                .put(replace_alert)
                .patch(patch_alert)
                .delete(delete_alert),
        )
        .route("/alerts/{id}/resolve", post(resolve_alert))
}
