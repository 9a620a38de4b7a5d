//! Battery handlers: CRUD, status updates, health report and the
//! low-health / critical listings.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{BatteryListQuery, BatteryListResponse, PaginationParams, ThresholdQuery};
use crate::app_state::AppState;
use crate::domain::{Battery, BatteryChanges, BatteryId, NewBattery, StatusReadings};
use crate::error::{ErrorResponse, MonitorError};
use crate::service::HealthReport;

/// `GET /api/batteries`: List batteries.
///
/// # Errors
///
/// Returns [`MonitorError`] on invalid filters or store failures.
#[utoipa::path(
    get,
    path = "/api/batteries",
    tag = "Batteries",
    summary = "List batteries",
    description = "Returns a paginated, filterable list of batteries. Default ordering is `-last_updated`.",
    params(PaginationParams, BatteryListQuery),
    responses(
        (status = 200, description = "Paginated battery list", body = BatteryListResponse),
        (status = 400, description = "Invalid filter value", body = ErrorResponse),
    )
)]
pub async fn list_batteries(
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
    Query(query): Query<BatteryListQuery>,
) -> Result<impl IntoResponse, MonitorError> {
    let filter = query.into_filter()?;
    let batteries = state.battery_service.batteries(&filter).await?;
    let (data, pagination) = page.paginate(batteries);
    Ok(Json(BatteryListResponse { data, pagination }))
}

/// `POST /api/batteries`: Register a battery.
///
/// # Errors
///
/// Returns [`MonitorError::InvalidField`] on out-of-range values and
/// [`MonitorError::Conflict`] on a duplicate serial number.
#[utoipa::path(
    post,
    path = "/api/batteries",
    tag = "Batteries",
    summary = "Create a battery",
    request_body = NewBattery,
    responses(
        (status = 201, description = "Battery created", body = Battery),
        (status = 400, description = "Invalid field", body = ErrorResponse),
        (status = 409, description = "Serial number already registered", body = ErrorResponse),
    )
)]
pub async fn create_battery(
    State(state): State<AppState>,
    Json(new): Json<NewBattery>,
) -> Result<impl IntoResponse, MonitorError> {
    let battery = state.battery_service.create_battery(new).await?;
    Ok((StatusCode::CREATED, Json(battery)))
}

/// `GET /api/batteries/{id}`: Get one battery.
///
/// # Errors
///
/// Returns [`MonitorError::BatteryNotFound`] if it does not exist.
#[utoipa::path(
    get,
    path = "/api/batteries/{id}",
    tag = "Batteries",
    summary = "Get a battery",
    params(("id" = i64, Path, description = "Battery id")),
    responses(
        (status = 200, description = "Battery", body = Battery),
        (status = 404, description = "Battery not found", body = ErrorResponse),
    )
)]
pub async fn get_battery(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, MonitorError> {
    let battery = state.battery_service.battery(BatteryId::new(id)).await?;
    Ok(Json(battery))
}

/// `PUT /api/batteries/{id}`: Replace every writable field.
///
/// # Errors
///
/// Returns [`MonitorError`] on a missing battery, invalid values or a
/// serial number clash.
#[utoipa::path(
    put,
    path = "/api/batteries/{id}",
    tag = "Batteries",
    summary = "Replace a battery",
    params(("id" = i64, Path, description = "Battery id")),
    request_body = NewBattery,
    responses(
        (status = 200, description = "Updated battery", body = Battery),
        (status = 400, description = "Invalid field", body = ErrorResponse),
        (status = 404, description = "Battery not found", body = ErrorResponse),
        (status = 409, description = "Serial number already registered", body = ErrorResponse),
    )
)]
pub async fn replace_battery(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(new): Json<NewBattery>,
) -> Result<impl IntoResponse, MonitorError> {
    let battery = state
        .battery_service
        .update_battery(BatteryId::new(id), BatteryChanges::from(new))
        .await?;
    Ok(Json(battery))
}

/// `PATCH /api/batteries/{id}`: Update the given fields.
///
/// # Errors
///
/// Returns [`MonitorError`] on a missing battery, invalid values or a
/// serial number clash.
#[utoipa::path(
    patch,
    path = "/api/batteries/{id}",
    tag = "Batteries",
    summary = "Partially update a battery",
    params(("id" = i64, Path, description = "Battery id")),
    request_body = BatteryChanges,
    responses(
        (status = 200, description = "Updated battery", body = Battery),
        (status = 400, description = "Invalid field", body = ErrorResponse),
        (status = 404, description = "Battery not found", body = ErrorResponse),
        (status = 409, description = "Serial number already registered", body = ErrorResponse),
    )
)]
pub async fn patch_battery(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(changes): Json<BatteryChanges>,
) -> Result<impl IntoResponse, MonitorError> {
    let battery = state
        .battery_service
        .update_battery(BatteryId::new(id), changes)
        .await?;
    Ok(Json(battery))
}

/// `DELETE /api/batteries/{id}`: Remove a battery with its alerts and logs.
///
/// # Errors
///
/// Returns [`MonitorError::BatteryNotFound`] if it does not exist.
#[utoipa::path(
    delete,
    path = "/api/batteries/{id}",
    tag = "Batteries",
    summary = "Delete a battery",
    description = "Deletes the battery, its alerts and log entries, and detaches it from devices.",
    params(("id" = i64, Path, description = "Battery id")),
    responses(
        (status = 204, description = "Battery deleted"),
        (status = 404, description = "Battery not found", body = ErrorResponse),
    )
)]
pub async fn delete_battery(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, MonitorError> {
    state.battery_service.delete_battery(BatteryId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/batteries/{id}/update_status`: Record new readings.
///
/// # Errors
///
/// Returns [`MonitorError`] on a missing battery or invalid readings.
#[utoipa::path(
    post,
    path = "/api/batteries/{id}/update_status",
    tag = "Batteries",
    summary = "Record battery readings",
    description = "Applies the readings, appends a log entry and raises an alert for every threshold the battery now violates.",
    params(("id" = i64, Path, description = "Battery id")),
    request_body = StatusReadings,
    responses(
        (status = 200, description = "Updated battery", body = Battery),
        (status = 400, description = "Invalid reading", body = ErrorResponse),
        (status = 404, description = "Battery not found", body = ErrorResponse),
    )
)]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(readings): Json<StatusReadings>,
) -> Result<impl IntoResponse, MonitorError> {
    let battery = state
        .battery_service
        .update_status(BatteryId::new(id), readings)
        .await?;
    Ok(Json(battery))
}

/// `GET /api/batteries/{id}/health_report`
///
/// # Errors
///
/// Returns [`MonitorError::BatteryNotFound`] if it does not exist.
#[utoipa::path(
    get,
    path = "/api/batteries/{id}/health_report",
    tag = "Batteries",
    summary = "Battery health report",
    description = "The battery, its unresolved alerts, its 100 most recent readings and their average temperature.",
    params(("id" = i64, Path, description = "Battery id")),
    responses(
        (status = 200, description = "Health report", body = HealthReport),
        (status = 404, description = "Battery not found", body = ErrorResponse),
    )
)]
pub async fn health_report(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, MonitorError> {
    let report = state.battery_service.health_report(BatteryId::new(id)).await?;
    Ok(Json(report))
}

/// `GET /api/batteries/low_health_batteries`
///
/// # Errors
///
/// Returns [`MonitorError::InvalidField`] when `threshold` is not a number.
#[utoipa::path(
    get,
    path = "/api/batteries/low_health_batteries",
    tag = "Batteries",
    summary = "Batteries below a health threshold",
    params(ThresholdQuery),
    responses(
        (status = 200, description = "Matching batteries", body = Vec<Battery>),
        (status = 400, description = "Invalid threshold", body = ErrorResponse),
    )
)]
pub async fn low_health_batteries(
    State(state): State<AppState>,
    Query(query): Query<ThresholdQuery>,
) -> Result<impl IntoResponse, MonitorError> {
    let batteries = state.battery_service.low_health(query.threshold()?).await?;
    Ok(Json(batteries))
}

/// `GET /api/batteries/critical_status_batteries`
///
/// # Errors
///
/// Returns [`MonitorError`] on store failures.
#[utoipa::path(
    get,
    path = "/api/batteries/critical_status_batteries",
    tag = "Batteries",
    summary = "Batteries in FAULT status",
    responses(
        (status = 200, description = "Faulty batteries", body = Vec<Battery>),
    )
)]
pub async fn critical_status_batteries(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, MonitorError> {
    let batteries = state.battery_service.critical_status().await?;
    Ok(Json(batteries))
}

/// Battery routes. Static segments win over `{id}` in axum's matcher.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/batteries", get(list_batteries).post(create_battery))
        .route("/batteries/low_health_batteries", get(low_health_batteries))
        .route(
            "/batteries/critical_status_batteries",
            get(critical_status_batteries),
        )
        .route(
            "/batteries/{id}",
            get(get_battery)
                .put(replace_battery)
                .patch(patch_battery)
                .delete(delete_battery),
        )
        .route("/batteries/{id}/update_status", post(update_status))
        .route("/batteries/{id}/health_report", get(health_report))
}
