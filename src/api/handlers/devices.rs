//! Device handlers. Every response expands the hosted batteries into
//! `batteries_detail` next to the plain id list.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{DeviceListQuery, DeviceListResponse, PaginationParams};
use crate::app_state::AppState;
use crate::domain::{DeviceChanges, DeviceId, NewDevice};
use crate::error::{ErrorResponse, MonitorError};
use crate::service::{DeviceBatteryStatus, DeviceDetail};

/// `GET /api/devices`: List devices.
///
/// # Errors
///
/// Returns [`MonitorError`] on invalid filters or store failures.
#[utoipa::path(
    get,
    path = "/api/devices",
    tag = "Devices",
    summary = "List devices",
    description = "Returns a paginated list of devices. Default ordering is `device_name`.",
    params(PaginationParams, DeviceListQuery),
    responses(
        (status = 200, description = "Paginated device list", body = DeviceListResponse),
        (status = 400, description = "Invalid filter value", body = ErrorResponse),
    )
)]
pub async fn list_devices(
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
    Query(query): Query<DeviceListQuery>,
) -> Result<impl IntoResponse, MonitorError> {
    let filter = query.into_filter()?;
    let devices = state.battery_service.devices(&filter).await?;
    let (data, pagination) = page.paginate(devices);
    Ok(Json(DeviceListResponse { data, pagination }))
}

/// `POST /api/devices`: Register a device.
///
/// # Errors
///
/// Returns [`MonitorError`] on invalid fields, unknown battery ids or a
/// duplicate serial number.
#[utoipa::path(
    post,
    path = "/api/devices",
    tag = "Devices",
    summary = "Create a device",
    request_body = NewDevice,
    responses(
        (status = 201, description = "Device created", body = DeviceDetail),
        (status = 400, description = "Invalid field or unknown battery", body = ErrorResponse),
        (status = 409, description = "Serial number already registered", body = ErrorResponse),
    )
)]
pub async fn create_device(
    State(state): State<AppState>,
    Json(new): Json<NewDevice>,
) -> Result<impl IntoResponse, MonitorError> {
    let device = state.battery_service.create_device(new).await?;
    Ok((StatusCode::CREATED, Json(device)))
}

/// `GET /api/devices/{id}`
///
/// # Errors
///
/// Returns [`MonitorError::DeviceNotFound`] if it does not exist.
#[utoipa::path(
    get,
    path = "/api/devices/{id}",
    tag = "Devices",
    summary = "Get a device",
    params(("id" = i64, Path, description = "Device id")),
    responses(
        (status = 200, description = "Device", body = DeviceDetail),
        (status = 404, description = "Device not found", body = ErrorResponse),
    )
)]
pub async fn get_device(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, MonitorError> {
    Ok(Json(state.battery_service.device(DeviceId::new(id)).await?))
}

/// `PUT /api/devices/{id}`
///
/// # Errors
///
/// Returns [`MonitorError`] on a missing device, invalid fields, unknown
/// battery ids or a serial number clash.
#[utoipa::path(
    put,
    path = "/api/devices/{id}",
    tag = "Devices",
    summary = "Replace a device",
    params(("id" = i64, Path, description = "Device id")),
    request_body = NewDevice,
    responses(
        (status = 200, description = "Updated device", body = DeviceDetail),
        (status = 400, description = "Invalid field or unknown battery", body = ErrorResponse),
        (status = 404, description = "Device not found", body = ErrorResponse),
        (status = 409, description = "Serial number already registered", body = ErrorResponse),
    )
)]
pub async fn replace_device(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(new): Json<NewDevice>,
) -> Result<impl IntoResponse, MonitorError> {
    let device = state
        .battery_service
        .update_device(DeviceId::new(id), DeviceChanges::from(new))
        .await?;
    Ok(Json(device))
}

/// `PATCH /api/devices/{id}`
///
/// # Errors
///
/// Returns [`MonitorError`] on a missing device, invalid fields, unknown
/// battery ids or a serial number clash.
#[utoipa::path(
    patch,
    path = "/api/devices/{id}",
    tag = "Devices",
    summary = "Partially update a device",
    params(("id" = i64, Path, description = "Device id")),
    request_body = DeviceChanges,
    responses(
        (status = 200, description = "Updated device", body = DeviceDetail),
        (status = 400, description = "Invalid field or unknown battery", body = ErrorResponse),
        (status = 404, description = "Device not found", body = ErrorResponse),
        (status = 409, description = "Serial number already registered", body = ErrorResponse),
    )
)]
pub async fn patch_device(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(changes): Json<DeviceChanges>,
) -> Result<impl IntoResponse, MonitorError> {
    let device = state
        .battery_service
        .update_device(DeviceId::new(id), changes)
        .await?;
    Ok(Json(device))
}

/// `DELETE /api/devices/{id}`: Remove a device. Its batteries stay.
///
/// # Errors
///
/// Returns [`MonitorError::DeviceNotFound`] if it does not exist.
#[utoipa::path(
    delete,
    path = "/api/devices/{id}",
    tag = "Devices",
    summary = "Delete a device",
    params(("id" = i64, Path, description = "Device id")),
    responses(
        (status = 204, description = "Device deleted"),
        (status = 404, description = "Device not found", body = ErrorResponse),
    )
)]
pub async fn delete_device(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, MonitorError> {
    state.battery_service.delete_device(DeviceId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/devices/{id}/battery_status`
///
/// # Errors
///
/// Returns [`MonitorError::DeviceNotFound`] if it does not exist.
#[utoipa::path(
    get,
    path = "/api/devices/{id}/battery_status",
    tag = "Devices",
    summary = "Device battery status",
    description = "The device together with the current state of each hosted battery.",
    params(("id" = i64, Path, description = "Device id")),
    responses(
        (status = 200, description = "Device and batteries", body = DeviceBatteryStatus),
        (status = 404, description = "Device not found", body = ErrorResponse),
    )
)]
pub async fn device_battery_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, MonitorError> {
    let status = state
        .battery_service
        .device_battery_status(DeviceId::new(id))
        .await?;
    Ok(Json(status))
}

/// Device routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/devices", get(list_devices).post(create_device))
        .route(
            "/devices/{id}",
            get(get_device)
                .put(replace_device)
                .patch(patch_device)
                .delete(delete_device),
        )
        .route("/devices/{id}/battery_status", get(device_battery_status))
}
