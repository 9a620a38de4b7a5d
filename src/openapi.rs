//! OpenAPI document for every REST endpoint.
//!
//! Served by Swagger UI at `/swagger-ui` (raw JSON at
//! `/api-docs/openapi.json`) when the `swagger-ui` feature is enabled.

use utoipa::OpenApi;

use crate::api::handlers::{alerts, batteries, dashboard, devices, logs, system};
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI specification.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "Battery Monitor API",
        description = "Battery inventory, telemetry log, threshold alerts, devices and dashboard aggregations. Live updates are pushed on the `/ws/dashboard` WebSocket.",
    ),
    paths(
        system::welcome_handler,
        system::health_handler,
        batteries::list_batteries,
        batteries::create_battery,
        batteries::get_battery,
        batteries::replace_battery,
        batteries::patch_battery,
        batteries::delete_battery,
        batteries::update_status,
        batteries::health_report,
        batteries::low_health_batteries,
        batteries::critical_status_batteries,
        alerts::list_alerts,
        alerts::create_alert,
        alerts::get_alert,
        alerts::replace_alert,
        alerts::patch_alert,
        alerts::delete_alert,
        alerts::resolve_alert,
        alerts::unresolved_alerts,
        logs::list_logs,
        logs::get_log,
        devices::list_devices,
        devices::create_device,
        devices::get_device,
        devices::replace_device,
        devices::patch_device,
        devices::delete_device,
        devices::device_battery_status,
        dashboard::stats,
        dashboard::chart_data,
        dashboard::battery_details,
        dashboard::alert_summary,
        dashboard::trend,
        dashboard::export,
    ),
    components(schemas(ErrorResponse, ErrorBody)),
    tags(
        (name = "System", description = "Welcome document and health check"),
        (name = "Batteries", description = "Battery inventory and readings"),
        (name = "Alerts", description = "Threshold and manual alerts"),
        (name = "Logs", description = "Read-only reading history"),
        (name = "Devices", description = "Devices and the batteries they host"),
        (name = "Dashboard", description = "Read-only aggregations"),
    )
)]
pub struct ApiDoc;
