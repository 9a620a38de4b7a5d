//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::{BatteryService, DashboardService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Write paths and record lookups.
    pub battery_service: Arc<BatteryService>,
    /// Read-only dashboard aggregations.
    pub dashboard_service: Arc<DashboardService>,
    /// Event bus for dashboard WebSocket subscriptions.
    pub event_bus: EventBus,
}
