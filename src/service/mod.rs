//! Service layer: business logic orchestration.
//!
//! [`BatteryService`] owns every write path: it validates input, writes
//! through the [`crate::persistence::Store`], evaluates alert thresholds
//! and publishes dashboard events on the [`crate::domain::EventBus`].
//! [`DashboardService`] is read-only and aggregates store contents for the
//! dashboard endpoints.

pub mod battery_service;
pub mod dashboard_service;

pub use battery_service::{BatteryService, DeviceBatteryStatus, DeviceDetail, HealthReport};
pub use dashboard_service::DashboardService;
