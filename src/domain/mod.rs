//! Domain layer: records, alert rules, and the dashboard event system.
//!
//! This module contains the service-side model: the four record types
//! (batteries, alerts, logs, devices) with their validation rules, the
//! threshold checks that raise alerts, and the event bus that fans saved
//! records out to dashboard clients.

pub mod alert;
pub mod alert_rules;
pub mod battery;
pub mod device;
pub mod event;
pub mod event_bus;
pub mod ids;
pub mod log;
pub mod validation;

pub use alert::{AlertChanges, AlertLevel, AlertType, BatteryAlert, NewAlert};
pub use alert_rules::{AlertDraft, AlertThresholds};
pub use battery::{Battery, BatteryChanges, BatteryStatus, NewBattery, StatusReadings};
pub use device::{BatteryDevice, DeviceChanges, DeviceType, NewDevice};
pub use event::DashboardEvent;
pub use event_bus::EventBus;
pub use ids::{AlertId, BatteryId, DeviceId, LogId};
pub use log::{BatteryLog, NewBatteryLog};
