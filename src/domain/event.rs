//! Dashboard events reflecting saved records.
//!
//! Every save of a battery or an alert emits a [`DashboardEvent`] through
//! the [`super::EventBus`]. Events are fanned out verbatim to every
//! connected dashboard WebSocket client.

use serde::Serialize;

use super::{Battery, BatteryAlert};

/// Payload pushed to dashboard clients after a save.
///
/// Serializes as `{"type": "battery_update", "battery": {...}, "created": true}`
/// or `{"type": "alert_update", "alert": {...}, "created": false}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardEvent {
    /// A battery was inserted or updated.
    BatteryUpdate {
        /// The battery as saved.
        battery: Box<Battery>,
        /// `true` on insert, `false` on update.
        created: bool,
    },

    /// An alert was inserted or updated.
    AlertUpdate {
        /// The alert as saved.
        alert: Box<BatteryAlert>,
        /// `true` on insert, `false` on update.
        created: bool,
    },
}

impl DashboardEvent {
    /// Event for a saved battery.
    #[must_use]
    pub fn battery(battery: &Battery, created: bool) -> Self {
        Self::BatteryUpdate {
            battery: Box::new(battery.clone()),
            created,
        }
    }

    /// Event for a saved alert.
    #[must_use]
    pub fn alert(alert: &BatteryAlert, created: bool) -> Self {
        Self::AlertUpdate {
            alert: Box::new(alert.clone()),
            created,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::BatteryUpdate { .. } => "battery_update",
            Self::AlertUpdate { .. } => "alert_update",
        }
    }

    /// Whether the event reports an insert.
    #[must_use]
    pub const fn is_created(&self) -> bool {
        match self {
            Self::BatteryUpdate { created, .. } | Self::AlertUpdate { created, .. } => *created,
        }
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::BatteryId;
    use crate::domain::battery::fixtures::new_battery;

    #[test]
    fn battery_update_wire_shape() {
        let battery = new_battery("BAT-001").into_battery(BatteryId::new(1), Utc::now());
        let event = DashboardEvent::battery(&battery, true);
        assert_eq!(event.event_type_str(), "battery_update");

        let json = serde_json::to_value(&event).unwrap_or_default();
        assert_eq!(json["type"], "battery_update");
        assert_eq!(json["created"], true);
        assert_eq!(json["battery"]["serial_number"], "BAT-001");
        assert_eq!(json["battery"]["current_status"], "DISCHARGING");
    }

    #[test]
    fn created_flag_accessor() {
        let battery = new_battery("BAT-002").into_battery(BatteryId::new(2), Utc::now());
        assert!(!DashboardEvent::battery(&battery, false).is_created());
    }
}
