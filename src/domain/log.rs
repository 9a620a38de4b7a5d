//! Immutable telemetry snapshots.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Battery, BatteryId, LogId};

/// A point-in-time telemetry snapshot of a battery.
///
/// Log entries are written once by the status-update path and never
/// modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BatteryLog {
    /// Store-assigned primary key.
    pub id: LogId,
    /// Battery the reading belongs to.
    pub battery: BatteryId,
    /// Serial number of that battery (read-only, joined).
    pub battery_serial: String,
    /// Charge percentage at the time of the reading.
    pub charge_percentage: f64,
    /// Voltage in volts.
    pub voltage: f64,
    /// Temperature in Celsius.
    pub temperature: f64,
    /// Current in amps. Positive for charging, negative for discharging.
    pub current: f64,
    /// Battery status at the time of the reading.
    pub status: String,
    /// When the reading was recorded.
    pub logged_at: DateTime<Utc>,
}

impl fmt::Display for BatteryLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.battery_serial, self.logged_at.to_rfc3339())
    }
}

/// Fields of a log entry before insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBatteryLog {
    /// Battery the reading belongs to.
    pub battery: BatteryId,
    /// Charge percentage.
    pub charge_percentage: f64,
    /// Voltage in volts.
    pub voltage: f64,
    /// Temperature in Celsius.
    pub temperature: f64,
    /// Current in amps.
    pub current: f64,
    /// Status string.
    pub status: String,
}

impl NewBatteryLog {
    /// Snapshots the current readings of `battery`.
    #[must_use]
    pub fn snapshot(battery: &Battery, current: f64) -> Self {
        Self {
            battery: battery.id,
            charge_percentage: battery.current_charge,
            voltage: battery.current_voltage,
            temperature: battery.current_temperature,
            current,
            status: battery.current_status.as_str().to_string(),
        }
    }

    /// Materializes a stored log entry.
    #[must_use]
    pub fn into_log(self, id: LogId, battery_serial: String, now: DateTime<Utc>) -> BatteryLog {
        BatteryLog {
            id,
            battery: self.battery,
            battery_serial,
            charge_percentage: self.charge_percentage,
            voltage: self.voltage,
            temperature: self.temperature,
            current: self.current,
            status: self.status,
            logged_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BatteryStatus;
    use crate::domain::battery::fixtures::new_battery;

    #[test]
    fn snapshot_copies_live_readings() {
        let mut battery = new_battery("BAT-7").into_battery(BatteryId::new(7), Utc::now());
        battery.current_status = BatteryStatus::Charging;
        let entry = NewBatteryLog::snapshot(&battery, 2.0);
        assert_eq!(entry.battery, BatteryId::new(7));
        assert!((entry.charge_percentage - battery.current_charge).abs() < f64::EPSILON);
        assert!((entry.current - 2.0).abs() < f64::EPSILON);
        assert_eq!(entry.status, "CHARGING");
    }
}
