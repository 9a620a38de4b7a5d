//! Database row types and their conversion into domain records.
//!
//! Enumerations are stored as their wire strings; converting a row back
//! parses them and fails with [`MonitorError::PersistenceError`] if the
//! column holds something the service never writes.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::domain::{
    AlertId, Battery, BatteryAlert, BatteryDevice, BatteryId, BatteryLog, DeviceId, LogId,
};
use crate::error::MonitorError;

/// Column list for `batteries`, in [`BatteryRow`] order.
pub const BATTERY_COLUMNS: &str = "id, serial_number, battery_type, capacity, voltage_nominal, \
     current_charge, current_voltage, current_temperature, current_status, health_percentage, \
     cycle_count, max_discharge_current, max_charge_current, last_updated, created_at";

/// Column list for `battery_alerts a JOIN batteries b`, in [`AlertRow`] order.
pub const ALERT_COLUMNS: &str = "a.id, a.battery_id, b.serial_number AS battery_serial, \
     a.alert_type, a.alert_level, a.message, a.is_resolved, a.created_at, a.resolved_at";

/// Column list for `battery_logs l JOIN batteries b`, in [`LogRow`] order.
pub const LOG_COLUMNS: &str = "l.id, l.battery_id, b.serial_number AS battery_serial, \
     l.charge_percentage, l.voltage, l.temperature, l.current, l.status, l.logged_at";

/// Column list for `battery_devices`, in [`DeviceRow`] order.
pub const DEVICE_COLUMNS: &str = "id, device_name, device_type, serial_number, location, \
     is_active, created_at, last_checked";

/// A row from the `batteries` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BatteryRow {
    /// Primary key.
    pub id: i64,
    /// Unique serial number.
    pub serial_number: String,
    /// Battery type.
    pub battery_type: String,
    /// Capacity in mAh.
    pub capacity: f64,
    /// Nominal voltage.
    pub voltage_nominal: f64,
    /// Charge percentage.
    pub current_charge: f64,
    /// Voltage reading.
    pub current_voltage: f64,
    /// Temperature reading.
    pub current_temperature: f64,
    /// Status wire string.
    pub current_status: String,
    /// Health percentage.
    pub health_percentage: f64,
    /// Charge cycles.
    pub cycle_count: i32,
    /// Max discharge current.
    pub max_discharge_current: f64,
    /// Max charge current.
    pub max_charge_current: f64,
    /// Last save.
    pub last_updated: DateTime<Utc>,
    /// Creation.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<BatteryRow> for Battery {
    type Error = MonitorError;

    fn try_from(row: BatteryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: BatteryId::new(row.id),
            current_status: row.current_status.parse().map_err(corrupt)?,
            serial_number: row.serial_number,
            battery_type: row.battery_type,
            capacity: row.capacity,
            voltage_nominal: row.voltage_nominal,
            current_charge: row.current_charge,
            current_voltage: row.current_voltage,
            current_temperature: row.current_temperature,
            health_percentage: row.health_percentage,
            cycle_count: row.cycle_count,
            max_discharge_current: row.max_discharge_current,
            max_charge_current: row.max_charge_current,
            last_updated: row.last_updated,
            created_at: row.created_at,
        })
    }
}

/// A row from `battery_alerts` joined with its battery's serial number.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AlertRow {
    /// Primary key.
    pub id: i64,
    /// Owning battery.
    pub battery_id: i64,
    /// Joined serial number.
    pub battery_serial: String,
    /// Alert type wire string.
    pub alert_type: String,
    /// Alert level wire string.
    pub alert_level: String,
    /// Message.
    pub message: String,
    /// Resolved flag.
    pub is_resolved: bool,
    /// Creation.
    pub created_at: DateTime<Utc>,
    /// Resolution time.
    pub resolved_at: Option<DateTime<Utc>>,
}

impl TryFrom<AlertRow> for BatteryAlert {
    type Error = MonitorError;

    fn try_from(row: AlertRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AlertId::new(row.id),
            battery: BatteryId::new(row.battery_id),
            battery_serial: row.battery_serial,
            alert_type: row.alert_type.parse().map_err(corrupt)?,
            alert_level: row.alert_level.parse().map_err(corrupt)?,
            message: row.message,
            is_resolved: row.is_resolved,
            created_at: row.created_at,
            resolved_at: row.resolved_at,
        })
    }
}

/// A row from `battery_logs` joined with its battery's serial number.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LogRow {
    /// Primary key.
    pub id: i64,
    /// Owning battery.
    pub battery_id: i64,
    /// Joined serial number.
    pub battery_serial: String,
    /// Charge percentage.
    pub charge_percentage: f64,
    /// Voltage.
    pub voltage: f64,
    /// Temperature.
    pub temperature: f64,
    /// Current.
    pub current: f64,
    /// Status string.
    pub status: String,
    /// Reading time.
    pub logged_at: DateTime<Utc>,
}

impl From<LogRow> for BatteryLog {
    fn from(row: LogRow) -> Self {
        Self {
            id: LogId::new(row.id),
            battery: BatteryId::new(row.battery_id),
            battery_serial: row.battery_serial,
            charge_percentage: row.charge_percentage,
            voltage: row.voltage,
            temperature: row.temperature,
            current: row.current,
            status: row.status,
            logged_at: row.logged_at,
        }
    }
}

/// A row from `battery_devices`. The battery set lives in
/// `battery_device_batteries` and is attached separately.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DeviceRow {
    /// Primary key.
    pub id: i64,
    /// Display name.
    pub device_name: String,
    /// Device type wire string.
    pub device_type: String,
    /// Unique serial number.
    pub serial_number: String,
    /// Location.
    pub location: String,
    /// In-service flag.
    pub is_active: bool,
    /// Creation.
    pub created_at: DateTime<Utc>,
    /// Last inspection.
    pub last_checked: Option<DateTime<Utc>>,
}

impl DeviceRow {
    /// Combines the row with its battery links.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::PersistenceError`] if `device_type` holds an
    /// unknown value.
    pub fn into_device(self, batteries: BTreeSet<BatteryId>) -> Result<BatteryDevice, MonitorError> {
        Ok(BatteryDevice {
            id: DeviceId::new(self.id),
            device_name: self.device_name,
            device_type: self.device_type.parse().map_err(corrupt)?,
            serial_number: self.serial_number,
            location: self.location,
            batteries,
            is_active: self.is_active,
            created_at: self.created_at,
            last_checked: self.last_checked,
        })
    }
}

/// A row from `battery_device_batteries`.
#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct DeviceBatteryLink {
    /// Device side.
    pub device_id: i64,
    /// Battery side.
    pub battery_id: i64,
}

fn corrupt(err: MonitorError) -> MonitorError {
    MonitorError::PersistenceError(format!("unexpected column value: {err}"))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::BatteryStatus;

    fn row(status: &str) -> BatteryRow {
        let now = Utc::now();
        BatteryRow {
            id: 1,
            serial_number: "BAT-001".to_string(),
            battery_type: "Li-ion".to_string(),
            capacity: 5000.0,
            voltage_nominal: 3.7,
            current_charge: 85.0,
            current_voltage: 3.65,
            current_temperature: 25.0,
            current_status: status.to_string(),
            health_percentage: 95.0,
            cycle_count: 150,
            max_discharge_current: 10.0,
            max_charge_current: 5.0,
            last_updated: now,
            created_at: now,
        }
    }

    #[test]
    fn battery_row_converts() {
        let Ok(battery) = Battery::try_from(row("CHARGING")) else {
            panic!("row should convert");
        };
        assert_eq!(battery.current_status, BatteryStatus::Charging);
        assert_eq!(battery.id, BatteryId::new(1));
    }

    #[test]
    fn unknown_status_is_a_persistence_error() {
        let Err(err) = Battery::try_from(row("EXPLODED")) else {
            panic!("row should not convert");
        };
        assert_eq!(err.error_code(), 3001);
    }
}
