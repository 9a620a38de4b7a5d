//! Battery records: live telemetry, health metrics and specifications.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::BatteryId;
use super::validation;
use crate::error::MonitorError;

/// Operating state reported by a battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatteryStatus {
    /// Receiving charge.
    Charging,
    /// Supplying a load.
    Discharging,
    /// Neither charging nor discharging.
    #[default]
    Idle,
    /// Fault condition reported by the battery management system.
    Fault,
}

impl BatteryStatus {
    /// Every status, in declaration order.
    pub const ALL: [Self; 4] = [Self::Charging, Self::Discharging, Self::Idle, Self::Fault];

    /// Wire and column representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Charging => "CHARGING",
            Self::Discharging => "DISCHARGING",
            Self::Idle => "IDLE",
            Self::Fault => "FAULT",
        }
    }

    /// `true` while the battery is moving energy in either direction.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Charging | Self::Discharging)
    }
}

impl fmt::Display for BatteryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BatteryStatus {
    type Err = MonitorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                MonitorError::invalid_field("current_status", format!("\"{s}\" is not a valid choice"))
            })
    }
}

/// A tracked battery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Battery {
    /// Store-assigned primary key.
    pub id: BatteryId,
    /// Unique manufacturer serial number.
    pub serial_number: String,
    /// Chemistry or product family (Li-ion, NiMH, Lead-acid, ...).
    pub battery_type: String,
    /// Capacity in mAh.
    pub capacity: f64,
    /// Nominal voltage in volts.
    pub voltage_nominal: f64,
    /// Current charge percentage (0-100).
    pub current_charge: f64,
    /// Current voltage in volts.
    pub current_voltage: f64,
    /// Temperature in Celsius.
    pub current_temperature: f64,
    /// Current operating state.
    pub current_status: BatteryStatus,
    /// Health percentage (0-100).
    pub health_percentage: f64,
    /// Number of charge cycles.
    pub cycle_count: i32,
    /// Max discharge current in amps.
    pub max_discharge_current: f64,
    /// Max charge current in amps.
    pub max_charge_current: f64,
    /// Refreshed on every save.
    pub last_updated: DateTime<Utc>,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
}

impl Battery {
    /// Checks every invariant of a stored battery.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidField`] for the first failing field.
    pub fn validate(&self) -> Result<(), MonitorError> {
        validate_columns(&Columns {
            serial_number: &self.serial_number,
            battery_type: &self.battery_type,
            capacity: self.capacity,
            voltage_nominal: self.voltage_nominal,
            current_charge: self.current_charge,
            current_voltage: self.current_voltage,
            current_temperature: self.current_temperature,
            health_percentage: self.health_percentage,
            cycle_count: self.cycle_count,
            max_discharge_current: self.max_discharge_current,
            max_charge_current: self.max_charge_current,
        })
    }
}

impl fmt::Display for Battery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.battery_type, self.serial_number)
    }
}

fn default_health() -> f64 {
    100.0
}

/// Writable fields of a battery, as accepted on create and full update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewBattery {
    /// Unique manufacturer serial number.
    pub serial_number: String,
    /// Chemistry or product family.
    pub battery_type: String,
    /// Capacity in mAh.
    pub capacity: f64,
    /// Nominal voltage in volts.
    pub voltage_nominal: f64,
    /// Current charge percentage (0-100).
    pub current_charge: f64,
    /// Current voltage in volts.
    pub current_voltage: f64,
    /// Temperature in Celsius.
    pub current_temperature: f64,
    /// Operating state. Defaults to `IDLE`.
    #[serde(default)]
    pub current_status: BatteryStatus,
    /// Health percentage (0-100). Defaults to 100.
    #[serde(default = "default_health")]
    pub health_percentage: f64,
    /// Number of charge cycles. Defaults to 0.
    #[serde(default)]
    pub cycle_count: i32,
    /// Max discharge current in amps.
    pub max_discharge_current: f64,
    /// Max charge current in amps.
    pub max_charge_current: f64,
}

impl NewBattery {
    /// Checks every invariant before insertion.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidField`] for the first failing field.
    pub fn validate(&self) -> Result<(), MonitorError> {
        validate_columns(&Columns {
            serial_number: &self.serial_number,
            battery_type: &self.battery_type,
            capacity: self.capacity,
            voltage_nominal: self.voltage_nominal,
            current_charge: self.current_charge,
            current_voltage: self.current_voltage,
            current_temperature: self.current_temperature,
            health_percentage: self.health_percentage,
            cycle_count: self.cycle_count,
            max_discharge_current: self.max_discharge_current,
            max_charge_current: self.max_charge_current,
        })
    }

    /// Materializes a stored battery with the given identity and timestamps.
    #[must_use]
    pub fn into_battery(self, id: BatteryId, now: DateTime<Utc>) -> Battery {
        Battery {
            id,
            serial_number: self.serial_number,
            battery_type: self.battery_type,
            capacity: self.capacity,
            voltage_nominal: self.voltage_nominal,
            current_charge: self.current_charge,
            current_voltage: self.current_voltage,
            current_temperature: self.current_temperature,
            current_status: self.current_status,
            health_percentage: self.health_percentage,
            cycle_count: self.cycle_count,
            max_discharge_current: self.max_discharge_current,
            max_charge_current: self.max_charge_current,
            last_updated: now,
            created_at: now,
        }
    }
}

impl From<NewBattery> for BatteryChanges {
    fn from(full: NewBattery) -> Self {
        Self {
            serial_number: Some(full.serial_number),
            battery_type: Some(full.battery_type),
            capacity: Some(full.capacity),
            voltage_nominal: Some(full.voltage_nominal),
            current_charge: Some(full.current_charge),
            current_voltage: Some(full.current_voltage),
            current_temperature: Some(full.current_temperature),
            current_status: Some(full.current_status),
            health_percentage: Some(full.health_percentage),
            cycle_count: Some(full.cycle_count),
            max_discharge_current: Some(full.max_discharge_current),
            max_charge_current: Some(full.max_charge_current),
        }
    }
}

/// Partial update of a battery. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BatteryChanges {
    /// New serial number.
    #[serde(default)]
    pub serial_number: Option<String>,
    /// New battery type.
    #[serde(default)]
    pub battery_type: Option<String>,
    /// New capacity in mAh.
    #[serde(default)]
    pub capacity: Option<f64>,
    /// New nominal voltage.
    #[serde(default)]
    pub voltage_nominal: Option<f64>,
    /// New charge percentage.
    #[serde(default)]
    pub current_charge: Option<f64>,
    /// New voltage reading.
    #[serde(default)]
    pub current_voltage: Option<f64>,
    /// New temperature reading.
    #[serde(default)]
    pub current_temperature: Option<f64>,
    /// New operating state.
    #[serde(default)]
    pub current_status: Option<BatteryStatus>,
    /// New health percentage.
    #[serde(default)]
    pub health_percentage: Option<f64>,
    /// New cycle count.
    #[serde(default)]
    pub cycle_count: Option<i32>,
    /// New max discharge current.
    #[serde(default)]
    pub max_discharge_current: Option<f64>,
    /// New max charge current.
    #[serde(default)]
    pub max_charge_current: Option<f64>,
}

impl BatteryChanges {
    /// Copies every present field onto `battery`.
    pub fn apply(self, battery: &mut Battery) {
        if let Some(v) = self.serial_number {
            battery.serial_number = v;
        }
        if let Some(v) = self.battery_type {
            battery.battery_type = v;
        }
        if let Some(v) = self.capacity {
            battery.capacity = v;
        }
        if let Some(v) = self.voltage_nominal {
            battery.voltage_nominal = v;
        }
        if let Some(v) = self.current_charge {
            battery.current_charge = v;
        }
        if let Some(v) = self.current_voltage {
            battery.current_voltage = v;
        }
        if let Some(v) = self.current_temperature {
            battery.current_temperature = v;
        }
        if let Some(v) = self.current_status {
            battery.current_status = v;
        }
        if let Some(v) = self.health_percentage {
            battery.health_percentage = v;
        }
        if let Some(v) = self.cycle_count {
            battery.cycle_count = v;
        }
        if let Some(v) = self.max_discharge_current {
            battery.max_discharge_current = v;
        }
        if let Some(v) = self.max_charge_current {
            battery.max_charge_current = v;
        }
    }
}

/// Live readings pushed through the status-update action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StatusReadings {
    /// Charge percentage (0-100).
    #[serde(default)]
    pub current_charge: Option<f64>,
    /// Voltage in volts.
    #[serde(default)]
    pub current_voltage: Option<f64>,
    /// Temperature in Celsius.
    #[serde(default)]
    pub current_temperature: Option<f64>,
    /// Operating state.
    #[serde(default)]
    pub current_status: Option<BatteryStatus>,
    /// Current in amps, positive for charging and negative for discharging.
    /// Recorded on the log entry only. Defaults to 0.
    #[serde(default)]
    pub current: Option<f64>,
}

impl StatusReadings {
    /// Copies the present readings onto `battery`.
    pub fn apply(&self, battery: &mut Battery) {
        if let Some(v) = self.current_charge {
            battery.current_charge = v;
        }
        if let Some(v) = self.current_voltage {
            battery.current_voltage = v;
        }
        if let Some(v) = self.current_temperature {
            battery.current_temperature = v;
        }
        if let Some(v) = self.current_status {
            battery.current_status = v;
        }
    }
}

struct Columns<'a> {
    serial_number: &'a str,
    battery_type: &'a str,
    capacity: f64,
    voltage_nominal: f64,
    current_charge: f64,
    current_voltage: f64,
    current_temperature: f64,
    health_percentage: f64,
    cycle_count: i32,
    max_discharge_current: f64,
    max_charge_current: f64,
}

fn validate_columns(c: &Columns<'_>) -> Result<(), MonitorError> {
    validation::text("serial_number", c.serial_number, 100, false)?;
    validation::text("battery_type", c.battery_type, 50, false)?;
    validation::finite("capacity", c.capacity)?;
    validation::finite("voltage_nominal", c.voltage_nominal)?;
    validation::percentage("current_charge", c.current_charge)?;
    validation::finite("current_voltage", c.current_voltage)?;
    validation::finite("current_temperature", c.current_temperature)?;
    validation::percentage("health_percentage", c.health_percentage)?;
    if c.cycle_count < 0 {
        return Err(MonitorError::invalid_field(
            "cycle_count",
            "must be greater than or equal to 0",
        ));
    }
    validation::finite("max_discharge_current", c.max_discharge_current)?;
    validation::finite("max_charge_current", c.max_charge_current)?;
    Ok(())
}
