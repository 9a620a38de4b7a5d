//! Devices hosting one or more batteries.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation;
use super::{BatteryId, DeviceId};
use crate::error::MonitorError;

/// Category of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    /// Mobile phone.
    Mobile,
    /// Laptop.
    Laptop,
    /// Drone.
    Drone,
    /// Vehicle.
    Vehicle,
    /// Industrial equipment.
    Industrial,
    /// Anything else.
    Other,
}

impl DeviceType {
    /// Every device type, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Mobile,
        Self::Laptop,
        Self::Drone,
        Self::Vehicle,
        Self::Industrial,
        Self::Other,
    ];

    /// Wire and column representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mobile => "MOBILE",
            Self::Laptop => "LAPTOP",
            Self::Drone => "DRONE",
            Self::Vehicle => "VEHICLE",
            Self::Industrial => "INDUSTRIAL",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = MonitorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                MonitorError::invalid_field("device_type", format!("\"{s}\" is not a valid choice"))
            })
    }
}

/// A physical unit hosting batteries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BatteryDevice {
    /// Store-assigned primary key.
    pub id: DeviceId,
    /// Display name.
    pub device_name: String,
    /// Category.
    pub device_type: DeviceType,
    /// Unique device serial number.
    pub serial_number: String,
    /// Where the device is kept. May be empty.
    pub location: String,
    /// Batteries installed in the device.
    pub batteries: BTreeSet<BatteryId>,
    /// Whether the device is in service.
    pub is_active: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last inspection time, if any.
    pub last_checked: Option<DateTime<Utc>>,
}

impl BatteryDevice {
    /// Checks the text columns.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidField`] for the first failing field.
    pub fn validate(&self) -> Result<(), MonitorError> {
        validate_text(&self.device_name, &self.serial_number, &self.location)
    }
}

impl fmt::Display for BatteryDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.device_name, self.serial_number)
    }
}

fn default_active() -> bool {
    true
}

/// Writable fields of a device, as accepted on create and full update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewDevice {
    /// Display name.
    pub device_name: String,
    /// Category.
    pub device_type: DeviceType,
    /// Unique device serial number.
    pub serial_number: String,
    /// Location. Defaults to empty.
    #[serde(default)]
    pub location: String,
    /// Installed batteries. Defaults to none.
    #[serde(default)]
    pub batteries: BTreeSet<BatteryId>,
    /// In service. Defaults to `true`.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Last inspection time.
    #[serde(default)]
    pub last_checked: Option<DateTime<Utc>>,
}

impl NewDevice {
    /// Checks the text columns.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidField`] for the first failing field.
    pub fn validate(&self) -> Result<(), MonitorError> {
        validate_text(&self.device_name, &self.serial_number, &self.location)
    }

    /// Materializes a stored device.
    #[must_use]
    pub fn into_device(self, id: DeviceId, now: DateTime<Utc>) -> BatteryDevice {
        BatteryDevice {
            id,
            device_name: self.device_name,
            device_type: self.device_type,
            serial_number: self.serial_number,
            location: self.location,
            batteries: self.batteries,
            is_active: self.is_active,
            created_at: now,
            last_checked: self.last_checked,
        }
    }
}

/// Partial update of a device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeviceChanges {
    /// New name.
    #[serde(default)]
    pub device_name: Option<String>,
    /// New category.
    #[serde(default)]
    pub device_type: Option<DeviceType>,
    /// New serial number.
    #[serde(default)]
    pub serial_number: Option<String>,
    /// New location.
    #[serde(default)]
    pub location: Option<String>,
    /// Replaces the full battery set.
    #[serde(default)]
    pub batteries: Option<BTreeSet<BatteryId>>,
    /// New in-service flag.
    #[serde(default)]
    pub is_active: Option<bool>,
    /// New inspection time.
    #[serde(default)]
    pub last_checked: Option<DateTime<Utc>>,
}

impl From<NewDevice> for DeviceChanges {
    fn from(full: NewDevice) -> Self {
        Self {
            device_name: Some(full.device_name),
            device_type: Some(full.device_type),
            serial_number: Some(full.serial_number),
            location: Some(full.location),
            batteries: Some(full.batteries),
            is_active: Some(full.is_active),
            last_checked: full.last_checked,
        }
    }
}

impl DeviceChanges {
    /// Copies every present field onto `device`.
    pub fn apply(self, device: &mut BatteryDevice) {
        if let Some(v) = self.device_name {
            device.device_name = v;
        }
        if let Some(v) = self.device_type {
            device.device_type = v;
        }
        if let Some(v) = self.serial_number {
            device.serial_number = v;
        }
        if let Some(v) = self.location {
            device.location = v;
        }
        if let Some(v) = self.batteries {
            device.batteries = v;
        }
        if let Some(v) = self.is_active {
            device.is_active = v;
        }
        if let Some(v) = self.last_checked {
            device.last_checked = Some(v);
        }
    }
}

fn validate_text(name: &str, serial: &str, location: &str) -> Result<(), MonitorError> {
    validation::text("device_name", name, 200, false)?;
    validation::text("serial_number", serial, 100, false)?;
    validation::text("location", location, 200, true)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn sample() -> NewDevice {
        NewDevice {
            device_name: "Mobile Phone - iPhone 14".to_string(),
            device_type: DeviceType::Mobile,
            serial_number: "DEVICE-001".to_string(),
            location: "Warehouse 1".to_string(),
            batteries: BTreeSet::from([BatteryId::new(1), BatteryId::new(2)]),
            is_active: true,
            last_checked: None,
        }
    }

    #[test]
    fn create_body_defaults_to_active_and_empty() {
        let body = serde_json::json!({
            "device_name": "Drone A",
            "device_type": "DRONE",
            "serial_number": "DR-1"
        });
        let Ok(parsed) = serde_json::from_value::<NewDevice>(body) else {
            panic!("body should parse");
        };
        assert!(parsed.is_active);
        assert!(parsed.batteries.is_empty());
        assert!(parsed.location.is_empty());
    }

    #[test]
    fn display_shows_name_and_serial() {
        let device = sample().into_device(DeviceId::new(1), Utc::now());
        assert_eq!(device.to_string(), "Mobile Phone - iPhone 14 (DEVICE-001)");
    }

    #[test]
    fn battery_set_is_replaced_not_merged() {
        let mut device = sample().into_device(DeviceId::new(1), Utc::now());
        DeviceChanges {
            batteries: Some(BTreeSet::from([BatteryId::new(3)])),
            ..DeviceChanges::default()
        }
        .apply(&mut device);
        assert_eq!(device.batteries, BTreeSet::from([BatteryId::new(3)]));
    }

    #[test]
    fn unknown_device_type_is_rejected() {
        assert!("TOASTER".parse::<DeviceType>().is_err());
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut nd = sample();
        nd.device_name = String::new();
        assert!(nd.validate().is_err());
    }
}
