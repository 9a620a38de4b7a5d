//! Battery alerts and their resolution lifecycle.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation;
use super::{AlertId, BatteryId};
use crate::error::MonitorError;

/// Kind of anomaly an alert reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    /// Charge dropped below the low-charge threshold.
    LowCharge,
    /// Charged beyond the safe limit.
    Overcharge,
    /// Temperature above the safe limit.
    OverTemperature,
    /// Voltage sagged below the nominal ratio.
    UnderVoltage,
    /// Current above the rated maximum.
    OverCurrent,
    /// Health percentage below the degradation threshold.
    HealthDegradation,
    /// Fault detected.
    Fault,
    /// The battery stopped reporting.
    CommunicationError,
}

impl AlertType {
    /// Every alert type, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::LowCharge,
        Self::Overcharge,
        Self::OverTemperature,
        Self::UnderVoltage,
        Self::OverCurrent,
        Self::HealthDegradation,
        Self::Fault,
        Self::CommunicationError,
    ];

    /// Wire and column representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LowCharge => "LOW_CHARGE",
            Self::Overcharge => "OVERCHARGE",
            Self::OverTemperature => "OVER_TEMPERATURE",
            Self::UnderVoltage => "UNDER_VOLTAGE",
            Self::OverCurrent => "OVER_CURRENT",
            Self::HealthDegradation => "HEALTH_DEGRADATION",
            Self::Fault => "FAULT",
            Self::CommunicationError => "COMMUNICATION_ERROR",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LowCharge => "Low Charge",
            Self::Overcharge => "Overcharge",
            Self::OverTemperature => "Over Temperature",
            Self::UnderVoltage => "Under Voltage",
            Self::OverCurrent => "Over Current",
            Self::HealthDegradation => "Health Degradation",
            Self::Fault => "Fault Detected",
            Self::CommunicationError => "Communication Error",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertType {
    type Err = MonitorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                MonitorError::invalid_field("alert_type", format!("\"{s}\" is not a valid choice"))
            })
    }
}

/// Severity of an alert. Variants are declared in ascending severity, so
/// the derived `Ord` is the severity rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertLevel {
    /// Information.
    Info,
    /// Warning.
    Warning,
    /// Error.
    Error,
    /// Critical.
    Critical,
}

impl AlertLevel {
    /// Every level, least severe first.
    pub const ALL: [Self; 4] = [Self::Info, Self::Warning, Self::Error, Self::Critical];

    /// Wire and column representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }

    /// Numeric rank, 0 for `INFO` through 3 for `CRITICAL`.
    #[must_use]
    pub const fn rank(self) -> i16 {
        match self {
            Self::Info => 0,
            Self::Warning => 1,
            Self::Error => 2,
            Self::Critical => 3,
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertLevel {
    type Err = MonitorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| {
                MonitorError::invalid_field("alert_level", format!("\"{s}\" is not a valid choice"))
            })
    }
}

/// An alert raised against a battery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BatteryAlert {
    /// Store-assigned primary key.
    pub id: AlertId,
    /// Battery the alert belongs to.
    pub battery: BatteryId,
    /// Serial number of that battery (read-only, joined).
    pub battery_serial: String,
    /// Kind of anomaly.
    pub alert_type: AlertType,
    /// Severity.
    pub alert_level: AlertLevel,
    /// Free-form description.
    pub message: String,
    /// Whether an operator has resolved the alert.
    pub is_resolved: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Time of the transition to resolved, if any.
    pub resolved_at: Option<DateTime<Utc>>,
}

impl BatteryAlert {
    /// Sets the resolved flag, keeping `resolved_at` consistent with it.
    ///
    /// The timestamp is stamped only on the unresolved → resolved
    /// transition; re-resolving keeps the original time and re-opening
    /// clears it.
    pub fn set_resolved(&mut self, resolved: bool, now: DateTime<Utc>) {
        match (self.is_resolved, resolved) {
            (false, true) => self.resolved_at = Some(now),
            (true, false) => self.resolved_at = None,
            _ => {}
        }
        self.is_resolved = resolved;
    }

    /// Checks the writable fields.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidField`] when the message is blank.
    pub fn validate(&self) -> Result<(), MonitorError> {
        validation::text("message", &self.message, usize::MAX, false)
    }
}

impl fmt::Display for BatteryAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.alert_type.label(), self.battery_serial)
    }
}

/// Writable fields of an alert, as accepted on create and full update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewAlert {
    /// Battery the alert belongs to.
    pub battery: BatteryId,
    /// Kind of anomaly.
    pub alert_type: AlertType,
    /// Severity.
    pub alert_level: AlertLevel,
    /// Free-form description.
    pub message: String,
    /// Initial resolved flag. Defaults to `false`.
    #[serde(default)]
    pub is_resolved: bool,
}

impl NewAlert {
    /// Checks the writable fields.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidField`] when the message is blank.
    pub fn validate(&self) -> Result<(), MonitorError> {
        validation::text("message", &self.message, usize::MAX, false)
    }

    /// Materializes a stored alert. An alert created already resolved is
    /// stamped as resolved at creation time.
    #[must_use]
    pub fn into_alert(self, id: AlertId, battery_serial: String, now: DateTime<Utc>) -> BatteryAlert {
        BatteryAlert {
            id,
            battery: self.battery,
            battery_serial,
            alert_type: self.alert_type,
            alert_level: self.alert_level,
            message: self.message,
            is_resolved: self.is_resolved,
            created_at: now,
            resolved_at: self.is_resolved.then_some(now),
        }
    }
}

/// Partial update of an alert. `resolved_at` is never writable directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AlertChanges {
    /// Move the alert to another battery.
    #[serde(default)]
    pub battery: Option<BatteryId>,
    /// New kind.
    #[serde(default)]
    pub alert_type: Option<AlertType>,
    /// New severity.
    #[serde(default)]
    pub alert_level: Option<AlertLevel>,
    /// New message.
    #[serde(default)]
    pub message: Option<String>,
    /// Resolve or re-open.
    #[serde(default)]
    pub is_resolved: Option<bool>,
}

impl From<NewAlert> for AlertChanges {
    fn from(full: NewAlert) -> Self {
        Self {
            battery: Some(full.battery),
            alert_type: Some(full.alert_type),
            alert_level: Some(full.alert_level),
            message: Some(full.message),
            is_resolved: Some(full.is_resolved),
        }
    }
}

impl AlertChanges {
    /// Copies every present field onto `alert`.
    pub fn apply(self, alert: &mut BatteryAlert, now: DateTime<Utc>) {
        if let Some(v) = self.battery {
            alert.battery = v;
        }
        if let Some(v) = self.alert_type {
            alert.alert_type = v;
        }
        if let Some(v) = self.alert_level {
            alert.alert_level = v;
        }
        if let Some(v) = self.message {
            alert.message = v;
        }
        if let Some(v) = self.is_resolved {
            alert.set_resolved(v, now);
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn open_alert() -> BatteryAlert {
        NewAlert {
            battery: BatteryId::new(1),
            alert_type: AlertType::LowCharge,
            alert_level: AlertLevel::Warning,
            message: "Battery charge is critically low: 5%".to_string(),
            is_resolved: false,
        }
        .into_alert(AlertId::new(1), "BAT-001".to_string(), Utc::now())
    }

    #[test]
    fn resolving_stamps_timestamp_once() {
        let mut alert = open_alert();
        assert!(alert.resolved_at.is_none());

        let first = Utc::now();
        alert.set_resolved(true, first);
        assert_eq!(alert.resolved_at, Some(first));

        alert.set_resolved(true, first + Duration::minutes(5));
        assert_eq!(alert.resolved_at, Some(first));
    }

    #[test]
    fn reopening_clears_timestamp() {
        let mut alert = open_alert();
        alert.set_resolved(true, Utc::now());
        alert.set_resolved(false, Utc::now());
        assert!(!alert.is_resolved);
        assert!(alert.resolved_at.is_none());
    }

    #[test]
    fn created_resolved_alert_has_timestamp() {
        let now = Utc::now();
        let alert = NewAlert {
            battery: BatteryId::new(1),
            alert_type: AlertType::Fault,
            alert_level: AlertLevel::Error,
            message: "x".to_string(),
            is_resolved: true,
        }
        .into_alert(AlertId::new(2), "BAT-001".to_string(), now);
        assert_eq!(alert.resolved_at, Some(now));
    }

    #[test]
    fn level_order_is_severity() {
        assert!(AlertLevel::Info < AlertLevel::Warning);
        assert!(AlertLevel::Error < AlertLevel::Critical);
        assert_eq!(AlertLevel::Critical.rank(), 3);
    }

    #[test]
    fn alert_type_round_trips_through_str() {
        for t in AlertType::ALL {
            assert_eq!(t.as_str().parse::<AlertType>().ok(), Some(t));
        }
    }

    #[test]
    fn display_uses_label() {
        assert_eq!(open_alert().to_string(), "Low Charge - BAT-001");
    }

    #[test]
    fn blank_message_is_rejected() {
        let mut alert = open_alert();
        alert.message = " ".to_string();
        assert!(alert.validate().is_err());
    }
}
