//! Threshold checks run after every battery status update.
//!
//! Four independent comparisons against the saved battery. Each firing
//! check yields one [`AlertDraft`]; there is no de-duplication against
//! existing alerts and no state carried between evaluations.

use super::{AlertLevel, AlertType, Battery, BatteryId, NewAlert};

/// Limits that trigger alerts. Comparisons are strict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertThresholds {
    /// Alert when charge falls below this percentage.
    pub low_charge_percent: f64,
    /// Alert when temperature rises above this value in Celsius.
    pub max_temperature_c: f64,
    /// Alert when voltage falls below `voltage_nominal * min_voltage_ratio`.
    pub min_voltage_ratio: f64,
    /// Alert when health falls below this percentage.
    pub min_health_percent: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            low_charge_percent: 10.0,
            max_temperature_c: 50.0,
            min_voltage_ratio: 0.8,
            min_health_percent: 20.0,
        }
    }
}

/// An alert to be created for a battery.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertDraft {
    /// Kind of anomaly.
    pub alert_type: AlertType,
    /// Severity.
    pub alert_level: AlertLevel,
    /// Human-readable message including the offending reading.
    pub message: String,
}

impl AlertDraft {
    /// Binds the draft to a battery, ready for insertion.
    #[must_use]
    pub fn for_battery(self, battery: BatteryId) -> NewAlert {
        NewAlert {
            battery,
            alert_type: self.alert_type,
            alert_level: self.alert_level,
            message: self.message,
            is_resolved: false,
        }
    }
}

impl AlertThresholds {
    /// Evaluates every check against `battery`, in a fixed order: charge,
    /// temperature, voltage, health.
    #[must_use]
    pub fn evaluate(&self, battery: &Battery) -> Vec<AlertDraft> {
        let mut drafts = Vec::new();

        if battery.current_charge < self.low_charge_percent {
            drafts.push(AlertDraft {
                alert_type: AlertType::LowCharge,
                alert_level: AlertLevel::Warning,
                message: format!(
                    "Battery charge is critically low: {}%",
                    battery.current_charge
                ),
            });
        }

        if battery.current_temperature > self.max_temperature_c {
            drafts.push(AlertDraft {
                alert_type: AlertType::OverTemperature,
                alert_level: AlertLevel::Critical,
                message: format!(
                    "Battery temperature is too high: {}°C",
                    battery.current_temperature
                ),
            });
        }

        if battery.current_voltage < battery.voltage_nominal * self.min_voltage_ratio {
            drafts.push(AlertDraft {
                alert_type: AlertType::UnderVoltage,
                alert_level: AlertLevel::Error,
                message: format!("Battery voltage is too low: {}V", battery.current_voltage),
            });
        }

        if battery.health_percentage < self.min_health_percent {
            drafts.push(AlertDraft {
                alert_type: AlertType::HealthDegradation,
                alert_level: AlertLevel::Warning,
                message: format!(
                    "Battery health has degraded: {}%",
                    battery.health_percentage
                ),
            });
        }

        drafts
    }
}
