//! Sample fleet for demos and local runs.
//!
//! [`load_sample_data`] is idempotent: records are looked up by serial
//! number (or by battery and type for the alert) and only created when
//! missing, so it is safe to run on every startup.

use std::collections::BTreeSet;

use crate::domain::{
    AlertLevel, AlertType, Battery, BatteryStatus, DeviceChanges, DeviceType, NewAlert,
    NewBattery, NewBatteryLog, NewDevice,
};
use crate::error::MonitorError;
use crate::persistence::{AlertFilter, LogFilter};
use crate::service::BatteryService;

/// What a seeding run created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Batteries inserted.
    pub batteries_created: usize,
    /// Whether the sample device was inserted.
    pub device_created: bool,
    /// Log entries appended.
    pub logs_created: usize,
    /// Whether the sample alert was inserted.
    pub alert_created: bool,
}

fn sample_batteries() -> [NewBattery; 3] {
    [
        NewBattery {
            serial_number: "BAT-001".to_string(),
            battery_type: "Li-ion".to_string(),
            capacity: 5000.0,
            voltage_nominal: 3.7,
            current_charge: 85.0,
            current_voltage: 3.65,
            current_temperature: 25.0,
            current_status: BatteryStatus::Discharging,
            health_percentage: 95.0,
            cycle_count: 150,
            max_discharge_current: 10.0,
            max_charge_current: 5.0,
        },
        NewBattery {
            serial_number: "BAT-002".to_string(),
            battery_type: "Li-ion".to_string(),
            capacity: 4000.0,
            voltage_nominal: 3.7,
            current_charge: 45.0,
            current_voltage: 3.4,
            current_temperature: 32.0,
            current_status: BatteryStatus::Charging,
            health_percentage: 88.0,
            cycle_count: 320,
            max_discharge_current: 8.0,
            max_charge_current: 4.0,
        },
        NewBattery {
            serial_number: "BAT-003".to_string(),
            battery_type: "NiMH".to_string(),
            capacity: 2500.0,
            voltage_nominal: 1.2,
            current_charge: 100.0,
            current_voltage: 1.2,
            current_temperature: 22.0,
            current_status: BatteryStatus::Idle,
            health_percentage: 100.0,
            cycle_count: 50,
            max_discharge_current: 5.0,
            max_charge_current: 2.5,
        },
    ]
}

/// Current recorded on the sample log of a battery in `status`.
fn sample_current(status: BatteryStatus) -> f64 {
    match status {
        BatteryStatus::Discharging => -2.5,
        BatteryStatus::Charging => 2.0,
        BatteryStatus::Idle | BatteryStatus::Fault => 0.0,
    }
}

/// Creates the sample batteries, device, logs and alert where missing.
///
/// # Errors
///
/// Propagates any store or validation error.
pub async fn load_sample_data(service: &BatteryService) -> Result<SeedSummary, MonitorError> {
    let store = service.store();
    let mut summary = SeedSummary::default();

    let mut batteries: Vec<Battery> = Vec::new();
    for new in sample_batteries() {
        let battery = match store.battery_by_serial(&new.serial_number).await? {
            Some(existing) => existing,
            None => {
                summary.batteries_created += 1;
                service.create_battery(new).await?
            }
        };
        batteries.push(battery);
    }

    let hosted: BTreeSet<_> = batteries.iter().take(2).map(|b| b.id).collect();
    match store.device_by_serial("DEVICE-001").await? {
        Some(device) if device.batteries == hosted => {}
        Some(device) => {
            service
                .update_device(
                    device.id,
                    DeviceChanges {
                        batteries: Some(hosted),
                        ..DeviceChanges::default()
                    },
                )
                .await?;
        }
        None => {
            service
                .create_device(NewDevice {
                    device_name: "Mobile Phone - iPhone 14".to_string(),
                    device_type: DeviceType::Mobile,
                    serial_number: "DEVICE-001".to_string(),
                    location: "Warehouse 1".to_string(),
                    batteries: hosted,
                    is_active: true,
                    last_checked: None,
                })
                .await?;
            summary.device_created = true;
        }
    }

    for battery in &batteries {
        let existing = store
            .logs(&LogFilter {
                battery: Some(battery.id),
                limit: Some(1),
                ..LogFilter::default()
            })
            .await?;
        if existing.is_empty() {
            let current = sample_current(battery.current_status);
            store
                .insert_log(NewBatteryLog::snapshot(battery, current))
                .await?;
            summary.logs_created += 1;
        }
    }

    if let Some(second) = batteries.get(1) {
        let existing = store
            .alerts(&AlertFilter {
                battery: Some(second.id),
                alert_type: Some(AlertType::OverTemperature),
                limit: Some(1),
                ..AlertFilter::default()
            })
            .await?;
        if existing.is_empty() {
            service
                .create_alert(NewAlert {
                    battery: second.id,
                    alert_type: AlertType::OverTemperature,
                    alert_level: AlertLevel::Warning,
                    message: "Battery temperature is elevated".to_string(),
                    is_resolved: false,
                })
                .await?;
            summary.alert_created = true;
        }
    }

    tracing::info!(
        batteries_created = summary.batteries_created,
        device_created = summary.device_created,
        logs_created = summary.logs_created,
        alert_created = summary.alert_created,
        "sample data loaded"
    );
    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::{AlertThresholds, EventBus};
    use crate::persistence::{BatteryFilter, Store};

    fn service() -> BatteryService {
        BatteryService::new(
            Arc::new(Store::memory()),
            EventBus::new(16),
            AlertThresholds::default(),
            80.0,
        )
    }

    #[tokio::test]
    async fn seeds_the_sample_fleet() {
        let service = service();
        let Ok(summary) = load_sample_data(&service).await else {
            panic!("seed failed");
        };
        assert_eq!(
            summary,
            SeedSummary {
                batteries_created: 3,
                device_created: true,
                logs_created: 3,
                alert_created: true,
            }
        );

        let Ok(Some(device)) = service.store().device_by_serial("DEVICE-001").await else {
            panic!("device missing");
        };
        assert_eq!(device.batteries.len(), 2);

        let logs = service.logs(&LogFilter::default()).await.unwrap_or_default();
        let currents: BTreeSet<String> = logs.iter().map(|l| l.current.to_string()).collect();
        assert_eq!(
            currents,
            BTreeSet::from(["-2.5".to_string(), "2".to_string(), "0".to_string()])
        );
    }

    #[tokio::test]
    async fn second_run_creates_nothing() {
        let service = service();
        assert!(load_sample_data(&service).await.is_ok());
        let Ok(again) = load_sample_data(&service).await else {
            panic!("second seed failed");
        };
        assert_eq!(again, SeedSummary::default());

        let batteries = service
            .batteries(&BatteryFilter::default())
            .await
            .unwrap_or_default();
        assert_eq!(batteries.len(), 3);
        let alerts = service.unresolved_alerts().await.unwrap_or_default();
        assert_eq!(alerts.len(), 1);
    }
}
