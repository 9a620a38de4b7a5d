//! Battery service: record lifecycle, status updates and alert raising.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::validation;
use crate::domain::{
    AlertChanges, AlertId, AlertThresholds, Battery, BatteryAlert, BatteryChanges, BatteryDevice,
    BatteryId, BatteryLog, BatteryStatus, DashboardEvent, DeviceChanges, DeviceId, EventBus,
    LogId, NewAlert, NewBattery, NewBatteryLog, NewDevice, StatusReadings,
};
use crate::error::MonitorError;
use crate::persistence::{AlertFilter, BatteryFilter, DeviceFilter, LogFilter, Store};

/// How many log entries a health report includes.
pub const HEALTH_REPORT_READINGS: usize = 100;

/// Health report of a single battery.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthReport {
    /// The battery as currently stored.
    pub battery: Battery,
    /// Unresolved alerts of the battery, newest first.
    pub recent_alerts: Vec<BatteryAlert>,
    /// The most recent log entries, newest first.
    pub recent_readings: Vec<BatteryLog>,
    /// Mean temperature over `recent_readings`, 0 when there are none.
    pub average_temperature: f64,
}

/// A device together with the full records of its batteries.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeviceDetail {
    /// The device row; `batteries` holds the ids.
    #[serde(flatten)]
    pub device: BatteryDevice,
    /// The batteries referenced by `device.batteries`, in id order.
    pub batteries_detail: Vec<Battery>,
}

/// Status of every battery installed in a device.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeviceBatteryStatus {
    /// The device.
    pub device: DeviceDetail,
    /// Its batteries, in id order.
    pub batteries: Vec<Battery>,
}

/// Orchestration layer for batteries, alerts, logs and devices.
///
/// Every mutation follows the same sequence: validate, write through the
/// [`Store`], publish a [`DashboardEvent`] for battery and alert saves,
/// then log the outcome.
#[derive(Debug, Clone)]
pub struct BatteryService {
    store: Arc<Store>,
    event_bus: EventBus,
    thresholds: AlertThresholds,
    low_health_threshold: f64,
}

impl BatteryService {
    /// Creates a new `BatteryService`.
    #[must_use]
    pub fn new(
        store: Arc<Store>,
        event_bus: EventBus,
        thresholds: AlertThresholds,
        low_health_threshold: f64,
    ) -> Self {
        Self {
            store,
            event_bus,
            thresholds,
            low_health_threshold,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a reference to the inner [`Store`].
    #[must_use]
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    // ── Batteries ───────────────────────────────────────────────────────

    /// Creates a battery.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidField`] or [`MonitorError::Conflict`].
    pub async fn create_battery(&self, new: NewBattery) -> Result<Battery, MonitorError> {
        new.validate()?;
        let battery = self.store.insert_battery(new).await?;
        self.publish_battery(&battery, true);
        tracing::info!(battery_id = %battery.id, serial = %battery.serial_number, "battery created");
        Ok(battery)
    }

    /// Fetches one battery.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::BatteryNotFound`] if it does not exist.
    pub async fn battery(&self, id: BatteryId) -> Result<Battery, MonitorError> {
        self.store.battery(id).await
    }

    /// Lists batteries.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::PersistenceError`] on store failure.
    pub async fn batteries(&self, filter: &BatteryFilter) -> Result<Vec<Battery>, MonitorError> {
        self.store.batteries(filter).await
    }

    /// Applies `changes` to a battery and saves it.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::BatteryNotFound`],
    /// [`MonitorError::InvalidField`] or [`MonitorError::Conflict`].
    pub async fn update_battery(
        &self,
        id: BatteryId,
        changes: BatteryChanges,
    ) -> Result<Battery, MonitorError> {
        let mut battery = self.store.battery(id).await?;
        changes.apply(&mut battery);
        battery.validate()?;
        let saved = self.store.save_battery(&battery).await?;
        self.publish_battery(&saved, false);
        tracing::info!(battery_id = %id, "battery updated");
        Ok(saved)
    }

    /// Deletes a battery with its alerts and logs.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::BatteryNotFound`] if it does not exist.
    pub async fn delete_battery(&self, id: BatteryId) -> Result<(), MonitorError> {
        self.store.delete_battery(id).await?;
        tracing::info!(battery_id = %id, "battery deleted");
        Ok(())
    }

    /// Records new readings: saves the battery, appends a log entry and
    /// raises one alert per threshold the new readings violate. The three
    /// writes are stored together; events go out once they are.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::BatteryNotFound`] or
    /// [`MonitorError::InvalidField`]; nothing is written on error.
    pub async fn update_status(
        &self,
        id: BatteryId,
        readings: StatusReadings,
    ) -> Result<Battery, MonitorError> {
        let current = readings.current.unwrap_or(0.0);
        validation::finite("current", current)?;
        let mut battery = self.store.battery(id).await?;
        readings.apply(&mut battery);
        battery.validate()?;

        let drafts: Vec<NewAlert> = self
            .thresholds
            .evaluate(&battery)
            .into_iter()
            .map(|draft| draft.for_battery(id))
            .collect();
        let record = self
            .store
            .record_status(&battery, NewBatteryLog::snapshot(&battery, current), drafts)
            .await?;

        self.publish_battery(&record.battery, false);
        for alert in &record.alerts {
            self.publish_alert(alert, true);
            tracing::warn!(
                battery_id = %id,
                alert_id = %alert.id,
                alert_type = %alert.alert_type,
                alert_level = %alert.alert_level,
                "alert raised"
            );
        }

        tracing::info!(
            battery_id = %id,
            log_id = %record.log.id,
            charge = record.battery.current_charge,
            status = %record.battery.current_status,
            alerts = record.alerts.len(),
            "battery status updated"
        );
        Ok(record.battery)
    }

    /// Builds the health report of a battery.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::BatteryNotFound`] if it does not exist.
    pub async fn health_report(&self, id: BatteryId) -> Result<HealthReport, MonitorError> {
        let battery = self.store.battery(id).await?;
        let recent_alerts = self
            .store
            .alerts(&AlertFilter {
                battery: Some(id),
                is_resolved: Some(false),
                ..AlertFilter::default()
            })
            .await?;
        let recent_readings = self
            .store
            .logs(&LogFilter {
                battery: Some(id),
                limit: Some(HEALTH_REPORT_READINGS),
                ..LogFilter::default()
            })
            .await?;
        let average_temperature = mean(recent_readings.iter().map(|l| l.temperature));

        Ok(HealthReport {
            battery,
            recent_alerts,
            recent_readings,
            average_temperature,
        })
    }

    /// Batteries whose health is strictly below `threshold`, or below the
    /// configured default when `threshold` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidField`] if `threshold` is not finite.
    pub async fn low_health(&self, threshold: Option<f64>) -> Result<Vec<Battery>, MonitorError> {
        let threshold = threshold.unwrap_or(self.low_health_threshold);
        validation::finite("threshold", threshold)?;
        self.store
            .batteries(&BatteryFilter {
                health_below: Some(threshold),
                ..BatteryFilter::default()
            })
            .await
    }

    /// Batteries in the `FAULT` state.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::PersistenceError`] on store failure.
    pub async fn critical_status(&self) -> Result<Vec<Battery>, MonitorError> {
        self.store
            .batteries(&BatteryFilter {
                status: Some(BatteryStatus::Fault),
                ..BatteryFilter::default()
            })
            .await
    }

    // ── Alerts ──────────────────────────────────────────────────────────

    /// Creates an alert.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidField`], or
    /// [`MonitorError::InvalidRequest`] if the battery does not exist.
    pub async fn create_alert(&self, new: NewAlert) -> Result<BatteryAlert, MonitorError> {
        new.validate()?;
        let alert = self.store.insert_alert(new).await?;
        self.publish_alert(&alert, true);
        tracing::info!(alert_id = %alert.id, battery_id = %alert.battery, "alert created");
        Ok(alert)
    }

    /// Fetches one alert.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::AlertNotFound`] if it does not exist.
    pub async fn alert(&self, id: AlertId) -> Result<BatteryAlert, MonitorError> {
        self.store.alert(id).await
    }

    /// Lists alerts.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::PersistenceError`] on store failure.
    pub async fn alerts(&self, filter: &AlertFilter) -> Result<Vec<BatteryAlert>, MonitorError> {
        self.store.alerts(filter).await
    }

    /// Applies `changes` to an alert and saves it.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::AlertNotFound`],
    /// [`MonitorError::InvalidField`] or [`MonitorError::InvalidRequest`].
    pub async fn update_alert(
        &self,
        id: AlertId,
        changes: AlertChanges,
    ) -> Result<BatteryAlert, MonitorError> {
        let mut alert = self.store.alert(id).await?;
        changes.apply(&mut alert, Utc::now());
        alert.validate()?;
        let saved = self.store.save_alert(&alert).await?;
        self.publish_alert(&saved, false);
        tracing::info!(alert_id = %id, resolved = saved.is_resolved, "alert updated");
        Ok(saved)
    }

    /// Marks an alert resolved. Resolving twice keeps the first
    /// `resolved_at`.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::AlertNotFound`] if it does not exist.
    pub async fn resolve_alert(&self, id: AlertId) -> Result<BatteryAlert, MonitorError> {
        let mut alert = self.store.alert(id).await?;
        alert.set_resolved(true, Utc::now());
        let saved = self.store.save_alert(&alert).await?;
        self.publish_alert(&saved, false);
        tracing::info!(alert_id = %id, "alert resolved");
        Ok(saved)
    }

    /// Every unresolved alert, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::PersistenceError`] on store failure.
    pub async fn unresolved_alerts(&self) -> Result<Vec<BatteryAlert>, MonitorError> {
        self.store
            .alerts(&AlertFilter {
                is_resolved: Some(false),
                ..AlertFilter::default()
            })
            .await
    }

    /// Deletes an alert.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::AlertNotFound`] if it does not exist.
    pub async fn delete_alert(&self, id: AlertId) -> Result<(), MonitorError> {
        self.store.delete_alert(id).await?;
        tracing::info!(alert_id = %id, "alert deleted");
        Ok(())
    }

    // ── Logs ────────────────────────────────────────────────────────────

    /// Fetches one log entry.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::LogNotFound`] if it does not exist.
    pub async fn log(&self, id: LogId) -> Result<BatteryLog, MonitorError> {
        self.store.log(id).await
    }

    /// Lists log entries.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::PersistenceError`] on store failure.
    pub async fn logs(&self, filter: &LogFilter) -> Result<Vec<BatteryLog>, MonitorError> {
        self.store.logs(filter).await
    }

    // ── Devices ─────────────────────────────────────────────────────────

    /// Creates a device.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidField`], [`MonitorError::Conflict`],
    /// or [`MonitorError::InvalidRequest`] for an unknown battery.
    pub async fn create_device(&self, new: NewDevice) -> Result<DeviceDetail, MonitorError> {
        new.validate()?;
        let device = self.store.insert_device(new).await?;
        tracing::info!(device_id = %device.id, serial = %device.serial_number, "device created");
        self.detail(device).await
    }

    /// Fetches one device with its batteries.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::DeviceNotFound`] if it does not exist.
    pub async fn device(&self, id: DeviceId) -> Result<DeviceDetail, MonitorError> {
        let device = self.store.device(id).await?;
        self.detail(device).await
    }

    /// Lists devices with their batteries.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::PersistenceError`] on store failure.
    pub async fn devices(&self, filter: &DeviceFilter) -> Result<Vec<DeviceDetail>, MonitorError> {
        let devices = self.store.devices(filter).await?;
        let wanted: BTreeSet<BatteryId> = devices
            .iter()
            .flat_map(|d| d.batteries.iter().copied())
            .collect();
        let by_id: BTreeMap<BatteryId, Battery> = self
            .store
            .batteries_by_ids(&wanted)
            .await?
            .into_iter()
            .map(|b| (b.id, b))
            .collect();

        Ok(devices
            .into_iter()
            .map(|device| {
                let batteries_detail = device
                    .batteries
                    .iter()
                    .filter_map(|id| by_id.get(id).cloned())
                    .collect();
                DeviceDetail {
                    device,
                    batteries_detail,
                }
            })
            .collect())
    }

    /// Applies `changes` to a device and saves it.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::DeviceNotFound`],
    /// [`MonitorError::InvalidField`], [`MonitorError::Conflict`] or
    /// [`MonitorError::InvalidRequest`].
    pub async fn update_device(
        &self,
        id: DeviceId,
        changes: DeviceChanges,
    ) -> Result<DeviceDetail, MonitorError> {
        let mut device = self.store.device(id).await?;
        changes.apply(&mut device);
        device.validate()?;
        let saved = self.store.save_device(&device).await?;
        tracing::info!(device_id = %id, batteries = saved.batteries.len(), "device updated");
        self.detail(saved).await
    }

    /// Deletes a device. Its batteries are kept.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::DeviceNotFound`] if it does not exist.
    pub async fn delete_device(&self, id: DeviceId) -> Result<(), MonitorError> {
        self.store.delete_device(id).await?;
        tracing::info!(device_id = %id, "device deleted");
        Ok(())
    }

    /// The device together with the current state of its batteries.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::DeviceNotFound`] if it does not exist.
    pub async fn device_battery_status(
        &self,
        id: DeviceId,
    ) -> Result<DeviceBatteryStatus, MonitorError> {
        let device = self.device(id).await?;
        let batteries = device.batteries_detail.clone();
        Ok(DeviceBatteryStatus { device, batteries })
    }

    async fn detail(&self, device: BatteryDevice) -> Result<DeviceDetail, MonitorError> {
        let batteries_detail = self.store.batteries_by_ids(&device.batteries).await?;
        Ok(DeviceDetail {
            device,
            batteries_detail,
        })
    }

    fn publish_battery(&self, battery: &Battery, created: bool) {
        let receivers = self.event_bus.publish(DashboardEvent::battery(battery, created));
        tracing::debug!(battery_id = %battery.id, receivers, "battery_update published");
    }

    fn publish_alert(&self, alert: &BatteryAlert, created: bool) {
        let receivers = self.event_bus.publish(DashboardEvent::alert(alert, created));
        tracing::debug!(alert_id = %alert.id, receivers, "alert_update published");
    }
}

/// Arithmetic mean, 0 for an empty sequence.
pub(crate) fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0_u32), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / f64::from(count)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::battery::fixtures::new_battery;
    use crate::domain::{AlertLevel, AlertType, DeviceType};

    fn service() -> BatteryService {
        BatteryService::new(
            Arc::new(Store::memory()),
            EventBus::new(64),
            AlertThresholds::default(),
            80.0,
        )
    }

    async fn created(service: &BatteryService, serial: &str) -> Battery {
        let Ok(battery) = service.create_battery(new_battery(serial)).await else {
            panic!("create failed");
        };
        battery
    }

    #[tokio::test]
    async fn create_publishes_created_event() {
        let service = service();
        let mut rx = service.event_bus().subscribe();
        let battery = created(&service, "BAT-1").await;

        let Ok(DashboardEvent::BatteryUpdate { battery: sent, created }) = rx.recv().await else {
            panic!("expected battery_update");
        };
        assert!(created);
        assert_eq!(sent.id, battery.id);
    }

    #[tokio::test]
    async fn invalid_charge_is_rejected_before_write() {
        let service = service();
        let mut nb = new_battery("BAT-1");
        nb.current_charge = 101.0;
        assert!(matches!(
            service.create_battery(nb).await,
            Err(MonitorError::InvalidField { field: "current_charge", .. })
        ));
        let all = service.batteries(&BatteryFilter::default()).await.unwrap_or_default();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn update_status_logs_and_raises_alerts() {
        let service = service();
        let battery = created(&service, "BAT-1").await;

        let readings = StatusReadings {
            current_charge: Some(5.0),
            current_temperature: Some(55.0),
            current: Some(-2.5),
            ..StatusReadings::default()
        };
        let Ok(saved) = service.update_status(battery.id, readings).await else {
            panic!("status update failed");
        };
        assert!((saved.current_charge - 5.0).abs() < f64::EPSILON);

        let logs = service.logs(&LogFilter::default()).await.unwrap_or_default();
        let Some(log) = logs.first() else {
            panic!("expected a log entry");
        };
        assert_eq!(logs.len(), 1);
        assert!((log.current + 2.5).abs() < f64::EPSILON);
        assert_eq!(log.status, "DISCHARGING");

        let mut types: Vec<AlertType> = service
            .unresolved_alerts()
            .await
            .unwrap_or_default()
            .into_iter()
            .map(|a| a.alert_type)
            .collect();
        types.sort_by_key(|t| t.as_str());
        assert_eq!(types, vec![AlertType::LowCharge, AlertType::OverTemperature]);
    }

    #[tokio::test]
    async fn update_status_event_order() {
        let service = service();
        let battery = created(&service, "BAT-1").await;
        let mut rx = service.event_bus().subscribe();

        let readings = StatusReadings {
            current_charge: Some(3.0),
            ..StatusReadings::default()
        };
        assert!(service.update_status(battery.id, readings).await.is_ok());

        let Ok(first) = rx.recv().await else {
            panic!("missing battery event");
        };
        assert_eq!(first.event_type_str(), "battery_update");
        assert!(!first.is_created());
        let Ok(second) = rx.recv().await else {
            panic!("missing alert event");
        };
        assert_eq!(second.event_type_str(), "alert_update");
        assert!(second.is_created());
    }

    #[tokio::test]
    async fn invalid_status_update_writes_nothing() {
        let service = service();
        let battery = created(&service, "BAT-1").await;
        let readings = StatusReadings {
            current_charge: Some(-1.0),
            ..StatusReadings::default()
        };
        assert!(service.update_status(battery.id, readings).await.is_err());
        let logs = service.logs(&LogFilter::default()).await.unwrap_or_default();
        assert!(logs.is_empty());
    }

    #[tokio::test]
    async fn health_report_averages_recent_temperatures() {
        let service = service();
        let battery = created(&service, "BAT-1").await;
        for t in [20.0, 30.0] {
            let readings = StatusReadings {
                current_temperature: Some(t),
                ..StatusReadings::default()
            };
            assert!(service.update_status(battery.id, readings).await.is_ok());
        }
        let Ok(report) = service.health_report(battery.id).await else {
            panic!("report failed");
        };
        assert_eq!(report.recent_readings.len(), 2);
        assert!((report.average_temperature - 25.0).abs() < 1e-9);
        assert!(report.recent_alerts.is_empty());
    }

    #[tokio::test]
    async fn health_report_keeps_the_newest_readings() {
        let service = service();
        let battery = created(&service, "BAT-1").await;
        let mut oldest = NewBatteryLog::snapshot(&battery, 0.0);
        oldest.temperature = 90.0;
        assert!(service.store().insert_log(oldest).await.is_ok());
        for _ in 0..HEALTH_REPORT_READINGS {
            let mut snapshot = NewBatteryLog::snapshot(&battery, 0.0);
            snapshot.temperature = 20.0;
            assert!(service.store().insert_log(snapshot).await.is_ok());
        }
        let Ok(report) = service.health_report(battery.id).await else {
            panic!("report failed");
        };
        assert_eq!(report.recent_readings.len(), HEALTH_REPORT_READINGS);
        assert!(report.recent_readings.iter().all(|l| l.temperature > 19.0 && l.temperature < 21.0));
        assert!((report.average_temperature - 20.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn health_report_without_logs_averages_zero() {
        let service = service();
        let battery = created(&service, "BAT-1").await;
        let Ok(report) = service.health_report(battery.id).await else {
            panic!("report failed");
        };
        assert!(report.average_temperature.abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn low_health_uses_default_and_override() {
        let service = service();
        let mut worn = new_battery("WORN");
        worn.health_percentage = 70.0;
        assert!(service.create_battery(worn).await.is_ok());
        created(&service, "FRESH").await;

        let default = service.low_health(None).await.unwrap_or_default();
        assert_eq!(default.len(), 1);
        let strict = service.low_health(Some(70.0)).await.unwrap_or_default();
        assert!(strict.is_empty());
        assert!(service.low_health(Some(f64::NAN)).await.is_err());
    }

    #[tokio::test]
    async fn resolve_keeps_first_timestamp() {
        let service = service();
        let battery = created(&service, "BAT-1").await;
        let Ok(alert) = service
            .create_alert(NewAlert {
                battery: battery.id,
                alert_type: AlertType::Fault,
                alert_level: AlertLevel::Error,
                message: "fault".to_string(),
                is_resolved: false,
            })
            .await
        else {
            panic!("alert create failed");
        };
        let Ok(first) = service.resolve_alert(alert.id).await else {
            panic!("resolve failed");
        };
        let Ok(second) = service.resolve_alert(alert.id).await else {
            panic!("resolve failed");
        };
        assert!(first.resolved_at.is_some());
        assert_eq!(first.resolved_at, second.resolved_at);

        let Ok(reopened) = service
            .update_alert(
                alert.id,
                AlertChanges {
                    is_resolved: Some(false),
                    ..AlertChanges::default()
                },
            )
            .await
        else {
            panic!("reopen failed");
        };
        assert!(reopened.resolved_at.is_none());
    }

    #[tokio::test]
    async fn device_detail_carries_batteries() {
        let service = service();
        let a = created(&service, "A").await;
        let b = created(&service, "B").await;
        let Ok(detail) = service
            .create_device(NewDevice {
                device_name: "Drone".to_string(),
                device_type: DeviceType::Drone,
                serial_number: "D-1".to_string(),
                location: String::new(),
                batteries: BTreeSet::from([a.id, b.id]),
                is_active: true,
                last_checked: None,
            })
            .await
        else {
            panic!("device create failed");
        };
        assert_eq!(detail.batteries_detail.len(), 2);

        let Ok(status) = service.device_battery_status(detail.device.id).await else {
            panic!("status failed");
        };
        let serials: Vec<&str> = status
            .batteries
            .iter()
            .map(|b| b.serial_number.as_str())
            .collect();
        assert_eq!(serials, vec!["A", "B"]);
    }

    #[test]
    fn mean_of_nothing_is_zero() {
        assert!(mean(std::iter::empty()).abs() < f64::EPSILON);
        assert!((mean([1.0, 2.0, 3.0].into_iter()) - 2.0).abs() < f64::EPSILON);
    }
}
