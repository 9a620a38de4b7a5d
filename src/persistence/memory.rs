//! In-process store with the same semantics as the PostgreSQL backend.
//!
//! [`MemoryStore`] keeps every table in an ordered map behind one
//! [`tokio::sync::RwLock`]. Reads run concurrently; each write holds the
//! lock for the whole operation, so uniqueness and foreign-key checks,
//! cascades and id assignment are atomic.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use tokio::sync::RwLock;

use super::query::{AlertFilter, BatteryFilter, DeviceFilter, LogFilter};
use super::{StatusRecord, battery_conflict, device_conflict, missing_battery_ref};
use crate::domain::{
    AlertId, Battery, BatteryAlert, BatteryDevice, BatteryId, BatteryLog, DeviceId, LogId,
    NewAlert, NewBattery, NewBatteryLog, NewDevice,
};
use crate::error::MonitorError;

#[derive(Debug, Default)]
struct Tables {
    batteries: BTreeMap<BatteryId, Battery>,
    alerts: BTreeMap<AlertId, BatteryAlert>,
    logs: BTreeMap<LogId, BatteryLog>,
    devices: BTreeMap<DeviceId, BatteryDevice>,
    last_battery_id: i64,
    last_alert_id: i64,
    last_log_id: i64,
    last_device_id: i64,
}

impl Tables {
    fn serial_of(&self, battery: BatteryId) -> Result<String, MonitorError> {
        self.batteries
            .get(&battery)
            .map(|b| b.serial_number.clone())
            .ok_or_else(|| missing_battery_ref(battery))
    }

    fn battery_serial_taken(&self, serial: &str, except: Option<BatteryId>) -> bool {
        self.batteries
            .values()
            .any(|b| b.serial_number == serial && Some(b.id) != except)
    }

    fn device_serial_taken(&self, serial: &str, except: Option<DeviceId>) -> bool {
        self.devices
            .values()
            .any(|d| d.serial_number == serial && Some(d.id) != except)
    }

    fn check_battery_refs(&self, ids: &BTreeSet<BatteryId>) -> Result<(), MonitorError> {
        match ids.iter().find(|id| !self.batteries.contains_key(id)) {
            Some(missing) => Err(missing_battery_ref(*missing)),
            None => Ok(()),
        }
    }

    fn write_battery(&mut self, battery: &Battery) -> Result<Battery, MonitorError> {
        let Some(created_at) = self.batteries.get(&battery.id).map(|b| b.created_at) else {
            return Err(MonitorError::BatteryNotFound(battery.id.get()));
        };
        if self.battery_serial_taken(&battery.serial_number, Some(battery.id)) {
            return Err(battery_conflict());
        }
        let mut saved = battery.clone();
        saved.created_at = created_at;
        saved.last_updated = Utc::now();
        self.batteries.insert(saved.id, saved.clone());
        Ok(saved)
    }

    fn append_alert(&mut self, new: NewAlert) -> Result<BatteryAlert, MonitorError> {
        let serial = self.serial_of(new.battery)?;
        self.last_alert_id += 1;
        let alert = new.into_alert(AlertId::new(self.last_alert_id), serial, Utc::now());
        self.alerts.insert(alert.id, alert.clone());
        Ok(alert)
    }

    fn append_log(&mut self, new: NewBatteryLog) -> Result<BatteryLog, MonitorError> {
        let serial = self.serial_of(new.battery)?;
        self.last_log_id += 1;
        let log = new.into_log(LogId::new(self.last_log_id), serial, Utc::now());
        self.logs.insert(log.id, log.clone());
        Ok(log)
    }

    /// Alerts and logs carry the serial number of their battery as of the
    /// read, not as of their insertion.
    fn hydrate_alert(&self, alert: &BatteryAlert) -> BatteryAlert {
        let mut alert = alert.clone();
        if let Some(battery) = self.batteries.get(&alert.battery) {
            alert.battery_serial.clone_from(&battery.serial_number);
        }
        alert
    }

    fn hydrate_log(&self, log: &BatteryLog) -> BatteryLog {
        let mut log = log.clone();
        if let Some(battery) = self.batteries.get(&log.battery) {
            log.battery_serial.clone_from(&battery.serial_number);
        }
        log
    }
}

/// Central in-process store for all records.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ── Batteries ───────────────────────────────────────────────────────

    /// Inserts a battery.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Conflict`] if the serial number is taken.
    pub async fn insert_battery(&self, new: NewBattery) -> Result<Battery, MonitorError> {
        let mut tables = self.tables.write().await;
        if tables.battery_serial_taken(&new.serial_number, None) {
            return Err(battery_conflict());
        }
        tables.last_battery_id += 1;
        let battery = new.into_battery(BatteryId::new(tables.last_battery_id), Utc::now());
        tables.batteries.insert(battery.id, battery.clone());
        Ok(battery)
    }

    /// Fetches one battery.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::BatteryNotFound`] if it does not exist.
    pub async fn battery(&self, id: BatteryId) -> Result<Battery, MonitorError> {
        self.tables
            .read()
            .await
            .batteries
            .get(&id)
            .cloned()
            .ok_or(MonitorError::BatteryNotFound(id.get()))
    }

    /// Looks a battery up by serial number.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the PostgreSQL backend.
    pub async fn battery_by_serial(&self, serial: &str) -> Result<Option<Battery>, MonitorError> {
        Ok(self
            .tables
            .read()
            .await
            .batteries
            .values()
            .find(|b| b.serial_number == serial)
            .cloned())
    }

    /// Lists batteries matching `filter`.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the PostgreSQL backend.
    pub async fn batteries(&self, filter: &BatteryFilter) -> Result<Vec<Battery>, MonitorError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Battery> = tables
            .batteries
            .values()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();
        rows.sort_by(|a, b| filter.sort.compare(a, b));
        Ok(rows)
    }

    /// Fetches the given batteries, in id order. Unknown ids are skipped.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the PostgreSQL backend.
    pub async fn batteries_by_ids(
        &self,
        ids: &BTreeSet<BatteryId>,
    ) -> Result<Vec<Battery>, MonitorError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.batteries.get(id).cloned())
            .collect())
    }

    /// Writes every column of an existing battery and refreshes
    /// `last_updated`.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::BatteryNotFound`] or
    /// [`MonitorError::Conflict`].
    pub async fn save_battery(&self, battery: &Battery) -> Result<Battery, MonitorError> {
        self.tables.write().await.write_battery(battery)
    }

    /// Saves `battery`, then appends `log` and `alerts`, under one write
    /// lock. Every reference is checked before anything is written.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::BatteryNotFound`], [`MonitorError::Conflict`]
    /// or [`MonitorError::InvalidRequest`]; nothing is written on error.
    pub async fn record_status(
        &self,
        battery: &Battery,
        log: NewBatteryLog,
        alerts: Vec<NewAlert>,
    ) -> Result<StatusRecord, MonitorError> {
        let mut tables = self.tables.write().await;
        let refs: BTreeSet<BatteryId> = std::iter::once(log.battery)
            .chain(alerts.iter().map(|a| a.battery))
            .filter(|id| *id != battery.id)
            .collect();
        tables.check_battery_refs(&refs)?;

        let battery = tables.write_battery(battery)?;
        let log = tables.append_log(log)?;
        let alerts = alerts
            .into_iter()
            .map(|new| tables.append_alert(new))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(StatusRecord {
            battery,
            log,
            alerts,
        })
    }

    /// Deletes a battery with its alerts and logs, and detaches it from
    /// every device.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::BatteryNotFound`] if it does not exist.
    pub async fn delete_battery(&self, id: BatteryId) -> Result<(), MonitorError> {
        let mut tables = self.tables.write().await;
        if tables.batteries.remove(&id).is_none() {
            return Err(MonitorError::BatteryNotFound(id.get()));
        }
        tables.alerts.retain(|_, a| a.battery != id);
        tables.logs.retain(|_, l| l.battery != id);
        for device in tables.devices.values_mut() {
            device.batteries.remove(&id);
        }
        Ok(())
    }

    // ── Alerts ──────────────────────────────────────────────────────────

    /// Inserts an alert.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidRequest`] if the battery does not
    /// exist.
    pub async fn insert_alert(&self, new: NewAlert) -> Result<BatteryAlert, MonitorError> {
        self.tables.write().await.append_alert(new)
    }

    /// Fetches one alert.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::AlertNotFound`] if it does not exist.
    pub async fn alert(&self, id: AlertId) -> Result<BatteryAlert, MonitorError> {
        let tables = self.tables.read().await;
        tables
            .alerts
            .get(&id)
            .map(|a| tables.hydrate_alert(a))
            .ok_or(MonitorError::AlertNotFound(id.get()))
    }

    /// Lists alerts matching `filter`.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the PostgreSQL backend.
    pub async fn alerts(&self, filter: &AlertFilter) -> Result<Vec<BatteryAlert>, MonitorError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<BatteryAlert> = tables
            .alerts
            .values()
            .map(|a| tables.hydrate_alert(a))
            .filter(|a| filter.matches(a))
            .collect();
        rows.sort_by(|a, b| filter.sort.compare(a, b));
        if let Some(limit) = filter.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    /// Writes every writable column of an existing alert.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::AlertNotFound`], or
    /// [`MonitorError::InvalidRequest`] if the battery does not exist.
    pub async fn save_alert(&self, alert: &BatteryAlert) -> Result<BatteryAlert, MonitorError> {
        let mut tables = self.tables.write().await;
        let Some(created_at) = tables.alerts.get(&alert.id).map(|a| a.created_at) else {
            return Err(MonitorError::AlertNotFound(alert.id.get()));
        };
        let serial = tables.serial_of(alert.battery)?;
        let mut saved = alert.clone();
        saved.created_at = created_at;
        saved.battery_serial = serial;
        tables.alerts.insert(saved.id, saved.clone());
        Ok(saved)
    }

    /// Deletes an alert.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::AlertNotFound`] if it does not exist.
    pub async fn delete_alert(&self, id: AlertId) -> Result<(), MonitorError> {
        self.tables
            .write()
            .await
            .alerts
            .remove(&id)
            .map(|_| ())
            .ok_or(MonitorError::AlertNotFound(id.get()))
    }

    // ── Logs ────────────────────────────────────────────────────────────

    /// Appends a log entry.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidRequest`] if the battery does not
    /// exist.
    pub async fn insert_log(&self, new: NewBatteryLog) -> Result<BatteryLog, MonitorError> {
        self.tables.write().await.append_log(new)
    }

    /// Fetches one log entry.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::LogNotFound`] if it does not exist.
    pub async fn log(&self, id: LogId) -> Result<BatteryLog, MonitorError> {
        let tables = self.tables.read().await;
        tables
            .logs
            .get(&id)
            .map(|l| tables.hydrate_log(l))
            .ok_or(MonitorError::LogNotFound(id.get()))
    }

    /// Lists log entries matching `filter`.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the PostgreSQL backend.
    pub async fn logs(&self, filter: &LogFilter) -> Result<Vec<BatteryLog>, MonitorError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<BatteryLog> = tables
            .logs
            .values()
            .map(|l| tables.hydrate_log(l))
            .filter(|l| filter.matches(l))
            .collect();
        rows.sort_by(|a, b| filter.sort.compare(a, b));
        if let Some(limit) = filter.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    // ── Devices ─────────────────────────────────────────────────────────

    /// Inserts a device.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Conflict`] if the serial number is taken, or
    /// [`MonitorError::InvalidRequest`] if a battery does not exist.
    pub async fn insert_device(&self, new: NewDevice) -> Result<BatteryDevice, MonitorError> {
        let mut tables = self.tables.write().await;
        if tables.device_serial_taken(&new.serial_number, None) {
            return Err(device_conflict());
        }
        tables.check_battery_refs(&new.batteries)?;
        tables.last_device_id += 1;
        let device = new.into_device(DeviceId::new(tables.last_device_id), Utc::now());
        tables.devices.insert(device.id, device.clone());
        Ok(device)
    }

    /// Fetches one device.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::DeviceNotFound`] if it does not exist.
    pub async fn device(&self, id: DeviceId) -> Result<BatteryDevice, MonitorError> {
        self.tables
            .read()
            .await
            .devices
            .get(&id)
            .cloned()
            .ok_or(MonitorError::DeviceNotFound(id.get()))
    }

    /// Looks a device up by serial number.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the PostgreSQL backend.
    pub async fn device_by_serial(
        &self,
        serial: &str,
    ) -> Result<Option<BatteryDevice>, MonitorError> {
        Ok(self
            .tables
            .read()
            .await
            .devices
            .values()
            .find(|d| d.serial_number == serial)
            .cloned())
    }

    /// Lists devices matching `filter`.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the PostgreSQL backend.
    pub async fn devices(&self, filter: &DeviceFilter) -> Result<Vec<BatteryDevice>, MonitorError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<BatteryDevice> = tables
            .devices
            .values()
            .filter(|d| filter.matches(d))
            .cloned()
            .collect();
        rows.sort_by(|a, b| filter.sort.compare(a, b));
        Ok(rows)
    }

    /// Writes every writable column of an existing device, replacing its
    /// battery set.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::DeviceNotFound`], [`MonitorError::Conflict`],
    /// or [`MonitorError::InvalidRequest`] if a battery does not exist.
    pub async fn save_device(&self, device: &BatteryDevice) -> Result<BatteryDevice, MonitorError> {
        let mut tables = self.tables.write().await;
        let Some(created_at) = tables.devices.get(&device.id).map(|d| d.created_at) else {
            return Err(MonitorError::DeviceNotFound(device.id.get()));
        };
        if tables.device_serial_taken(&device.serial_number, Some(device.id)) {
            return Err(device_conflict());
        }
        tables.check_battery_refs(&device.batteries)?;
        let mut saved = device.clone();
        saved.created_at = created_at;
        tables.devices.insert(saved.id, saved.clone());
        Ok(saved)
    }

    /// Deletes a device. Its batteries are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::DeviceNotFound`] if it does not exist.
    pub async fn delete_device(&self, id: DeviceId) -> Result<(), MonitorError> {
        self.tables
            .write()
            .await
            .devices
            .remove(&id)
            .map(|_| ())
            .ok_or(MonitorError::DeviceNotFound(id.get()))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::battery::fixtures::new_battery;
    use crate::domain::{AlertLevel, AlertType, DeviceType};
    use crate::persistence::query::{AlertOrder, Sort};

    async fn store_with(serials: &[&str]) -> (MemoryStore, Vec<Battery>) {
        let store = MemoryStore::new();
        let mut batteries = Vec::new();
        for serial in serials {
            let Ok(b) = store.insert_battery(new_battery(serial)).await else {
                panic!("insert failed");
            };
            batteries.push(b);
        }
        (store, batteries)
    }

    fn alert_for(battery: BatteryId, level: AlertLevel) -> NewAlert {
        NewAlert {
            battery,
            alert_type: AlertType::LowCharge,
            alert_level: level,
            message: "low".to_string(),
            is_resolved: false,
        }
    }

    #[tokio::test]
    async fn record_status_writes_all_three() {
        let (store, batteries) = store_with(&["A"]).await;
        let Some(original) = batteries.first() else {
            panic!("no battery");
        };
        let mut edited = original.clone();
        edited.current_charge = 5.0;
        let Ok(record) = store
            .record_status(
                &edited,
                NewBatteryLog::snapshot(&edited, 1.5),
                vec![alert_for(edited.id, AlertLevel::Warning)],
            )
            .await
        else {
            panic!("record failed");
        };
        assert!((record.battery.current_charge - 5.0).abs() < f64::EPSILON);
        assert_eq!(record.log.battery_serial, "A");
        assert_eq!(record.alerts.len(), 1);
        let logs = store.logs(&LogFilter::default()).await.unwrap_or_default();
        assert_eq!(logs.len(), 1);
    }

    #[tokio::test]
    async fn failed_record_status_writes_nothing() {
        let (store, batteries) = store_with(&["A"]).await;
        let Some(original) = batteries.first() else {
            panic!("no battery");
        };
        let mut edited = original.clone();
        edited.current_charge = 5.0;
        let result = store
            .record_status(
                &edited,
                NewBatteryLog::snapshot(&edited, 0.0),
                vec![alert_for(BatteryId::new(99), AlertLevel::Warning)],
            )
            .await;
        assert!(matches!(result, Err(MonitorError::InvalidRequest(_))));

        let Ok(stored) = store.battery(original.id).await else {
            panic!("battery missing");
        };
        assert!((stored.current_charge - original.current_charge).abs() < f64::EPSILON);
        assert!(store.logs(&LogFilter::default()).await.unwrap_or_default().is_empty());
        assert!(store.alerts(&AlertFilter::default()).await.unwrap_or_default().is_empty());
    }

    fn device_with(serial: &str, batteries: &[BatteryId]) -> NewDevice {
        NewDevice {
            device_name: format!("Device {serial}"),
            device_type: DeviceType::Drone,
            serial_number: serial.to_string(),
            location: String::new(),
            batteries: batteries.iter().copied().collect(),
            is_active: true,
            last_checked: None,
        }
    }

    #[tokio::test]
    async fn ids_are_sequential_from_one() {
        let (_, batteries) = store_with(&["A", "B"]).await;
        let ids: Vec<i64> = batteries.iter().map(|b| b.id.get()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn duplicate_serial_conflicts() {
        let (store, _) = store_with(&["A"]).await;
        let result = store.insert_battery(new_battery("A")).await;
        assert!(matches!(result, Err(MonitorError::Conflict(_))));
    }

    #[tokio::test]
    async fn save_refreshes_last_updated_and_keeps_created_at() {
        let (store, batteries) = store_with(&["A"]).await;
        let Some(original) = batteries.first() else {
            panic!("no battery");
        };
        let mut edited = original.clone();
        edited.current_charge = 40.0;
        edited.created_at = Utc::now() + chrono::Duration::days(1);

        let Ok(saved) = store.save_battery(&edited).await else {
            panic!("save failed");
        };
        assert_eq!(saved.created_at, original.created_at);
        assert!(saved.last_updated >= original.last_updated);
        assert!((saved.current_charge - 40.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn renaming_onto_existing_serial_conflicts() {
        let (store, batteries) = store_with(&["A", "B"]).await;
        let Some(b) = batteries.get(1) else {
            panic!("no battery");
        };
        let mut edited = b.clone();
        edited.serial_number = "A".to_string();
        assert!(matches!(
            store.save_battery(&edited).await,
            Err(MonitorError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn alert_requires_existing_battery() {
        let store = MemoryStore::new();
        let result = store
            .insert_alert(alert_for(BatteryId::new(99), AlertLevel::Info))
            .await;
        assert!(matches!(result, Err(MonitorError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn alert_serial_follows_battery_rename() {
        let (store, batteries) = store_with(&["A"]).await;
        let Some(b) = batteries.first() else {
            panic!("no battery");
        };
        let Ok(alert) = store.insert_alert(alert_for(b.id, AlertLevel::Info)).await else {
            panic!("insert failed");
        };
        let mut renamed = b.clone();
        renamed.serial_number = "A-2".to_string();
        let _ = store.save_battery(&renamed).await;

        let Ok(fetched) = store.alert(alert.id).await else {
            panic!("alert missing");
        };
        assert_eq!(fetched.battery_serial, "A-2");
    }

    #[tokio::test]
    async fn deleting_battery_cascades() {
        let (store, batteries) = store_with(&["A", "B"]).await;
        let (Some(a), Some(b)) = (batteries.first(), batteries.get(1)) else {
            panic!("no batteries");
        };
        let _ = store.insert_alert(alert_for(a.id, AlertLevel::Info)).await;
        let _ = store.insert_log(NewBatteryLog::snapshot(a, 0.0)).await;
        let Ok(device) = store.insert_device(device_with("D", &[a.id, b.id])).await else {
            panic!("device insert failed");
        };

        assert!(store.delete_battery(a.id).await.is_ok());

        let alerts = store.alerts(&AlertFilter::default()).await.unwrap_or_default();
        assert!(alerts.is_empty());
        let logs = store.logs(&LogFilter::default()).await.unwrap_or_default();
        assert!(logs.is_empty());
        let Ok(device) = store.device(device.id).await else {
            panic!("device missing");
        };
        assert_eq!(device.batteries, BTreeSet::from([b.id]));
    }

    #[tokio::test]
    async fn device_rejects_unknown_battery() {
        let store = MemoryStore::new();
        let result = store
            .insert_device(device_with("D", &[BatteryId::new(5)]))
            .await;
        assert!(matches!(result, Err(MonitorError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn alerts_sort_by_severity_and_limit() {
        let (store, batteries) = store_with(&["A"]).await;
        let Some(a) = batteries.first() else {
            panic!("no battery");
        };
        for level in [AlertLevel::Warning, AlertLevel::Critical, AlertLevel::Info] {
            let _ = store.insert_alert(alert_for(a.id, level)).await;
        }
        let filter = AlertFilter {
            sort: Sort::desc(AlertOrder::AlertLevel),
            limit: Some(2),
            ..AlertFilter::default()
        };
        let levels: Vec<AlertLevel> = store
            .alerts(&filter)
            .await
            .unwrap_or_default()
            .into_iter()
            .map(|a| a.alert_level)
            .collect();
        assert_eq!(levels, vec![AlertLevel::Critical, AlertLevel::Warning]);
    }

    #[tokio::test]
    async fn logs_newest_first_by_default() {
        let (store, batteries) = store_with(&["A"]).await;
        let Some(a) = batteries.first() else {
            panic!("no battery");
        };
        for current in [1.0, 2.0, 3.0] {
            let _ = store.insert_log(NewBatteryLog::snapshot(a, current)).await;
        }
        let ids: Vec<i64> = store
            .logs(&LogFilter::default())
            .await
            .unwrap_or_default()
            .into_iter()
            .map(|l| l.id.get())
            .collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn missing_records_are_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.battery(BatteryId::new(1)).await,
            Err(MonitorError::BatteryNotFound(1))
        ));
        assert!(matches!(
            store.log(LogId::new(1)).await,
            Err(MonitorError::LogNotFound(1))
        ));
        assert!(matches!(
            store.delete_device(DeviceId::new(1)).await,
            Err(MonitorError::DeviceNotFound(1))
        ));
    }
}
