//! Persistence layer: batteries, alerts, logs and devices.
//!
//! [`Store`] is the single entry point used by the services. It forwards
//! to either the PostgreSQL backend or the in-process backend; both share
//! the filters in [`query`] and return the same errors for the same
//! conditions.

pub mod memory;
pub mod models;
pub mod postgres;
pub mod query;

use std::collections::BTreeSet;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use query::{AlertFilter, BatteryFilter, DeviceFilter, LogFilter, Sort};

use crate::domain::{
    AlertId, Battery, BatteryAlert, BatteryDevice, BatteryId, BatteryLog, DeviceId, LogId,
    NewAlert, NewBattery, NewBatteryLog, NewDevice,
};
use crate::error::MonitorError;

/// What [`Store::record_status`] wrote.
#[derive(Debug, Clone)]
pub struct StatusRecord {
    /// The saved battery.
    pub battery: Battery,
    /// The appended log entry.
    pub log: BatteryLog,
    /// Inserted alerts, in insertion order.
    pub alerts: Vec<BatteryAlert>,
}

/// Record storage backend.
#[derive(Debug)]
pub enum Store {
    /// PostgreSQL via `sqlx`.
    Postgres(PostgresStore),
    /// Process memory; contents are lost on exit.
    Memory(MemoryStore),
}

macro_rules! dispatch {
    ($self:ident.$method:ident($($arg:expr),*)) => {
        match $self {
            Store::Postgres(store) => store.$method($($arg),*).await,
            Store::Memory(store) => store.$method($($arg),*).await,
        }
    };
}

impl Store {
    /// An empty in-process store.
    #[must_use]
    pub fn memory() -> Self {
        Self::Memory(MemoryStore::new())
    }

    /// Backend name for logging.
    #[must_use]
    pub const fn backend(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }

    /// Inserts a battery.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Conflict`] if the serial number is taken.
    pub async fn insert_battery(&self, new: NewBattery) -> Result<Battery, MonitorError> {
        dispatch!(self.insert_battery(new))
    }

    /// Fetches one battery.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::BatteryNotFound`] if it does not exist.
    pub async fn battery(&self, id: BatteryId) -> Result<Battery, MonitorError> {
        dispatch!(self.battery(id))
    }

    /// Looks a battery up by serial number.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::PersistenceError`] on backend failure.
    pub async fn battery_by_serial(&self, serial: &str) -> Result<Option<Battery>, MonitorError> {
        dispatch!(self.battery_by_serial(serial))
    }

    /// Lists batteries matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::PersistenceError`] on backend failure.
    pub async fn batteries(&self, filter: &BatteryFilter) -> Result<Vec<Battery>, MonitorError> {
        dispatch!(self.batteries(filter))
    }

    /// Fetches the given batteries in id order, skipping unknown ids.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::PersistenceError`] on backend failure.
    pub async fn batteries_by_ids(
        &self,
        ids: &BTreeSet<BatteryId>,
    ) -> Result<Vec<Battery>, MonitorError> {
        dispatch!(self.batteries_by_ids(ids))
    }

    /// Saves every column of an existing battery and refreshes
    /// `last_updated`.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::BatteryNotFound`] or
    /// [`MonitorError::Conflict`].
    pub async fn save_battery(&self, battery: &Battery) -> Result<Battery, MonitorError> {
        dispatch!(self.save_battery(battery))
    }

    /// Saves a battery, appends its log entry and inserts its alerts as
    /// one unit: either all of them are stored or none is.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::BatteryNotFound`], [`MonitorError::Conflict`]
    /// or [`MonitorError::InvalidRequest`].
    pub async fn record_status(
        &self,
        battery: &Battery,
        log: NewBatteryLog,
        alerts: Vec<NewAlert>,
    ) -> Result<StatusRecord, MonitorError> {
        dispatch!(self.record_status(battery, log, alerts))
    }

    /// Deletes a battery together with its alerts, logs and device links.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::BatteryNotFound`] if it does not exist.
    pub async fn delete_battery(&self, id: BatteryId) -> Result<(), MonitorError> {
        dispatch!(self.delete_battery(id))
    }

    /// Inserts an alert.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidRequest`] if the battery does not
    /// exist.
    pub async fn insert_alert(&self, new: NewAlert) -> Result<BatteryAlert, MonitorError> {
        dispatch!(self.insert_alert(new))
    }

    /// Fetches one alert.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::AlertNotFound`] if it does not exist.
    pub async fn alert(&self, id: AlertId) -> Result<BatteryAlert, MonitorError> {
        dispatch!(self.alert(id))
    }

    /// Lists alerts matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::PersistenceError`] on backend failure.
    pub async fn alerts(&self, filter: &AlertFilter) -> Result<Vec<BatteryAlert>, MonitorError> {
        dispatch!(self.alerts(filter))
    }

    /// Saves every writable column of an existing alert.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::AlertNotFound`] or
    /// [`MonitorError::InvalidRequest`].
    pub async fn save_alert(&self, alert: &BatteryAlert) -> Result<BatteryAlert, MonitorError> {
        dispatch!(self.save_alert(alert))
    }

    /// Deletes an alert.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::AlertNotFound`] if it does not exist.
    pub async fn delete_alert(&self, id: AlertId) -> Result<(), MonitorError> {
        dispatch!(self.delete_alert(id))
    }

    /// Appends a log entry.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidRequest`] if the battery does not
    /// exist.
    pub async fn insert_log(&self, new: NewBatteryLog) -> Result<BatteryLog, MonitorError> {
        dispatch!(self.insert_log(new))
    }

    /// Fetches one log entry.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::LogNotFound`] if it does not exist.
    pub async fn log(&self, id: LogId) -> Result<BatteryLog, MonitorError> {
        dispatch!(self.log(id))
    }

    /// Lists log entries matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::PersistenceError`] on backend failure.
    pub async fn logs(&self, filter: &LogFilter) -> Result<Vec<BatteryLog>, MonitorError> {
        dispatch!(self.logs(filter))
    }

    /// Inserts a device with its battery links.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Conflict`] or
    /// [`MonitorError::InvalidRequest`].
    pub async fn insert_device(&self, new: NewDevice) -> Result<BatteryDevice, MonitorError> {
        dispatch!(self.insert_device(new))
    }

    /// Fetches one device.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::DeviceNotFound`] if it does not exist.
    pub async fn device(&self, id: DeviceId) -> Result<BatteryDevice, MonitorError> {
        dispatch!(self.device(id))
    }

    /// Looks a device up by serial number.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::PersistenceError`] on backend failure.
    pub async fn device_by_serial(
        &self,
        serial: &str,
    ) -> Result<Option<BatteryDevice>, MonitorError> {
        dispatch!(self.device_by_serial(serial))
    }

    /// Lists devices matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::PersistenceError`] on backend failure.
    pub async fn devices(&self, filter: &DeviceFilter) -> Result<Vec<BatteryDevice>, MonitorError> {
        dispatch!(self.devices(filter))
    }

    /// Saves every writable column of an existing device and replaces its
    /// battery set.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::DeviceNotFound`], [`MonitorError::Conflict`]
    /// or [`MonitorError::InvalidRequest`].
    pub async fn save_device(&self, device: &BatteryDevice) -> Result<BatteryDevice, MonitorError> {
        dispatch!(self.save_device(device))
    }

    /// Deletes a device.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::DeviceNotFound`] if it does not exist.
    pub async fn delete_device(&self, id: DeviceId) -> Result<(), MonitorError> {
        dispatch!(self.delete_device(id))
    }
}

pub(crate) fn missing_battery_ref(id: BatteryId) -> MonitorError {
    MonitorError::InvalidRequest(format!("invalid battery pk \"{id}\" - object does not exist"))
}

pub(crate) fn battery_conflict() -> MonitorError {
    MonitorError::Conflict("battery with this serial number already exists".to_string())
}

pub(crate) fn device_conflict() -> MonitorError {
    MonitorError::Conflict("battery device with this serial number already exists".to_string())
}
