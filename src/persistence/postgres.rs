//! PostgreSQL implementation of the store.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use super::models::{
    ALERT_COLUMNS, AlertRow, BATTERY_COLUMNS, BatteryRow, DEVICE_COLUMNS, DeviceBatteryLink,
    DeviceRow, LOG_COLUMNS, LogRow,
};
use super::query::{AlertFilter, BatteryFilter, DeviceFilter, LogFilter, like_pattern, search_terms};
use super::{StatusRecord, battery_conflict, device_conflict, missing_battery_ref};
use crate::config::MonitorConfig;
use crate::domain::{
    AlertId, Battery, BatteryAlert, BatteryDevice, BatteryId, BatteryLog, DeviceId, LogId,
    NewAlert, NewBattery, NewBatteryLog, NewDevice,
};
use crate::error::MonitorError;

const ALERT_FROM: &str = "FROM battery_alerts a JOIN batteries b ON b.id = a.battery_id";
const LOG_FROM: &str = "FROM battery_logs l JOIN batteries b ON b.id = l.battery_id";

/// PostgreSQL-backed store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Wraps an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool from `config` and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::PersistenceError`] if the database is
    /// unreachable or a migration fails.
    pub async fn connect(config: &MonitorConfig) -> Result<Self, MonitorError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| MonitorError::PersistenceError(e.to_string()))?;

        Ok(Self::new(pool))
    }

    // ── Batteries ───────────────────────────────────────────────────────

    /// Inserts a battery.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Conflict`] if the serial number is taken.
    pub async fn insert_battery(&self, new: NewBattery) -> Result<Battery, MonitorError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO batteries (serial_number, battery_type, capacity, voltage_nominal, \
             current_charge, current_voltage, current_temperature, current_status, \
             health_percentage, cycle_count, max_discharge_current, max_charge_current, \
             last_updated, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $13) \
             RETURNING {BATTERY_COLUMNS}"
        );
        let row = sqlx::query_as::<_, BatteryRow>(&sql)
            .bind(&new.serial_number)
            .bind(&new.battery_type)
            .bind(new.capacity)
            .bind(new.voltage_nominal)
            .bind(new.current_charge)
            .bind(new.current_voltage)
            .bind(new.current_temperature)
            .bind(new.current_status.as_str())
            .bind(new.health_percentage)
            .bind(new.cycle_count)
            .bind(new.max_discharge_current)
            .bind(new.max_charge_current)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(unique_as(battery_conflict))?;
        Battery::try_from(row)
    }

    /// Fetches one battery.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::BatteryNotFound`] if it does not exist.
    pub async fn battery(&self, id: BatteryId) -> Result<Battery, MonitorError> {
        let sql = format!("SELECT {BATTERY_COLUMNS} FROM batteries WHERE id = $1");
        sqlx::query_as::<_, BatteryRow>(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(MonitorError::BatteryNotFound(id.get()))
            .and_then(Battery::try_from)
    }

    /// Looks a battery up by serial number.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::PersistenceError`] on database failure.
    pub async fn battery_by_serial(&self, serial: &str) -> Result<Option<Battery>, MonitorError> {
        let sql = format!("SELECT {BATTERY_COLUMNS} FROM batteries WHERE serial_number = $1");
        sqlx::query_as::<_, BatteryRow>(&sql)
            .bind(serial)
            .fetch_optional(&self.pool)
            .await?
            .map(Battery::try_from)
            .transpose()
    }

    /// Lists batteries matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::PersistenceError`] on database failure.
    pub async fn batteries(&self, filter: &BatteryFilter) -> Result<Vec<Battery>, MonitorError> {
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT {BATTERY_COLUMNS} FROM batteries WHERE TRUE"));
        if let Some(battery_type) = &filter.battery_type {
            qb.push(" AND battery_type = ").push_bind(battery_type.clone());
        }
        if let Some(status) = filter.status {
            qb.push(" AND current_status = ").push_bind(status.as_str());
        }
        if let Some(limit) = filter.health_below {
            qb.push(" AND health_percentage < ").push_bind(limit);
        }
        for term in search_terms(filter.search.as_deref()) {
            let pattern = like_pattern(&term);
            qb.push(" AND (serial_number ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR battery_type ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        qb.push(format!(
            " ORDER BY {} {}, id ASC",
            filter.sort.field.column(),
            filter.sort.direction()
        ));

        qb.build_query_as::<BatteryRow>()
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Battery::try_from)
            .collect()
    }

    /// Fetches the given batteries, in id order. Unknown ids are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::PersistenceError`] on database failure.
    pub async fn batteries_by_ids(
        &self,
        ids: &BTreeSet<BatteryId>,
    ) -> Result<Vec<Battery>, MonitorError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT {BATTERY_COLUMNS} FROM batteries WHERE id = ANY($1) ORDER BY id");
        sqlx::query_as::<_, BatteryRow>(&sql)
            .bind(raw_ids(ids))
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Battery::try_from)
            .collect()
    }

    /// Writes every column of an existing battery and refreshes
    /// `last_updated`.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::BatteryNotFound`] or
    /// [`MonitorError::Conflict`].
    pub async fn save_battery(&self, battery: &Battery) -> Result<Battery, MonitorError> {
        let mut conn = self.pool.acquire().await?;
        update_battery(&mut conn, battery).await
    }

    /// Saves `battery`, then appends `log` and `alerts`, in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::BatteryNotFound`], [`MonitorError::Conflict`]
    /// or [`MonitorError::InvalidRequest`]; the transaction is rolled back
    /// on error.
    pub async fn record_status(
        &self,
        battery: &Battery,
        log: NewBatteryLog,
        alerts: Vec<NewAlert>,
    ) -> Result<StatusRecord, MonitorError> {
        let mut tx = self.pool.begin().await?;
        let battery = update_battery(&mut tx, battery).await?;
        let log_id = insert_log_row(&mut tx, &log).await?;
        let mut alert_ids = Vec::with_capacity(alerts.len());
        for alert in &alerts {
            alert_ids.push(insert_alert_row(&mut tx, alert).await?);
        }
        tx.commit().await?;

        let log = self.log(LogId::new(log_id)).await?;
        let mut alerts = Vec::with_capacity(alert_ids.len());
        for id in alert_ids {
            alerts.push(self.alert(AlertId::new(id)).await?);
        }
        Ok(StatusRecord {
            battery,
            log,
            alerts,
        })
    }

    /// Deletes a battery. Alerts, logs and device links cascade.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::BatteryNotFound`] if it does not exist.
    pub async fn delete_battery(&self, id: BatteryId) -> Result<(), MonitorError> {
        let result = sqlx::query("DELETE FROM batteries WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(MonitorError::BatteryNotFound(id.get()));
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
        let mut conn = self.pool.acquire().await?;
        let id = insert_alert_row(&mut conn, &new).await?;
        self.alert(AlertId::new(id)).await
    }

    /// Fetches one alert.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::AlertNotFound`] if it does not exist.
    pub async fn alert(&self, id: AlertId) -> Result<BatteryAlert, MonitorError> {
        let sql = format!("SELECT {ALERT_COLUMNS} {ALERT_FROM} WHERE a.id = $1");
        sqlx::query_as::<_, AlertRow>(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(MonitorError::AlertNotFound(id.get()))
            .and_then(BatteryAlert::try_from)
    }

    /// Lists alerts matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::PersistenceError`] on database failure.
    pub async fn alerts(&self, filter: &AlertFilter) -> Result<Vec<BatteryAlert>, MonitorError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {ALERT_COLUMNS} {ALERT_FROM} WHERE TRUE"));
        if let Some(battery) = filter.battery {
            qb.push(" AND a.battery_id = ").push_bind(battery.get());
        }
        if let Some(alert_type) = filter.alert_type {
            qb.push(" AND a.alert_type = ").push_bind(alert_type.as_str());
        }
        if let Some(level) = filter.alert_level {
            qb.push(" AND a.alert_level = ").push_bind(level.as_str());
        }
        if let Some(resolved) = filter.is_resolved {
            qb.push(" AND a.is_resolved = ").push_bind(resolved);
        }
        for term in search_terms(filter.search.as_deref()) {
            let pattern = like_pattern(&term);
            qb.push(" AND (a.alert_type ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR b.serial_number ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        qb.push(format!(
            " ORDER BY {} {}, a.id ASC",
            filter.sort.field.column(),
            filter.sort.direction()
        ));
        push_limit(&mut qb, filter.limit);

        qb.build_query_as::<AlertRow>()
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(BatteryAlert::try_from)
            .collect()
    }

    /// Writes every writable column of an existing alert.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::AlertNotFound`], or
    /// [`MonitorError::InvalidRequest`] if the battery does not exist.
    pub async fn save_alert(&self, alert: &BatteryAlert) -> Result<BatteryAlert, MonitorError> {
        let updated = sqlx::query_scalar::<_, i64>(
            "UPDATE battery_alerts SET battery_id = $2, alert_type = $3, alert_level = $4, \
             message = $5, is_resolved = $6, resolved_at = $7 WHERE id = $1 RETURNING id",
        )
        .bind(alert.id.get())
        .bind(alert.battery.get())
        .bind(alert.alert_type.as_str())
        .bind(alert.alert_level.as_str())
        .bind(&alert.message)
        .bind(alert.is_resolved)
        .bind(alert.resolved_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(foreign_key_as(alert.battery))?;
        match updated {
            Some(id) => self.alert(AlertId::new(id)).await,
            None => Err(MonitorError::AlertNotFound(alert.id.get())),
        }
    }

    /// Deletes an alert.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::AlertNotFound`] if it does not exist.
    pub async fn delete_alert(&self, id: AlertId) -> Result<(), MonitorError> {
        let result = sqlx::query("DELETE FROM battery_alerts WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(MonitorError::AlertNotFound(id.get()));
        }
        Ok(())
    }

    // ── Logs ────────────────────────────────────────────────────────────

    /// Appends a log entry.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidRequest`] if the battery does not
    /// exist.
    pub async fn insert_log(&self, new: NewBatteryLog) -> Result<BatteryLog, MonitorError> {
        let mut conn = self.pool.acquire().await?;
        let id = insert_log_row(&mut conn, &new).await?;
        self.log(LogId::new(id)).await
    }

    /// Fetches one log entry.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::LogNotFound`] if it does not exist.
    pub async fn log(&self, id: LogId) -> Result<BatteryLog, MonitorError> {
        let sql = format!("SELECT {LOG_COLUMNS} {LOG_FROM} WHERE l.id = $1");
        sqlx::query_as::<_, LogRow>(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?
            .map(BatteryLog::from)
            .ok_or(MonitorError::LogNotFound(id.get()))
    }

    /// Lists log entries matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::PersistenceError`] on database failure.
    pub async fn logs(&self, filter: &LogFilter) -> Result<Vec<BatteryLog>, MonitorError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {LOG_COLUMNS} {LOG_FROM} WHERE TRUE"));
        if let Some(battery) = filter.battery {
            qb.push(" AND l.battery_id = ").push_bind(battery.get());
        }
        if let Some(status) = &filter.status {
            qb.push(" AND l.status = ").push_bind(status.clone());
        }
        for term in search_terms(filter.search.as_deref()) {
            qb.push(" AND b.serial_number ILIKE ").push_bind(like_pattern(&term));
        }
        // Same-instant entries follow insertion order in the sort direction.
        let direction = filter.sort.direction();
        qb.push(format!(
            " ORDER BY {} {direction}, l.id {direction}",
            filter.sort.field.column()
        ));
        push_limit(&mut qb, filter.limit);

        Ok(qb
            .build_query_as::<LogRow>()
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(BatteryLog::from)
            .collect())
    }

    // ── Devices ─────────────────────────────────────────────────────────

    /// Inserts a device and its battery links in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Conflict`] if the serial number is taken, or
    /// [`MonitorError::InvalidRequest`] if a battery does not exist.
    pub async fn insert_device(&self, new: NewDevice) -> Result<BatteryDevice, MonitorError> {
        let mut tx = self.pool.begin().await?;
        check_battery_refs(&mut tx, &new.batteries).await?;

        let sql = format!(
            "INSERT INTO battery_devices \
             (device_name, device_type, serial_number, location, is_active, created_at, last_checked) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {DEVICE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, DeviceRow>(&sql)
            .bind(&new.device_name)
            .bind(new.device_type.as_str())
            .bind(&new.serial_number)
            .bind(&new.location)
            .bind(new.is_active)
            .bind(Utc::now())
            .bind(new.last_checked)
            .fetch_one(&mut *tx)
            .await
            .map_err(unique_as(device_conflict))?;

        replace_links(&mut tx, row.id, &new.batteries).await?;
        tx.commit().await?;
        row.into_device(new.batteries)
    }

    /// Fetches one device.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::DeviceNotFound`] if it does not exist.
    pub async fn device(&self, id: DeviceId) -> Result<BatteryDevice, MonitorError> {
        let sql = format!("SELECT {DEVICE_COLUMNS} FROM battery_devices WHERE id = $1");
        let row = sqlx::query_as::<_, DeviceRow>(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(MonitorError::DeviceNotFound(id.get()))?;
        self.attach_batteries(vec![row])
            .await?
            .pop()
            .ok_or(MonitorError::DeviceNotFound(id.get()))
    }

    /// Looks a device up by serial number.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::PersistenceError`] on database failure.
    pub async fn device_by_serial(
        &self,
        serial: &str,
    ) -> Result<Option<BatteryDevice>, MonitorError> {
        let sql = format!("SELECT {DEVICE_COLUMNS} FROM battery_devices WHERE serial_number = $1");
        let rows: Vec<DeviceRow> = sqlx::query_as::<_, DeviceRow>(&sql)
            .bind(serial)
            .fetch_optional(&self.pool)
            .await?
            .into_iter()
            .collect();
        Ok(self.attach_batteries(rows).await?.pop())
    }

    /// Lists devices matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::PersistenceError`] on database failure.
    pub async fn devices(&self, filter: &DeviceFilter) -> Result<Vec<BatteryDevice>, MonitorError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {DEVICE_COLUMNS} FROM battery_devices WHERE TRUE"
        ));
        if let Some(device_type) = filter.device_type {
            qb.push(" AND device_type = ").push_bind(device_type.as_str());
        }
        if let Some(active) = filter.is_active {
            qb.push(" AND is_active = ").push_bind(active);
        }
        for term in search_terms(filter.search.as_deref()) {
            let pattern = like_pattern(&term);
            qb.push(" AND (device_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR serial_number ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR location ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        qb.push(format!(
            " ORDER BY {} {}, id ASC",
            filter.sort.field.column(),
            filter.sort.direction()
        ));

        let rows = qb.build_query_as::<DeviceRow>().fetch_all(&self.pool).await?;
        self.attach_batteries(rows).await
    }

    /// Writes every writable column of an existing device, replacing its
    /// battery set.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::DeviceNotFound`], [`MonitorError::Conflict`],
    /// or [`MonitorError::InvalidRequest`] if a battery does not exist.
    pub async fn save_device(&self, device: &BatteryDevice) -> Result<BatteryDevice, MonitorError> {
        let mut tx = self.pool.begin().await?;
        check_battery_refs(&mut tx, &device.batteries).await?;

        let sql = format!(
            "UPDATE battery_devices SET device_name = $2, device_type = $3, serial_number = $4, \
             location = $5, is_active = $6, last_checked = $7 \
             WHERE id = $1 RETURNING {DEVICE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, DeviceRow>(&sql)
            .bind(device.id.get())
            .bind(&device.device_name)
            .bind(device.device_type.as_str())
            .bind(&device.serial_number)
            .bind(&device.location)
            .bind(device.is_active)
            .bind(device.last_checked)
            .fetch_optional(&mut *tx)
            .await
            .map_err(unique_as(device_conflict))?
            .ok_or(MonitorError::DeviceNotFound(device.id.get()))?;

        replace_links(&mut tx, row.id, &device.batteries).await?;
        tx.commit().await?;
        row.into_device(device.batteries.clone())
    }

    /// Deletes a device. Its batteries are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::DeviceNotFound`] if it does not exist.
    pub async fn delete_device(&self, id: DeviceId) -> Result<(), MonitorError> {
        let result = sqlx::query("DELETE FROM battery_devices WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(MonitorError::DeviceNotFound(id.get()));
        }
        Ok(())
    }

    /// Loads the battery links of `rows` with one query and builds devices
    /// in row order.
    async fn attach_batteries(
        &self,
        rows: Vec<DeviceRow>,
    ) -> Result<Vec<BatteryDevice>, MonitorError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let links = sqlx::query_as::<_, DeviceBatteryLink>(
            "SELECT device_id, battery_id FROM battery_device_batteries WHERE device_id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_device: BTreeMap<i64, BTreeSet<BatteryId>> = BTreeMap::new();
        for link in links {
            by_device
                .entry(link.device_id)
                .or_default()
                .insert(BatteryId::new(link.battery_id));
        }

        rows.into_iter()
            .map(|row| {
                let batteries = by_device.remove(&row.id).unwrap_or_default();
                row.into_device(batteries)
            })
            .collect()
    }
}

async fn update_battery(conn: &mut PgConnection, battery: &Battery) -> Result<Battery, MonitorError> {
    let sql = format!(
        "UPDATE batteries SET serial_number = $2, battery_type = $3, capacity = $4, \
         voltage_nominal = $5, current_charge = $6, current_voltage = $7, \
         current_temperature = $8, current_status = $9, health_percentage = $10, \
         cycle_count = $11, max_discharge_current = $12, max_charge_current = $13, \
         last_updated = $14 \
         WHERE id = $1 RETURNING {BATTERY_COLUMNS}"
    );
    sqlx::query_as::<_, BatteryRow>(&sql)
        .bind(battery.id.get())
        .bind(&battery.serial_number)
        .bind(&battery.battery_type)
        .bind(battery.capacity)
        .bind(battery.voltage_nominal)
        .bind(battery.current_charge)
        .bind(battery.current_voltage)
        .bind(battery.current_temperature)
        .bind(battery.current_status.as_str())
        .bind(battery.health_percentage)
        .bind(battery.cycle_count)
        .bind(battery.max_discharge_current)
        .bind(battery.max_charge_current)
        .bind(Utc::now())
        .fetch_optional(&mut *conn)
        .await
        .map_err(unique_as(battery_conflict))?
        .ok_or(MonitorError::BatteryNotFound(battery.id.get()))
        .and_then(Battery::try_from)
}

async fn insert_alert_row(conn: &mut PgConnection, new: &NewAlert) -> Result<i64, MonitorError> {
    let now = Utc::now();
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO battery_alerts \
         (battery_id, alert_type, alert_level, message, is_resolved, created_at, resolved_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
    )
    .bind(new.battery.get())
    .bind(new.alert_type.as_str())
    .bind(new.alert_level.as_str())
    .bind(&new.message)
    .bind(new.is_resolved)
    .bind(now)
    .bind(new.is_resolved.then_some(now))
    .fetch_one(&mut *conn)
    .await
    .map_err(foreign_key_as(new.battery))
}

async fn insert_log_row(conn: &mut PgConnection, new: &NewBatteryLog) -> Result<i64, MonitorError> {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO battery_logs \
         (battery_id, charge_percentage, voltage, temperature, current, status, logged_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
    )
    .bind(new.battery.get())
    .bind(new.charge_percentage)
    .bind(new.voltage)
    .bind(new.temperature)
    .bind(new.current)
    .bind(&new.status)
    .bind(Utc::now())
    .fetch_one(&mut *conn)
    .await
    .map_err(foreign_key_as(new.battery))
}

async fn check_battery_refs(
    conn: &mut PgConnection,
    ids: &BTreeSet<BatteryId>,
) -> Result<(), MonitorError> {
    if ids.is_empty() {
        return Ok(());
    }
    let found: BTreeSet<i64> = sqlx::query_scalar::<_, i64>("SELECT id FROM batteries WHERE id = ANY($1)")
        .bind(raw_ids(ids))
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .collect();
    match ids.iter().find(|id| !found.contains(&id.get())) {
        Some(missing) => Err(missing_battery_ref(*missing)),
        None => Ok(()),
    }
}

async fn replace_links(
    conn: &mut PgConnection,
    device_id: i64,
    batteries: &BTreeSet<BatteryId>,
) -> Result<(), MonitorError> {
    sqlx::query("DELETE FROM battery_device_batteries WHERE device_id = $1")
        .bind(device_id)
        .execute(&mut *conn)
        .await?;
    if batteries.is_empty() {
        return Ok(());
    }
    sqlx::query(
        "INSERT INTO battery_device_batteries (device_id, battery_id) \
         SELECT $1, UNNEST($2::BIGINT[])",
    )
    .bind(device_id)
    .bind(raw_ids(batteries))
    .execute(&mut *conn)
    .await?;
    Ok(())
}

fn raw_ids(ids: &BTreeSet<BatteryId>) -> Vec<i64> {
    ids.iter().map(|id| id.get()).collect()
}

fn push_limit(qb: &mut QueryBuilder<'_, Postgres>, limit: Option<usize>) {
    if let Some(limit) = limit {
        qb.push(" LIMIT ")
            .push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
    }
}

/// Replaces the constraint-named conflict with the resource's own message.
fn unique_as(conflict: fn() -> MonitorError) -> impl Fn(sqlx::Error) -> MonitorError {
    move |err| match MonitorError::from(err) {
        MonitorError::Conflict(_) => conflict(),
        other => other,
    }
}

fn foreign_key_as(battery: BatteryId) -> impl Fn(sqlx::Error) -> MonitorError {
    move |err| match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => missing_battery_ref(battery),
        _ => MonitorError::from(err),
    }
}
