//! Dashboard service: read-only aggregations over the store.
//!
//! Every method loads the rows it needs and folds them in memory. The
//! numbers match what the dashboard page renders: averages are rounded to
//! two decimals and are 0 for an empty fleet, and every distribution is
//! ordered by its key.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::battery_service::mean;
use crate::domain::{
    AlertId, AlertLevel, AlertType, Battery, BatteryAlert, BatteryId, BatteryStatus,
};
use crate::error::MonitorError;
use crate::persistence::query::LogOrder;
use crate::persistence::{AlertFilter, BatteryFilter, DeviceFilter, LogFilter, Sort, Store};

/// How many log entries the trend covers.
pub const TREND_POINTS: usize = 100;

/// How many unresolved alerts the alert summary lists.
pub const RECENT_UNRESOLVED: usize = 10;

/// Health below this percentage counts as low in the fleet statistics.
pub const LOW_HEALTH_STAT_PERCENT: f64 = 50.0;

// ── Stats ───────────────────────────────────────────────────────────────

/// Battery counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct BatteryCounts {
    /// Every battery.
    pub total: usize,
    /// Charging or discharging.
    pub active: usize,
    /// In the `FAULT` state.
    pub faulty: usize,
}

/// Fleet health.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct HealthStats {
    /// Mean health percentage.
    pub average: f64,
    /// Batteries below 50% health.
    pub low_count: usize,
}

/// A single rounded average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct AverageStat {
    /// Mean value.
    pub average: f64,
}

/// Alert counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct AlertCounts {
    /// Every alert.
    pub total: usize,
    /// Not yet resolved.
    pub unresolved: usize,
    /// `CRITICAL` and unresolved.
    pub critical: usize,
}

/// Device counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct DeviceCounts {
    /// Every device.
    pub total: usize,
    /// In service.
    pub active: usize,
}

/// Fleet-wide statistics.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DashboardStats {
    /// Battery counts.
    pub batteries: BatteryCounts,
    /// Health average and low-health count.
    pub health: HealthStats,
    /// Charge average.
    pub charge: AverageStat,
    /// Temperature average.
    pub temperature: AverageStat,
    /// Alert counts.
    pub alerts: AlertCounts,
    /// Device counts.
    pub devices: DeviceCounts,
}

// ── Charts ──────────────────────────────────────────────────────────────

/// Batteries per status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusCount {
    /// Status.
    pub current_status: BatteryStatus,
    /// Number of batteries.
    pub count: usize,
}

/// Batteries per type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TypeCount {
    /// Battery type.
    pub battery_type: String,
    /// Number of batteries.
    pub count: usize,
}

/// Health buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct HealthRanges {
    /// Health of 90% or more.
    #[serde(rename = "Excellent (90-100%)")]
    pub excellent: usize,
    /// 70% up to 90%.
    #[serde(rename = "Good (70-89%)")]
    pub good: usize,
    /// 50% up to 70%.
    #[serde(rename = "Fair (50-69%)")]
    pub fair: usize,
    /// Below 50%.
    #[serde(rename = "Poor (<50%)")]
    pub poor: usize,
}

/// Charge buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ChargeRanges {
    /// 90% or more.
    #[serde(rename = "Full (90-100%)")]
    pub full: usize,
    /// 70% up to 90%.
    #[serde(rename = "High (70-89%)")]
    pub high: usize,
    /// 40% up to 70%.
    #[serde(rename = "Medium (40-69%)")]
    pub medium: usize,
    /// 10% up to 40%.
    #[serde(rename = "Low (10-39%)")]
    pub low: usize,
    /// Below 10%.
    #[serde(rename = "Critical (<10%)")]
    pub critical: usize,
}

/// Cycle-count buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct CycleRanges {
    /// 100 cycles or fewer.
    #[serde(rename = "New (0-100)")]
    pub new: usize,
    /// 101 to 500.
    #[serde(rename = "Good (100-500)")]
    pub good: usize,
    /// 501 to 1000.
    #[serde(rename = "Aging (500-1000)")]
    pub aging: usize,
    /// More than 1000.
    #[serde(rename = "Old (1000+)")]
    pub old: usize,
}

/// Data behind the dashboard charts.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChartData {
    /// Status distribution.
    pub status: Vec<StatusCount>,
    /// Health buckets.
    pub health_ranges: HealthRanges,
    /// Charge buckets.
    pub charge_ranges: ChargeRanges,
    /// Type distribution.
    pub types: Vec<TypeCount>,
    /// Cycle-count buckets.
    pub cycle_ranges: CycleRanges,
}

// ── Details ─────────────────────────────────────────────────────────────

/// Compact battery row for the dashboard table.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BatterySummary {
    /// Primary key.
    pub id: BatteryId,
    /// Serial number.
    pub serial_number: String,
    /// Type.
    pub battery_type: String,
    /// Charge percentage.
    pub current_charge: f64,
    /// Voltage.
    pub current_voltage: f64,
    /// Temperature.
    pub current_temperature: f64,
    /// Status.
    pub current_status: BatteryStatus,
    /// Health percentage.
    pub health_percentage: f64,
    /// Charge cycles.
    pub cycle_count: i32,
}

impl From<Battery> for BatterySummary {
    fn from(b: Battery) -> Self {
        Self {
            id: b.id,
            serial_number: b.serial_number,
            battery_type: b.battery_type,
            current_charge: b.current_charge,
            current_voltage: b.current_voltage,
            current_temperature: b.current_temperature,
            current_status: b.current_status,
            health_percentage: b.health_percentage,
            cycle_count: b.cycle_count,
        }
    }
}

/// Every battery as a [`BatterySummary`].
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BatteryDetails {
    /// Batteries, in default list order.
    pub batteries: Vec<BatterySummary>,
}

// ── Alerts ──────────────────────────────────────────────────────────────

/// Alerts per type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AlertTypeCount {
    /// Type.
    pub alert_type: AlertType,
    /// Number of alerts.
    pub count: usize,
}

/// Alerts per level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AlertLevelCount {
    /// Level.
    pub alert_level: AlertLevel,
    /// Number of alerts.
    pub count: usize,
    /// Of which unresolved.
    pub unresolved: usize,
}

/// Compact unresolved alert row.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RecentAlert {
    /// Primary key.
    pub id: AlertId,
    /// Serial number of the battery.
    pub battery_serial: String,
    /// Type.
    pub alert_type: AlertType,
    /// Level.
    pub alert_level: AlertLevel,
    /// Message.
    pub message: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<BatteryAlert> for RecentAlert {
    fn from(a: BatteryAlert) -> Self {
        Self {
            id: a.id,
            battery_serial: a.battery_serial,
            alert_type: a.alert_type,
            alert_level: a.alert_level,
            message: a.message,
            created_at: a.created_at,
        }
    }
}

/// Alert breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AlertSummary {
    /// Counts by type.
    pub alert_types: Vec<AlertTypeCount>,
    /// Counts by level.
    pub alert_levels: Vec<AlertLevelCount>,
    /// The most recent unresolved alerts, newest first.
    pub recent_unresolved: Vec<RecentAlert>,
}

// ── Trend / export ──────────────────────────────────────────────────────

/// Parallel series of recent readings, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct Trend {
    /// RFC 3339 timestamps.
    pub timestamps: Vec<String>,
    /// Charge percentages.
    pub charge: Vec<f64>,
    /// Voltages.
    pub voltage: Vec<f64>,
    /// Temperatures.
    pub temperature: Vec<f64>,
}

/// Everything the dashboard shows, in one document.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DashboardExport {
    /// Generation time.
    pub timestamp: DateTime<Utc>,
    /// Statistics.
    pub stats: DashboardStats,
    /// Chart data.
    pub charts: ChartData,
    /// Battery table.
    pub batteries: BatteryDetails,
    /// Alert breakdown.
    pub alerts: AlertSummary,
}

/// Read-only aggregation service behind `/api/dashboard`.
#[derive(Debug, Clone)]
pub struct DashboardService {
    store: Arc<Store>,
}

impl DashboardService {
    /// Creates a new `DashboardService`.
    #[must_use]
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Fleet-wide statistics.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::PersistenceError`] on store failure.
    pub async fn stats(&self) -> Result<DashboardStats, MonitorError> {
        let batteries = self.store.batteries(&BatteryFilter::default()).await?;
        let alerts = self.store.alerts(&AlertFilter::default()).await?;
        let devices = self.store.devices(&DeviceFilter::default()).await?;

        Ok(DashboardStats {
            batteries: BatteryCounts {
                total: batteries.len(),
                active: batteries
                    .iter()
                    .filter(|b| b.current_status.is_active())
                    .count(),
                faulty: batteries
                    .iter()
                    .filter(|b| b.current_status == BatteryStatus::Fault)
                    .count(),
            },
            health: HealthStats {
                average: round2(mean(batteries.iter().map(|b| b.health_percentage))),
                low_count: batteries
                    .iter()
                    .filter(|b| b.health_percentage < LOW_HEALTH_STAT_PERCENT)
                    .count(),
            },
            charge: AverageStat {
                average: round2(mean(batteries.iter().map(|b| b.current_charge))),
            },
            temperature: AverageStat {
                average: round2(mean(batteries.iter().map(|b| b.current_temperature))),
            },
            alerts: AlertCounts {
                total: alerts.len(),
                unresolved: alerts.iter().filter(|a| !a.is_resolved).count(),
                critical: alerts
                    .iter()
                    .filter(|a| !a.is_resolved && a.alert_level == AlertLevel::Critical)
                    .count(),
            },
            devices: DeviceCounts {
                total: devices.len(),
                active: devices.iter().filter(|d| d.is_active).count(),
            },
        })
    }

    /// Distributions behind the dashboard charts.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::PersistenceError`] on store failure.
    pub async fn chart_data(&self) -> Result<ChartData, MonitorError> {
        let batteries = self.store.batteries(&BatteryFilter::default()).await?;
        Ok(chart_data(&batteries))
    }

    /// Compact table of every battery.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::PersistenceError`] on store failure.
    pub async fn battery_details(&self) -> Result<BatteryDetails, MonitorError> {
        let batteries = self.store.batteries(&BatteryFilter::default()).await?;
        Ok(BatteryDetails {
            batteries: batteries.into_iter().map(BatterySummary::from).collect(),
        })
    }

    /// Alert counts by type and level plus the latest unresolved alerts.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::PersistenceError`] on store failure.
    pub async fn alert_summary(&self) -> Result<AlertSummary, MonitorError> {
        let alerts = self.store.alerts(&AlertFilter::default()).await?;
        let recent = self
            .store
            .alerts(&AlertFilter {
                is_resolved: Some(false),
                limit: Some(RECENT_UNRESOLVED),
                ..AlertFilter::default()
            })
            .await?;

        let mut by_type: BTreeMap<&'static str, AlertTypeCount> = BTreeMap::new();
        let mut by_level: BTreeMap<&'static str, AlertLevelCount> = BTreeMap::new();
        for alert in &alerts {
            by_type
                .entry(alert.alert_type.as_str())
                .or_insert(AlertTypeCount {
                    alert_type: alert.alert_type,
                    count: 0,
                })
                .count += 1;
            let level = by_level
                .entry(alert.alert_level.as_str())
                .or_insert(AlertLevelCount {
                    alert_level: alert.alert_level,
                    count: 0,
                    unresolved: 0,
                });
            level.count += 1;
            if !alert.is_resolved {
                level.unresolved += 1;
            }
        }

        Ok(AlertSummary {
            alert_types: by_type.into_values().collect(),
            alert_levels: by_level.into_values().collect(),
            recent_unresolved: recent.into_iter().map(RecentAlert::from).collect(),
        })
    }

    /// The first [`TREND_POINTS`] readings, optionally of one battery, in
    /// chronological order.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::PersistenceError`] on store failure.
    pub async fn trend(&self, battery: Option<BatteryId>) -> Result<Trend, MonitorError> {
        let logs = self
            .store
            .logs(&LogFilter {
                battery,
                sort: Sort::asc(LogOrder::LoggedAt),
                limit: Some(TREND_POINTS),
                ..LogFilter::default()
            })
            .await?;

        let mut trend = Trend::default();
        for log in logs {
            trend
                .timestamps
                .push(log.logged_at.to_rfc3339_opts(SecondsFormat::Micros, false));
            trend.charge.push(log.charge_percentage);
            trend.voltage.push(log.voltage);
            trend.temperature.push(log.temperature);
        }
        Ok(trend)
    }

    /// Stats, charts, battery table and alert summary in one document.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::PersistenceError`] on store failure.
    pub async fn export(&self) -> Result<DashboardExport, MonitorError> {
        Ok(DashboardExport {
            timestamp: Utc::now(),
            stats: self.stats().await?,
            charts: self.chart_data().await?,
            batteries: self.battery_details().await?,
            alerts: self.alert_summary().await?,
        })
    }
}

fn chart_data(batteries: &[Battery]) -> ChartData {
    let mut status: BTreeMap<&'static str, StatusCount> = BTreeMap::new();
    let mut types: BTreeMap<&str, usize> = BTreeMap::new();
    let mut health_ranges = HealthRanges::default();
    let mut charge_ranges = ChargeRanges::default();
    let mut cycle_ranges = CycleRanges::default();

    for b in batteries {
        status
            .entry(b.current_status.as_str())
            .or_insert(StatusCount {
                current_status: b.current_status,
                count: 0,
            })
            .count += 1;
        *types.entry(b.battery_type.as_str()).or_default() += 1;

        let h = b.health_percentage;
        if h >= 90.0 {
            health_ranges.excellent += 1;
        } else if h >= 70.0 {
            health_ranges.good += 1;
        } else if h >= 50.0 {
            health_ranges.fair += 1;
        } else {
            health_ranges.poor += 1;
        }

        let c = b.current_charge;
        if c >= 90.0 {
            charge_ranges.full += 1;
        } else if c >= 70.0 {
            charge_ranges.high += 1;
        } else if c >= 40.0 {
            charge_ranges.medium += 1;
        } else if c >= 10.0 {
            charge_ranges.low += 1;
        } else {
            charge_ranges.critical += 1;
        }

        match b.cycle_count {
            ..=100 => cycle_ranges.new += 1,
            101..=500 => cycle_ranges.good += 1,
            501..=1000 => cycle_ranges.aging += 1,
            _ => cycle_ranges.old += 1,
        }
    }

    ChartData {
        status: status.into_values().collect(),
        health_ranges,
        charge_ranges,
        types: types
            .into_iter()
            .map(|(battery_type, count)| TypeCount {
                battery_type: battery_type.to_string(),
                count,
            })
            .collect(),
        cycle_ranges,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
