//! List filters, search and ordering shared by every store backend.
//!
//! The in-memory store evaluates these with [`BatteryFilter::matches`] and
//! friends; the PostgreSQL store translates the same fields into `WHERE`
//! and `ORDER BY` clauses. Both must agree.

use std::cmp::Ordering;

use crate::domain::{
    AlertLevel, AlertType, Battery, BatteryAlert, BatteryDevice, BatteryId, BatteryLog,
    BatteryStatus, DeviceType,
};

/// Sort key plus direction. Ties break by id ascending unless the
/// resource says otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort<F> {
    /// Column to sort on.
    pub field: F,
    /// `true` for descending order.
    pub descending: bool,
}

impl<F: Copy> Sort<F> {
    /// Ascending sort on `field`.
    #[must_use]
    pub const fn asc(field: F) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    /// Descending sort on `field`.
    #[must_use]
    pub const fn desc(field: F) -> Self {
        Self {
            field,
            descending: true,
        }
    }

    /// Parses `"field"` or `"-field"` with `lookup`. Unknown or missing
    /// names fall back to `default`.
    #[must_use]
    pub fn parse(raw: Option<&str>, lookup: impl Fn(&str) -> Option<F>, default: Self) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return default;
        };
        let (name, descending) = match raw.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (raw, false),
        };
        lookup(name).map_or(default, |field| Self { field, descending })
    }

    /// SQL direction keyword.
    #[must_use]
    pub const fn direction(&self) -> &'static str {
        if self.descending { "DESC" } else { "ASC" }
    }

    fn finish(&self, primary: Ordering, id_order: Ordering) -> Ordering {
        let primary = if self.descending {
            primary.reverse()
        } else {
            primary
        };
        primary.then(id_order)
    }
}

/// Splits a search string into lowercase whitespace-separated terms.
#[must_use]
pub fn search_terms(search: Option<&str>) -> Vec<String> {
    search
        .map(|s| s.split_whitespace().map(str::to_lowercase).collect())
        .unwrap_or_default()
}

/// `true` when every term is a case-insensitive substring of some field.
fn matches_terms(terms: &[String], fields: &[&str]) -> bool {
    terms.iter().all(|term| {
        fields
            .iter()
            .any(|field| field.to_lowercase().contains(term.as_str()))
    })
}

/// Escapes `%`, `_` and `\` and wraps the term for an `ILIKE` substring match.
#[must_use]
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

// ── Batteries ───────────────────────────────────────────────────────────

/// Sortable battery columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryOrder {
    /// `current_charge`
    CurrentCharge,
    /// `health_percentage`
    HealthPercentage,
    /// `created_at`
    CreatedAt,
    /// `last_updated`
    LastUpdated,
}

impl BatteryOrder {
    /// Looks up a public ordering name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "current_charge" => Some(Self::CurrentCharge),
            "health_percentage" => Some(Self::HealthPercentage),
            "created_at" => Some(Self::CreatedAt),
            "last_updated" => Some(Self::LastUpdated),
            _ => None,
        }
    }

    /// SQL column name.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::CurrentCharge => "current_charge",
            Self::HealthPercentage => "health_percentage",
            Self::CreatedAt => "created_at",
            Self::LastUpdated => "last_updated",
        }
    }
}

impl Default for Sort<BatteryOrder> {
    fn default() -> Self {
        Self::desc(BatteryOrder::LastUpdated)
    }
}

impl Sort<BatteryOrder> {
    /// Total order over batteries for the in-memory store.
    #[must_use]
    pub fn compare(&self, a: &Battery, b: &Battery) -> Ordering {
        let primary = match self.field {
            BatteryOrder::CurrentCharge => a.current_charge.total_cmp(&b.current_charge),
            BatteryOrder::HealthPercentage => a.health_percentage.total_cmp(&b.health_percentage),
            BatteryOrder::CreatedAt => a.created_at.cmp(&b.created_at),
            BatteryOrder::LastUpdated => a.last_updated.cmp(&b.last_updated),
        };
        self.finish(primary, a.id.cmp(&b.id))
    }
}

/// Battery list filter.
#[derive(Debug, Clone, Default)]
pub struct BatteryFilter {
    /// Free-text search over serial number and battery type.
    pub search: Option<String>,
    /// Exact battery type.
    pub battery_type: Option<String>,
    /// Exact status.
    pub status: Option<BatteryStatus>,
    /// Only batteries whose health is strictly below this value.
    pub health_below: Option<f64>,
    /// Ordering.
    pub sort: Sort<BatteryOrder>,
}

impl BatteryFilter {
    /// `true` when `battery` passes every filter.
    #[must_use]
    pub fn matches(&self, battery: &Battery) -> bool {
        self.battery_type
            .as_deref()
            .is_none_or(|t| battery.battery_type == t)
            && self.status.is_none_or(|s| battery.current_status == s)
            && self
                .health_below
                .is_none_or(|limit| battery.health_percentage < limit)
            && matches_terms(
                &search_terms(self.search.as_deref()),
                &[&battery.serial_number, &battery.battery_type],
            )
    }
}

// ── Alerts ──────────────────────────────────────────────────────────────

/// Sortable alert columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertOrder {
    /// `created_at`
    CreatedAt,
    /// `alert_level`, by severity rank.
    AlertLevel,
}

impl AlertOrder {
    /// Looks up a public ordering name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "created_at" => Some(Self::CreatedAt),
            "alert_level" => Some(Self::AlertLevel),
            _ => None,
        }
    }

    /// SQL expression over the `a` (battery_alerts) alias.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "a.created_at",
            Self::AlertLevel => {
                "CASE a.alert_level WHEN 'INFO' THEN 0 WHEN 'WARNING' THEN 1 \
                 WHEN 'ERROR' THEN 2 ELSE 3 END"
            }
        }
    }
}

impl Default for Sort<AlertOrder> {
    fn default() -> Self {
        Self::desc(AlertOrder::CreatedAt)
    }
}

impl Sort<AlertOrder> {
    /// Total order over alerts for the in-memory store.
    #[must_use]
    pub fn compare(&self, a: &BatteryAlert, b: &BatteryAlert) -> Ordering {
        let primary = match self.field {
            AlertOrder::CreatedAt => a.created_at.cmp(&b.created_at),
            AlertOrder::AlertLevel => a.alert_level.cmp(&b.alert_level),
        };
        self.finish(primary, a.id.cmp(&b.id))
    }
}

/// Alert list filter.
#[derive(Debug, Clone, Default)]
pub struct AlertFilter {
    /// Free-text search over alert type and battery serial number.
    pub search: Option<String>,
    /// Alerts of one battery.
    pub battery: Option<BatteryId>,
    /// Exact alert type.
    pub alert_type: Option<AlertType>,
    /// Exact alert level.
    pub alert_level: Option<AlertLevel>,
    /// Resolved flag.
    pub is_resolved: Option<bool>,
    /// Ordering.
    pub sort: Sort<AlertOrder>,
    /// Maximum number of rows.
    pub limit: Option<usize>,
}

impl AlertFilter {
    /// `true` when `alert` passes every filter.
    #[must_use]
    pub fn matches(&self, alert: &BatteryAlert) -> bool {
        self.battery.is_none_or(|b| alert.battery == b)
            && self.alert_type.is_none_or(|t| alert.alert_type == t)
            && self.alert_level.is_none_or(|l| alert.alert_level == l)
            && self.is_resolved.is_none_or(|r| alert.is_resolved == r)
            && matches_terms(
                &search_terms(self.search.as_deref()),
                &[alert.alert_type.as_str(), &alert.battery_serial],
            )
    }
}

// ── Logs ────────────────────────────────────────────────────────────────

/// Sortable log columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOrder {
    /// `logged_at`
    LoggedAt,
}

impl LogOrder {
    /// Looks up a public ordering name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        (name == "logged_at").then_some(Self::LoggedAt)
    }

    /// SQL expression over the `l` (battery_logs) alias.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::LoggedAt => "l.logged_at",
        }
    }
}

impl Default for Sort<LogOrder> {
    fn default() -> Self {
        Self::desc(LogOrder::LoggedAt)
    }
}

impl Sort<LogOrder> {
    /// Total order over log entries for the in-memory store.
    ///
    /// Entries logged at the same instant keep insertion order in the
    /// sort direction, so "newest first" is stable.
    #[must_use]
    pub fn compare(&self, a: &BatteryLog, b: &BatteryLog) -> Ordering {
        let primary = match self.field {
            LogOrder::LoggedAt => a.logged_at.cmp(&b.logged_at),
        };
        let primary = primary.then(a.id.cmp(&b.id));
        if self.descending {
            primary.reverse()
        } else {
            primary
        }
    }
}

/// Log list filter.
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    /// Free-text search over the battery serial number.
    pub search: Option<String>,
    /// Entries of one battery.
    pub battery: Option<BatteryId>,
    /// Exact status string.
    pub status: Option<String>,
    /// Ordering.
    pub sort: Sort<LogOrder>,
    /// Maximum number of rows.
    pub limit: Option<usize>,
}

impl LogFilter {
    /// `true` when `log` passes every filter.
    #[must_use]
    pub fn matches(&self, log: &BatteryLog) -> bool {
        self.battery.is_none_or(|b| log.battery == b)
            && self.status.as_deref().is_none_or(|s| log.status == s)
            && matches_terms(
                &search_terms(self.search.as_deref()),
                &[&log.battery_serial],
            )
    }
}

// ── Devices ─────────────────────────────────────────────────────────────

/// Sortable device columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceOrder {
    /// `device_name`
    DeviceName,
    /// `created_at`
    CreatedAt,
}

impl DeviceOrder {
    /// Looks up a public ordering name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "device_name" => Some(Self::DeviceName),
            "created_at" => Some(Self::CreatedAt),
            _ => None,
        }
    }

    /// SQL column name.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::DeviceName => "device_name",
            Self::CreatedAt => "created_at",
        }
    }
}

impl Default for Sort<DeviceOrder> {
    fn default() -> Self {
        Self::asc(DeviceOrder::DeviceName)
    }
}

impl Sort<DeviceOrder> {
    /// Total order over devices for the in-memory store.
    #[must_use]
    pub fn compare(&self, a: &BatteryDevice, b: &BatteryDevice) -> Ordering {
        let primary = match self.field {
            DeviceOrder::DeviceName => a.device_name.cmp(&b.device_name),
            DeviceOrder::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        self.finish(primary, a.id.cmp(&b.id))
    }
}

/// Device list filter.
#[derive(Debug, Clone, Default)]
pub struct DeviceFilter {
    /// Free-text search over name, serial number and location.
    pub search: Option<String>,
    /// Exact device type.
    pub device_type: Option<DeviceType>,
    /// In-service flag.
    pub is_active: Option<bool>,
    /// Ordering.
    pub sort: Sort<DeviceOrder>,
}

impl DeviceFilter {
    /// `true` when `device` passes every filter.
    #[must_use]
    pub fn matches(&self, device: &BatteryDevice) -> bool {
        self.device_type.is_none_or(|t| device.device_type == t)
            && self.is_active.is_none_or(|a| device.is_active == a)
            && matches_terms(
                &search_terms(self.search.as_deref()),
                &[&device.device_name, &device.serial_number, &device.location],
            )
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::domain::battery::fixtures::new_battery;

    #[test]
    fn parse_handles_prefix_and_fallback() {
        let default = Sort::<BatteryOrder>::default();
        let asc = Sort::parse(Some("current_charge"), BatteryOrder::from_name, default);
        assert_eq!(asc, Sort::asc(BatteryOrder::CurrentCharge));

        let desc = Sort::parse(Some("-health_percentage"), BatteryOrder::from_name, default);
        assert_eq!(desc, Sort::desc(BatteryOrder::HealthPercentage));

        let unknown = Sort::parse(Some("-serial_number"), BatteryOrder::from_name, default);
        assert_eq!(unknown, default);

        assert_eq!(Sort::parse(None, BatteryOrder::from_name, default), default);
    }

    #[test]
    fn search_requires_every_term() {
        let battery = new_battery("BAT-001").into_battery(BatteryId::new(1), Utc::now());
        let hit = BatteryFilter {
            search: Some("bat li-ion".to_string()),
            ..BatteryFilter::default()
        };
        assert!(hit.matches(&battery));

        let miss = BatteryFilter {
            search: Some("bat nimh".to_string()),
            ..BatteryFilter::default()
        };
        assert!(!miss.matches(&battery));
    }

    #[test]
    fn health_below_is_strict() {
        let battery = new_battery("BAT-001").into_battery(BatteryId::new(1), Utc::now());
        let at = BatteryFilter {
            health_below: Some(95.0),
            ..BatteryFilter::default()
        };
        assert!(!at.matches(&battery));
        let above = BatteryFilter {
            health_below: Some(95.5),
            ..BatteryFilter::default()
        };
        assert!(above.matches(&battery));
    }

    #[test]
    fn descending_sort_breaks_ties_by_id_ascending() {
        let now = Utc::now();
        let a = new_battery("A").into_battery(BatteryId::new(1), now);
        let b = new_battery("B").into_battery(BatteryId::new(2), now);
        let sort = Sort::desc(BatteryOrder::CurrentCharge);
        assert_eq!(sort.compare(&a, &b), Ordering::Less);

        let mut older = new_battery("C").into_battery(BatteryId::new(3), now - Duration::hours(1));
        older.last_updated = now - Duration::hours(1);
        assert_eq!(
            Sort::<BatteryOrder>::default().compare(&a, &older),
            Ordering::Less
        );
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_x"), "%50\\%\\_x%");
    }
}
