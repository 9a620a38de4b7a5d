//! Alert list query and response types.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::{PaginationMeta, parse_choice, parse_number};
use crate::domain::{BatteryAlert, BatteryId};
use crate::error::MonitorError;
use crate::persistence::query::AlertOrder;
use crate::persistence::{AlertFilter, Sort};

/// Filters and ordering accepted by `GET /api/alerts`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AlertListQuery {
    /// Terms matched against the alert type and the battery serial number.
    pub search: Option<String>,
    /// Battery id.
    pub battery: Option<String>,
    /// Alert type, e.g. `LOW_CHARGE`.
    pub alert_type: Option<String>,
    /// `INFO`, `WARNING`, `ERROR` or `CRITICAL`.
    pub alert_level: Option<String>,
    /// `true` or `false`.
    pub is_resolved: Option<bool>,
    /// `created_at` or `alert_level`; prefix with `-` for descending.
    pub ordering: Option<String>,
}

impl AlertListQuery {
    /// Converts the raw query into a store filter.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError`] for unknown enum values or a non-numeric
    /// battery id.
    pub fn into_filter(self) -> Result<AlertFilter, MonitorError> {
        Ok(AlertFilter {
            battery: parse_number::<i64>("battery", self.battery.as_deref())?.map(BatteryId::new),
            alert_type: parse_choice(self.alert_type.as_deref())?,
            alert_level: parse_choice(self.alert_level.as_deref())?,
            is_resolved: self.is_resolved,
            sort: Sort::parse(
                self.ordering.as_deref(),
                AlertOrder::from_name,
                Sort::default(),
            ),
            search: self.search,
            limit: None,
        })
    }
}

/// Paginated alert list.
#[derive(Debug, Serialize, ToSchema)]
pub struct AlertListResponse {
    /// Alerts on this page.
    pub data: Vec<BatteryAlert>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{AlertLevel, AlertType};

    #[test]
    fn query_becomes_filter() {
        let query = AlertListQuery {
            battery: Some("4".to_string()),
            alert_type: Some("OVER_TEMPERATURE".to_string()),
            alert_level: Some("CRITICAL".to_string()),
            is_resolved: Some(false),
            ordering: Some("-alert_level".to_string()),
            ..AlertListQuery::default()
        };
        let Ok(filter) = query.into_filter() else {
            panic!("valid query rejected");
        };
        assert_eq!(filter.battery, Some(BatteryId::new(4)));
        assert_eq!(filter.alert_type, Some(AlertType::OverTemperature));
        assert_eq!(filter.alert_level, Some(AlertLevel::Critical));
        assert_eq!(filter.is_resolved, Some(false));
        assert_eq!(filter.sort, Sort::desc(AlertOrder::AlertLevel));
    }

    #[test]
    fn unknown_level_is_rejected() {
        let query = AlertListQuery {
            alert_level: Some("PANIC".to_string()),
            ..AlertListQuery::default()
        };
        assert!(query.into_filter().is_err());
    }
}
