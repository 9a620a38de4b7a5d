//! Battery list query and response types.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::{PaginationMeta, parse_choice, parse_number};
use crate::domain::Battery;
use crate::error::MonitorError;
use crate::persistence::query::BatteryOrder;
use crate::persistence::{BatteryFilter, Sort};

/// Filters and ordering accepted by `GET /api/batteries`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BatteryListQuery {
    /// Whitespace-separated terms matched against serial number and type.
    pub search: Option<String>,
    /// Exact battery type, e.g. `Li-ion`.
    pub battery_type: Option<String>,
    /// One of `CHARGING`, `DISCHARGING`, `IDLE`, `FAULT`.
    pub current_status: Option<String>,
    /// Only batteries with health strictly below this percentage.
    pub health_below: Option<String>,
    /// `current_charge`, `health_percentage`, `created_at` or
    /// `last_updated`; prefix with `-` for descending.
    pub ordering: Option<String>,
}

impl BatteryListQuery {
    /// Converts the raw query into a store filter.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError`] for an unknown status or a non-numeric
    /// `health_below`.
    pub fn into_filter(self) -> Result<BatteryFilter, MonitorError> {
        Ok(BatteryFilter {
            status: parse_choice(self.current_status.as_deref())?,
            health_below: parse_number("health_below", self.health_below.as_deref())?,
            sort: Sort::parse(
                self.ordering.as_deref(),
                BatteryOrder::from_name,
                Sort::default(),
            ),
            search: self.search,
            battery_type: self.battery_type.filter(|t| !t.trim().is_empty()),
        })
    }
}

/// Paginated battery list.
#[derive(Debug, Serialize, ToSchema)]
pub struct BatteryListResponse {
    /// Batteries on this page.
    pub data: Vec<Battery>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Optional health threshold for `GET /api/batteries/low_health_batteries`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ThresholdQuery {
    /// Health percentage; defaults to the configured threshold.
    pub threshold: Option<String>,
}

impl ThresholdQuery {
    /// Parsed threshold, if one was given.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidField`] when the value is not a number.
    pub fn threshold(&self) -> Result<Option<f64>, MonitorError> {
        parse_number("threshold", self.threshold.as_deref())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::BatteryStatus;

    #[test]
    fn query_becomes_filter() {
        let query = BatteryListQuery {
            search: Some("bat".to_string()),
            battery_type: Some(" ".to_string()),
            current_status: Some("CHARGING".to_string()),
            health_below: Some("90".to_string()),
            ordering: Some("-current_charge".to_string()),
        };
        let Ok(filter) = query.into_filter() else {
            panic!("valid query rejected");
        };
        assert_eq!(filter.status, Some(BatteryStatus::Charging));
        assert_eq!(filter.health_below, Some(90.0));
        assert_eq!(filter.battery_type, None);
        assert_eq!(filter.sort, Sort::desc(BatteryOrder::CurrentCharge));
    }

    #[test]
    fn bad_values_are_rejected() {
        let status = BatteryListQuery {
            current_status: Some("ASLEEP".to_string()),
            ..BatteryListQuery::default()
        };
        assert!(status.into_filter().is_err());

        let threshold = ThresholdQuery {
            threshold: Some("lots".to_string()),
        };
        assert!(matches!(
            threshold.threshold(),
            Err(MonitorError::InvalidField { field: "threshold", .. })
        ));
    }
}
