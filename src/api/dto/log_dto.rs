//! Log list query and response types.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::{PaginationMeta, parse_number};
use crate::domain::{BatteryId, BatteryLog};
use crate::error::MonitorError;
use crate::persistence::query::LogOrder;
use crate::persistence::{LogFilter, Sort};

/// Filters and ordering accepted by `GET /api/logs`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LogListQuery {
    /// Terms matched against the battery serial number.
    pub search: Option<String>,
    /// Battery id.
    pub battery: Option<String>,
    /// Recorded status, e.g. `CHARGING`.
    pub status: Option<String>,
    /// `logged_at` or `-logged_at`.
    pub ordering: Option<String>,
}

impl LogListQuery {
    /// Converts the raw query into a store filter.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidField`] for a non-numeric battery id.
    pub fn into_filter(self) -> Result<LogFilter, MonitorError> {
        Ok(LogFilter {
            battery: parse_number::<i64>("battery", self.battery.as_deref())?.map(BatteryId::new),
            status: self.status.filter(|s| !s.trim().is_empty()),
            sort: Sort::parse(self.ordering.as_deref(), LogOrder::from_name, Sort::default()),
            search: self.search,
            limit: None,
        })
    }
}

/// Paginated log list.
#[derive(Debug, Serialize, ToSchema)]
pub struct LogListResponse {
    /// Log entries on this page.
    pub data: Vec<BatteryLog>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}
