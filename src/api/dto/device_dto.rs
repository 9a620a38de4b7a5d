//! Device list query and response types.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::{PaginationMeta, parse_choice};
use crate::error::MonitorError;
use crate::persistence::query::DeviceOrder;
use crate::persistence::{DeviceFilter, Sort};
use crate::service::DeviceDetail;

/// Filters and ordering accepted by `GET /api/devices`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeviceListQuery {
    /// Terms matched against name, serial number and location.
    pub search: Option<String>,
    /// `MOBILE`, `LAPTOP`, `DRONE`, `VEHICLE`, `INDUSTRIAL` or `OTHER`.
    pub device_type: Option<String>,
    /// `true` or `false`.
    pub is_active: Option<bool>,
    /// `device_name` or `created_at`; prefix with `-` for descending.
    pub ordering: Option<String>,
}

impl DeviceListQuery {
    /// Converts the raw query into a store filter.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError`] for an unknown device type.
    pub fn into_filter(self) -> Result<DeviceFilter, MonitorError> {
        Ok(DeviceFilter {
            device_type: parse_choice(self.device_type.as_deref())?,
            is_active: self.is_active,
            sort: Sort::parse(
                self.ordering.as_deref(),
                DeviceOrder::from_name,
                Sort::default(),
            ),
            search: self.search,
        })
    }
}

/// Paginated device list.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeviceListResponse {
    /// Devices on this page, each with its batteries expanded.
    pub data: Vec<DeviceDetail>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}
