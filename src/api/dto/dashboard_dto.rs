//! Dashboard query types.

use serde::Deserialize;
use utoipa::IntoParams;

use super::common_dto::parse_number;
use crate::domain::BatteryId;
use crate::error::MonitorError;

/// Optional battery selector for `GET /api/dashboard/trend`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TrendQuery {
    /// Restrict the trend to one battery.
    pub battery_id: Option<String>,
}

impl TrendQuery {
    /// Parsed battery id, if one was given.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidField`] when the id is not a number.
    pub fn battery_id(&self) -> Result<Option<BatteryId>, MonitorError> {
        Ok(parse_number::<i64>("battery_id", self.battery_id.as_deref())?.map(BatteryId::new))
    }
}
