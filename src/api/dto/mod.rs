//! Data Transfer Objects for REST query strings and list responses.
//!
//! Record bodies (create, replace, patch) use the domain types directly;
//! this module only adds what the HTTP surface needs on top of them:
//! pagination, list filters parsed from query strings, and the paginated
//! response envelopes.

pub mod alert_dto;
pub mod battery_dto;
pub mod common_dto;
pub mod dashboard_dto;
pub mod device_dto;
pub mod log_dto;

pub use alert_dto::*;
pub use battery_dto::*;
pub use common_dto::*;
pub use dashboard_dto::*;
pub use device_dto::*;
pub use log_dto::*;
