//! REST endpoint handlers organized by resource.

pub mod alerts;
pub mod batteries;
pub mod dashboard;
pub mod devices;
pub mod logs;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(batteries::routes())
        .merge(alerts::routes())
        .merge(logs::routes())
        .merge(devices::routes())
        .merge(dashboard::routes())
}
