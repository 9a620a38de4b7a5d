//! # battery-monitor
//!
//! REST API and real-time WebSocket dashboard for a fleet of batteries.
//!
//! The service keeps an inventory of batteries, an append-only log of their
//! readings, threshold alerts and the devices that host them. Every status
//! update is checked against configurable thresholds; battery and alert
//! changes are pushed to dashboard clients over `/ws/dashboard`.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── BatteryService / DashboardService (service/)
//!     ├── AlertThresholds, EventBus (domain/)
//!     │
//!     └── Store (persistence/)
//!           ├── PostgreSQL
//!           └── in-memory
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod openapi;
pub mod persistence;
pub mod seed;
pub mod service;
pub mod ws;
