//! WebSocket layer: the real-time dashboard channel.
//!
//! `/ws/dashboard` pushes a JSON frame for every battery or alert save
//! and echoes whatever text the client sends.

pub mod connection;
pub mod handler;
pub mod messages;
