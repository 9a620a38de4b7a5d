//! WebSocket frame payloads.
//!
//! Server pushes are the serialized [`DashboardEvent`] itself, with no
//! envelope. The only other frame the server sends is [`EchoReply`].

use serde::{Deserialize, Serialize};

use crate::domain::DashboardEvent;

/// Reply to a text frame sent by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoReply {
    /// The client's text, verbatim.
    pub echo: String,
}

impl EchoReply {
    /// Serializes the reply for `text`. Empty text gets no reply.
    #[must_use]
    pub fn frame(text: &str) -> Option<String> {
        if text.is_empty() {
            return None;
        }
        serde_json::to_string(&Self {
            echo: text.to_string(),
        })
        .ok()
    }
}

/// Serializes a dashboard event into a text frame.
#[must_use]
pub fn event_frame(event: &DashboardEvent) -> Option<String> {
    match serde_json::to_string(event) {
        Ok(json) => Some(json),
        Err(err) => {
            tracing::error!(error = %err, event_type = event.event_type_str(), "event serialization failed");
            None
        }
    }
}
