//! Dashboard WebSocket connection loop.
//!
//! Forwards every event from the bus to the client and echoes client text
//! frames back. There is no per-client filtering: every connection is a
//! member of the single dashboard group.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use uuid::Uuid;

use super::messages::{EchoReply, event_frame};
use crate::domain::DashboardEvent;

/// Runs the read/write loop for a single dashboard connection until the
/// client closes it, a send fails or the bus shuts down.
pub async fn run_connection(
    socket: WebSocket,
    mut event_rx: broadcast::Receiver<DashboardEvent>,
    connection_id: Uuid,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    tracing::debug!(%connection_id, "dashboard client joined");

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(reply) = EchoReply::frame(text.as_str())
                            && ws_tx.send(Message::text(reply)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!(%connection_id, error = %err, "dashboard socket error");
                        break;
                    }
                    // Binary frames are ignored; ping/pong is handled by axum.
                    Some(Ok(_)) => {}
                }
            }
            event = event_rx.recv() => {
                match event {
                    Ok(event) => {
                        if let Some(frame) = event_frame(&event)
                            && ws_tx.send(Message::text(frame)).await.is_err() {
                                break;
                            }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(%connection_id, lagged = n, "dashboard client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!(%connection_id, "dashboard client left");
}
