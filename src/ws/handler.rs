//! Axum WebSocket upgrade handler.

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;
use uuid::Uuid;

use super::connection::run_connection;
use crate::app_state::AppState;

/// `GET /ws/dashboard`: Upgrade to the dashboard event stream.
///
/// The receiver is created before the upgrade completes, so no event
/// published after the handshake is missed.
pub async fn dashboard_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let event_rx = state.event_bus.subscribe();
    let connection_id = Uuid::new_v4();

    ws.on_upgrade(move |socket| run_connection(socket, event_rx, connection_id))
}
