//! Dashboard WebSocket tests: echo frames and pushed events.

#![allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]

mod common;

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use common::spawn_app;

type Socket =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

async fn next_json(socket: &mut Socket) -> Value {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        match frame {
            Message::Text(text) => return serde_json::from_str(text.as_str()).unwrap(),
            Message::Ping(_) | Message::Pong(_) => {}
            other => panic!("unexpected frame {other:?}"),
        }
    }
}

#[tokio::test]
async fn text_frames_are_echoed() {
    let app = spawn_app().await;
    let (mut socket, _) = connect_async(format!("ws://{}/ws/dashboard", app.addr))
        .await
        .unwrap();

    socket.send(Message::text("hello")).await.unwrap();
    assert_eq!(next_json(&mut socket).await, json!({"echo": "hello"}));
}

#[tokio::test]
async fn empty_text_frames_get_no_reply() {
    let app = spawn_app().await;
    let (mut socket, _) = connect_async(format!("ws://{}/ws/dashboard", app.addr))
        .await
        .unwrap();

    socket.send(Message::text("")).await.unwrap();
    socket.send(Message::text("next")).await.unwrap();
    assert_eq!(next_json(&mut socket).await, json!({"echo": "next"}));
}

#[tokio::test]
async fn saves_are_pushed_to_clients() {
    let app = spawn_app().await;
    let (mut socket, _) = connect_async(format!("ws://{}/ws/dashboard", app.addr))
        .await
        .unwrap();
    // Round-trip an echo so the subscription is live before saving.
    socket.send(Message::text("ready")).await.unwrap();
    next_json(&mut socket).await;

    let id = app.create_battery("BAT-WS").await;
    let created = next_json(&mut socket).await;
    assert_eq!(created["type"], "battery_update");
    assert_eq!(created["created"], true);
    assert_eq!(created["battery"]["serial_number"], "BAT-WS");

    app.post(
        &format!("/api/batteries/{id}/update_status"),
        &json!({"current_charge": 3.0}),
    )
    .await;
    let updated = next_json(&mut socket).await;
    assert_eq!(updated["type"], "battery_update");
    assert_eq!(updated["created"], false);

    let alert = next_json(&mut socket).await;
    assert_eq!(alert["type"], "alert_update");
    assert_eq!(alert["alert"]["alert_type"], "LOW_CHARGE");
}
