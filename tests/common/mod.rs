//! Shared helpers: spawn the full app on an ephemeral port over the
//! in-memory store.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::{Value, json};

use battery_monitor::api;
use battery_monitor::app_state::AppState;
use battery_monitor::config::MonitorConfig;
use battery_monitor::domain::EventBus;
use battery_monitor::persistence::Store;
use battery_monitor::service::{BatteryService, DashboardService};

/// A running server and an HTTP client pointed at it.
#[derive(Debug)]
pub struct TestApp {
    /// Bound address.
    pub addr: SocketAddr,
    /// Shared client.
    pub client: reqwest::Client,
}

impl TestApp {
    /// `http://127.0.0.1:<port><path>`
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// POSTs `body` and returns status and parsed body.
    pub async fn post(&self, path: &str, body: &Value) -> (reqwest::StatusCode, Value) {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .unwrap();
        let status = response.status();
        (status, response.json().await.unwrap_or(Value::Null))
    }

    /// PATCHes `body` and returns status and parsed body.
    pub async fn patch(&self, path: &str, body: &Value) -> (reqwest::StatusCode, Value) {
        let response = self
            .client
            .patch(self.url(path))
            .json(body)
            .send()
            .await
            .unwrap();
        let status = response.status();
        (status, response.json().await.unwrap_or(Value::Null))
    }

    /// GETs `path` and returns status and parsed body.
    pub async fn get(&self, path: &str) -> (reqwest::StatusCode, Value) {
        let response = self.client.get(self.url(path)).send().await.unwrap();
        let status = response.status();
        (status, response.json().await.unwrap_or(Value::Null))
    }

    /// DELETEs `path` and returns the status.
    pub async fn delete(&self, path: &str) -> reqwest::StatusCode {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .unwrap()
            .status()
    }

    /// Creates a healthy Li-ion battery and returns its id.
    pub async fn create_battery(&self, serial: &str) -> i64 {
        let (status, body) = self.post("/api/batteries", &battery_body(serial)).await;
        assert_eq!(status, reqwest::StatusCode::CREATED, "{body}");
        body["id"].as_i64().unwrap()
    }
}

/// Valid create body for a battery.
pub fn battery_body(serial: &str) -> Value {
    json!({
        "serial_number": serial,
        "battery_type": "Li-ion",
        "capacity": 5000.0,
        "voltage_nominal": 3.7,
        "current_charge": 80.0,
        "current_voltage": 3.7,
        "current_temperature": 25.0,
        "current_status": "IDLE",
        "health_percentage": 95.0,
        "cycle_count": 10,
        "max_discharge_current": 10.0,
        "max_charge_current": 5.0
    })
}

/// Starts the application in the background.
pub async fn spawn_app() -> TestApp {
    let config = MonitorConfig {
        persistence_enabled: false,
        event_bus_capacity: 64,
        ..MonitorConfig::default()
    };
    let store = Arc::new(Store::memory());
    let event_bus = EventBus::new(config.event_bus_capacity);
    let state = AppState {
        battery_service: Arc::new(BatteryService::new(
            Arc::clone(&store),
            event_bus.clone(),
            config.thresholds(),
            config.low_health_threshold,
        )),
        dashboard_service: Arc::new(DashboardService::new(store)),
        event_bus,
    };
    let app = api::build_app(state, &config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        addr,
        client: reqwest::Client::new(),
    }
}
