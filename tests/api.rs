//! End-to-end REST tests against the in-memory store.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

mod common;

use reqwest::StatusCode;
use serde_json::json;

use common::{battery_body, spawn_app};

#[tokio::test]
async fn welcome_and_health() {
    let app = spawn_app().await;

    let (status, body) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["api_endpoints"]["batteries"], "/api/batteries");

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "memory");
}

#[tokio::test]
async fn battery_crud() {
    let app = spawn_app().await;
    let id = app.create_battery("BAT-100").await;

    let (status, body) = app.get(&format!("/api/batteries/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["serial_number"], "BAT-100");

    let (status, body) = app
        .patch(&format!("/api/batteries/{id}"), &json!({"cycle_count": 11}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cycle_count"], 11);
    assert_eq!(body["battery_type"], "Li-ion");

    let mut replacement = battery_body("BAT-100");
    replacement["battery_type"] = json!("LiFePO4");
    let response = app
        .client
        .put(app.url(&format!("/api/batteries/{id}")))
        .json(&replacement)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["battery_type"], "LiFePO4");
    assert_eq!(body["cycle_count"], 10);

    assert_eq!(
        app.delete(&format!("/api/batteries/{id}")).await,
        StatusCode::NO_CONTENT
    );
    let (status, body) = app.get(&format!("/api/batteries/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], 2001);
}

#[tokio::test]
async fn invalid_and_duplicate_batteries_are_rejected() {
    let app = spawn_app().await;
    app.create_battery("BAT-1").await;

    let (status, body) = app.post("/api/batteries", &battery_body("BAT-1")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], 2101);

    let mut bad = battery_body("BAT-2");
    bad["current_charge"] = json!(150.0);
    let (status, body) = app.post("/api/batteries", &bad).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 1002);
    assert_eq!(body["error"]["details"], "current_charge");
}

#[tokio::test]
async fn list_is_paginated_and_filtered() {
    let app = spawn_app().await;
    for n in 0..5 {
        app.create_battery(&format!("BAT-{n}")).await;
    }

    let (status, body) = app
        .get("/api/batteries?page=2&per_page=2&ordering=created_at")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 5);
    assert_eq!(body["pagination"]["total_pages"], 3);
    assert_eq!(body["data"][0]["serial_number"], "BAT-2");

    let (_, body) = app.get("/api/batteries?search=bat-4").await;
    assert_eq!(body["pagination"]["total"], 1);

    let (status, body) = app.get("/api/batteries?current_status=ASLEEP").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"], "current_status");
}

#[tokio::test]
async fn status_update_logs_and_raises_alerts() {
    let app = spawn_app().await;
    let id = app.create_battery("BAT-HOT").await;

    let (status, body) = app
        .post(
            &format!("/api/batteries/{id}/update_status"),
            &json!({"current_charge": 5.0, "current_temperature": 60.0, "current": -1.5}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_charge"], 5.0);

    let (_, logs) = app.get(&format!("/api/logs?battery={id}")).await;
    assert_eq!(logs["pagination"]["total"], 1);
    assert_eq!(logs["data"][0]["current"], -1.5);
    let log_id = logs["data"][0]["id"].as_i64().unwrap();
    let (status, _) = app.get(&format!("/api/logs/{log_id}")).await;
    assert_eq!(status, StatusCode::OK);

    let (_, alerts) = app.get("/api/alerts/unresolved").await;
    let types: Vec<&str> = alerts
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["alert_type"].as_str().unwrap())
        .collect();
    assert_eq!(types.len(), 2);
    assert!(types.contains(&"LOW_CHARGE"));
    assert!(types.contains(&"OVER_TEMPERATURE"));

    let (_, report) = app.get(&format!("/api/batteries/{id}/health_report")).await;
    assert_eq!(report["recent_alerts"].as_array().unwrap().len(), 2);
    assert_eq!(report["average_temperature"], 60.0);
}

#[tokio::test]
async fn resolving_an_alert() {
    let app = spawn_app().await;
    let id = app.create_battery("BAT-A").await;

    let (status, alert) = app
        .post(
            "/api/alerts",
            &json!({
                "battery": id,
                "alert_type": "FAULT",
                "alert_level": "INFO",
                "message": "Scheduled check"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{alert}");
    assert_eq!(alert["battery_serial"], "BAT-A");
    let alert_id = alert["id"].as_i64().unwrap();

    let (status, resolved) = app
        .post(&format!("/api/alerts/{alert_id}/resolve"), &json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolved["is_resolved"], true);
    assert!(resolved["resolved_at"].is_string());

    let (_, unresolved) = app.get("/api/alerts/unresolved").await;
    assert!(unresolved.as_array().unwrap().is_empty());

    let (status, body) = app
        .post(
            "/api/alerts",
            &json!({"battery": 999, "alert_type": "LOW_CHARGE", "alert_level": "INFO", "message": "x"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
}

#[tokio::test]
async fn low_health_and_critical_listings() {
    let app = spawn_app().await;
    let worn = app.create_battery("BAT-WORN").await;
    app.create_battery("BAT-OK").await;
    app.patch(
        &format!("/api/batteries/{worn}"),
        &json!({"health_percentage": 60.0, "current_status": "FAULT"}),
    )
    .await;

    let (_, low) = app.get("/api/batteries/low_health_batteries").await;
    assert_eq!(low.as_array().unwrap().len(), 1);
    let (_, low) = app
        .get("/api/batteries/low_health_batteries?threshold=99")
        .await;
    assert_eq!(low.as_array().unwrap().len(), 2);
    let (status, _) = app
        .get("/api/batteries/low_health_batteries?threshold=abc")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, critical) = app.get("/api/batteries/critical_status_batteries").await;
    assert_eq!(critical[0]["serial_number"], "BAT-WORN");
}

#[tokio::test]
async fn devices_expand_their_batteries() {
    let app = spawn_app().await;
    let a = app.create_battery("BAT-D1").await;
    let b = app.create_battery("BAT-D2").await;

    let (status, device) = app
        .post(
            "/api/devices",
            &json!({
                "device_name": "Drone 7",
                "device_type": "DRONE",
                "serial_number": "DEV-7",
                "batteries": [a, b]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{device}");
    assert_eq!(device["batteries"], json!([a, b]));
    assert_eq!(device["batteries_detail"].as_array().unwrap().len(), 2);
    let device_id = device["id"].as_i64().unwrap();

    let (_, detail) = app
        .get(&format!("/api/devices/{device_id}/battery_status"))
        .await;
    assert_eq!(detail["device"]["serial_number"], "DEV-7");
    assert_eq!(detail["batteries"].as_array().unwrap().len(), 2);

    app.delete(&format!("/api/batteries/{a}")).await;
    let (_, after) = app.get(&format!("/api/devices/{device_id}")).await;
    assert_eq!(after["batteries"], json!([b]));

    let (status, _) = app
        .post(
            "/api/devices",
            &json!({
                "device_name": "Ghost",
                "device_type": "OTHER",
                "serial_number": "DEV-8",
                "batteries": [12345]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(
        app.delete(&format!("/api/devices/{device_id}")).await,
        StatusCode::NO_CONTENT
    );
    let (status, _) = app.get(&format!("/api/batteries/{b}")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn dashboard_aggregates() {
    let app = spawn_app().await;
    let id = app.create_battery("BAT-X").await;
    app.create_battery("BAT-Y").await;
    app.post(
        &format!("/api/batteries/{id}/update_status"),
        &json!({"current_status": "CHARGING", "current_charge": 50.0}),
    )
    .await;

    let (status, stats) = app.get("/api/dashboard/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["batteries"]["total"], 2);
    assert_eq!(stats["batteries"]["active"], 1);
    assert_eq!(stats["charge"]["average"], 65.0);

    let (_, charts) = app.get("/api/dashboard/chart-data").await;
    assert!(charts["status"].is_array());

    let (_, trend) = app.get(&format!("/api/dashboard/trend?battery_id={id}")).await;
    assert_eq!(trend["charge"], json!([50.0]));
    let (status, _) = app.get("/api/dashboard/trend?battery_id=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, export) = app.get("/api/dashboard/export").await;
    assert_eq!(status, StatusCode::OK);
    assert!(export["timestamp"].is_string());
    assert_eq!(export["batteries"]["batteries"].as_array().unwrap().len(), 2);
}
