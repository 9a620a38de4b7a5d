//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Resource endpoints are mounted under `/api`; the welcome document and
//! health check live at the root next to the `/ws/dashboard` upgrade.

pub mod dto;
pub mod handlers;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::config::MonitorConfig;
use crate::ws::handler::dashboard_ws_handler;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api", handlers::routes())
        .merge(handlers::system::routes())
}

/// Assembles the full application: REST, WebSocket, optional Swagger UI
/// and the tower middleware stack, with `state` attached.
pub fn build_app(state: AppState, config: &MonitorConfig) -> Router {
    let router = build_router().route("/ws/dashboard", get(dashboard_ws_handler));

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        router.merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", crate::openapi::ApiDoc::openapi()),
        )
    };

    router
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tokio_test::assert_ok;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::EventBus;
    use crate::persistence::Store;
    use crate::service::{BatteryService, DashboardService};

    fn app() -> Router {
        let config = MonitorConfig::default();
        let store = Arc::new(Store::memory());
        let event_bus = EventBus::new(8);
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
        build_app(state, &config)
    }

    async fn get(uri: &str) -> (StatusCode, serde_json::Value) {
        let request = assert_ok!(Request::builder().uri(uri).body(Body::empty()));
        let response = assert_ok!(app().oneshot(request).await);
        let status = response.status();
        let bytes = assert_ok!(axum::body::to_bytes(response.into_body(), usize::MAX).await);
        (status, serde_json::from_slice(&bytes).unwrap_or_default())
    }

    #[tokio::test]
    async fn static_segments_win_over_ids() {
        let (status, body) = get("/api/batteries/low_health_batteries").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));

        let (status, _) = get("/api/alerts/unresolved").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_records_render_error_body() {
        let (status, body) = get("/api/devices/7").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], 2004);
    }

    #[tokio::test]
    async fn empty_list_has_pagination() {
        let (status, body) = get("/api/logs?per_page=500").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["per_page"], 100);
        assert_eq!(body["pagination"]["total_pages"], 0);
    }
}
