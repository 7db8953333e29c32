//! HTTP route handlers for Warroom.

use std::time::Duration;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::state::AppState;
use spectre_common::SpectreError;

mod health;
mod missions;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.mission.request_timeout_secs);

    Router::new()
        // Health & Status
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/metrics", get(health::metrics))
        // Mission lifecycle
        .route("/missions", post(missions::create_mission))
        .route("/missions/{mission_id}", get(missions::get_mission))
        .route("/missions/{mission_id}/start", post(missions::start_mission))
        .route(
            "/missions/{mission_id}/steps/{step_id}/submit",
            post(missions::submit_step),
        )
        .route(
            "/missions/{mission_id}/steps/{step_id}/hint",
            post(missions::request_hint),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(TimeoutLayer::new(timeout)),
        )
        // Add shared state
        .with_state(state)
}

/// Domain error bridged into an HTTP response
pub struct ApiError(pub SpectreError);

impl From<SpectreError> for ApiError {
    fn from(err: SpectreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}
