use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState, copilot_path: &str) -> Router {
    let info_path = format!("{}/info", copilot_path.trim_end_matches('/'));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // COPILOT RUNTIME
        // ========================================
        .route(copilot_path, post(handlers::copilotkit::handle))
        .route(&info_path, get(handlers::copilotkit::info))
        .with_state(state)
}
