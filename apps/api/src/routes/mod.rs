pub mod docs;
pub mod health;
pub mod params;

use axum::{routing::get, Router};
use tower_http::services::ServeDir;

use crate::render::handlers as render_handlers;
use crate::state::AppState;
use crate::transliteration::handlers as transliteration_handlers;

pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api", get(docs::api_docs_handler))
        .route(
            "/api/text-to-png",
            get(render_handlers::handle_text_to_png),
        )
        .route(
            "/api/transliterate",
            get(transliteration_handlers::handle_transliterate),
        )
        // Web UI and anything else on disk
        .fallback_service(static_files)
        .with_state(state)
}
