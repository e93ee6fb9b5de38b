pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::state::AppState;
use crate::submission::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/submit-form", post(handlers::handle_submit))
        // Everything else (GET / included) is the static landing page.
        .fallback_service(ServeDir::new("public"))
        .with_state(state)
}
