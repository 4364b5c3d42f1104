mod handlers;
mod models;

use axum::{
    routing::{get_service, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::AppState;

pub use handlers::{ask, not_found, respond};
pub use models::{AskRequest, ErrorResponse, RespondRequest};

pub fn router(state: AppState) -> Router {
    let frontend = state.frontend_dir.clone();

    Router::new()
        .route("/ask", post(ask))
        .route("/api/respond", post(respond))
        .route(
            "/",
            get_service(ServeFile::new(frontend.join("index.html"))).fallback(not_found),
        )
        .nest_service("/static", ServeDir::new(frontend))
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
