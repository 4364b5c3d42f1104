pub mod api;
pub mod bridge;
pub mod category;
pub mod config;
pub mod error;
pub mod mode;
pub mod normalize;
pub mod prompt;
pub mod service;

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use tracing::info;

use crate::bridge::{GeminiBridge, GenerativeModel};
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn GenerativeModel>,
    pub frontend_dir: PathBuf,
}

impl AppState {
    pub fn new(model: Arc<dyn GenerativeModel>, frontend_dir: impl Into<PathBuf>) -> Self {
        Self {
            model,
            frontend_dir: frontend_dir.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let bridge = GeminiBridge::new(&config.api_key, &config.api_base, &config.model);
        Self::new(Arc::new(bridge), &config.frontend_dir)
    }
}

pub fn build_app(state: AppState) -> Router {
    api::router(state)
}

pub async fn run_server(app: Router, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}
