use gemini_wrapper_service::{build_app, config::AppConfig, run_server, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("gemini_wrapper_service=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).compact().init();

    let config = AppConfig::from_env()?;
    info!(model = %config.model, frontend = %config.frontend_dir.display(), "configuration loaded");

    let app = build_app(AppState::from_config(&config));
    run_server(app, config.port).await?;
    Ok(())
}
