mod app;
mod auth;
mod config;
mod db;
mod error;
mod messages;
mod progress;
mod state;
mod web;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "cat_kombat=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    if config.jwt.uses_insecure_default() {
        tracing::warn!("session tokens are signed with the insecure default secret; set JWT_SECRET before production");
    }
    let (host, port) = (config.server.host.clone(), config.server.port);

    let app_state = AppState::init(config).await?;
    let app = app::build_app(app_state);
    app::serve(app, &host, port).await
}
