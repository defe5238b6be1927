// src/main.rs

use std::sync::Arc;

use bookswap::{
    config::Config,
    db,
    notify::{LogMailer, NotificationDispatcher},
    routes,
    state::AppState,
    telemetry,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Reads .env itself
    let config = Config::from_env()?;

    let _guard = telemetry::init(&config.rust_log, "app.log");

    let pool = db::connect(&config.database_url).await?;

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let mailer = Arc::new(LogMailer::new(config.mail_sender.clone()));
    let (notifier, _worker) = NotificationDispatcher::spawn(mailer);

    let state = AppState {
        pool,
        config: config.clone(),
        notifier,
    };

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
