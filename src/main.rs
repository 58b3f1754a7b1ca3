use std::sync::Arc;

use anyhow::Context;
use booking_backend::{
    app::create_router,
    app_state::AppState,
    config, db,
    db::repositories::{PgBookingRepository, PgScheduleRepository},
    telemetry::init_telemetry,
};
use dotenv::dotenv;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let telemetry = init_telemetry(None).await?;
    let config = config::init()?;

    let pool = db::init_pool(config).await?;
    info!("Database pool ready, migrations applied");

    let state = AppState::new(
        config.clone(),
        Arc::new(PgScheduleRepository::new(pool.clone())),
        Arc::new(PgBookingRepository::new(pool)),
    );
    let app = create_router(state);

    let addr = config.server_addr();
    info!("{} listening on {}", config.app.name, addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Failed to serve application")?;

    telemetry.shutdown().await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}
