use copydesk::config::Config;
use copydesk::db::AccountsStorage;
use mimalloc::MiMalloc;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    let gemini_mode = if cfg.gemini_key().is_some() {
        "online"
    } else {
        "offline fallback"
    };
    info!(
        database_url = %cfg.database_url,
        gemini = gemini_mode,
        payments = cfg.stripe_key().is_some(),
        public_base_url = %cfg.public_base_url,
        loglevel = %cfg.loglevel,
    );

    let storage = AccountsStorage::connect(&cfg.database_url).await?;
    let state = copydesk::CopydeskState::new(&cfg, Arc::new(storage))?;
    let app = copydesk::copydesk_router(state);

    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
    }
    info!("shutdown signal received");
}
