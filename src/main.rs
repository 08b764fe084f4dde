//! Server binary: load settings from the environment, open the store,
//! and serve the API until interrupted.

use tracing_subscriber::EnvFilter;

use curamind::api::{start_server, ApiContext};
use curamind::config::{self, Settings};
use curamind::db::open_database;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let settings = Settings::from_env()?;

    if let Some(parent) = settings.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let conn = open_database(&settings.database_path)?;

    let port = settings.port;
    let ctx = ApiContext::new(conn, settings);
    let mut server = start_server(ctx, port).await?;

    tracing::info!(addr = %server.addr, "listening");

    tokio::signal::ctrl_c().await?;
    tracing::info!("interrupt received, shutting down");
    server.shutdown();

    Ok(())
}
