//! Mega-Data API server.
//!
//! Reads configuration from TOML file (~/.config/mega-data/config.toml,
//! or the path in `MEGA_DATA_CONFIG`), then the hosting environment
//! (`PORT`, `DATABASE_URL`, `JWT_SECRET`, ...).

use tracing::{error, info};

use mega_data::server::{init_tracing, ServerHandle, ServerOptions};
use mega_data::{default_config_path, AppConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var("MEGA_DATA_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());

    let config = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default().with_env_overrides(|key| std::env::var(key).ok())
        }
    };

    let handle = ServerHandle::start(ServerOptions {
        config,
        ..ServerOptions::default()
    })
    .await?;

    handle.install_signal_handler();
    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;
    Ok(())
}
