//! Mega-Data: CLI server
//!
//! Headless membership API suitable for deployment as a systemd service,
//! Docker container, or hosted web service.
//!
//! ```sh
//! # Run with default config (~/.config/mega-data/config.toml)
//! mega-data-service
//!
//! # Custom config path and port
//! mega-data-service --config /etc/mega-data/config.toml --port 8080
//!
//! # Validate config without starting
//! mega-data-service --check
//!
//! # Repair stored department names and exit
//! mega-data-service --normalize-services
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use mega_data::config::AppConfig;
use mega_data::server::{init_tracing, normalize_services, ServerHandle, ServerOptions};

/// Mega-Data: church membership and attendance API.
#[derive(Parser, Debug)]
#[command(
    name = "mega-data-service",
    version,
    about = "Church membership and attendance API",
    long_about = "Mega-Data REST API: members, departments, attendance and reports.\n\n\
                  Default config: ~/.config/mega-data/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "MEGA_DATA_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Skip seeding departments and built-in accounts.
    #[arg(long)]
    no_seed: bool,

    /// Rewrite stored department names to their canonical form, print the
    /// member count per department and exit.
    #[arg(long)]
    normalize_services: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(mega_data::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            if cli.check {
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
            eprintln!("Failed to load config from {}: {}", config_path.display(), e);
            eprintln!("Using default configuration.");
            AppConfig::default().with_env_overrides(|key| std::env::var(key).ok())
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        if let Err(e) = config.validate() {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
        println!("✅ Configuration is valid");
        println!("   Config file  : {}", config_path.display());
        println!("   Address      : {}", config.address());
        println!("   Environment  : {}", config.server.environment);
        println!("   Database     : {}", config.database.url);
        println!(
            "   JWT secret   : {}",
            if config.security.jwt_secret.is_some() { "configured" } else { "generated at startup" }
        );
        println!("   Log level    : {} ({})", config.logging.level, config.logging.format);
        println!(
            "   Rate limit   : {}",
            if config.rate_limit.enabled { "enabled" } else { "disabled" }
        );
        println!("   Seeding      : {}", if config.seed.enabled { "enabled" } else { "disabled" });
        return Ok(());
    }

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());
    if cli.port.is_some() || cli.log_level.is_some() {
        info!(port = ?cli.port, log_level = ?cli.log_level, "CLI overrides applied");
    }

    // ── Maintenance mode ───────────────────────────────────────
    if cli.normalize_services {
        let report = match normalize_services(&config, !cli.no_migrate).await {
            Ok(report) => report,
            Err(e) => {
                error!("Department normalization failed: {}", e);
                return Err(e);
            }
        };
        println!("Membres mis à jour     : {}", report.members_updated);
        println!("Utilisateurs mis à jour: {}", report.users_updated);
        for (service, count) in &report.par_service {
            println!("   {:<45} {}", service, count);
        }
        return Ok(());
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        seed: !cli.no_seed,
    })
    .await?;

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
