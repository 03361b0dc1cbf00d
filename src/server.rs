//! Reusable server runtime.
//!
//! Provides [`ServerHandle`] that encapsulates the full server lifecycle:
//! database init, migrations, seeding, REST API, metrics, and graceful
//! shutdown. Both binaries start the API through it.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::application::bootstrap::{
    log_diagnostics, normalize_stored_services, seed_accounts, seed_departments,
    NormalizationReport,
};
use crate::config::AppConfig;
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};
use crate::interfaces::http::{create_api_router, AppState, RouterOptions};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

pub type ServerResult<T> = Result<T, Box<dyn std::error::Error>>;

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the API.
pub struct ServerOptions {
    /// Application configuration.
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Insert departments and built-in accounts (default: true).
    pub seed: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            seed: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running API server.
///
/// # Examples
///
/// ```rust,no_run
/// use mega_data::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.shutdown_signal().wait().await;
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// Repository provider for data access.
    pub repos: Arc<dyn RepositoryProvider>,
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Address the API is listening on.
    pub local_addr: SocketAddr,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Start the API with the given options.
    ///
    /// This will:
    /// 1. Install the Prometheus metrics recorder
    /// 2. Connect to the database and run migrations
    /// 3. Seed departments and built-in accounts (if enabled)
    /// 4. Log berger assignments and member counts
    /// 5. Start the REST API server (with Swagger UI)
    pub async fn start(opts: ServerOptions) -> ServerResult<Self> {
        let app_cfg = opts.config;
        app_cfg.validate()?;

        info!(environment = %app_cfg.server.environment, "Starting Mega-Data API...");

        let prometheus_handle = prometheus_handle()?;

        let jwt_config = JwtConfig {
            secret: app_cfg.resolve_jwt_secret()?,
            expiration_hours: app_cfg.security.jwt_expiration_hours,
            issuer: app_cfg.security.jwt_issuer.clone(),
        };
        info!(
            "JWT configured with {}h token expiration",
            jwt_config.expiration_hours
        );

        let db = connect(&app_cfg, opts.auto_migrate).await?;
        let state = AppState::new(db.clone(), jwt_config, app_cfg.server.environment.clone());
        let repos = state.repos.clone();

        if opts.seed && app_cfg.seed.enabled {
            let departments = seed_departments(repos.as_ref()).await?;
            let accounts = seed_accounts(repos.as_ref(), &app_cfg.seed).await?;
            info!(
                departments,
                created = accounts.created,
                updated = accounts.updated,
                unchanged = accounts.unchanged,
                "Seeding completed"
            );
        } else {
            info!("Seeding skipped");
        }

        if let Err(e) = log_diagnostics(repos.as_ref()).await {
            warn!(error = %e, "Startup diagnostics failed");
        }

        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let shutdown_signal = shutdown.signal();

        // ── REST API server ────────────────────────────────────
        let router = create_api_router(
            state,
            RouterOptions {
                cors: app_cfg.cors.clone(),
                production: app_cfg.is_production(),
                rate_limit: app_cfg.rate_limit.clone(),
                metrics: Some(prometheus_handle),
            },
        );

        let listener = tokio::net::TcpListener::bind(app_cfg.address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_shutdown = shutdown_signal.clone();
        let api_server = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("🛑 REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });
        info!("🚀 Mega-Data API started.");

        Ok(Self {
            repos,
            config: app_cfg,
            local_addr,
            db,
            shutdown,
            api_task,
        })
    }

    /// Get a cloneable shutdown signal.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown (non-blocking).
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the server to stop after shutdown has been triggered, then
    /// close the database.
    pub async fn wait(self) {
        info!("⏳ Waiting for in-flight requests to complete...");

        let api_task = self.api_task;
        let drained = self
            .shutdown
            .drain(async move {
                if let Err(e) = api_task.await {
                    error!("REST API server task panicked: {}", e);
                }
            })
            .await;
        if !drained {
            warn!("Some requests were still running when the grace period ended");
        }

        if let Err(e) = self.db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("✅ Database connection closed");
        }

        info!("👋 Mega-Data API shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("🛑 Shutting down Mega-Data API...");
        self.trigger_shutdown();
        self.wait().await;
    }

    /// Check if the server is still running.
    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// Rewrite stored department names to their canonical form, outside of a
/// server run.
pub async fn normalize_services(config: &AppConfig, auto_migrate: bool) -> ServerResult<NormalizationReport> {
    let db = connect(config, auto_migrate).await?;
    let repos = SeaOrmRepositoryProvider::new(db.clone());
    let report = normalize_stored_services(&repos).await;
    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    }
    Ok(report?)
}

async fn connect(config: &AppConfig, auto_migrate: bool) -> ServerResult<DatabaseConnection> {
    let db_config = DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
    };
    let db = init_database(&db_config).await.map_err(|e| {
        error!("Failed to connect to database: {}", e);
        e
    })?;

    if auto_migrate {
        info!("Running database migrations...");
        if let Err(e) = Migrator::up(&db, None).await {
            error!("Failed to run migrations: {}", e);
            return Err(e.into());
        }
        info!("Migrations completed");
    }
    Ok(db)
}

/// The global metrics recorder can only be installed once per process;
/// later starts reuse it.
fn prometheus_handle() -> ServerResult<PrometheusHandle> {
    static PROM_HANDLE: OnceLock<Result<PrometheusHandle, String>> = OnceLock::new();

    PROM_HANDLE
        .get_or_init(|| {
            let installed = PrometheusBuilder::new()
                .install_recorder()
                .map_err(|e| format!("Failed to install Prometheus metrics recorder: {}", e));
            if installed.is_ok() {
                info!("📊 Prometheus metrics recorder installed");
            }
            installed
        })
        .clone()
        .map_err(Into::into)
}

/// Initialize tracing (logging) from the application config.
///
/// Call this once at process startup (before [`ServerHandle::start`]).
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".into();
        config.server.port = 0;
        config.server.shutdown_timeout = 5;
        config.database.url = "sqlite::memory:".into();
        config.database.max_connections = Some(1);
        config.security.jwt_secret = Some("server-test-secret".into());
        config
    }

    #[tokio::test]
    async fn starts_seeds_and_stops() {
        let handle = ServerHandle::start(ServerOptions {
            config: test_config(),
            auto_migrate: true,
            seed: true,
        })
        .await
        .unwrap();

        assert!(handle.is_running());
        assert_ne!(handle.local_addr.port(), 0);
        assert_eq!(handle.repos.departments().list().await.unwrap().len(), 10);
        assert!(handle
            .repos
            .users()
            .find_by_username("berger COM")
            .await
            .unwrap()
            .is_some());

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn production_without_secret_refuses_to_start() {
        let mut config = test_config();
        config.server.environment = "production".into();
        config.security.jwt_secret = None;
        let result = ServerHandle::start(ServerOptions {
            config,
            ..ServerOptions::default()
        })
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn normalize_services_reports_counts() {
        let report = normalize_services(&test_config(), true).await.unwrap();
        assert_eq!(report.members_updated, 0);
        assert!(report.par_service.is_empty());
    }
}
