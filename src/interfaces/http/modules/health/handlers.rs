//! Health check handler

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::interfaces::http::state::AppState;

const FEATURES: [&str; 9] = [
    "Authentification JWT",
    "Gestion des membres",
    "Dashboard berger",
    "Dashboard admin",
    "Export PDF",
    "Administration complète",
    "Système de présence",
    "Super Admin: Vue complète présences",
    "Export PDF hebdomadaire",
];

const ENDPOINTS: [(&str, &str); 9] = [
    ("auth", "/api/auth"),
    ("members", "/api/members"),
    ("berger", "/api/berger"),
    ("admin", "/api/admin"),
    ("presence", "/api/presence"),
    ("admin_presence", "/api/admin/presence"),
    ("admin_weekly", "/api/admin/weekly"),
    ("services", "/api/services"),
    ("health", "/api/health"),
];

/// Health check state
#[derive(Clone)]
pub struct HealthState {
    pub db: DatabaseConnection,
    pub started_at: Arc<Instant>,
    pub environment: String,
}

impl FromRef<AppState> for HealthState {
    fn from_ref(s: &AppState) -> Self {
        Self {
            db: s.db.clone(),
            started_at: s.started_at.clone(),
            environment: s.environment.clone(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub environment: String,
    pub features: Vec<String>,
    pub endpoints: BTreeMap<String, String>,
}

/// Service health response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub database: DatabaseHealth,
    pub uptime_seconds: u64,
    pub version: String,
    pub tables: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DatabaseHealth {
    pub status: String,
    pub db_response_ms: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses((status = 200, description = "API banner", body = RootResponse))
)]
pub async fn root(State(state): State<HealthState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: "API Mega-data - Gestion des membres d'église".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "online".to_string(),
        timestamp: Utc::now(),
        environment: state.environment,
        features: FEATURES.iter().map(|f| f.to_string()).collect(),
        endpoints: ENDPOINTS
            .iter()
            .map(|(name, path)| (name.to_string(), path.to_string()))
            .collect(),
    })
}

async fn table_names(db: &DatabaseConnection) -> Vec<String> {
    let statement = Statement::from_string(
        db.get_database_backend(),
        "SELECT name FROM sqlite_master WHERE type='table' ORDER BY name".to_string(),
    );
    match db.query_all(statement).await {
        Ok(rows) => rows
            .iter()
            .filter_map(|row| row.try_get::<String>("", "name").ok())
            .collect(),
        Err(e) => {
            error!(error = %e, "Failed to list tables");
            Vec::new()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let uptime = state.started_at.elapsed().as_secs();

    // Ping the database
    let db_start = Instant::now();
    let database = match state
        .db
        .execute(Statement::from_string(
            state.db.get_database_backend(),
            "SELECT 1".to_string(),
        ))
        .await
    {
        Ok(_) => DatabaseHealth {
            status: "healthy".to_string(),
            db_response_ms: Some(db_start.elapsed().as_millis() as u64),
        },
        Err(e) => {
            error!(error = %e, "Database health check failed");
            DatabaseHealth {
                status: "unhealthy".to_string(),
                db_response_ms: None,
            }
        }
    };

    let healthy = database.db_response_ms.is_some();
    let tables = if healthy { table_names(&state.db).await } else { Vec::new() };
    let (status, http_status) = if healthy {
        ("ok", StatusCode::OK)
    } else {
        ("degraded", StatusCode::SERVICE_UNAVAILABLE)
    };

    (
        http_status,
        Json(HealthResponse {
            status: status.to_string(),
            database,
            uptime_seconds: uptime,
            version: env!("CARGO_PKG_VERSION").to_string(),
            tables,
            timestamp: Utc::now(),
        }),
    )
}
