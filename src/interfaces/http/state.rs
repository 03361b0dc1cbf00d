//! State shared by every route.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use super::middleware::AuthState;
use crate::application::{AttendanceService, IdentityService, MembershipService};
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::SeaOrmRepositoryProvider;

#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<IdentityService>,
    pub membership: Arc<MembershipService>,
    pub attendance: Arc<AttendanceService>,
    pub repos: Arc<dyn RepositoryProvider>,
    pub db: DatabaseConnection,
    pub auth: AuthState,
    pub started_at: Arc<Instant>,
    pub environment: String,
}

impl AppState {
    /// Wire the services on top of one database connection.
    pub fn new(db: DatabaseConnection, jwt_config: JwtConfig, environment: impl Into<String>) -> Self {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let membership = Arc::new(MembershipService::new(repos.clone()));
        Self {
            identity: Arc::new(IdentityService::new(repos.clone(), jwt_config.clone())),
            attendance: Arc::new(AttendanceService::new(repos.clone(), membership.clone())),
            membership,
            repos,
            db,
            auth: AuthState { jwt_config },
            started_at: Arc::new(Instant::now()),
            environment: environment.into(),
        }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(s: &AppState) -> Self {
        s.auth.clone()
    }
}
