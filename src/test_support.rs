//! Fixtures shared by the unit tests.

use std::sync::Arc;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use crate::domain::{Actor, NewMember, NewUser, RepositoryProvider, Role, User};
use crate::domain::Member;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::SeaOrmRepositoryProvider;

pub const TEST_PASSWORD: &str = "password123";

/// Fresh in-memory SQLite database with the schema applied.
pub async fn memory_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("in-memory database");
    Migrator::up(&db, None).await.expect("migrations");
    db
}

pub async fn memory_repos() -> Arc<dyn RepositoryProvider> {
    Arc::new(SeaOrmRepositoryProvider::new(memory_db().await))
}

/// Account with password [`TEST_PASSWORD`], hashed at the lowest bcrypt cost.
pub async fn insert_user(
    repos: &Arc<dyn RepositoryProvider>,
    username: &str,
    role: Role,
    service_assigne: Option<&str>,
) -> User {
    repos
        .users()
        .create(NewUser {
            username: username.to_string(),
            password_hash: bcrypt::hash(TEST_PASSWORD, 4).expect("hash"),
            nom: Some(username.to_uppercase()),
            prenom: Some("Test".into()),
            branche: Some("Cocody".into()),
            role,
            service_assigne: service_assigne.map(str::to_string),
        })
        .await
        .expect("insert user")
}

pub async fn insert_member(
    repos: &Arc<dyn RepositoryProvider>,
    owner: &User,
    nom: &str,
    service: &str,
) -> Member {
    repos
        .members()
        .create(NewMember {
            user_id: owner.id,
            nom: nom.to_string(),
            prenom: "Awa".into(),
            numero: "0102030405".into(),
            quartier: "Cocody".into(),
            service: service.to_string(),
        })
        .await
        .expect("insert member")
}

pub fn actor_for(user: &User) -> Actor {
    Actor {
        id: user.id,
        username: user.username.clone(),
        nom: user.nom.clone(),
        prenom: user.prenom.clone(),
        role: user.role,
        service_assigne: user.service_assigne.clone(),
    }
}
