//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::repositories::RepositoryProvider;
use crate::domain::{DepartmentRepository, MemberRepository, PresenceRepository, UserRepository};

use super::department_repository::SeaOrmDepartmentRepository;
use super::member_repository::SeaOrmMemberRepository;
use super::presence_repository::SeaOrmPresenceRepository;
use super::user_repository::SeaOrmUserRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let berger = repos.users().find_by_username("berger COM").await?;
/// let today = repos.presences().list_on_date(date).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    members: SeaOrmMemberRepository,
    presences: SeaOrmPresenceRepository,
    departments: SeaOrmDepartmentRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            members: SeaOrmMemberRepository::new(db.clone()),
            presences: SeaOrmPresenceRepository::new(db.clone()),
            departments: SeaOrmDepartmentRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn members(&self) -> &dyn MemberRepository {
        &self.members
    }

    fn presences(&self) -> &dyn PresenceRepository {
        &self.presences
    }

    fn departments(&self) -> &dyn DepartmentRepository {
        &self.departments
    }
}
