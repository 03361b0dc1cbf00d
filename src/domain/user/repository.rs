use async_trait::async_trait;

use super::{NewUser, Role, User};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the username is taken.
    async fn create(&self, user: NewUser) -> DomainResult<User>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>>;

    /// Every user, newest first.
    async fn list(&self) -> DomainResult<Vec<User>>;
    async fn list_by_role(&self, role: Role) -> DomainResult<Vec<User>>;

    async fn update_role(
        &self,
        id: i32,
        role: Role,
        service_assigne: Option<String>,
    ) -> DomainResult<()>;
    async fn update_password(&self, id: i32, password_hash: &str) -> DomainResult<()>;

    /// Remove the user, the members they registered and those members'
    /// presences, atomically. Returns false when the user did not exist.
    async fn delete_cascade(&self, id: i32) -> DomainResult<bool>;
}
