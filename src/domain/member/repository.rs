use async_trait::async_trait;

use super::{Member, MemberChanges, NewMember};
use crate::domain::DomainResult;

/// Members are always returned with their registering account attached
/// and ordered newest first.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn create(&self, member: NewMember) -> DomainResult<Member>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Member>>;
    async fn list(&self) -> DomainResult<Vec<Member>>;
    async fn list_by_user(&self, user_id: i32) -> DomainResult<Vec<Member>>;

    /// Whether `user_id` already registered a member with this name.
    async fn exists_for_user(&self, user_id: i32, nom: &str, prenom: &str) -> DomainResult<bool>;

    async fn update(&self, id: i32, changes: MemberChanges) -> DomainResult<Member>;

    /// Remove a member and its presences. Returns false when it did not exist.
    async fn delete_cascade(&self, id: i32) -> DomainResult<bool>;
}
