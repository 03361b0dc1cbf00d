//! Repository access for the domain layer

use super::department::DepartmentRepository;
use super::member::MemberRepository;
use super::presence::PresenceRepository;
use super::user::UserRepository;

/// Provides access to all domain repositories.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let user = repos.users().find_by_username("berger COM").await?;
///     let members = repos.members().list().await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn members(&self) -> &dyn MemberRepository;
    fn presences(&self) -> &dyn PresenceRepository;
    fn departments(&self) -> &dyn DepartmentRepository;
}
