pub mod department;
pub mod member;
pub mod presence;
pub mod repositories;
pub mod user;

// Re-export commonly used types
pub use department::{Department, DepartmentRepository};
pub use member::{Member, MemberChanges, MemberOwner, MemberRepository, MemberStats, NewMember};
pub use presence::{DayStats, Presence, PresenceRepository, PresenceUpsert};
pub use repositories::RepositoryProvider;
pub use user::{Actor, NewUser, Role, User, UserRepository};

pub use crate::shared::types::{DomainError, DomainResult};
