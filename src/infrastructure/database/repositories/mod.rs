//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod department_repository;
pub mod member_repository;
pub mod presence_repository;
pub mod repository_provider;
pub mod user_repository;

pub use department_repository::SeaOrmDepartmentRepository;
pub use member_repository::SeaOrmMemberRepository;
pub use presence_repository::SeaOrmPresenceRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use user_repository::SeaOrmUserRepository;
