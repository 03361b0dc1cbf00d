//! User aggregate
//!
//! Contains the User entity, the role hierarchy and the repository interface.

pub mod model;
pub mod repository;

pub use model::{Actor, NewUser, Role, User};
pub use repository::UserRepository;
