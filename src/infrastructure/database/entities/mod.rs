//! Database entities module

pub mod department;
pub mod member;
pub mod presence;
pub mod user;

pub use department::Entity as Department;
pub use member::Entity as Member;
pub use presence::Entity as Presence;
pub use user::Entity as User;
