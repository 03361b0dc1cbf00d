//! Berger workspace: the members of the caller's department

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
