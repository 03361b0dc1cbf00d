//! Member registration, lookup, user administration and exports

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
