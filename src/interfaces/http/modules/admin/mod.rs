//! Administration reports: attendance across departments, weekly report
//! and the summary PDF

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
