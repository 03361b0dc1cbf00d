//! Attendance recording and reports for a berger's department

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
