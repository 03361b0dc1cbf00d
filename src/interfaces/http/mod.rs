//! HTTP REST API interfaces
//!
//! - `middleware`: JWT authentication and role gates
//! - `modules`: request handlers and DTOs, one module per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod dto;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;

pub use router::{create_api_router, ApiDoc, RouterOptions};
pub use state::AppState;
