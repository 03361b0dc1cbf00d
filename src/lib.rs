//! # Mega-Data
//!
//! Backend of a church membership system: accounts and roles, members
//! grouped by department (service), attendance taken by department
//! leaders (bergers), and CSV / PDF reports.
//!
//! ## Architecture
//!
//! - **domain**: entities, department normalization, statistics and
//!   repository traits
//! - **application**: use cases (identity, membership, attendance),
//!   startup seeding and report rendering
//! - **infrastructure**: SeaORM persistence, JWT and password hashing
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: process lifecycle shared by both binaries

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

#[cfg(test)]
mod test_support;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::create_api_router;
