//! Startup work done before the API accepts requests: reference data,
//! built-in accounts, department-name repair and diagnostics.

pub mod maintenance;
pub mod seed;

pub use maintenance::{log_diagnostics, normalize_stored_services, NormalizationReport};
pub use seed::{seed_accounts, seed_departments, SeedReport};
