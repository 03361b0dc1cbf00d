//! Presence aggregate
//!
//! Attendance records (one per member and date), attendance-rate
//! arithmetic and the repository interface.

pub mod model;
pub mod repository;
pub mod stats;

pub use model::{Presence, PresenceUpsert};
pub use repository::PresenceRepository;
pub use stats::{attendance_rate, best_and_worst, daily_stats, round1, DayStats};
