//! Member aggregate
//!
//! Church members registered by users, their statistics and the
//! repository interface.

pub mod model;
pub mod repository;
pub mod stats;

pub use model::{Member, MemberChanges, MemberOwner, NewMember};
pub use repository::MemberRepository;
pub use stats::{count_by, sorted_by_count, MemberStats};
