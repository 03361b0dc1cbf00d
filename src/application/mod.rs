//! Application layer: use cases over the domain repositories.

pub mod attendance;
pub mod bootstrap;
pub mod identity;
pub mod membership;
pub mod reporting;

pub use attendance::AttendanceService;
pub use identity::IdentityService;
pub use membership::MembershipService;
