//! Department aggregate
//!
//! The organization's services (departments), the name reconciliation
//! rules and the repository interface.

pub mod model;
pub mod normalize;
pub mod repository;

pub use model::Department;
pub use normalize::{
    department_key, find_department, normalize_service_name, same_department,
    CanonicalDepartment, DEPARTMENTS,
};
pub use repository::DepartmentRepository;
