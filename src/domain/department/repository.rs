use async_trait::async_trait;

use super::Department;
use crate::domain::DomainResult;

#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    /// All departments ordered by name.
    async fn list(&self) -> DomainResult<Vec<Department>>;

    /// Insert unless a department with the same name or short code exists.
    /// Returns true when a row was created.
    async fn insert_if_absent(&self, nom: &str, nom_court: &str) -> DomainResult<bool>;
}
