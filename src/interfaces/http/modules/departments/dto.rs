use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Department;

#[derive(Debug, Serialize, ToSchema)]
pub struct DepartmentDto {
    pub id: i32,
    pub nom: String,
    pub nom_court: Option<String>,
    pub description: Option<String>,
}

impl From<Department> for DepartmentDto {
    fn from(d: Department) -> Self {
        Self {
            id: d.id,
            nom: d.nom,
            nom_court: d.nom_court,
            description: d.description,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DepartmentsResponse {
    pub success: bool,
    pub services: Vec<DepartmentDto>,
    pub total: usize,
}
