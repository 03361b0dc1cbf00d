use axum::{extract::State, Json};

use super::dto::{DepartmentDto, DepartmentsResponse};
use crate::interfaces::http::common::{ApiResult, ErrorResponse};
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    get,
    path = "/api/services",
    tag = "Departments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Departments ordered by name", body = DepartmentsResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn list_departments(State(state): State<AppState>) -> ApiResult<Json<DepartmentsResponse>> {
    let services: Vec<DepartmentDto> = state
        .repos
        .departments()
        .list()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(DepartmentsResponse {
        success: true,
        total: services.len(),
        services,
    }))
}
