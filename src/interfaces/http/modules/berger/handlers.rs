//! Berger workspace handlers

use axum::{extract::State, response::Response, Extension, Json};
use chrono::Utc;

use super::dto::{DashboardResponse, DepartmentMembersResponse, DepartmentStatsResponse};
use crate::application::reporting::pdf::member_list;
use crate::interfaces::http::common::{
    attachment, render_blocking, ApiResult, ErrorResponse, PDF_CONTENT_TYPE,
};
use crate::interfaces::http::dto;
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    get,
    path = "/api/berger/dashboard",
    tag = "Berger",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Department counts and latest members", body = DashboardResponse),
        (status = 400, description = "No department assigned", body = ErrorResponse),
        (status = 403, description = "Berger role required", body = ErrorResponse)
    )
)]
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<DashboardResponse>> {
    let board = state.membership.berger_dashboard(&user.actor).await?;
    Ok(Json(DashboardResponse {
        success: true,
        service: board.service,
        stats: board.stats.into(),
        derniers_membres: dto::members(board.derniers_membres),
    }))
}

#[utoipa::path(
    get,
    path = "/api/berger/members",
    tag = "Berger",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Every member of the department", body = DepartmentMembersResponse),
        (status = 400, description = "No department assigned", body = ErrorResponse)
    )
)]
pub async fn members(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<DepartmentMembersResponse>> {
    let (service, membres) = state.membership.berger_members(&user.actor).await?;
    Ok(Json(DepartmentMembersResponse {
        success: true,
        service,
        total: membres.len(),
        membres: dto::members(membres),
    }))
}

#[utoipa::path(
    get,
    path = "/api/berger/stats",
    tag = "Berger",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Counts by quartier, month and registering user", body = DepartmentStatsResponse),
        (status = 400, description = "No department assigned", body = ErrorResponse)
    )
)]
pub async fn stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<DepartmentStatsResponse>> {
    let stats = state.membership.berger_stats(&user.actor).await?;
    Ok(Json(DepartmentStatsResponse {
        success: true,
        service: stats.service,
        total: stats.total,
        par_quartier: stats.par_quartier,
        par_mois: stats.par_mois,
        par_utilisateur: stats.par_utilisateur,
    }))
}

#[utoipa::path(
    get,
    path = "/api/berger/export/pdf",
    tag = "Berger",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Department member list", body = String, content_type = "application/pdf"),
        (status = 400, description = "No department assigned", body = ErrorResponse)
    )
)]
pub async fn export_pdf(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Response> {
    let (service, membres) = state.membership.berger_members(&user.actor).await?;
    let now = Utc::now();
    let filename = member_list::filename(&service, now);
    let actor = user.actor;
    let bytes = render_blocking(move || member_list::render(&service, &actor, &membres, now)).await?;
    Ok(attachment(PDF_CONTENT_TYPE, &filename, bytes))
}
