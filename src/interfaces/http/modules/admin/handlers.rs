//! Admin report handlers

use axum::{
    extract::{Path, Query, State},
    response::Response,
    Extension, Json,
};
use chrono::{NaiveDate, Utc};

use super::dto::{
    AdminDateResponse, AdminMemberResponse, DateStats, MemberAttendanceStats, MemberPresenceRow,
    PresenceRow, ServiceStatsResponse, ServiceStatsSummaryDto, WeeklyDataResponse, WeeklyPeriod,
    WeeklyQuery,
};
use crate::application::attendance::{WeeklyReport, DEFAULT_STATS_DAYS};
use crate::application::reporting::pdf::admin_summary::{self, AdminOverview};
use crate::application::reporting::pdf::{daily, weekly};
use crate::domain::DomainError;
use crate::interfaces::http::common::{
    attachment, date_param, optional_date_param, render_blocking, ApiResult, ErrorResponse,
    PDF_CONTENT_TYPE,
};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::state::AppState;

/// Both bounds of a weekly report, required.
fn weekly_period(query: &WeeklyQuery) -> ApiResult<(NaiveDate, NaiveDate)> {
    let start = optional_date_param(query.start_date.as_deref())?;
    let end = optional_date_param(query.end_date.as_deref())?;
    match (start, end) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(DomainError::Validation("Les dates de début et de fin sont requises".into()).into()),
    }
}

async fn load_weekly(state: &AppState, query: &WeeklyQuery) -> ApiResult<WeeklyReport> {
    let (start, end) = weekly_period(query)?;
    Ok(state
        .attendance
        .weekly(start, end, query.service.as_deref())
        .await?)
}

// ── /api/admin/presence ─────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/admin/presence/date/{date}",
    tag = "Admin presence",
    security(("bearer_auth" = [])),
    params(("date" = String, Path, description = "YYYY-MM-DD")),
    responses(
        (status = 200, description = "Every record of the date, grouped stats per department", body = AdminDateResponse),
        (status = 400, description = "Invalid date", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    )
)]
pub async fn presences_by_date(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> ApiResult<Json<AdminDateResponse>> {
    let date = date_param(&date)?;
    let view = state.attendance.admin_by_date(date).await?;
    let total = view.total();
    let absents = view.absents();
    Ok(Json(AdminDateResponse {
        success: true,
        date: view.date,
        stats: DateStats {
            total,
            presents: view.presents,
            absents,
            taux: view.taux,
            par_service: view.par_service.into_iter().map(Into::into).collect(),
        },
        presences: view.entries.into_iter().map(PresenceRow::from).collect(),
        count: total,
    }))
}

#[utoipa::path(
    get,
    path = "/api/admin/presence/member/{id}",
    tag = "Admin presence",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Full attendance history of a member", body = AdminMemberResponse),
        (status = 404, description = "Member not found", body = ErrorResponse)
    )
)]
pub async fn member_presences(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<AdminMemberResponse>> {
    let view = state.attendance.admin_member(id).await?;
    let total = view.presences.len();
    let derniere_presence = view
        .derniere_presence()
        .map(|d| d.to_string())
        .unwrap_or_else(|| "Jamais".to_string());
    Ok(Json(AdminMemberResponse {
        success: true,
        stats: MemberAttendanceStats {
            total,
            presents: view.presents,
            absents: total - view.presents,
            taux_presence: view.taux_presence,
            derniere_presence,
        },
        membre: view.member.into(),
        presences: view.presences.into_iter().map(MemberPresenceRow::from).collect(),
        total_presences: total,
    }))
}

#[utoipa::path(
    get,
    path = "/api/admin/presence/stats/service",
    tag = "Admin presence",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Attendance per department since records began", body = ServiceStatsResponse)
    )
)]
pub async fn service_stats(State(state): State<AppState>) -> ApiResult<Json<ServiceStatsResponse>> {
    let (rows, summary) = state.attendance.service_stats().await?;
    Ok(Json(ServiceStatsResponse {
        success: true,
        stats: rows.into_iter().map(Into::into).collect(),
        summary: ServiceStatsSummaryDto {
            total_services: summary.total_services,
            total_membres: summary.total_membres,
            total_presences: summary.total_presences,
            total_presents: summary.total_presents,
            total_absents: summary.total_presences - summary.total_presents,
            taux_presence_global: summary.taux_presence_global,
            date_generation: Utc::now(),
        },
    }))
}

#[utoipa::path(
    get,
    path = "/api/admin/presence/export/pdf/{date}",
    tag = "Admin presence",
    security(("bearer_auth" = [])),
    params(("date" = String, Path, description = "YYYY-MM-DD")),
    responses(
        (status = 200, description = "Daily attendance report", body = String, content_type = "application/pdf"),
        (status = 404, description = "No presence on that date", body = ErrorResponse)
    )
)]
pub async fn export_daily_pdf(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(date): Path<String>,
) -> ApiResult<Response> {
    let date = date_param(&date)?;
    let view = state.attendance.admin_by_date(date).await?;
    if view.entries.is_empty() {
        return Err(DomainError::NoData("Aucune présence trouvée pour cette date".into()).into());
    }
    let actor = user.actor;
    let now = Utc::now();
    let bytes = render_blocking(move || daily::render_admin(&view, &actor, now)).await?;
    Ok(attachment(PDF_CONTENT_TYPE, &daily::admin_filename(date), bytes))
}

#[utoipa::path(
    get,
    path = "/api/admin/presence/export/weekly-pdf",
    tag = "Admin presence",
    security(("bearer_auth" = [])),
    params(WeeklyQuery),
    responses(
        (status = 200, description = "Records of the period grouped by date", body = WeeklyDataResponse),
        (status = 400, description = "Missing or invalid period", body = ErrorResponse),
        (status = 404, description = "No record in the period", body = ErrorResponse)
    )
)]
pub async fn weekly_data(
    State(state): State<AppState>,
    Query(query): Query<WeeklyQuery>,
) -> ApiResult<Json<WeeklyDataResponse>> {
    let report = load_weekly(&state, &query).await?;
    let total_presences = report.total_presences();
    let total_presents = report.total_presents();
    Ok(Json(WeeklyDataResponse {
        success: true,
        period: WeeklyPeriod {
            start_date: report.start,
            end_date: report.end,
        },
        service: report.service.unwrap_or_else(|| "tous".to_string()),
        total_days: report.days.len(),
        weekly_data: report.days.into_iter().map(Into::into).collect(),
        total_presences,
        total_presents,
    }))
}

// ── /api/admin/weekly ───────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/admin/weekly/export/weekly-pdf",
    tag = "Admin presence",
    security(("bearer_auth" = [])),
    params(WeeklyQuery),
    responses(
        (status = 200, description = "Weekly attendance report", body = String, content_type = "application/pdf"),
        (status = 400, description = "Missing or invalid period", body = ErrorResponse),
        (status = 404, description = "No record in the period", body = ErrorResponse)
    )
)]
pub async fn weekly_pdf(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<WeeklyQuery>,
) -> ApiResult<Response> {
    let report = load_weekly(&state, &query).await?;
    let filename = weekly::filename(report.start, report.end, report.service.as_deref());
    let actor = user.actor;
    let now = Utc::now();
    let bytes = render_blocking(move || weekly::render(&report, &actor, now)).await?;
    Ok(attachment(PDF_CONTENT_TYPE, &filename, bytes))
}

// ── /api/admin ──────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/admin/export/pdf",
    tag = "Admin presence",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Administration summary", body = String, content_type = "application/pdf"),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    )
)]
pub async fn export_summary_pdf(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Response> {
    let listing = state.identity.list_users().await?;
    let (membres, members_par_service) = state.membership.list_all().await?;
    let (start, end, days) = state.attendance.recent_summary(DEFAULT_STATS_DAYS).await?;
    let overview = AdminOverview {
        total_users: listing.users.len(),
        users_par_role: listing.par_role,
        total_members: membres.len(),
        members_par_service,
        start,
        end,
        days,
    };

    let actor = user.actor;
    let now = Utc::now();
    let bytes = render_blocking(move || admin_summary::render(&overview, &actor, now)).await?;
    Ok(attachment(PDF_CONTENT_TYPE, &admin_summary::filename(now), bytes))
}
