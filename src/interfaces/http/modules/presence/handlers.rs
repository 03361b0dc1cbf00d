//! Presence API handlers for bergers

use axum::{
    extract::{Path, Query, State},
    response::Response,
    Extension, Json,
};
use chrono::Utc;

use super::dto::{
    DateSheetResponse, HistoryResponse, MarkAllRequest, MarkAllResponse, MemberWithPresence,
    Period, PeriodQuery, PeriodStatsResponse, RecordPresenceRequest, RecordPresenceResponse,
    ReportResponse, ReportRow,
};
use crate::application::attendance::{RecordRequest, Statut};
use crate::application::reporting::pdf::daily;
use crate::domain::DomainError;
use crate::interfaces::http::common::{
    attachment, date_param, optional_date_param, render_blocking, ApiResult, ErrorResponse,
    ValidatedJson, PDF_CONTENT_TYPE,
};
use crate::interfaces::http::dto::PresenceDto;
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    post,
    path = "/api/presence/record",
    tag = "Presence",
    security(("bearer_auth" = [])),
    request_body = RecordPresenceRequest,
    responses(
        (status = 200, description = "Presence stored, replacing any record of that date", body = RecordPresenceResponse),
        (status = 400, description = "Missing membre_id or date", body = ErrorResponse),
        (status = 403, description = "Member outside the department", body = ErrorResponse),
        (status = 404, description = "Member not found", body = ErrorResponse)
    )
)]
pub async fn record(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<RecordPresenceRequest>,
) -> ApiResult<Json<RecordPresenceResponse>> {
    let date = optional_date_param(request.date.as_deref())?;
    let (member, presence) = state
        .attendance
        .record(
            &user.actor,
            RecordRequest {
                membre_id: request.membre_id,
                date,
                present: request.present,
                commentaire: request.commentaire,
            },
        )
        .await?;
    Ok(Json(RecordPresenceResponse {
        success: true,
        message: format!("Présence enregistrée: {}", member.full_name()),
        data: PresenceDto::from(presence),
    }))
}

#[utoipa::path(
    get,
    path = "/api/presence/date/{date}",
    tag = "Presence",
    security(("bearer_auth" = [])),
    params(("date" = String, Path, description = "YYYY-MM-DD")),
    responses(
        (status = 200, description = "Department members with their record for the date", body = DateSheetResponse),
        (status = 400, description = "Invalid date or no department", body = ErrorResponse)
    )
)]
pub async fn by_date(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(date): Path<String>,
) -> ApiResult<Json<DateSheetResponse>> {
    let date = date_param(&date)?;
    let sheet = state.attendance.by_date(&user.actor, date).await?;
    Ok(Json(DateSheetResponse {
        success: true,
        date: sheet.date,
        total_membres: sheet.membres.len(),
        total_presences: sheet.total_presences(),
        service: sheet.service,
        membres: sheet.membres.into_iter().map(MemberWithPresence::from).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/presence/mark-all",
    tag = "Presence",
    security(("bearer_auth" = [])),
    request_body = MarkAllRequest,
    responses(
        (status = 200, description = "Every department member marked present", body = MarkAllResponse),
        (status = 400, description = "Missing or invalid date", body = ErrorResponse)
    )
)]
pub async fn mark_all(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<MarkAllRequest>,
) -> ApiResult<Json<MarkAllResponse>> {
    let date = optional_date_param(request.date.as_deref())?
        .ok_or_else(|| DomainError::Validation("Date requise".into()))?;
    let outcome = state.attendance.mark_all(&user.actor, date).await?;
    let echecs = outcome.membres_echecs.len();
    Ok(Json(MarkAllResponse {
        success: true,
        message: format!(
            "Présences enregistrées: {} réussies, {} échecs",
            outcome.reussis, echecs
        ),
        date: outcome.date,
        total_membres: outcome.total_membres,
        reussis: outcome.reussis,
        echecs,
        membres_echecs: outcome.membres_echecs,
    }))
}

#[utoipa::path(
    get,
    path = "/api/presence/report/{date}",
    tag = "Presence",
    security(("bearer_auth" = [])),
    params(("date" = String, Path, description = "YYYY-MM-DD")),
    responses(
        (status = 200, description = "Statut of every department member", body = ReportResponse),
        (status = 400, description = "Invalid date or no department", body = ErrorResponse)
    )
)]
pub async fn report(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(date): Path<String>,
) -> ApiResult<Json<ReportResponse>> {
    let date = date_param(&date)?;
    let sheet = state.attendance.report(&user.actor, date).await?;
    let data: Vec<ReportRow> = sheet.membres.into_iter().map(ReportRow::from).collect();
    Ok(Json(ReportResponse {
        success: true,
        date: sheet.date,
        service: sheet.service,
        total: data.len(),
        presents: ReportResponse::count(&data, Statut::Present),
        absents: ReportResponse::count(&data, Statut::Absent),
        non_marques: ReportResponse::count(&data, Statut::NonMarque),
        data,
    }))
}

#[utoipa::path(
    get,
    path = "/api/presence/report/{date}/pdf",
    tag = "Presence",
    security(("bearer_auth" = [])),
    params(("date" = String, Path, description = "YYYY-MM-DD")),
    responses(
        (status = 200, description = "Attendance sheet", body = String, content_type = "application/pdf"),
        (status = 400, description = "Invalid date or no department", body = ErrorResponse)
    )
)]
pub async fn report_pdf(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(date): Path<String>,
) -> ApiResult<Response> {
    let date = date_param(&date)?;
    let sheet = state.attendance.report(&user.actor, date).await?;
    let filename = daily::department_filename(&sheet.service, date);
    let actor = user.actor;
    let now = Utc::now();
    let bytes = render_blocking(move || daily::render_department(&sheet, &actor, now)).await?;
    Ok(attachment(PDF_CONTENT_TYPE, &filename, bytes))
}

#[utoipa::path(
    get,
    path = "/api/presence/stats",
    tag = "Presence",
    security(("bearer_auth" = [])),
    params(PeriodQuery),
    responses(
        (status = 200, description = "Per-date attendance, most recent first", body = PeriodStatsResponse),
        (status = 400, description = "Invalid period", body = ErrorResponse)
    )
)]
pub async fn stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<Json<PeriodStatsResponse>> {
    let start = optional_date_param(query.start_date.as_deref())?;
    let end = optional_date_param(query.end_date.as_deref())?;
    let stats = state.attendance.stats(&user.actor, start, end).await?;
    Ok(Json(PeriodStatsResponse {
        success: true,
        service: stats.service,
        periode: Period {
            start: stats.start,
            end: stats.end,
        },
        stats: stats.days.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/presence/member/{id}/history",
    tag = "Presence",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Latest records of a department member", body = HistoryResponse),
        (status = 404, description = "Member not in the department", body = ErrorResponse)
    )
)]
pub async fn member_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> ApiResult<Json<HistoryResponse>> {
    let (member, history) = state.attendance.member_history(&user.actor, id).await?;
    Ok(Json(HistoryResponse {
        success: true,
        membre: member.into(),
        total: history.len(),
        presences: history.into_iter().map(PresenceDto::from).collect(),
    }))
}
