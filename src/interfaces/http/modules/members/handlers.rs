//! Member API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Extension, Json,
};
use chrono::Utc;

use super::dto::{
    AllMembersResponse, CreateMemberRequest, MemberResponse, MembersExport, MyMembersResponse,
    RoleCounts, RoleUpdatedResponse, SearchQuery, SearchResponse, ServiceCounts,
    UpdateMemberRequest, UpdateRoleRequest, UsersExport, UsersResponse,
};
use crate::application::membership::{parse_changes, MemberInput};
use crate::application::reporting::csv::{members_csv, users_csv};
use crate::domain::DomainError;
use crate::interfaces::http::common::{attachment, ApiResult, ErrorResponse, ValidatedJson, CSV_CONTENT_TYPE};
use crate::interfaces::http::dto::{self, MemberDto, MessageResponse, UserDto};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    post,
    path = "/api/members",
    tag = "Members",
    security(("bearer_auth" = [])),
    request_body = CreateMemberRequest,
    responses(
        (status = 201, description = "Member created", body = MemberResponse),
        (status = 400, description = "Missing field, invalid phone or duplicate", body = ErrorResponse),
        (status = 403, description = "Department outside the berger's own", body = ErrorResponse)
    )
)]
pub async fn create_member(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateMemberRequest>,
) -> ApiResult<(StatusCode, Json<MemberResponse>)> {
    let member = state
        .membership
        .create(
            &user.actor,
            MemberInput {
                nom: request.nom,
                prenom: request.prenom,
                numero: request.numero,
                quartier: request.quartier,
                service: request.service,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(MemberResponse {
            success: true,
            message: Some("Membre créé avec succès".into()),
            member: member.into(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/members/my-members",
    tag = "Members",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Department members for bergers, own members otherwise", body = MyMembersResponse)
    )
)]
pub async fn my_members(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<MyMembersResponse>> {
    let result = state.membership.my_members(&user.actor).await?;
    Ok(Json(MyMembersResponse {
        success: true,
        service: result.service,
        stats: result.stats.map(Into::into),
        total: result.membres.len(),
        membres: dto::members(result.membres),
    }))
}

#[utoipa::path(
    get,
    path = "/api/members/search",
    tag = "Members",
    security(("bearer_auth" = [])),
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching members, newest first", body = SearchResponse),
        (status = 400, description = "Neither query nor service given", body = ErrorResponse)
    )
)]
pub async fn search_members(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<Json<SearchResponse>> {
    let membres = state
        .membership
        .search(&user.actor, params.query.as_deref(), params.service.as_deref())
        .await?;
    Ok(Json(SearchResponse {
        success: true,
        query: params.query,
        service: params.service,
        total: membres.len(),
        membres: dto::members(membres),
    }))
}

#[utoipa::path(
    get,
    path = "/api/members/{id}",
    tag = "Members",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Member", body = MemberResponse),
        (status = 404, description = "Unknown or not visible to the caller", body = ErrorResponse)
    )
)]
pub async fn get_member(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> ApiResult<Json<MemberResponse>> {
    let member = state.membership.get(&user.actor, id).await?;
    Ok(Json(MemberResponse {
        success: true,
        message: None,
        member: member.into(),
    }))
}

#[utoipa::path(
    put,
    path = "/api/members/{id}",
    tag = "Members",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Member ID")),
    request_body = UpdateMemberRequest,
    responses(
        (status = 200, description = "Member updated", body = MemberResponse),
        (status = 400, description = "Unknown field or invalid value", body = ErrorResponse),
        (status = 403, description = "Moving a member out of the berger's department", body = ErrorResponse),
        (status = 404, description = "Unknown or not visible to the caller", body = ErrorResponse)
    )
)]
pub async fn update_member(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    ValidatedJson(UpdateMemberRequest(fields)): ValidatedJson<UpdateMemberRequest>,
) -> ApiResult<Json<MemberResponse>> {
    let changes = parse_changes(&fields)?;
    let member = state.membership.update(&user.actor, id, changes).await?;
    Ok(Json(MemberResponse {
        success: true,
        message: Some("Membre mis à jour avec succès".into()),
        member: member.into(),
    }))
}

// ── Administration ──────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/members/all",
    tag = "Members",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Every member with its registering account", body = AllMembersResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    )
)]
pub async fn all_members(State(state): State<AppState>) -> ApiResult<Json<AllMembersResponse>> {
    let (membres, par_service) = state.membership.list_all().await?;
    let total = membres.len();
    Ok(Json(AllMembersResponse {
        success: true,
        membres: dto::members(membres),
        total,
        stats: ServiceCounts { total, par_service },
    }))
}

#[utoipa::path(
    delete,
    path = "/api/members/{id}",
    tag = "Members",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Member and its presences deleted", body = MessageResponse),
        (status = 404, description = "Member not found", body = ErrorResponse)
    )
)]
pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<MessageResponse>> {
    state.membership.delete(id).await?;
    Ok(Json(MessageResponse::new("Membre supprimé avec succès")))
}

#[utoipa::path(
    get,
    path = "/api/members/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Accounts with per-role counts", body = UsersResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    )
)]
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<UsersResponse>> {
    let listing = state.identity.list_users().await?;
    let total = listing.users.len();
    Ok(Json(UsersResponse {
        success: true,
        users: listing.users.into_iter().map(UserDto::from).collect(),
        total,
        stats: RoleCounts {
            total,
            par_role: listing
                .par_role
                .into_iter()
                .map(|(role, count)| (role.to_string(), count))
                .collect(),
        },
    }))
}

#[utoipa::path(
    delete,
    path = "/api/members/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User and its members deleted", body = MessageResponse),
        (status = 400, description = "Deleting one's own account", body = ErrorResponse),
        (status = 403, description = "Target is a super administrator", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> ApiResult<Json<MessageResponse>> {
    state.identity.delete_user(&user.actor, id).await?;
    Ok(Json(MessageResponse::new("Utilisateur supprimé avec succès")))
}

#[utoipa::path(
    put,
    path = "/api/members/users/{id}/role",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = RoleUpdatedResponse),
        (status = 400, description = "Invalid role or own account", body = ErrorResponse),
        (status = 403, description = "Role above the caller's", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn update_user_role(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateRoleRequest>,
) -> ApiResult<Json<RoleUpdatedResponse>> {
    let role = request
        .role
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| DomainError::Validation("Le rôle est requis".into()))?;
    let role = state
        .identity
        .update_user_role(&user.actor, id, role, request.service_assigne.as_deref())
        .await?;
    Ok(Json(RoleUpdatedResponse {
        success: true,
        message: format!("Rôle mis à jour avec succès: {}", role),
        user_id: id,
        new_role: role.to_string(),
    }))
}

// ── Exports ─────────────────────────────────────────────────

#[utoipa::path(
    get,
    path = "/api/members/export/csv/members",
    tag = "Exports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "UTF-8 CSV with BOM", body = String, content_type = "text/csv"),
        (status = 404, description = "No member to export", body = ErrorResponse)
    )
)]
pub async fn export_members_csv(State(state): State<AppState>) -> ApiResult<Response> {
    let (membres, _) = state.membership.list_all().await?;
    if membres.is_empty() {
        return Err(DomainError::NoData("Aucun membre à exporter".into()).into());
    }
    let bytes = members_csv(&membres)?;
    let filename = format!("membres_{}.csv", Utc::now().format("%Y-%m-%d"));
    Ok(attachment(CSV_CONTENT_TYPE, &filename, bytes))
}

#[utoipa::path(
    get,
    path = "/api/members/export/csv/users",
    tag = "Exports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "UTF-8 CSV with BOM", body = String, content_type = "text/csv"),
        (status = 404, description = "No user to export", body = ErrorResponse)
    )
)]
pub async fn export_users_csv(State(state): State<AppState>) -> ApiResult<Response> {
    let listing = state.identity.list_users().await?;
    if listing.users.is_empty() {
        return Err(DomainError::NoData("Aucun utilisateur à exporter".into()).into());
    }
    let bytes = users_csv(&listing.users)?;
    let filename = format!("utilisateurs_{}.csv", Utc::now().format("%Y-%m-%d"));
    Ok(attachment(CSV_CONTENT_TYPE, &filename, bytes))
}

#[utoipa::path(
    get,
    path = "/api/members/export/json/members",
    tag = "Exports",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Every member", body = MembersExport))
)]
pub async fn export_members_json(State(state): State<AppState>) -> ApiResult<Json<MembersExport>> {
    let (membres, _) = state.membership.list_all().await?;
    let data: Vec<MemberDto> = dto::members(membres);
    Ok(Json(MembersExport {
        success: true,
        exported_at: Utc::now(),
        total: data.len(),
        data,
    }))
}

#[utoipa::path(
    get,
    path = "/api/members/export/json/users",
    tag = "Exports",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Every account", body = UsersExport))
)]
pub async fn export_users_json(State(state): State<AppState>) -> ApiResult<Json<UsersExport>> {
    let listing = state.identity.list_users().await?;
    let data: Vec<UserDto> = listing.users.into_iter().map(UserDto::from).collect();
    Ok(Json(UsersExport {
        success: true,
        exported_at: Utc::now(),
        total: data.len(),
        data,
    }))
}
