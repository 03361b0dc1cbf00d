//! Authentication API handlers

use axum::{extract::State, http::StatusCode, Extension, Json};

use super::dto::{
    AuthResponse, ChangePasswordRequest, LoginRequest, ProfileResponse, RegisterRequest, UserInfo,
};
use crate::application::identity::Registration;
use crate::interfaces::http::common::{ApiResult, ErrorResponse, ValidatedJson};
use crate::interfaces::http::dto::MessageResponse;
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::modules::metrics::record_login;
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Missing field or username taken", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let result = state
        .identity
        .register(Registration {
            username: request.username,
            password: request.password,
            nom: request.nom,
            prenom: request.prenom,
            branche: request.branche,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::new("Compte créé avec succès", result)),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = AuthResponse),
        (status = 400, description = "Missing credentials", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let result = state
        .identity
        .login(request.login.as_deref(), request.password.as_deref())
        .await;
    record_login(result.is_ok());
    Ok(Json(AuthResponse::new("Connexion réussie", result?)))
}

#[utoipa::path(
    get,
    path = "/api/auth/profile",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller identity from the token", body = ProfileResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn profile(Extension(user): Extension<AuthenticatedUser>) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        success: true,
        user: UserInfo::from_actor(user.actor, user.branche),
    })
}

#[utoipa::path(
    put,
    path = "/api/auth/change-password",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "New password too short", body = ErrorResponse),
        (status = 401, description = "Current password incorrect", body = ErrorResponse)
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .identity
        .change_password(&user.actor, &request.current_password, &request.new_password)
        .await?;
    Ok(Json(MessageResponse::new("Mot de passe modifié avec succès")))
}
