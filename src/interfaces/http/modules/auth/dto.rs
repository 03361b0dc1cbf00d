//! Authentication DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::identity::AuthResult;
use crate::domain::{Actor, User};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(max = 50, message = "Le nom d'utilisateur ne doit pas dépasser 50 caractères"))]
    pub username: Option<String>,
    pub password: Option<String>,
    #[validate(length(max = 100, message = "Le nom ne doit pas dépasser 100 caractères"))]
    pub nom: Option<String>,
    #[validate(length(max = 100, message = "Le prénom ne doit pas dépasser 100 caractères"))]
    pub prenom: Option<String>,
    #[validate(length(max = 100, message = "La branche ne doit pas dépasser 100 caractères"))]
    pub branche: Option<String>,
}

/// `login` carries the username; `username` is accepted as an alias.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(alias = "username")]
    pub login: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Le mot de passe actuel est requis"))]
    pub current_password: String,
    #[validate(length(
        min = 6,
        max = 128,
        message = "Le nouveau mot de passe doit contenir au moins 6 caractères"
    ))]
    pub new_password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserInfo {
    pub id: i32,
    pub username: String,
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub branche: Option<String>,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_assigne: Option<String>,
}

impl From<User> for UserInfo {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            nom: u.nom,
            prenom: u.prenom,
            branche: u.branche,
            role: u.role.to_string(),
            service_assigne: u.service_assigne,
        }
    }
}

impl UserInfo {
    pub fn from_actor(actor: Actor, branche: Option<String>) -> Self {
        Self {
            id: actor.id,
            username: actor.username,
            nom: actor.nom,
            prenom: actor.prenom,
            branche,
            role: actor.role.to_string(),
            service_assigne: actor.service_assigne,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: UserInfo,
}

impl AuthResponse {
    pub fn new(message: &str, result: AuthResult) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            token: result.token,
            user: result.user.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: UserInfo,
}
