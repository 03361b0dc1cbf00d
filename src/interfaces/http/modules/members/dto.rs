//! Member DTOs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationErrors};

use crate::domain::MemberStats;
use crate::interfaces::http::dto::{MemberDto, UserDto};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMemberRequest {
    #[validate(length(max = 100, message = "Le nom ne doit pas dépasser 100 caractères"))]
    pub nom: Option<String>,
    #[validate(length(max = 100, message = "Le prénom ne doit pas dépasser 100 caractères"))]
    pub prenom: Option<String>,
    #[validate(length(max = 20, message = "Numéro de téléphone invalide"))]
    pub numero: Option<String>,
    #[validate(length(max = 100, message = "Le quartier ne doit pas dépasser 100 caractères"))]
    pub quartier: Option<String>,
    #[validate(length(max = 100, message = "Le service ne doit pas dépasser 100 caractères"))]
    pub service: Option<String>,
}

/// Raw JSON object; allowed keys are checked by the membership service.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct UpdateMemberRequest(pub Map<String, Value>);

impl Validate for UpdateMemberRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRoleRequest {
    pub role: Option<String>,
    /// Department handled by the account, for bergers
    #[validate(length(max = 100, message = "Le service ne doit pas dépasser 100 caractères"))]
    pub service_assigne: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Substring of nom, prenom, numero or quartier
    pub query: Option<String>,
    /// Department name or short code
    pub service: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MemberStatsDto {
    pub total: usize,
    pub aujourdhui: usize,
    pub cette_semaine: usize,
}

impl From<MemberStats> for MemberStatsDto {
    fn from(s: MemberStats) -> Self {
        Self {
            total: s.total,
            aujourdhui: s.aujourdhui,
            cette_semaine: s.cette_semaine,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MemberResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub member: MemberDto,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MyMembersResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<MemberStatsDto>,
    pub membres: Vec<MemberDto>,
    pub total: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceCounts {
    pub total: usize,
    pub par_service: BTreeMap<String, usize>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AllMembersResponse {
    pub success: bool,
    pub membres: Vec<MemberDto>,
    pub total: usize,
    pub stats: ServiceCounts,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleCounts {
    pub total: usize,
    pub par_role: BTreeMap<String, usize>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UsersResponse {
    pub success: bool,
    pub users: Vec<UserDto>,
    pub total: usize,
    pub stats: RoleCounts,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleUpdatedResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: i32,
    #[serde(rename = "newRole")]
    pub new_role: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub success: bool,
    pub query: Option<String>,
    pub service: Option<String>,
    pub total: usize,
    pub membres: Vec<MemberDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MembersExport {
    pub success: bool,
    pub exported_at: DateTime<Utc>,
    pub total: usize,
    pub data: Vec<MemberDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UsersExport {
    pub success: bool,
    pub exported_at: DateTime<Utc>,
    pub total: usize,
    pub data: Vec<UserDto>,
}
