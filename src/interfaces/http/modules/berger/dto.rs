use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::MemberStats;
use crate::interfaces::http::dto::MemberDto;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_membres: usize,
    pub cette_semaine: usize,
    pub aujourdhui: usize,
}

impl From<MemberStats> for DashboardStats {
    fn from(s: MemberStats) -> Self {
        Self {
            total_membres: s.total,
            cette_semaine: s.cette_semaine,
            aujourdhui: s.aujourdhui,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub success: bool,
    pub service: String,
    pub stats: DashboardStats,
    /// Ten most recent registrations
    pub derniers_membres: Vec<MemberDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DepartmentMembersResponse {
    pub success: bool,
    pub service: String,
    pub membres: Vec<MemberDto>,
    pub total: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentStatsResponse {
    pub success: bool,
    pub service: String,
    pub total: usize,
    pub par_quartier: BTreeMap<String, usize>,
    /// Keyed by `YYYY-MM`
    pub par_mois: BTreeMap<String, usize>,
    /// Keyed by registering username
    pub par_utilisateur: BTreeMap<String, usize>,
}
