//! Presence DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::attendance::{MemberPresence, Statut};
use crate::domain::{DayStats, Presence};
use crate::interfaces::http::dto::{MemberDto, PresenceDto};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecordPresenceRequest {
    pub membre_id: Option<i32>,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    /// Defaults to true
    pub present: Option<bool>,
    #[validate(length(max = 500, message = "Le commentaire ne doit pas dépasser 500 caractères"))]
    pub commentaire: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MarkAllRequest {
    /// `YYYY-MM-DD`
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct PeriodQuery {
    /// `YYYY-MM-DD`, defaults to 30 days before the end
    pub start_date: Option<String>,
    /// `YYYY-MM-DD`, defaults to today
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecordPresenceResponse {
    pub success: bool,
    pub message: String,
    pub data: PresenceDto,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PresenceSnapshot {
    pub present: bool,
    pub commentaire: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Presence> for PresenceSnapshot {
    fn from(p: Presence) -> Self {
        Self {
            present: p.present,
            commentaire: p.commentaire,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MemberWithPresence {
    #[serde(flatten)]
    pub member: MemberDto,
    pub presence: Option<PresenceSnapshot>,
}

impl From<MemberPresence> for MemberWithPresence {
    fn from(row: MemberPresence) -> Self {
        Self {
            member: row.member.into(),
            presence: row.presence.map(Into::into),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DateSheetResponse {
    pub success: bool,
    pub date: NaiveDate,
    pub service: String,
    pub total_membres: usize,
    pub total_presences: usize,
    pub membres: Vec<MemberWithPresence>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MarkAllResponse {
    pub success: bool,
    pub message: String,
    pub date: NaiveDate,
    pub total_membres: usize,
    pub reussis: usize,
    pub echecs: usize,
    pub membres_echecs: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportRow {
    pub membre_id: i32,
    pub nom: String,
    pub prenom: String,
    pub quartier: String,
    /// `null` when the member was not marked
    pub present: Option<bool>,
    pub commentaire: Option<String>,
    /// `Présent`, `Absent` or `Non marqué`
    pub statut: String,
}

impl From<MemberPresence> for ReportRow {
    fn from(row: MemberPresence) -> Self {
        let statut = row.statut();
        Self {
            membre_id: row.member.id,
            nom: row.member.nom,
            prenom: row.member.prenom,
            quartier: row.member.quartier,
            present: row.presence.as_ref().map(|p| p.present),
            commentaire: row.presence.and_then(|p| p.commentaire),
            statut: statut.label().to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportResponse {
    pub success: bool,
    pub date: NaiveDate,
    pub service: String,
    pub total: usize,
    pub presents: usize,
    pub absents: usize,
    pub non_marques: usize,
    pub data: Vec<ReportRow>,
}

impl ReportResponse {
    pub fn count(rows: &[ReportRow], statut: Statut) -> usize {
        rows.iter().filter(|r| r.statut == statut.label()).count()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DayStatsDto {
    pub date: NaiveDate,
    pub total_membres: usize,
    pub presents: usize,
    pub absents: usize,
    pub taux_presence: f64,
}

impl From<DayStats> for DayStatsDto {
    fn from(d: DayStats) -> Self {
        Self {
            date: d.date,
            total_membres: d.total,
            presents: d.presents,
            absents: d.absents,
            taux_presence: d.taux,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PeriodStatsResponse {
    pub success: bool,
    pub service: String,
    pub periode: Period,
    /// Most recent date first
    pub stats: Vec<DayStatsDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryResponse {
    pub success: bool,
    pub membre: MemberDto,
    pub total: usize,
    pub presences: Vec<PresenceDto>,
}
