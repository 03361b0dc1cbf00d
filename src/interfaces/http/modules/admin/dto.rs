//! Admin report DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::attendance::{
    whole_percent, PresenceEntry, ServiceAttendance, ServiceDayStats, WeeklyDay,
};
use crate::domain::Presence;
use crate::interfaces::http::dto::{MemberDto, PresenceDto};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyQuery {
    /// `YYYY-MM-DD`
    pub start_date: Option<String>,
    /// `YYYY-MM-DD`
    pub end_date: Option<String>,
    /// Department name or short code, `tous` for every department
    pub service: Option<String>,
}

/// A presence with its member and the account that recorded it.
#[derive(Debug, Serialize, ToSchema)]
pub struct PresenceRow {
    pub id: i32,
    pub membre_id: i32,
    pub date: NaiveDate,
    pub present: bool,
    pub commentaire: Option<String>,
    pub created_at: DateTime<Utc>,
    pub nom: String,
    pub prenom: String,
    pub numero: String,
    pub quartier: String,
    pub service: String,
    pub berger_nom: Option<String>,
}

impl From<PresenceEntry> for PresenceRow {
    fn from(e: PresenceEntry) -> Self {
        Self {
            id: e.presence.id,
            membre_id: e.presence.membre_id,
            date: e.presence.date,
            present: e.presence.present,
            commentaire: e.presence.commentaire,
            created_at: e.presence.created_at,
            nom: e.member.nom,
            prenom: e.member.prenom,
            numero: e.member.numero,
            quartier: e.member.quartier,
            service: e.member.service,
            berger_nom: e.recorded_by,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceDayDto {
    pub service: String,
    pub total: usize,
    pub presents: usize,
    pub absents: usize,
    pub taux: u32,
}

impl From<ServiceDayStats> for ServiceDayDto {
    fn from(s: ServiceDayStats) -> Self {
        Self {
            service: s.service,
            total: s.total,
            presents: s.presents,
            absents: s.absents,
            taux: s.taux,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DateStats {
    pub total: usize,
    pub presents: usize,
    pub absents: usize,
    /// Whole percentage
    pub taux: u32,
    pub par_service: Vec<ServiceDayDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminDateResponse {
    pub success: bool,
    pub date: NaiveDate,
    pub presences: Vec<PresenceRow>,
    pub stats: DateStats,
    pub count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MemberPresenceRow {
    #[serde(flatten)]
    pub presence: PresenceDto,
    pub enregistre_par: Option<String>,
}

impl From<(Presence, Option<String>)> for MemberPresenceRow {
    fn from((presence, by): (Presence, Option<String>)) -> Self {
        Self {
            presence: presence.into(),
            enregistre_par: by,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MemberAttendanceStats {
    pub total: usize,
    pub presents: usize,
    pub absents: usize,
    pub taux_presence: u32,
    /// Date of the latest record, `Jamais` when there is none
    pub derniere_presence: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminMemberResponse {
    pub success: bool,
    pub membre: MemberDto,
    pub presences: Vec<MemberPresenceRow>,
    pub stats: MemberAttendanceStats,
    pub total_presences: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceAttendanceDto {
    pub service: String,
    pub total_membres: usize,
    pub total_presences: usize,
    pub presents: usize,
    pub absents: usize,
    pub jours_enregistres: usize,
    pub derniere_presence: Option<NaiveDate>,
    pub taux_presence: u32,
    pub taux_presentiels: u32,
    /// Members present per recorded day, on average
    pub moyenne_journaliere: f64,
}

impl From<ServiceAttendance> for ServiceAttendanceDto {
    fn from(s: ServiceAttendance) -> Self {
        Self {
            service: s.service,
            total_membres: s.total_membres,
            total_presences: s.total_presences,
            presents: s.presents,
            absents: s.absents,
            jours_enregistres: s.jours_enregistres,
            derniere_presence: s.derniere_presence,
            taux_presence: s.taux_presence,
            taux_presentiels: s.taux_presentiels,
            moyenne_journaliere: s.moyenne_journaliere,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceStatsSummaryDto {
    pub total_services: usize,
    pub total_membres: usize,
    pub total_presences: usize,
    pub total_presents: usize,
    pub total_absents: usize,
    pub taux_presence_global: u32,
    pub date_generation: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceStatsResponse {
    pub success: bool,
    pub stats: Vec<ServiceAttendanceDto>,
    pub summary: ServiceStatsSummaryDto,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WeeklyDayStats {
    pub total: usize,
    pub presents: usize,
    pub absents: usize,
    /// Whole percentage
    pub taux: u32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WeeklyDayDto {
    pub date: NaiveDate,
    pub data: Vec<PresenceRow>,
    pub stats: WeeklyDayStats,
}

impl From<WeeklyDay> for WeeklyDayDto {
    fn from(day: WeeklyDay) -> Self {
        Self {
            date: day.stats.date,
            stats: WeeklyDayStats {
                total: day.stats.total,
                presents: day.stats.presents,
                absents: day.stats.absents,
                taux: whole_percent(day.stats.presents, day.stats.total),
            },
            data: day.entries.into_iter().map(PresenceRow::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyDataResponse {
    pub success: bool,
    pub period: WeeklyPeriod,
    /// Department filter, `tous` when absent
    pub service: String,
    pub weekly_data: Vec<WeeklyDayDto>,
    #[serde(rename = "total_days")]
    pub total_days: usize,
    #[serde(rename = "total_presences")]
    pub total_presences: usize,
    #[serde(rename = "total_presents")]
    pub total_presents: usize,
}
