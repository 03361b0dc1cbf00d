//! Attendance recording and reporting.
//!
//! Berger operations are scoped to the caller's department; admin
//! operations see every record and resolve who recorded each presence.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use tracing::{info, warn};

use crate::application::membership::{require_department, MembershipService};
use crate::domain::department::{normalize_service_name, same_department};
use crate::domain::presence::stats::{daily_stats, round1, DayStats};
use crate::domain::{
    Actor, DomainError, DomainResult, Member, Presence, PresenceUpsert, RepositoryProvider,
};
use crate::shared::time::today;

pub const AUTO_MARK_COMMENT: &str = "Marqué présent automatiquement";
pub const HISTORY_LIMIT: u64 = 20;
pub const DEFAULT_STATS_DAYS: u64 = 30;
pub const MAX_REPORT_DAYS: i64 = 366;

/// Integer percentage used by the admin views.
pub fn whole_percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (part as f64 * 100.0 / total as f64).round() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statut {
    Present,
    Absent,
    NonMarque,
}

impl Statut {
    pub fn of(presence: Option<&Presence>) -> Self {
        match presence {
            Some(p) if p.present => Self::Present,
            Some(_) => Self::Absent,
            None => Self::NonMarque,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Present => "Présent",
            Self::Absent => "Absent",
            Self::NonMarque => "Non marqué",
        }
    }
}

/// A department member with its record for one date, if any.
#[derive(Debug, Clone)]
pub struct MemberPresence {
    pub member: Member,
    pub presence: Option<Presence>,
}

impl MemberPresence {
    pub fn statut(&self) -> Statut {
        Statut::of(self.presence.as_ref())
    }
}

#[derive(Debug, Clone)]
pub struct RecordRequest {
    pub membre_id: Option<i32>,
    pub date: Option<NaiveDate>,
    pub present: Option<bool>,
    pub commentaire: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DateSheet {
    pub date: NaiveDate,
    pub service: String,
    pub membres: Vec<MemberPresence>,
}

impl DateSheet {
    pub fn total_presences(&self) -> usize {
        self.membres.iter().filter(|m| m.presence.is_some()).count()
    }

    pub fn count(&self, statut: Statut) -> usize {
        self.membres.iter().filter(|m| m.statut() == statut).count()
    }
}

#[derive(Debug, Clone)]
pub struct MarkAllOutcome {
    pub date: NaiveDate,
    pub total_membres: usize,
    pub reussis: usize,
    pub membres_echecs: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PeriodStats {
    pub service: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Most recent date first
    pub days: Vec<DayStats>,
}

/// A presence joined with its member and the username that recorded it.
#[derive(Debug, Clone)]
pub struct PresenceEntry {
    pub presence: Presence,
    pub member: Member,
    pub recorded_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDayStats {
    pub service: String,
    pub total: usize,
    pub presents: usize,
    pub absents: usize,
    pub taux: u32,
}

#[derive(Debug, Clone)]
pub struct AdminDateView {
    pub date: NaiveDate,
    pub entries: Vec<PresenceEntry>,
    pub presents: usize,
    pub taux: u32,
    pub par_service: Vec<ServiceDayStats>,
}

impl AdminDateView {
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn absents(&self) -> usize {
        self.total() - self.presents
    }
}

#[derive(Debug, Clone)]
pub struct AdminMemberView {
    pub member: Member,
    /// Most recent date first
    pub presences: Vec<(Presence, Option<String>)>,
    pub presents: usize,
    pub taux_presence: u32,
}

impl AdminMemberView {
    pub fn derniere_presence(&self) -> Option<NaiveDate> {
        self.presences.first().map(|(p, _)| p.date)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceAttendance {
    pub service: String,
    pub total_membres: usize,
    pub total_presences: usize,
    pub presents: usize,
    pub absents: usize,
    pub jours_enregistres: usize,
    pub derniere_presence: Option<NaiveDate>,
    pub taux_presence: u32,
    pub taux_presentiels: u32,
    /// Average number of members present per recorded day
    pub moyenne_journaliere: f64,
}

#[derive(Debug, Clone)]
pub struct ServiceStatsSummary {
    pub total_services: usize,
    pub total_membres: usize,
    pub total_presences: usize,
    pub total_presents: usize,
    pub taux_presence_global: u32,
}

#[derive(Debug, Clone)]
pub struct WeeklyDay {
    pub entries: Vec<PresenceEntry>,
    pub stats: DayStats,
}

#[derive(Debug, Clone)]
pub struct WeeklyReport {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Department filter, `None` for every department
    pub service: Option<String>,
    /// Ascending dates that have at least one record
    pub days: Vec<WeeklyDay>,
}

impl WeeklyReport {
    pub fn total_presences(&self) -> usize {
        self.days.iter().map(|d| d.stats.total).sum()
    }

    pub fn total_presents(&self) -> usize {
        self.days.iter().map(|d| d.stats.presents).sum()
    }

    pub fn unique_members(&self) -> usize {
        self.days
            .iter()
            .flat_map(|d| d.entries.iter().map(|e| e.member.id))
            .collect::<HashSet<_>>()
            .len()
    }

    /// Mean of the daily rates, rounded to a whole percent.
    pub fn average_rate(&self) -> u32 {
        if self.days.is_empty() {
            return 0;
        }
        let mean = self.days.iter().map(|d| d.stats.taux).sum::<f64>() / self.days.len() as f64;
        mean.round() as u32
    }
}

fn days_before(end: NaiveDate, days: u64) -> DomainResult<NaiveDate> {
    end.checked_sub_days(Days::new(days))
        .ok_or_else(|| DomainError::Validation(format!("Date hors limites: {}", end)))
}

/// Validate a reporting period: ordered and at most a year long.
pub fn check_period(start: NaiveDate, end: NaiveDate) -> DomainResult<()> {
    if start > end {
        return Err(DomainError::Validation(
            "La date de début doit être antérieure ou égale à la date de fin".into(),
        ));
    }
    if (end - start).num_days() > MAX_REPORT_DAYS {
        return Err(DomainError::Validation(format!(
            "La période ne peut pas dépasser {} jours",
            MAX_REPORT_DAYS
        )));
    }
    Ok(())
}

fn sort_entries(entries: &mut [PresenceEntry]) {
    entries.sort_by(|a, b| {
        a.member
            .service
            .cmp(&b.member.service)
            .then_with(|| a.member.nom.cmp(&b.member.nom))
            .then_with(|| a.member.prenom.cmp(&b.member.prenom))
    });
}

fn sort_by_name(members: &mut [MemberPresence]) {
    members.sort_by(|a, b| {
        a.member
            .nom
            .cmp(&b.member.nom)
            .then_with(|| a.member.prenom.cmp(&b.member.prenom))
    });
}

pub struct AttendanceService {
    repos: Arc<dyn RepositoryProvider>,
    membership: Arc<MembershipService>,
}

impl AttendanceService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, membership: Arc<MembershipService>) -> Self {
        Self { repos, membership }
    }

    async fn usernames(&self) -> DomainResult<HashMap<i32, String>> {
        Ok(self
            .repos
            .users()
            .list()
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect())
    }

    async fn members_by_id(&self) -> DomainResult<HashMap<i32, Member>> {
        Ok(self
            .repos
            .members()
            .list()
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect())
    }

    /// Join presences with their members and recorders, dropping orphans.
    async fn entries(&self, presences: Vec<Presence>) -> DomainResult<Vec<PresenceEntry>> {
        let members = self.members_by_id().await?;
        let users = self.usernames().await?;
        Ok(presences
            .into_iter()
            .filter_map(|presence| {
                let member = members.get(&presence.membre_id)?.clone();
                let recorded_by = users.get(&presence.berger_id).cloned();
                Some(PresenceEntry {
                    presence,
                    member,
                    recorded_by,
                })
            })
            .collect())
    }

    async fn department_sheet(&self, dept: &str, date: NaiveDate) -> DomainResult<DateSheet> {
        let members = self.membership.members_of_department(dept).await?;
        let mut by_member: HashMap<i32, Presence> = self
            .repos
            .presences()
            .list_on_date(date)
            .await?
            .into_iter()
            .map(|p| (p.membre_id, p))
            .collect();

        let mut membres: Vec<MemberPresence> = members
            .into_iter()
            .map(|member| MemberPresence {
                presence: by_member.remove(&member.id),
                member,
            })
            .collect();
        sort_by_name(&mut membres);

        Ok(DateSheet {
            date,
            service: dept.to_string(),
            membres,
        })
    }

    // ── Berger operations ───────────────────────────────────────

    pub async fn record(&self, actor: &Actor, request: RecordRequest) -> DomainResult<(Member, Presence)> {
        let dept = require_department(actor)?;
        let (Some(membre_id), Some(date)) = (request.membre_id, request.date) else {
            return Err(DomainError::Validation("membre_id et date sont requis".into()));
        };

        let member = self
            .repos
            .members()
            .find_by_id(membre_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Membre", "id", membre_id))?;
        if !same_department(&member.service, dept) {
            return Err(DomainError::Forbidden(
                "Ce membre ne fait pas partie de votre service".into(),
            ));
        }

        let presence = self
            .repos
            .presences()
            .upsert(PresenceUpsert {
                membre_id,
                berger_id: actor.id,
                date,
                present: request.present.unwrap_or(true),
                commentaire: request
                    .commentaire
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty()),
            })
            .await?;
        info!(member_id = membre_id, %date, present = presence.present, berger = actor.id, "Presence recorded");
        Ok((member, presence))
    }

    pub async fn by_date(&self, actor: &Actor, date: NaiveDate) -> DomainResult<DateSheet> {
        let dept = require_department(actor)?;
        self.department_sheet(dept, date).await
    }

    pub async fn mark_all(&self, actor: &Actor, date: NaiveDate) -> DomainResult<MarkAllOutcome> {
        let dept = require_department(actor)?;
        let members = self.membership.members_of_department(dept).await?;

        let mut reussis = 0;
        let mut membres_echecs = Vec::new();
        for member in &members {
            let result = self
                .repos
                .presences()
                .upsert(PresenceUpsert {
                    membre_id: member.id,
                    berger_id: actor.id,
                    date,
                    present: true,
                    commentaire: Some(AUTO_MARK_COMMENT.to_string()),
                })
                .await;
            match result {
                Ok(_) => reussis += 1,
                Err(e) => {
                    warn!(member_id = member.id, error = %e, "Failed to mark member present");
                    membres_echecs.push(member.full_name());
                }
            }
        }

        info!(service = dept, %date, reussis, echecs = membres_echecs.len(), "Department marked present");
        Ok(MarkAllOutcome {
            date,
            total_membres: members.len(),
            reussis,
            membres_echecs,
        })
    }

    /// Every department member with its statut for `date`.
    pub async fn report(&self, actor: &Actor, date: NaiveDate) -> DomainResult<DateSheet> {
        self.by_date(actor, date).await
    }

    pub async fn stats(
        &self,
        actor: &Actor,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> DomainResult<PeriodStats> {
        let dept = require_department(actor)?;
        let end = end.unwrap_or_else(today);
        let start = match start {
            Some(start) => start,
            None => days_before(end, DEFAULT_STATS_DAYS)?,
        };
        check_period(start, end)?;

        let ids: Vec<i32> = self
            .membership
            .members_of_department(dept)
            .await?
            .iter()
            .map(|m| m.id)
            .collect();
        let presences = self
            .repos
            .presences()
            .list_for_members_between(&ids, start, end)
            .await?;

        let mut days = daily_stats(&presences);
        days.reverse();
        Ok(PeriodStats {
            service: dept.to_string(),
            start,
            end,
            days,
        })
    }

    pub async fn member_history(&self, actor: &Actor, membre_id: i32) -> DomainResult<(Member, Vec<Presence>)> {
        let dept = require_department(actor)?;
        let member = self
            .repos
            .members()
            .find_by_id(membre_id)
            .await?
            .filter(|m| same_department(&m.service, dept))
            .ok_or_else(|| DomainError::not_found("Membre", "id", membre_id))?;
        let history = self
            .repos
            .presences()
            .list_for_member(membre_id, Some(HISTORY_LIMIT))
            .await?;
        Ok((member, history))
    }

    // ── Admin operations ────────────────────────────────────────

    pub async fn admin_by_date(&self, date: NaiveDate) -> DomainResult<AdminDateView> {
        let presences = self.repos.presences().list_on_date(date).await?;
        let mut entries = self.entries(presences).await?;
        sort_entries(&mut entries);

        let mut grouped: BTreeMap<String, (usize, usize)> = BTreeMap::new();
        for entry in &entries {
            let slot = grouped.entry(entry.member.service.clone()).or_default();
            slot.0 += 1;
            if entry.presence.present {
                slot.1 += 1;
            }
        }
        let par_service = grouped
            .into_iter()
            .map(|(service, (total, presents))| ServiceDayStats {
                service,
                total,
                presents,
                absents: total - presents,
                taux: whole_percent(presents, total),
            })
            .collect();

        let presents = entries.iter().filter(|e| e.presence.present).count();
        Ok(AdminDateView {
            date,
            taux: whole_percent(presents, entries.len()),
            presents,
            entries,
            par_service,
        })
    }

    pub async fn admin_member(&self, membre_id: i32) -> DomainResult<AdminMemberView> {
        let member = self
            .repos
            .members()
            .find_by_id(membre_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Membre", "id", membre_id))?;
        let users = self.usernames().await?;
        let presences: Vec<(Presence, Option<String>)> = self
            .repos
            .presences()
            .list_for_member(membre_id, None)
            .await?
            .into_iter()
            .map(|p| {
                let by = users.get(&p.berger_id).cloned();
                (p, by)
            })
            .collect();

        let presents = presences.iter().filter(|(p, _)| p.present).count();
        Ok(AdminMemberView {
            member,
            taux_presence: whole_percent(presents, presences.len()),
            presents,
            presences,
        })
    }

    /// Per-department attendance since records began, largest departments first.
    pub async fn service_stats(&self) -> DomainResult<(Vec<ServiceAttendance>, ServiceStatsSummary)> {
        let members = self.repos.members().list().await?;
        let presences = self.repos.presences().list_all().await?;

        let mut department_of: HashMap<i32, String> = HashMap::new();
        let mut member_counts: BTreeMap<String, usize> = BTreeMap::new();
        for member in &members {
            let Some(service) = normalize_service_name(Some(&member.service)) else {
                continue;
            };
            *member_counts.entry(service.clone()).or_insert(0) += 1;
            department_of.insert(member.id, service);
        }

        let mut by_service: HashMap<&str, Vec<&Presence>> = HashMap::new();
        for presence in &presences {
            if let Some(service) = department_of.get(&presence.membre_id) {
                by_service.entry(service.as_str()).or_default().push(presence);
            }
        }

        let mut rows: Vec<ServiceAttendance> = member_counts
            .iter()
            .map(|(service, &total_membres)| {
                let records = by_service.get(service.as_str()).map(Vec::as_slice).unwrap_or(&[]);
                let presents = records.iter().filter(|p| p.present).count();
                let days: HashSet<NaiveDate> = records.iter().map(|p| p.date).collect();
                ServiceAttendance {
                    service: service.clone(),
                    total_membres,
                    total_presences: records.len(),
                    presents,
                    absents: records.len() - presents,
                    jours_enregistres: days.len(),
                    derniere_presence: days.iter().max().copied(),
                    taux_presence: whole_percent(presents, records.len()),
                    taux_presentiels: whole_percent(presents, total_membres),
                    moyenne_journaliere: if days.is_empty() {
                        0.0
                    } else {
                        round1(presents as f64 / days.len() as f64)
                    },
                }
            })
            .collect();
        rows.sort_by(|a, b| {
            b.total_membres
                .cmp(&a.total_membres)
                .then_with(|| a.service.cmp(&b.service))
        });

        let total_presences: usize = rows.iter().map(|r| r.total_presences).sum();
        let total_presents: usize = rows.iter().map(|r| r.presents).sum();
        let summary = ServiceStatsSummary {
            total_services: rows.len(),
            total_membres: rows.iter().map(|r| r.total_membres).sum(),
            total_presences,
            total_presents,
            taux_presence_global: whole_percent(total_presents, total_presences),
        };
        Ok((rows, summary))
    }

    /// Records between two dates grouped by day, optionally for one
    /// department (`tous` selects every department).
    pub async fn weekly(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        service: Option<&str>,
    ) -> DomainResult<WeeklyReport> {
        check_period(start, end)?;
        let service = service
            .map(str::trim)
            .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("tous"))
            .map(|s| normalize_service_name(Some(s)).unwrap_or_else(|| s.to_string()));

        let presences = self.repos.presences().list_between(start, end).await?;
        let mut entries = self.entries(presences).await?;
        if let Some(filter) = service.as_deref() {
            entries.retain(|e| same_department(&e.member.service, filter));
        }
        if entries.is_empty() {
            return Err(DomainError::NoData(
                "Aucune donnée de présence trouvée pour cette période".into(),
            ));
        }

        let mut by_date: BTreeMap<NaiveDate, Vec<PresenceEntry>> = BTreeMap::new();
        for entry in entries {
            by_date.entry(entry.presence.date).or_default().push(entry);
        }
        let days = by_date
            .into_iter()
            .map(|(date, mut entries)| {
                sort_entries(&mut entries);
                let stats = DayStats::from_records(date, entries.iter().map(|e| &e.presence));
                WeeklyDay { entries, stats }
            })
            .collect();

        Ok(WeeklyReport {
            start,
            end,
            service,
            days,
        })
    }

    /// Attendance over the last `days` days for the admin summary.
    pub async fn recent_summary(&self, days: u64) -> DomainResult<(NaiveDate, NaiveDate, Vec<DayStats>)> {
        let end = today();
        let start = days_before(end, days)?;
        let presences = self.repos.presences().list_between(start, end).await?;
        Ok((start, end, daily_stats(&presences)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::test_support::{actor_for, insert_member, insert_user, memory_repos};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    fn service(repos: &Arc<dyn RepositoryProvider>) -> AttendanceService {
        let membership = Arc::new(MembershipService::new(repos.clone()));
        AttendanceService::new(repos.clone(), membership)
    }

    fn record(membre_id: i32, date: NaiveDate, present: bool) -> RecordRequest {
        RecordRequest {
            membre_id: Some(membre_id),
            date: Some(date),
            present: Some(present),
            commentaire: None,
        }
    }

    #[test]
    fn whole_percent_rounds_half_up() {
        assert_eq!(whole_percent(1, 2), 50);
        assert_eq!(whole_percent(2, 3), 67);
        assert_eq!(whole_percent(0, 0), 0);
    }

    #[test]
    fn period_checks() {
        assert!(check_period(d(1), d(7)).is_ok());
        assert!(check_period(d(7), d(7)).is_ok());
        assert!(matches!(check_period(d(8), d(7)), Err(DomainError::Validation(_))));
        let far = d(1) + chrono::Duration::days(MAX_REPORT_DAYS + 1);
        assert!(matches!(check_period(d(1), far), Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn stats_rejects_end_date_at_calendar_limit() {
        let repos = memory_repos().await;
        let attendance = service(&repos);
        let berger = insert_user(&repos, "berger COM", Role::Berger, Some("Communication")).await;
        let actor = actor_for(&berger);

        assert!(matches!(
            attendance.stats(&actor, None, Some(NaiveDate::MIN)).await,
            Err(DomainError::Validation(_))
        ));
        let recent = attendance.stats(&actor, None, Some(d(31))).await.unwrap();
        assert_eq!(recent.start, d(1));
    }

    #[tokio::test]
    async fn record_checks_department_and_upserts() {
        let repos = memory_repos().await;
        let attendance = service(&repos);
        let berger = insert_user(&repos, "berger SO", Role::Berger, Some("Service d'ordre")).await;
        let ours = insert_member(&repos, &berger, "Yao", "Service d'ordre").await;
        let theirs = insert_member(&repos, &berger, "Konan", "Protocole").await;
        let actor = actor_for(&berger);

        let (_, first) = attendance.record(&actor, record(ours.id, d(5), true)).await.unwrap();
        let (_, second) = attendance
            .record(&actor, record(ours.id, d(5), false))
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
        assert!(!second.present);

        assert!(matches!(
            attendance.record(&actor, record(theirs.id, d(5), true)).await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            attendance.record(&actor, record(9999, d(5), true)).await,
            Err(DomainError::NotFound { .. })
        ));
        let missing = RecordRequest {
            date: None,
            ..record(ours.id, d(5), true)
        };
        assert!(matches!(
            attendance.record(&actor, missing).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn sheet_report_and_mark_all() {
        let repos = memory_repos().await;
        let attendance = service(&repos);
        let berger = insert_user(&repos, "berger GC", Role::Berger, Some("Gestion de culte")).await;
        let actor = actor_for(&berger);
        let a = insert_member(&repos, &berger, "Aka", "GC").await;
        let b = insert_member(&repos, &berger, "Bamba", "Gestion de culte").await;
        insert_member(&repos, &berger, "Coulibaly", "Gestion du culte").await;
        insert_member(&repos, &berger, "Diallo", "Logistique").await;

        attendance.record(&actor, record(a.id, d(5), true)).await.unwrap();
        attendance.record(&actor, record(b.id, d(5), false)).await.unwrap();

        let sheet = attendance.report(&actor, d(5)).await.unwrap();
        assert_eq!(sheet.membres.len(), 3);
        assert_eq!(sheet.membres[0].member.nom, "Aka");
        assert_eq!(sheet.total_presences(), 2);
        assert_eq!(sheet.count(Statut::Present), 1);
        assert_eq!(sheet.count(Statut::Absent), 1);
        assert_eq!(sheet.count(Statut::NonMarque), 1);
        assert_eq!(sheet.membres[2].statut().label(), "Non marqué");

        let outcome = attendance.mark_all(&actor, d(6)).await.unwrap();
        assert_eq!((outcome.total_membres, outcome.reussis), (3, 3));
        assert!(outcome.membres_echecs.is_empty());
        let sheet = attendance.by_date(&actor, d(6)).await.unwrap();
        assert!(sheet.membres.iter().all(|m| m
            .presence
            .as_ref()
            .is_some_and(|p| p.commentaire.as_deref() == Some(AUTO_MARK_COMMENT))));

        let stats = attendance.stats(&actor, Some(d(1)), Some(d(31))).await.unwrap();
        assert_eq!(stats.days.len(), 2);
        assert_eq!(stats.days[0].date, d(6));
        assert_eq!(stats.days[0].taux, 100.0);
        assert_eq!(stats.days[1].taux, 50.0);

        let (_, history) = attendance.member_history(&actor, a.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].date, d(6));
    }

    #[tokio::test]
    async fn admin_views() {
        let repos = memory_repos().await;
        let attendance = service(&repos);
        let so = insert_user(&repos, "berger SO", Role::Berger, Some("Service d'ordre")).await;
        let po = insert_user(&repos, "berger PO", Role::Berger, Some("Protocole")).await;
        let m1 = insert_member(&repos, &so, "Yao", "Service d'ordre").await;
        let m2 = insert_member(&repos, &so, "Kone", "Service d'ordre").await;
        let m3 = insert_member(&repos, &po, "Aka", "Protocole").await;

        let so_actor = actor_for(&so);
        let po_actor = actor_for(&po);
        attendance.record(&so_actor, record(m1.id, d(5), true)).await.unwrap();
        attendance.record(&so_actor, record(m2.id, d(5), false)).await.unwrap();
        attendance.record(&po_actor, record(m3.id, d(5), true)).await.unwrap();
        attendance.record(&so_actor, record(m1.id, d(12), true)).await.unwrap();

        let view = attendance.admin_by_date(d(5)).await.unwrap();
        assert_eq!(view.total(), 3);
        assert_eq!(view.taux, 67);
        assert_eq!(view.entries[0].member.service, "Protocole");
        assert_eq!(view.entries[0].recorded_by.as_deref(), Some("berger PO"));
        assert_eq!(view.par_service.len(), 2);
        assert_eq!(view.par_service[1].taux, 50);

        let member = attendance.admin_member(m1.id).await.unwrap();
        assert_eq!(member.presences.len(), 2);
        assert_eq!(member.derniere_presence(), Some(d(12)));
        assert_eq!(member.taux_presence, 100);
        assert!(matches!(
            attendance.admin_member(999).await,
            Err(DomainError::NotFound { .. })
        ));

        let (rows, summary) = attendance.service_stats().await.unwrap();
        assert_eq!(rows[0].service, "Service d'ordre");
        assert_eq!(rows[0].total_presences, 3);
        assert_eq!(rows[0].jours_enregistres, 2);
        assert_eq!(rows[0].moyenne_journaliere, 1.0);
        assert_eq!(rows[0].taux_presentiels, 100);
        assert_eq!(summary.total_services, 2);
        assert_eq!(summary.total_presences, 4);
        assert_eq!(summary.taux_presence_global, 75);

        let weekly = attendance.weekly(d(1), d(7), Some("tous")).await.unwrap();
        assert_eq!(weekly.days.len(), 1);
        assert_eq!(weekly.unique_members(), 3);
        let weekly = attendance.weekly(d(1), d(31), Some("SO")).await.unwrap();
        assert_eq!(weekly.service.as_deref(), Some("Service d'ordre"));
        assert_eq!(weekly.total_presences(), 3);
        assert_eq!(weekly.average_rate(), 75);
        assert!(matches!(
            attendance.weekly(d(20), d(25), None).await,
            Err(DomainError::NoData(_))
        ));
    }
}
