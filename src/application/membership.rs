//! Member registration, lookup and the berger workspace.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Datelike, Utc};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::domain::department::{normalize_service_name, same_department};
use crate::domain::member::stats::{count_by, MemberStats};
use crate::domain::{
    Actor, DomainError, DomainResult, Member, MemberChanges, NewMember, RepositoryProvider,
};
use crate::shared::validations::{is_valid_phone, missing_fields, normalize_phone};

pub const SEARCH_LIMIT: usize = 100;
const DASHBOARD_RECENT: usize = 10;
const UPDATABLE_FIELDS: [&str; 5] = ["nom", "prenom", "numero", "quartier", "service"];

#[derive(Debug, Clone, Default)]
pub struct MemberInput {
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub numero: Option<String>,
    pub quartier: Option<String>,
    pub service: Option<String>,
}

/// Members visible from `/my-members`; `service` and `stats` are set for
/// bergers working on their department.
#[derive(Debug, Clone)]
pub struct MyMembers {
    pub service: Option<String>,
    pub stats: Option<MemberStats>,
    pub membres: Vec<Member>,
}

#[derive(Debug, Clone)]
pub struct BergerDashboard {
    pub service: String,
    pub stats: MemberStats,
    pub derniers_membres: Vec<Member>,
}

#[derive(Debug, Clone)]
pub struct BergerStats {
    pub service: String,
    pub total: usize,
    pub par_quartier: BTreeMap<String, usize>,
    pub par_mois: BTreeMap<String, usize>,
    pub par_utilisateur: BTreeMap<String, usize>,
}

/// Department of the caller for the berger workspace.
pub fn require_department(actor: &Actor) -> DomainResult<&str> {
    actor
        .service_assigne
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| DomainError::Validation("Aucun service assigné à ce berger".into()))
}

/// Whether `actor` may read or edit `member`.
pub fn can_access(actor: &Actor, member: &Member) -> bool {
    if actor.role.is_admin() || member.user_id == Some(actor.id) {
        return true;
    }
    actor
        .berger_department()
        .is_some_and(|dept| same_department(&member.service, dept))
}

fn canonical_service(raw: &str) -> String {
    normalize_service_name(Some(raw)).unwrap_or_else(|| raw.trim().to_string())
}

fn validate_phone(raw: &str, message: &str) -> DomainResult<String> {
    if !is_valid_phone(raw) {
        return Err(DomainError::Validation(message.to_string()));
    }
    Ok(normalize_phone(raw))
}

/// Build a partial update from a JSON object, rejecting unknown keys.
pub fn parse_changes(fields: &Map<String, Value>) -> DomainResult<MemberChanges> {
    let unknown: Vec<&str> = fields
        .keys()
        .map(String::as_str)
        .filter(|k| !UPDATABLE_FIELDS.contains(k))
        .collect();
    if !unknown.is_empty() {
        return Err(DomainError::Validation(format!(
            "Champs non autorisés: {}",
            unknown.join(", ")
        )));
    }

    let text = |key: &str| -> DomainResult<Option<String>> {
        match fields.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if !s.trim().is_empty() => Ok(Some(s.trim().to_string())),
            Some(Value::String(_)) => Err(DomainError::Validation(format!(
                "Le champ {} ne peut pas être vide",
                key
            ))),
            Some(_) => Err(DomainError::Validation(format!(
                "Le champ {} doit être une chaîne de caractères",
                key
            ))),
        }
    };

    Ok(MemberChanges {
        nom: text("nom")?,
        prenom: text("prenom")?,
        numero: text("numero")?,
        quartier: text("quartier")?,
        service: text("service")?,
    })
}

pub struct MembershipService {
    repos: Arc<dyn RepositoryProvider>,
}

impl MembershipService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Every member whose service matches `department`, newest first.
    pub async fn members_of_department(&self, department: &str) -> DomainResult<Vec<Member>> {
        let members = self.repos.members().list().await?;
        let matching: Vec<Member> = members
            .into_iter()
            .filter(|m| same_department(&m.service, department))
            .collect();
        debug!(service = department, count = matching.len(), "Department members loaded");
        Ok(matching)
    }

    /// Members the caller may see: everything for admins, the department
    /// for bergers, their own registrations otherwise.
    async fn visible_members(&self, actor: &Actor) -> DomainResult<Vec<Member>> {
        if actor.role.is_admin() {
            return self.repos.members().list().await;
        }
        match actor.berger_department() {
            Some(dept) => self.members_of_department(dept).await,
            None => self.repos.members().list_by_user(actor.id).await,
        }
    }

    pub async fn create(&self, actor: &Actor, input: MemberInput) -> DomainResult<Member> {
        let missing = missing_fields(&[
            ("nom", input.nom.as_deref()),
            ("prenom", input.prenom.as_deref()),
            ("numero", input.numero.as_deref()),
            ("quartier", input.quartier.as_deref()),
            ("service", input.service.as_deref()),
        ]);
        if !missing.is_empty() {
            return Err(DomainError::Validation(
                "Tous les champs sont requis: nom, prénom, numéro, quartier, service".into(),
            ));
        }

        let nom = input.nom.unwrap_or_default().trim().to_string();
        let prenom = input.prenom.unwrap_or_default().trim().to_string();
        let quartier = input.quartier.unwrap_or_default().trim().to_string();
        let service = canonical_service(input.service.as_deref().unwrap_or_default());
        let numero = validate_phone(
            input.numero.as_deref().unwrap_or_default(),
            "Numéro de téléphone invalide. Format attendu: 0102030405 ou +2250102030405",
        )?;

        if let Some(dept) = actor.berger_department() {
            if !same_department(&service, dept) {
                return Err(DomainError::Forbidden(format!(
                    "Vous ne pouvez ajouter que des membres du service: {}",
                    dept
                )));
            }
        }

        if self
            .repos
            .members()
            .exists_for_user(actor.id, &nom, &prenom)
            .await?
        {
            return Err(DomainError::Validation(
                "Un membre avec ce nom et prénom existe déjà dans votre liste".into(),
            ));
        }

        let member = self
            .repos
            .members()
            .create(NewMember {
                user_id: actor.id,
                nom,
                prenom,
                numero,
                quartier,
                service,
            })
            .await?;
        info!(member_id = member.id, user_id = actor.id, service = %member.service, "Member created");
        Ok(member)
    }

    pub async fn my_members(&self, actor: &Actor) -> DomainResult<MyMembers> {
        match actor.berger_department() {
            Some(dept) => {
                let membres = self.members_of_department(dept).await?;
                Ok(MyMembers {
                    service: Some(dept.to_string()),
                    stats: Some(MemberStats::compute(&membres, Utc::now())),
                    membres,
                })
            }
            None => Ok(MyMembers {
                service: None,
                stats: None,
                membres: self.repos.members().list_by_user(actor.id).await?,
            }),
        }
    }

    pub async fn search(
        &self,
        actor: &Actor,
        query: Option<&str>,
        service: Option<&str>,
    ) -> DomainResult<Vec<Member>> {
        let query = query.map(str::trim).filter(|q| !q.is_empty());
        let service = service.map(str::trim).filter(|s| !s.is_empty());
        if query.is_none() && service.is_none() {
            return Err(DomainError::Validation(
                "Veuillez fournir un terme de recherche ou un service".into(),
            ));
        }

        let needle = query.map(str::to_lowercase);
        let results = self
            .visible_members(actor)
            .await?
            .into_iter()
            .filter(|m| {
                needle.as_deref().map_or(true, |n| {
                    [&m.nom, &m.prenom, &m.numero, &m.quartier]
                        .iter()
                        .any(|field| field.to_lowercase().contains(n))
                })
            })
            .filter(|m| service.map_or(true, |s| same_department(&m.service, s)))
            .take(SEARCH_LIMIT)
            .collect();
        Ok(results)
    }

    pub async fn get(&self, actor: &Actor, id: i32) -> DomainResult<Member> {
        self.repos
            .members()
            .find_by_id(id)
            .await?
            .filter(|m| can_access(actor, m))
            .ok_or_else(|| DomainError::not_found("Membre", "id", id))
    }

    pub async fn update(&self, actor: &Actor, id: i32, mut changes: MemberChanges) -> DomainResult<Member> {
        if changes.is_empty() {
            return Err(DomainError::Validation("Aucun champ à mettre à jour".into()));
        }

        self.get(actor, id).await?;

        if let Some(service) = changes.service.take() {
            let service = canonical_service(&service);
            if let Some(dept) = actor.berger_department() {
                if !same_department(&service, dept) {
                    return Err(DomainError::Forbidden(format!(
                        "Vous ne pouvez pas changer le service. Votre service assigné est: {}",
                        dept
                    )));
                }
            }
            changes.service = Some(service);
        }
        if let Some(numero) = changes.numero.take() {
            changes.numero = Some(validate_phone(&numero, "Numéro de téléphone invalide")?);
        }

        let member = self.repos.members().update(id, changes).await?;
        info!(member_id = id, actor = actor.id, "Member updated");
        Ok(member)
    }

    // ── Administration ──────────────────────────────────────────

    /// Every member plus the count per stored service.
    pub async fn list_all(&self) -> DomainResult<(Vec<Member>, BTreeMap<String, usize>)> {
        let members = self.repos.members().list().await?;
        let par_service = count_by(&members, "Non spécifié", |m| m.service.clone());
        Ok((members, par_service))
    }

    pub async fn delete(&self, id: i32) -> DomainResult<()> {
        if !self.repos.members().delete_cascade(id).await? {
            return Err(DomainError::not_found("Membre", "id", id));
        }
        info!(member_id = id, "Member deleted");
        Ok(())
    }

    // ── Berger workspace ────────────────────────────────────────

    pub async fn berger_members(&self, actor: &Actor) -> DomainResult<(String, Vec<Member>)> {
        let dept = require_department(actor)?;
        let membres = self.members_of_department(dept).await?;
        Ok((dept.to_string(), membres))
    }

    pub async fn berger_dashboard(&self, actor: &Actor) -> DomainResult<BergerDashboard> {
        let (service, membres) = self.berger_members(actor).await?;
        let stats = MemberStats::compute(&membres, Utc::now());
        Ok(BergerDashboard {
            service,
            stats,
            derniers_membres: membres.into_iter().take(DASHBOARD_RECENT).collect(),
        })
    }

    pub async fn berger_stats(&self, actor: &Actor) -> DomainResult<BergerStats> {
        let (service, membres) = self.berger_members(actor).await?;
        Ok(BergerStats {
            service,
            total: membres.len(),
            par_quartier: count_by(&membres, "Non spécifié", |m| m.quartier.clone()),
            par_mois: count_by(&membres, "Non spécifié", |m| {
                format!("{}-{:02}", m.created_at.year(), m.created_at.month())
            }),
            par_utilisateur: count_by(&membres, "Inconnu", |m| {
                m.owner_username().unwrap_or_default().to_string()
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::test_support::{actor_for, insert_member, insert_user, memory_repos};
    use serde_json::json;

    fn input(nom: &str, numero: &str, service: &str) -> MemberInput {
        MemberInput {
            nom: Some(nom.into()),
            prenom: Some(" Awa ".into()),
            numero: Some(numero.into()),
            quartier: Some("Cocody".into()),
            service: Some(service.into()),
        }
    }

    #[tokio::test]
    async fn create_normalizes_and_checks_duplicates() {
        let repos = memory_repos().await;
        let service = MembershipService::new(repos.clone());
        let user = insert_user(&repos, "ama", Role::Member, None).await;
        let actor = actor_for(&user);

        let member = service
            .create(&actor, input(" Koffi ", "+225 0708091011", "la communication"))
            .await
            .unwrap();
        assert_eq!(member.nom, "Koffi");
        assert_eq!(member.prenom, "Awa");
        assert_eq!(member.numero, "0708091011");
        assert_eq!(member.service, "Communication");

        let err = service
            .create(&actor, input("Koffi", "0708091011", "COM"))
            .await
            .unwrap_err();
        assert!(err.public_message().contains("existe déjà"));

        let err = service
            .create(&actor, input("Yao", "12ab", "COM"))
            .await
            .unwrap_err();
        assert!(err.public_message().starts_with("Numéro de téléphone invalide"));

        let err = service
            .create(&actor, MemberInput::default())
            .await
            .unwrap_err();
        assert!(err.public_message().starts_with("Tous les champs sont requis"));
    }

    #[tokio::test]
    async fn bergers_are_held_to_their_department() {
        let repos = memory_repos().await;
        let service = MembershipService::new(repos.clone());
        let berger = insert_user(&repos, "berger COM", Role::Berger, Some("Communication")).await;
        let actor = actor_for(&berger);

        service
            .create(&actor, input("Koffi", "0708091011", "COM"))
            .await
            .unwrap();
        assert!(matches!(
            service.create(&actor, input("Yao", "0708091011", "Protocole")).await,
            Err(DomainError::Forbidden(_))
        ));

        let other = insert_user(&repos, "ama", Role::Member, None).await;
        insert_member(&repos, &other, "Bamba", "communication").await;
        insert_member(&repos, &other, "Traoré", "Protocole").await;

        let mine = service.my_members(&actor).await.unwrap();
        assert_eq!(mine.service.as_deref(), Some("Communication"));
        assert_eq!(mine.membres.len(), 2);
        assert_eq!(mine.stats.unwrap().total, 2);

        let own = service.my_members(&actor_for(&other)).await.unwrap();
        assert!(own.service.is_none());
        assert_eq!(own.membres.len(), 2);
    }

    #[tokio::test]
    async fn search_respects_visibility() {
        let repos = memory_repos().await;
        let service = MembershipService::new(repos.clone());
        let admin = insert_user(&repos, "admin", Role::Admin, None).await;
        let berger = insert_user(&repos, "berger PO", Role::Berger, Some("Protocole")).await;
        let member = insert_user(&repos, "ama", Role::Member, None).await;
        insert_member(&repos, &member, "Koffi", "Protocole").await;
        insert_member(&repos, &member, "Kouame", "Communication").await;
        insert_member(&repos, &admin, "Konan", "Protocole").await;

        assert!(matches!(
            service.search(&actor_for(&admin), None, Some(" ")).await,
            Err(DomainError::Validation(_))
        ));
        assert_eq!(
            service.search(&actor_for(&admin), Some("ko"), None).await.unwrap().len(),
            3
        );
        assert_eq!(
            service
                .search(&actor_for(&admin), Some("ko"), Some("PO"))
                .await
                .unwrap()
                .len(),
            2
        );
        assert_eq!(
            service.search(&actor_for(&berger), Some("ko"), None).await.unwrap().len(),
            2
        );
        assert_eq!(
            service.search(&actor_for(&member), Some("KOU"), None).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn get_and_update_follow_access_rules() {
        let repos = memory_repos().await;
        let service = MembershipService::new(repos.clone());
        let owner = insert_user(&repos, "ama", Role::Member, None).await;
        let stranger = insert_user(&repos, "yao", Role::Member, None).await;
        let berger = insert_user(&repos, "berger PO", Role::Berger, Some("Protocole")).await;
        let member = insert_member(&repos, &owner, "Koffi", "Protocole").await;

        assert!(service.get(&actor_for(&owner), member.id).await.is_ok());
        assert!(service.get(&actor_for(&berger), member.id).await.is_ok());
        assert!(matches!(
            service.get(&actor_for(&stranger), member.id).await,
            Err(DomainError::NotFound { .. })
        ));

        let changes = parse_changes(
            json!({"quartier": " Yopougon ", "numero": "+22577080910"})
                .as_object()
                .unwrap(),
        )
        .unwrap();
        let updated = service
            .update(&actor_for(&berger), member.id, changes)
            .await
            .unwrap();
        assert_eq!(updated.quartier, "Yopougon");
        assert_eq!(updated.numero, "077080910");

        let moving = MemberChanges {
            service: Some("Logistique".into()),
            ..Default::default()
        };
        assert!(matches!(
            service.update(&actor_for(&berger), member.id, moving).await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            service
                .update(&actor_for(&owner), member.id, MemberChanges::default())
                .await,
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn parse_changes_rejects_unknown_fields() {
        let err = parse_changes(json!({"nom": "A", "user_id": 3}).as_object().unwrap()).unwrap_err();
        assert_eq!(err.public_message(), "Champs non autorisés: user_id");

        let err = parse_changes(json!({"nom": 3}).as_object().unwrap()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let changes = parse_changes(json!({"service": null}).as_object().unwrap()).unwrap();
        assert!(changes.is_empty());
    }

    #[tokio::test]
    async fn admin_listing_and_berger_workspace() {
        let repos = memory_repos().await;
        let service = MembershipService::new(repos.clone());
        let owner = insert_user(&repos, "ama", Role::Member, None).await;
        let first = insert_member(&repos, &owner, "Koffi", "Suivi").await;
        insert_member(&repos, &owner, "Yao", "Suivi").await;
        insert_member(&repos, &owner, "Bamba", "Logistique").await;

        let (members, par_service) = service.list_all().await.unwrap();
        assert_eq!(members.len(), 3);
        assert_eq!(par_service["Suivi"], 2);

        let berger = insert_user(&repos, "berger suivi", Role::Berger, Some("Suivi")).await;
        let dashboard = service.berger_dashboard(&actor_for(&berger)).await.unwrap();
        assert_eq!(dashboard.stats.total, 2);
        assert_eq!(dashboard.derniers_membres.len(), 2);

        let stats = service.berger_stats(&actor_for(&berger)).await.unwrap();
        assert_eq!(stats.par_quartier["Cocody"], 2);
        assert_eq!(stats.par_utilisateur["ama"], 2);
        assert_eq!(stats.par_mois.values().sum::<usize>(), 2);

        let unassigned = insert_user(&repos, "berger x", Role::Berger, None).await;
        let err = service.berger_members(&actor_for(&unassigned)).await.unwrap_err();
        assert_eq!(err.public_message(), "Aucun service assigné à ce berger");

        service.delete(first.id).await.unwrap();
        assert!(matches!(
            service.delete(first.id).await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
