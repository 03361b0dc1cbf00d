//! Identity service: registration, login and user administration.
//!
//! HTTP handlers stay thin wrappers that delegate to this service.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::department::normalize_service_name;
use crate::domain::{Actor, DomainError, DomainResult, NewUser, RepositoryProvider, Role, User};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::shared::validations::missing_fields;

/// Authentication result returned after login or registration
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub username: Option<String>,
    pub password: Option<String>,
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub branche: Option<String>,
}

/// Users with per-role counts.
#[derive(Debug, Clone)]
pub struct UserListing {
    pub users: Vec<User>,
    pub par_role: BTreeMap<&'static str, usize>,
}

pub struct IdentityService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
}

fn clean(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

impl IdentityService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig) -> Self {
        Self { repos, jwt_config }
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt_config
    }

    fn issue(&self, user: User) -> DomainResult<AuthResult> {
        let token = create_token(&user, &self.jwt_config)
            .map_err(|e| DomainError::Internal(format!("Failed to create token: {}", e)))?;
        Ok(AuthResult { token, user })
    }

    // ── Authentication ──────────────────────────────────────────

    /// Create a `member` account and sign it in.
    pub async fn register(&self, input: Registration) -> DomainResult<AuthResult> {
        let missing = missing_fields(&[
            ("username", input.username.as_deref()),
            ("password", input.password.as_deref()),
            ("nom", input.nom.as_deref()),
            ("prenom", input.prenom.as_deref()),
            ("branche", input.branche.as_deref()),
        ]);
        if !missing.is_empty() {
            return Err(DomainError::Validation(
                "Veuillez fournir tous les champs requis: username, password, nom, prenom, branche"
                    .into(),
            ));
        }

        let username = clean(input.username);
        if self.repos.users().find_by_username(&username).await?.is_some() {
            return Err(DomainError::Validation(
                "Ce nom d'utilisateur est déjà utilisé".into(),
            ));
        }

        let password = input.password.unwrap_or_default();
        let password_hash = hash_password(&password)
            .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))?;

        let user = self
            .repos
            .users()
            .create(NewUser {
                username,
                password_hash,
                nom: Some(clean(input.nom)),
                prenom: Some(clean(input.prenom)),
                branche: Some(clean(input.branche)),
                role: Role::Member,
                service_assigne: None,
            })
            .await
            .map_err(|e| match e {
                DomainError::Conflict(msg) => DomainError::Validation(msg),
                other => other,
            })?;

        info!(user_id = user.id, username = %user.username, "Account registered");
        self.issue(user)
    }

    pub async fn login(&self, username: Option<&str>, password: Option<&str>) -> DomainResult<AuthResult> {
        let (Some(username), Some(password)) = (
            username.map(str::trim).filter(|s| !s.is_empty()),
            password.filter(|s| !s.is_empty()),
        ) else {
            return Err(DomainError::Validation(
                "Veuillez fournir nom d'utilisateur et mot de passe".into(),
            ));
        };

        let Some(user) = self.repos.users().find_by_username(username).await? else {
            warn!(username, "Login attempt for unknown user");
            return Err(DomainError::Unauthorized("Identifiants incorrects".into()));
        };

        if !verify_password(password, &user.password_hash).unwrap_or(false) {
            warn!(user_id = user.id, "Login attempt with wrong password");
            return Err(DomainError::Unauthorized("Identifiants incorrects".into()));
        }

        info!(user_id = user.id, role = %user.role, "User logged in");
        self.issue(user)
    }

    pub async fn change_password(
        &self,
        actor: &Actor,
        current_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let user = self
            .repos
            .users()
            .find_by_id(actor.id)
            .await?
            .ok_or_else(|| DomainError::not_found("Utilisateur", "id", actor.id))?;

        if !verify_password(current_password, &user.password_hash).unwrap_or(false) {
            return Err(DomainError::Unauthorized(
                "Mot de passe actuel incorrect".into(),
            ));
        }
        if new_password.chars().count() < 6 {
            return Err(DomainError::Validation(
                "Le nouveau mot de passe doit contenir au moins 6 caractères".into(),
            ));
        }

        let password_hash = hash_password(new_password)
            .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))?;
        self.repos
            .users()
            .update_password(user.id, &password_hash)
            .await?;
        info!(user_id = user.id, "Password changed");
        Ok(())
    }

    // ── Administration ──────────────────────────────────────────

    pub async fn list_users(&self) -> DomainResult<UserListing> {
        let users = self.repos.users().list().await?;
        let mut par_role: BTreeMap<&'static str, usize> =
            Role::ALL.iter().map(|r| (r.as_str(), 0)).collect();
        for user in &users {
            *par_role.entry(user.role.as_str()).or_insert(0) += 1;
        }
        Ok(UserListing { users, par_role })
    }

    pub async fn delete_user(&self, actor: &Actor, id: i32) -> DomainResult<()> {
        if actor.id == id {
            return Err(DomainError::Validation(
                "Vous ne pouvez pas supprimer votre propre compte".into(),
            ));
        }

        let target = self
            .repos
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Utilisateur", "id", id))?;

        if target.role == Role::SuperAdmin && actor.role != Role::SuperAdmin {
            return Err(DomainError::Forbidden(
                "Seuls les super administrateurs peuvent supprimer d'autres super administrateurs"
                    .into(),
            ));
        }

        if !self.repos.users().delete_cascade(id).await? {
            return Err(DomainError::not_found("Utilisateur", "id", id));
        }
        info!(actor = actor.id, user_id = id, "User deleted with their members");
        Ok(())
    }

    /// Change a user's role; `service_assigne`, when given, is normalized
    /// and replaces the stored department.
    pub async fn update_user_role(
        &self,
        actor: &Actor,
        id: i32,
        role: &str,
        service_assigne: Option<&str>,
    ) -> DomainResult<Role> {
        let new_role: Role = role.parse()?;

        if actor.id == id {
            return Err(DomainError::Validation(
                "Vous ne pouvez pas modifier votre propre rôle".into(),
            ));
        }

        let target = self
            .repos
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Utilisateur", "id", id))?;

        if target.role == Role::SuperAdmin && actor.role != Role::SuperAdmin {
            return Err(DomainError::Forbidden(
                "Seuls les super administrateurs peuvent modifier d'autres super administrateurs"
                    .into(),
            ));
        }
        if new_role.rank() > actor.role.rank() {
            return Err(DomainError::Forbidden(
                "Vous ne pouvez pas attribuer un rôle supérieur au vôtre".into(),
            ));
        }

        let service = match service_assigne {
            Some(raw) => normalize_service_name(Some(raw)),
            None => target.service_assigne,
        };
        self.repos
            .users()
            .update_role(id, new_role, service)
            .await?;

        info!(actor = actor.id, user_id = id, role = %new_role, "Role updated");
        Ok(new_role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::crypto::jwt::verify_token;
    use crate::test_support::{actor_for, insert_user, memory_repos};

    fn registration(username: &str) -> Registration {
        Registration {
            username: Some(username.into()),
            password: Some("secret1".into()),
            nom: Some("Kouadio".into()),
            prenom: Some("Ama".into()),
            branche: Some("Cocody".into()),
        }
    }

    async fn service() -> IdentityService {
        IdentityService::new(memory_repos().await, JwtConfig::default())
    }

    #[tokio::test]
    async fn register_then_login() {
        let service = service().await;
        let registered = service.register(registration("ama")).await.unwrap();
        assert_eq!(registered.user.role, Role::Member);

        let claims = verify_token(&registered.token, service.jwt_config()).unwrap();
        assert_eq!(claims.username.as_deref(), Some("ama"));

        let logged = service.login(Some("ama"), Some("secret1")).await.unwrap();
        assert_eq!(logged.user.id, registered.user.id);
    }

    #[tokio::test]
    async fn register_validation_and_duplicates() {
        let service = service().await;
        let mut incomplete = registration("ama");
        incomplete.branche = Some("  ".into());
        let err = service.register(incomplete).await.unwrap_err();
        assert!(err.public_message().starts_with("Veuillez fournir tous les champs"));

        service.register(registration("ama")).await.unwrap();
        let err = service.register(registration("ama")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref m) if m.contains("déjà utilisé")));
    }

    #[tokio::test]
    async fn login_failures() {
        let service = service().await;
        service.register(registration("ama")).await.unwrap();

        assert!(matches!(
            service.login(Some("ama"), None).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.login(Some("ama"), Some("wrong")).await,
            Err(DomainError::Unauthorized(_))
        ));
        assert!(matches!(
            service.login(Some("nobody"), Some("secret1")).await,
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn change_password_checks_current_and_length() {
        let service = service().await;
        let user = service.register(registration("ama")).await.unwrap().user;
        let actor = actor_for(&user);

        assert!(matches!(
            service.change_password(&actor, "bad", "nouveau1").await,
            Err(DomainError::Unauthorized(_))
        ));
        assert!(matches!(
            service.change_password(&actor, "secret1", "abc").await,
            Err(DomainError::Validation(_))
        ));
        service
            .change_password(&actor, "secret1", "nouveau1")
            .await
            .unwrap();
        service.login(Some("ama"), Some("nouveau1")).await.unwrap();
    }

    #[tokio::test]
    async fn role_updates_follow_hierarchy() {
        let repos = memory_repos().await;
        let service = IdentityService::new(repos.clone(), JwtConfig::default());
        let admin = insert_user(&repos, "admin", Role::Admin, None).await;
        let root = insert_user(&repos, "root", Role::SuperAdmin, None).await;
        let user = insert_user(&repos, "user", Role::Member, None).await;
        let admin_actor = actor_for(&admin);

        assert!(matches!(
            service.update_user_role(&admin_actor, user.id, "pasteur", None).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.update_user_role(&admin_actor, admin.id, "member", None).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.update_user_role(&admin_actor, root.id, "admin", None).await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            service.update_user_role(&admin_actor, user.id, "super_admin", None).await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            service.update_user_role(&admin_actor, 999, "berger", None).await,
            Err(DomainError::NotFound { .. })
        ));

        let role = service
            .update_user_role(&admin_actor, user.id, "berger", Some("la communication"))
            .await
            .unwrap();
        assert_eq!(role, Role::Berger);
        let stored = repos.users().find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.service_assigne.as_deref(), Some("Communication"));
    }

    #[tokio::test]
    async fn delete_rules_and_role_counts() {
        let repos = memory_repos().await;
        let service = IdentityService::new(repos.clone(), JwtConfig::default());
        let admin = insert_user(&repos, "admin", Role::Admin, None).await;
        let root = insert_user(&repos, "root", Role::SuperAdmin, None).await;
        let user = insert_user(&repos, "user", Role::Member, None).await;

        let listing = service.list_users().await.unwrap();
        assert_eq!(listing.users.len(), 3);
        assert_eq!(listing.par_role["berger"], 0);
        assert_eq!(listing.par_role["super_admin"], 1);

        let admin_actor = actor_for(&admin);
        assert!(matches!(
            service.delete_user(&admin_actor, admin.id).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.delete_user(&admin_actor, root.id).await,
            Err(DomainError::Forbidden(_))
        ));
        service.delete_user(&admin_actor, user.id).await.unwrap();
        assert!(matches!(
            service.delete_user(&admin_actor, user.id).await,
            Err(DomainError::NotFound { .. })
        ));
        service.delete_user(&actor_for(&root), admin.id).await.unwrap();
    }
}
