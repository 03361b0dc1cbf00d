use tracing::{info, warn};

use crate::config::{SeedAccount, SeedConfig};
use crate::domain::department::{CanonicalDepartment, DEPARTMENTS};
use crate::domain::{DomainError, DomainResult, NewUser, RepositoryProvider, Role};
use crate::infrastructure::crypto::password::hash_password;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
}

/// Insert the ten departments that are not stored yet. Returns how many
/// were created.
pub async fn seed_departments(repos: &dyn RepositoryProvider) -> DomainResult<usize> {
    let mut created = 0;
    for department in DEPARTMENTS.iter() {
        if repos
            .departments()
            .insert_if_absent(department.nom, department.nom_court)
            .await?
        {
            created += 1;
        }
    }
    if created > 0 {
        info!(created, "Departments seeded");
    }
    Ok(created)
}

/// `berger COM`, `berger 28:19`; departments whose code is just their
/// upper-cased name use the name (`berger suivi`).
fn berger_username(department: &CanonicalDepartment) -> String {
    if department.nom.to_uppercase() == department.nom_court {
        format!("berger {}", department.nom.to_lowercase())
    } else {
        format!("berger {}", department.nom_court)
    }
}

fn berger_account(department: &CanonicalDepartment, config: &SeedConfig) -> SeedAccount {
    let nom = if department.nom.to_uppercase() == department.nom_court {
        department.nom
    } else {
        department.nom_court
    };
    SeedAccount {
        username: berger_username(department),
        password: config.berger_password(department.nom_court),
        nom: Some(nom.to_string()),
        prenom: Some("Berger".to_string()),
        branche: Some(department.nom.to_string()),
    }
}

enum Outcome {
    Created,
    Updated,
    Unchanged,
}

async fn ensure_account(
    repos: &dyn RepositoryProvider,
    account: &SeedAccount,
    role: Role,
    service_assigne: Option<&str>,
) -> DomainResult<Outcome> {
    let users = repos.users();
    if let Some(existing) = users.find_by_username(&account.username).await? {
        if existing.role == role && existing.service_assigne.as_deref() == service_assigne {
            return Ok(Outcome::Unchanged);
        }
        users
            .update_role(existing.id, role, service_assigne.map(str::to_string))
            .await?;
        info!(
            username = %account.username,
            from_role = %existing.role,
            to_role = %role,
            service = ?service_assigne,
            "Seeded account corrected"
        );
        return Ok(Outcome::Updated);
    }

    let password_hash = hash_password(&account.password)
        .map_err(|e| DomainError::Internal(format!("Password hashing failed: {}", e)))?;
    users
        .create(NewUser {
            username: account.username.clone(),
            password_hash,
            nom: account.nom.clone(),
            prenom: account.prenom.clone(),
            branche: account.branche.clone(),
            role,
            service_assigne: service_assigne.map(str::to_string),
        })
        .await?;
    info!(username = %account.username, role = %role, service = ?service_assigne, "Seeded account created");
    Ok(Outcome::Created)
}

/// Make sure the configured super administrators and one berger per
/// department exist. Existing accounts keep their password; only role and
/// department are corrected.
pub async fn seed_accounts(repos: &dyn RepositoryProvider, config: &SeedConfig) -> DomainResult<SeedReport> {
    let mut report = SeedReport::default();
    let mut tally = |outcome: Outcome| match outcome {
        Outcome::Created => report.created += 1,
        Outcome::Updated => report.updated += 1,
        Outcome::Unchanged => report.unchanged += 1,
    };

    for account in &config.super_admins {
        if account.password == "Admin12345" {
            warn!(username = %account.username, "Super admin uses the default password");
        }
        tally(ensure_account(repos, account, Role::SuperAdmin, None).await?);
    }
    for department in DEPARTMENTS.iter() {
        let account = berger_account(department, config);
        tally(ensure_account(repos, &account, Role::Berger, Some(department.nom)).await?);
    }

    info!(
        created = report.created,
        updated = report.updated,
        unchanged = report.unchanged,
        "Account seeding done"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::crypto::password::verify_password;
    use crate::test_support::{insert_user, memory_repos};

    #[test]
    fn berger_usernames() {
        let names: Vec<String> = DEPARTMENTS.iter().map(berger_username).collect();
        assert_eq!(
            names,
            [
                "berger GLA",
                "berger VE",
                "berger COM",
                "berger 28:19",
                "berger suivi",
                "berger SO",
                "berger PO",
                "berger LO",
                "berger SB",
                "berger GC",
            ]
        );
    }

    #[tokio::test]
    async fn departments_are_seeded_once() {
        let repos = memory_repos().await;
        assert_eq!(seed_departments(repos.as_ref()).await.unwrap(), 10);
        assert_eq!(seed_departments(repos.as_ref()).await.unwrap(), 0);
        assert_eq!(repos.departments().list().await.unwrap().len(), 10);
    }

    #[tokio::test]
    async fn accounts_are_created_then_corrected() {
        let repos = memory_repos().await;
        // A pre-existing berger account with a stale department and role.
        let stale = insert_user(&repos, "berger PO", Role::Member, Some("protocol")).await;

        let config = SeedConfig {
            super_admins: vec![SeedAccount {
                username: "root".into(),
                password: "motdepasse".into(),
                nom: None,
                prenom: None,
                branche: None,
            }],
            ..SeedConfig::default()
        };
        let report = seed_accounts(repos.as_ref(), &config).await.unwrap();
        assert_eq!(report, SeedReport { created: 10, updated: 1, unchanged: 0 });

        let po = repos.users().find_by_id(stale.id).await.unwrap().unwrap();
        assert_eq!(po.role, Role::Berger);
        assert_eq!(po.service_assigne.as_deref(), Some("Protocole"));
        // Password untouched.
        assert!(verify_password(crate::test_support::TEST_PASSWORD, &po.password_hash).unwrap());

        let com = repos.users().find_by_username("berger COM").await.unwrap().unwrap();
        assert!(verify_password("COM12345", &com.password_hash).unwrap());
        let vingt = repos.users().find_by_username("berger 28:19").await.unwrap().unwrap();
        assert!(verify_password("281912345", &vingt.password_hash).unwrap());

        let again = seed_accounts(repos.as_ref(), &config).await.unwrap();
        assert_eq!(again, SeedReport { created: 0, updated: 0, unchanged: 11 });
    }
}
