use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::domain::department::normalize_service_name;
use crate::domain::member::count_by;
use crate::domain::{DomainResult, MemberChanges, RepositoryProvider, Role};

#[derive(Debug, Default, Clone)]
pub struct NormalizationReport {
    pub members_updated: usize,
    pub users_updated: usize,
    /// Member count per department after the rewrite
    pub par_service: BTreeMap<String, usize>,
}

/// Rewrite every stored member department and berger assignment to its
/// canonical name.
pub async fn normalize_stored_services(repos: &dyn RepositoryProvider) -> DomainResult<NormalizationReport> {
    let mut report = NormalizationReport::default();

    for member in repos.members().list().await? {
        let Some(canonical) = normalize_service_name(Some(&member.service)) else {
            continue;
        };
        if canonical != member.service {
            info!(member_id = member.id, from = %member.service, to = %canonical, "Member department normalized");
            repos
                .members()
                .update(
                    member.id,
                    MemberChanges {
                        service: Some(canonical),
                        ..MemberChanges::default()
                    },
                )
                .await?;
            report.members_updated += 1;
        }
    }

    for user in repos.users().list().await? {
        let Some(current) = user.service_assigne.as_deref() else {
            continue;
        };
        let canonical = normalize_service_name(Some(current));
        if canonical.as_deref() != Some(current) {
            info!(user_id = user.id, from = %current, to = ?canonical, "Assigned department normalized");
            repos.users().update_role(user.id, user.role, canonical).await?;
            report.users_updated += 1;
        }
    }

    let members = repos.members().list().await?;
    report.par_service = count_by(&members, "Non spécifié", |m| m.service.clone());
    info!(
        members_updated = report.members_updated,
        users_updated = report.users_updated,
        "Department names normalized"
    );
    Ok(report)
}

/// Log berger assignments and member counts per department.
pub async fn log_diagnostics(repos: &dyn RepositoryProvider) -> DomainResult<()> {
    let bergers = repos.users().list_by_role(Role::Berger).await?;
    info!(count = bergers.len(), "Berger accounts");
    for berger in &bergers {
        match berger.service_assigne.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(service) => info!(username = %berger.username, service, "Berger"),
            None => warn!(username = %berger.username, "Berger without assigned department"),
        }
    }

    let members = repos.members().list().await?;
    let par_service = count_by(&members, "Non spécifié", |m| m.service.clone());
    info!(total = members.len(), "Members");
    for (service, count) in &par_service {
        info!(service = %service, count, "Members per department");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{insert_member, insert_user, memory_repos};

    #[tokio::test]
    async fn rewrites_members_and_assignments() {
        let repos = memory_repos().await;
        let berger = insert_user(&repos, "berger COM", Role::Berger, Some("La communication")).await;
        let admin = insert_user(&repos, "admin", Role::Admin, None).await;
        insert_member(&repos, &admin, "Kouassi", "COM").await;
        insert_member(&repos, &admin, "Yao", "communication ").await;
        insert_member(&repos, &admin, "Koffi", "2819").await;
        insert_member(&repos, &admin, "Bamba", "Chorale").await;

        let report = normalize_stored_services(repos.as_ref()).await.unwrap();
        assert_eq!(report.members_updated, 3);
        assert_eq!(report.users_updated, 1);
        assert_eq!(report.par_service.get("Communication"), Some(&2));
        assert_eq!(report.par_service.get("28:19"), Some(&1));
        assert_eq!(report.par_service.get("Chorale"), Some(&1));

        let berger = repos.users().find_by_id(berger.id).await.unwrap().unwrap();
        assert_eq!(berger.role, Role::Berger);
        assert_eq!(berger.service_assigne.as_deref(), Some("Communication"));

        let again = normalize_stored_services(repos.as_ref()).await.unwrap();
        assert_eq!(again.members_updated, 0);
        assert_eq!(again.users_updated, 0);
    }

    #[tokio::test]
    async fn diagnostics_run_on_empty_and_filled_stores() {
        let repos = memory_repos().await;
        log_diagnostics(repos.as_ref()).await.unwrap();
        insert_user(&repos, "berger sans service", Role::Berger, None).await;
        log_diagnostics(repos.as_ref()).await.unwrap();
    }
}
