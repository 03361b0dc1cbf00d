//! Member counts used by dashboards and reports.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::Member;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MemberStats {
    pub total: usize,
    /// Registered on the current UTC day
    pub aujourdhui: usize,
    /// Registered within the last seven days
    pub cette_semaine: usize,
}

impl MemberStats {
    pub fn compute(members: &[Member], now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let week_ago = now - Duration::days(7);
        Self {
            total: members.len(),
            aujourdhui: members
                .iter()
                .filter(|m| m.created_at.date_naive() == today)
                .count(),
            cette_semaine: members
                .iter()
                .filter(|m| m.created_at >= week_ago)
                .count(),
        }
    }
}

/// Count members per key; blank keys are grouped under `blank_label`.
pub fn count_by<F>(members: &[Member], blank_label: &str, key: F) -> BTreeMap<String, usize>
where
    F: Fn(&Member) -> String,
{
    let mut counts = BTreeMap::new();
    for member in members {
        let k = key(member);
        let k = if k.trim().is_empty() {
            blank_label.to_string()
        } else {
            k
        };
        *counts.entry(k).or_insert(0) += 1;
    }
    counts
}

/// Largest counts first, ties broken alphabetically.
pub fn sorted_by_count(counts: &BTreeMap<String, usize>) -> Vec<(String, usize)> {
    let mut entries: Vec<(String, usize)> =
        counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn member(id: i32, quartier: &str, created_at: DateTime<Utc>) -> Member {
        Member {
            id,
            user_id: Some(1),
            nom: format!("Nom{id}"),
            prenom: "Test".into(),
            numero: "0102030405".into(),
            quartier: quartier.into(),
            service: "Communication".into(),
            created_at,
            owner: None,
        }
    }

    #[test]
    fn stats_split_today_and_week() {
        let now = Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap();
        let members = vec![
            member(1, "Cocody", now - Duration::hours(2)),
            member(2, "Yopougon", now - Duration::days(3)),
            member(3, "Cocody", now - Duration::days(30)),
        ];
        let stats = MemberStats::compute(&members, now);
        assert_eq!(
            stats,
            MemberStats {
                total: 3,
                aujourdhui: 1,
                cette_semaine: 2
            }
        );
    }

    #[test]
    fn counts_group_blank_keys_and_sort() {
        let now = Utc::now();
        let members = vec![
            member(1, "Cocody", now),
            member(2, "Yopougon", now),
            member(3, "Cocody", now),
            member(4, " ", now),
        ];
        let counts = count_by(&members, "Non spécifié", |m| m.quartier.clone());
        assert_eq!(counts.get("Cocody"), Some(&2));
        assert_eq!(counts.get("Non spécifié"), Some(&1));

        let sorted = sorted_by_count(&counts);
        assert_eq!(sorted[0], ("Cocody".to_string(), 2));
        assert_eq!(sorted[1].0, "Non spécifié");
        assert_eq!(sorted[2].0, "Yopougon");
    }
}
