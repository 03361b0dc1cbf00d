//! Attendance-rate arithmetic shared by JSON and PDF reports.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::Presence;

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Percentage of `presents` over `total`, one decimal; 0 when `total` is 0.
pub fn attendance_rate(presents: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(presents as f64 * 100.0 / total as f64)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayStats {
    pub date: NaiveDate,
    pub total: usize,
    pub presents: usize,
    pub absents: usize,
    pub taux: f64,
}

impl DayStats {
    pub fn from_records<'a>(date: NaiveDate, records: impl IntoIterator<Item = &'a Presence>) -> Self {
        let (mut total, mut presents) = (0, 0);
        for record in records {
            total += 1;
            if record.present {
                presents += 1;
            }
        }
        Self {
            date,
            total,
            presents,
            absents: total - presents,
            taux: attendance_rate(presents, total),
        }
    }
}

/// Per-date statistics in ascending date order.
pub fn daily_stats(presences: &[Presence]) -> Vec<DayStats> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&Presence>> = BTreeMap::new();
    for presence in presences {
        by_date.entry(presence.date).or_default().push(presence);
    }
    by_date
        .into_iter()
        .map(|(date, records)| DayStats::from_records(date, records))
        .collect()
}

/// Highest and lowest rate among `days`; on ties the earliest date wins.
pub fn best_and_worst(days: &[DayStats]) -> Option<(&DayStats, &DayStats)> {
    let mut sorted: Vec<&DayStats> = days.iter().collect();
    sorted.sort_by_key(|d| d.date);

    let first = *sorted.first()?;
    let (mut best, mut worst) = (first, first);
    for day in sorted.into_iter().skip(1) {
        if day.taux > best.taux {
            best = day;
        }
        if day.taux < worst.taux {
            worst = day;
        }
    }
    Some((best, worst))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    fn presence(membre_id: i32, date: NaiveDate, present: bool) -> Presence {
        Presence {
            id: membre_id,
            membre_id,
            berger_id: 1,
            date,
            present,
            commentaire: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn rate_rounds_to_one_decimal() {
        assert_eq!(attendance_rate(2, 3), 66.7);
        assert_eq!(attendance_rate(1, 8), 12.5);
        assert_eq!(attendance_rate(0, 0), 0.0);
        assert_eq!(attendance_rate(5, 5), 100.0);
    }

    #[test]
    fn daily_stats_group_by_date() {
        let records = vec![
            presence(1, d(7), true),
            presence(2, d(6), true),
            presence(1, d(6), false),
            presence(3, d(6), true),
        ];
        let days = daily_stats(&records);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, d(6));
        assert_eq!((days[0].total, days[0].presents, days[0].absents), (3, 2, 1));
        assert_eq!(days[0].taux, 66.7);
        assert_eq!(days[1].taux, 100.0);
    }

    #[test]
    fn best_and_worst_prefer_earliest_on_ties() {
        let days = vec![
            DayStats::from_records(d(8), &[presence(1, d(8), true)]),
            DayStats::from_records(d(6), &[presence(1, d(6), true)]),
            DayStats::from_records(d(7), &[presence(1, d(7), false)]),
            DayStats::from_records(d(9), &[presence(1, d(9), false)]),
        ];
        let (best, worst) = best_and_worst(&days).unwrap();
        assert_eq!(best.date, d(6));
        assert_eq!(worst.date, d(7));
        assert!(best_and_worst(&[]).is_none());
    }
}
