//! Date helpers: ISO parsing and French formatting for reports.

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc, Weekday};

use super::types::{DomainError, DomainResult};

const MONTHS: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

pub fn weekday_fr(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "lundi",
        Weekday::Tue => "mardi",
        Weekday::Wed => "mercredi",
        Weekday::Thu => "jeudi",
        Weekday::Fri => "vendredi",
        Weekday::Sat => "samedi",
        Weekday::Sun => "dimanche",
    }
}

pub fn weekday_short_fr(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "lun.",
        Weekday::Tue => "mar.",
        Weekday::Wed => "mer.",
        Weekday::Thu => "jeu.",
        Weekday::Fri => "ven.",
        Weekday::Sat => "sam.",
        Weekday::Sun => "dim.",
    }
}

fn month_fr(month: u32) -> &'static str {
    MONTHS
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

/// `lundi 6 janvier 2025`
pub fn format_date_long_fr(date: NaiveDate) -> String {
    format!(
        "{} {} {} {}",
        weekday_fr(date.weekday()),
        date.day(),
        month_fr(date.month()),
        date.year()
    )
}

/// `06/01/2025`
pub fn format_date_fr(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// `06/01`
pub fn format_day_month(date: NaiveDate) -> String {
    date.format("%d/%m").to_string()
}

/// `lundi 6 janvier 2025 à 14:05`
pub fn format_datetime_long_fr(at: DateTime<Utc>) -> String {
    format!(
        "{} à {:02}:{:02}",
        format_date_long_fr(at.date_naive()),
        at.hour(),
        at.minute()
    )
}

/// Parse a `YYYY-MM-DD` date coming from a path or query parameter.
///
/// The year must be four unsigned digits.
pub fn parse_iso_date(raw: &str) -> DomainResult<NaiveDate> {
    let invalid = || {
        DomainError::Validation(format!(
            "Date invalide: {} (format attendu AAAA-MM-JJ)",
            raw
        ))
    };
    let trimmed = raw.trim();
    let shape_ok = trimmed.len() == 10
        && trimmed.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| invalid())
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn long_french_dates() {
        assert_eq!(format_date_long_fr(d(2025, 1, 6)), "lundi 6 janvier 2025");
        assert_eq!(format_date_long_fr(d(2024, 8, 15)), "jeudi 15 août 2024");
        assert_eq!(format_date_long_fr(d(2023, 12, 31)), "dimanche 31 décembre 2023");
    }

    #[test]
    fn short_french_dates() {
        assert_eq!(format_date_fr(d(2025, 1, 6)), "06/01/2025");
        assert_eq!(format_day_month(d(2025, 1, 6)), "06/01");
        assert_eq!(weekday_short_fr(d(2025, 1, 11).weekday()), "sam.");
    }

    #[test]
    fn datetime_includes_time_of_day() {
        let at = Utc.with_ymd_and_hms(2025, 3, 2, 9, 5, 0).unwrap();
        assert_eq!(format_datetime_long_fr(at), "dimanche 2 mars 2025 à 09:05");
    }

    #[test]
    fn parses_iso_dates_only() {
        assert_eq!(parse_iso_date("2025-01-06").unwrap(), d(2025, 1, 6));
        assert!(matches!(
            parse_iso_date("06/01/2025"),
            Err(DomainError::Validation(_))
        ));
        assert!(parse_iso_date("2025-02-30").is_err());
    }

    #[test]
    fn rejects_signed_and_extended_years() {
        for raw in ["-262143-01-05", "+2025-01-06", "12025-01-06", "2025-1-6", "２０２５-01-06"] {
            assert!(
                matches!(parse_iso_date(raw), Err(DomainError::Validation(_))),
                "{raw} should be rejected"
            );
        }
        assert_eq!(parse_iso_date(" 0001-01-01 ").unwrap(), d(1, 1, 1));
    }
}
