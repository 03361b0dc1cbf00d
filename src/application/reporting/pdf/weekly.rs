//! Attendance report over a period, one row per recorded day.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use super::canvas::{rate_color, Canvas, Column, Weight, BLUE, DARK, GREEN, GREY, MARGIN, RED};
use super::{footer_date, safe_component, HEADER_TITLE};
use crate::application::attendance::WeeklyReport;
use crate::domain::presence::best_and_worst;
use crate::domain::{Actor, DayStats, DomainResult};
use crate::shared::time::{format_date_long_fr, format_day_month, weekday_short_fr};

const COLUMNS: [Column; 6] = [
    Column { title: "DATE", x: 55.0 },
    Column { title: "JOUR", x: 110.0 },
    Column { title: "TOTAL", x: 200.0 },
    Column { title: "PRÉSENTS", x: 260.0 },
    Column { title: "ABSENTS", x: 340.0 },
    Column { title: "TAUX", x: 420.0 },
];

const DETAIL_SAMPLE: usize = 5;

pub fn filename(start: NaiveDate, end: NaiveDate, service: Option<&str>) -> String {
    match service {
        Some(service) => format!(
            "presences_hebdomadaire_{}_{}_{}.pdf",
            start,
            end,
            safe_component(service)
        ),
        None => format!("presences_hebdomadaire_{}_{}.pdf", start, end),
    }
}

fn day_label(day: &DayStats) -> String {
    format!("{} ({}%)", format_date_long_fr(day.date), day.taux)
}

pub fn render(report: &WeeklyReport, actor: &Actor, now: DateTime<Utc>) -> DomainResult<Vec<u8>> {
    let mut canvas = Canvas::new(&format!(
        "Rapport hebdomadaire des présences - {} au {}",
        report.start, report.end
    ))?;

    canvas.centered(24.0, Weight::Bold, DARK, HEADER_TITLE);
    canvas.centered(18.0, Weight::Regular, BLUE, "RAPPORT HEBDOMADAIRE DES PRÉSENCES");
    canvas.gap(6.0);
    canvas.centered(
        13.0,
        Weight::Bold,
        RED,
        &format!(
            "Période: du {} au {}",
            format_date_long_fr(report.start),
            format_date_long_fr(report.end)
        ),
    );
    if let Some(service) = &report.service {
        canvas.centered(14.0, Weight::Regular, GREEN, &format!("Service: {}", service));
    }
    canvas.gap(10.0);

    let days: Vec<DayStats> = report.days.iter().map(|d| d.stats.clone()).collect();
    canvas.heading(12.0, GREY, "RÉSUMÉ HEBDOMADAIRE");
    let mut summary = vec![
        format!("• Période: {} au {}", report.start, report.end),
        format!("• Nombre de jours avec données: {}", report.days.len()),
        format!("• Membres uniques: {}", report.unique_members()),
        format!("• Taux de présence moyen: {}%", report.average_rate()),
    ];
    if let Some((best, worst)) = best_and_worst(&days) {
        summary.push(format!("• Meilleur jour: {}", day_label(best)));
        summary.push(format!("• Pire jour: {}", day_label(worst)));
    }
    summary.push(format!("• Généré par: {} ({})", actor.username, actor.role));
    summary.push(format!("• Date de génération: {}", footer_date(now)));
    for line in &summary {
        canvas.line(70.0, 10.0, Weight::Regular, DARK, line);
    }
    canvas.gap(15.0);

    canvas.heading(12.0, GREY, "STATISTIQUES PAR JOUR");
    canvas.table_header(&COLUMNS, 10.0);
    for (index, day) in days.iter().enumerate() {
        canvas.table_row(&COLUMNS, 10.0, index);
        let y = canvas.y;
        let cells = [
            format_day_month(day.date),
            weekday_short_fr(day.date.weekday()).to_string(),
            day.total.to_string(),
            day.presents.to_string(),
            day.absents.to_string(),
        ];
        for (column, cell) in COLUMNS.iter().zip(cells.iter()) {
            canvas.text_at(column.x, y, 9.0, Weight::Regular, DARK, cell);
        }
        canvas.text_at(420.0, y, 9.0, Weight::Bold, rate_color(day.taux), &format!("{}%", day.taux));
        canvas.gap(22.0);
    }
    canvas.gap(15.0);

    canvas.heading(12.0, GREY, "DÉTAIL DES PRÉSENCES PAR JOUR");
    for day in &report.days {
        canvas.ensure_space(40.0);
        canvas.line(
            MARGIN,
            11.0,
            Weight::Bold,
            BLUE,
            &format!(
                "{} - {}/{} présents ({}%)",
                format_date_long_fr(day.stats.date),
                day.stats.presents,
                day.stats.total,
                day.stats.taux
            ),
        );
        for (idx, entry) in day.entries.iter().take(DETAIL_SAMPLE).enumerate() {
            let status = if entry.presence.present { "Présent" } else { "Absent" };
            canvas.line(
                MARGIN + 15.0,
                9.0,
                Weight::Regular,
                DARK,
                &format!("{}. {} - {}", idx + 1, entry.member.full_name(), status),
            );
        }
        if day.entries.len() > DETAIL_SAMPLE {
            canvas.line(
                MARGIN + 15.0,
                9.0,
                Weight::Regular,
                GREY,
                &format!("... et {} autres membres", day.entries.len() - DETAIL_SAMPLE),
            );
        }
        canvas.gap(8.0);
    }

    let date = footer_date(now);
    canvas.finish(|page, total| {
        format!(
            "Document hebdomadaire • Mega-Data Église • Page {}/{} • {}",
            page, total, date
        )
    })
}
