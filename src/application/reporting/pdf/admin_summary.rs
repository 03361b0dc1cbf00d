//! One-page overview for administrators: accounts, departments and recent
//! attendance.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use super::canvas::{rate_color, Canvas, Column, Weight, BLUE, DARK, GREY, LIGHT_GREY, RED};
use super::{footer_date, HEADER_TITLE};
use crate::domain::member::sorted_by_count;
use crate::domain::presence::attendance_rate;
use crate::domain::{Actor, DayStats, DomainResult};
use crate::shared::time::{format_date_fr, format_datetime_long_fr};

const ATTENDANCE_COLUMNS: [Column; 5] = [
    Column { title: "DATE", x: 55.0 },
    Column { title: "TOTAL", x: 180.0 },
    Column { title: "PRÉSENTS", x: 260.0 },
    Column { title: "ABSENTS", x: 350.0 },
    Column { title: "TAUX", x: 440.0 },
];

/// Figures gathered from the services before rendering.
#[derive(Debug, Clone)]
pub struct AdminOverview {
    pub users_par_role: BTreeMap<&'static str, usize>,
    pub total_users: usize,
    pub members_par_service: BTreeMap<String, usize>,
    pub total_members: usize,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: Vec<DayStats>,
}

pub fn filename(now: DateTime<Utc>) -> String {
    format!("rapport_admin_{}.pdf", now.format("%Y-%m-%d"))
}

pub fn render(overview: &AdminOverview, actor: &Actor, now: DateTime<Utc>) -> DomainResult<Vec<u8>> {
    let mut canvas = Canvas::new("Rapport administratif")?;

    canvas.centered(24.0, Weight::Bold, DARK, HEADER_TITLE);
    canvas.centered(18.0, Weight::Regular, BLUE, "RAPPORT ADMINISTRATIF");
    canvas.centered(12.0, Weight::Regular, GREY, "Mega-Data Église - Gestion des membres");
    canvas.gap(10.0);

    canvas.heading(10.0, GREY, "INFORMATIONS:");
    for info in [
        format!("• Généré par: {} ({})", actor.display_name(), actor.username),
        format!("• Rôle: {}", actor.role),
        format!("• Date: {}", format_datetime_long_fr(now)),
    ] {
        canvas.line(70.0, 10.0, Weight::Regular, GREY, &info);
    }
    canvas.gap(15.0);

    canvas.heading(12.0, BLUE, "UTILISATEURS");
    canvas.line(70.0, 11.0, Weight::Bold, DARK, &format!("• Total: {}", overview.total_users));
    for (role, count) in &overview.users_par_role {
        canvas.line(70.0, 10.0, Weight::Regular, DARK, &format!("• {}: {}", role, count));
    }
    canvas.gap(15.0);

    canvas.heading(12.0, BLUE, "MEMBRES PAR SERVICE");
    canvas.line(70.0, 11.0, Weight::Bold, DARK, &format!("• Total: {}", overview.total_members));
    for (service, count) in sorted_by_count(&overview.members_par_service) {
        canvas.line(70.0, 10.0, Weight::Regular, DARK, &format!("• {}: {}", service, count));
    }
    canvas.gap(15.0);

    canvas.heading(
        12.0,
        BLUE,
        &format!(
            "PRÉSENCES DU {} AU {}",
            format_date_fr(overview.start),
            format_date_fr(overview.end)
        ),
    );
    if overview.days.is_empty() {
        canvas.line(70.0, 11.0, Weight::Regular, LIGHT_GREY, "Aucune présence enregistrée sur la période.");
    } else {
        let presents: usize = overview.days.iter().map(|d| d.presents).sum();
        let total: usize = overview.days.iter().map(|d| d.total).sum();
        canvas.line(
            70.0,
            10.0,
            Weight::Regular,
            DARK,
            &format!("• Jours avec présences: {}", overview.days.len()),
        );
        canvas.line(
            70.0,
            10.0,
            Weight::Regular,
            DARK,
            &format!("• Taux global: {}%", attendance_rate(presents, total)),
        );
        canvas.gap(8.0);
        canvas.table_header(&ATTENDANCE_COLUMNS, 10.0);
        for (index, day) in overview.days.iter().rev().enumerate() {
            canvas.table_row(&ATTENDANCE_COLUMNS, 10.0, index);
            let y = canvas.y;
            canvas.text_at(55.0, y, 9.0, Weight::Regular, DARK, &format_date_fr(day.date));
            canvas.text_at(180.0, y, 9.0, Weight::Regular, DARK, &day.total.to_string());
            canvas.text_at(260.0, y, 9.0, Weight::Regular, DARK, &day.presents.to_string());
            canvas.text_at(350.0, y, 9.0, Weight::Regular, RED, &day.absents.to_string());
            canvas.text_at(440.0, y, 9.0, Weight::Bold, rate_color(day.taux), &format!("{}%", day.taux));
            canvas.gap(22.0);
        }
    }

    let date = footer_date(now);
    canvas.finish(|page, total| {
        format!("Rapport administratif • Mega-Data Église • Page {}/{} • {}", page, total, date)
    })
}
