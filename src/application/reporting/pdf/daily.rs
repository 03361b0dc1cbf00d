//! Attendance sheets for a single date.

use chrono::{DateTime, NaiveDate, Utc};

use super::canvas::{
    clip, rate_color, Canvas, Column, Rgb8, Weight, BLUE, DARK, GREEN, GREY, RED,
};
use super::{footer_date, safe_component, HEADER_TITLE};
use crate::application::attendance::{AdminDateView, DateSheet, Statut};
use crate::domain::presence::stats::attendance_rate;
use crate::domain::{Actor, DomainResult};
use crate::shared::time::format_date_long_fr;

const SERVICE_COLUMNS: [Column; 5] = [
    Column { title: "SERVICE", x: 55.0 },
    Column { title: "TOTAL", x: 260.0 },
    Column { title: "PRÉSENTS", x: 320.0 },
    Column { title: "ABSENTS", x: 400.0 },
    Column { title: "TAUX", x: 480.0 },
];

const ENTRY_COLUMNS: [Column; 5] = [
    Column { title: "NOM & PRÉNOM", x: 55.0 },
    Column { title: "SERVICE", x: 200.0 },
    Column { title: "QUARTIER", x: 310.0 },
    Column { title: "STATUT", x: 400.0 },
    Column { title: "PAR", x: 470.0 },
];

const SHEET_COLUMNS: [Column; 5] = [
    Column { title: "#", x: 55.0 },
    Column { title: "NOM & PRÉNOM", x: 80.0 },
    Column { title: "QUARTIER", x: 240.0 },
    Column { title: "STATUT", x: 340.0 },
    Column { title: "COMMENTAIRE", x: 420.0 },
];

fn statut_color(statut: Statut) -> Rgb8 {
    match statut {
        Statut::Present => GREEN,
        Statut::Absent => RED,
        Statut::NonMarque => GREY,
    }
}

pub fn admin_filename(date: NaiveDate) -> String {
    format!("presences_{}.pdf", date)
}

pub fn department_filename(service: &str, date: NaiveDate) -> String {
    format!("presences_{}_{}.pdf", safe_component(service), date)
}

/// Every presence recorded on one date, across departments.
pub fn render_admin(view: &AdminDateView, actor: &Actor, now: DateTime<Utc>) -> DomainResult<Vec<u8>> {
    let mut canvas = Canvas::new(&format!("Présences du {}", view.date))?;

    canvas.centered(24.0, Weight::Bold, DARK, HEADER_TITLE);
    canvas.centered(18.0, Weight::Regular, BLUE, "RAPPORT DES PRÉSENCES");
    canvas.centered(14.0, Weight::Bold, RED, &format_date_long_fr(view.date));
    canvas.gap(10.0);

    canvas.heading(12.0, GREY, "RÉSUMÉ");
    for info in [
        format!("• Présences enregistrées: {}", view.total()),
        format!("• Présents: {}", view.presents),
        format!("• Absents: {}", view.absents()),
        format!("• Taux de présence: {}%", view.taux),
        format!("• Généré par: {} ({})", actor.username, actor.role),
    ] {
        canvas.line(70.0, 10.0, Weight::Regular, DARK, &info);
    }
    canvas.gap(15.0);

    canvas.heading(12.0, GREY, "PAR SERVICE");
    canvas.table_header(&SERVICE_COLUMNS, 10.0);
    for (index, row) in view.par_service.iter().enumerate() {
        canvas.table_row(&SERVICE_COLUMNS, 10.0, index);
        let y = canvas.y;
        canvas.text_at(55.0, y, 9.0, Weight::Regular, DARK, &clip(&row.service, 200.0, 9.0, Weight::Regular));
        canvas.text_at(260.0, y, 9.0, Weight::Regular, DARK, &row.total.to_string());
        canvas.text_at(320.0, y, 9.0, Weight::Regular, DARK, &row.presents.to_string());
        canvas.text_at(400.0, y, 9.0, Weight::Regular, DARK, &row.absents.to_string());
        canvas.text_at(480.0, y, 9.0, Weight::Bold, rate_color(row.taux as f64), &format!("{}%", row.taux));
        canvas.gap(22.0);
    }
    canvas.gap(15.0);

    canvas.heading(12.0, GREY, "DÉTAIL");
    canvas.table_header(&ENTRY_COLUMNS, 10.0);
    for (index, entry) in view.entries.iter().enumerate() {
        canvas.table_row(&ENTRY_COLUMNS, 10.0, index);
        let y = canvas.y;
        let statut = Statut::of(Some(&entry.presence));
        canvas.text_at(55.0, y, 9.0, Weight::Regular, DARK, &clip(&entry.member.full_name(), 140.0, 9.0, Weight::Regular));
        canvas.text_at(200.0, y, 9.0, Weight::Regular, DARK, &clip(&entry.member.service, 105.0, 9.0, Weight::Regular));
        canvas.text_at(310.0, y, 9.0, Weight::Regular, DARK, &clip(&entry.member.quartier, 85.0, 9.0, Weight::Regular));
        canvas.text_at(400.0, y, 9.0, Weight::Bold, statut_color(statut), statut.label());
        canvas.text_at(
            470.0,
            y,
            9.0,
            Weight::Regular,
            GREY,
            &clip(entry.recorded_by.as_deref().unwrap_or("-"), 80.0, 9.0, Weight::Regular),
        );
        canvas.gap(20.0);
    }

    let date = footer_date(now);
    canvas.finish(|page, total| {
        format!("Rapport des présences • Mega-Data Église • Page {}/{} • {}", page, total, date)
    })
}

/// One department's members with their statut for the date.
pub fn render_department(sheet: &DateSheet, actor: &Actor, now: DateTime<Utc>) -> DomainResult<Vec<u8>> {
    let mut canvas = Canvas::new(&format!("Présences {} du {}", sheet.service, sheet.date))?;

    canvas.centered(24.0, Weight::Bold, DARK, HEADER_TITLE);
    canvas.centered(18.0, Weight::Regular, BLUE, "FEUILLE DE PRÉSENCE");
    canvas.centered(20.0, Weight::Bold, RED, &sheet.service.to_uppercase());
    canvas.centered(12.0, Weight::Regular, DARK, &format_date_long_fr(sheet.date));
    canvas.gap(10.0);

    let presents = sheet.count(Statut::Present);
    let marked = sheet.total_presences();
    canvas.heading(10.0, GREY, "INFORMATIONS:");
    for info in [
        format!("• Berger: {} ({})", actor.display_name(), actor.username),
        format!("• Membres du service: {}", sheet.membres.len()),
        format!("• Présents: {}", presents),
        format!("• Absents: {}", sheet.count(Statut::Absent)),
        format!("• Non marqués: {}", sheet.count(Statut::NonMarque)),
        format!("• Taux de présence: {}%", attendance_rate(presents, marked)),
    ] {
        canvas.line(70.0, 10.0, Weight::Regular, GREY, &info);
    }
    canvas.gap(15.0);

    canvas.table_header(&SHEET_COLUMNS, 10.0);
    for (index, row) in sheet.membres.iter().enumerate() {
        canvas.table_row(&SHEET_COLUMNS, 10.0, index);
        let y = canvas.y;
        let statut = row.statut();
        let comment = row
            .presence
            .as_ref()
            .and_then(|p| p.commentaire.as_deref())
            .unwrap_or("");
        canvas.text_at(55.0, y, 9.0, Weight::Regular, DARK, &(index + 1).to_string());
        canvas.text_at(80.0, y, 9.0, Weight::Regular, DARK, &clip(&row.member.full_name(), 150.0, 9.0, Weight::Regular));
        canvas.text_at(240.0, y, 9.0, Weight::Regular, DARK, &clip(&row.member.quartier, 95.0, 9.0, Weight::Regular));
        canvas.text_at(340.0, y, 9.0, Weight::Bold, statut_color(statut), statut.label());
        canvas.text_at(420.0, y, 9.0, Weight::Regular, GREY, &clip(comment, 130.0, 9.0, Weight::Regular));
        canvas.gap(20.0);
    }

    let date = footer_date(now);
    canvas.finish(|page, total| {
        format!("Document généré le {} • Mega-Data Église • Page {}/{}", date, page, total)
    })
}
