//! Department member list handed to bergers.

use chrono::{DateTime, Utc};

use super::canvas::{clip, Canvas, Column, Weight, BLUE, DARK, GREY, LIGHT_GREY, MARGIN, RED};
use super::{footer_date, safe_component, HEADER_TITLE};
use crate::domain::member::stats::{count_by, sorted_by_count, MemberStats};
use crate::domain::{Actor, DomainResult, Member};
use crate::shared::time::{format_date_fr, format_datetime_long_fr};

const COLUMNS: [Column; 5] = [
    Column { title: "#", x: 55.0 },
    Column { title: "NOM & PRÉNOM", x: 80.0 },
    Column { title: "TÉLÉPHONE", x: 220.0 },
    Column { title: "QUARTIER", x: 320.0 },
    Column { title: "DATE INSCRIPTION", x: 420.0 },
];

fn plural(count: usize) -> &'static str {
    if count > 1 {
        "s"
    } else {
        ""
    }
}

/// `membres_<service>_<date>.pdf` with every non-alphanumeric character of
/// the service replaced by `_`.
pub fn filename(service: &str, now: DateTime<Utc>) -> String {
    format!("membres_{}_{}.pdf", safe_component(service), now.format("%Y-%m-%d"))
}

pub fn render(service: &str, actor: &Actor, members: &[Member], now: DateTime<Utc>) -> DomainResult<Vec<u8>> {
    let mut canvas = Canvas::new(&format!("Liste des membres - {}", service))?;

    canvas.centered(24.0, Weight::Bold, DARK, HEADER_TITLE);
    canvas.centered(18.0, Weight::Regular, BLUE, "LISTE DES MEMBRES DU SERVICE");
    canvas.centered(20.0, Weight::Bold, RED, &service.to_uppercase());
    canvas.gap(10.0);

    canvas.heading(10.0, GREY, "INFORMATIONS:");
    for info in [
        format!("• Berger responsable: {}", actor.display_name()),
        format!("• Identifiant: {}", actor.username),
        format!("• Rôle: {}", actor.role),
        format!("• Date de génération: {}", format_datetime_long_fr(now)),
        format!("• Total des membres: {}", members.len()),
    ] {
        canvas.line(70.0, 10.0, Weight::Regular, GREY, &info);
    }
    canvas.gap(20.0);

    if members.is_empty() {
        canvas.centered(16.0, Weight::Bold, LIGHT_GREY, "AUCUN MEMBRE DANS CE SERVICE");
        canvas.centered(
            12.0,
            Weight::Regular,
            LIGHT_GREY,
            "Le service ne contient pas encore de membres enregistrés.",
        );
    } else {
        canvas.table_header(&COLUMNS, 11.0);
        for (index, member) in members.iter().enumerate() {
            canvas.table_row(&COLUMNS, 11.0, index);
            let y = canvas.y;
            let cells = [
                (index + 1).to_string(),
                clip(&member.full_name(), 130.0, 10.0, Weight::Regular),
                clip(&member.numero, 90.0, 10.0, Weight::Regular),
                clip(&member.quartier, 90.0, 10.0, Weight::Regular),
                format_date_fr(member.created_at.date_naive()),
            ];
            for (column, cell) in COLUMNS.iter().zip(cells.iter()) {
                canvas.text_at(column.x, y, 10.0, Weight::Regular, DARK, cell);
            }
            canvas.gap(22.0);
        }

        let stats = MemberStats::compute(members, now);
        canvas.gap(20.0);
        canvas.ensure_space(140.0);
        canvas.heading(12.0, BLUE, "STATISTIQUES:");
        canvas.line(70.0, 11.0, Weight::Regular, DARK, &format!("• Total: {} membres", stats.total));
        canvas.line(70.0, 11.0, Weight::Regular, DARK, &format!("• Cette semaine: {}", stats.cette_semaine));
        canvas.line(70.0, 11.0, Weight::Regular, DARK, &format!("• Aujourd'hui: {}", stats.aujourdhui));

        canvas.gap(10.0);
        canvas.line(MARGIN, 11.0, Weight::Bold, BLUE, "Répartition par quartier:");
        let par_quartier = count_by(members, "Non spécifié", |m| m.quartier.clone());
        for (quartier, count) in sorted_by_count(&par_quartier) {
            let pourcentage = count as f64 * 100.0 / stats.total as f64;
            canvas.line(
                70.0,
                10.0,
                Weight::Regular,
                DARK,
                &format!("• {}: {} membre{} ({:.1}%)", quartier, count, plural(count), pourcentage),
            );
        }
    }

    let date = footer_date(now);
    canvas.finish(|page, total| {
        format!("Document généré le {} • Mega-Data Église • Page {}/{}", date, page, total)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use chrono::TimeZone;

    fn actor() -> Actor {
        Actor {
            id: 3,
            username: "berger SO".into(),
            nom: Some("SO".into()),
            prenom: Some("Berger".into()),
            role: Role::Berger,
            service_assigne: Some("Service d'ordre".into()),
        }
    }

    fn member(id: i32, quartier: &str) -> Member {
        Member {
            id,
            user_id: Some(3),
            nom: format!("Nom{id}"),
            prenom: "Prénom".into(),
            numero: "0102030405".into(),
            quartier: quartier.into(),
            service: "Service d'ordre".into(),
            created_at: Utc::now(),
            owner: None,
        }
    }

    #[test]
    fn filename_replaces_punctuation() {
        let now = Utc.with_ymd_and_hms(2025, 3, 9, 10, 0, 0).unwrap();
        assert_eq!(
            filename("Service d'ordre", now),
            "membres_Service_d_ordre_2025-03-09.pdf"
        );
        assert_eq!(filename("28:19", now), "membres_28_19_2025-03-09.pdf");
    }

    #[test]
    fn renders_empty_and_multi_page_lists() {
        let empty = render("Service d'ordre", &actor(), &[], Utc::now()).unwrap();
        assert!(empty.starts_with(b"%PDF"));

        let members: Vec<Member> = (1..=60)
            .map(|i| member(i, if i % 3 == 0 { "Cocody" } else { "Yopougon" }))
            .collect();
        let bytes = render("Service d'ordre", &actor(), &members, Utc::now()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > empty.len());
    }
}
