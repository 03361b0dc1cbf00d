//! Spreadsheet exports.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{DomainError, DomainResult, Member, User};

/// Excel only detects UTF-8 when the file starts with a byte-order mark.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[derive(Serialize)]
struct MemberRow<'a> {
    #[serde(rename = "ID")]
    id: i32,
    #[serde(rename = "Nom")]
    nom: &'a str,
    #[serde(rename = "Prénom")]
    prenom: &'a str,
    #[serde(rename = "Numéro")]
    numero: &'a str,
    #[serde(rename = "Quartier")]
    quartier: &'a str,
    #[serde(rename = "Service")]
    service: &'a str,
    #[serde(rename = "Berger")]
    berger: &'a str,
    #[serde(rename = "Date création")]
    created_at: String,
}

#[derive(Serialize)]
struct UserRow<'a> {
    #[serde(rename = "ID")]
    id: i32,
    #[serde(rename = "Username")]
    username: &'a str,
    #[serde(rename = "Nom")]
    nom: &'a str,
    #[serde(rename = "Prénom")]
    prenom: &'a str,
    #[serde(rename = "Branche")]
    branche: &'a str,
    #[serde(rename = "Rôle")]
    role: &'a str,
    #[serde(rename = "Service Assigné")]
    service_assigne: &'a str,
    #[serde(rename = "Date création")]
    created_at: String,
}

fn write_rows<T: Serialize>(rows: impl IntoIterator<Item = T>) -> DomainResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| DomainError::Internal(format!("CSV serialization failed: {}", e)))?;
    }
    writer
        .into_inner()
        .map_err(|e| DomainError::Internal(format!("CSV flush failed: {}", e)))
}

pub fn members_csv(members: &[Member]) -> DomainResult<Vec<u8>> {
    write_rows(members.iter().map(|m| MemberRow {
        id: m.id,
        nom: &m.nom,
        prenom: &m.prenom,
        numero: &m.numero,
        quartier: &m.quartier,
        service: &m.service,
        berger: m.owner_username().unwrap_or_default(),
        created_at: timestamp(&m.created_at),
    }))
}

pub fn users_csv(users: &[User]) -> DomainResult<Vec<u8>> {
    write_rows(users.iter().map(|u| UserRow {
        id: u.id,
        username: &u.username,
        nom: u.nom.as_deref().unwrap_or_default(),
        prenom: u.prenom.as_deref().unwrap_or_default(),
        branche: u.branche.as_deref().unwrap_or_default(),
        role: u.role.as_str(),
        service_assigne: u.service_assigne.as_deref().unwrap_or_default(),
        created_at: timestamp(&u.created_at),
    }))
}
