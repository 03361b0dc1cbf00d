//! Data Transfer Objects shared by several API modules

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Member, Presence, User};

/// `{success: true, message}` acknowledgement.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Church member, with the registering account when it was loaded.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MemberDto {
    pub id: i32,
    pub user_id: Option<i32>,
    pub nom: String,
    pub prenom: String,
    pub numero: String,
    pub quartier: String,
    pub service: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branche: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl From<Member> for MemberDto {
    fn from(m: Member) -> Self {
        let (username, branche, role) = match m.owner {
            Some(owner) => (Some(owner.username), owner.branche, Some(owner.role.to_string())),
            None => (None, None, None),
        };
        Self {
            id: m.id,
            user_id: m.user_id,
            nom: m.nom,
            prenom: m.prenom,
            numero: m.numero,
            quartier: m.quartier,
            service: m.service,
            created_at: m.created_at,
            username,
            branche,
            role,
        }
    }
}

pub fn members(list: Vec<Member>) -> Vec<MemberDto> {
    list.into_iter().map(MemberDto::from).collect()
}

/// Account without its password hash.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub branche: Option<String>,
    pub role: String,
    pub service_assigne: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            nom: u.nom,
            prenom: u.prenom,
            branche: u.branche,
            role: u.role.to_string(),
            service_assigne: u.service_assigne,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PresenceDto {
    pub id: i32,
    pub membre_id: i32,
    pub berger_id: i32,
    pub date: NaiveDate,
    pub present: bool,
    pub commentaire: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Presence> for PresenceDto {
    fn from(p: Presence) -> Self {
        Self {
            id: p.id,
            membre_id: p.membre_id,
            berger_id: p.berger_id,
            date: p.date,
            present: p.present,
            commentaire: p.commentaire,
            created_at: p.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MemberOwner, Role};

    #[test]
    fn member_owner_fields_are_flattened() {
        let member = Member {
            id: 4,
            user_id: Some(2),
            nom: "Kouassi".into(),
            prenom: "Awa".into(),
            numero: "0102030405".into(),
            quartier: "Cocody".into(),
            service: "Protocole".into(),
            created_at: Utc::now(),
            owner: Some(MemberOwner {
                username: "berger PO".into(),
                branche: None,
                role: Role::Berger,
            }),
        };
        let json = serde_json::to_value(MemberDto::from(member.clone())).unwrap();
        assert_eq!(json["username"], "berger PO");
        assert_eq!(json["role"], "berger");
        assert!(json.get("branche").is_none());

        let bare = serde_json::to_value(MemberDto::from(Member { owner: None, ..member })).unwrap();
        assert!(bare.get("username").is_none());
    }
}
