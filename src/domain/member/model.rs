//! Member domain entity

use chrono::{DateTime, Utc};

use crate::domain::user::Role;

/// Account that registered a member.
#[derive(Debug, Clone)]
pub struct MemberOwner {
    pub username: String,
    pub branche: Option<String>,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct Member {
    pub id: i32,
    pub user_id: Option<i32>,
    pub nom: String,
    pub prenom: String,
    pub numero: String,
    pub quartier: String,
    pub service: String,
    pub created_at: DateTime<Utc>,
    pub owner: Option<MemberOwner>,
}

impl Member {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.nom, self.prenom)
    }

    pub fn owner_username(&self) -> Option<&str> {
        self.owner.as_ref().map(|o| o.username.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct NewMember {
    pub user_id: i32,
    pub nom: String,
    pub prenom: String,
    pub numero: String,
    pub quartier: String,
    pub service: String,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct MemberChanges {
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub numero: Option<String>,
    pub quartier: Option<String>,
    pub service: Option<String>,
}

impl MemberChanges {
    pub fn is_empty(&self) -> bool {
        self.nom.is_none()
            && self.prenom.is_none()
            && self.numero.is_none()
            && self.quartier.is_none()
            && self.service.is_none()
    }
}
