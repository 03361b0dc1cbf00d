//! User domain entity

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::domain::DomainError;

/// Authority level, from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Member,
    Berger,
    Admin,
    SuperAdmin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Member, Role::Berger, Role::Admin, Role::SuperAdmin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Berger => "berger",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }

    pub fn rank(&self) -> u8 {
        match self {
            Self::Member => 1,
            Self::Berger => 2,
            Self::Admin => 3,
            Self::SuperAdmin => 4,
        }
    }

    /// Whether a caller holding `self` passes a gate requiring `required`.
    pub fn satisfies(&self, required: Role) -> bool {
        match required {
            Role::SuperAdmin => *self == Role::SuperAdmin,
            _ => self.rank() >= required.rank(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.satisfies(Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "member" => Ok(Self::Member),
            "berger" => Ok(Self::Berger),
            "admin" => Ok(Self::Admin),
            "super_admin" => Ok(Self::SuperAdmin),
            _ => Err(DomainError::Validation(
                "Rôle invalide. Les rôles valides sont: member, berger, admin, super_admin".into(),
            )),
        }
    }
}

/// Registered account
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub branche: Option<String>,
    pub role: Role,
    /// Department a berger is restricted to
    pub service_assigne: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.nom.as_deref().unwrap_or_default(),
            self.prenom.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub branche: Option<String>,
    pub role: Role,
    pub service_assigne: Option<String>,
}

/// The authenticated caller of an operation, as carried by its token.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: i32,
    pub username: String,
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub role: Role,
    pub service_assigne: Option<String>,
}

impl Actor {
    pub fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.nom.as_deref().unwrap_or_default(),
            self.prenom.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }

    /// Department restriction of a berger; `None` for other roles.
    pub fn berger_department(&self) -> Option<&str> {
        match self.role {
            Role::Berger => self.service_assigne.as_deref().filter(|s| !s.trim().is_empty()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_hierarchy() {
        assert!(Role::SuperAdmin.satisfies(Role::Admin));
        assert!(Role::Admin.satisfies(Role::Berger));
        assert!(Role::Berger.satisfies(Role::Berger));
        assert!(!Role::Member.satisfies(Role::Berger));
        assert!(!Role::Berger.satisfies(Role::Admin));
        assert!(!Role::Admin.satisfies(Role::SuperAdmin));
        assert!(Role::SuperAdmin.satisfies(Role::SuperAdmin));
        for role in Role::ALL {
            assert!(role.satisfies(Role::Member));
        }
    }

    #[test]
    fn role_round_trips_wire_names() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        let err = "pasteur".parse::<Role>().unwrap_err();
        assert!(err.public_message().starts_with("Rôle invalide"));
    }

    #[test]
    fn berger_department_only_for_bergers() {
        let mut actor = Actor {
            id: 1,
            username: "berger COM".into(),
            nom: Some("COM".into()),
            prenom: Some("Berger".into()),
            role: Role::Berger,
            service_assigne: Some("Communication".into()),
        };
        assert_eq!(actor.berger_department(), Some("Communication"));
        assert_eq!(actor.display_name(), "COM Berger");

        actor.role = Role::Admin;
        assert_eq!(actor.berger_department(), None);
    }
}
