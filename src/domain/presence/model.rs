//! Presence domain entity

use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Clone)]
pub struct Presence {
    pub id: i32,
    pub membre_id: i32,
    /// User who recorded the presence
    pub berger_id: i32,
    pub date: NaiveDate,
    pub present: bool,
    pub commentaire: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert-or-replace payload keyed on (membre_id, date).
#[derive(Debug, Clone)]
pub struct PresenceUpsert {
    pub membre_id: i32,
    pub berger_id: i32,
    pub date: NaiveDate,
    pub present: bool,
    pub commentaire: Option<String>,
}
