use chrono::{DateTime, Utc};

/// Row of the department catalogue.
#[derive(Debug, Clone)]
pub struct Department {
    pub id: i32,
    pub nom: String,
    pub nom_court: Option<String>,
    pub description: Option<String>,
    pub responsable_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}
