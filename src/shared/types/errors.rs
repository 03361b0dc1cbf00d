use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} non trouvé ({field}={value})")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// A query matched nothing to report on; answered as 404.
    #[error("No data: {0}")]
    NoData(String),

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    /// Message safe to return to API clients.
    pub fn public_message(&self) -> String {
        match self {
            Self::NotFound { entity, .. } => format!("{} non trouvé", entity),
            Self::NoData(msg)
            | Self::Validation(msg)
            | Self::Conflict(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg) => msg.clone(),
            Self::Database(_) | Self::Internal(_) => "Erreur serveur".to_string(),
        }
    }

    /// Whether this error is likely transient (e.g. DB connection lost)
    /// and the operation may succeed if retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::Database(e.to_string())
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_public_message_names_entity() {
        let err = DomainError::not_found("Membre", "id", 42);
        assert_eq!(err.public_message(), "Membre non trouvé");
        assert_eq!(err.to_string(), "Membre non trouvé (id=42)");
    }

    #[test]
    fn database_errors_are_hidden_and_transient() {
        let err = DomainError::from(sea_orm::DbErr::Custom("disk I/O error".into()));
        assert_eq!(err.public_message(), "Erreur serveur");
        assert!(err.is_transient());
        assert!(!DomainError::Validation("x".into()).is_transient());
    }
}
