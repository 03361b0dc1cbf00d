//! Authentication and role gates for Axum

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::errors::ErrorKind;
use tracing::{debug, warn};

use super::common::error_response;
use crate::domain::{Actor, Role};
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig, TokenClaims};

/// Authentication error types
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    MalformedHeader,
    ExpiredToken,
    InvalidToken,
    CorruptedToken,
    InsufficientRole,
}

impl AuthError {
    fn status(&self) -> StatusCode {
        match self {
            Self::InsufficientRole => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Self::MissingToken => "Accès refusé. Token manquant.",
            Self::MalformedHeader => "Format Authorization invalide. Utilisez: Bearer <token>",
            Self::ExpiredToken => "Token expiré. Veuillez vous reconnecter.",
            Self::InvalidToken => "Token invalide.",
            Self::CorruptedToken => "Token corrompu: données utilisateur manquantes",
            Self::InsufficientRole => "Accès interdit. Rôle insuffisant.",
        }
    }
}

fn auth_error_response(error: AuthError) -> Response {
    error_response(error.status(), error.message())
}

/// Authentication state containing the JWT config
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// Caller identity decoded from the bearer token.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub actor: Actor,
    pub branche: Option<String>,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: TokenClaims) -> Result<Self, AuthError> {
        let (Some(id), Some(username), Some(role)) = (claims.id, claims.username, claims.role) else {
            return Err(AuthError::CorruptedToken);
        };
        let role: Role = role.parse().map_err(|_| AuthError::CorruptedToken)?;
        Ok(Self {
            actor: Actor {
                id,
                username,
                nom: claims.nom,
                prenom: claims.prenom,
                role,
                service_assigne: claims.service_assigne,
            },
            branche: claims.branche,
        })
    }
}

/// Decode the `Authorization` header value into a caller.
pub fn authenticate(auth_header: Option<&str>, config: &JwtConfig) -> Result<AuthenticatedUser, AuthError> {
    let auth_header = auth_header.ok_or(AuthError::MissingToken)?;
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedHeader)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    let claims = verify_token(token, config).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken,
    })?;
    AuthenticatedUser::from_claims(claims)
}

/// JWT authentication middleware
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    match authenticate(auth_header, &auth_state.jwt_config) {
        Ok(user) => {
            debug!(user_id = user.actor.id, role = %user.actor.role, "Authenticated");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(error) => {
            debug!(?error, path = %request.uri().path(), "Authentication rejected");
            auth_error_response(error)
        }
    }
}

async fn require_role(required: Role, request: Request<Body>, next: Next) -> Response {
    let Some(user) = request.extensions().get::<AuthenticatedUser>() else {
        return auth_error_response(AuthError::MissingToken);
    };
    if !user.actor.role.satisfies(required) {
        warn!(
            user_id = user.actor.id,
            role = %user.actor.role,
            required = %required,
            path = %request.uri().path(),
            "Role gate refused caller"
        );
        return auth_error_response(AuthError::InsufficientRole);
    }
    next.run(request).await
}

/// Gate for berger, admin and super_admin callers. Must run after
/// [`auth_middleware`].
pub async fn require_berger(request: Request<Body>, next: Next) -> Response {
    require_role(Role::Berger, request, next).await
}

/// Gate for admin and super_admin callers.
pub async fn require_admin(request: Request<Body>, next: Next) -> Response {
    require_role(Role::Admin, request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;
    use crate::infrastructure::crypto::jwt::create_token;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".into(),
            ..JwtConfig::default()
        }
    }

    fn user(role: Role) -> User {
        User {
            id: 12,
            username: "berger PO".into(),
            password_hash: String::new(),
            nom: Some("PO".into()),
            prenom: Some("Berger".into()),
            branche: Some("Cocody".into()),
            role,
            service_assigne: Some("Protocole".into()),
            created_at: Utc::now(),
        }
    }

    fn sign(claims: &TokenClaims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(config().secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn header_shapes() {
        let cfg = config();
        assert_eq!(authenticate(None, &cfg).unwrap_err(), AuthError::MissingToken);
        assert_eq!(
            authenticate(Some("Token abc"), &cfg).unwrap_err(),
            AuthError::MalformedHeader
        );
        assert_eq!(authenticate(Some("Bearer   "), &cfg).unwrap_err(), AuthError::MissingToken);
        assert_eq!(
            authenticate(Some("Bearer not.a.jwt"), &cfg).unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[test]
    fn valid_token_yields_actor() {
        let cfg = config();
        let token = create_token(&user(Role::Berger), &cfg).unwrap();
        let caller = authenticate(Some(&format!("Bearer {}", token)), &cfg).unwrap();
        assert_eq!(caller.actor.id, 12);
        assert_eq!(caller.actor.role, Role::Berger);
        assert_eq!(caller.actor.service_assigne.as_deref(), Some("Protocole"));
        assert_eq!(caller.branche.as_deref(), Some("Cocody"));
    }

    #[test]
    fn expired_and_corrupted_tokens() {
        let cfg = config();
        let mut claims = TokenClaims::for_user(&user(Role::Admin), &cfg);
        claims.exp = (Utc::now() - Duration::hours(2)).timestamp();
        let expired = sign(&claims);
        assert_eq!(
            authenticate(Some(&format!("Bearer {}", expired)), &cfg).unwrap_err(),
            AuthError::ExpiredToken
        );

        let mut claims = TokenClaims::for_user(&user(Role::Admin), &cfg);
        claims.role = None;
        let corrupted = sign(&claims);
        assert_eq!(
            authenticate(Some(&format!("Bearer {}", corrupted)), &cfg).unwrap_err(),
            AuthError::CorruptedToken
        );

        let other = JwtConfig {
            secret: "another-secret".into(),
            ..JwtConfig::default()
        };
        let foreign = create_token(&user(Role::Admin), &other).unwrap();
        assert_eq!(
            authenticate(Some(&format!("Bearer {}", foreign)), &cfg).unwrap_err(),
            AuthError::InvalidToken
        );
    }
}
