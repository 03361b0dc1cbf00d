//! JWT Token handling

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::User;

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: i64,
    /// Issuer claim
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "mega-data-development-secret".to_string(),
            expiration_hours: 168,
            issuer: "mega-data".to_string(),
        }
    }
}

/// JWT claims. Identity fields are optional so that a token signed with
/// incomplete data is reported as corrupted rather than malformed.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub nom: Option<String>,
    #[serde(default)]
    pub prenom: Option<String>,
    #[serde(default)]
    pub branche: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub service_assigne: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

impl TokenClaims {
    pub fn for_user(user: &User, config: &JwtConfig) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(config.expiration_hours);

        Self {
            sub: user.id.to_string(),
            id: Some(user.id),
            username: Some(user.username.clone()),
            nom: user.nom.clone(),
            prenom: user.prenom.clone(),
            branche: user.branche.clone(),
            role: Some(user.role.as_str().to_string()),
            service_assigne: user.service_assigne.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }
}

/// Create a JWT token for a user
pub fn create_token(user: &User, config: &JwtConfig) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = TokenClaims::for_user(user, config);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify and decode a JWT token
pub fn verify_token(
    token: &str,
    config: &JwtConfig,
) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

/// Random 64-byte secret, hex encoded.
pub fn generate_secret() -> String {
    use rand::RngCore;

    let mut bytes = [0u8; 64];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
