//! Application configuration.
//!
//! Read from `~/.config/mega-data/config.toml`, then overridden by the
//! environment variables the hosting platform sets (`PORT`, `DATABASE_URL`,
//! `JWT_SECRET`, ...).

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::domain::department::DEPARTMENTS;
use crate::infrastructure::crypto::jwt::generate_secret;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid configuration file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// `~/.config/mega-data/config.toml`, or `./config.toml` when there is no
/// config directory.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("mega-data").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `development` or `production`
    pub environment: String,
    /// Seconds granted to in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 10000,
            environment: "development".to_string(),
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: Option<u32>,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: "sqlite://./mega-data.db?mode=rwc".to_string(),
            max_connections: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: Option<String>,
    pub jwt_expiration_hours: i64,
    pub jwt_issuer: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            jwt_expiration_hours: 168,
            jwt_issuer: "mega-data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    /// Accept any `https://*.vercel.app` origin
    pub allow_vercel_previews: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "https://mega-data.vercel.app".to_string(),
            ],
            allow_vercel_previews: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub enabled: bool,
    /// Seconds needed to replenish one request
    pub per_second: u64,
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_second: 2,
            burst_size: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedAccount {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub nom: Option<String>,
    #[serde(default)]
    pub prenom: Option<String>,
    #[serde(default)]
    pub branche: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub enabled: bool,
    pub super_admins: Vec<SeedAccount>,
    /// Department short code (`COM`, `28:19`, ...) to berger password
    pub berger_passwords: BTreeMap<String, String>,
}

const DEFAULT_ADMIN_PASSWORD: &str = "Admin12345";

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            super_admins: vec![
                SeedAccount {
                    username: "Pasteur Abel Aké".to_string(),
                    password: DEFAULT_ADMIN_PASSWORD.to_string(),
                    nom: Some("Aké".to_string()),
                    prenom: Some("Abel".to_string()),
                    branche: Some("Direction".to_string()),
                },
                SeedAccount {
                    username: "berger".to_string(),
                    password: DEFAULT_ADMIN_PASSWORD.to_string(),
                    nom: Some("Berger".to_string()),
                    prenom: Some("Principal".to_string()),
                    branche: Some("Direction".to_string()),
                },
            ],
            berger_passwords: BTreeMap::new(),
        }
    }
}

impl SeedConfig {
    /// Configured password for the berger of `nom_court`, else
    /// `<CODE>12345` with `:` removed.
    pub fn berger_password(&self, nom_court: &str) -> String {
        self.berger_passwords
            .get(nom_court)
            .cloned()
            .unwrap_or_else(|| format!("{}12345", nom_court.replace(':', "")))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub security: SecurityConfig,
    pub cors: CorsConfig,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
    pub seed: SeedConfig,
}

impl AppConfig {
    /// Load the file at `path` (defaults when it does not exist) and apply
    /// the process environment on top.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self::from_file(path)?.with_env_overrides(|key| env::var(key).ok()))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn with_env_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Some(v) = var("HOST") {
            self.server.host = v;
        }
        if let Some(v) = var("APP_ENV").or_else(|| var("NODE_ENV")) {
            self.server.environment = v;
        }
        if let Some(v) = var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(v) = var("JWT_SECRET").filter(|v| !v.is_empty()) {
            self.security.jwt_secret = Some(v);
        }
        if let Some(v) = var("LOG_LEVEL") {
            self.logging.level = v;
        }

        for (index, suffix) in ["1", "2"].iter().enumerate() {
            let username = var(&format!("ADMIN_USERNAME_{suffix}"));
            let password = var(&format!("ADMIN_PASSWORD_{suffix}"));
            if username.is_none() && password.is_none() {
                continue;
            }
            if self.seed.super_admins.len() <= index {
                self.seed.super_admins.push(SeedAccount {
                    username: String::new(),
                    password: DEFAULT_ADMIN_PASSWORD.to_string(),
                    nom: None,
                    prenom: None,
                    branche: None,
                });
            }
            let account = &mut self.seed.super_admins[index];
            if let Some(username) = username {
                account.username = username;
            }
            if let Some(password) = password {
                account.password = password;
            }
        }

        for department in DEPARTMENTS.iter() {
            if let Some(password) = var(&format!("BERGER_{}_PASSWORD", department.env_code())) {
                self.seed
                    .berger_passwords
                    .insert(department.nom_court.to_string(), password);
            }
        }

        self
    }

    pub fn is_production(&self) -> bool {
        self.server.environment.eq_ignore_ascii_case("production")
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Configured signing secret; outside production a random one is
    /// generated, which invalidates tokens on every restart.
    pub fn resolve_jwt_secret(&self) -> Result<String, ConfigError> {
        match &self.security.jwt_secret {
            Some(secret) if !secret.is_empty() => Ok(secret.clone()),
            _ if self.is_production() => Err(ConfigError::Invalid(
                "JWT_SECRET must be set in production".to_string(),
            )),
            _ => {
                warn!("No JWT secret configured; generated a random one for this run");
                Ok(generate_secret())
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_expiration_hours <= 0 {
            return Err(ConfigError::Invalid(
                "security.jwt_expiration_hours must be positive".to_string(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::Invalid(format!(
                "logging.format must be 'pretty' or 'json', got '{}'",
                self.logging.format
            )));
        }
        if self.rate_limit.enabled && (self.rate_limit.per_second == 0 || self.rate_limit.burst_size == 0) {
            return Err(ConfigError::Invalid(
                "rate_limit.per_second and rate_limit.burst_size must be positive".to_string(),
            ));
        }
        if self.seed.super_admins.iter().any(|a| a.username.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "seed.super_admins entries need a username".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            [server]
            port = 8080

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.logging.format, "json");
        assert_eq!(cfg.security.jwt_expiration_hours, 168);
        assert_eq!(cfg.seed.super_admins.len(), 2);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn environment_overrides_file_values() {
        let cfg = AppConfig::default().with_env_overrides(vars(&[
            ("PORT", "4000"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("NODE_ENV", "production"),
            ("JWT_SECRET", "s3cret"),
            ("ADMIN_PASSWORD_2", "autre"),
            ("BERGER_2819_PASSWORD", "vingt-huit"),
        ]));
        assert_eq!(cfg.server.port, 4000);
        assert_eq!(cfg.database.url, "sqlite::memory:");
        assert!(cfg.is_production());
        assert_eq!(cfg.resolve_jwt_secret().unwrap(), "s3cret");
        assert_eq!(cfg.seed.super_admins[1].username, "berger");
        assert_eq!(cfg.seed.super_admins[1].password, "autre");
        assert_eq!(cfg.seed.berger_password("28:19"), "vingt-huit");
        assert_eq!(cfg.seed.berger_password("COM"), "COM12345");
    }

    #[test]
    fn jwt_secret_required_in_production_only() {
        let dev = AppConfig::default();
        assert_eq!(dev.resolve_jwt_secret().unwrap().len(), 128);

        let mut prod = AppConfig::default();
        prod.server.environment = "production".into();
        assert!(matches!(prod.resolve_jwt_secret(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn invalid_log_format_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.logging.format = "xml".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_file_means_defaults() {
        let cfg = AppConfig::from_file(Path::new("/nonexistent/mega-data/config.toml")).unwrap();
        assert_eq!(cfg.server.port, 10000);
    }
}
