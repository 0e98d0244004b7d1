use db_pool::env_utils::{parse_env_required, parse_env_with_default};
use std::env;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub jwt: JwtConfig,
    pub cors: CorsConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub host: String,
    pub port: u16,
    /// Apply pending migrations at startup.
    pub run_migrations: bool,
}

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_hours: i64,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Root directory for uploaded media; files land in dated subfolders.
    pub dir: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0}")]
    Missing(String),
    #[error("CORS_ALLOWED_ORIGINS must list explicit origins in production")]
    WildcardCorsInProduction,
    #[error("JWT_TTL_HOURS must be between 1 and 8760, got {0}")]
    InvalidTokenTtl(i64),
}

/// One year.
pub const MAX_JWT_TTL_HOURS: i64 = 24 * 365;

fn default_app_env() -> String {
    "development".to_string()
}

fn default_app_host() -> String {
    "0.0.0.0".to_string()
}

fn default_app_port() -> u16 {
    8080
}

fn default_jwt_ttl_hours() -> i64 {
    24
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env: default_app_env(),
            host: default_app_host(),
            port: default_app_port(),
            run_migrations: true,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: default_upload_dir(),
        }
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("ttl_hours", &self.ttl_hours)
            .finish()
    }
}

impl Config {
    /// Load configuration from the process environment (and `.env` if present).
    ///
    /// Database settings are read separately through `db_pool::DbConfig`.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let app = AppConfig {
            env: env::var("APP_ENV").unwrap_or_else(|_| default_app_env()),
            host: env::var("APP_HOST").unwrap_or_else(|_| default_app_host()),
            port: parse_env_with_default("APP_PORT", default_app_port()),
            run_migrations: parse_env_with_default("RUN_MIGRATIONS", true),
        };

        let jwt = JwtConfig {
            secret: parse_env_required::<String>("JWT_SECRET").map_err(ConfigError::Missing)?,
            ttl_hours: parse_env_with_default("JWT_TTL_HOURS", default_jwt_ttl_hours()),
        };

        let cors = CorsConfig {
            allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .unwrap_or_else(|_| default_allowed_origins()),
        };

        let upload = UploadConfig {
            dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_upload_dir()),
        };

        let config = Config {
            app,
            jwt,
            cors,
            upload,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.is_production() && self.cors.allowed_origins.iter().any(|o| o == "*") {
            return Err(ConfigError::WildcardCorsInProduction);
        }
        if !(1..=MAX_JWT_TTL_HOURS).contains(&self.jwt.ttl_hours) {
            return Err(ConfigError::InvalidTokenTtl(self.jwt.ttl_hours));
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.app.env == "production"
    }

    pub fn is_development(&self) -> bool {
        self.app.env == "development"
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}
