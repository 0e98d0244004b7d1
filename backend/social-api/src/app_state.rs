//! Application state shared by all handlers.
//!
//! Built once at startup and handed to actix as `web::Data<AppState>`. Stores
//! are trait objects so the same handlers run over PostgreSQL or the
//! in-memory store.

use std::sync::Arc;

use crypto_core::jwt::TokenIssuer;
use sqlx::PgPool;

use crate::config::{Config, MAX_JWT_TTL_HOURS};
use crate::error::Result;
use crate::services::{
    CommentStore, FollowStore, LikeStore, MemoryStore, PgCommentStore, PgFollowStore,
    PgLikeStore, PgPostStore, PgUserStore, PostStore, UserStore,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tokens: TokenIssuer,
    pub users: Arc<dyn UserStore>,
    pub follows: Arc<dyn FollowStore>,
    pub posts: Arc<dyn PostStore>,
    pub comments: Arc<dyn CommentStore>,
    pub likes: Arc<dyn LikeStore>,
    /// Present when backed by PostgreSQL; used by the health check.
    pub db: Option<PgPool>,
}

fn token_issuer(config: &Config) -> Result<TokenIssuer> {
    let issuer = TokenIssuer::from_secret(&config.jwt.secret)?
        .with_ttl(chrono::Duration::hours(config.jwt.ttl_hours.clamp(1, MAX_JWT_TTL_HOURS)));
    Ok(issuer)
}

impl AppState {
    pub fn postgres(config: Config, pool: PgPool) -> Result<Self> {
        tracing::info!("Initializing application state (postgres)");

        Ok(Self {
            tokens: token_issuer(&config)?,
            config: Arc::new(config),
            users: Arc::new(PgUserStore::new(pool.clone())),
            follows: Arc::new(PgFollowStore::new(pool.clone())),
            posts: Arc::new(PgPostStore::new(pool.clone())),
            comments: Arc::new(PgCommentStore::new(pool.clone())),
            likes: Arc::new(PgLikeStore::new(pool.clone())),
            db: Some(pool),
        })
    }

    /// All stores share one [`MemoryStore`], so cascades work across them.
    pub fn in_memory(config: Config) -> Result<Self> {
        tracing::info!("Initializing application state (in-memory)");

        let store = Arc::new(MemoryStore::new());
        Ok(Self {
            tokens: token_issuer(&config)?,
            config: Arc::new(config),
            users: store.clone(),
            follows: store.clone(),
            posts: store.clone(),
            comments: store.clone(),
            likes: store,
            db: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, CorsConfig, JwtConfig, UploadConfig};

    fn config_with_ttl(ttl_hours: i64) -> Config {
        Config {
            app: AppConfig::default(),
            jwt: JwtConfig {
                secret: "s3cret".to_string(),
                ttl_hours,
            },
            cors: CorsConfig::default(),
            upload: UploadConfig {
                dir: std::path::PathBuf::from("uploads"),
            },
        }
    }

    #[test]
    fn test_token_ttl_is_clamped() {
        let state = AppState::in_memory(config_with_ttl(i64::MAX)).unwrap();
        assert_eq!(state.tokens.ttl(), chrono::Duration::hours(MAX_JWT_TTL_HOURS));

        let state = AppState::in_memory(config_with_ttl(0)).unwrap();
        assert_eq!(state.tokens.ttl(), chrono::Duration::hours(1));
    }
}
