//! Test fixtures for the HTTP tests
//! Builds an in-memory `AppState`, the full route table, and seeded users
use std::sync::OnceLock;

use actix_web::{dev::ServiceResponse, test, web, App};
use serde_json::Value;
use social_api::config::{AppConfig, Config, CorsConfig, JwtConfig, UploadConfig};
use social_api::models::{NewPost, Post, User, UserUpdate};
use social_api::{routes, AppState};
use tempfile::TempDir;

pub const TEST_SECRET: &str = "test-secret-for-social-api";
pub const TEST_PASSWORD: &str = "Passw0rd";

// ============================================
// App Setup
// ============================================

/// In-memory state plus the temporary upload directory it writes to.
pub struct TestContext {
    pub state: AppState,
    pub upload_dir: TempDir,
}

pub fn test_config(upload_dir: &TempDir) -> Config {
    Config {
        app: AppConfig {
            run_migrations: false,
            ..AppConfig::default()
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
            ttl_hours: 24,
        },
        cors: CorsConfig::default(),
        upload: UploadConfig {
            dir: upload_dir.path().to_path_buf(),
        },
    }
}

pub fn test_context() -> TestContext {
    let upload_dir = TempDir::new().expect("Failed to create upload dir");
    let state = AppState::in_memory(test_config(&upload_dir)).expect("Failed to build state");
    TestContext { state, upload_dir }
}

pub async fn init_app(
    state: &AppState,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(routes::json_config())
            .configure(routes::configure_routes),
    )
    .await
}

// ============================================
// Test Data
// ============================================

/// argon2 is slow in debug builds; hash the shared password once.
pub fn password_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| {
        crypto_core::password::hash_password(TEST_PASSWORD).expect("Failed to hash password")
    })
}

/// Create a user directly in the store and return it with an active token.
pub async fn seed_user(state: &AppState, username: &str, is_private: bool) -> (User, String) {
    let user = state
        .users
        .create(social_api::models::NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: password_hash().to_string(),
        })
        .await
        .expect("Failed to create user");

    let user = if is_private {
        state
            .users
            .update(
                user.id,
                UserUpdate {
                    is_private: Some(true),
                    ..UserUpdate::default()
                },
            )
            .await
            .expect("Failed to update user")
            .expect("user vanished")
    } else {
        user
    };

    let token = state
        .tokens
        .issue(user.id, &user.email, &user.username, true)
        .expect("Failed to issue token");
    (user, token)
}

pub async fn seed_post(state: &AppState, user_id: i64, title: &str) -> Post {
    state
        .posts
        .create(NewPost {
            user_id,
            title: title.to_string(),
            content: format!("{} content", title),
            media: vec!["uploads/2024-01-01/abc-photo.png".to_string()],
        })
        .await
        .expect("Failed to create post")
}

pub async fn seed_follow(state: &AppState, follower_id: i64, user_id: i64) {
    state
        .follows
        .follow(follower_id, user_id)
        .await
        .expect("Failed to create follow");
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

pub fn error_message(body: &Value) -> &str {
    body["error"].as_str().unwrap_or_default()
}
