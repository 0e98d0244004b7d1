use actix_web::{web, HttpResponse};
use crypto_core::password;
use serde::Deserialize;
use validator::Validate;

use super::{parse_id, MessageResponse, TokenResponse};
use crate::app_state::AppState;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::{NewUser, User, UserResponse, UserUpdate};
use crate::pagination::{Page, PageQuery, PageResponse};

// ============================================
// Request Structs
// ============================================

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50, message = "username is required"))]
    pub username: String,
    pub password: String,
    #[validate(email(message = "invalid email"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "invalid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 50, message = "username must be 1-50 characters"))]
    pub username: Option<String>,
    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
    pub is_private: Option<bool>,
}

async fn load_user(state: &AppState, id: i64) -> Result<User> {
    state
        .users
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))
}

fn issue_token(state: &AppState, user: &User, active: bool) -> Result<TokenResponse> {
    let token = state
        .tokens
        .issue(user.id, &user.email, &user.username, active)?;
    Ok(TokenResponse { token })
}

// ============================================
// Handler Functions
// ============================================

/// Register a new account
/// POST /api/v1/user
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    if !password::is_complex(&req.password) {
        return Err(AppError::BadRequest("password must be complex".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;
    let user = state
        .users
        .create(NewUser {
            username: req.username,
            email: req.email,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = user.id, "user registered");
    Ok(HttpResponse::Created().json(MessageResponse::new("User registered successfully")))
}

/// List users
/// GET /api/v1/user?pageNum=&pageSize=&keyword=
pub async fn list_users(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = Page::from(&query.into_inner());
    let (users, total) = state.users.list(&page).await?;

    let response = PageResponse::new(&page, total, users).map(|u| UserResponse::from(&u));
    Ok(HttpResponse::Ok().json(response))
}

/// Public profile
/// GET /api/v1/user/{user_id}
pub async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let user_id = parse_id(&path, "invalid user id")?;
    let user = load_user(&state, user_id).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
}

/// Update own profile
/// PUT /api/v1/user/{user_id}
pub async fn update_user(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
    body: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse> {
    let target_id = parse_id(&path, "invalid user id")?;
    let req = body.into_inner();
    req.validate()?;

    load_user(&state, target_id).await?;
    if user_id.0 != target_id {
        return Err(AppError::Authorization(
            "no permission to update user info".to_string(),
        ));
    }

    let update = UserUpdate {
        username: req.username,
        bio: req.bio,
        profile_image_url: req.profile_image_url,
        is_private: req.is_private,
    };
    let user = state
        .users
        .update(target_id, update)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    tracing::info!(user_id = user.id, is_private = user.is_private, "user updated");
    Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
}

/// Delete own account
/// DELETE /api/v1/user/{user_id}
pub async fn delete_user(
    state: web::Data<AppState>,
    user_id: UserId,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let target_id = parse_id(&path, "invalid user id")?;

    load_user(&state, target_id).await?;
    if user_id.0 != target_id {
        return Err(AppError::Authorization(
            "no permission to delete user info".to_string(),
        ));
    }

    state.users.delete(target_id).await?;
    tracing::info!(user_id = target_id, "user deleted");
    Ok(HttpResponse::Ok().json(MessageResponse::new("user deleted successfully")))
}

/// Current user's profile
/// GET /api/v1/user/info
pub async fn user_info(state: web::Data<AppState>, user_id: UserId) -> Result<HttpResponse> {
    let user = load_user(&state, user_id.0).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
}

/// POST /api/v1/user/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let user = state
        .users
        .get_by_email(&req.email)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        tracing::debug!(user_id = user.id, "login rejected: bad password");
        return Err(AppError::Authentication("invalid password".to_string()));
    }

    Ok(HttpResponse::Ok().json(issue_token(&state, &user, true)?))
}

/// Hand back an inactive token; the client replaces its stored token with it.
/// POST /api/v1/user/logout
pub async fn logout(state: web::Data<AppState>, user_id: UserId) -> Result<HttpResponse> {
    let user = load_user(&state, user_id.0).await?;
    Ok(HttpResponse::Ok().json(issue_token(&state, &user, false)?))
}

/// GET /api/v1/user/refresh
pub async fn refresh(state: web::Data<AppState>, user_id: UserId) -> Result<HttpResponse> {
    let user = load_user(&state, user_id.0).await?;
    Ok(HttpResponse::Ok().json(issue_token(&state, &user, true)?))
}
