use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ============================================
// Users
// ============================================

/// Stored account. Never serialised directly: it carries the password hash.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub bio: String,
    pub profile_image_url: String,
    pub is_private: bool,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial profile update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
    pub is_private: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub bio: String,
    pub profile_image_url: String,
    pub is_private: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            bio: user.bio.clone(),
            profile_image_url: user.profile_image_url.clone(),
            is_private: user.is_private,
            created_at: user.created_at,
        }
    }
}

// ============================================
// Follows
// ============================================

/// Directed edge: `follower_id` follows `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Follow {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub follower_id: i64,
    pub user_id: i64,
}

// ============================================
// Posts
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Post {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub content: String,
    pub user_id: i64,
    /// Media URLs in upload order, loaded from the `media` table.
    #[sqlx(skip)]
    pub media: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub media: Vec<String>,
}

// ============================================
// Comments
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Comment {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub post_id: i64,
    pub user_id: i64,
    pub content: String,
}

// ============================================
// Likes
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct PostLike {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub post_id: i64,
    pub user_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct CommentLike {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub comment_id: i64,
    pub user_id: i64,
}
