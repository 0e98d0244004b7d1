//! Storage seams.
//!
//! Each resource has an `async_trait` store with a PostgreSQL implementation
//! (`Pg*Store`) and a shared in-memory implementation in [`memory`] that the
//! HTTP tests run against.

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{Comment, CommentLike, Follow, NewPost, NewUser, Post, PostLike, User, UserUpdate};
use crate::pagination::Page;

pub mod comments;
pub mod follows;
pub mod likes;
pub mod memory;
pub mod posts;
pub mod users;

pub use comments::PgCommentStore;
pub use follows::PgFollowStore;
pub use likes::PgLikeStore;
pub use memory::MemoryStore;
pub use posts::PgPostStore;
pub use users::PgUserStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Conflict` when the email is taken.
    async fn create(&self, new_user: NewUser) -> Result<User>;
    async fn get_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn get_by_email(&self, email: &str) -> Result<Option<User>>;
    /// Keyword matches username or bio.
    async fn list(&self, page: &Page) -> Result<(Vec<User>, i64)>;
    async fn update(&self, id: i64, update: UserUpdate) -> Result<Option<User>>;
    async fn delete(&self, id: i64) -> Result<bool>;
}

/// Optional filters for listing follow edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FollowFilter {
    pub follower_id: Option<i64>,
    pub user_id: Option<i64>,
}

#[async_trait]
pub trait FollowStore: Send + Sync {
    /// Creates the edge `follower_id -> user_id`.
    async fn follow(&self, follower_id: i64, user_id: i64) -> Result<Follow>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Follow>>;
    async fn unfollow(&self, id: i64) -> Result<bool>;
    async fn is_following(&self, follower_id: i64, followee_id: i64) -> Result<bool>;
    async fn list(&self, filter: FollowFilter, page: &Page) -> Result<(Vec<Follow>, i64)>;
}

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Inserts the post and its media atomically.
    async fn create(&self, new_post: NewPost) -> Result<Post>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Post>>;
    /// Newest first. Keyword matches title or content.
    async fn list_by_user(&self, user_id: i64, page: &Page) -> Result<(Vec<Post>, i64)>;
    async fn delete(&self, id: i64) -> Result<bool>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn create(&self, post_id: i64, user_id: i64, content: &str) -> Result<Comment>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Comment>>;
    /// Oldest first.
    async fn list_by_post(&self, post_id: i64, page: &Page) -> Result<(Vec<Comment>, i64)>;
    async fn delete(&self, id: i64) -> Result<bool>;
}

#[async_trait]
pub trait LikeStore: Send + Sync {
    async fn like_post(&self, post_id: i64, user_id: i64) -> Result<PostLike>;
    async fn get_post_like(&self, id: i64) -> Result<Option<PostLike>>;
    async fn list_post_likes(&self, post_id: i64) -> Result<Vec<PostLike>>;
    async fn unlike_post(&self, id: i64) -> Result<bool>;

    async fn like_comment(&self, comment_id: i64, user_id: i64) -> Result<CommentLike>;
    async fn get_comment_like(&self, id: i64) -> Result<Option<CommentLike>>;
    async fn unlike_comment(&self, id: i64) -> Result<bool>;
}

/// Translate constraint violations into client errors; everything else stays
/// a database error.
pub(crate) fn map_constraint_error(err: sqlx::Error, on_unique: &str, on_fk: &str) -> AppError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::Conflict(on_unique.to_string());
        }
        if db_err.is_foreign_key_violation() {
            return AppError::NotFound(on_fk.to_string());
        }
    }
    AppError::Database(err)
}
