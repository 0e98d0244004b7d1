pub mod comments;
pub mod follows;
pub mod health;
pub mod likes;
pub mod posts;
pub mod uploads;
pub mod users;

use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::error::{AppError, Result};
use crate::models::Post;
use crate::visibility;

// ============================================
// Shared response bodies
// ============================================

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Parse a positive path id, failing with `BadRequest(message)`.
pub(crate) fn parse_id(raw: &str, message: &str) -> Result<i64> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::BadRequest(message.to_string()))
}

/// Load a post and run the visibility guard against its author.
pub(crate) async fn visible_post(state: &AppState, actor: Option<i64>, post_id: i64) -> Result<Post> {
    visible_post_with(state, || Ok(actor), post_id).await
}

/// [`visible_post`] for an actor that is only resolved when the author is private.
pub(crate) async fn visible_post_with<A>(state: &AppState, resolve_actor: A, post_id: i64) -> Result<Post>
where
    A: FnOnce() -> Result<Option<i64>>,
{
    let post = state
        .posts
        .get_by_id(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

    visibility::ensure_author_visible_with(
        state.users.as_ref(),
        state.follows.as_ref(),
        resolve_actor,
        post.user_id,
    )
    .await?;
    Ok(post)
}
