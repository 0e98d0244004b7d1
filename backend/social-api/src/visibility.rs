//! Visibility guard for content owned by possibly private authors.
//!
//! Content is visible to an actor when the actor is the author, the author is
//! public, or the actor follows the author. Comments and likes are checked
//! against the author of their parent post, never their own author.
//!
//! The guard itself never fails. Resolving the author is the caller's job and
//! a missing author is reported as not found before the guard runs.

use std::future::Future;

use crate::error::{AppError, Result};
use crate::metrics;
use crate::services::{FollowStore, UserStore};

/// Outcome of the part of the rule that needs no follow lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
    /// Visible only if `actor_id` follows the author.
    RequiresFollow { actor_id: i64 },
}

pub fn decide(actor: Option<i64>, author_id: i64, author_is_private: bool) -> Decision {
    match actor {
        _ if !author_is_private => Decision::Allow,
        None => Decision::Deny,
        Some(actor_id) if actor_id == author_id => Decision::Allow,
        Some(actor_id) => Decision::RequiresFollow { actor_id },
    }
}

/// Decide visibility with a synchronous follow lookup.
///
/// `is_following(actor, author)` is only called for a private author viewed
/// by someone else.
pub fn can_view<F>(actor: Option<i64>, author_id: i64, author_is_private: bool, is_following: F) -> bool
where
    F: FnOnce(i64, i64) -> bool,
{
    match decide(actor, author_id, author_is_private) {
        Decision::Allow => true,
        Decision::Deny => false,
        Decision::RequiresFollow { actor_id } => is_following(actor_id, author_id),
    }
}

/// Async form of [`can_view`]. Lookup errors are propagated.
pub async fn can_view_with<F, Fut>(
    actor: Option<i64>,
    author_id: i64,
    author_is_private: bool,
    is_following: F,
) -> Result<bool>
where
    F: FnOnce(i64, i64) -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    match decide(actor, author_id, author_is_private) {
        Decision::Allow => Ok(true),
        Decision::Deny => Ok(false),
        Decision::RequiresFollow { actor_id } => is_following(actor_id, author_id).await,
    }
}

fn denied(actor: Option<i64>) -> AppError {
    metrics::record_visibility_denied(actor.is_none());
    match actor {
        None => AppError::Authorization("post is private, please login and retry again".to_string()),
        Some(_) => AppError::Authorization(
            "post is private and you are not following the author".to_string(),
        ),
    }
}

/// Load `author_id` and fail with `Authorization` unless `actor` may see
/// their content.
pub async fn ensure_author_visible(
    users: &dyn UserStore,
    follows: &dyn FollowStore,
    actor: Option<i64>,
    author_id: i64,
) -> Result<()> {
    ensure_author_visible_with(users, follows, || Ok(actor), author_id).await
}

/// Like [`ensure_author_visible`], but `resolve_actor` only runs when the
/// author is private. Public content never looks at the caller.
pub async fn ensure_author_visible_with<A>(
    users: &dyn UserStore,
    follows: &dyn FollowStore,
    resolve_actor: A,
    author_id: i64,
) -> Result<()>
where
    A: FnOnce() -> Result<Option<i64>>,
{
    let author = users
        .get_by_id(author_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    if !author.is_private {
        return Ok(());
    }
    let actor = resolve_actor()?;

    let visible = can_view_with(actor, author.id, author.is_private, |follower, followee| {
        follows.is_following(follower, followee)
    })
    .await?;

    if visible {
        Ok(())
    } else {
        tracing::debug!(actor = ?actor, author_id, "visibility denied");
        Err(denied(actor))
    }
}
