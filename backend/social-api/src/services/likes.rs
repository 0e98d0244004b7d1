use async_trait::async_trait;
use sqlx::PgPool;

use super::{map_constraint_error, LikeStore};
use crate::error::Result;
use crate::models::{CommentLike, PostLike};

pub struct PgLikeStore {
    pool: PgPool,
}

impl PgLikeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeStore for PgLikeStore {
    async fn like_post(&self, post_id: i64, user_id: i64) -> Result<PostLike> {
        sqlx::query_as::<_, PostLike>(
            "INSERT INTO post_likes (post_id, user_id) VALUES ($1, $2)
             RETURNING id, created_at, post_id, user_id",
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_constraint_error(e, "already liked", "post not found"))
    }

    async fn get_post_like(&self, id: i64) -> Result<Option<PostLike>> {
        let like = sqlx::query_as::<_, PostLike>(
            "SELECT id, created_at, post_id, user_id FROM post_likes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(like)
    }

    async fn list_post_likes(&self, post_id: i64) -> Result<Vec<PostLike>> {
        let likes = sqlx::query_as::<_, PostLike>(
            "SELECT id, created_at, post_id, user_id FROM post_likes
             WHERE post_id = $1 ORDER BY id",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(likes)
    }

    async fn unlike_post(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM post_likes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn like_comment(&self, comment_id: i64, user_id: i64) -> Result<CommentLike> {
        sqlx::query_as::<_, CommentLike>(
            "INSERT INTO comment_likes (comment_id, user_id) VALUES ($1, $2)
             RETURNING id, created_at, comment_id, user_id",
        )
        .bind(comment_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_constraint_error(e, "already liked", "comment not found"))
    }

    async fn get_comment_like(&self, id: i64) -> Result<Option<CommentLike>> {
        let like = sqlx::query_as::<_, CommentLike>(
            "SELECT id, created_at, comment_id, user_id FROM comment_likes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(like)
    }

    async fn unlike_comment(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comment_likes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
