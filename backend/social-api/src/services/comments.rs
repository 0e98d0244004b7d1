use async_trait::async_trait;
use sqlx::PgPool;

use super::{map_constraint_error, CommentStore};
use crate::error::Result;
use crate::models::Comment;
use crate::pagination::Page;

pub struct PgCommentStore {
    pool: PgPool,
}

impl PgCommentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentStore for PgCommentStore {
    async fn create(&self, post_id: i64, user_id: i64, content: &str) -> Result<Comment> {
        sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (post_id, user_id, content) VALUES ($1, $2, $3)
             RETURNING id, created_at, post_id, user_id, content",
        )
        .bind(post_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_constraint_error(e, "comment already exists", "post not found"))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            "SELECT id, created_at, post_id, user_id, content FROM comments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(comment)
    }

    async fn list_by_post(&self, post_id: i64, page: &Page) -> Result<(Vec<Comment>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await?;

        let comments = sqlx::query_as::<_, Comment>(
            "SELECT id, created_at, post_id, user_id, content FROM comments
             WHERE post_id = $1
             ORDER BY created_at ASC, id ASC
             LIMIT $2 OFFSET $3",
        )
        .bind(post_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((comments, total))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
