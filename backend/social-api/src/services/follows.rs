use async_trait::async_trait;
use sqlx::PgPool;

use super::{map_constraint_error, FollowFilter, FollowStore};
use crate::error::Result;
use crate::models::Follow;
use crate::pagination::Page;

pub struct PgFollowStore {
    pool: PgPool,
}

impl PgFollowStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FollowStore for PgFollowStore {
    async fn follow(&self, follower_id: i64, user_id: i64) -> Result<Follow> {
        sqlx::query_as::<_, Follow>(
            "INSERT INTO follows (follower_id, user_id) VALUES ($1, $2)
             RETURNING id, created_at, follower_id, user_id",
        )
        .bind(follower_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_constraint_error(e, "already following", "user not found"))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Follow>> {
        let follow = sqlx::query_as::<_, Follow>(
            "SELECT id, created_at, follower_id, user_id FROM follows WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(follow)
    }

    async fn unfollow(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM follows WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn is_following(&self, follower_id: i64, followee_id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND user_id = $2)",
        )
        .bind(follower_id)
        .bind(followee_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn list(&self, filter: FollowFilter, page: &Page) -> Result<(Vec<Follow>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM follows
             WHERE ($1::bigint IS NULL OR follower_id = $1)
               AND ($2::bigint IS NULL OR user_id = $2)",
        )
        .bind(filter.follower_id)
        .bind(filter.user_id)
        .fetch_one(&self.pool)
        .await?;

        let follows = sqlx::query_as::<_, Follow>(
            "SELECT id, created_at, follower_id, user_id FROM follows
             WHERE ($1::bigint IS NULL OR follower_id = $1)
               AND ($2::bigint IS NULL OR user_id = $2)
             ORDER BY id
             LIMIT $3 OFFSET $4",
        )
        .bind(filter.follower_id)
        .bind(filter.user_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((follows, total))
    }
}
