use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;

use super::{map_constraint_error, PostStore};
use crate::error::Result;
use crate::models::{NewPost, Post};
use crate::pagination::Page;

pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load media URLs for the given posts, keyed by post id, in upload order.
    async fn media_for(&self, post_ids: &[i64]) -> Result<HashMap<i64, Vec<String>>> {
        let rows: Vec<(i64, String)> = sqlx::query_as(
            "SELECT post_id, url FROM media WHERE post_id = ANY($1) ORDER BY post_id, position",
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut media: HashMap<i64, Vec<String>> = HashMap::new();
        for (post_id, url) in rows {
            media.entry(post_id).or_default().push(url);
        }
        Ok(media)
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn create(&self, new_post: NewPost) -> Result<Post> {
        let mut tx = self.pool.begin().await?;

        let mut post = sqlx::query_as::<_, Post>(
            "INSERT INTO posts (title, content, user_id) VALUES ($1, $2, $3)
             RETURNING id, created_at, title, content, user_id",
        )
        .bind(&new_post.title)
        .bind(&new_post.content)
        .bind(new_post.user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_constraint_error(e, "post already exists", "user not found"))?;

        for (position, url) in new_post.media.iter().enumerate() {
            sqlx::query("INSERT INTO media (post_id, position, url) VALUES ($1, $2, $3)")
                .bind(post.id)
                .bind(position as i32)
                .bind(url)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        post.media = new_post.media;
        tracing::debug!(post_id = post.id, user_id = post.user_id, "post created");
        Ok(post)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            "SELECT id, created_at, title, content, user_id FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match post {
            Some(mut post) => {
                post.media = self.media_for(&[post.id]).await?.remove(&post.id).unwrap_or_default();
                Ok(Some(post))
            }
            None => Ok(None),
        }
    }

    async fn list_by_user(&self, user_id: i64, page: &Page) -> Result<(Vec<Post>, i64)> {
        let pattern = page.keyword_pattern();

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM posts
             WHERE user_id = $1
               AND ($2::text IS NULL OR title ILIKE $2 OR content ILIKE $2)",
        )
        .bind(user_id)
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        let mut posts = sqlx::query_as::<_, Post>(
            "SELECT id, created_at, title, content, user_id FROM posts
             WHERE user_id = $1
               AND ($2::text IS NULL OR title ILIKE $2 OR content ILIKE $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4",
        )
        .bind(user_id)
        .bind(&pattern)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        if !posts.is_empty() {
            let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
            let mut media = self.media_for(&ids).await?;
            for post in &mut posts {
                post.media = media.remove(&post.id).unwrap_or_default();
            }
        }

        Ok((posts, total))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
