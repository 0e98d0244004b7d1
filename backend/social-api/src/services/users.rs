use async_trait::async_trait;
use sqlx::PgPool;

use super::{map_constraint_error, UserStore};
use crate::error::Result;
use crate::models::{NewUser, User, UserUpdate};
use crate::pagination::Page;

const USER_COLUMNS: &str =
    "id, created_at, updated_at, username, email, password_hash, bio, profile_image_url, is_private";

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, new_user: NewUser) -> Result<User> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(&new_user.username)
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_constraint_error(e, "email already exists", "user not found"))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn list(&self, page: &Page) -> Result<(Vec<User>, i64)> {
        let pattern = page.keyword_pattern();

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users
             WHERE ($1::text IS NULL OR username ILIKE $1 OR bio ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        let sql = format!(
            "SELECT {} FROM users
             WHERE ($1::text IS NULL OR username ILIKE $1 OR bio ILIKE $1)
             ORDER BY id
             LIMIT $2 OFFSET $3",
            USER_COLUMNS
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(&pattern)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((users, total))
    }

    async fn update(&self, id: i64, update: UserUpdate) -> Result<Option<User>> {
        let sql = format!(
            "UPDATE users SET
                 username = COALESCE($2, username),
                 bio = COALESCE($3, bio),
                 profile_image_url = COALESCE($4, profile_image_url),
                 is_private = COALESCE($5, is_private),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(&update.username)
            .bind(&update.bio)
            .bind(&update.profile_image_url)
            .bind(update.is_private)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
