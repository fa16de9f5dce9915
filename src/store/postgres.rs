use async_trait::async_trait;
use sqlx::PgPool;

use super::{Result, StoreError, UserStore};
use crate::models::{User, UserBody};

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
    async fn create_user(&self, user: &User) -> Result<User> {
        let row = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, last_name) VALUES ($1, $2, $3)
             RETURNING id, name, last_name",
        )
        .bind(&user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_user(&self, id: &str, body: &UserBody) -> Result<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET name = $1, last_name = $2 WHERE id = $3
             RETURNING id, name, last_name",
        )
        .bind(&body.first_name)
        .bind(&body.last_name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn delete_user(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::debug!(%id, rows = result.rows_affected(), "delete executed");

        Ok(())
    }

    async fn get_user(&self, id: &str) -> Result<User> {
        sqlx::query_as::<_, User>("SELECT id, name, last_name FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn get_all_users(&self, limit: i64, offset: i64) -> Result<Vec<User>> {
        let users =
            sqlx::query_as::<_, User>("SELECT id, name, last_name FROM users LIMIT $1 OFFSET $2")
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

        Ok(users)
    }
}
