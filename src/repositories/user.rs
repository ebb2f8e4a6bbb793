use crate::entities::{Role, User};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepositoryTrait {
    /// Creates the account row and its one-to-one profile row atomically.
    async fn create_with_profile(
        &self,
        email: &str,
        pw_hash: &str,
        username: &str,
        role: Role,
    ) -> Result<User>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
}

#[derive(Clone)]
pub struct UserRepository {
    pool: Pool<Postgres>,
}

impl UserRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn create_with_profile(
        &self,
        email: &str,
        pw_hash: &str,
        username: &str,
        role: Role,
    ) -> Result<User> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, pw_hash)
            VALUES ($1, $2)
            RETURNING id, email, pw_hash, created_at
            "#,
        )
        .bind(email)
        .bind(pw_hash)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO profiles (id, username, role)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user.id)
        .bind(username.trim())
        .bind(role)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, pw_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, pw_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
