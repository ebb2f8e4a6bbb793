use crate::entities::Profile;
use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// Repository for per-user profile metadata.
pub struct ProfileRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProfileRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, username, avatar_url, role, updated_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(profile)
    }

    /// Applies the provided fields, leaving absent ones untouched.
    /// Returns the updated profile, or `None` if the user has no profile.
    pub async fn update(
        &self,
        user_id: Uuid,
        username: Option<&str>,
        avatar_url: Option<&str>,
    ) -> Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
            SET username   = COALESCE($2, username),
                avatar_url = COALESCE($3, avatar_url),
                updated_at = now()
            WHERE id = $1
            RETURNING id, username, avatar_url, role, updated_at
            "#,
        )
        .bind(user_id)
        .bind(username)
        .bind(avatar_url)
        .fetch_optional(self.pool)
        .await?;

        Ok(profile)
    }
}
