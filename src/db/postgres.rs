use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;

use super::{Datastore, GameProgress, NewUser, User};
use crate::progress::dto::GameStats;

const USER_COLUMNS: &str = "id, username, email, password_hash, is_active, last_login";

/// Postgres-backed gateway. Connections are checked out per query and go
/// back to the pool when the query future completes or is dropped.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Datastore for PgStore {
    async fn user_exists(&self, username: &str, email: &str) -> anyhow::Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users WHERE username = $1 OR email = $2
            )
            "#,
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .context("check existing user")?;
        Ok(exists)
    }

    async fn create_user(&self, new: NewUser<'_>, initial: &GameStats) -> anyhow::Result<User> {
        let mut tx = self.pool.begin().await.context("begin tx")?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(new.username)
        .bind(new.email)
        .bind(new.password_hash)
        .fetch_one(&mut *tx)
        .await
        .context("insert user")?;

        sqlx::query(
            r#"
            INSERT INTO game_stats
                (user_id, level, power, coins, experience, max_experience, click_damage)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id)
        .bind(initial.level)
        .bind(initial.power)
        .bind(initial.coins)
        .bind(initial.experience)
        .bind(initial.max_experience)
        .bind(initial.click_damage)
        .execute(&mut *tx)
        .await
        .context("insert initial game stats")?;

        tx.commit().await.context("commit tx")?;
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .context("find user by username")?;
        Ok(user)
    }

    async fn touch_last_login(&self, user_id: i64) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET last_login = CURRENT_TIMESTAMP WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .context("update last_login")?;
        Ok(())
    }

    async fn load_progress(&self, user_id: i64) -> anyhow::Result<Option<GameProgress>> {
        let row = sqlx::query_as::<_, GameProgress>(
            r#"
            SELECT level, power, coins, experience, max_experience, click_damage, updated_at
              FROM game_stats
             WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .context("load game stats")?;
        Ok(row)
    }

    async fn upsert_progress(
        &self,
        user_id: i64,
        stats: &GameStats,
    ) -> anyhow::Result<OffsetDateTime> {
        let saved_at = sqlx::query_scalar::<_, OffsetDateTime>(
            r#"
            INSERT INTO game_stats
                (user_id, level, power, coins, experience, max_experience, click_damage, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, CURRENT_TIMESTAMP)
            ON CONFLICT (user_id) DO UPDATE SET
                level          = EXCLUDED.level,
                power          = EXCLUDED.power,
                coins          = EXCLUDED.coins,
                experience     = EXCLUDED.experience,
                max_experience = EXCLUDED.max_experience,
                click_damage   = EXCLUDED.click_damage,
                updated_at     = CURRENT_TIMESTAMP
            RETURNING updated_at
            "#,
        )
        .bind(user_id)
        .bind(stats.level)
        .bind(stats.power)
        .bind(stats.coins)
        .bind(stats.experience)
        .bind(stats.max_experience)
        .bind(stats.click_damage)
        .fetch_one(&self.pool)
        .await
        .context("upsert game stats")?;
        Ok(saved_at)
    }
}
