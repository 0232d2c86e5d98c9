//! Datastore gateway: the only code that talks to the database.

use async_trait::async_trait;
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::progress::dto::GameStats;

#[cfg(test)]
pub mod memory;
pub mod postgres;

/// Row of `users`.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String, // hex(salt) || hex(key)
    pub is_active: bool,
    pub last_login: Option<OffsetDateTime>,
}

/// Row of `game_stats`.
#[derive(Debug, Clone, FromRow)]
pub struct GameProgress {
    pub level: i64,
    pub power: i64,
    pub coins: i64,
    pub experience: i64,
    pub max_experience: i64,
    pub click_damage: i64,
    pub updated_at: OffsetDateTime,
}

impl GameProgress {
    pub fn stats(&self) -> GameStats {
        GameStats {
            level: self.level,
            power: self.power,
            coins: self.coins,
            experience: self.experience,
            max_experience: self.max_experience,
            click_damage: self.click_damage,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

#[async_trait]
pub trait Datastore: Send + Sync {
    /// True if any user already has this username or this email.
    async fn user_exists(&self, username: &str, email: &str) -> anyhow::Result<bool>;

    /// Insert the user and its initial progress row together.
    /// Unique constraints on username/email are enforced here.
    async fn create_user(&self, new: NewUser<'_>, initial: &GameStats) -> anyhow::Result<User>;

    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;

    async fn touch_last_login(&self, user_id: i64) -> anyhow::Result<()>;

    async fn load_progress(&self, user_id: i64) -> anyhow::Result<Option<GameProgress>>;

    /// Atomic insert-or-replace of the user's single progress row.
    /// Returns the timestamp stamped on the row.
    async fn upsert_progress(&self, user_id: i64, stats: &GameStats)
        -> anyhow::Result<OffsetDateTime>;
}
