use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use time::OffsetDateTime;

use super::{Datastore, GameProgress, NewUser, User};
use crate::progress::dto::GameStats;

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: Vec<User>,
    progress: HashMap<i64, GameProgress>,
    mutations: usize,
}

/// Test double with the same uniqueness rules as the real schema.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of successful writes so far.
    pub fn mutations(&self) -> usize {
        self.lock().mutations
    }

    pub fn progress_rows(&self, user_id: i64) -> usize {
        usize::from(self.lock().progress.contains_key(&user_id))
    }

    pub fn user(&self, username: &str) -> Option<User> {
        self.lock()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned()
    }

    pub fn deactivate(&self, username: &str) {
        let mut t = self.lock();
        if let Some(u) = t.users.iter_mut().find(|u| u.username == username) {
            u.is_active = false;
        }
    }
}

#[async_trait]
impl Datastore for MemoryStore {
    async fn user_exists(&self, username: &str, email: &str) -> anyhow::Result<bool> {
        Ok(self
            .lock()
            .users
            .iter()
            .any(|u| u.username == username || u.email == email))
    }

    async fn create_user(&self, new: NewUser<'_>, initial: &GameStats) -> anyhow::Result<User> {
        let mut t = self.lock();
        if t.users.iter().any(|u| u.username == new.username) {
            anyhow::bail!("duplicate key value violates unique constraint \"users_username_key\"");
        }
        if t.users.iter().any(|u| u.email == new.email) {
            anyhow::bail!("duplicate key value violates unique constraint \"users_email_key\"");
        }

        t.next_id += 1;
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: t.next_id,
            username: new.username.to_owned(),
            email: new.email.to_owned(),
            password_hash: new.password_hash.to_owned(),
            is_active: true,
            last_login: None,
        };
        t.users.push(user.clone());
        t.progress.insert(user.id, row(initial, now));
        t.mutations += 1;
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        Ok(self.user(username))
    }

    async fn touch_last_login(&self, user_id: i64) -> anyhow::Result<()> {
        let mut t = self.lock();
        if let Some(u) = t.users.iter_mut().find(|u| u.id == user_id) {
            u.last_login = Some(OffsetDateTime::now_utc());
        }
        t.mutations += 1;
        Ok(())
    }

    async fn load_progress(&self, user_id: i64) -> anyhow::Result<Option<GameProgress>> {
        Ok(self.lock().progress.get(&user_id).cloned())
    }

    async fn upsert_progress(
        &self,
        user_id: i64,
        stats: &GameStats,
    ) -> anyhow::Result<OffsetDateTime> {
        let now = OffsetDateTime::now_utc();
        let mut t = self.lock();
        t.progress.insert(user_id, row(stats, now));
        t.mutations += 1;
        Ok(now)
    }
}

fn row(stats: &GameStats, updated_at: OffsetDateTime) -> GameProgress {
    GameProgress {
        level: stats.level,
        power: stats.power,
        coins: stats.coins,
        experience: stats.experience,
        max_experience: stats.max_experience,
        click_damage: stats.click_damage,
        updated_at,
    }
}
