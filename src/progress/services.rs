use time::OffsetDateTime;
use tracing::{debug, info};

use super::dto::{GameStats, GameStatsView};
use crate::{
    db::Datastore,
    error::{ApiError, ValidationErrors},
};

pub const MAX_LEVEL: i64 = 1000;

/// Bounds every persisted record must satisfy.
pub fn validate_stats(stats: &GameStats) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if !(1..=MAX_LEVEL).contains(&stats.level) {
        errors.push("level", format!("must be between 1 and {MAX_LEVEL}"));
    }
    for (field, value) in [
        ("power", stats.power),
        ("coins", stats.coins),
        ("experience", stats.experience),
    ] {
        if value < 0 {
            errors.push(field, "must be greater than or equal to 0");
        }
    }
    for (field, value) in [
        ("max_experience", stats.max_experience),
        ("click_damage", stats.click_damage),
    ] {
        if value < 1 {
            errors.push(field, "must be greater than or equal to 1");
        }
    }
    errors.into_result(())
}

/// Stored progress, or the starting record if the user never saved.
pub async fn load_progress(
    store: &dyn Datastore,
    user_id: i64,
) -> Result<GameStatsView, ApiError> {
    match store.load_progress(user_id).await? {
        Some(row) => Ok(GameStatsView::new(row.stats(), Some(row.updated_at))),
        None => {
            debug!(user_id, "no saved progress; returning defaults");
            Ok(GameStatsView::new(GameStats::INITIAL, None))
        }
    }
}

/// Replace the user's whole record. Nothing is written if validation fails.
pub async fn save_progress(
    store: &dyn Datastore,
    user_id: i64,
    stats: GameStats,
) -> Result<OffsetDateTime, ApiError> {
    validate_stats(&stats)?;
    let saved_at = store.upsert_progress(user_id, &stats).await?;
    info!(user_id, level = stats.level, "progress saved");
    Ok(saved_at)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::db::{memory::MemoryStore, NewUser};

    fn stats(level: i64, coins: i64) -> GameStats {
        GameStats {
            level,
            power: 150,
            coins,
            experience: 20,
            max_experience: 200,
            click_damage: 15,
        }
    }

    #[test]
    fn initial_record_is_valid() {
        assert!(validate_stats(&GameStats::INITIAL).is_ok());
    }

    #[test]
    fn rejects_each_bound() {
        let bad = GameStats {
            level: 0,
            power: -1,
            coins: -1,
            experience: -1,
            max_experience: 0,
            click_damage: 0,
        };
        let errors = validate_stats(&bad).unwrap_err();
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(
            fields,
            ["level", "power", "coins", "experience", "max_experience", "click_damage"]
        );

        let too_high = GameStats {
            level: MAX_LEVEL + 1,
            ..GameStats::INITIAL
        };
        assert!(validate_stats(&too_high).is_err());
        let top = GameStats {
            level: MAX_LEVEL,
            ..GameStats::INITIAL
        };
        assert!(validate_stats(&top).is_ok());
    }

    #[tokio::test]
    async fn never_saved_user_gets_defaults() {
        let store = MemoryStore::default();
        let view = load_progress(&store, 77).await.unwrap();
        assert_eq!(view, GameStatsView::new(GameStats::INITIAL, None));
    }

    #[tokio::test]
    async fn save_then_load_roundtrip() {
        let store = MemoryStore::default();
        let saved_at = save_progress(&store, 5, stats(4, 999)).await.unwrap();
        let view = load_progress(&store, 5).await.unwrap();
        assert_eq!(view, GameStatsView::new(stats(4, 999), Some(saved_at)));
    }

    #[tokio::test]
    async fn invalid_save_leaves_stored_progress_alone() {
        let store = MemoryStore::default();
        save_progress(&store, 9, stats(3, 10)).await.unwrap();
        let before = store.mutations();

        for bad in [
            GameStats { level: 0, ..stats(3, 10) },
            GameStats { max_experience: 0, ..stats(3, 10) },
        ] {
            let err = save_progress(&store, 9, bad).await.unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)));
        }

        assert_eq!(store.mutations(), before);
        let view = load_progress(&store, 9).await.unwrap();
        assert_eq!(view.level, 3);
        assert_eq!(view.max_experience, 200);
    }

    #[tokio::test]
    async fn registration_seeds_default_row() {
        let store = MemoryStore::default();
        let user = store
            .create_user(
                NewUser {
                    username: "tabby",
                    email: "tabby@cats.io",
                    password_hash: "x",
                },
                &GameStats::INITIAL,
            )
            .await
            .unwrap();
        let view = load_progress(&store, user.id).await.unwrap();
        assert_eq!(view.level, 1);
        assert!(view.last_saved.is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_saves_leave_one_row() {
        let store = Arc::new(MemoryStore::default());
        let a = stats(10, 100);
        let b = stats(20, 200);

        let s1 = store.clone();
        let s2 = store.clone();
        let (r1, r2) = tokio::join!(
            tokio::spawn(async move { save_progress(s1.as_ref(), 1, a).await }),
            tokio::spawn(async move { save_progress(s2.as_ref(), 1, b).await }),
        );
        r1.unwrap().unwrap();
        r2.unwrap().unwrap();

        assert_eq!(store.progress_rows(1), 1);
        let view = load_progress(store.as_ref(), 1).await.unwrap();
        let got = (view.level, view.coins);
        assert!(got == (10, 100) || got == (20, 200), "unexpected {got:?}");
    }
}
