use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The six persisted progress counters, snake_case on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    pub level: i64,
    pub power: i64,
    pub coins: i64,
    pub experience: i64,
    pub max_experience: i64,
    pub click_damage: i64,
}

impl GameStats {
    /// Starting record for a new or never-saved player.
    pub const INITIAL: GameStats = GameStats {
        level: 1,
        power: 100,
        coins: 0,
        experience: 0,
        max_experience: 100,
        click_damage: 10,
    };
}

/// Body of `POST|PUT /progress`. Extra client fields are ignored.
#[derive(Debug, Deserialize)]
pub struct SaveProgressRequest {
    pub game_stats: GameStats,
}

/// Progress as the client reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatsView {
    pub level: i64,
    pub power: i64,
    pub coins: i64,
    pub experience: i64,
    pub max_experience: i64,
    pub click_damage: i64,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_saved: Option<OffsetDateTime>,
}

impl GameStatsView {
    pub fn new(stats: GameStats, last_saved: Option<OffsetDateTime>) -> Self {
        Self {
            level: stats.level,
            power: stats.power,
            coins: stats.coins,
            experience: stats.experience,
            max_experience: stats.max_experience,
            click_damage: stats.click_damage,
            last_saved,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadProgressResponse {
    pub success: bool,
    pub game_stats: GameStatsView,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveProgressResponse {
    pub success: bool,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub saved_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_uses_client_field_names() {
        let view = GameStatsView::new(GameStats::INITIAL, None);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["maxExperience"], 100);
        assert_eq!(json["clickDamage"], 10);
        assert!(json["lastSaved"].is_null());
    }

    #[test]
    fn save_request_ignores_extra_client_fields() {
        let body = r#"{"game_stats":{"level":3,"power":120,"coins":5,"experience":7,
            "max_experience":150,"click_damage":12,"energy":300,"owned_cats":[]}}"#;
        let req: SaveProgressRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.game_stats.level, 3);
        assert_eq!(req.game_stats.click_damage, 12);
    }
}
