//! Versioned JSON save document.
//!
//! The document is the game state itself, flattened, plus a format version
//! and the save time as an RFC 3339 string. Every state struct defaults its
//! missing fields, so saves written before a field existed still load.

use chrono::{DateTime, SecondsFormat, Utc};
use game_core::GameState;
use serde::{Deserialize, Serialize};

/// Format version written by this build.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    #[serde(default)]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_saved: Option<String>,
    #[serde(flatten)]
    pub state: GameState,
}

impl GameSnapshot {
    pub fn capture(state: &GameState, now: DateTime<Utc>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            last_saved: Some(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
            state: state.clone(),
        }
    }

    /// Splits the document back into state and save time.
    ///
    /// An unparseable timestamp is dropped rather than failing the load.
    pub fn restore(self) -> (GameState, Option<DateTime<Utc>>) {
        if self.version > SNAPSHOT_VERSION {
            tracing::warn!(
                version = self.version,
                supported = SNAPSHOT_VERSION,
                "snapshot written by a newer build; unknown fields are ignored"
            );
        }
        let saved_at = self.last_saved.as_deref().and_then(|raw| {
            DateTime::parse_from_rfc3339(raw)
                .map(|at| at.with_timezone(&Utc))
                .inspect_err(|error| tracing::warn!(%error, raw, "ignoring invalid save timestamp"))
                .ok()
        });
        (self.state, saved_at)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use game_core::{
        Ability, GameConfig, Monster, MonsterState, Position, Unlocks, state::Cloak,
    };

    use super::*;

    fn played_state() -> GameState {
        let config = GameConfig::default();
        let mut state = GameState::new(&config, 99);
        state.turn.nonce = 12;
        state.turn.move_count = 7;
        state.player.position = Position::new(380, 190);
        state.player.hp = 64;
        state.player.unlocks = Unlocks::HIDE;
        state.player.hide.charges = 4;
        state.player.cloak = Cloak::Turns(3);
        state.run.monsters_killed = 2;
        let id = state.allocate_entity_id();
        state.monsters.insert(Monster {
            id,
            template: "abhuman".into(),
            name: "Abhuman".into(),
            hp: 5,
            max_hp: 12,
            position: Position::new(370, 190),
            state: MonsterState::Waiting { ticket: 3 },
            ..Monster::default()
        });
        state.ui.push_teleport_flash(Position::new(1, 2));
        state
            .progress
            .sub_games_completed
            .insert("jaunt_cave".into(), true);
        state
            .progress
            .waypoints_created
            .insert("jaunt_cave_waypoint".into());
        state
    }

    #[test]
    fn restore_of_capture_is_the_same_state() {
        let state = played_state();
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();

        let json = GameSnapshot::capture(&state, now).to_json().unwrap();
        let (restored, saved_at) = GameSnapshot::from_json(&json).unwrap().restore();

        assert_eq!(restored, state);
        assert_eq!(saved_at, Some(now));
        assert!(restored.player.has_unlocked(Ability::Hide));
    }

    #[test]
    fn document_is_flat_json() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();
        let json = GameSnapshot::capture(&played_state(), now).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["version"], SNAPSHOT_VERSION);
        assert_eq!(value["last_saved"], "2026-03-01T12:30:00.000Z");
        assert_eq!(value["game_seed"], 99);
        assert!(value["player"].is_object());
        assert_eq!(value["progress"]["sub_games_completed"]["jaunt_cave"], true);
        assert_eq!(value["progress"]["waypoints_created"][0], "jaunt_cave_waypoint");
    }

    #[test]
    fn fields_missing_from_old_saves_default() {
        let json = r#"{
            "game_seed": 5,
            "turn": { "nonce": 3, "move_count": 2 },
            "player": { "position": { "row": 10, "col": 11 }, "hp": 40, "max_hp": 100 }
        }"#;
        let snapshot = GameSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.version, 0);

        let (state, saved_at) = snapshot.restore();
        assert_eq!(saved_at, None);
        assert_eq!(state.game_seed, 5);
        assert_eq!(state.player.hp, 40);
        assert!(state.player.unlocks.is_empty(), "unlocks default to none");
        assert!(state.monsters.is_empty());
        assert!(!state.is_game_over());
        assert!(state.progress.sub_games_completed.is_empty());
        assert!(state.progress.waypoints_created.is_empty());
    }

    #[test]
    fn unknown_fields_and_bad_timestamps_are_tolerated() {
        let json = r#"{
            "version": 9,
            "last_saved": "yesterday",
            "game_seed": 1,
            "hermit_dialogue": { "seen": true }
        }"#;
        let (state, saved_at) = GameSnapshot::from_json(json).unwrap().restore();
        assert_eq!(state.game_seed, 1);
        assert_eq!(saved_at, None);
    }
}
