//! Tuning and session configuration.
//!
//! Every value has a default matching the classic arcade feel. A JSON file
//! may override any subset of fields; missing fields keep their defaults.

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Resource, Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid: GridConfig,
    pub ai: AiTuning,
    pub spawn: SpawnConfig,
    pub player: PlayerConfig,
    pub scoring: ScoringConfig,
    /// Seed for every random decision in a session.
    pub seed: u64,
}

impl GameConfig {
    /// Read a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub width: i32,
    pub height: i32,
    /// Rocks placed in the interior on every reset.
    pub rock_count: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 25,
            height: 19,
            rock_count: 15,
        }
    }
}

/// Enemy decision thresholds. Distances are in cells, times in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct AiTuning {
    /// Extra cost of stepping into undug earth.
    pub dig_penalty: u32,
    /// Player counts as nearby below this Manhattan distance.
    pub nearby_distance: u32,
    /// Pooka chases unconditionally below this distance.
    pub very_close_distance: u32,
    /// Pooka's cautious chase only commits to paths shorter than this.
    pub cautious_path_limit: usize,
    pub flee_distance: f32,
    /// Pumps an enemy survives before it is removed.
    pub max_pump: u32,
    /// Fygar fires along a row or column up to this many cells.
    pub fire_range: u32,
    pub fire_cooldown_ms: u64,
    pub patrol_points_min: usize,
    pub patrol_points_max: usize,
    pub base_move_delay_ms: u64,
    pub pooka_move_delay_ms: u64,
    pub fygar_move_delay_ms: u64,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            dig_penalty: 5,
            nearby_distance: 5,
            very_close_distance: 3,
            cautious_path_limit: 8,
            flee_distance: 8.0,
            max_pump: 3,
            fire_range: 4,
            fire_cooldown_ms: 3000,
            patrol_points_min: 3,
            patrol_points_max: 5,
            base_move_delay_ms: 300,
            pooka_move_delay_ms: 250,
            fygar_move_delay_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub initial_enemies: usize,
    pub max_alive: usize,
    pub interval_ms: u64,
    /// Probability that a spawned enemy is a Pooka rather than a Fygar.
    pub pooka_share: f64,
    /// Random spawns stay farther than this from the player on some axis.
    pub min_player_distance: i32,
    pub placement_attempts: usize,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            initial_enemies: 2,
            max_alive: 5,
            interval_ms: 10_000,
            pooka_share: 0.7,
            min_player_distance: 5,
            placement_attempts: 200,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub move_delay_ms: u64,
    /// Lives at the start of a round.
    pub lives: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_delay_ms: 150,
            lives: 3,
        }
    }
}

/// Points awarded to the player. A session is won once `win_score` is reached.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Per cell of earth the player digs out.
    pub dig_points: u64,
    /// Per pump that lands on an enemy.
    pub pump_points: u64,
    pub defeat_points: u64,
    pub win_score: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            dig_points: 1,
            pump_points: 5,
            defeat_points: 100,
            win_score: 500,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
