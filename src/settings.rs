//! Game settings and tuning
//!
//! Loaded from a JSON file on startup. Anything missing falls back to the
//! values in `consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::Layout;

/// Environment variable naming the settings file
pub const CONFIG_ENV_VAR: &str = "PARALLEL_DIMENSIONS_CONFIG";
/// Settings file used when the environment variable is unset
pub const DEFAULT_CONFIG_PATH: &str = "config/settings.json";

/// Per-frame character physics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Added to vertical velocity every frame
    pub gravity: f32,
    /// Vertical velocity set on jump (negative is up)
    pub jump_power: f32,
    /// Horizontal speed while a direction is held
    pub move_speed: f32,
    pub body_width: f32,
    pub body_height: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_power: JUMP_POWER,
            move_speed: MOVE_SPEED,
            body_width: BODY_WIDTH,
            body_height: BODY_HEIGHT,
        }
    }
}

/// Level transition tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionSettings {
    /// Wall-clock length of the cross-fade (ms)
    pub duration_ms: f64,
    /// Particles spawned around each character
    pub particles_per_burst: usize,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            duration_ms: TRANSITION_DURATION_MS,
            particles_per_burst: PARTICLES_PER_BURST,
        }
    }
}

/// Top-level game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub physics: PhysicsSettings,
    /// Layout level packs are validated against. A running session reads
    /// bounds from its `LevelSet`, not from here.
    pub layout: Layout,
    /// Lives granted on start/restart
    pub starting_lives: u8,
    pub transition: TransitionSettings,
    /// Seed for the particle RNG
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            physics: PhysicsSettings::default(),
            layout: Layout::default(),
            starting_lives: STARTING_LIVES,
            transition: TransitionSettings::default(),
            seed: 0x5eed,
        }
    }
}

impl Settings {
    /// Load settings from the file named by `PARALLEL_DIMENSIONS_CONFIG`
    /// (or `config/settings.json`). Falls back to defaults if the file is
    /// missing or unparseable.
    pub fn load() -> Self {
        let path =
            std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(Path::new(&path))
    }

    /// Load settings from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_json(&content).unwrap_or_else(|e| {
                log::warn!("Failed to parse {}: {e}, using defaults", path.display());
                Self::default()
            }),
            Err(_) => {
                log::warn!("No settings at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let s = Settings::default();
        assert_eq!(s.physics.gravity, GRAVITY);
        assert_eq!(s.physics.jump_power, JUMP_POWER);
        assert_eq!(s.starting_lives, 3);
        assert_eq!(s.transition.duration_ms, 2000.0);
        assert_eq!(s.layout.partition(), 300.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let s = Settings::from_json(r#"{"starting_lives": 1, "physics": {"gravity": 0.25}}"#)
            .unwrap();
        assert_eq!(s.starting_lives, 1);
        assert_eq!(s.physics.gravity, 0.25);
        assert_eq!(s.physics.move_speed, MOVE_SPEED);
        assert_eq!(s.transition, TransitionSettings::default());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let s = Settings::load_from(Path::new("/nonexistent/parallel-dimensions.json"));
        assert_eq!(s, Settings::default());
    }
}
