//! Runtime game configuration loaded from `assets/game.toml`.
//!
//! [`GameConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`]. At startup, [`load_game_config`] reads
//! `assets/game.toml` and overwrites the defaults with any values present in
//! the file. Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the settings you care about.
//!
//! ## Usage in systems
//!
//! Add `config: Res<GameConfig>` to any system parameter list and read values
//! with `config.max_lives`, `config.assault_spawn_interval`, etc.
//!
//! Invalid settings (negative max lives, an inverted speed range) are
//! startup-time configuration errors: [`load_game_config`] validates the
//! final values and hard-stops the app with a diagnostic rather than running
//! a session that can never behave correctly.

use crate::constants::*;
use crate::error::{validate_non_negative, validate_speed_range, GameError, GameResult};
use bevy::prelude::*;
use serde::Deserialize;

/// Runtime-tunable session, spawn, and impact configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`. Override any subset by setting the value in
/// `assets/game.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Session ──────────────────────────────────────────────────────────────
    pub max_lives: i32,
    pub max_waves: u32,
    pub starting_difficulty: f32,

    // ── Spawn: shared ────────────────────────────────────────────────────────
    pub min_launch_speed: f32,
    pub max_launch_speed: f32,
    pub meteor_lifetime: f32,
    pub spawn_height: f32,
    pub spawn_spread_radius: f32,

    // ── Spawn: ambient (Menu) ────────────────────────────────────────────────
    pub ambient_kinds: Vec<String>,
    pub ambient_spawn_interval: f32,
    pub ambient_deviation_deg: f32,

    // ── Spawn: assault (Playing) ─────────────────────────────────────────────
    pub assault_kinds: Vec<String>,
    pub assault_spawn_interval: f32,
    pub assault_deviation_deg: f32,

    // ── Spawn: volley (finite one-shot) ──────────────────────────────────────
    pub volley_count: u32,
    pub volley_interval: f32,
    pub volley_plane_half_x: f32,
    pub volley_plane_half_z: f32,
    pub volley_deviation_deg: f32,

    // ── Impacts ──────────────────────────────────────────────────────────────
    pub impact_speed_threshold: f32,
    pub impact_score_award: i32,
    pub defense_core_radius: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            // Session
            max_lives: MAX_LIVES,
            max_waves: MAX_WAVES,
            starting_difficulty: STARTING_DIFFICULTY,
            // Spawn: shared
            min_launch_speed: MIN_LAUNCH_SPEED,
            max_launch_speed: MAX_LAUNCH_SPEED,
            meteor_lifetime: METEOR_LIFETIME,
            spawn_height: SPAWN_HEIGHT,
            spawn_spread_radius: SPAWN_SPREAD_RADIUS,
            // Spawn: ambient
            ambient_kinds: vec!["wisp".into(), "stony".into()],
            ambient_spawn_interval: AMBIENT_SPAWN_INTERVAL,
            ambient_deviation_deg: AMBIENT_DEVIATION_DEG,
            // Spawn: assault
            assault_kinds: vec!["stony".into(), "iron".into(), "icy".into()],
            assault_spawn_interval: ASSAULT_SPAWN_INTERVAL,
            assault_deviation_deg: ASSAULT_DEVIATION_DEG,
            // Spawn: volley
            volley_count: VOLLEY_COUNT,
            volley_interval: VOLLEY_INTERVAL,
            volley_plane_half_x: VOLLEY_PLANE_HALF_X,
            volley_plane_half_z: VOLLEY_PLANE_HALF_Z,
            volley_deviation_deg: VOLLEY_DEVIATION_DEG,
            // Impacts
            impact_speed_threshold: IMPACT_SPEED_THRESHOLD,
            impact_score_award: IMPACT_SCORE_AWARD,
            defense_core_radius: DEFENSE_CORE_RADIUS,
        }
    }
}

impl GameConfig {
    /// Validate the final configuration after any TOML overrides.
    ///
    /// Empty kind sets are *not* rejected here: they are a per-profile
    /// configuration error caught when the affected spawn loop starts, so a
    /// deliberately empty ambient set still allows play sessions to run.
    pub fn validate(&self) -> GameResult<()> {
        if self.max_lives <= 0 {
            return Err(GameError::InvalidConfig {
                name: "max_lives",
                value: self.max_lives as f32,
                safe_range: "[1, ∞)",
            });
        }
        if self.max_waves == 0 {
            return Err(GameError::InvalidConfig {
                name: "max_waves",
                value: 0.0,
                safe_range: "[1, ∞)",
            });
        }
        validate_speed_range(
            "launch_speed",
            self.min_launch_speed,
            self.max_launch_speed,
        )?;
        validate_non_negative("meteor_lifetime", self.meteor_lifetime)?;
        validate_non_negative("ambient_spawn_interval", self.ambient_spawn_interval)?;
        validate_non_negative("assault_spawn_interval", self.assault_spawn_interval)?;
        validate_non_negative("volley_interval", self.volley_interval)?;
        validate_non_negative("ambient_deviation_deg", self.ambient_deviation_deg)?;
        validate_non_negative("assault_deviation_deg", self.assault_deviation_deg)?;
        validate_non_negative("volley_deviation_deg", self.volley_deviation_deg)?;
        validate_non_negative("spawn_spread_radius", self.spawn_spread_radius)?;
        validate_non_negative("impact_speed_threshold", self.impact_speed_threshold)?;
        Ok(())
    }
}

/// Startup system: attempt to load `assets/game.toml` and overwrite the
/// `GameConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults. TOML parse errors are logged
/// but do not abort the run (defaults stand in). A missing file is silently
/// ignored. Invalid *values*, however, are a hard stop.
pub fn load_game_config(mut config: ResMut<GameConfig>) {
    let path = "assets/game.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<GameConfig>(&contents) {
            Ok(loaded) => {
                *config = loaded;
                info!("Loaded game config from {path}");
            }
            Err(e) => {
                warn!("Failed to parse {path}: {e}; using defaults");
            }
        },
        Err(_) => {
            info!("No {path} found; using compiled defaults");
        }
    }

    if let Err(e) = config.validate() {
        panic!("invalid game configuration: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn non_positive_max_lives_is_rejected() {
        let mut config = GameConfig::default();
        config.max_lives = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_launch_speed_range_is_rejected() {
        let mut config = GameConfig::default();
        config.min_launch_speed = 200.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_overrides_only_named_keys() {
        let loaded: GameConfig = toml::from_str("max_lives = 3\n").unwrap();
        assert_eq!(loaded.max_lives, 3);
        assert_eq!(loaded.max_waves, GameConfig::default().max_waves);
    }
}
