//! Game-specific error types.
//!
//! Configuration problems surface through these types rather than panics
//! inside the spawn loop: a bad archetype or an empty kind set halts the
//! affected loop with a diagnostic instead of corrupting session state.

use std::fmt;

/// Top-level error enum for the meteor-defense runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    /// A spawn profile was configured with no spawnable meteor kinds.
    /// This is a configuration error, never a silent skip.
    EmptyKindSet {
        /// Profile label (for logging).
        profile: &'static str,
    },

    /// A profile referenced a meteor kind that is not in the catalog.
    UnknownKind {
        /// The kind identifier that failed to resolve.
        kind: String,
    },

    /// A meteor archetype lacks the rigid-body parameters needed for
    /// velocity assignment. Fatal to the whole spawn loop: nothing already
    /// spawned is destroyed, but no further meteors are produced until a new
    /// profile is selected.
    MissingRigidBody {
        /// The offending archetype's kind identifier.
        kind: String,
    },

    /// A configuration value is outside its safe operating range.
    /// Detected at startup; the app hard-stops rather than running with it.
    InvalidConfig {
        /// Name of the setting (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::EmptyKindSet { profile } => {
                write!(f, "spawn profile '{}' has an empty meteor-kind set", profile)
            }
            GameError::UnknownKind { kind } => {
                write!(f, "meteor kind '{}' is not in the archetype catalog", kind)
            }
            GameError::MissingRigidBody { kind } => write!(
                f,
                "meteor archetype '{}' has no rigid-body parameters; cannot assign velocity",
                kind
            ),
            GameError::InvalidConfig {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "config value '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
        }
    }
}

impl std::error::Error for GameError {}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `value` is non-negative.
pub fn validate_non_negative(name: &'static str, value: f32) -> GameResult<()> {
    if value < 0.0 {
        Err(GameError::InvalidConfig {
            name,
            value,
            safe_range: "[0.0, ∞)",
        })
    } else {
        Ok(())
    }
}

/// Returns an error unless `min ≤ max` describes a usable speed range.
pub fn validate_speed_range(name: &'static str, min: f32, max: f32) -> GameResult<()> {
    if min < 0.0 || max < min {
        Err(GameError::InvalidConfig {
            name,
            value: max,
            safe_range: "0.0 ≤ min ≤ max",
        })
    } else {
        Ok(())
    }
}
