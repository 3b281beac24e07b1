//! Spawn profiles and the meteor archetype catalog.
//!
//! A [`SpawnProfile`] bundles everything the spawn controller needs to run
//! one mode: which meteor kinds to draw from, how often, how fast, how far
//! off the aim line, where to materialize them, and how long they live.
//! Profiles are selected per session state and validated when the loop that
//! uses them is armed.

use std::collections::HashMap;

use bevy::prelude::*;
use rand::Rng;

use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::geometry;

/// Where a profile materializes meteors. Policy is fixed per profile, not
/// per call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnGeometry {
    /// Uniform over an XZ rectangle at the fixed elevation `center.y`.
    PlaneRect {
        center: Vec3,
        half_x: f32,
        half_z: f32,
    },
    /// Uniform within a ball around an anchor point.
    SphereAround { anchor: Vec3, radius: f32 },
}

impl SpawnGeometry {
    /// Draw one spawn position.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Vec3 {
        match *self {
            SpawnGeometry::PlaneRect {
                center,
                half_x,
                half_z,
            } => geometry::sample_plane_rect(center, half_x, half_z, rng),
            SpawnGeometry::SphereAround { anchor, radius } => {
                geometry::sample_in_sphere(anchor, radius, rng)
            }
        }
    }
}

/// Per-mode spawn configuration bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnProfile {
    /// Short label used in diagnostics ("ambient", "assault", "volley").
    pub label: &'static str,
    /// Non-empty set of spawnable archetype identifiers.
    pub kinds: Vec<String>,
    /// Seconds between spawns (≥ 0).
    pub interval: f32,
    /// Launch speed range, `speed_min ≤ speed_max`.
    pub speed_min: f32,
    pub speed_max: f32,
    /// Maximum aim-cone half-angle in degrees (≥ 0).
    pub deviation_deg: f32,
    /// Where meteors materialize.
    pub geometry: SpawnGeometry,
    /// Seconds until forced expiry (≥ 0).
    pub lifetime: f32,
    /// Fixed point every launch is aimed at.
    pub target: Vec3,
}

impl SpawnProfile {
    /// Background meteors shown while on the menu.
    pub fn ambient(config: &GameConfig) -> Self {
        Self {
            label: "ambient",
            kinds: config.ambient_kinds.clone(),
            interval: config.ambient_spawn_interval,
            speed_min: config.min_launch_speed,
            speed_max: config.max_launch_speed,
            deviation_deg: config.ambient_deviation_deg,
            geometry: SpawnGeometry::SphereAround {
                anchor: Vec3::new(0.0, config.spawn_height, 0.0),
                radius: config.spawn_spread_radius,
            },
            lifetime: config.meteor_lifetime,
            target: Vec3::ZERO,
        }
    }

    /// The live threat stream aimed at the defense core during play.
    pub fn assault(config: &GameConfig) -> Self {
        Self {
            label: "assault",
            kinds: config.assault_kinds.clone(),
            interval: config.assault_spawn_interval,
            speed_min: config.min_launch_speed,
            speed_max: config.max_launch_speed,
            deviation_deg: config.assault_deviation_deg,
            geometry: SpawnGeometry::SphereAround {
                anchor: Vec3::new(0.0, config.spawn_height, 0.0),
                radius: config.spawn_spread_radius,
            },
            lifetime: config.meteor_lifetime,
            target: Vec3::ZERO,
        }
    }

    /// One-shot barrage launched from a plane above the core; paired with a
    /// finite spawn count rather than an open-ended loop.
    pub fn volley(config: &GameConfig) -> Self {
        Self {
            label: "volley",
            kinds: config.assault_kinds.clone(),
            interval: config.volley_interval,
            speed_min: config.min_launch_speed,
            speed_max: config.max_launch_speed,
            deviation_deg: config.volley_deviation_deg,
            geometry: SpawnGeometry::PlaneRect {
                center: Vec3::new(0.0, config.spawn_height, 0.0),
                half_x: config.volley_plane_half_x,
                half_z: config.volley_plane_half_z,
            },
            lifetime: config.meteor_lifetime,
            target: Vec3::ZERO,
        }
    }

    /// Reject profiles that can never produce a valid meteor.
    ///
    /// An empty kind set is a configuration error, not a silent skip; range
    /// errors here catch TOML overrides that slipped past startup validation
    /// of the shared fields.
    pub fn validate(&self) -> GameResult<()> {
        if self.kinds.is_empty() {
            return Err(GameError::EmptyKindSet {
                profile: self.label,
            });
        }
        if self.interval < 0.0 {
            return Err(GameError::InvalidConfig {
                name: "interval",
                value: self.interval,
                safe_range: "[0.0, ∞)",
            });
        }
        if self.speed_min < 0.0 || self.speed_max < self.speed_min {
            return Err(GameError::InvalidConfig {
                name: "speed_range",
                value: self.speed_max,
                safe_range: "0.0 ≤ min ≤ max",
            });
        }
        if self.deviation_deg < 0.0 {
            return Err(GameError::InvalidConfig {
                name: "deviation_deg",
                value: self.deviation_deg,
                safe_range: "[0.0, ∞)",
            });
        }
        if self.lifetime < 0.0 {
            return Err(GameError::InvalidConfig {
                name: "lifetime",
                value: self.lifetime,
                safe_range: "[0.0, ∞)",
            });
        }
        Ok(())
    }
}

// ── Archetype catalog ─────────────────────────────────────────────────────────

/// Rigid-body parameters a meteor archetype needs for velocity assignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeteorBody {
    pub radius: f32,
    pub density: f32,
    pub restitution: f32,
    pub friction: f32,
}

/// A spawnable meteor archetype.
///
/// `body: None` models an archetype without the rigid-body capability — a
/// fatal configuration error for any spawn loop that selects it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeteorArchetype {
    pub body: Option<MeteorBody>,
}

/// Name → archetype lookup used by the spawn controller.
#[derive(Resource, Debug, Clone)]
pub struct MeteorCatalog {
    entries: HashMap<String, MeteorArchetype>,
}

impl Default for MeteorCatalog {
    fn default() -> Self {
        let mut entries = HashMap::new();
        let mut insert = |name: &str, radius: f32, density: f32, restitution: f32| {
            entries.insert(
                name.to_owned(),
                MeteorArchetype {
                    body: Some(MeteorBody {
                        radius,
                        density,
                        restitution,
                        friction: 0.8,
                    }),
                },
            );
        };
        insert("stony", 3.0, 2.5, 0.3);
        insert("iron", 2.2, 7.0, 0.2);
        insert("icy", 3.6, 1.0, 0.5);
        insert("wisp", 1.5, 0.4, 0.6);
        Self { entries }
    }
}

impl MeteorCatalog {
    /// Resolve a profile kind to its archetype.
    pub fn get(&self, kind: &str) -> GameResult<&MeteorArchetype> {
        self.entries.get(kind).ok_or_else(|| GameError::UnknownKind {
            kind: kind.to_owned(),
        })
    }

    /// Add or replace an archetype (used by tests and custom scenarios).
    pub fn insert(&mut self, kind: impl Into<String>, archetype: MeteorArchetype) {
        let _ = self.entries.insert(kind.into(), archetype);
    }
}
