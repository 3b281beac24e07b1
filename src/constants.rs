//! Centralised gameplay and spawn constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! `GameConfig::default()` mirrors every constant; `assets/game.toml` can
//! override any subset at startup.

// ── Session ───────────────────────────────────────────────────────────────────

/// Lives granted at the start of every `Playing` session.
///
/// Each meteor that reaches the defense core costs one life; the session ends
/// when the count reaches zero.
pub const MAX_LIVES: i32 = 10;

/// Wave number past which the session transitions to `Victory`.
///
/// `advance_wave` increments the counter; the transition fires when the new
/// value exceeds this maximum.
pub const MAX_WAVES: u32 = 5;

/// Starting difficulty multiplier.
///
/// Score deltas are scaled by `1 + difficulty` at the moment they are applied,
/// so `0.0` means no scaling. The UI slider maps onto `set_difficulty`.
pub const STARTING_DIFFICULTY: f32 = 0.0;

// ── Spawn: shared ─────────────────────────────────────────────────────────────

/// Minimum launch speed (world units / s) sampled for each meteor.
pub const MIN_LAUNCH_SPEED: f32 = 50.0;

/// Maximum launch speed (world units / s) sampled for each meteor.
///
/// Must be ≥ `MIN_LAUNCH_SPEED`; validated at startup.
pub const MAX_LAUNCH_SPEED: f32 = 150.0;

/// Seconds until a spawned meteor is force-expired and deregistered.
///
/// Long enough that meteors normally die to impacts first; the expiry is a
/// backstop against strays that miss the core entirely.
pub const METEOR_LIFETIME: f32 = 120.0;

/// Upper bound on the magnitude of the random tumble (angular velocity,
/// rad/s) assigned at launch. Purely cosmetic; independent of linear speed.
pub const MAX_TUMBLE_SPEED: f32 = 5.0;

/// Elevation (Y, world units) of the spawn anchor above the defended origin.
pub const SPAWN_HEIGHT: f32 = 160.0;

/// Radius of the spherical spawn offset around the anchor point.
///
/// Small relative to `SPAWN_HEIGHT` so consecutive meteors do not overlap at
/// birth but still launch from roughly the same bearing.
pub const SPAWN_SPREAD_RADIUS: f32 = 12.0;

// ── Spawn: ambient (Menu) profile ─────────────────────────────────────────────

/// Seconds between ambient meteor spawns while on the menu.
pub const AMBIENT_SPAWN_INTERVAL: f32 = 0.5;

/// Aim-cone half-angle (degrees) for ambient meteors. Wide, for visual
/// variety — these are background dressing, not threats.
pub const AMBIENT_DEVIATION_DEG: f32 = 30.0;

// ── Spawn: assault (Playing) profile ──────────────────────────────────────────

/// Seconds between assault meteor spawns during play.
pub const ASSAULT_SPAWN_INTERVAL: f32 = 1.0;

/// Aim-cone half-angle (degrees) for assault meteors.
///
/// Tested range: 10–45. Wider cones miss the core more often, which starves
/// the player of scoring impacts; narrower cones make every meteor a threat.
pub const ASSAULT_DEVIATION_DEG: f32 = 30.0;

// ── Spawn: volley (finite one-shot) profile ───────────────────────────────────

/// Number of meteors launched by a single volley.
pub const VOLLEY_COUNT: u32 = 20;

/// Seconds between consecutive meteors within a volley.
pub const VOLLEY_INTERVAL: f32 = 0.5;

/// Half-extent (X, world units) of the volley spawn rectangle.
pub const VOLLEY_PLANE_HALF_X: f32 = 40.0;

/// Half-extent (Z, world units) of the volley spawn rectangle.
pub const VOLLEY_PLANE_HALF_Z: f32 = 40.0;

/// Aim-cone half-angle (degrees) for volley meteors. Kept tight so the
/// volley reads as a coordinated barrage.
pub const VOLLEY_DEVIATION_DEG: f32 = 5.0;

// ── Impacts ───────────────────────────────────────────────────────────────────

/// Relative impact speed (world units / s) above which a meteor collision
/// counts as a destructive hit: the meteor is destroyed and score is awarded.
///
/// Below this threshold contacts are glancing and ignored.
pub const IMPACT_SPEED_THRESHOLD: f32 = 50.0;

/// Base score awarded per destructive impact, before the difficulty
/// multiplier is applied.
pub const IMPACT_SCORE_AWARD: i32 = 10;

/// Radius of the defense core's collider at the origin.
pub const DEFENSE_CORE_RADIUS: f32 = 8.0;
