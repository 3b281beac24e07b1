//! Mode-reactive spawn controller: continuous meteor generation with
//! aimed-trajectory computation and lifecycle tracking.
//!
//! The controller owns at most one [`SpawnLoop`] at a time. Session state
//! transitions (delivered through [`SessionEvent::StateChanged`]) cancel the
//! in-flight loop, clear the [`ActiveMeteors`] registry, and arm the profile
//! for the new state; `Paused` instead suspends the loop and every lifetime
//! timer in place so resuming continues exactly where play stopped.
//!
//! Each spawn performs the full launch sequence atomically within one tick:
//! sample a position from the profile geometry, pick a kind, materialize the
//! rigid body, aim at the target, deviate within the aim cone, assign linear
//! velocity and tumble, register the meteor, and schedule its expiry. A
//! configuration error mid-sequence (unknown kind, archetype without a rigid
//! body) halts the whole loop with a diagnostic and leaves everything already
//! spawned untouched.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::Rng;

use crate::config::GameConfig;
use crate::constants::MAX_TUMBLE_SPEED;
use crate::error::{GameError, GameResult};
use crate::geometry;
use crate::profile::{MeteorCatalog, SpawnProfile};
use crate::registry::{sweep_registry_system, ActiveMeteors};
use crate::session::{GameSession, GameState, SessionEvent};

// ── Components ────────────────────────────────────────────────────────────────

/// Marker component for every spawned meteor.
#[derive(Component, Debug, Clone, Copy)]
pub struct Meteor;

/// The catalog kind this meteor was materialized from.
#[derive(Component, Debug, Clone)]
pub struct MeteorKind(pub String);

/// Forced-expiry countdown; the meteor is despawned and deregistered when it
/// elapses, unless an impact removed it earlier.
#[derive(Component, Debug)]
pub struct MeteorLifetime {
    pub timer: Timer,
}

// ── Spawn loop ────────────────────────────────────────────────────────────────

/// A cancelable scheduled spawn task.
///
/// `remaining: None` loops indefinitely until canceled; `Some(n)` spawns
/// exactly `n` meteors and stops, with no trailing interval wait. The timer
/// is pre-elapsed so the first meteor launches on the first tick after the
/// loop is armed.
#[derive(Debug)]
pub struct SpawnLoop {
    pub profile: SpawnProfile,
    timer: Timer,
    remaining: Option<u32>,
}

impl SpawnLoop {
    fn new(profile: SpawnProfile, remaining: Option<u32>) -> Self {
        let interval = profile.interval.max(0.0);
        let mut timer = Timer::from_seconds(interval, TimerMode::Repeating);
        let full = timer.duration();
        timer.set_elapsed(full);
        Self {
            profile,
            timer,
            remaining,
        }
    }

    fn continuous(profile: SpawnProfile) -> Self {
        Self::new(profile, None)
    }

    fn finite(profile: SpawnProfile, count: u32) -> Self {
        Self::new(profile, Some(count))
    }
}

/// The spawn controller resource.
#[derive(Resource, Debug, Default)]
pub struct MeteorSpawner {
    active: Option<SpawnLoop>,
    suspended: bool,
    last_error: Option<GameError>,
}

impl MeteorSpawner {
    /// Arm a continuous loop for `profile`, replacing any loop in flight.
    /// Fails (and stays idle) on an invalid profile.
    pub fn start(&mut self, profile: SpawnProfile) -> GameResult<()> {
        profile.validate()?;
        self.active = Some(SpawnLoop::continuous(profile));
        self.last_error = None;
        Ok(())
    }

    /// Arm a finite loop that spawns exactly `count` meteors and stops.
    /// Replaces any loop in flight; already-spawned meteors are untouched.
    pub fn start_volley(&mut self, profile: SpawnProfile, count: u32) -> GameResult<()> {
        profile.validate()?;
        self.active = Some(SpawnLoop::finite(profile, count));
        self.last_error = None;
        Ok(())
    }

    /// Cancel the in-flight loop, if any. Observed at the next tick; never
    /// interrupts a spawn mid-sequence.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// Record a fatal loop error and go idle.
    fn halt(&mut self, error: GameError) {
        self.active = None;
        self.last_error = Some(error);
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Profile of the loop currently in flight, if any.
    pub fn current_profile(&self) -> Option<&SpawnProfile> {
        self.active.as_ref().map(|spawn_loop| &spawn_loop.profile)
    }

    /// The configuration error that halted the last loop, if any.
    pub fn last_error(&self) -> Option<&GameError> {
        self.last_error.as_ref()
    }
}

/// Profile selection per session state.
///
/// `Menu` and `Playing` are the spawning states; `GameOver` and `Victory`
/// cease spawning entirely (no profile, no loop, immediately idle). `Paused`
/// never reaches profile selection — it is handled as suspension so the
/// registry and loop survive the freeze.
pub fn profile_for_state(state: GameState, config: &GameConfig) -> Option<SpawnProfile> {
    match state {
        GameState::Menu => Some(SpawnProfile::ambient(config)),
        GameState::Playing => Some(SpawnProfile::assault(config)),
        GameState::Paused | GameState::GameOver | GameState::Victory => None,
    }
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Startup system: arm the loop for the session's initial state without
/// waiting for a transition notification.
pub fn arm_initial_profile(
    mut spawner: ResMut<MeteorSpawner>,
    session: Res<GameSession>,
    config: Res<GameConfig>,
) {
    if let Some(profile) = profile_for_state(session.state(), &config) {
        let label = profile.label;
        if let Err(e) = spawner.start(profile) {
            error!("cannot arm initial '{label}' spawn loop: {e}");
            spawner.halt(e);
        }
    }
}

/// React to session state transitions.
///
/// Entering `Paused` suspends the loop and timers in place; returning to
/// `Playing` from `Paused` resumes them. Every other transition cancels the
/// loop, destroys all tracked meteors, and arms the new state's profile (an
/// invalid profile is logged and leaves the spawner idle).
pub fn react_to_session_system(
    mut events: MessageReader<SessionEvent>,
    mut spawner: ResMut<MeteorSpawner>,
    mut registry: ResMut<ActiveMeteors>,
    mut commands: Commands,
    live: Query<Entity, With<Meteor>>,
    config: Res<GameConfig>,
) {
    for event in events.read() {
        let SessionEvent::StateChanged { from, to } = *event else {
            continue;
        };

        if to == GameState::Paused {
            spawner.suspended = true;
            continue;
        }
        if from == GameState::Paused && to == GameState::Playing {
            spawner.suspended = false;
            continue;
        }

        spawner.suspended = false;
        spawner.cancel();
        registry.clear_all(&mut commands, &live);

        if let Some(profile) = profile_for_state(to, &config) {
            let label = profile.label;
            if let Err(e) = spawner.start(profile) {
                error!("spawn loop '{label}' not started: {e}");
                spawner.halt(e);
            }
        }
    }
}

/// Tick the interval timer and run the launch sequence for every spawn that
/// came due this frame. Suspended while paused.
pub fn spawn_tick_system(
    time: Res<Time>,
    mut commands: Commands,
    mut spawner: ResMut<MeteorSpawner>,
    mut registry: ResMut<ActiveMeteors>,
    catalog: Res<MeteorCatalog>,
) {
    if spawner.suspended {
        return;
    }

    let mut halt_error = None;
    let mut exhausted = false;

    if let Some(spawn_loop) = spawner.active.as_mut() {
        spawn_loop.timer.tick(time.delta());

        // A zero interval means "every tick", not "unboundedly many": the
        // repeating timer would otherwise report u32::MAX expirations.
        let mut due = if spawn_loop.profile.interval <= f32::EPSILON {
            1
        } else {
            spawn_loop.timer.times_finished_this_tick()
        };
        if let Some(remaining) = spawn_loop.remaining {
            due = due.min(remaining);
        }

        let mut rng = rand::thread_rng();
        for _ in 0..due {
            match spawn_meteor(&mut commands, &spawn_loop.profile, &catalog, &mut rng) {
                Ok(entity) => {
                    registry.track(entity, time.elapsed_secs_f64());
                    if let Some(remaining) = spawn_loop.remaining.as_mut() {
                        *remaining -= 1;
                    }
                }
                Err(e) => {
                    halt_error = Some(e);
                    break;
                }
            }
        }

        exhausted = spawn_loop.remaining == Some(0);
    }

    if let Some(e) = halt_error {
        error!("spawn loop halted: {e}");
        spawner.halt(e);
    } else if exhausted {
        spawner.cancel();
    }
}

/// Steps 1–7 of the launch sequence, atomic from the scheduler's point of
/// view. Returns the spawned entity or the configuration error that makes
/// the loop unrunnable.
fn spawn_meteor<R: Rng>(
    commands: &mut Commands,
    profile: &SpawnProfile,
    catalog: &MeteorCatalog,
    rng: &mut R,
) -> GameResult<Entity> {
    let position = profile.geometry.sample(rng);

    let kind = profile.kinds[rng.gen_range(0..profile.kinds.len())].clone();
    let archetype = catalog.get(&kind)?;
    let body = archetype.body.ok_or_else(|| GameError::MissingRigidBody {
        kind: kind.clone(),
    })?;

    let base = geometry::aim_at(position, profile.target);
    let direction = geometry::deviate_within_cone(base, profile.deviation_deg, rng);
    let speed = rng.gen_range(profile.speed_min..=profile.speed_max);

    let entity = commands
        .spawn((
            (
                Transform::from_translation(position),
                GlobalTransform::default(),
                Meteor,
                MeteorKind(kind),
                MeteorLifetime {
                    timer: Timer::from_seconds(profile.lifetime, TimerMode::Once),
                },
            ),
            (
                RigidBody::Dynamic,
                Collider::ball(body.radius),
                ColliderMassProperties::Density(body.density),
                Restitution::coefficient(body.restitution),
                Friction::coefficient(body.friction),
                Velocity {
                    linvel: direction * speed,
                    angvel: geometry::random_tumble(rng, MAX_TUMBLE_SPEED),
                },
                ActiveEvents::COLLISION_EVENTS,
                Sleeping::disabled(),
            ),
        ))
        .id();

    Ok(entity)
}

/// Age every meteor's lifetime and despawn + deregister on expiry. Frozen
/// while the spawner is suspended, so pausing extends every lifetime by the
/// paused duration.
pub fn meteor_lifetime_system(
    time: Res<Time>,
    mut commands: Commands,
    spawner: Res<MeteorSpawner>,
    mut registry: ResMut<ActiveMeteors>,
    mut meteors: Query<(Entity, &mut MeteorLifetime), With<Meteor>>,
) {
    if spawner.suspended {
        return;
    }
    for (entity, mut lifetime) in meteors.iter_mut() {
        lifetime.timer.tick(time.delta());
        if lifetime.timer.just_finished() {
            let _ = registry.forget(entity);
            commands.entity(entity).despawn();
        }
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Registers the spawn controller, the meteor registry, the archetype
/// catalog, and the per-frame spawn pipeline. Requires
/// [`crate::session::SessionPlugin`].
pub struct SpawnerPlugin;

impl Plugin for SpawnerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MeteorSpawner>()
            .init_resource::<ActiveMeteors>()
            .init_resource::<MeteorCatalog>()
            .add_systems(
                Startup,
                arm_initial_profile.after(crate::session::init_session),
            )
            .add_systems(
                Update,
                (
                    react_to_session_system,
                    spawn_tick_system,
                    meteor_lifetime_system,
                    sweep_registry_system,
                )
                    .chain(),
            );
    }
}
