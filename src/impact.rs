//! Impact handlers: the collision-side consumers of the session mutators.
//!
//! Collision detection itself belongs to Rapier; these systems only interpret
//! its [`CollisionEvent`]s. A fast meteor impact anywhere destroys the meteor
//! and awards score; a meteor reaching the defense core costs a life. Both
//! paths call straight into [`GameSession`], whose own gating decides whether
//! the mutation takes effect.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::config::GameConfig;
use crate::registry::ActiveMeteors;
use crate::session::GameSession;
use crate::spawner::Meteor;

/// Marker for the defended structure at the world origin.
#[derive(Component, Debug, Clone, Copy)]
pub struct DefenseCore;

/// Startup system: place the defense core as a fixed body at the origin so
/// every spawn profile's aim line has something to hit.
pub fn spawn_defense_core(mut commands: Commands, config: Res<GameConfig>) {
    let _ = commands.spawn((
        Transform::from_translation(Vec3::ZERO),
        GlobalTransform::default(),
        DefenseCore,
        RigidBody::Fixed,
        Collider::ball(config.defense_core_radius),
        ActiveEvents::COLLISION_EVENTS,
    ));
}

/// A meteor contacting the defense core costs one life. The session's own
/// depletion check cascades into `GameOver` when the last life goes.
pub fn core_breach_system(
    mut collision_events: MessageReader<CollisionEvent>,
    mut session: ResMut<GameSession>,
    cores: Query<(), With<DefenseCore>>,
    meteors: Query<(), With<Meteor>>,
) {
    for event in collision_events.read() {
        let (e1, e2) = match event {
            CollisionEvent::Started(e1, e2, _) => (*e1, *e2),
            CollisionEvent::Stopped(..) => continue,
        };

        let breach = (cores.get(e1).is_ok() && meteors.get(e2).is_ok())
            || (cores.get(e2).is_ok() && meteors.get(e1).is_ok());
        if breach {
            session.add_lives(-1);
        }
    }
}

/// Destroy meteors whose collisions are fast enough to count, and award
/// score for each. Relative impact speed comes from the two bodies' linear
/// velocities; a fixed body contributes zero.
pub fn impact_destroyer_system(
    mut commands: Commands,
    mut collision_events: MessageReader<CollisionEvent>,
    mut session: ResMut<GameSession>,
    mut registry: ResMut<ActiveMeteors>,
    config: Res<GameConfig>,
    meteors: Query<(), With<Meteor>>,
    velocities: Query<&Velocity>,
) {
    for event in collision_events.read() {
        let (e1, e2) = match event {
            CollisionEvent::Started(e1, e2, _) => (*e1, *e2),
            CollisionEvent::Stopped(..) => continue,
        };

        let linvel = |entity: Entity| {
            velocities
                .get(entity)
                .map(|velocity| velocity.linvel)
                .unwrap_or(Vec3::ZERO)
        };
        let relative_speed = (linvel(e1) - linvel(e2)).length();
        if relative_speed <= config.impact_speed_threshold {
            continue;
        }

        for entity in [e1, e2] {
            // `forget` returning false means another event already consumed
            // this meteor this frame; skip the duplicate despawn.
            if meteors.get(entity).is_ok() && registry.forget(entity) {
                session.add_score(config.impact_score_award);
                commands.entity(entity).despawn();
            }
        }
    }
}

/// Registers the impact handlers after the physics step, in the order
/// breach-then-destroy so a core hit both costs the life and clears the
/// meteor in the same frame.
pub struct ImpactPlugin;

impl Plugin for ImpactPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            PostUpdate,
            (core_breach_system, impact_destroyer_system).chain(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::GameState;

    fn impact_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<GameConfig>();
        app.init_resource::<ActiveMeteors>();
        app.add_message::<CollisionEvent>();

        let mut session = GameSession::new(10, 3, 0.0);
        session.set_state(GameState::Playing);
        let _ = session.drain_events().count();
        app.insert_resource(session);

        app.add_systems(
            PostUpdate,
            (core_breach_system, impact_destroyer_system).chain(),
        );
        app
    }

    fn write_started(app: &mut App, e1: Entity, e2: Entity) {
        let _ = app.world_mut().write_message(CollisionEvent::Started(
            e1,
            e2,
            bevy_rapier3d::rapier::geometry::CollisionEventFlags::empty(),
        ));
    }

    #[test]
    fn core_breach_costs_one_life() {
        let mut app = impact_test_app();
        let core = app.world_mut().spawn(DefenseCore).id();
        let meteor = app.world_mut().spawn(Meteor).id();

        write_started(&mut app, core, meteor);
        app.update();

        assert_eq!(app.world().resource::<GameSession>().lives(), 9);
    }

    #[test]
    fn fast_impact_destroys_meteor_and_awards_score() {
        let mut app = impact_test_app();
        let meteor = app
            .world_mut()
            .spawn((
                Meteor,
                Velocity {
                    linvel: Vec3::new(0.0, -120.0, 0.0),
                    angvel: Vec3::ZERO,
                },
            ))
            .id();
        let ground = app.world_mut().spawn_empty().id();
        app.world_mut()
            .resource_mut::<ActiveMeteors>()
            .track(meteor, 0.0);

        write_started(&mut app, meteor, ground);
        app.update();

        let session = app.world().resource::<GameSession>();
        assert_eq!(session.score(), 10);
        assert!(app.world().get_entity(meteor).is_err());
        assert!(app.world().resource::<ActiveMeteors>().is_empty());
    }

    #[test]
    fn glancing_impact_is_ignored() {
        let mut app = impact_test_app();
        let meteor = app
            .world_mut()
            .spawn((
                Meteor,
                Velocity {
                    linvel: Vec3::new(0.0, -10.0, 0.0),
                    angvel: Vec3::ZERO,
                },
            ))
            .id();
        let ground = app.world_mut().spawn_empty().id();
        app.world_mut()
            .resource_mut::<ActiveMeteors>()
            .track(meteor, 0.0);

        write_started(&mut app, meteor, ground);
        app.update();

        let session = app.world().resource::<GameSession>();
        assert_eq!(session.score(), 0);
        assert!(app.world().get_entity(meteor).is_ok());
    }
}
