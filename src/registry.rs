//! Active meteor registry: the live tracking set of currently-spawned,
//! not-yet-removed meteors.
//!
//! The registry owns handles, not entities: meteors can be despawned by any
//! collaborator (impact systems, lifetime expiry, mode switches) without
//! going through the registry first. Iteration therefore never assumes an
//! entry's entity still exists — a dangling handle is treated as already
//! removed, and the periodic [`sweep_registry_system`] drops such entries.

use bevy::prelude::*;

use crate::spawner::Meteor;

/// One registry entry: an opaque handle plus its creation timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedMeteor {
    pub entity: Entity,
    /// Seconds of app time when the meteor was spawned.
    pub spawned_at: f64,
}

/// Registry of meteors created by the spawn controller.
#[derive(Resource, Debug, Clone, Default)]
pub struct ActiveMeteors {
    entries: Vec<TrackedMeteor>,
}

impl ActiveMeteors {
    /// Register a freshly spawned meteor.
    pub fn track(&mut self, entity: Entity, spawned_at: f64) {
        self.entries.push(TrackedMeteor { entity, spawned_at });
    }

    /// Remove a meteor's entry. Returns `true` the first time and `false`
    /// thereafter, so removal paths (expiry, impact, sweep) can race without
    /// double-processing.
    pub fn forget(&mut self, entity: Entity) -> bool {
        let before = self.entries.len();
        self.entries.retain(|tracked| tracked.entity != entity);
        self.entries.len() != before
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.entries.iter().any(|tracked| tracked.entity == entity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedMeteor> {
        self.entries.iter()
    }

    /// Destroy every still-live tracked meteor and empty the registry.
    ///
    /// Despawns are query-backed: entries whose entity is already gone are
    /// simply dropped, never an error.
    pub fn clear_all(&mut self, commands: &mut Commands, live: &Query<Entity, With<Meteor>>) {
        for tracked in self.entries.drain(..) {
            if live.get(tracked.entity).is_ok() {
                commands.entity(tracked.entity).despawn();
            }
        }
    }

    /// Drop entries whose entity no longer exists.
    pub fn sweep(&mut self, live: &Query<Entity, With<Meteor>>) {
        self.entries.retain(|tracked| live.get(tracked.entity).is_ok());
    }
}

/// Per-frame sweep: external collaborators may destroy meteors at any time;
/// their registry entries are reaped here.
pub fn sweep_registry_system(
    mut registry: ResMut<ActiveMeteors>,
    live: Query<Entity, With<Meteor>>,
) {
    registry.sweep(&live);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_entity(world: &mut World) -> Entity {
        world.spawn_empty().id()
    }

    #[test]
    fn forget_removes_exactly_once() {
        let mut world = World::new();
        let entity = scratch_entity(&mut world);
        let mut registry = ActiveMeteors::default();
        registry.track(entity, 1.0);

        assert!(registry.contains(entity));
        assert!(registry.forget(entity));
        assert!(!registry.forget(entity));
        assert!(registry.is_empty());
    }

    #[test]
    fn forget_of_untracked_entity_is_harmless() {
        let mut world = World::new();
        let entity = scratch_entity(&mut world);
        let mut registry = ActiveMeteors::default();
        assert!(!registry.forget(entity));
    }

    #[test]
    fn entries_keep_creation_timestamps() {
        let mut world = World::new();
        let entity = scratch_entity(&mut world);
        let mut registry = ActiveMeteors::default();
        registry.track(entity, 12.5);
        let tracked = registry.iter().next().unwrap();
        assert_eq!(tracked.entity, entity);
        assert_eq!(tracked.spawned_at, 12.5);
    }
}
