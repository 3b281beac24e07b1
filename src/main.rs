use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier3d::prelude::*;

use meteorfall::config::GameConfig;
use meteorfall::impact::{spawn_defense_core, ImpactPlugin};
use meteorfall::profile::SpawnProfile;
use meteorfall::session::{GameSession, GameState, SessionPlugin};
use meteorfall::spawner::{MeteorSpawner, SpawnerPlugin};

/// Stand-in for the out-of-scope UI layer: keyboard shortcuts that drive the
/// same session mutators a menu would.
///
/// Space starts a session, P pauses, R restarts after GameOver/Victory, N
/// advances the wave, V fires a one-shot volley, 1/2/3 pick a difficulty.
fn debug_controls_system(
    keys: Res<ButtonInput<KeyCode>>,
    mut session: ResMut<GameSession>,
    mut spawner: ResMut<MeteorSpawner>,
    config: Res<GameConfig>,
) {
    if keys.just_pressed(KeyCode::Space) {
        session.set_state(GameState::Playing);
    }
    if keys.just_pressed(KeyCode::KeyP) {
        session.toggle_pause();
    }
    if keys.just_pressed(KeyCode::KeyR) {
        session.restart();
    }
    if keys.just_pressed(KeyCode::KeyN) {
        session.advance_wave();
    }
    if keys.just_pressed(KeyCode::KeyV) {
        if let Err(e) = spawner.start_volley(SpawnProfile::volley(&config), config.volley_count) {
            error!("volley not started: {e}");
        }
    }
    if keys.just_pressed(KeyCode::Digit1) {
        session.set_difficulty(0.0);
    }
    if keys.just_pressed(KeyCode::Digit2) {
        session.set_difficulty(0.5);
    }
    if keys.just_pressed(KeyCode::Digit3) {
        session.set_difficulty(1.0);
    }
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Meteorfall".into(),
                resolution: WindowResolution::new(1200, 680),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::BLACK))
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        .add_plugins((SessionPlugin, SpawnerPlugin, ImpactPlugin))
        .add_systems(
            Startup,
            spawn_defense_core.after(meteorfall::config::load_game_config),
        )
        .add_systems(Update, debug_controls_system)
        .run();
}
