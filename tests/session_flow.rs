//! Headless tests for the session notification channel.
//!
//! These use [`MinimalPlugins`] — no window, no rendering, no physics — and a
//! collector system subscribed through `MessageReader<SessionEvent>`, the
//! same way any UI consumer would listen.

use bevy::prelude::*;
use meteorfall::session::{GameSession, GameState, SessionEvent, SessionPlugin};

#[derive(Resource, Default)]
struct SeenEvents(Vec<SessionEvent>);

fn collect_events(mut reader: MessageReader<SessionEvent>, mut seen: ResMut<SeenEvents>) {
    for event in reader.read() {
        seen.0.push(*event);
    }
}

fn session_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(SessionPlugin);
    app.init_resource::<SeenEvents>();
    app.add_systems(Update, collect_events);
    app.update(); // run Startup; session is now armed in Menu
    app
}

fn seen(app: &mut App) -> Vec<SessionEvent> {
    std::mem::take(&mut app.world_mut().resource_mut::<SeenEvents>().0)
}

#[test]
fn game_start_notifications_arrive_in_contract_order() {
    let mut app = session_app();
    let _ = seen(&mut app);

    app.world_mut()
        .resource_mut::<GameSession>()
        .set_state(GameState::Playing);
    app.update();

    assert_eq!(
        seen(&mut app),
        vec![
            SessionEvent::ScoreChanged(0),
            SessionEvent::LivesChanged(10),
            SessionEvent::WaveChanged(1),
            SessionEvent::GameStart,
            SessionEvent::StateChanged {
                from: GameState::Menu,
                to: GameState::Playing
            },
        ]
    );
}

#[test]
fn self_transition_forwards_nothing() {
    let mut app = session_app();
    app.world_mut()
        .resource_mut::<GameSession>()
        .set_state(GameState::Playing);
    app.update();
    let _ = seen(&mut app);

    app.world_mut()
        .resource_mut::<GameSession>()
        .set_state(GameState::Playing);
    app.update();

    assert!(seen(&mut app).is_empty());
}

#[test]
fn difficulty_scaled_score_is_observable_through_the_channel() {
    let mut app = session_app();
    {
        let mut session = app.world_mut().resource_mut::<GameSession>();
        session.set_state(GameState::Playing);
        session.set_difficulty(0.5);
        session.add_score(10);
    }
    app.update();

    let events = seen(&mut app);
    assert!(events.contains(&SessionEvent::ScoreChanged(15)));
    assert_eq!(app.world().resource::<GameSession>().score(), 15);
}

#[test]
fn lives_depletion_cascade_is_forwarded_in_order() {
    let mut app = session_app();
    app.world_mut()
        .resource_mut::<GameSession>()
        .set_state(GameState::Playing);
    app.update();
    let _ = seen(&mut app);

    app.world_mut()
        .resource_mut::<GameSession>()
        .add_lives(-10);
    app.update();

    assert_eq!(
        seen(&mut app),
        vec![
            SessionEvent::LivesChanged(0),
            SessionEvent::LivesDepleted,
            SessionEvent::GameOver,
            SessionEvent::StateChanged {
                from: GameState::Playing,
                to: GameState::GameOver
            },
        ]
    );
    assert_eq!(
        app.world().resource::<GameSession>().state(),
        GameState::GameOver
    );
}

#[test]
fn wave_overflow_forwards_victory() {
    let mut app = session_app();
    app.world_mut()
        .resource_mut::<GameSession>()
        .set_state(GameState::Playing);
    app.update();
    let _ = seen(&mut app);

    // Default max_waves is 5; jump straight to the end of the run.
    for _ in 0..5 {
        app.world_mut().resource_mut::<GameSession>().advance_wave();
    }
    app.update();

    let events = seen(&mut app);
    assert!(events.contains(&SessionEvent::Victory));
    assert_eq!(
        app.world().resource::<GameSession>().state(),
        GameState::Victory
    );
    assert_eq!(app.world().resource::<GameSession>().wave(), 6);
}
