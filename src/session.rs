//! Game session state machine: state, score, lives, difficulty, and wave
//! bookkeeping with synchronous notifications.
//!
//! [`GameSession`] is the single source of truth for game state. Mutators
//! apply their effect and enqueue [`SessionEvent`]s **before returning**, so
//! the struct field is authoritative the moment a caller gets control back —
//! there is no one-tick detection lag. The queue is forwarded to Bevy
//! [`Message`] readers once per frame by [`forward_session_events`]; readers
//! subscribe by taking a `MessageReader<SessionEvent>` parameter.
//!
//! ## Gating invariants
//!
//! - Score and lives mutation via `add_*` is a silent no-op outside
//!   [`GameState::Playing`].
//! - `lives ≤ 0` and `state == Playing` never coexist after a mutator
//!   returns: the depletion path transitions to `GameOver` internally.
//! - A self-transition (`set_state` to the current state) fires nothing and
//!   changes nothing.

use bevy::prelude::*;

use crate::config::GameConfig;
use crate::constants::{MAX_LIVES, MAX_WAVES, STARTING_DIFFICULTY};

/// Top-level session state machine variants.
///
/// `Playing` is the only state in which score/lives mutators take effect;
/// `GameOver` and `Victory` are terminal until an explicit [`GameSession::restart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Main menu; ambient meteors only.
    #[default]
    Menu,
    /// Active play session.
    Playing,
    /// Frozen mid-session; all time-based progression suspends.
    Paused,
    /// Lives ran out.
    GameOver,
    /// The final wave was cleared.
    Victory,
}

/// Notification fan-out for every observable session change.
///
/// Ordering within one mutator call is part of the contract (for example
/// `LivesDepleted` precedes `GameOver`, which precedes the matching
/// `StateChanged`); the pending queue preserves insertion order and
/// [`forward_session_events`] writes it through unchanged.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    /// Generic transition notification; fired after any state-specific event.
    StateChanged { from: GameState, to: GameState },
    /// Menu → Playing, after score/lives/wave were reset.
    GameStart,
    /// Entered `GameOver` (explicitly or via lives depletion).
    GameOver,
    /// Entered `Victory` (explicitly or via wave overflow).
    Victory,
    /// Score changed; carries the new total.
    ScoreChanged(i32),
    /// Lives changed; carries the new count.
    LivesChanged(i32),
    /// Lives reached ≤ 0; fired before the automatic `GameOver` events.
    LivesDepleted,
    /// Difficulty multiplier changed; carries the new value.
    DifficultyChanged(f32),
    /// Wave counter changed; carries the new wave number.
    WaveChanged(u32),
}

/// The session resource: game state plus score/lives/difficulty/wave
/// bookkeeping and the pending notification queue.
#[derive(Resource, Debug, Clone)]
pub struct GameSession {
    state: GameState,
    score: i32,
    lives: i32,
    difficulty: f32,
    wave: u32,
    max_lives: i32,
    max_waves: u32,
    pending: Vec<SessionEvent>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(MAX_LIVES, MAX_WAVES, STARTING_DIFFICULTY)
    }
}

impl GameSession {
    /// Build a session in `Menu` with the given limits.
    pub fn new(max_lives: i32, max_waves: u32, difficulty: f32) -> Self {
        Self {
            state: GameState::Menu,
            score: 0,
            lives: max_lives,
            difficulty,
            wave: 1,
            max_lives,
            max_waves,
            pending: Vec::new(),
        }
    }

    // ── Read accessors ───────────────────────────────────────────────────────

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn lives(&self) -> i32 {
        self.lives
    }

    pub fn difficulty(&self) -> f32 {
        self.difficulty
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn is_playing(&self) -> bool {
        self.state == GameState::Playing
    }

    // ── State machine ────────────────────────────────────────────────────────

    /// Transition to `new_state`.
    ///
    /// A self-transition is a no-op: no notification fires. Menu → Playing
    /// resets score, lives, and wave before firing `GameStart`. Every real
    /// transition ends with a `StateChanged` notification.
    pub fn set_state(&mut self, new_state: GameState) {
        if self.state == new_state {
            return;
        }

        let old_state = self.state;
        self.state = new_state;

        match new_state {
            GameState::Playing => {
                if old_state == GameState::Menu {
                    self.reset_game_data();
                    self.pending.push(SessionEvent::GameStart);
                }
            }
            GameState::GameOver => self.pending.push(SessionEvent::GameOver),
            GameState::Victory => self.pending.push(SessionEvent::Victory),
            GameState::Menu | GameState::Paused => {}
        }

        self.pending.push(SessionEvent::StateChanged {
            from: old_state,
            to: new_state,
        });
    }

    /// Playing ↔ Paused toggle. Does nothing in any other state.
    pub fn toggle_pause(&mut self) {
        match self.state {
            GameState::Playing => self.set_state(GameState::Paused),
            GameState::Paused => self.set_state(GameState::Playing),
            _ => {}
        }
    }

    /// Re-arm a finished session: GameOver/Victory → Menu. The next
    /// Menu → Playing transition performs the actual reset.
    pub fn restart(&mut self) {
        if matches!(self.state, GameState::GameOver | GameState::Victory) {
            self.set_state(GameState::Menu);
        }
    }

    // ── Score ────────────────────────────────────────────────────────────────

    /// Add (or subtract) score. No-op unless `Playing`.
    ///
    /// The applied delta is `round(delta × (1 + difficulty))` — the
    /// multiplier is baked in at the moment the points are recorded, never
    /// retroactively.
    pub fn add_score(&mut self, delta: i32) {
        if !self.is_playing() {
            return;
        }
        let applied = (delta as f32 * (1.0 + self.difficulty)).round() as i32;
        self.score += applied;
        self.pending.push(SessionEvent::ScoreChanged(self.score));
    }

    /// Set the score directly, bypassing the difficulty multiplier and the
    /// state gate. Used for resets.
    pub fn set_score(&mut self, value: i32) {
        self.score = value;
        self.pending.push(SessionEvent::ScoreChanged(self.score));
    }

    // ── Lives ────────────────────────────────────────────────────────────────

    /// Add (or subtract) lives. No-op unless `Playing`. Depleting lives
    /// fires `LivesDepleted` and transitions to `GameOver` before returning.
    pub fn add_lives(&mut self, delta: i32) {
        if !self.is_playing() {
            return;
        }
        self.lives += delta;
        self.pending.push(SessionEvent::LivesChanged(self.lives));
        self.check_lives_depleted();
    }

    /// Set lives directly, bypassing the state gate. The depletion check
    /// still applies.
    pub fn set_lives(&mut self, value: i32) {
        self.lives = value;
        self.pending.push(SessionEvent::LivesChanged(self.lives));
        self.check_lives_depleted();
    }

    fn check_lives_depleted(&mut self) {
        if self.lives <= 0 {
            self.pending.push(SessionEvent::LivesDepleted);
            self.set_state(GameState::GameOver);
        }
    }

    // ── Difficulty ───────────────────────────────────────────────────────────

    /// Set the difficulty multiplier. Allowed in any state; applies to score
    /// deltas recorded from now on.
    pub fn set_difficulty(&mut self, value: f32) {
        self.difficulty = value;
        self.pending
            .push(SessionEvent::DifficultyChanged(self.difficulty));
    }

    // ── Waves ────────────────────────────────────────────────────────────────

    /// Advance the wave counter. No-op unless `Playing`. Exceeding the
    /// configured maximum transitions to `Victory` before returning.
    pub fn advance_wave(&mut self) {
        if !self.is_playing() {
            return;
        }
        self.wave += 1;
        self.pending.push(SessionEvent::WaveChanged(self.wave));
        if self.wave > self.max_waves {
            self.set_state(GameState::Victory);
        }
    }

    // ── Notification queue ───────────────────────────────────────────────────

    /// Drain the pending notifications in insertion order.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, SessionEvent> {
        self.pending.drain(..)
    }

    fn reset_game_data(&mut self) {
        self.score = 0;
        self.lives = self.max_lives;
        self.wave = 1;
        self.pending.push(SessionEvent::ScoreChanged(self.score));
        self.pending.push(SessionEvent::LivesChanged(self.lives));
        self.pending.push(SessionEvent::WaveChanged(self.wave));
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Registers the session resource, the notification channel, and the
/// forwarding system. Add before any plugin that reads [`SessionEvent`]s.
pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameConfig>()
            .init_resource::<GameSession>()
            .add_message::<SessionEvent>()
            .add_systems(
                Startup,
                (crate::config::load_game_config, init_session).chain(),
            )
            .add_systems(PreUpdate, forward_session_events);
    }
}

/// Startup system: rebuild the session from the loaded [`GameConfig`] so TOML
/// overrides of `max_lives`/`max_waves` take effect.
pub fn init_session(mut session: ResMut<GameSession>, config: Res<GameConfig>) {
    *session = GameSession::new(
        config.max_lives,
        config.max_waves,
        config.starting_difficulty,
    );
}

/// Forward queued session notifications to `MessageReader<SessionEvent>`
/// subscribers, preserving order. Runs in `PreUpdate` so notifications
/// enqueued by last frame's collision handlers are visible to this frame's
/// `Update` systems.
pub fn forward_session_events(
    mut session: ResMut<GameSession>,
    mut writer: MessageWriter<SessionEvent>,
) {
    for event in session.drain_events() {
        let _ = writer.write(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing_session() -> GameSession {
        let mut session = GameSession::new(10, 3, 0.0);
        session.set_state(GameState::Playing);
        let _ = session.drain_events().count();
        session
    }

    #[test]
    fn menu_to_playing_resets_then_fires_game_start_then_state_changed() {
        let mut session = GameSession::new(10, 3, 0.0);
        session.set_score(999);
        let _ = session.drain_events().count();

        session.set_state(GameState::Playing);
        let events: Vec<_> = session.drain_events().collect();

        assert_eq!(session.score(), 0);
        assert_eq!(session.lives(), 10);
        assert_eq!(session.wave(), 1);
        assert_eq!(
            events,
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
    fn self_transition_is_a_silent_no_op() {
        let mut session = playing_session();
        session.set_state(GameState::Playing);
        assert_eq!(session.drain_events().count(), 0);
        assert_eq!(session.state(), GameState::Playing);
    }

    #[test]
    fn score_is_gated_on_playing() {
        let mut session = GameSession::new(10, 3, 0.0);
        session.add_score(10);
        assert_eq!(session.score(), 0);
        assert_eq!(session.drain_events().count(), 0);

        session.set_state(GameState::Playing);
        session.add_score(10);
        assert_eq!(session.score(), 10);
    }

    #[test]
    fn difficulty_multiplier_applies_at_record_time() {
        let mut session = playing_session();
        session.set_difficulty(0.5);
        session.add_score(10);
        assert_eq!(session.score(), 15);

        // Not retroactive: raising difficulty later leaves prior points alone.
        session.set_difficulty(2.0);
        assert_eq!(session.score(), 15);
        session.add_score(10);
        assert_eq!(session.score(), 45);
    }

    #[test]
    fn set_score_bypasses_the_multiplier() {
        let mut session = playing_session();
        session.set_difficulty(0.5);
        session.set_score(10);
        assert_eq!(session.score(), 10);
    }

    #[test]
    fn negative_deltas_scale_too() {
        let mut session = playing_session();
        session.set_difficulty(0.5);
        session.add_score(-10);
        assert_eq!(session.score(), -15);
    }

    #[test]
    fn lives_depletion_transitions_to_game_over_in_order() {
        let mut session = playing_session();
        session.add_lives(-10);

        assert_eq!(session.lives(), 0);
        assert_eq!(session.state(), GameState::GameOver);
        let events: Vec<_> = session.drain_events().collect();
        assert_eq!(
            events,
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
    }

    #[test]
    fn mutators_are_dead_after_game_over_until_new_session() {
        let mut session = playing_session();
        session.add_lives(-10);
        let _ = session.drain_events().count();

        session.add_score(10);
        session.add_lives(5);
        session.advance_wave();
        assert_eq!(session.score(), 0);
        assert_eq!(session.lives(), 0);
        assert_eq!(session.drain_events().count(), 0);

        // Restart re-arms via Menu; the next start resets everything.
        session.restart();
        session.set_state(GameState::Playing);
        assert_eq!(session.lives(), 10);
        session.add_score(10);
        assert_eq!(session.score(), 10);
    }

    #[test]
    fn set_lives_is_unconditional_and_checks_depletion() {
        let mut session = GameSession::new(10, 3, 0.0);
        session.set_lives(0);
        assert_eq!(session.state(), GameState::GameOver);
        let events: Vec<_> = session.drain_events().collect();
        assert!(events.contains(&SessionEvent::LivesDepleted));
    }

    #[test]
    fn wave_overflow_triggers_victory() {
        let mut session = playing_session();
        session.advance_wave();
        session.advance_wave();
        assert_eq!(session.wave(), 3);
        assert_eq!(session.state(), GameState::Playing);
        let _ = session.drain_events().count();

        session.advance_wave();
        assert_eq!(session.wave(), 4);
        assert_eq!(session.state(), GameState::Victory);
        let events: Vec<_> = session.drain_events().collect();
        assert_eq!(
            events,
            vec![
                SessionEvent::WaveChanged(4),
                SessionEvent::Victory,
                SessionEvent::StateChanged {
                    from: GameState::Playing,
                    to: GameState::Victory
                },
            ]
        );
    }

    #[test]
    fn pause_toggle_freezes_without_reset() {
        let mut session = playing_session();
        session.add_score(10);
        session.toggle_pause();
        assert_eq!(session.state(), GameState::Paused);

        // Gated mutators are inert while paused.
        session.add_score(10);
        assert_eq!(session.score(), 10);

        session.toggle_pause();
        assert_eq!(session.state(), GameState::Playing);
        // Resuming must not have reset anything — only Menu → Playing resets.
        assert_eq!(session.score(), 10);
    }

    #[test]
    fn pause_toggle_outside_play_does_nothing() {
        let mut session = GameSession::new(10, 3, 0.0);
        session.toggle_pause();
        assert_eq!(session.state(), GameState::Menu);
    }

    #[test]
    fn difficulty_is_settable_outside_playing() {
        let mut session = GameSession::new(10, 3, 0.0);
        session.set_difficulty(0.75);
        assert_eq!(session.difficulty(), 0.75);
        let events: Vec<_> = session.drain_events().collect();
        assert_eq!(events, vec![SessionEvent::DifficultyChanged(0.75)]);
    }
}
