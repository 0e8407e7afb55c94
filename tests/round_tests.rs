//! Headless tests for the round flow: the [`GameState`] machine, the round
//! timer, and score aggregation.
//!
//! These tests use [`MinimalPlugins`] — no window, no rendering, no physics —
//! so they run fast and deterministically in CI.

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use skeelane::round::{
    round_timer_system, score_apply_system, GameState, RoundTimer, ScoreMessage, ScoreStats,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a minimal headless app with just the state registered.
///
/// `MinimalPlugins` provides the required scheduling infrastructure.
/// `StatesPlugin` adds the `StateTransition` schedule needed by `init_state`.
fn app_with_default_state() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.init_state::<GameState>();
    app
}

// ── GameState machine ─────────────────────────────────────────────────────────

/// The default variant of `GameState` is `Menu`.
#[test]
fn default_state_is_menu() {
    let mut app = app_with_default_state();
    app.update();
    let state = app.world().resource::<State<GameState>>();
    assert_eq!(*state.get(), GameState::Menu, "initial state must be Menu");
}

/// Requesting `Playing` via `NextState` transitions on the next frame.
#[test]
fn transition_menu_to_playing() {
    let mut app = app_with_default_state();
    app.update();
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Playing);
    app.update();
    let state = app.world().resource::<State<GameState>>();
    assert_eq!(*state.get(), GameState::Playing);
}

/// `Playing` persists across frames with no new transition request.
#[test]
fn playing_state_persists() {
    let mut app = app_with_default_state();
    app.update();
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Playing);
    for _ in 0..3 {
        app.update();
    }
    let state = app.world().resource::<State<GameState>>();
    assert_eq!(*state.get(), GameState::Playing);
}

// ── Round timer ───────────────────────────────────────────────────────────────

/// An exhausted timer requests `GameOver`, which lands next frame.
#[test]
fn exhausted_timer_ends_the_round() {
    let mut app = app_with_default_state();
    app.insert_state(GameState::Playing);
    app.insert_resource(RoundTimer { remaining: 0.0 });
    app.add_systems(Update, round_timer_system);

    app.update(); // timer hits zero, requests GameOver
    app.update(); // transition applies
    let state = app.world().resource::<State<GameState>>();
    assert_eq!(*state.get(), GameState::GameOver);
}

/// A timer with plenty left does not end the round.
#[test]
fn running_timer_keeps_playing() {
    let mut app = app_with_default_state();
    app.insert_state(GameState::Playing);
    app.insert_resource(RoundTimer { remaining: 30.0 });
    app.add_systems(Update, round_timer_system);

    for _ in 0..3 {
        app.update();
    }
    let state = app.world().resource::<State<GameState>>();
    assert_eq!(*state.get(), GameState::Playing);
}

// ── Score aggregation ─────────────────────────────────────────────────────────

/// Emitted scores accumulate into the bucketed totals.
#[test]
fn score_messages_accumulate() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.init_resource::<ScoreStats>();
    app.add_message::<ScoreMessage>();
    app.add_systems(Update, score_apply_system);

    app.world_mut().write_message(ScoreMessage { points: 5 });
    app.world_mut().write_message(ScoreMessage { points: 1 });
    app.update();
    app.world_mut().write_message(ScoreMessage { points: 3 });
    app.update();

    let stats = app.world().resource::<ScoreStats>();
    assert_eq!(stats.total, 9);
    assert_eq!(stats.fives, 1);
    assert_eq!(stats.threes, 1);
    assert_eq!(stats.ones, 1);
}
