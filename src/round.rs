//! Round flow: game state machine, round timer, and score aggregation.
//!
//! ## States
//!
//! | State      | Description                                  |
//! |------------|----------------------------------------------|
//! | `Menu`     | Initial state; start screen shown            |
//! | `Playing`  | Timed round running; throw/scoring active    |
//! | `GameOver` | Timer expired; final score shown             |
//!
//! The round controller only *consumes* scoring events — the detector in
//! [`crate::scoring`] owns when they fire.

use crate::config::GameConfig;
use bevy::prelude::*;

// ── Game state ────────────────────────────────────────────────────────────────

/// Top-level application state machine.
///
/// Throw, scoring, and timer systems run under
/// `.run_if(in_state(GameState::Playing))`, so balls are inert props while a
/// menu is on screen.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Start screen, shown on launch and after a reset.
    #[default]
    Menu,
    /// Active timed round.
    Playing,
    /// Round finished; final score overlay.
    GameOver,
}

// ── Messages ──────────────────────────────────────────────────────────────────

/// One successful hole pass, carrying the hole's point value.
///
/// Emitted by the scoring detector exactly once per pass; consumed by the
/// score aggregator and the score-sound system.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreMessage {
    pub points: u32,
}

// ── Resources ─────────────────────────────────────────────────────────────────

/// Seconds left in the current round.
#[derive(Resource, Debug, Clone, Copy)]
pub struct RoundTimer {
    pub remaining: f32,
}

impl Default for RoundTimer {
    fn default() -> Self {
        Self {
            remaining: crate::constants::ROUND_SECONDS,
        }
    }
}

/// Cumulative round score, bucketed by hole value for the end screen.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreStats {
    pub total: u32,
    pub ones: u32,
    pub threes: u32,
    pub fives: u32,
}

impl ScoreStats {
    /// Fold one scoring event into the totals.
    pub fn record(&mut self, points: u32) {
        self.total += points;
        match points {
            1 => self.ones += 1,
            3 => self.threes += 1,
            5 => self.fives += 1,
            _ => {}
        }
    }
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Reset score and timer at the start of every round.
pub fn start_round(
    mut timer: ResMut<RoundTimer>,
    mut stats: ResMut<ScoreStats>,
    config: Res<GameConfig>,
) {
    timer.remaining = config.round_seconds;
    *stats = ScoreStats::default();
}

/// Count the round down; at zero, the round is over.
pub fn round_timer_system(
    mut timer: ResMut<RoundTimer>,
    time: Res<Time>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    timer.remaining -= time.delta_secs();
    if timer.remaining <= 0.0 {
        timer.remaining = 0.0;
        next_state.set(GameState::GameOver);
    }
}

/// Fold emitted scores into the running totals.
pub fn score_apply_system(mut scores: MessageReader<ScoreMessage>, mut stats: ResMut<ScoreStats>) {
    for message in scores.read() {
        stats.record(message.points);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_bucket_by_hole_value() {
        let mut stats = ScoreStats::default();
        for points in [5, 1, 3, 5, 1, 1] {
            stats.record(points);
        }
        assert_eq!(stats.total, 16);
        assert_eq!(stats.ones, 3);
        assert_eq!(stats.threes, 1);
        assert_eq!(stats.fives, 2);
    }

    #[test]
    fn default_timer_matches_round_length() {
        assert_eq!(RoundTimer::default().remaining, crate::constants::ROUND_SECONDS);
    }
}
