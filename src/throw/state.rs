//! Drag-gesture state: the pointer abstraction and the hold-to-throw state
//! machine.
//!
//! Mouse and touch input are normalised into [`PointerState`] before any drag
//! logic runs, so the drag systems have a single input source and can be
//! exercised headlessly in tests.  The drag itself is an explicit two-state
//! machine ([`DragState`]) whose session data travels with the state — there
//! are no per-frame closures capturing stale flags.

use bevy::prelude::*;

// ── Pointer abstraction ───────────────────────────────────────────────────────

/// Unified pointer input for the current frame, fed by the mouse and touch
/// normalisation systems.
///
/// `position` keeps the last known screen-space position even on frames where
/// the device reports none (e.g. the release frame of a touch), so a release
/// can always complete.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct PointerState {
    /// Latest screen-space position, if any input device has reported one.
    pub position: Option<Vec2>,
    /// A button/contact is currently held.
    pub pressed: bool,
    /// Went down this frame.
    pub just_pressed: bool,
    /// Went up this frame.
    pub just_released: bool,
}

// ── Drag session ──────────────────────────────────────────────────────────────

/// One instantaneous drag velocity sample, in world units per second.
/// Only the horizontal plane matters — the held ball never leaves it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocitySample {
    pub vx: f32,
    pub vz: f32,
    /// App time the sample was taken, in seconds.
    pub at: f32,
}

/// Transient state while a pointer holds a ball.
///
/// Created on a successful grab, destroyed at release.  `history` holds the
/// most recent per-frame velocity samples, oldest first, capped by the
/// configured length.
#[derive(Debug, Clone)]
pub struct DragSession {
    /// The ball entity being held.
    pub ball: Entity,
    /// Drag-plane position where the grab landed.
    pub start_world: Vec3,
    /// Drag-plane position as of the previous frame.
    pub last_world: Vec3,
    /// Recent velocity samples, oldest → newest.
    pub history: Vec<VelocitySample>,
    /// App time of the previous position update, in seconds.
    pub last_time: f32,
}

impl DragSession {
    pub fn new(ball: Entity, world: Vec3, now: f32) -> Self {
        Self {
            ball,
            start_world: world,
            last_world: world,
            history: Vec::new(),
            last_time: now,
        }
    }

    /// Append a sample, evicting the oldest once `cap` entries are held.
    pub fn push_sample(&mut self, sample: VelocitySample, cap: usize) {
        self.history.push(sample);
        if self.history.len() > cap {
            self.history.remove(0);
        }
    }
}

// ── Drag state machine ────────────────────────────────────────────────────────

/// The hold-to-throw state machine: `Idle` ↔ `Dragging`.
///
/// Move and release systems are no-ops in `Idle`, which makes stray pointer
/// events (or a release delivered twice) harmless.
#[derive(Resource, Debug, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_evicts_oldest_at_cap() {
        let mut session = DragSession::new(Entity::PLACEHOLDER, Vec3::ZERO, 0.0);
        for k in 0..7 {
            session.push_sample(
                VelocitySample {
                    vx: k as f32,
                    vz: 0.0,
                    at: k as f32 * 0.016,
                },
                5,
            );
        }
        assert_eq!(session.history.len(), 5);
        // Samples 0 and 1 were evicted; the newest survives at the tail.
        assert_eq!(session.history[0].vx, 2.0);
        assert_eq!(session.history[4].vx, 6.0);
    }

    #[test]
    fn idle_is_default_and_not_dragging() {
        let state = DragState::default();
        assert!(!state.is_dragging());
    }
}
