//! Ball entities: components, spawning, and the physics bundle.
//!
//! Balls are created once at scene setup — one per staging slot — and are
//! never despawned.  Falling off the lane or finishing a round repositions
//! them in place.  Scoring bookkeeping lives in [`PassState`]; the systems
//! that mutate it are in [`crate::scoring`] and [`crate::throw`].

use crate::config::GameConfig;
use crate::constants::BALL_SPAWN_SLOTS;
use crate::lane::LaneOrigin;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

// ── Components ────────────────────────────────────────────────────────────────

/// A throwable ball.  `spawn` is the slot this ball rests in and returns to;
/// every scoring threshold is measured against it.
#[derive(Component, Debug, Clone, Copy)]
pub struct Ball {
    /// World-space staging slot this ball belongs to.
    pub spawn: Vec3,
    /// Collider radius.
    pub radius: f32,
}

/// Per-pass scoring bookkeeping.
///
/// A "pass" runs from leaving the starting area until the next return to it.
/// `has_scored` latches after the first hole of a pass and is cleared only by
/// the three re-arm paths: grab, return-to-start transition, out-of-bounds
/// reset.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct PassState {
    pub has_scored: bool,
    pub in_start_area: bool,
}

/// Rate limiter for bounce sounds; `last_play` is in seconds of app time.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct BounceCooldown {
    pub last_play: f32,
}

// ── Spawn ─────────────────────────────────────────────────────────────────────

/// Spawn one ball per staging slot with the full dynamic-body bundle.
///
/// `Ccd` stays enabled for the ball's whole lifetime: a hard throw can cross
/// a wall's thickness in a single step otherwise.
pub fn spawn_balls(mut commands: Commands, config: Res<GameConfig>, origin: Res<LaneOrigin>) {
    for slot in BALL_SPAWN_SLOTS.iter() {
        let spawn = origin.0 + Vec3::from(*slot);
        commands.spawn((
            Ball {
                spawn,
                radius: config.ball_radius,
            },
            PassState {
                has_scored: false,
                in_start_area: true,
            },
            BounceCooldown::default(),
            // Physics
            RigidBody::Dynamic,
            Collider::ball(config.ball_radius),
            ColliderMassProperties::Mass(config.ball_mass),
            Restitution::coefficient(config.ball_restitution),
            Friction::coefficient(config.ball_friction),
            Ccd::enabled(),
            Velocity::zero(),
            ActiveEvents::CONTACT_FORCE_EVENTS,
            // Transform / visibility
            Transform::from_translation(spawn),
            Visibility::default(),
        ));
    }

    info!("Spawned {} balls", BALL_SPAWN_SLOTS.len());
}

/// Return a ball to its staging slot: teleport (with the given jitter), stop
/// all motion, restore dynamic simulation, and re-arm scoring.
///
/// Shared by the out-of-bounds reset and the round start/reset paths.  The
/// jitter is applied to the slot position itself, so repeated resets never
/// accumulate offset.
pub fn reset_ball(
    ball: &Ball,
    jitter: Vec2,
    transform: &mut Transform,
    velocity: &mut Velocity,
    pass: &mut PassState,
) {
    transform.translation = ball.spawn + Vec3::new(jitter.x, 0.0, jitter.y);
    transform.rotation = Quat::IDENTITY;
    velocity.linvel = Vec3::ZERO;
    velocity.angvel = Vec3::ZERO;
    pass.has_scored = false;
    pass.in_start_area = true;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_ball() -> Ball {
        Ball {
            spawn: Vec3::new(0.0, 1.5, 0.6),
            radius: 0.13,
        }
    }

    /// Resetting twice in a row must not compound jitter or leave residual
    /// velocity — the reset always restarts from the spawn slot.
    #[test]
    fn double_reset_does_not_compound() {
        let ball = test_ball();
        let mut transform = Transform::from_xyz(5.0, -3.0, 9.0);
        let mut velocity = Velocity {
            linvel: Vec3::new(4.0, -9.0, 12.0),
            angvel: Vec3::splat(3.0),
        };
        let mut pass = PassState {
            has_scored: true,
            in_start_area: false,
        };

        reset_ball(&ball, Vec2::new(0.2, -0.2), &mut transform, &mut velocity, &mut pass);
        reset_ball(&ball, Vec2::new(0.15, 0.1), &mut transform, &mut velocity, &mut pass);

        let offset = transform.translation - ball.spawn;
        assert!(offset.x.abs() <= 0.2 && offset.z.abs() <= 0.2);
        assert_eq!(offset.y, 0.0);
        assert_eq!(velocity.linvel, Vec3::ZERO);
        assert_eq!(velocity.angvel, Vec3::ZERO);
        assert!(!pass.has_scored);
        assert!(pass.in_start_area);
    }
}
