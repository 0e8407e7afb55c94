//! Hole-scoring detection and ball lifecycle watchdogs.
//!
//! ## Pipeline (runs in order every `Update` frame, after physics writeback)
//!
//! 1. [`scoring_detection_system`] — samples each ball against the
//!    [`SCORING_HOLES`] table and emits at most one [`ScoreMessage`] per pass.
//! 2. [`rearm_on_return_system`] — detects the *transition* back into the
//!    starting area and re-arms scoring for the next pass.
//! 3. [`out_of_bounds_reset_system`] — balls that rolled off the end of the
//!    lane are returned to their staging slot.
//!
//! A hole is hit when all three hold: planar XZ distance below
//! `radius × slack`, depth alignment within the z window, and the ball has
//! dropped below its lane-entry height.  The first hole satisfied in
//! declaration order wins and scanning stops for that sample.

use crate::ball::{Ball, PassState};
use crate::config::GameConfig;
use crate::lane::SCORING_HOLES;
use crate::round::ScoreMessage;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::Rng;

/// Scan every armed ball against the hole table.
///
/// `has_scored` latches on the first hit and blocks further emission until a
/// re-arm path fires — a ball bouncing inside a hole's detection zone for
/// several frames still scores exactly once.
pub fn scoring_detection_system(
    mut balls: Query<(&Transform, &Ball, &mut PassState)>,
    mut score_writer: MessageWriter<ScoreMessage>,
    config: Res<GameConfig>,
) {
    for (transform, ball, mut pass) in balls.iter_mut() {
        if pass.has_scored {
            continue;
        }
        let p = transform.translation;
        if p.y >= ball.spawn.y - config.score_drop_threshold {
            // Still rolling on or above the board — not falling through it.
            continue;
        }

        for hole in SCORING_HOLES.iter() {
            let planar = Vec2::new(p.x - hole.position.x, p.z - hole.position.z).length();
            if planar < hole.radius * config.hole_radius_slack
                && (p.z - hole.position.z).abs() < config.hole_depth_window
            {
                pass.has_scored = true;
                score_writer.write(ScoreMessage { points: hole.score });
                break;
            }
        }
    }
}

/// Re-arm scoring when a ball crosses back into its starting area.
///
/// Fires on the transition only: a ball parked on the area boundary does not
/// re-arm every frame, it re-arms once when it enters.
pub fn rearm_on_return_system(
    mut balls: Query<(&Transform, &Ball, &mut PassState)>,
    config: Res<GameConfig>,
) {
    for (transform, ball, mut pass) in balls.iter_mut() {
        let p = transform.translation;
        let in_area = (p.z - ball.spawn.z).abs() < config.start_area_z
            && (p.y - ball.spawn.y).abs() < config.start_area_y;

        if in_area && !pass.in_start_area {
            pass.has_scored = false;
        }
        pass.in_start_area = in_area;
    }
}

/// Return balls that fell off the end of the lane to their staging slot.
///
/// The reset teleports to the slot plus a small random XZ offset so several
/// fallen balls do not restack in one spot, zeroes all motion, and re-arms
/// scoring.  Triggering twice in a row is harmless: each reset starts over
/// from the slot position.
pub fn out_of_bounds_reset_system(
    mut balls: Query<(&mut Transform, &mut Velocity, &Ball, &mut PassState)>,
    config: Res<GameConfig>,
) {
    let mut rng = rand::thread_rng();
    for (mut transform, mut velocity, ball, mut pass) in balls.iter_mut() {
        if transform.translation.y >= ball.spawn.y - config.fall_reset_threshold {
            continue;
        }
        let jitter = Vec2::new(
            rng.gen_range(-config.reset_jitter..=config.reset_jitter),
            rng.gen_range(-config.reset_jitter..=config.reset_jitter),
        );
        crate::ball::reset_ball(ball, jitter, &mut transform, &mut velocity, &mut pass);
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lane::LaneOrigin;

    /// Accumulates every emitted score so tests can count emissions across
    /// multiple frames.
    #[derive(Resource, Default)]
    struct CapturedScores(Vec<u32>);

    fn capture_scores(mut reader: MessageReader<ScoreMessage>, mut captured: ResMut<CapturedScores>) {
        for message in reader.read() {
            captured.0.push(message.points);
        }
    }

    /// Build a minimal headless app with the detector pipeline and a score
    /// capture stage — no window, no renderer, no physics step.
    fn build_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(GameConfig::default());
        app.insert_resource(LaneOrigin::default());
        app.init_resource::<CapturedScores>();
        app.add_message::<ScoreMessage>();
        app.add_systems(
            Update,
            (
                scoring_detection_system,
                rearm_on_return_system,
                out_of_bounds_reset_system,
                capture_scores,
            )
                .chain(),
        );
        app
    }

    fn spawn_test_ball(app: &mut App, position: Vec3) -> Entity {
        app.world_mut()
            .spawn((
                Ball {
                    spawn: Vec3::new(0.0, 1.5, 0.6),
                    radius: 0.13,
                },
                PassState::default(),
                Transform::from_translation(position),
                Velocity::zero(),
            ))
            .id()
    }

    fn move_ball(app: &mut App, entity: Entity, position: Vec3) {
        app.world_mut()
            .entity_mut(entity)
            .get_mut::<Transform>()
            .unwrap()
            .translation = position;
    }

    /// A ball falling through the centre 5-hole emits
    /// `ScoreMessage(5)` exactly once and latches `has_scored`.
    #[test]
    fn falling_through_five_hole_scores_once() {
        let mut app = build_test_app();
        // 0.6 below spawn height, directly over the hole at (0, 0, 6).
        let ball = spawn_test_ball(&mut app, Vec3::new(0.0, 0.9, 6.0));
        app.update();

        assert_eq!(app.world().resource::<CapturedScores>().0, vec![5]);
        assert!(app.world().entity(ball).get::<PassState>().unwrap().has_scored);

        // Still inside the detection zone next frame: no second emission.
        app.update();
        assert_eq!(app.world().resource::<CapturedScores>().0, vec![5]);
    }

    /// A ball above the drop threshold never scores, even directly over a
    /// hole — it is rolling on the board, not falling through it.
    #[test]
    fn ball_on_board_surface_does_not_score() {
        let mut app = build_test_app();
        spawn_test_ball(&mut app, Vec3::new(0.0, 1.2, 6.0));
        app.update();
        assert!(app.world().resource::<CapturedScores>().0.is_empty());
    }

    /// Off-centre beyond the slack radius: no score.
    #[test]
    fn near_miss_outside_slack_radius_does_not_score() {
        let mut app = build_test_app();
        // 0.2 off the hole centre; detection radius is 0.16 × 1.2 = 0.192.
        spawn_test_ball(&mut app, Vec3::new(0.2, 0.9, 6.0));
        app.update();
        assert!(app.world().resource::<CapturedScores>().0.is_empty());
    }

    /// Re-arm requires a transition into the starting area; sitting inside it
    /// does not re-arm every frame.
    #[test]
    fn rearm_fires_on_transition_only() {
        let mut app = build_test_app();
        let ball = spawn_test_ball(&mut app, Vec3::new(0.0, 0.9, 6.0));
        app.update();
        assert!(app.world().entity(ball).get::<PassState>().unwrap().has_scored);

        // Ball returns to its staging slot: transition re-arms.
        move_ball(&mut app, ball, Vec3::new(0.0, 1.5, 0.6));
        app.update();
        let pass = *app.world().entity(ball).get::<PassState>().unwrap();
        assert!(!pass.has_scored);
        assert!(pass.in_start_area);

        // Latch again while the ball stays put: residence must not re-arm.
        app.world_mut()
            .entity_mut(ball)
            .get_mut::<PassState>()
            .unwrap()
            .has_scored = true;
        app.update();
        assert!(app.world().entity(ball).get::<PassState>().unwrap().has_scored);
    }

    /// After scoring and re-arming, a second pass scores again.
    #[test]
    fn full_pass_cycle_allows_second_score() {
        let mut app = build_test_app();
        let ball = spawn_test_ball(&mut app, Vec3::new(0.0, 0.9, 6.0));
        app.update();
        move_ball(&mut app, ball, Vec3::new(0.0, 1.5, 0.6));
        app.update();
        move_ball(&mut app, ball, Vec3::new(0.4, 0.9, 5.0));
        app.update();

        assert_eq!(app.world().resource::<CapturedScores>().0, vec![5, 1]);
    }

    /// Dropping 2.1 below spawn height resets the ball to its
    /// slot (± jitter), zeroes velocity, and re-arms.
    #[test]
    fn fall_below_threshold_resets_to_slot() {
        let mut app = build_test_app();
        let ball = spawn_test_ball(&mut app, Vec3::new(0.3, 1.5 - 2.1, 7.4));
        {
            let mut entity = app.world_mut().entity_mut(ball);
            entity.get_mut::<PassState>().unwrap().has_scored = true;
            entity.get_mut::<Velocity>().unwrap().linvel = Vec3::new(1.0, -8.0, 4.0);
        }
        app.update();

        let world = app.world();
        let transform = world.entity(ball).get::<Transform>().unwrap();
        let offset = transform.translation - Vec3::new(0.0, 1.5, 0.6);
        assert!(offset.x.abs() <= 0.2 && offset.z.abs() <= 0.2, "jitter out of bounds: {offset:?}");
        assert_eq!(offset.y, 0.0);
        assert_eq!(world.entity(ball).get::<Velocity>().unwrap().linvel, Vec3::ZERO);
        let pass = world.entity(ball).get::<PassState>().unwrap();
        assert!(!pass.has_scored);
        assert!(pass.in_start_area);
    }

    /// Simulated double-trigger: a second reset frame keeps the ball inside
    /// the single-reset jitter envelope.
    #[test]
    fn double_out_of_bounds_trigger_stays_bounded() {
        let mut app = build_test_app();
        let ball = spawn_test_ball(&mut app, Vec3::new(0.0, -1.0, 7.0));
        app.update();
        // Force the reset condition again immediately.
        move_ball(&mut app, ball, Vec3::new(0.0, -1.0, 7.0));
        app.update();

        let transform = app.world().entity(ball).get::<Transform>().unwrap();
        let offset = transform.translation - Vec3::new(0.0, 1.5, 0.6);
        assert!(offset.x.abs() <= 0.2 && offset.z.abs() <= 0.2);
    }
}
