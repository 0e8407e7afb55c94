//! Drag input systems and launch-velocity laws.
//!
//! ## Pipeline (runs in order every `Update` frame)
//!
//! 1. [`pointer_clear_system`] — resets the per-frame `PointerState` edges.
//! 2. [`mouse_to_pointer_system`] — folds mouse button + cursor into `PointerState`.
//! 3. [`touch_to_pointer_system`] — folds touch contacts into `PointerState`.
//! 4. [`drag_begin_system`] — grab: ray-pick a ball, suspend its simulation,
//!    snap it onto the drag plane.
//! 5. [`drag_update_system`] — move: re-project, clamp, record velocity
//!    samples; flings past the far boundary release implicitly.
//! 6. [`drag_release_system`] — release: hand the ball back to the simulation
//!    with a launch velocity derived from the gesture.
//!
//! The **input abstraction layer** (`PointerState`) makes the drag logic
//! uniform across mouse and touch and keeps the launch laws below it pure —
//! tests call [`launch_velocity`] and friends directly, no window required.
//!
//! While a ball is held its body is `RigidBody::KinematicPositionBased`; the
//! simulation regains it (`RigidBody::Dynamic`) only at release.  That
//! explicit hand-over is the whole concurrency story: exactly one side writes
//! the body at any time.

use super::state::{DragSession, DragState, PointerState, VelocitySample};
use crate::ball::{Ball, PassState};
use crate::config::GameConfig;
use crate::lane::LaneOrigin;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

// ── Steps 1–3: Pointer normalisation ─────────────────────────────────────────

/// Clear the per-frame edge flags.  Runs before both device systems so a
/// frame with no input reports neither press nor release.
pub fn pointer_clear_system(mut pointer: ResMut<PointerState>) {
    pointer.pressed = false;
    pointer.just_pressed = false;
    pointer.just_released = false;
}

/// Fold mouse state into [`PointerState`].
pub fn mouse_to_pointer_system(
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    mut pointer: ResMut<PointerState>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    if let Some(cursor) = window.cursor_position() {
        pointer.position = Some(cursor);
    }
    pointer.pressed |= mouse.pressed(MouseButton::Left);
    pointer.just_pressed |= mouse.just_pressed(MouseButton::Left);
    pointer.just_released |= mouse.just_released(MouseButton::Left);
}

/// Fold touch contacts into [`PointerState`].
///
/// Uses the first active contact only — multi-touch drags are not a gesture
/// this game has.  On the release frame no position is reported, so the last
/// known position is kept (see [`PointerState`]).
pub fn touch_to_pointer_system(touches: Res<Touches>, mut pointer: ResMut<PointerState>) {
    if let Some(position) = touches.first_pressed_position() {
        pointer.position = Some(position);
    }
    pointer.pressed |= touches.iter().next().is_some();
    pointer.just_pressed |= touches.any_just_pressed();
    pointer.just_released |= touches.any_just_released();
}

// ── Ray helpers ───────────────────────────────────────────────────────────────

/// Intersect a pointer ray with the horizontal plane at `plane_y`.
///
/// Returns `None` when the ray is parallel to the plane or points away from
/// it — callers skip that frame's drag update.
pub fn ray_plane_intersection(ray: Ray3d, plane_y: f32) -> Option<Vec3> {
    let t = ray.intersect_plane(Vec3::new(0.0, plane_y, 0.0), InfinitePlane3d::new(Vec3::Y))?;
    Some(ray.get_point(t))
}

/// Distance along `ray` to its first intersection with a sphere, if any.
pub fn ray_sphere_distance(ray: Ray3d, center: Vec3, radius: f32) -> Option<f32> {
    let to_center = center - ray.origin;
    let along = to_center.dot(*ray.direction);
    let closest_sq = to_center.length_squared() - along * along;
    if closest_sq > radius * radius {
        return None;
    }
    let half_chord = (radius * radius - closest_sq).sqrt();
    let t = if along - half_chord >= 0.0 {
        along - half_chord
    } else {
        along + half_chord
    };
    (t >= 0.0).then_some(t)
}

/// Result of projecting a pointer onto the staging rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StagingPoint {
    /// Position clamped into the legal drag rectangle, on the drag plane.
    pub clamped: Vec3,
    /// The unclamped projection overshot the far (down-lane) boundary —
    /// the gesture has left the staging area at speed.
    pub beyond_far: bool,
}

/// Clamp a drag-plane point into the staging rectangle.
pub fn clamp_to_staging(
    point: Vec3,
    origin: Vec3,
    plane_y: f32,
    config: &GameConfig,
) -> StagingPoint {
    let far = origin.z + config.staging_depth - config.drag_margin;
    StagingPoint {
        clamped: Vec3::new(
            point.x.clamp(
                origin.x - config.lane_half_width + config.drag_margin,
                origin.x + config.lane_half_width - config.drag_margin,
            ),
            plane_y,
            point.z.clamp(origin.z + config.drag_margin, far),
        ),
        beyond_far: point.z > far,
    }
}

// ── Launch laws (pure) ────────────────────────────────────────────────────────

/// Position-based throw strength: 0.5 at the near edge of the staging
/// rectangle, 1.5 at the far edge.  Throws started deeper get more power.
pub fn position_strength(final_z: f32, origin_z: f32, config: &GameConfig) -> f32 {
    let usable = config.staging_depth - 2.0 * config.drag_margin;
    let t = ((final_z - origin_z - config.drag_margin) / usable).clamp(0.0, 1.0);
    config.strength_base + config.strength_span * t
}

/// Recency-weighted average of the gesture's velocity history.
///
/// Each sample is weighted by `(rank + 1) × exp(−(now − at)/tau)` — later
/// samples count more by rank, and samples from a stalled gesture decay away
/// entirely.  The final flick dominates the launch, the way a real throw
/// works.  Returns `None` for an empty history.
pub fn weighted_average_velocity(
    history: &[VelocitySample],
    now: f32,
    tau: f32,
) -> Option<Vec2> {
    if history.is_empty() {
        return None;
    }
    let mut sum = Vec2::ZERO;
    let mut total_weight = 0.0;
    for (rank, sample) in history.iter().enumerate() {
        let weight = (rank as f32 + 1.0) * (-(now - sample.at) / tau).exp();
        sum += Vec2::new(sample.vx, sample.vz) * weight;
        total_weight += weight;
    }
    (total_weight > 0.0).then(|| sum / total_weight)
}

/// Launch velocity from a gesture average `(vx, vz)` and a throw strength.
///
/// The lift term reads the raw (pre-substitution, pre-clamp) horizontal
/// speeds so a hard sideways fling still lofts the ball.  Every output
/// component is clamped; nothing unbounded ever reaches the physics body.
pub fn launch_from_history(average: Vec2, strength: f32, config: &GameConfig) -> Vec3 {
    let scale = config.gesture_velocity_scale * config.gesture_axis_boost;
    let vx = average.x * scale;
    let vz = average.y * scale * config.forward_bonus;

    let gesture_speed = (vx * vx + vz * vz).sqrt();
    let vy = (gesture_speed * config.lift_from_speed).max(config.lift_base) * strength;

    // A weak or backwards gesture still has to leave the staging area.
    let min_forward = config.min_forward_speed * strength;
    let vz = if vz > 0.0 { vz.max(min_forward) } else { min_forward };

    Vec3::new(
        vx.clamp(-config.max_side_speed, config.max_side_speed),
        (vy * config.lift_boost).min(config.max_lift_speed),
        vz.min(config.max_forward_speed),
    )
}

/// Degenerate-drag fallback: no velocity history was recorded (zero-duration
/// drag), so estimate from the total displacement instead.
pub fn launch_fallback(total_dx: f32, strength: f32, config: &GameConfig) -> Vec3 {
    let vx = (total_dx * config.fallback_side_scale * strength)
        .clamp(-config.max_side_speed, config.max_side_speed);
    let vy = (config.fallback_lift_scale * strength * config.lift_boost).min(config.max_lift_speed);
    let vz = (config.min_forward_speed * strength)
        .max(config.fallback_pullback * config.fallback_forward_scale * strength)
        * config.forward_bonus;
    Vec3::new(vx, vy, vz.min(config.max_forward_speed))
}

/// Full release law: strength from where the drag ended, then the history
/// path or the displacement fallback.
pub fn launch_velocity(
    session: &DragSession,
    final_pos: Vec3,
    origin: Vec3,
    now: f32,
    config: &GameConfig,
) -> Vec3 {
    let strength = position_strength(final_pos.z, origin.z, config);
    match weighted_average_velocity(&session.history, now, config.velocity_recency_tau) {
        Some(average) => launch_from_history(average, strength, config),
        None => launch_fallback(final_pos.x - session.start_world.x, strength, config),
    }
}

// ── Step 4: Grab ──────────────────────────────────────────────────────────────

/// On pointer-down, ray-pick a ball and start a drag session.
///
/// The grab suspends simulation on the ball (kinematic body), zeroes its
/// motion, snaps it to the drag plane, and re-arms scoring.  If the pointer
/// ray misses every ball, or misses the drag plane, no session starts and
/// the subsequent move/up systems stay inert.
pub fn drag_begin_system(
    mut commands: Commands,
    pointer: Res<PointerState>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    mut balls: Query<(Entity, &mut Transform, &mut Velocity, &Ball, &mut PassState)>,
    mut drag: ResMut<DragState>,
    origin: Res<LaneOrigin>,
    config: Res<GameConfig>,
    time: Res<Time>,
) {
    if !pointer.just_pressed || drag.is_dragging() {
        return;
    }
    let Some(cursor) = pointer.position else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor) else {
        return;
    };

    // Nearest ball the pointer ray touches, with a touch-friendly pick slack.
    let mut picked: Option<(Entity, f32)> = None;
    for (entity, transform, _, ball, _) in balls.iter() {
        let pick_radius = ball.radius * config.grab_pick_slack;
        if let Some(t) = ray_sphere_distance(ray, transform.translation, pick_radius) {
            if picked.map_or(true, |(_, best)| t < best) {
                picked = Some((entity, t));
            }
        }
    }
    let Some((entity, _)) = picked else {
        return;
    };

    let plane_y = origin.0.y + config.drag_plane_height;
    let Some(point) = ray_plane_intersection(ray, plane_y) else {
        return;
    };
    let point = clamp_to_staging(point, origin.0, plane_y, &config).clamped;

    let Ok((_, mut transform, mut velocity, _, mut pass)) = balls.get_mut(entity) else {
        return;
    };

    // Take the body away from the simulation for the duration of the hold.
    commands.entity(entity).insert(RigidBody::KinematicPositionBased);
    transform.translation = point;
    velocity.linvel = Vec3::ZERO;
    velocity.angvel = Vec3::ZERO;

    // Grabbing a ball re-arms it.
    pass.has_scored = false;

    *drag = DragState::Dragging(DragSession::new(entity, point, time.elapsed_secs()));
}

// ── Step 5: Move ──────────────────────────────────────────────────────────────

/// While dragging, follow the pointer on the drag plane and record velocity
/// samples.  A projection overshooting the far staging boundary with a
/// non-empty history releases implicitly — a fast drag flings the ball
/// without waiting for pointer-up.
pub fn drag_update_system(
    mut commands: Commands,
    pointer: Res<PointerState>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    mut balls: Query<(&mut Transform, &mut Velocity), With<Ball>>,
    mut drag: ResMut<DragState>,
    origin: Res<LaneOrigin>,
    config: Res<GameConfig>,
    time: Res<Time>,
) {
    let DragState::Dragging(session) = &mut *drag else {
        return;
    };
    let Some(cursor) = pointer.position else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor) else {
        return;
    };

    let plane_y = origin.0.y + config.drag_plane_height;
    // Projection failure skips this frame's update; the session is unchanged.
    let Some(point) = ray_plane_intersection(ray, plane_y) else {
        return;
    };
    let staging = clamp_to_staging(point, origin.0, plane_y, &config);

    let Ok((mut transform, mut velocity)) = balls.get_mut(session.ball) else {
        return;
    };
    transform.translation = staging.clamped;

    let now = time.elapsed_secs();
    let dt = now - session.last_time;
    if dt > 0.0 {
        session.push_sample(
            VelocitySample {
                vx: (staging.clamped.x - session.last_world.x) / dt,
                vz: (staging.clamped.z - session.last_world.z) / dt,
                at: now,
            },
            config.velocity_history_len,
        );
        session.last_world = staging.clamped;
        session.last_time = now;
    }

    // Keep spin from accumulating while held.
    velocity.angvel = Vec3::ZERO;

    // Implicit release: the gesture ran off the end of the staging area.
    // Same code path as an explicit pointer-up, called directly.
    if staging.beyond_far && !session.history.is_empty() {
        let launch = launch_velocity(session, staging.clamped, origin.0, now, &config);
        commands.entity(session.ball).insert(RigidBody::Dynamic);
        velocity.linvel = launch;
        velocity.angvel = Vec3::ZERO;
        *drag = DragState::Idle;
    }
}

// ── Step 6: Release ───────────────────────────────────────────────────────────

/// On pointer-up, hand the ball back to the simulation with the launch
/// velocity derived from the gesture.  A release with no active session is a
/// no-op, so duplicate or stray up events are harmless.
pub fn drag_release_system(
    mut commands: Commands,
    pointer: Res<PointerState>,
    mut balls: Query<(&Transform, &mut Velocity), With<Ball>>,
    mut drag: ResMut<DragState>,
    origin: Res<LaneOrigin>,
    config: Res<GameConfig>,
    time: Res<Time>,
) {
    if !pointer.just_released {
        return;
    }
    let DragState::Dragging(session) = &*drag else {
        return;
    };
    let Ok((transform, mut velocity)) = balls.get_mut(session.ball) else {
        *drag = DragState::Idle;
        return;
    };

    let launch = launch_velocity(
        session,
        transform.translation,
        origin.0,
        time.elapsed_secs(),
        &config,
    );
    commands.entity(session.ball).insert(RigidBody::Dynamic);
    velocity.linvel = launch;
    velocity.angvel = Vec3::ZERO;

    *drag = DragState::Idle;
}

/// Abandon any active drag when the round ends: the ball is handed back to
/// the simulation where it is, with no launch.  Runs on leaving `Playing` so
/// a ball can never stay kinematic across a menu.
pub fn abort_drag_system(mut commands: Commands, mut drag: ResMut<DragState>) {
    if let DragState::Dragging(session) = &*drag {
        commands.entity(session.ball).insert(RigidBody::Dynamic);
        *drag = DragState::Idle;
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GameConfig {
        GameConfig::default()
    }

    fn session_with(history: Vec<VelocitySample>) -> DragSession {
        let mut session = DragSession::new(Entity::PLACEHOLDER, Vec3::new(0.0, 1.0, 0.15), 0.0);
        session.history = history;
        session
    }

    // ── position_strength ─────────────────────────────────────────────────────

    #[test]
    fn strength_spans_half_to_one_and_a_half() {
        let config = config();
        assert!((position_strength(0.15, 0.0, &config) - 0.5).abs() < 1e-5);
        assert!((position_strength(0.85, 0.0, &config) - 1.5).abs() < 1e-5);
        // Clamped outside the usable band.
        assert!((position_strength(-2.0, 0.0, &config) - 0.5).abs() < 1e-5);
        assert!((position_strength(9.0, 0.0, &config) - 1.5).abs() < 1e-5);
    }

    // ── weighted_average_velocity ─────────────────────────────────────────────

    #[test]
    fn empty_history_has_no_average() {
        assert!(weighted_average_velocity(&[], 1.0, 0.2).is_none());
    }

    #[test]
    fn recent_samples_dominate_the_average() {
        let now = 2.0;
        let history = vec![
            VelocitySample { vx: 0.0, vz: 10.0, at: now - 1.0 },
            VelocitySample { vx: 0.0, vz: 30.0, at: now },
        ];
        let average = weighted_average_velocity(&history, now, 0.2).unwrap();
        // The second sample carries rank 2 and no decay; the first has decayed
        // through five time constants and contributes almost nothing.
        assert!(average.y > 29.0, "expected flick to dominate, got {average:?}");
    }

    // ── launch_from_history ───────────────────────────────────────────────────

    /// A single pure-forward sample of vz = 40 at full
    /// strength clamps forward speed to 20 and lift to 2.
    #[test]
    fn fast_forward_fling_hits_all_clamps() {
        let config = config();
        let now = 1.0;
        let session = session_with(vec![VelocitySample { vx: 0.0, vz: 40.0, at: now }]);
        // Released mid-staging: strength exactly 1.0.
        let launch = launch_velocity(&session, Vec3::new(0.0, 1.0, 0.5), Vec3::ZERO, now, &config);

        assert!(launch.x.abs() < 1e-5);
        assert!((launch.y - 2.0).abs() < 1e-5);
        assert!((launch.z - 20.0).abs() < 1e-5);
    }

    #[test]
    fn backwards_gesture_is_replaced_by_minimum_forward() {
        let config = config();
        let launch = launch_from_history(Vec2::new(0.0, -12.0), 0.5, &config);
        // min forward = 20 × 0.5 = 10, under the clamp.
        assert!((launch.z - 10.0).abs() < 1e-5);
        assert!(launch.z <= config.max_forward_speed);
    }

    #[test]
    fn gentle_gesture_keeps_base_lift() {
        let config = config();
        let launch = launch_from_history(Vec2::new(0.4, 1.0), 0.5, &config);
        // gesture speed well under 4 ⇒ lift term = LIFT_BASE × s × boost.
        assert!((launch.y - 2.0 * 0.5 * 1.15).abs() < 1e-4);
    }

    #[test]
    fn history_launch_is_always_clamp_bounded() {
        let config = config();
        for (vx, vz, s) in [
            (500.0, 500.0, 1.5),
            (-500.0, -500.0, 0.5),
            (0.0, 0.0, 1.0),
            (73.0, -22.0, 1.2),
        ] {
            let launch = launch_from_history(Vec2::new(vx, vz), s, &config);
            assert!((-3.0..=3.0).contains(&launch.x), "vx out of range: {launch:?}");
            assert!((0.0..=2.0).contains(&launch.y), "vy out of range: {launch:?}");
            assert!((0.0..=20.0).contains(&launch.z), "vz out of range: {launch:?}");
        }
    }

    // ── launch_fallback ───────────────────────────────────────────────────────

    #[test]
    fn zero_history_uses_displacement_fallback() {
        let config = config();
        let session = session_with(vec![]);
        // Dragged 0.1 right of the grab point, released at the near edge.
        let launch = launch_velocity(&session, Vec3::new(0.1, 1.0, 0.15), Vec3::ZERO, 1.0, &config);

        // s = 0.5: vx = 0.1 × 10 × 0.5, vy = 3 × 0.5 × 1.15, vz = 20 × 0.5 × 1.1.
        assert!((launch.x - 0.5).abs() < 1e-4);
        assert!((launch.y - 1.725).abs() < 1e-4);
        assert!((launch.z - 11.0).abs() < 1e-4);
    }

    #[test]
    fn fallback_is_always_clamp_bounded() {
        let config = config();
        for (dx, s) in [(10.0, 1.5), (-10.0, 1.5), (0.0, 0.5), (2.5, 1.0)] {
            let launch = launch_fallback(dx, s, &config);
            assert!((-3.0..=3.0).contains(&launch.x), "vx out of range: {launch:?}");
            assert!((0.0..=2.0).contains(&launch.y), "vy out of range: {launch:?}");
            assert!((0.0..=20.0).contains(&launch.z), "vz out of range: {launch:?}");
        }
    }

    // ── clamp_to_staging ──────────────────────────────────────────────────────

    #[test]
    fn staging_clamp_bounds_and_far_flag() {
        let config = config();
        let inside = clamp_to_staging(Vec3::new(0.2, 0.0, 0.5), Vec3::ZERO, 1.0, &config);
        assert_eq!(inside.clamped, Vec3::new(0.2, 1.0, 0.5));
        assert!(!inside.beyond_far);

        let overshoot = clamp_to_staging(Vec3::new(4.0, 0.0, 3.0), Vec3::ZERO, 1.0, &config);
        assert_eq!(overshoot.clamped, Vec3::new(0.85, 1.0, 0.85));
        assert!(overshoot.beyond_far);

        let near = clamp_to_staging(Vec3::new(-4.0, 0.0, -1.0), Vec3::ZERO, 1.0, &config);
        assert_eq!(near.clamped, Vec3::new(-0.85, 1.0, 0.15));
        assert!(!near.beyond_far);
    }

    // ── ray helpers ───────────────────────────────────────────────────────────

    #[test]
    fn downward_ray_hits_drag_plane() {
        let ray = Ray3d::new(Vec3::new(0.3, 5.0, 0.4), Dir3::NEG_Y);
        let point = ray_plane_intersection(ray, 1.0).unwrap();
        assert!((point - Vec3::new(0.3, 1.0, 0.4)).length() < 1e-5);
    }

    #[test]
    fn parallel_ray_misses_drag_plane() {
        let ray = Ray3d::new(Vec3::new(0.0, 5.0, 0.0), Dir3::Z);
        assert!(ray_plane_intersection(ray, 1.0).is_none());
    }

    #[test]
    fn ray_sphere_hit_and_miss() {
        let ray = Ray3d::new(Vec3::new(0.0, 0.0, -5.0), Dir3::Z);
        let t = ray_sphere_distance(ray, Vec3::ZERO, 0.5).unwrap();
        assert!((t - 4.5).abs() < 1e-5);
        assert!(ray_sphere_distance(ray, Vec3::new(2.0, 0.0, 0.0), 0.5).is_none());
        // Behind the origin: no hit.
        assert!(ray_sphere_distance(ray, Vec3::new(0.0, 0.0, -10.0), 0.5).is_none());
    }
}
