//! Centralised physics and gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//!
//! ## Tuning guidance
//!
//! Each constant includes its observable consequence.  Most values can also be
//! overridden at runtime through `assets/game.toml` (see [`crate::config`]),
//! which mirrors every constant in this file.

// ── Lane Geometry ─────────────────────────────────────────────────────────────

/// Half-width of the lane (world units).  The playable corridor spans
/// `lane x ∈ [−LANE_HALF_WIDTH, +LANE_HALF_WIDTH]`.
pub const LANE_HALF_WIDTH: f32 = 1.0;

/// Height gained by the scoring board at its far end: `tan(10°) × 4`.
///
/// Raising this steepens the visual climb of the board without changing the
/// board collider tilt (see `BOARD_TILT_DEG`).
pub const LANE_RISE: f32 = 0.705_303_5;

/// Tilt of the scoring board plate around X, in degrees.
/// The board visual and its trimesh collider share this rotation.
pub const BOARD_TILT_DEG: f32 = 8.0;

/// Board plate half-extents in its local plane (x half-width, z half-length).
pub const BOARD_HALF_WIDTH: f32 = 1.0;
pub const BOARD_HALF_LENGTH: f32 = 3.0;

/// World-space centre of the board plate, relative to the lane origin.
/// Matches the collider placement: `(0, LANE_RISE/2 + 0.5, 4)`.
pub const BOARD_CENTER_Y_OFFSET: f32 = 0.5;
pub const BOARD_CENTER_Z: f32 = 4.0;

/// Grid cell size used when tessellating the board plate (world units).
///
/// Smaller cells give rounder hole cut-outs and a heavier trimesh.  At 0.05
/// each 0.16-radius hole is carved by ~30 skipped cells, which keeps balls
/// from bridging a hole they should fall through.
pub const BOARD_MESH_CELL: f32 = 0.05;

/// Depth of the flat staging floor where balls rest and drags happen.
/// The drag rectangle runs `z ∈ [origin.z, origin.z + STAGING_DEPTH]`.
pub const STAGING_DEPTH: f32 = 1.0;

// ── Drag Gesture ──────────────────────────────────────────────────────────────

/// Height of the horizontal drag plane above the lane origin.
///
/// A held ball is snapped to this plane and slides along it until release.
pub const DRAG_PLANE_HEIGHT: f32 = 1.0;

/// Inset applied when clamping a dragged ball inside the staging rectangle,
/// keeping the ball's volume clear of the boundary walls.
pub const DRAG_MARGIN: f32 = 0.15;

/// Number of recent per-frame velocity samples kept during a drag.
/// Oldest samples are evicted once the history is full.
pub const VELOCITY_HISTORY_LEN: usize = 5;

/// Exponential-decay time constant (seconds) for recency weighting of
/// velocity samples at release.  Samples older than a few multiples of this
/// contribute almost nothing, so the final flick dominates the launch.
pub const VELOCITY_RECENCY_TAU: f32 = 0.2;

/// Multiplier on the ball radius used for grab picking.
///
/// Slightly larger than the rendered sphere so touch input can grab a ball
/// without pixel-perfect aim.
pub const GRAB_PICK_SLACK: f32 = 1.6;

// ── Throw Laws ────────────────────────────────────────────────────────────────

/// Base scale applied to the gesture's weighted average velocity.
pub const GESTURE_VELOCITY_SCALE: f32 = 0.25;

/// Extra doubling applied to both horizontal axes of the gesture velocity.
pub const GESTURE_AXIS_BOOST: f32 = 2.0;

/// Forward (z) launch component bonus, applied after the axis boost.
pub const FORWARD_BONUS: f32 = 1.1;

/// Minimum forward launch speed at strength 1.0.  A weak or backwards gesture
/// is replaced by `MIN_FORWARD_SPEED × strength` so every release leaves the
/// staging area.
pub const MIN_FORWARD_SPEED: f32 = 20.0;

/// Hard clamps on the launch velocity handed to the physics body.
/// No unclamped component ever reaches the simulation.
pub const MAX_SIDE_SPEED: f32 = 3.0;
pub const MAX_LIFT_SPEED: f32 = 2.0;
pub const MAX_FORWARD_SPEED: f32 = 20.0;

/// Upward launch velocity: `max(LIFT_BASE, speed × LIFT_FROM_SPEED)` scaled by
/// throw strength and `LIFT_BOOST`, clamped to `MAX_LIFT_SPEED`.
pub const LIFT_BASE: f32 = 2.0;
pub const LIFT_FROM_SPEED: f32 = 0.5;
pub const LIFT_BOOST: f32 = 1.15;

/// Position-based throw strength: `STRENGTH_BASE + STRENGTH_SPAN × t` where
/// `t ∈ [0,1]` is how deep in the staging rectangle the drag ended.
/// Maps to the 0.5–1.5 range: deeper release point, stronger throw.
pub const STRENGTH_BASE: f32 = 0.5;
pub const STRENGTH_SPAN: f32 = 1.0;

/// Degenerate-drag fallback (no velocity history): displacement-based scales.
pub const FALLBACK_SIDE_SCALE: f32 = 10.0;
pub const FALLBACK_LIFT_SCALE: f32 = 3.0;
pub const FALLBACK_FORWARD_SCALE: f32 = 15.0;
pub const FALLBACK_PULLBACK: f32 = -0.2;

// ── Ball ──────────────────────────────────────────────────────────────────────

/// Ball collider radius (world units).
pub const BALL_RADIUS: f32 = 0.13;

/// Ball mass while simulated.  During a drag the body is kinematic and the
/// simulation has no influence on it regardless of mass.
pub const BALL_MASS: f32 = 2.0;

/// Bounciness of ball contacts.  0.0 = dead drop, 1.0 = perfectly elastic.
pub const BALL_RESTITUTION: f32 = 0.45;

/// Friction of ball contacts; keeps balls rolling rather than skating.
pub const BALL_FRICTION: f32 = 0.3;

/// Staging slots where the balls rest, relative to the lane origin.
/// One ball is spawned per slot and repositioned here on reset.
pub const BALL_SPAWN_SLOTS: [[f32; 3]; 3] = [
    [0.0, 1.5, 0.6],
    [-0.2, 1.5, 0.8],
    [0.2, 1.5, 0.8],
];

// ── Scoring Detection ─────────────────────────────────────────────────────────

/// Radius of every scoring hole (world units).
pub const HOLE_RADIUS: f32 = 0.16;

/// Planar detection radius multiplier.  A ball counts as over a hole when its
/// XZ distance to the hole centre is below `HOLE_RADIUS × HOLE_RADIUS_SLACK`.
/// Slightly generous so fast balls are not missed between samples.
pub const HOLE_RADIUS_SLACK: f32 = 1.2;

/// Additional depth gate: the ball's z must be within this window of the
/// hole's z.
pub const HOLE_DEPTH_WINDOW: f32 = 0.3;

/// The ball must have dropped at least this far below its spawn height before
/// a hole can register — it has to be falling *through* the board, not
/// rolling over it.
pub const SCORE_DROP_THRESHOLD: f32 = 0.5;

/// A ball this far below its spawn height has left the lane and is reset.
pub const FALL_RESET_THRESHOLD: f32 = 2.0;

/// Maximum random offset (± on x and z) applied when a ball is reset to its
/// spawn slot, so stacked balls do not rest in exactly the same spot.
pub const RESET_JITTER: f32 = 0.2;

/// Starting-area window around the spawn slot: re-entering this region
/// re-arms scoring for the next pass.
pub const START_AREA_Y: f32 = 0.5;
pub const START_AREA_Z: f32 = 1.5;

// ── Bounce Audio ──────────────────────────────────────────────────────────────

/// Impact speed that maps to full normalised intensity.
pub const IMPACT_SPEED_NORM: f32 = 15.0;

/// Impact strength mixes normalised speed with hit directness:
/// `strength = normalised × (DIRECTNESS_FLOOR + directness × DIRECTNESS_SPAN)`.
/// A glancing hit keeps 40% of its speed-based intensity.
pub const DIRECTNESS_FLOOR: f32 = 0.4;
pub const DIRECTNESS_SPAN: f32 = 0.6;

/// Impacts at or below this strength stay silent.
pub const MIN_IMPACT_STRENGTH: f32 = 0.02;

/// Minimum seconds between bounce sounds for a single ball, preventing buzz
/// during sustained rolling contact.
pub const BOUNCE_COOLDOWN: f32 = 0.05;

/// Perceptual volume curve: silent below `VOLUME_KNEE`, then
/// `min(VOLUME_CAP, ((s − KNEE)/(REF − KNEE))² × VOLUME_SCALE) / 100`.
/// Quadratic so weak contact noise is compressed while hard impacts stay
/// below a non-clipping cap.
pub const VOLUME_KNEE: f32 = 0.06;
pub const VOLUME_REF: f32 = 0.5;
pub const VOLUME_CAP: f32 = 40.0;
pub const VOLUME_SCALE: f32 = 80.0;

/// Playback rate curve: `PITCH_BASE + strength × PITCH_SPAN`, i.e. 0.85–1.15.
/// Harder hits sound slightly higher pitched.
pub const PITCH_BASE: f32 = 0.85;
pub const PITCH_SPAN: f32 = 0.3;

/// Fixed volume for score jingles.
pub const SCORE_VOLUME: f32 = 0.3;

/// Fixed volume for the end-of-round win sound.
pub const WIN_VOLUME: f32 = 0.5;

/// Ambient music loop volume in the menu and during a round.
pub const MUSIC_VOLUME_MENU: f32 = 0.1;
pub const MUSIC_VOLUME_PLAYING: f32 = 0.3;

// ── Round ─────────────────────────────────────────────────────────────────────

/// Length of a scoring round in seconds.
pub const ROUND_SECONDS: f32 = 30.0;

// ── World Physics ─────────────────────────────────────────────────────────────

/// Downward gravity.  Stronger than Earth's so throws arc fast and rounds
/// stay snappy.
pub const GRAVITY_Y: f32 = -30.0;

// ── Camera ────────────────────────────────────────────────────────────────────

/// Camera position above and just behind the staging area, looking down-lane.
pub const CAMERA_HEIGHT: f32 = 2.5;
pub const CAMERA_Z: f32 = -0.1;

/// Vertical field of view in degrees.
pub const CAMERA_FOV_DEG: f32 = 90.0;

/// Maximum pointer-parallax sway of the camera, in degrees on each axis.
pub const CAMERA_SWAY_DEG: f32 = 10.0;
