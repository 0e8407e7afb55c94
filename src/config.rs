//! Runtime game configuration loaded from `assets/game.toml`.
//!
//! [`GameConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_game_config`] reads
//! `assets/game.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a
//! minimal TOML can override just the constants you care about.
//!
//! ## Usage in systems
//!
//! Add `config: Res<GameConfig>` to any system parameter list and read values
//! with `config.min_forward_speed`, `config.hole_radius_slack`, etc.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `GameConfig::default()`.

use crate::constants::*;
use bevy::prelude::*;
use serde::Deserialize;

/// Runtime-tunable gameplay configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.  Override any subset by setting the value in
/// `assets/game.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Lane Geometry ────────────────────────────────────────────────────────
    pub lane_half_width: f32,
    pub lane_rise: f32,
    pub board_tilt_deg: f32,
    pub board_mesh_cell: f32,
    pub staging_depth: f32,

    // ── Drag Gesture ─────────────────────────────────────────────────────────
    pub drag_plane_height: f32,
    pub drag_margin: f32,
    pub velocity_history_len: usize,
    pub velocity_recency_tau: f32,
    pub grab_pick_slack: f32,

    // ── Throw Laws ───────────────────────────────────────────────────────────
    pub gesture_velocity_scale: f32,
    pub gesture_axis_boost: f32,
    pub forward_bonus: f32,
    pub min_forward_speed: f32,
    pub max_side_speed: f32,
    pub max_lift_speed: f32,
    pub max_forward_speed: f32,
    pub lift_base: f32,
    pub lift_from_speed: f32,
    pub lift_boost: f32,
    pub strength_base: f32,
    pub strength_span: f32,
    pub fallback_side_scale: f32,
    pub fallback_lift_scale: f32,
    pub fallback_forward_scale: f32,
    pub fallback_pullback: f32,

    // ── Ball ─────────────────────────────────────────────────────────────────
    pub ball_radius: f32,
    pub ball_mass: f32,
    pub ball_restitution: f32,
    pub ball_friction: f32,

    // ── Scoring Detection ────────────────────────────────────────────────────
    pub hole_radius_slack: f32,
    pub hole_depth_window: f32,
    pub score_drop_threshold: f32,
    pub fall_reset_threshold: f32,
    pub reset_jitter: f32,
    pub start_area_y: f32,
    pub start_area_z: f32,

    // ── Bounce Audio ─────────────────────────────────────────────────────────
    pub impact_speed_norm: f32,
    pub directness_floor: f32,
    pub directness_span: f32,
    pub min_impact_strength: f32,
    pub bounce_cooldown: f32,
    pub volume_knee: f32,
    pub volume_ref: f32,
    pub volume_cap: f32,
    pub volume_scale: f32,
    pub pitch_base: f32,
    pub pitch_span: f32,
    pub score_volume: f32,
    pub win_volume: f32,
    pub music_volume_menu: f32,
    pub music_volume_playing: f32,

    // ── Round ────────────────────────────────────────────────────────────────
    pub round_seconds: f32,

    // ── World Physics ────────────────────────────────────────────────────────
    pub gravity_y: f32,

    // ── Camera ───────────────────────────────────────────────────────────────
    pub camera_height: f32,
    pub camera_z: f32,
    pub camera_fov_deg: f32,
    pub camera_sway_deg: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            // Lane Geometry
            lane_half_width: LANE_HALF_WIDTH,
            lane_rise: LANE_RISE,
            board_tilt_deg: BOARD_TILT_DEG,
            board_mesh_cell: BOARD_MESH_CELL,
            staging_depth: STAGING_DEPTH,
            // Drag Gesture
            drag_plane_height: DRAG_PLANE_HEIGHT,
            drag_margin: DRAG_MARGIN,
            velocity_history_len: VELOCITY_HISTORY_LEN,
            velocity_recency_tau: VELOCITY_RECENCY_TAU,
            grab_pick_slack: GRAB_PICK_SLACK,
            // Throw Laws
            gesture_velocity_scale: GESTURE_VELOCITY_SCALE,
            gesture_axis_boost: GESTURE_AXIS_BOOST,
            forward_bonus: FORWARD_BONUS,
            min_forward_speed: MIN_FORWARD_SPEED,
            max_side_speed: MAX_SIDE_SPEED,
            max_lift_speed: MAX_LIFT_SPEED,
            max_forward_speed: MAX_FORWARD_SPEED,
            lift_base: LIFT_BASE,
            lift_from_speed: LIFT_FROM_SPEED,
            lift_boost: LIFT_BOOST,
            strength_base: STRENGTH_BASE,
            strength_span: STRENGTH_SPAN,
            fallback_side_scale: FALLBACK_SIDE_SCALE,
            fallback_lift_scale: FALLBACK_LIFT_SCALE,
            fallback_forward_scale: FALLBACK_FORWARD_SCALE,
            fallback_pullback: FALLBACK_PULLBACK,
            // Ball
            ball_radius: BALL_RADIUS,
            ball_mass: BALL_MASS,
            ball_restitution: BALL_RESTITUTION,
            ball_friction: BALL_FRICTION,
            // Scoring Detection
            hole_radius_slack: HOLE_RADIUS_SLACK,
            hole_depth_window: HOLE_DEPTH_WINDOW,
            score_drop_threshold: SCORE_DROP_THRESHOLD,
            fall_reset_threshold: FALL_RESET_THRESHOLD,
            reset_jitter: RESET_JITTER,
            start_area_y: START_AREA_Y,
            start_area_z: START_AREA_Z,
            // Bounce Audio
            impact_speed_norm: IMPACT_SPEED_NORM,
            directness_floor: DIRECTNESS_FLOOR,
            directness_span: DIRECTNESS_SPAN,
            min_impact_strength: MIN_IMPACT_STRENGTH,
            bounce_cooldown: BOUNCE_COOLDOWN,
            volume_knee: VOLUME_KNEE,
            volume_ref: VOLUME_REF,
            volume_cap: VOLUME_CAP,
            volume_scale: VOLUME_SCALE,
            pitch_base: PITCH_BASE,
            pitch_span: PITCH_SPAN,
            score_volume: SCORE_VOLUME,
            win_volume: WIN_VOLUME,
            music_volume_menu: MUSIC_VOLUME_MENU,
            music_volume_playing: MUSIC_VOLUME_PLAYING,
            // Round
            round_seconds: ROUND_SECONDS,
            // World Physics
            gravity_y: GRAVITY_Y,
            // Camera
            camera_height: CAMERA_HEIGHT,
            camera_z: CAMERA_Z,
            camera_fov_deg: CAMERA_FOV_DEG,
            camera_sway_deg: CAMERA_SWAY_DEG,
        }
    }
}

/// Startup system: attempt to load `assets/game.toml` and overwrite the
/// `GameConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults.  TOML parse errors are logged
/// but do not abort the game.  A missing file is silently ignored (defaults
/// are already in place from `insert_resource`).
pub fn load_game_config(mut config: ResMut<GameConfig>) {
    let path = "assets/game.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<GameConfig>(&contents) {
            Ok(loaded) => {
                *config = loaded;
                info!("Loaded game config from {path}");
            }
            Err(e) => {
                warn!("Failed to parse {path}: {e}; using defaults");
            }
        },
        Err(_) => {
            // File not present — defaults are already in place; not an error.
            info!("No {path} found; using compiled defaults");
        }
    }
}
