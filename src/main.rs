use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier3d::prelude::*;

use skeelane::config::{self, GameConfig};
use skeelane::lane::LaneOrigin;
use skeelane::menu::MenuPlugin;
use skeelane::round::{GameState, RoundTimer, ScoreMessage, ScoreStats};
use skeelane::throw::{DragState, PointerState};
use skeelane::{audio, ball, graphics, lane, rendering, round, scoring, throw};

/// Configure Rapier physics: strong downward gravity so throws arc fast.
fn setup_physics_config(mut rapier: Query<&mut RapierConfiguration>, config: Res<GameConfig>) {
    for mut cfg in rapier.iter_mut() {
        cfg.gravity = Vec3::new(0.0, config.gravity_y, 0.0);
    }
}

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Skeelane".into(),
            resolution: WindowResolution::new(1200, 680),
            ..Default::default()
        }),
        ..Default::default()
    }))
    .insert_resource(ClearColor(Color::BLACK))
    // Insert GameConfig with compiled defaults; load_game_config will
    // overwrite it from assets/game.toml (if present) in the Startup schedule.
    .insert_resource(GameConfig::default())
    .insert_resource(LaneOrigin::default())
    .insert_resource(PointerState::default())
    .insert_resource(DragState::default())
    .insert_resource(RoundTimer::default())
    .insert_resource(ScoreStats::default())
    .insert_resource(audio::AudioMixer::default())
    .add_message::<ScoreMessage>()
    .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
    .add_plugins(MenuPlugin)
    .add_systems(
        Startup,
        (
            // Load config first so every other startup system sees the final values.
            config::load_game_config,
            graphics::setup_camera.after(config::load_game_config),
            lane::spawn_lane.after(config::load_game_config),
            ball::spawn_balls.after(config::load_game_config),
            audio::load_sound_assets,
            audio::start_ambient_music
                .after(audio::load_sound_assets)
                .after(config::load_game_config),
            setup_physics_config.after(config::load_game_config),
        ),
    )
    // Gesture pipeline: normalise pointer input, then run the drag state
    // machine.  Active only during a round.
    .add_systems(
        Update,
        (
            throw::pointer_clear_system,
            throw::mouse_to_pointer_system,
            throw::touch_to_pointer_system,
            throw::drag_begin_system,
            throw::drag_update_system,
            throw::drag_release_system,
        )
            .chain()
            .run_if(in_state(GameState::Playing)),
    )
    // Detection pipeline: scoring, re-arm, and lifecycle watchdogs read the
    // positions Rapier wrote back this frame.
    .add_systems(
        Update,
        (
            scoring::scoring_detection_system,
            scoring::rearm_on_return_system,
            scoring::out_of_bounds_reset_system,
            round::score_apply_system,
            round::round_timer_system,
            audio::score_audio_system,
        )
            .chain()
            .run_if(in_state(GameState::Playing)),
    )
    // Ambient systems that stay live across menus.
    .add_systems(
        Update,
        (
            rendering::attach_ball_mesh_system,
            graphics::camera_sway_system,
            audio::collision_audio_system,
            audio::mute_toggle_system,
            audio::sync_music_volume_system,
        ),
    )
    // Round flow and HUD.
    .add_systems(OnEnter(GameState::Playing), (round::start_round, rendering::setup_hud))
    .add_systems(
        OnExit(GameState::Playing),
        (rendering::cleanup_hud, throw::abort_drag_system),
    )
    .add_systems(OnEnter(GameState::GameOver), audio::play_win_sound)
    .add_systems(
        Update,
        (rendering::hud_timer_system, rendering::hud_score_system)
            .run_if(in_state(GameState::Playing)),
    );

    app.run();
}
