//! Camera and lighting setup, plus the pointer-parallax camera sway.

use crate::config::GameConfig;
use crate::lane::LaneOrigin;
use bevy::prelude::*;

/// Marker for the gameplay camera.
#[derive(Component)]
pub struct MainCamera;

/// Base orientation of the camera, captured at spawn so the sway system can
/// offset from a fixed reference instead of accumulating drift.
#[derive(Resource, Debug, Clone, Copy)]
pub struct CameraRig {
    pub base_yaw: f32,
    pub base_pitch: f32,
}

/// Spawn the perspective camera above the staging area, looking down-lane,
/// plus the scene lighting.
pub fn setup_camera(mut commands: Commands, config: Res<GameConfig>, origin: Res<LaneOrigin>) {
    let eye = origin.0 + Vec3::new(0.0, config.camera_height, config.camera_z);
    let target = origin.0 + Vec3::new(0.0, 0.0, 2.5);
    let to_target = target - eye;

    // Yaw π faces +Z (down-lane); pitch tilts onto the board.
    let base_yaw = std::f32::consts::PI;
    let base_pitch = -(-to_target.y).atan2(Vec2::new(to_target.x, to_target.z).length());

    commands.insert_resource(CameraRig {
        base_yaw,
        base_pitch,
    });

    commands.spawn((
        MainCamera,
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: config.camera_fov_deg.to_radians(),
            ..default()
        }),
        Transform::from_translation(eye)
            .with_rotation(Quat::from_euler(EulerRot::YXZ, base_yaw, base_pitch, 0.0)),
    ));

    // Lighting: soft ambient fill, a shadow-casting key light, and a warm
    // point light over the board.
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
        affects_lightmapped_meshes: true,
    });
    commands.spawn((
        DirectionalLight {
            illuminance: 10_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(5.0, 5.0, 5.0).looking_at(origin.0, Vec3::Y),
    ));
    commands.spawn((
        PointLight {
            intensity: 300_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_translation(origin.0 + Vec3::new(0.0, 5.0, 4.0)),
    ));

    info!("Camera spawned at {eye:?}");
}

/// Sway the camera a few degrees toward the pointer.
///
/// Purely cosmetic parallax; drag projection reads the camera's *current*
/// transform every frame, so throws stay accurate while the view moves.
/// Windows with no cursor (e.g. touch devices) simply keep the base framing.
pub fn camera_sway_system(
    windows: Query<&Window>,
    rig: Option<Res<CameraRig>>,
    config: Res<GameConfig>,
    mut cameras: Query<&mut Transform, With<MainCamera>>,
) {
    let Some(rig) = rig else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok(mut transform) = cameras.single_mut() else {
        return;
    };

    // Cursor offset from the window centre, each axis in [−1, 1].
    let offset = Vec2::new(
        (cursor.x / window.width() - 0.5) * 2.0,
        (cursor.y / window.height() - 0.5) * 2.0,
    );

    let max = config.camera_sway_deg.to_radians();
    transform.rotation = Quat::from_euler(
        EulerRot::YXZ,
        rig.base_yaw - offset.x * max,
        rig.base_pitch - offset.y * max,
        0.0,
    );
}
