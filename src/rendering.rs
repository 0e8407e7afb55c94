//! Rendering systems: ball visuals and the in-round HUD.
//!
//! ## System Responsibilities
//!
//! | System                     | Schedule            | Purpose                       |
//! |----------------------------|---------------------|-------------------------------|
//! | `attach_ball_mesh_system`  | Update              | Give new balls a sphere mesh  |
//! | `setup_hud`                | `OnEnter(Playing)`  | Spawn timer + score overlay   |
//! | `cleanup_hud`              | `OnExit(Playing)`   | Despawn the overlay           |
//! | `hud_timer_system`         | Update / in Playing | Refresh the countdown text    |
//! | `hud_score_system`         | Update / in Playing | Refresh the score text        |

use crate::ball::Ball;
use crate::round::{RoundTimer, ScoreStats};
use bevy::prelude::*;

// ── Component markers ─────────────────────────────────────────────────────────

/// Root node of the in-round HUD; despawned on `OnExit(Playing)`.
#[derive(Component)]
pub struct HudRoot;

/// Tags the countdown text.
#[derive(Component)]
pub struct TimerText;

/// Tags the running-score text.
#[derive(Component)]
pub struct ScoreText;

// ── Ball visuals ──────────────────────────────────────────────────────────────

/// Attach a sphere mesh to every newly spawned ball.
///
/// Uses [`Added<Ball>`] so this only executes for entities that appeared
/// since the previous frame — balls are spawned once and keep their mesh for
/// the life of the app.
pub fn attach_ball_mesh_system(
    mut commands: Commands,
    query: Query<(Entity, &Ball), Added<Ball>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (entity, ball) in query.iter() {
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Sphere::new(ball.radius))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.204, 0.286, 0.369),
                perceptual_roughness: 0.4,
                ..default()
            })),
        ));
    }
}

// ── HUD ───────────────────────────────────────────────────────────────────────

fn timer_color() -> Color {
    Color::srgb(0.98, 0.83, 0.25)
}
fn hint_color() -> Color {
    Color::srgb(0.55, 0.55, 0.65)
}

/// Spawn the in-round overlay: countdown top-centre, score top-left, and a
/// small mute hint top-right.
pub fn setup_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                ..default()
            },
            HudRoot,
        ))
        .with_children(|root| {
            root.spawn((
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(16.0),
                    left: Val::Percent(50.0),
                    ..default()
                },
                Text::new("30s"),
                TextFont {
                    font_size: 44.0,
                    ..default()
                },
                TextColor(timer_color()),
                TimerText,
            ));
            root.spawn((
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(16.0),
                    left: Val::Px(16.0),
                    ..default()
                },
                Text::new("0"),
                TextFont {
                    font_size: 44.0,
                    ..default()
                },
                TextColor(timer_color()),
                ScoreText,
            ));
            root.spawn((
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(16.0),
                    right: Val::Px(16.0),
                    ..default()
                },
                Text::new("M mute  ·  , music"),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(hint_color()),
            ));
        });
}

pub fn cleanup_hud(mut commands: Commands, roots: Query<Entity, With<HudRoot>>) {
    for entity in roots.iter() {
        commands.entity(entity).despawn();
    }
}

/// Refresh the countdown text (whole seconds, rounded up so "1s" is shown
/// until the round actually ends).
pub fn hud_timer_system(timer: Res<RoundTimer>, mut texts: Query<&mut Text, With<TimerText>>) {
    let Ok(mut text) = texts.single_mut() else {
        return;
    };
    text.0 = format!("{}s", timer.remaining.ceil() as u32);
}

/// Refresh the running total.
pub fn hud_score_system(stats: Res<ScoreStats>, mut texts: Query<&mut Text, With<ScoreText>>) {
    if !stats.is_changed() {
        return;
    }
    let Ok(mut text) = texts.single_mut() else {
        return;
    };
    text.0 = stats.total.to_string();
}
