//! Start and game-over overlay screens — `MenuPlugin`.
//!
//! ## Systems (registered by `MenuPlugin`)
//!
//! | System                   | Schedule                | Purpose                        |
//! |--------------------------|-------------------------|--------------------------------|
//! | `setup_start_screen`     | `OnEnter(Menu)`         | Spawn title + START overlay    |
//! | `cleanup_start_screen`   | `OnExit(Menu)`          | Despawn the overlay            |
//! | `start_button_system`    | `Update / in Menu`      | START click → `Playing`        |
//! | `setup_game_over_screen` | `OnEnter(GameOver)`     | Spawn final score + PLAY AGAIN |
//! | `cleanup_game_over`      | `OnExit(GameOver)`      | Despawn the overlay            |
//! | `play_again_system`      | `Update / in GameOver`  | PLAY AGAIN click → `Playing`   |

use crate::round::{GameState, ScoreStats};
use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::prelude::*;

// ── Component markers ─────────────────────────────────────────────────────────

/// Root node of the start-screen UI.
#[derive(Component)]
pub struct StartScreenRoot;

/// Tags the START button.
#[derive(Component)]
pub struct StartButton;

/// Root node of the game-over UI.
#[derive(Component)]
pub struct GameOverRoot;

/// Tags the PLAY AGAIN button.
#[derive(Component)]
pub struct PlayAgainButton;

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Registers `GameState` and both overlay screens.
///
/// Must be added before any plugin or system set that calls
/// `.run_if(in_state(GameState::Playing))`, so the state is registered first.
pub struct MenuPlugin;

impl Plugin for MenuPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .add_systems(OnEnter(GameState::Menu), setup_start_screen)
            .add_systems(OnExit(GameState::Menu), cleanup_start_screen)
            .add_systems(
                Update,
                start_button_system.run_if(in_state(GameState::Menu)),
            )
            .add_systems(OnEnter(GameState::GameOver), setup_game_over_screen)
            .add_systems(OnExit(GameState::GameOver), cleanup_game_over)
            .add_systems(
                Update,
                play_again_system.run_if(in_state(GameState::GameOver)),
            );
    }
}

// ── Colour helpers ────────────────────────────────────────────────────────────

fn play_bg() -> Color {
    Color::srgb(0.85, 0.65, 0.10)
}
fn play_border() -> Color {
    Color::srgb(0.98, 0.83, 0.25)
}
fn play_text() -> Color {
    Color::srgb(0.10, 0.08, 0.02)
}
fn title_color() -> Color {
    Color::srgb(0.98, 0.83, 0.25)
}
fn subtitle_color() -> Color {
    Color::srgb(0.75, 0.75, 0.82)
}

fn overlay_background() -> Color {
    Color::srgba(0.0, 0.0, 0.0, 0.55)
}

// ── Shared layout helpers ─────────────────────────────────────────────────────

fn spawn_overlay_root(commands: &mut Commands) -> Entity {
    commands
        .spawn((Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(18.0),
            ..default()
        },))
        .insert(BackgroundColor(overlay_background()))
        .id()
}

fn spawn_action_button(
    parent: &mut ChildSpawnerCommands,
    label: &str,
    marker: impl Component,
) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(260.0),
                height: Val::Px(64.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BackgroundColor(play_bg()),
            BorderColor::all(play_border()),
            marker,
        ))
        .with_children(|btn| {
            btn.spawn((
                Text::new(label),
                TextFont {
                    font_size: 26.0,
                    ..default()
                },
                TextColor(play_text()),
            ));
        });
}

// ── Start screen ──────────────────────────────────────────────────────────────

pub fn setup_start_screen(mut commands: Commands) {
    let root = spawn_overlay_root(&mut commands);
    commands
        .entity(root)
        .insert(StartScreenRoot)
        .with_children(|parent| {
            parent.spawn((
                Text::new("SKEELANE"),
                TextFont {
                    font_size: 72.0,
                    ..default()
                },
                TextColor(title_color()),
            ));
            parent.spawn((
                Text::new("Drag a ball and fling it up the lane"),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(subtitle_color()),
            ));
            spawn_action_button(parent, "START", StartButton);
        });
}

pub fn cleanup_start_screen(mut commands: Commands, roots: Query<Entity, With<StartScreenRoot>>) {
    for entity in roots.iter() {
        commands.entity(entity).despawn();
    }
}

pub fn start_button_system(
    interactions: Query<&Interaction, (Changed<Interaction>, With<StartButton>)>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for interaction in interactions.iter() {
        if *interaction == Interaction::Pressed {
            next_state.set(GameState::Playing);
        }
    }
}

// ── Game-over screen ──────────────────────────────────────────────────────────

pub fn setup_game_over_screen(mut commands: Commands, stats: Res<ScoreStats>) {
    let root = spawn_overlay_root(&mut commands);
    let breakdown = format!(
        "5s × {}   ·   3s × {}   ·   1s × {}",
        stats.fives, stats.threes, stats.ones
    );
    let total = stats.total;
    commands
        .entity(root)
        .insert(GameOverRoot)
        .with_children(|parent| {
            parent.spawn((
                Text::new(total.to_string()),
                TextFont {
                    font_size: 110.0,
                    ..default()
                },
                TextColor(title_color()),
            ));
            parent.spawn((
                Text::new("Your Score"),
                TextFont {
                    font_size: 26.0,
                    ..default()
                },
                TextColor(subtitle_color()),
            ));
            parent.spawn((
                Text::new(breakdown),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(subtitle_color()),
            ));
            spawn_action_button(parent, "PLAY AGAIN", PlayAgainButton);
        });
}

pub fn cleanup_game_over(mut commands: Commands, roots: Query<Entity, With<GameOverRoot>>) {
    for entity in roots.iter() {
        commands.entity(entity).despawn();
    }
}

pub fn play_again_system(
    interactions: Query<&Interaction, (Changed<Interaction>, With<PlayAgainButton>)>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for interaction in interactions.iter() {
        if *interaction == Interaction::Pressed {
            next_state.set(GameState::Playing);
        }
    }
}
