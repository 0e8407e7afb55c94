//! Game audio: the mixer, sound assets, and the bounce-audio mapper.
//!
//! The bounce mapper turns raw collision data (velocity at impact + contact
//! normal) into a perceptual *impact strength*, then into a volume and a
//! playback rate.  All three mappings are pure functions at the top of this
//! file; the systems below them only wire physics events and timers to the
//! Bevy audio API.
//!
//! ## Mixer
//!
//! [`AudioMixer`] is an explicitly owned resource holding the master / music /
//! sfx gains and mute flags.  Every playback call multiplies through it — no
//! process-wide mutable audio state exists anywhere else.

use crate::ball::{Ball, BounceCooldown};
use crate::config::GameConfig;
use crate::round::ScoreMessage;
use bevy::audio::Volume;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

// ── Mixer ─────────────────────────────────────────────────────────────────────

/// Explicitly owned audio mixer: master / music / sfx gains plus mute flags.
///
/// Constructed once at startup and handed to systems as a resource; playback
/// helpers multiply their base volume through the relevant gains.
#[derive(Resource, Debug, Clone)]
pub struct AudioMixer {
    pub master_gain: f32,
    pub music_gain: f32,
    pub sfx_gain: f32,
    pub muted: bool,
    pub music_muted: bool,
}

impl Default for AudioMixer {
    fn default() -> Self {
        Self {
            master_gain: 1.0,
            music_gain: 1.0,
            sfx_gain: 1.0,
            muted: false,
            music_muted: false,
        }
    }
}

impl AudioMixer {
    /// Effective volume for a sound effect with the given base volume.
    pub fn sfx_volume(&self, base: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            base * self.sfx_gain * self.master_gain
        }
    }

    /// Effective volume for music with the given base volume.
    /// Music honours both the master mute and its own mute.
    pub fn music_volume(&self, base: f32) -> f32 {
        if self.muted || self.music_muted {
            0.0
        } else {
            base * self.music_gain * self.master_gain
        }
    }
}

// ── Assets ────────────────────────────────────────────────────────────────────

/// Handles to every game sound, loaded once at startup.
#[derive(Resource)]
pub struct SoundAssets {
    pub bounce: Handle<AudioSource>,
    pub score_1: Handle<AudioSource>,
    pub score_3: Handle<AudioSource>,
    pub score_5: Handle<AudioSource>,
    pub win: Handle<AudioSource>,
    pub ambient_music: Handle<AudioSource>,
}

pub fn load_sound_assets(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(SoundAssets {
        bounce: asset_server.load("audio/ball-bounce.ogg"),
        score_1: asset_server.load("audio/score-1.ogg"),
        score_3: asset_server.load("audio/score-3.ogg"),
        score_5: asset_server.load("audio/score-5.ogg"),
        win: asset_server.load("audio/win.ogg"),
        ambient_music: asset_server.load("audio/ambient-music.ogg"),
    });
}

/// Marker for the looping ambient-music entity.
#[derive(Component)]
pub struct MusicChannel;

/// Start the ambient loop at menu volume; [`sync_music_volume_system`] keeps
/// the sink in step with the mixer and game state afterwards.
pub fn start_ambient_music(
    mut commands: Commands,
    sounds: Option<Res<SoundAssets>>,
    mixer: Res<AudioMixer>,
    config: Res<GameConfig>,
) {
    let Some(sounds) = sounds else {
        return;
    };
    commands.spawn((
        MusicChannel,
        AudioPlayer::new(sounds.ambient_music.clone()),
        PlaybackSettings::LOOP
            .with_volume(Volume::Linear(mixer.music_volume(config.music_volume_menu))),
    ));
}

// ── Bounce mapping (pure) ─────────────────────────────────────────────────────

/// Perceptual impact strength from collision data.
///
/// `impact_speed / norm` caps at 1; hit *directness* (how head-on the contact
/// was) scales it between the floor and full intensity.  A missing or
/// degenerate contact normal counts as fully direct.
pub fn impact_strength(velocity: Vec3, contact_normal: Option<Vec3>, config: &GameConfig) -> f32 {
    let impact_speed = velocity.length();
    let normalized = (impact_speed / config.impact_speed_norm).min(1.0);
    let directness = match (velocity.try_normalize(), contact_normal.and_then(Vec3::try_normalize)) {
        (Some(v), Some(n)) => v.dot(n).abs(),
        _ => 1.0,
    };
    normalized * (config.directness_floor + directness * config.directness_span)
}

/// Perceptual volume for a bounce of the given strength.
///
/// Silent below the knee; quadratic from the knee to the reference strength;
/// capped so hard impacts never clip.
pub fn bounce_volume(strength: f32, config: &GameConfig) -> f32 {
    let s = strength.clamp(0.0, 1.0);
    if s <= config.volume_knee {
        return 0.0;
    }
    let t = (s - config.volume_knee) / (config.volume_ref - config.volume_knee);
    (t * t * config.volume_scale).min(config.volume_cap) / 100.0
}

/// Playback rate for a bounce: harder hits sound slightly higher pitched.
pub fn bounce_pitch(strength: f32, config: &GameConfig) -> f32 {
    config.pitch_base + strength.clamp(0.0, 1.0) * config.pitch_span
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Map ball contact forces to bounce sounds.
///
/// Per contact: strength from the ball's velocity and the contact normal,
/// suppressed when negligible, rate-limited per ball, then spawned as a
/// fire-and-forget one-shot.  If the bounce sample has not finished loading
/// the sound is dropped, not queued.
pub fn collision_audio_system(
    mut commands: Commands,
    mut contact_events: MessageReader<ContactForceEvent>,
    mut balls: Query<(&Velocity, &mut BounceCooldown), With<Ball>>,
    sounds: Option<Res<SoundAssets>>,
    asset_server: Res<AssetServer>,
    mixer: Res<AudioMixer>,
    config: Res<GameConfig>,
    time: Res<Time>,
) {
    let Some(sounds) = sounds else {
        return;
    };
    let now = time.elapsed_secs();

    for event in contact_events.read() {
        // Whichever side of the contact is a ball drives the sound.
        let entity = if balls.contains(event.collider1) {
            event.collider1
        } else if balls.contains(event.collider2) {
            event.collider2
        } else {
            continue;
        };
        let Ok((velocity, mut cooldown)) = balls.get_mut(entity) else {
            continue;
        };

        if now - cooldown.last_play < config.bounce_cooldown {
            continue;
        }

        let strength = impact_strength(
            velocity.linvel,
            Some(event.max_force_direction),
            &config,
        );
        if strength <= config.min_impact_strength {
            continue;
        }

        let volume = mixer.sfx_volume(bounce_volume(strength, &config));
        if volume <= 0.0 {
            continue;
        }
        if !asset_server.is_loaded_with_dependencies(&sounds.bounce) {
            continue;
        }

        commands.spawn((
            AudioPlayer::new(sounds.bounce.clone()),
            PlaybackSettings::DESPAWN
                .with_volume(Volume::Linear(volume))
                .with_speed(bounce_pitch(strength, &config)),
        ));
        cooldown.last_play = now;
    }
}

/// Play the score jingle for each emitted score; bigger holes play faster.
pub fn score_audio_system(
    mut commands: Commands,
    mut scores: MessageReader<ScoreMessage>,
    sounds: Option<Res<SoundAssets>>,
    mixer: Res<AudioMixer>,
    config: Res<GameConfig>,
) {
    let Some(sounds) = sounds else {
        return;
    };
    for message in scores.read() {
        let (handle, rate) = match message.points {
            5 => (sounds.score_5.clone(), 1.1),
            3 => (sounds.score_3.clone(), 1.05),
            _ => (sounds.score_1.clone(), 1.0),
        };
        let volume = mixer.sfx_volume(config.score_volume);
        if volume <= 0.0 {
            continue;
        }
        commands.spawn((
            AudioPlayer::new(handle),
            PlaybackSettings::DESPAWN
                .with_volume(Volume::Linear(volume))
                .with_speed(rate),
        ));
    }
}

/// One-shot win sound, run on entering `GameOver`.
pub fn play_win_sound(
    mut commands: Commands,
    sounds: Option<Res<SoundAssets>>,
    mixer: Res<AudioMixer>,
    config: Res<GameConfig>,
) {
    let Some(sounds) = sounds else {
        return;
    };
    let volume = mixer.sfx_volume(config.win_volume);
    if volume <= 0.0 {
        return;
    }
    commands.spawn((
        AudioPlayer::new(sounds.win.clone()),
        PlaybackSettings::DESPAWN.with_volume(Volume::Linear(volume)),
    ));
}

/// Keyboard mute toggles: `M` for everything, `,` for music only.
pub fn mute_toggle_system(keys: Res<ButtonInput<KeyCode>>, mut mixer: ResMut<AudioMixer>) {
    if keys.just_pressed(KeyCode::KeyM) {
        mixer.muted = !mixer.muted;
        info!("master mute: {}", mixer.muted);
    }
    if keys.just_pressed(KeyCode::Comma) {
        mixer.music_muted = !mixer.music_muted;
        info!("music mute: {}", mixer.music_muted);
    }
}

/// Keep the music sink's volume in step with the mixer and game state —
/// quiet behind the menu, louder during a round, silent when muted.
pub fn sync_music_volume_system(
    state: Res<State<crate::round::GameState>>,
    mixer: Res<AudioMixer>,
    config: Res<GameConfig>,
    mut music: Query<&mut AudioSink, With<MusicChannel>>,
) {
    let Ok(mut sink) = music.single_mut() else {
        return;
    };
    let base = match state.get() {
        crate::round::GameState::Playing => config.music_volume_playing,
        _ => config.music_volume_menu,
    };
    sink.set_volume(Volume::Linear(mixer.music_volume(base)));
}

// ── Unit tests ────────────────────────────────────────────────────────────────
