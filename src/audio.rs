//! Sound playback. The game core talks to [`BevyAudio`], which queues
//! commands; [`play_queued_audio`] turns them into audio entities each frame.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex, PoisonError},
};

use bevy::prelude::*;

use crate::{
    AppSystems,
    services::{AudioService, Sound},
};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<AudioQueue>();
    app.init_resource::<AudioAssets>();

    app.add_systems(
        Update,
        (
            play_queued_audio.in_set(AppSystems::Update),
            apply_global_volume.run_if(resource_changed::<GlobalVolume>),
        ),
    );
}

/// An organizational marker component that should be added to a spawned [`AudioPlayer`] if it's in the
/// general "music" category (e.g. global background music, soundtrack).
///
/// This can then be used to query for and operate on sounds in that category.
#[derive(Component, Reflect, Default)]
#[reflect(Component)]
pub struct Music;

/// A music audio instance.
pub fn music(handle: Handle<AudioSource>) -> impl Bundle {
    (AudioPlayer(handle), PlaybackSettings::LOOP, Music)
}

/// An organizational marker component that should be added to a spawned [`AudioPlayer`] if it's in the
/// general "sound effect" category (e.g. footsteps, the sound of a magic spell, a door opening).
///
/// This can then be used to query for and operate on sounds in that category.
#[derive(Component, Reflect, Default)]
#[reflect(Component)]
pub struct SoundEffect;

/// A sound effect audio instance.
pub fn sound_effect(handle: Handle<AudioSource>) -> impl Bundle {
    (AudioPlayer(handle), PlaybackSettings::DESPAWN, SoundEffect)
}

/// A sound effect that repeats until stopped.
pub fn looping_sound_effect(handle: Handle<AudioSource>) -> impl Bundle {
    (AudioPlayer(handle), PlaybackSettings::LOOP, SoundEffect)
}

/// Handles for every [`Sound`], loaded up front.
#[derive(Resource)]
struct AudioAssets(HashMap<Sound, Handle<AudioSource>>);

impl AudioAssets {
    fn handle(&self, sound: Sound) -> Handle<AudioSource> {
        self.0.get(&sound).cloned().unwrap_or_default()
    }
}

impl FromWorld for AudioAssets {
    fn from_world(world: &mut World) -> Self {
        let asset_server = world.resource::<AssetServer>();
        Self(
            Sound::ALL
                .iter()
                .map(|&sound| (sound, asset_server.load(sound.asset_path())))
                .collect(),
        )
    }
}

/// Which [`Sound`] an audio entity is playing.
#[derive(Component, Debug, Clone, Copy)]
pub struct Playing(pub Sound);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCommand {
    Play(Sound),
    Loop(Sound),
    Stop(Sound),
    Music(Sound),
    StopMusic,
    StopAll,
}

/// Commands waiting for [`play_queued_audio`]. Shared with [`BevyAudio`].
#[derive(Resource, Clone, Default)]
pub struct AudioQueue(Arc<Mutex<VecDeque<AudioCommand>>>);

impl AudioQueue {
    fn push(&self, command: AudioCommand) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(command);
    }

    fn drain(&self) -> Vec<AudioCommand> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect()
    }
}

/// [`AudioService`] backed by Bevy audio entities.
///
/// Honors the music and effects toggles before anything reaches the queue.
pub struct BevyAudio {
    queue: AudioQueue,
    music_enabled: bool,
    effects_enabled: bool,
}

impl BevyAudio {
    pub fn new(queue: AudioQueue) -> Self {
        Self {
            queue,
            music_enabled: true,
            effects_enabled: true,
        }
    }
}

impl AudioService for BevyAudio {
    fn play_sound(&mut self, sound: Sound) {
        if self.effects_enabled {
            self.queue.push(AudioCommand::Play(sound));
        }
    }

    fn play_looping(&mut self, sound: Sound) {
        if self.effects_enabled {
            self.queue.push(AudioCommand::Loop(sound));
        }
    }

    fn stop_sound(&mut self, sound: Sound) {
        self.queue.push(AudioCommand::Stop(sound));
    }

    fn play_background_music(&mut self, track: Sound) {
        if self.music_enabled {
            self.queue.push(AudioCommand::Music(track));
        }
    }

    fn stop_background_music(&mut self) {
        self.queue.push(AudioCommand::StopMusic);
    }

    fn stop_all(&mut self) {
        self.queue.push(AudioCommand::StopAll);
    }

    fn set_music_enabled(&mut self, enabled: bool) {
        self.music_enabled = enabled;
        if !enabled {
            self.queue.push(AudioCommand::StopMusic);
        }
    }

    fn set_effects_enabled(&mut self, enabled: bool) {
        self.effects_enabled = enabled;
        if !enabled {
            self.queue.push(AudioCommand::Stop(Sound::BombTick));
        }
    }
}

/// A live audio entity as far as the current batch of commands knows.
struct Live {
    entity: Entity,
    sound: Sound,
    is_music: bool,
}

fn play_queued_audio(
    mut commands: Commands,
    queue: Res<AudioQueue>,
    assets: Res<AudioAssets>,
    playing: Query<(Entity, &Playing, Has<Music>)>,
) {
    let batch = queue.drain();
    if batch.is_empty() {
        return;
    }

    // Entities spawned earlier in this batch aren't in the query yet.
    let mut live: Vec<Live> = playing
        .iter()
        .map(|(entity, playing, is_music)| Live {
            entity,
            sound: playing.0,
            is_music,
        })
        .collect();

    for command in batch {
        match command {
            AudioCommand::Play(sound) => {
                let handle = assets.handle(sound);
                let entity = commands
                    .spawn((
                        Name::new(format!("Sound {}", sound.name())),
                        sound_effect(handle),
                        Playing(sound),
                    ))
                    .id();
                live.push(Live {
                    entity,
                    sound,
                    is_music: false,
                });
            }
            AudioCommand::Loop(sound) => {
                if live.iter().any(|item| !item.is_music && item.sound == sound) {
                    continue;
                }
                let handle = assets.handle(sound);
                let entity = commands
                    .spawn((
                        Name::new(format!("Looping {}", sound.name())),
                        looping_sound_effect(handle),
                        Playing(sound),
                    ))
                    .id();
                live.push(Live {
                    entity,
                    sound,
                    is_music: false,
                });
            }
            AudioCommand::Stop(sound) => {
                despawn_where(&mut commands, &mut live, |item| {
                    !item.is_music && item.sound == sound
                });
            }
            AudioCommand::Music(track) => {
                if live.iter().any(|item| item.is_music && item.sound == track) {
                    continue;
                }
                despawn_where(&mut commands, &mut live, |item| item.is_music);
                let handle = assets.handle(track);
                let entity = commands
                    .spawn((
                        Name::new(format!("Music {}", track.name())),
                        music(handle),
                        Playing(track),
                    ))
                    .id();
                live.push(Live {
                    entity,
                    sound: track,
                    is_music: true,
                });
                debug!("Playing music {}", track.name());
            }
            AudioCommand::StopMusic => {
                despawn_where(&mut commands, &mut live, |item| item.is_music);
            }
            AudioCommand::StopAll => {
                despawn_where(&mut commands, &mut live, |_| true);
            }
        }
    }
}

fn despawn_where(commands: &mut Commands, live: &mut Vec<Live>, stop: impl Fn(&Live) -> bool) {
    live.retain(|item| {
        if !stop(item) {
            return true;
        }
        commands.entity(item.entity).despawn();
        false
    });
}

/// Apply global volume changes to sinks that are already playing.
fn apply_global_volume(
    global_volume: Res<GlobalVolume>,
    mut audio_query: Query<(&PlaybackSettings, &mut AudioSink)>,
) {
    for (playback, mut sink) in &mut audio_query {
        sink.set_volume(global_volume.volume * playback.volume);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_effects_never_queue() {
        let queue = AudioQueue::default();
        let mut audio = BevyAudio::new(queue.clone());
        audio.set_effects_enabled(false);
        audio.play_sound(Sound::Swipe);
        audio.play_looping(Sound::BombTick);
        audio.play_background_music(Sound::GamePlay);

        assert_eq!(
            queue.drain(),
            vec![
                AudioCommand::Stop(Sound::BombTick),
                AudioCommand::Music(Sound::GamePlay),
            ]
        );
    }

    #[test]
    fn test_disabled_music_stops_and_stays_off() {
        let queue = AudioQueue::default();
        let mut audio = BevyAudio::new(queue.clone());
        audio.play_background_music(Sound::GameHome);
        audio.set_music_enabled(false);
        audio.play_background_music(Sound::GamePlay);
        audio.play_sound(Sound::LevelWin);

        assert_eq!(
            queue.drain(),
            vec![
                AudioCommand::Music(Sound::GameHome),
                AudioCommand::StopMusic,
                AudioCommand::Play(Sound::LevelWin),
            ]
        );
        assert!(queue.drain().is_empty());
    }
}
