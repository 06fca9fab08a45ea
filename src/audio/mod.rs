//! Music and sound playback routed to a host-provided output.
//!
//! Decoding and mixing belong to the host: the player only resolves references, tracks
//! channel state, and hands clip bytes plus the master volume to an [`AudioSink`].

use crate::{
    archive::classify::AudioKind,
    assets::resolve::{AssetRef, AssetResolver},
    catalog::model::AudioClip,
    foundation::error::{SketchError, SketchResult},
};

/// Host audio output. One channel per [`AudioKind`]; playing on a channel replaces its clip.
pub trait AudioSink: Send {
    fn play(&mut self, channel: AudioKind, clip: &AudioClip, volume: f32);
    fn pause(&mut self, channel: AudioKind);
    fn resume(&mut self, channel: AudioKind);
    fn set_volume(&mut self, _volume: f32) {}
}

/// Sink that discards all audio.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentSink;

impl AudioSink for SilentSink {
    fn play(&mut self, channel: AudioKind, clip: &AudioClip, volume: f32) {
        tracing::debug!(?channel, bytes = clip.bytes().len(), volume, "audio play (silent)");
    }

    fn pause(&mut self, _channel: AudioKind) {}

    fn resume(&mut self, _channel: AudioKind) {}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum ChannelState {
    #[default]
    Empty,
    Playing,
    Paused,
}

/// Resolves audio references and drives the sink's music and sound channels.
pub struct AudioPlayer {
    sink: Box<dyn AudioSink>,
    volume: f32,
    music: ChannelState,
}

impl std::fmt::Debug for AudioPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioPlayer")
            .field("volume", &self.volume)
            .field("music", &self.music)
            .finish()
    }
}

impl Default for AudioPlayer {
    fn default() -> Self {
        Self::new(Box::new(SilentSink), 1.0)
    }
}

impl AudioPlayer {
    pub fn new(sink: Box<dyn AudioSink>, volume: f32) -> Self {
        Self {
            sink,
            volume: volume.clamp(0.0, 1.0),
            music: ChannelState::Empty,
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) -> SketchResult<()> {
        if !volume.is_finite() || !(0.0..=1.0).contains(&volume) {
            return Err(SketchError::validation("volume must be within [0, 1]"));
        }
        self.volume = volume;
        self.sink.set_volume(volume);
        Ok(())
    }

    /// Play a music clip. Returns whether anything was played.
    pub fn play_music(&mut self, assets: &AssetResolver<'_>, asset: &AssetRef) -> bool {
        let played = self.play(assets, AudioKind::Music, asset);
        if played {
            self.music = ChannelState::Playing;
        }
        played
    }

    /// Play a sound effect. Returns whether anything was played.
    pub fn play_sound(&mut self, assets: &AssetResolver<'_>, asset: &AssetRef) -> bool {
        self.play(assets, AudioKind::Sound, asset)
    }

    /// Whether music is not currently playing. True when no music was ever started.
    pub fn is_music_paused(&self) -> bool {
        self.music != ChannelState::Playing
    }

    pub fn set_music_paused(&mut self, paused: bool) {
        match (self.music, paused) {
            (ChannelState::Playing, true) => {
                self.sink.pause(AudioKind::Music);
                self.music = ChannelState::Paused;
            }
            (ChannelState::Paused, false) => {
                self.sink.resume(AudioKind::Music);
                self.music = ChannelState::Playing;
            }
            _ => {}
        }
    }

    fn play(&mut self, assets: &AssetResolver<'_>, kind: AudioKind, asset: &AssetRef) -> bool {
        match assets.audio(kind, asset) {
            Some(clip) => {
                self.sink.play(kind, clip, self.volume);
                true
            }
            None => {
                tracing::debug!(%asset, ?kind, "unresolved audio reference");
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mod.rs"]
mod tests;
