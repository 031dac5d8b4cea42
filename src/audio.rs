//! Background music and its pause/resume buttons.
//!
//! Music runs beside the game: the transport buttons talk to the player
//! directly and never go through the work queue.

use crate::{
    config::MUSIC_VOLUME,
    hal::Audio,
};

/// A press on one of the transport buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transport {
    Pause,
    Resume,
}

/// Wraps an [`Audio`] collaborator and remembers whether music is playing.
pub struct Player<A> {
    audio: A,
    playing: bool,
}

impl<A: Audio> Player<A> {
    pub const fn new(audio: A) -> Self {
        Self {
            audio,
            playing: false,
        }
    }

    /// Loop `track` at full volume.
    pub fn start(&mut self, track: &'static [i16]) {
        self.audio.set_volume(MUSIC_VOLUME);
        self.audio.play_loop(track);
        self.playing = true;
        debug!("music started, {} samples", track.len());
    }

    pub fn apply(&mut self, transport: Transport) {
        match transport {
            Transport::Pause => {
                info!("music paused");
                self.audio.pause();
                self.playing = false;
            }
            Transport::Resume => {
                info!("music resumed");
                self.audio.resume();
                self.playing = true;
            }
        }
    }

    pub const fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }
}
