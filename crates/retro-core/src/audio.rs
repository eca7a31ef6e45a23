//! Background music director.
//!
//! Mirrors the view's music flag and volume into an [`AudioBackend`].
//! Disarmed until the console is powered on, so nothing can start playing
//! before the first user gesture.

use crate::backend::AudioBackend;
use crate::error::Result;

/// Map a 0-100 volume to the backend gain (0.0-0.5).
pub fn gain_for_volume(volume: u8) -> f32 {
    f32::from(volume.min(100)) / 200.0
}

#[derive(Debug, Default)]
pub struct AudioDirector {
    armed: bool,
    playing: Option<bool>,
    volume: Option<u8>,
}

impl AudioDirector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow playback from now on.
    pub fn arm(&mut self) {
        if !self.armed {
            log::debug!("Audio armed");
            self.armed = true;
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Push `music_playing`/`volume` to `audio`, touching it only on change.
    pub fn sync(
        &mut self,
        audio: &mut dyn AudioBackend,
        music_playing: bool,
        volume: u8,
    ) -> Result<()> {
        if !self.armed {
            return Ok(());
        }
        if self.volume != Some(volume) {
            audio.set_gain(gain_for_volume(volume))?;
            self.volume = Some(volume);
        }
        if self.playing != Some(music_playing) {
            if music_playing {
                audio.play()?;
            } else {
                audio.pause()?;
            }
            self.playing = Some(music_playing);
            log::debug!("Music output {}", if music_playing { "playing" } else { "paused" });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RetroError;

    #[derive(Default)]
    struct MockAudio {
        calls: Vec<String>,
        playing: bool,
        fail_play: bool,
    }

    impl AudioBackend for MockAudio {
        fn play(&mut self) -> Result<()> {
            if self.fail_play {
                return Err(RetroError::Audio("device lost".into()));
            }
            self.calls.push("play".into());
            self.playing = true;
            Ok(())
        }
        fn pause(&mut self) -> Result<()> {
            self.calls.push("pause".into());
            self.playing = false;
            Ok(())
        }
        fn set_gain(&mut self, gain: f32) -> Result<()> {
            self.calls.push(format!("gain {gain}"));
            Ok(())
        }
        fn is_playing(&self) -> bool {
            self.playing
        }
    }

    #[test]
    fn gain_mapping() {
        assert_eq!(gain_for_volume(0), 0.0);
        assert_eq!(gain_for_volume(80), 0.4);
        assert_eq!(gain_for_volume(100), 0.5);
        assert_eq!(gain_for_volume(255), 0.5);
    }

    #[test]
    fn silent_until_armed() {
        let mut audio = MockAudio::default();
        let mut dir = AudioDirector::new();
        dir.sync(&mut audio, true, 80).unwrap();
        assert!(audio.calls.is_empty());
        dir.arm();
        dir.sync(&mut audio, true, 80).unwrap();
        assert_eq!(audio.calls, ["gain 0.4", "play"]);
        assert!(audio.is_playing());
    }

    #[test]
    fn only_changes_reach_backend() {
        let mut audio = MockAudio::default();
        let mut dir = AudioDirector::new();
        dir.arm();
        dir.sync(&mut audio, true, 80).unwrap();
        dir.sync(&mut audio, true, 80).unwrap();
        dir.sync(&mut audio, false, 80).unwrap();
        dir.sync(&mut audio, false, 90).unwrap();
        assert_eq!(audio.calls, ["gain 0.4", "play", "pause", "gain 0.45"]);
    }

    #[test]
    fn failed_play_is_retried_next_sync() {
        let mut audio = MockAudio {
            fail_play: true,
            ..Default::default()
        };
        let mut dir = AudioDirector::new();
        dir.arm();
        assert!(dir.sync(&mut audio, true, 50).is_err());
        audio.fail_play = false;
        dir.sync(&mut audio, true, 50).unwrap();
        assert!(audio.is_playing());
    }
}
