//! SDL2 audio backend: a looping square-wave chiptune.
//!
//! The track is synthesised in the audio callback, so there is nothing to
//! load or stream. Gain changes go through the device lock.

use sdl2::Sdl;
use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};

use retro_core::backend::AudioBackend;
use retro_core::error::{Result, RetroError};

const SAMPLE_RATE: i32 = 44_100;

/// Note length in seconds.
const NOTE_SECS: f32 = 0.15;

/// Melody in Hz; `0.0` is a rest.
const MELODY: [f32; 16] = [
    523.25, 659.25, 783.99, 659.25, 523.25, 659.25, 783.99, 1046.50, //
    587.33, 698.46, 880.00, 698.46, 587.33, 0.0, 493.88, 0.0,
];

/// Bass line, one note per four melody notes.
const BASS: [f32; 4] = [130.81, 146.83, 174.61, 123.47];

/// Sample generator running on SDL's audio thread.
struct Chiptune {
    sample_rate: f32,
    gain: f32,
    /// Samples since the start of the loop.
    cursor: u64,
}

impl Chiptune {
    fn new(sample_rate: i32) -> Self {
        Self {
            sample_rate: sample_rate as f32,
            gain: 0.0,
            cursor: 0,
        }
    }

    fn loop_len(&self) -> u64 {
        (self.sample_rate * NOTE_SECS) as u64 * MELODY.len() as u64
    }

    fn next_sample(&mut self) -> f32 {
        let note_len = ((self.sample_rate * NOTE_SECS) as u64).max(1);
        let note = (self.cursor / note_len) as usize % MELODY.len();
        let t = self.cursor as f32 / self.sample_rate;

        let lead = square(MELODY[note], t, 0.25);
        let bass = square(BASS[note / 4], t, 0.5);

        // Short decay per note keeps the lead plucky.
        let within = (self.cursor % note_len) as f32 / note_len as f32;
        let envelope = 1.0 - 0.7 * within;

        self.cursor = (self.cursor + 1) % self.loop_len().max(1);
        (lead * 0.6 * envelope + bass * 0.4) * self.gain
    }
}

/// Square wave in [-1, 1] with the given duty cycle. Silent for `freq <= 0`.
fn square(freq: f32, t: f32, duty: f32) -> f32 {
    if freq <= 0.0 {
        return 0.0;
    }
    if (t * freq).fract() < duty { 1.0 } else { -1.0 }
}

impl AudioCallback for Chiptune {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }
}

/// Background-music output through an SDL playback device.
pub struct SdlAudioBackend {
    device: AudioDevice<Chiptune>,
    playing: bool,
}

impl SdlAudioBackend {
    /// Open a paused mono playback device on `sdl`.
    pub fn new(sdl: &Sdl) -> Result<Self> {
        let audio = sdl.audio().map_err(RetroError::Audio)?;
        let desired = AudioSpecDesired {
            freq: Some(SAMPLE_RATE),
            channels: Some(1),
            samples: Some(1024),
        };
        let device = audio
            .open_playback(None, &desired, |spec| Chiptune::new(spec.freq))
            .map_err(RetroError::Audio)?;
        log::info!("SDL2 audio opened: {} Hz", device.spec().freq);
        Ok(Self {
            device,
            playing: false,
        })
    }
}

impl AudioBackend for SdlAudioBackend {
    fn play(&mut self) -> Result<()> {
        self.device.resume();
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.device.pause();
        self.playing = false;
        Ok(())
    }

    fn set_gain(&mut self, gain: f32) -> Result<()> {
        self.device.lock().gain = gain.clamp(0.0, 1.0);
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_wave_duty() {
        assert_eq!(square(1.0, 0.1, 0.25), 1.0);
        assert_eq!(square(1.0, 0.5, 0.25), -1.0);
        assert_eq!(square(0.0, 0.1, 0.25), 0.0);
    }

    #[test]
    fn silent_at_zero_gain() {
        let mut tune = Chiptune::new(8_000);
        let mut out = [1.0f32; 256];
        tune.callback(&mut out);
        assert!(out.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn samples_stay_within_gain() {
        let mut tune = Chiptune::new(8_000);
        tune.gain = 0.5;
        let mut out = [0.0f32; 4096];
        tune.callback(&mut out);
        assert!(out.iter().all(|s| s.abs() <= 0.5 + f32::EPSILON));
        assert!(out.iter().any(|s| *s != 0.0));
    }

    #[test]
    fn cursor_wraps_at_loop_end() {
        let mut tune = Chiptune::new(8_000);
        let len = tune.loop_len();
        for _ in 0..len {
            tune.next_sample();
        }
        assert_eq!(tune.cursor, 0);
    }
}
