//! Sound cues.
//!
//! Playback is fire-and-forget: a cue that fails to play is dropped without
//! affecting the game.

use fundsp::prelude::*;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::error::AudioError;

const SAMPLE_RATE: u32 = 44_100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Flap,
    Score,
    Hit,
    GameOver,
}

impl Cue {
    pub const ALL: [Cue; 4] = [Cue::Flap, Cue::Score, Cue::Hit, Cue::GameOver];

    fn index(self) -> usize {
        match self {
            Cue::Flap => 0,
            Cue::Score => 1,
            Cue::Hit => 2,
            Cue::GameOver => 3,
        }
    }
}

pub trait SoundPlayer {
    fn play(&mut self, cue: Cue);
}

impl<P: SoundPlayer + ?Sized> SoundPlayer for Box<P> {
    fn play(&mut self, cue: Cue) {
        (**self).play(cue);
    }
}

/// Plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl SoundPlayer for Silent {
    fn play(&mut self, _cue: Cue) {}
}

/// Remembers every cue it was asked to play.
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    pub played: Vec<Cue>,
}

impl Recorder {
    pub fn count(&self, cue: Cue) -> usize {
        self.played.iter().filter(|&&c| c == cue).count()
    }
}

impl SoundPlayer for Recorder {
    fn play(&mut self, cue: Cue) {
        self.played.push(cue);
    }
}

// ── Synthesized cues ────────────────────────────────────────────────────────

/// Quick upward chirp.
fn flap_sound() -> Box<dyn AudioUnit> {
    let freq = lfo(|t: f32| 320.0 + 900.0 * (t / 0.08).min(1.0));
    let gain = lfo(|t: f32| 0.12 * (1.0 - t / 0.1).max(0.0));
    Box::new((freq >> sine::<f32>()) * gain)
}

/// Two-note ding.
fn score_sound() -> Box<dyn AudioUnit> {
    let freq = lfo(|t: f32| -> f32 { if t < 0.07 { 988.0 } else { 1319.0 } });
    let gain = lfo(|t: f32| 0.1 * (1.0 - t / 0.25).max(0.0));
    Box::new((freq >> square()) * gain)
}

/// Short noise burst.
fn hit_sound() -> Box<dyn AudioUnit> {
    let gain = lfo(|t: f32| 0.2 * (1.0 - t / 0.15).max(0.0));
    Box::new(noise() * gain)
}

/// Falling sawtooth, 400Hz to 80Hz.
fn game_over_sound() -> Box<dyn AudioUnit> {
    let freq = lfo(|t: f32| 400.0 + (80.0 - 400.0) * (t / 0.4).min(1.0));
    let gain = lfo(|t: f32| 0.15 * (1.0 - t / 0.5).max(0.0));
    Box::new((freq >> saw()) * gain)
}

fn seconds(cue: Cue) -> f64 {
    match cue {
        Cue::Flap => 0.1,
        Cue::Score => 0.25,
        Cue::Hit => 0.15,
        Cue::GameOver => 0.5,
    }
}

/// Render a mono generator into a sample buffer.
fn render(mut unit: Box<dyn AudioUnit>, secs: f64) -> Vec<f32> {
    unit.set_sample_rate(SAMPLE_RATE as f64);
    unit.reset();
    let n = (secs * SAMPLE_RATE as f64) as usize;
    (0..n).map(|_| unit.get_mono()).collect()
}

pub fn synthesize(cue: Cue) -> Vec<f32> {
    let unit = match cue {
        Cue::Flap => flap_sound(),
        Cue::Score => score_sound(),
        Cue::Hit => hit_sound(),
        Cue::GameOver => game_over_sound(),
    };
    render(unit, seconds(cue))
}

/// Plays the synthesized cues on the default output device.
///
/// Each cue has its own sink, so cues overlap each other but a repeated cue
/// restarts instead of queuing behind itself.
pub struct Synth {
    // Dropping the stream stops all audio.
    _stream: OutputStream,
    sinks: Vec<Sink>,
    samples: Vec<Vec<f32>>,
}

impl Synth {
    pub fn open() -> Result<Self, AudioError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| AudioError::Output(e.to_string()))?;
        stream.log_on_drop(false);

        let sinks = Cue::ALL
            .iter()
            .map(|_| Sink::connect_new(stream.mixer()))
            .collect();
        let samples = Cue::ALL.iter().map(|&cue| synthesize(cue)).collect();

        Ok(Self {
            _stream: stream,
            sinks,
            samples,
        })
    }
}

impl SoundPlayer for Synth {
    fn play(&mut self, cue: Cue) {
        let i = cue.index();
        let sink = &self.sinks[i];
        sink.clear();
        sink.append(SamplesBuffer::new(1, SAMPLE_RATE, self.samples[i].clone()));
        sink.play();
    }
}
