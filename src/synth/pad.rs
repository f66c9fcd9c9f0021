//! Ambient pad generator
//!
//! Produces the stereo background beds used when a book chapter has no
//! licensed music track: four detuned sine partials per mood with slow
//! frequency drift, a little noise for air, and 2 second edge fades.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::audio::AudioBuffer;
use crate::{Error, Result};

/// Emotional flavor of a generated pad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmbientMood {
    Tense,
    Hopeful,
    Neutral,
}

impl AmbientMood {
    /// Chord partials for the mood, in Hz
    pub fn frequencies(&self) -> [f32; 4] {
        match self {
            AmbientMood::Tense => [55.0, 58.7, 82.4, 110.0],
            AmbientMood::Hopeful => [130.8, 164.8, 196.0, 261.6],
            AmbientMood::Neutral => [110.0, 164.8, 220.0, 329.6],
        }
    }
}

impl std::str::FromStr for AmbientMood {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "tense" => Ok(AmbientMood::Tense),
            "hopeful" => Ok(AmbientMood::Hopeful),
            "neutral" => Ok(AmbientMood::Neutral),
            other => Err(Error::Config(format!(
                "unknown mood '{}' (expected tense, hopeful, or neutral)",
                other
            ))),
        }
    }
}

/// Procedural ambient pad synthesizer
///
/// Output is deterministic for a fixed `(sample_rate, seed, duration, mood)`
/// tuple; without a seed the noise floor comes from OS entropy.
#[derive(Debug, Clone)]
pub struct PadSynth {
    sample_rate: u32,
    seed: Option<u64>,
}

impl PadSynth {
    /// Create a synthesizer producing audio at `sample_rate`
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            seed: None,
        }
    }

    /// Fix the noise seed for reproducible output
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Output sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Generate a stereo pad of `floor(duration_secs * sample_rate)` frames
    ///
    /// Each sample sums the mood's four partials, each drifting a few Hz on
    /// its own slow sine, plus a -46 dB noise floor. A linear fade covers
    /// the first and last 2 seconds; on pads shorter than 4 seconds the
    /// tail fade wins where the windows overlap. The right channel is the
    /// left scaled by 0.9 for a touch of width.
    pub fn generate(&self, duration_secs: f64, mood: AmbientMood) -> Result<AudioBuffer> {
        if self.sample_rate == 0 {
            return Err(Error::UnsupportedFormat("sample rate must be > 0".into()));
        }
        if !duration_secs.is_finite() || duration_secs < 0.0 {
            return Err(Error::UnsupportedFormat(format!(
                "pad duration must be finite and non-negative, got {}",
                duration_secs
            )));
        }

        let frame_count = (duration_secs * self.sample_rate as f64).floor() as usize;
        let frequencies = mood.frequencies();
        let partial_level = 0.1 / frequencies.len() as f64;
        let fade_frames = self.sample_rate as usize * 2;

        let mut rng: StdRng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        log::debug!(
            "Generating {:.2}s {:?} pad at {} Hz",
            duration_secs,
            mood,
            self.sample_rate
        );

        let mut left = Vec::with_capacity(frame_count);
        let mut right = Vec::with_capacity(frame_count);

        for i in 0..frame_count {
            let t = i as f64 / self.sample_rate as f64;

            let mut sample = 0.0f64;
            for (k, freq) in frequencies.iter().enumerate() {
                // Slow per-partial drift keeps the chord from sounding static
                let drift = (t * 0.1 * (k as f64 + 1.0)).sin() * 2.0;
                sample +=
                    (2.0 * std::f64::consts::PI * (*freq as f64 + drift) * t).sin() * partial_level;
            }

            let noise = rng.gen_range(-1.0f64..1.0) * 0.005;

            // Linear edge fades; the tail fade overrides where they overlap
            let mut envelope = 1.0f64;
            if i < fade_frames {
                envelope = i as f64 / fade_frames as f64;
            }
            if i as i64 > frame_count as i64 - fade_frames as i64 {
                envelope = (frame_count - i) as f64 / fade_frames as f64;
            }

            let wet = sample + noise;
            left.push((wet * envelope) as f32);
            right.push((wet * 0.9 * envelope) as f32);
        }

        AudioBuffer::new(vec![left, right], self.sample_rate)
    }
}
