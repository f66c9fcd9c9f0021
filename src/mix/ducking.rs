//! Sidechain ducking mixer
//!
//! Mixes a narration voice over a music bed, pulling the music down while
//! the voice is active and letting it swell back in pauses.

use serde::{Deserialize, Serialize};

use crate::audio::AudioBuffer;
use crate::{Error, Result};

/// Sidechain ducking parameters
///
/// Defaults are the studio mixer's shipped settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DuckingParams {
    /// Voice magnitude above which the music is ducked
    pub threshold: f32,
    /// Gain the music is pulled down to while the voice is active
    pub duck_ratio: f32,
    /// Seconds for the gain to walk down to `duck_ratio`
    pub attack_secs: f32,
    /// Seconds for the gain to walk back up to 1.0
    pub release_secs: f32,
    /// Music level applied before ducking
    pub music_volume: f32,
}

impl Default for DuckingParams {
    fn default() -> Self {
        Self {
            threshold: 0.02,
            duck_ratio: 0.2,
            attack_secs: 0.2,
            release_secs: 0.8,
            music_volume: 0.4,
        }
    }
}

impl DuckingParams {
    /// Validate parameter ranges
    pub fn validate(&self) -> Result<()> {
        if !self.attack_secs.is_finite() || self.attack_secs <= 0.0 {
            return Err(Error::MixConfig("attack_secs must be > 0".into()));
        }
        if !self.release_secs.is_finite() || self.release_secs <= 0.0 {
            return Err(Error::MixConfig("release_secs must be > 0".into()));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::MixConfig("threshold must be in [0, 1]".into()));
        }
        if !(0.0..=1.0).contains(&self.duck_ratio) {
            return Err(Error::MixConfig("duck_ratio must be in [0, 1]".into()));
        }
        if !(0.0..=1.0).contains(&self.music_volume) {
            return Err(Error::MixConfig("music_volume must be in [0, 1]".into()));
        }
        Ok(())
    }
}

/// Mix voice over a music bed with sidechain ducking
///
/// Produces a stereo buffer of `max(voice, music)` frames at the shared
/// sample rate. The voice (channel 0) is mixed center into both output
/// channels; the music loops modulo its own length under a longer voice,
/// and a mono bed feeds both sides. The duck gain follows the raw voice
/// magnitude sample by sample: it steps linearly toward `duck_ratio` while
/// the voice is above `threshold` and back toward 1.0 below it, clamping at
/// the target. No limiter is applied, the f32 sum keeps its headroom.
///
/// Both inputs must share a sample rate; the caller resamples first.
pub fn mix_with_ducking(
    voice: &AudioBuffer,
    music: &AudioBuffer,
    params: &DuckingParams,
) -> Result<AudioBuffer> {
    params.validate()?;
    if voice.sample_rate() != music.sample_rate() {
        return Err(Error::UnsupportedFormat(format!(
            "voice is {} Hz but music is {} Hz, resample to a shared rate first",
            voice.sample_rate(),
            music.sample_rate()
        )));
    }

    let sample_rate = voice.sample_rate();
    let frame_count = voice.frame_count().max(music.frame_count());

    let voice_data = voice.channel(0);
    let music_l = music.channel(0);
    let music_r = if music.channel_count() > 1 {
        music.channel(1)
    } else {
        music.channel(0)
    };

    let mut out_l = Vec::with_capacity(frame_count);
    let mut out_r = Vec::with_capacity(frame_count);

    let mut current_gain = 1.0f32;
    let attack_step = 1.0 / (params.attack_secs * sample_rate as f32);
    let release_step = 1.0 / (params.release_secs * sample_rate as f32);

    for i in 0..frame_count {
        let voice_sample = if i < voice_data.len() {
            voice_data[i]
        } else {
            0.0
        };

        // Instantaneous envelope: raw magnitude against the threshold
        let target_gain = if voice_sample.abs() > params.threshold {
            params.duck_ratio
        } else {
            1.0
        };

        if current_gain > target_gain {
            current_gain = (current_gain - attack_step).max(target_gain);
        } else if current_gain < target_gain {
            current_gain = (current_gain + release_step).min(target_gain);
        }

        let (bed_l, bed_r) = if music_l.is_empty() {
            (0.0, 0.0)
        } else {
            let music_index = i % music_l.len();
            (music_l[music_index], music_r[music_index])
        };

        let ducked = params.music_volume * current_gain;
        out_l.push(voice_sample + bed_l * ducked);
        out_r.push(voice_sample + bed_r * ducked);
    }

    AudioBuffer::new(vec![out_l, out_r], sample_rate)
}
