//! Multichannel audio buffer

use crate::{Error, Result};

/// In-memory audio container
///
/// Samples are f32 in planar layout (one `Vec` per channel), nominally in
/// [-1, 1] but never clipped by this type. Invariant: every channel has the
/// same frame count, the sample rate is > 0, and there is at least one
/// channel. Constructors validate; the fields stay private so the invariant
/// holds for the buffer's whole life.
///
/// Buffers are plain values: pipeline stages never mutate an input buffer,
/// each stage allocates its own output.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    /// Create a buffer from planar channel data
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::UnsupportedFormat("sample rate must be > 0".into()));
        }
        if channels.is_empty() {
            return Err(Error::UnsupportedFormat(
                "buffer must have at least one channel".into(),
            ));
        }
        let frame_count = channels[0].len();
        if channels.iter().any(|ch| ch.len() != frame_count) {
            return Err(Error::MalformedAudio(format!(
                "channel lengths differ: {:?}",
                channels.iter().map(|ch| ch.len()).collect::<Vec<_>>()
            )));
        }
        Ok(Self {
            sample_rate,
            channels,
        })
    }

    /// Create a mono buffer from a single sample vector
    pub fn from_mono(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        Self::new(vec![samples], sample_rate)
    }

    /// Create an all-zero buffer
    pub fn silent(channel_count: usize, frame_count: usize, sample_rate: u32) -> Result<Self> {
        if channel_count == 0 {
            return Err(Error::UnsupportedFormat(
                "buffer must have at least one channel".into(),
            ));
        }
        Self::new(vec![vec![0.0; frame_count]; channel_count], sample_rate)
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of channels
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Frames per channel
    pub fn frame_count(&self) -> usize {
        self.channels[0].len()
    }

    /// Check if the buffer holds no frames
    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }

    /// Duration in seconds
    pub fn duration(&self) -> f32 {
        self.frame_count() as f32 / self.sample_rate as f32
    }

    /// Samples of one channel
    ///
    /// Panics if `index >= channel_count()`, like slice indexing.
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    /// All channels in planar layout
    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Peak absolute amplitude across all channels
    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flat_map(|ch| ch.iter())
            .map(|x| x.abs())
            .fold(0.0f32, f32::max)
    }

    /// RMS energy across all channels
    pub fn rms(&self) -> f32 {
        let total: usize = self.channels.iter().map(|ch| ch.len()).sum();
        if total == 0 {
            return 0.0;
        }
        let sum_sq: f32 = self
            .channels
            .iter()
            .flat_map(|ch| ch.iter())
            .map(|x| x * x)
            .sum();
        (sum_sq / total as f32).sqrt()
    }
}
