//! narramix - Audiobook Mastering Engine
//!
//! Sample-accurate PCM decode, resample, merge, and float32 WAV export,
//! plus a sidechain-ducking voice/music mixer and a procedural ambient pad
//! synthesizer for chapters that ship without a licensed music track.
//!
//! # Features
//! - Raw narration PCM16 assembly at the service rate
//! - Offline resampling to a fixed master rate
//! - Sidechain ducking: music pulls back while the narrator speaks
//! - Mood-based ambient pad generation with reproducible seeds
//! - Injectable container decoding, WAV bundled
//!
//! # Example
//! ```no_run
//! use narramix::pipeline::{MasteringPipeline, MusicSource};
//! use narramix::synth::AmbientMood;
//! use narramix::MasterConfig;
//!
//! let pipeline = MasteringPipeline::new(MasterConfig::default()).unwrap();
//! let result = pipeline
//!     .master_with_music("narration.wav", &MusicSource::Ambient(AmbientMood::Hopeful))
//!     .unwrap();
//! result.save("chapter1.wav").unwrap();
//! ```

// Allow dead code for utility functions intended for library consumers
#![allow(dead_code)]
// Allow traditional for loops - often clearer for audio DSP code
#![allow(clippy::needless_range_loop)]

pub mod audio;
pub mod config;
pub mod error;
pub mod mix;
pub mod pipeline;
pub mod synth;

pub use config::MasterConfig;
pub use error::{Error, Result};
pub use pipeline::MasteringPipeline;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Sample rate every mastered output is rendered at
pub const MASTER_SAMPLE_RATE: u32 = 44100;

/// Sample rate of narration PCM delivered by the TTS service
pub const NARRATION_SAMPLE_RATE: u32 = 24000;

/// Channel count of narration PCM delivered by the TTS service
pub const NARRATION_CHANNELS: usize = 1;

/// Seconds of ambient pad carried past the end of the voice
pub const PAD_TAIL_SECS: f64 = 5.0;
