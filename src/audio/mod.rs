//! Audio processing module for narramix
//!
//! Provides the multichannel buffer type, PCM16/WAV codecs, offline
//! resampling, and buffer concatenation.

mod buffer;
mod codec;
mod concat;
mod pcm;
mod resample;

pub use buffer::AudioBuffer;
pub use codec::{AudioCodecProvider, WavCodec};
pub use concat::concatenate;
pub use pcm::{decode_pcm16, encode_wav_float32};
pub use resample::resample;
