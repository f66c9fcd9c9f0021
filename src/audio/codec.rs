//! Container decoding capability
//!
//! Full container decoding (MP3, M4A, platform formats) belongs to the host
//! environment. The pipeline depends only on the `AudioCodecProvider` trait;
//! `WavCodec` is the bundled implementation for WAV bytes.

use std::io::Cursor;

use hound::{SampleFormat, WavReader};

use super::AudioBuffer;
use crate::{Error, Result};

/// Decoding capability injected into the pipeline
///
/// Implementations turn encoded container bytes into a buffer, preserving
/// channel count and sample rate. Opaque decoder failures map to
/// `Error::Decode`; structural problems the implementation can identify map
/// to `MalformedAudio` or `UnsupportedFormat`.
pub trait AudioCodecProvider {
    /// Decode encoded audio bytes into a buffer
    fn decode_container(&self, bytes: &[u8]) -> Result<AudioBuffer>;
}

/// WAV decoder backed by hound
///
/// Handles both float and integer sample formats and keeps every channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavCodec;

impl AudioCodecProvider for WavCodec {
    fn decode_container(&self, bytes: &[u8]) -> Result<AudioBuffer> {
        let reader = WavReader::new(Cursor::new(bytes))
            .map_err(|e| Error::MalformedAudio(format!("not a readable WAV: {}", e)))?;
        let spec = reader.spec();
        let channel_count = spec.channels as usize;
        if channel_count == 0 {
            return Err(Error::MalformedAudio("WAV reports zero channels".into()));
        }

        // Read samples based on format
        let interleaved: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| Error::Decode(format!("failed to read samples: {}", e)))?,
            SampleFormat::Int => {
                let bits = spec.bits_per_sample;
                let samples: Vec<i32> = reader
                    .into_samples::<i32>()
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|e| Error::Decode(format!("failed to read samples: {}", e)))?;

                // Normalize to [-1, 1]
                let max_val = (1i64 << (bits - 1)) as f32;
                samples.iter().map(|&s| s as f32 / max_val).collect()
            }
        };

        let frame_count = interleaved.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frame_count); channel_count];
        for frame in 0..frame_count {
            for ch in 0..channel_count {
                channels[ch].push(interleaved[frame * channel_count + ch]);
            }
        }

        AudioBuffer::new(channels, spec.sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::encode_wav_float32;

    fn int16_wav(samples: &[i16], channels: u16, sample_rate: u32) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for &s in samples {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_decode_int16_wav() {
        let bytes = int16_wav(&[0, 16384, -16384, 32767], 2, 44100);
        let buffer = WavCodec.decode_container(&bytes).unwrap();

        assert_eq!(buffer.sample_rate(), 44100);
        assert_eq!(buffer.channel_count(), 2);
        assert_eq!(buffer.frame_count(), 2);
        assert!((buffer.channel(0)[1] + 0.5).abs() < 1e-4);
        assert!((buffer.channel(1)[0] - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_decode_float_wav_round_trip() {
        let original = AudioBuffer::new(
            vec![vec![0.0, 0.5, -0.25], vec![1.0, -1.0, 0.125]],
            48000,
        )
        .unwrap();
        let bytes = encode_wav_float32(&original).unwrap();

        let decoded = WavCodec.decode_container(&bytes).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_decode_garbage_bytes() {
        let result = WavCodec.decode_container(b"definitely not audio");
        assert!(matches!(result, Err(Error::MalformedAudio(_))));
    }
}
