//! Offline resampling using rubato

use rubato::{FastFixedIn, PolynomialDegree, Resampler};

use super::AudioBuffer;
use crate::{Error, Result};

/// Resample a buffer to a target sample rate
///
/// Deterministic offline pass; channel count is preserved. Same-rate input
/// comes back as an identical copy. The output holds exactly
/// `round(frames * target / source)` frames.
pub fn resample(buffer: &AudioBuffer, target_rate: u32) -> Result<AudioBuffer> {
    if target_rate == 0 {
        return Err(Error::UnsupportedFormat(
            "target sample rate must be > 0".into(),
        ));
    }
    if buffer.sample_rate() == target_rate {
        return Ok(buffer.clone());
    }

    let channel_count = buffer.channel_count();
    let frame_count = buffer.frame_count();
    let resample_ratio = target_rate as f64 / buffer.sample_rate() as f64;
    let expected_frames = (frame_count as f64 * resample_ratio).round() as usize;

    // Create resampler
    let mut resampler = FastFixedIn::<f32>::new(
        resample_ratio,
        1.0, // max relative ratio (no variance)
        PolynomialDegree::Cubic,
        1024, // chunk size
        channel_count,
    )
    .map_err(|e| Error::Resample(format!("failed to create resampler: {}", e)))?;

    // Process in chunks
    let input_frames_needed = resampler.input_frames_next();
    let mut input_buffer = vec![vec![0.0f32; input_frames_needed]; channel_count];
    let mut output: Vec<Vec<f32>> = vec![Vec::with_capacity(expected_frames); channel_count];

    let mut pos = 0;
    while pos < frame_count {
        let end = (pos + input_frames_needed).min(frame_count);
        let chunk_size = end - pos;

        for (ch, input) in input_buffer.iter_mut().enumerate() {
            input[..chunk_size].copy_from_slice(&buffer.channel(ch)[pos..end]);

            // Pad with zeros if needed
            if chunk_size < input_frames_needed {
                input[chunk_size..].fill(0.0);
            }
        }

        let processed = resampler
            .process(&input_buffer, None)
            .map_err(|e| Error::Resample(format!("resampling failed: {}", e)))?;

        for (ch, out) in output.iter_mut().enumerate() {
            out.extend_from_slice(&processed[ch]);
        }

        pos += chunk_size;
        if chunk_size < input_frames_needed {
            break;
        }
    }

    // Trim or zero-pad to the expected length
    for out in &mut output {
        out.resize(expected_frames, 0.0);
    }

    AudioBuffer::new(output, target_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, rate: u32, frames: usize) -> Vec<f32> {
        (0..frames)
            .map(|i| {
                let t = i as f32 / rate as f32;
                (2.0 * std::f32::consts::PI * freq * t).sin() * 0.5
            })
            .collect()
    }

    #[test]
    fn test_identity_resample_is_equal() {
        let buffer = AudioBuffer::from_mono(sine(440.0, 44100, 44100), 44100).unwrap();
        let out = resample(&buffer, 44100).unwrap();
        assert_eq!(out, buffer);
    }

    #[test]
    fn test_output_length_rounds() {
        let buffer = AudioBuffer::from_mono(sine(440.0, 44100, 44100), 44100).unwrap();
        let out = resample(&buffer, 22050).unwrap();
        assert_eq!(out.sample_rate(), 22050);
        assert_eq!(out.frame_count(), 22050);

        let buffer = AudioBuffer::from_mono(vec![0.0; 24000], 24000).unwrap();
        let out = resample(&buffer, 44100).unwrap();
        assert_eq!(out.frame_count(), 44100);
    }

    #[test]
    fn test_channels_stay_separate() {
        let left = vec![0.5f32; 8000];
        let right = vec![-0.25f32; 8000];
        let buffer = AudioBuffer::new(vec![left, right], 16000).unwrap();

        let out = resample(&buffer, 44100).unwrap();
        assert_eq!(out.channel_count(), 2);

        // Away from the edges a DC signal survives interpolation
        let mid = out.frame_count() / 2;
        assert!((out.channel(0)[mid] - 0.5).abs() < 0.01);
        assert!((out.channel(1)[mid] + 0.25).abs() < 0.01);
    }

    #[test]
    fn test_zero_target_rate_rejected() {
        let buffer = AudioBuffer::from_mono(vec![0.0; 100], 44100).unwrap();
        assert!(matches!(
            resample(&buffer, 0),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = AudioBuffer::from_mono(vec![], 24000).unwrap();
        let out = resample(&buffer, 44100).unwrap();
        assert_eq!(out.sample_rate(), 44100);
        assert_eq!(out.frame_count(), 0);
    }
}
