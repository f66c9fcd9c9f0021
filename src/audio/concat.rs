//! Buffer concatenation

use super::AudioBuffer;
use crate::{Error, Result};

/// Concatenate buffers end to end, in caller order
///
/// All inputs must share sample rate and channel count. An empty slice
/// yields a one-frame silent mono buffer at the narration rate so callers
/// always get something playable; a single input comes back as a copy.
pub fn concatenate(buffers: &[AudioBuffer]) -> Result<AudioBuffer> {
    if buffers.is_empty() {
        return AudioBuffer::silent(1, 1, crate::NARRATION_SAMPLE_RATE);
    }
    if buffers.len() == 1 {
        return Ok(buffers[0].clone());
    }

    let sample_rate = buffers[0].sample_rate();
    let channel_count = buffers[0].channel_count();
    for (i, buffer) in buffers.iter().enumerate().skip(1) {
        if buffer.sample_rate() != sample_rate {
            return Err(Error::UnsupportedFormat(format!(
                "buffer {} has sample rate {} Hz, expected {} Hz",
                i,
                buffer.sample_rate(),
                sample_rate
            )));
        }
        if buffer.channel_count() != channel_count {
            return Err(Error::UnsupportedFormat(format!(
                "buffer {} has {} channels, expected {}",
                i,
                buffer.channel_count(),
                channel_count
            )));
        }
    }

    let total_frames: usize = buffers.iter().map(|b| b.frame_count()).sum();
    let mut channels = vec![Vec::with_capacity(total_frames); channel_count];
    for buffer in buffers {
        for (ch, out) in channels.iter_mut().enumerate() {
            out.extend_from_slice(buffer.channel(ch));
        }
    }

    AudioBuffer::new(channels, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_additivity() {
        let a = AudioBuffer::from_mono(vec![0.1; 100], 44100).unwrap();
        let b = AudioBuffer::from_mono(vec![0.2; 250], 44100).unwrap();
        let c = AudioBuffer::from_mono(vec![0.3; 7], 44100).unwrap();

        let merged = concatenate(&[a, b, c]).unwrap();
        assert_eq!(merged.frame_count(), 357);
    }

    #[test]
    fn test_order_preserved() {
        let a = AudioBuffer::from_mono(vec![0.1, 0.2], 44100).unwrap();
        let b = AudioBuffer::from_mono(vec![0.3], 44100).unwrap();

        let merged = concatenate(&[a, b]).unwrap();
        assert_eq!(merged.channel(0), &[0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_empty_input_yields_minimal_silence() {
        let merged = concatenate(&[]).unwrap();
        assert_eq!(merged.frame_count(), 1);
        assert_eq!(merged.channel_count(), 1);
        assert_eq!(merged.sample_rate(), crate::NARRATION_SAMPLE_RATE);
        assert_eq!(merged.channel(0)[0], 0.0);
    }

    #[test]
    fn test_single_input_is_copy() {
        let a = AudioBuffer::new(vec![vec![0.5; 10], vec![-0.5; 10]], 48000).unwrap();
        let merged = concatenate(std::slice::from_ref(&a)).unwrap();
        assert_eq!(merged, a);
    }

    #[test]
    fn test_sample_rate_mismatch_rejected() {
        let a = AudioBuffer::from_mono(vec![0.0; 10], 44100).unwrap();
        let b = AudioBuffer::from_mono(vec![0.0; 10], 22050).unwrap();
        assert!(matches!(
            concatenate(&[a, b]),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_channel_count_mismatch_rejected() {
        let a = AudioBuffer::from_mono(vec![0.0; 10], 44100).unwrap();
        let b = AudioBuffer::new(vec![vec![0.0; 10], vec![0.0; 10]], 44100).unwrap();
        assert!(matches!(
            concatenate(&[a, b]),
            Err(Error::UnsupportedFormat(_))
        ));
    }
}
