//! Raw PCM16 decoding and WAV float32 encoding
//!
//! The narration service delivers bare little-endian signed 16-bit PCM with
//! no container; `decode_pcm16` turns those streams into buffers. Mastered
//! output is always 32-bit float WAV with the fixed 44-byte header layout
//! written by `encode_wav_float32`.

use super::AudioBuffer;
use crate::{Error, Result};

/// WAV format tag for IEEE float samples
const WAVE_FORMAT_IEEE_FLOAT: u16 = 3;

/// Decode a raw little-endian PCM16 stream into an audio buffer
///
/// Samples are interleaved across `channel_count` channels and normalized to
/// [-1, 1) by dividing by 32768. A trailing partial frame (complete samples
/// that do not cover every channel) is dropped.
///
/// # Errors
/// - `UnsupportedFormat` if `sample_rate` or `channel_count` is zero
/// - `MalformedAudio` if the byte count is odd (cannot form i16 samples)
pub fn decode_pcm16(bytes: &[u8], sample_rate: u32, channel_count: usize) -> Result<AudioBuffer> {
    if sample_rate == 0 {
        return Err(Error::UnsupportedFormat("sample rate must be > 0".into()));
    }
    if channel_count == 0 {
        return Err(Error::UnsupportedFormat("channel count must be > 0".into()));
    }
    if bytes.len() % 2 != 0 {
        return Err(Error::MalformedAudio(format!(
            "PCM16 stream has odd byte length {}",
            bytes.len()
        )));
    }

    let sample_count = bytes.len() / 2;
    let frame_count = sample_count / channel_count;

    let mut channels = vec![Vec::with_capacity(frame_count); channel_count];
    for frame in 0..frame_count {
        for ch in 0..channel_count {
            let offset = (frame * channel_count + ch) * 2;
            let raw = i16::from_le_bytes([bytes[offset], bytes[offset + 1]]);
            channels[ch].push(raw as f32 / 32768.0);
        }
    }

    AudioBuffer::new(channels, sample_rate)
}

/// Encode a buffer as 32-bit float WAV bytes
///
/// Layout: `RIFF` / chunk size / `WAVE` / `fmt ` chunk (16 bytes, format
/// tag 3, 32 bits per sample) / `data` chunk with interleaved little-endian
/// f32 frames. Every channel is written and the header carries the buffer's
/// real channel count, so a stereo mix keeps its right channel.
///
/// Samples are written as-is; values outside [-1, 1] survive the trip and
/// are the caller's concern.
pub fn encode_wav_float32(buffer: &AudioBuffer) -> Result<Vec<u8>> {
    let channel_count = buffer.channel_count();
    let frame_count = buffer.frame_count();
    let sample_rate = buffer.sample_rate();

    if channel_count > u16::MAX as usize {
        return Err(Error::UnsupportedFormat(format!(
            "too many channels for WAV: {}",
            channel_count
        )));
    }
    let block_align = channel_count as u32 * 4;
    let data_size = frame_count as u64 * block_align as u64;
    if data_size > (u32::MAX - 36) as u64 {
        return Err(Error::UnsupportedFormat(format!(
            "audio too long for a WAV container: {} data bytes",
            data_size
        )));
    }
    let data_size = data_size as u32;
    let byte_rate = sample_rate * block_align;

    let mut bytes = Vec::with_capacity(44 + data_size as usize);

    // RIFF header
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_size).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");

    // fmt sub-chunk
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&WAVE_FORMAT_IEEE_FLOAT.to_le_bytes());
    bytes.extend_from_slice(&(channel_count as u16).to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&byte_rate.to_le_bytes());
    bytes.extend_from_slice(&(block_align as u16).to_le_bytes());
    bytes.extend_from_slice(&32u16.to_le_bytes());

    // data sub-chunk
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_size.to_le_bytes());
    for frame in 0..frame_count {
        for ch in 0..channel_count {
            bytes.extend_from_slice(&buffer.channel(ch)[frame].to_le_bytes());
        }
    }

    Ok(bytes)
}
