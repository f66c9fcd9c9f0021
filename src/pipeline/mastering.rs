//! Core mastering scenarios

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use super::{CancelToken, PipelineStage, ProgressCallback};
use crate::audio::{
    concatenate, decode_pcm16, encode_wav_float32, resample, AudioBuffer, AudioCodecProvider,
    WavCodec,
};
use crate::config::MasterConfig;
use crate::mix::mix_with_ducking;
use crate::synth::{AmbientMood, PadSynth};
use crate::{Error, Result};

/// Where the music bed for a mastering run comes from
#[derive(Debug, Clone)]
pub enum MusicSource {
    /// Decode an audio file through the codec provider
    File(PathBuf),
    /// Synthesize an ambient pad sized to the voice
    Ambient(AmbientMood),
}

/// Result of a mastering run
#[derive(Debug)]
pub struct MasterResult {
    /// Encoded float32 WAV bytes
    pub wav_bytes: Vec<u8>,
    /// Output sample rate
    pub sample_rate: u32,
    /// Output channel count
    pub channel_count: usize,
    /// Output duration in seconds
    pub duration: f32,
    /// Processing time in seconds
    pub processing_time: f32,
}

impl MasterResult {
    /// Write the WAV bytes to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, &self.wav_bytes)?;
        Ok(())
    }

    /// Get duration formatted as MM:SS
    pub fn duration_formatted(&self) -> String {
        let minutes = (self.duration / 60.0) as u32;
        let seconds = (self.duration % 60.0) as u32;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Main mastering pipeline
///
/// Owns the injected codec capability and the mastering policy; each public
/// operation is a function of its inputs plus this state, so one instance
/// can run any number of operations. Progress callbacks fire per stage and
/// the cancel token is honored at stage boundaries.
pub struct MasteringPipeline {
    /// Container decode capability
    codec: Box<dyn AudioCodecProvider + Send + Sync>,
    /// Mastering policy
    config: MasterConfig,
    /// Optional per-stage progress callback
    progress: Option<ProgressCallback>,
    /// Optional cancellation token
    cancel: Option<CancelToken>,
}

impl MasteringPipeline {
    /// Create a pipeline using the bundled WAV codec
    pub fn new(config: MasterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            codec: Box::new(WavCodec),
            config,
            progress: None,
            cancel: None,
        })
    }

    /// Replace the container decode capability
    pub fn with_codec(mut self, codec: Box<dyn AudioCodecProvider + Send + Sync>) -> Self {
        self.codec = codec;
        self
    }

    /// Attach a progress callback
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Attach a cancellation token
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Get configuration
    pub fn config(&self) -> &MasterConfig {
        &self.config
    }

    /// Decode, resample, and join audio files into one master WAV
    ///
    /// Inputs are decoded and brought to the master rate in parallel; the
    /// output keeps the caller's order. The first failing input aborts the
    /// whole run and the error names it.
    pub fn merge_files(&self, inputs: &[PathBuf]) -> Result<MasterResult> {
        use rayon::prelude::*;

        let start_time = Instant::now();
        log::info!("Merging {} file(s)", inputs.len());
        self.check_cancelled()?;

        // 1. Decode and resample every input in parallel, order preserved
        let total = inputs.len().max(1);
        let completed = AtomicUsize::new(0);
        let buffers: Vec<AudioBuffer> = inputs
            .par_iter()
            .map(|path| {
                let buffer = self.load_file(path)?;
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                self.emit_progress(PipelineStage::Decode, done as f32 / total as f32);
                Ok(buffer)
            })
            .collect::<Result<Vec<_>>>()?;
        self.check_cancelled()?;

        // 2. Join in caller order
        let merged = concatenate(&buffers)?;
        self.emit_progress(PipelineStage::Concatenate, 1.0);
        self.check_cancelled()?;

        // 3. Encode
        let result = self.finish(merged, start_time)?;
        log::info!(
            "Merge complete: {:.2}s audio in {:.2}s",
            result.duration,
            result.processing_time
        );
        Ok(result)
    }

    /// Master a narration voice over a music bed with sidechain ducking
    ///
    /// The voice is decoded and brought to the master rate; the bed either
    /// comes from a file (same treatment) or is synthesized at the master
    /// rate, running `pad.tail_secs` past the end of the voice.
    pub fn master_with_music<P: AsRef<Path>>(
        &self,
        voice_path: P,
        music: &MusicSource,
    ) -> Result<MasterResult> {
        let voice_path = voice_path.as_ref();
        let start_time = Instant::now();
        let master_rate = self.config.master_sample_rate;

        log::info!("Mastering {}", voice_path.display());
        self.check_cancelled()?;

        // 1. Decode the voice track
        let voice_native = self.decode_file(voice_path)?;
        self.emit_progress(PipelineStage::Decode, 1.0);
        self.check_cancelled()?;

        // 2. Bring it to the master rate
        let voice = resample(&voice_native, master_rate)
            .map_err(|e| Error::for_input(voice_path.display().to_string(), e))?;
        self.emit_progress(PipelineStage::Resample, 1.0);
        self.check_cancelled()?;

        // 3. Produce the music bed at the same rate
        let bed = match music {
            MusicSource::File(path) => {
                log::debug!("Music bed from {}", path.display());
                self.load_file(path)?
            }
            MusicSource::Ambient(mood) => {
                let duration = voice.duration() as f64 + self.config.pad.tail_secs;
                let bed = self.pad_synth().generate(duration, *mood)?;
                self.emit_progress(PipelineStage::Synthesize, 1.0);
                bed
            }
        };
        self.check_cancelled()?;

        // 4. Duck the bed under the voice
        let mixed = mix_with_ducking(&voice, &bed, &self.config.ducking)?;
        self.emit_progress(PipelineStage::Mix, 1.0);
        log::debug!(
            "Mixed {} frames, peak {:.3}",
            mixed.frame_count(),
            mixed.peak()
        );
        self.check_cancelled()?;

        // 5. Encode
        let result = self.finish(mixed, start_time)?;
        log::info!(
            "Master complete: {:.2}s stereo in {:.2}s",
            result.duration,
            result.processing_time
        );
        Ok(result)
    }

    /// Stitch raw narration PCM16 segments into a single WAV
    ///
    /// Segments are bare little-endian PCM16 byte streams sharing one rate
    /// and channel layout, the narration service contract. No resampling:
    /// the output stays at the segment rate.
    pub fn assemble_narration(
        &self,
        segments: &[Vec<u8>],
        sample_rate: u32,
        channel_count: usize,
    ) -> Result<MasterResult> {
        let start_time = Instant::now();
        log::info!(
            "Assembling {} narration segment(s) at {} Hz",
            segments.len(),
            sample_rate
        );
        self.check_cancelled()?;

        // 1. Decode each segment
        let total = segments.len().max(1);
        let mut buffers = Vec::with_capacity(segments.len());
        for (i, bytes) in segments.iter().enumerate() {
            let buffer = decode_pcm16(bytes, sample_rate, channel_count)
                .map_err(|e| Error::for_input(format!("segment {}", i), e))?;
            buffers.push(buffer);
            self.emit_progress(PipelineStage::Decode, (i + 1) as f32 / total as f32);
        }
        self.check_cancelled()?;

        // 2. Join in order
        let merged = concatenate(&buffers)?;
        self.emit_progress(PipelineStage::Concatenate, 1.0);
        self.check_cancelled()?;

        // 3. Encode
        let result = self.finish(merged, start_time)?;
        log::info!(
            "Assembly complete: {:.2}s audio in {:.2}s",
            result.duration,
            result.processing_time
        );
        Ok(result)
    }

    /// Render a standalone ambient pad to WAV
    pub fn render_pad(&self, duration_secs: f64, mood: AmbientMood) -> Result<MasterResult> {
        let start_time = Instant::now();
        log::info!("Rendering {:.2}s {:?} pad", duration_secs, mood);
        self.check_cancelled()?;

        let pad = self.pad_synth().generate(duration_secs, mood)?;
        self.emit_progress(PipelineStage::Synthesize, 1.0);
        self.check_cancelled()?;

        self.finish(pad, start_time)
    }

    /// Read and decode one file, brought to the master rate
    fn load_file(&self, path: &Path) -> Result<AudioBuffer> {
        let decoded = self.decode_file(path)?;
        resample(&decoded, self.config.master_sample_rate)
            .map_err(|e| Error::for_input(path.display().to_string(), e))
    }

    /// Read and decode one file at its native rate
    fn decode_file(&self, path: &Path) -> Result<AudioBuffer> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.display().to_string()));
        }
        let bytes = std::fs::read(path)
            .map_err(|e| Error::for_input(path.display().to_string(), Error::Io(e)))?;
        log::debug!("Decoding {} ({} bytes)", path.display(), bytes.len());
        self.codec
            .decode_container(&bytes)
            .map_err(|e| Error::for_input(path.display().to_string(), e))
    }

    /// Pad synthesizer configured for the master rate
    fn pad_synth(&self) -> PadSynth {
        let mut synth = PadSynth::new(self.config.master_sample_rate);
        if let Some(seed) = self.config.pad.seed {
            synth = synth.with_seed(seed);
        }
        synth
    }

    /// Encode a finished buffer and wrap up the run
    fn finish(&self, buffer: AudioBuffer, start_time: Instant) -> Result<MasterResult> {
        let wav_bytes = encode_wav_float32(&buffer)?;
        self.emit_progress(PipelineStage::Encode, 1.0);
        Ok(MasterResult {
            sample_rate: buffer.sample_rate(),
            channel_count: buffer.channel_count(),
            duration: buffer.duration(),
            processing_time: start_time.elapsed().as_secs_f32(),
            wav_bytes,
        })
    }

    fn emit_progress(&self, stage: PipelineStage, fraction: f32) {
        if let Some(ref callback) = self.progress {
            callback(stage, fraction);
        }
        log::debug!("{}: {:.0}%", stage.name(), fraction * 100.0);
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(Error::Cancelled),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn sine_buffer(freq: f32, rate: u32, secs: f32) -> AudioBuffer {
        let frames = (rate as f32 * secs) as usize;
        let samples = (0..frames)
            .map(|i| {
                let t = i as f32 / rate as f32;
                (2.0 * std::f32::consts::PI * freq * t).sin() * 0.5
            })
            .collect();
        AudioBuffer::from_mono(samples, rate).unwrap()
    }

    fn write_test_wav(name: &str, buffer: &AudioBuffer) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, encode_wav_float32(buffer).unwrap()).unwrap();
        path
    }

    fn test_config(rate: u32) -> MasterConfig {
        let mut config = MasterConfig {
            master_sample_rate: rate,
            ..MasterConfig::default()
        };
        config.pad.seed = Some(99);
        config
    }

    #[test]
    fn test_merge_is_order_preserving_and_additive() {
        let a = write_test_wav("narramix_merge_a.wav", &sine_buffer(440.0, 8000, 0.5));
        let b = write_test_wav("narramix_merge_b.wav", &sine_buffer(880.0, 8000, 0.25));

        let pipeline = MasteringPipeline::new(test_config(8000)).unwrap();
        let result = pipeline.merge_files(&[a.clone(), b.clone()]).unwrap();
        let _ = std::fs::remove_file(a);
        let _ = std::fs::remove_file(b);

        assert_eq!(result.sample_rate, 8000);
        assert_eq!(result.channel_count, 1);
        assert_eq!(result.wav_bytes.len(), 44 + 6000 * 4);
        assert!((result.duration - 0.75).abs() < 1e-3);
    }

    #[test]
    fn test_merge_resamples_to_master_rate() {
        let a = write_test_wav("narramix_rate_a.wav", &sine_buffer(440.0, 4000, 0.5));
        let b = write_test_wav("narramix_rate_b.wav", &sine_buffer(440.0, 8000, 0.5));

        let pipeline = MasteringPipeline::new(test_config(8000)).unwrap();
        let result = pipeline.merge_files(&[a.clone(), b.clone()]).unwrap();
        let _ = std::fs::remove_file(a);
        let _ = std::fs::remove_file(b);

        assert_eq!(result.sample_rate, 8000);
        assert_eq!(result.wav_bytes.len(), 44 + 8000 * 4);
    }

    #[test]
    fn test_merge_names_failing_input() {
        let bad = std::env::temp_dir().join("narramix_bad.wav");
        std::fs::write(&bad, b"not a wav").unwrap();

        let pipeline = MasteringPipeline::new(test_config(8000)).unwrap();
        let err = pipeline.merge_files(&[bad.clone()]).unwrap_err();
        let _ = std::fs::remove_file(&bad);

        match err {
            Error::Input { name, .. } => assert!(name.contains("narramix_bad")),
            other => panic!("expected Input error, got: {}", other),
        }
    }

    #[test]
    fn test_merge_missing_file() {
        let pipeline = MasteringPipeline::new(test_config(8000)).unwrap();
        let missing = std::env::temp_dir().join("narramix_not_there_12345.wav");
        let err = pipeline.merge_files(&[missing]).unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }

    #[test]
    fn test_cancelled_token_stops_run() {
        let token = CancelToken::new();
        token.cancel();

        let pipeline = MasteringPipeline::new(test_config(8000))
            .unwrap()
            .with_cancel_token(token);
        let result = pipeline.merge_files(&[]);
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[test]
    fn test_progress_reports_stages() {
        let stages: Arc<Mutex<Vec<(PipelineStage, f32)>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&stages);

        let pipeline = MasteringPipeline::new(test_config(8000))
            .unwrap()
            .with_progress(Box::new(move |stage, fraction| {
                sink.lock().unwrap().push((stage, fraction));
            }));

        let a = write_test_wav("narramix_progress.wav", &sine_buffer(440.0, 8000, 0.1));
        pipeline.merge_files(&[a.clone()]).unwrap();
        let _ = std::fs::remove_file(a);

        let seen = stages.lock().unwrap();
        assert!(seen
            .iter()
            .any(|(s, f)| *s == PipelineStage::Decode && *f == 1.0));
        assert!(seen
            .iter()
            .any(|(s, f)| *s == PipelineStage::Concatenate && *f == 1.0));
        assert!(seen
            .iter()
            .any(|(s, f)| *s == PipelineStage::Encode && *f == 1.0));
    }

    #[test]
    fn test_assemble_narration_joins_segments() {
        let pipeline = MasteringPipeline::new(test_config(44100)).unwrap();
        let tone: Vec<u8> = std::iter::repeat(1000i16.to_le_bytes())
            .take(2400)
            .flatten()
            .collect();

        let result = pipeline
            .assemble_narration(&[tone.clone(), tone], 24000, 1)
            .unwrap();

        // Narration stays at its own rate, no resample on this path
        assert_eq!(result.sample_rate, 24000);
        assert_eq!(result.channel_count, 1);
        assert_eq!(result.wav_bytes.len(), 44 + 4800 * 4);
    }

    #[test]
    fn test_assemble_names_bad_segment() {
        let pipeline = MasteringPipeline::new(test_config(44100)).unwrap();
        let err = pipeline
            .assemble_narration(&[vec![0, 0], vec![1]], 24000, 1)
            .unwrap_err();

        match err {
            Error::Input { name, .. } => assert_eq!(name, "segment 1"),
            other => panic!("expected Input error, got: {}", other),
        }
    }

    #[test]
    fn test_master_with_ambient_bed() {
        let path = write_test_wav("narramix_voice.wav", &sine_buffer(220.0, 8000, 0.5));

        let mut config = test_config(8000);
        config.pad.tail_secs = 1.0;
        let pipeline = MasteringPipeline::new(config).unwrap();

        let result = pipeline
            .master_with_music(&path, &MusicSource::Ambient(AmbientMood::Neutral))
            .unwrap();
        let _ = std::fs::remove_file(path);

        assert_eq!(result.channel_count, 2);
        assert_eq!(result.sample_rate, 8000);
        // Bed runs tail_secs past the end of the voice
        assert!((result.duration - 1.5).abs() < 0.01);
    }

    #[test]
    fn test_master_with_music_file() {
        let vpath = write_test_wav("narramix_mv.wav", &sine_buffer(220.0, 8000, 0.5));
        let mpath = write_test_wav("narramix_mm.wav", &sine_buffer(110.0, 4000, 1.0));

        let pipeline = MasteringPipeline::new(test_config(8000)).unwrap();
        let result = pipeline
            .master_with_music(&vpath, &MusicSource::File(mpath.clone()))
            .unwrap();
        let _ = std::fs::remove_file(vpath);
        let _ = std::fs::remove_file(mpath);

        assert_eq!(result.channel_count, 2);
        assert_eq!(result.sample_rate, 8000);
        assert!((result.duration - 1.0).abs() < 0.01);
    }

    struct StubCodec;

    impl AudioCodecProvider for StubCodec {
        fn decode_container(&self, _bytes: &[u8]) -> Result<AudioBuffer> {
            AudioBuffer::from_mono(vec![0.25; 800], 8000)
        }
    }

    #[test]
    fn test_codec_injection() {
        let path = std::env::temp_dir().join("narramix_opaque.bin");
        std::fs::write(&path, b"opaque container bytes").unwrap();

        let pipeline = MasteringPipeline::new(test_config(8000))
            .unwrap()
            .with_codec(Box::new(StubCodec));
        let result = pipeline.merge_files(&[path.clone()]).unwrap();
        let _ = std::fs::remove_file(&path);

        assert!((result.duration - 0.1).abs() < 1e-3);
    }

    #[test]
    fn test_result_save() {
        let pipeline = MasteringPipeline::new(test_config(8000)).unwrap();
        let result = pipeline.render_pad(0.5, AmbientMood::Tense).unwrap();

        let path = std::env::temp_dir().join("narramix_saved.wav");
        result.save(&path).unwrap();
        let written = std::fs::read(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(written, result.wav_bytes);
    }
}
