//! Mastering pipeline orchestration
//!
//! Coordinates decoding, resampling, pad synthesis, mixing, and WAV export.

mod mastering;

pub use mastering::{MasterResult, MasteringPipeline, MusicSource};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Pipeline stage enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Decode,
    Resample,
    Synthesize,
    Mix,
    Concatenate,
    Encode,
}

impl PipelineStage {
    /// Get stage name
    pub fn name(&self) -> &'static str {
        match self {
            PipelineStage::Decode => "Decode",
            PipelineStage::Resample => "Resample",
            PipelineStage::Synthesize => "Synthesize",
            PipelineStage::Mix => "Mix",
            PipelineStage::Concatenate => "Concatenate",
            PipelineStage::Encode => "Encode",
        }
    }

    /// Get all stages in order
    pub fn all() -> Vec<PipelineStage> {
        vec![
            PipelineStage::Decode,
            PipelineStage::Resample,
            PipelineStage::Synthesize,
            PipelineStage::Mix,
            PipelineStage::Concatenate,
            PipelineStage::Encode,
        ]
    }
}

/// Pipeline progress callback: the stage plus a 0-1 completion fraction
pub type ProgressCallback = Box<dyn Fn(PipelineStage, f32) + Send + Sync>;

/// Cooperative cancellation handle
///
/// Clones share one flag. The pipeline checks it at stage boundaries, never
/// mid-buffer, and surfaces `Error::Cancelled` when it fires.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a fresh, un-cancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
