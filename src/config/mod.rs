//! Configuration management for narramix

use crate::mix::DuckingParams;
use crate::synth::AmbientMood;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration for the mastering pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterConfig {
    /// Sample rate every mastered output is rendered at
    pub master_sample_rate: u32,
    /// Sidechain ducking settings
    pub ducking: DuckingParams,
    /// Ambient pad settings
    pub pad: PadConfig,
}

/// Ambient pad configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PadConfig {
    /// Mood preset for generated pads
    pub mood: AmbientMood,
    /// Seconds of pad carried past the end of the voice
    pub tail_secs: f64,
    /// Fixed noise seed; omit to draw from entropy
    pub seed: Option<u64>,
}

impl Default for MasterConfig {
    fn default() -> Self {
        Self {
            master_sample_rate: crate::MASTER_SAMPLE_RATE,
            ducking: DuckingParams::default(),
            pad: PadConfig::default(),
        }
    }
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            mood: AmbientMood::Neutral,
            tail_secs: crate::PAD_TAIL_SECS,
            seed: None,
        }
    }
}

impl MasterConfig {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let config: MasterConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let config: MasterConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Create default configuration and save to file
    pub fn create_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = MasterConfig::default();
        config.save(path)?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.master_sample_rate == 0 {
            return Err(Error::Config("master_sample_rate must be > 0".into()));
        }

        self.ducking.validate()?;

        if !self.pad.tail_secs.is_finite() || self.pad.tail_secs < 0.0 {
            return Err(Error::Config("pad.tail_secs must be >= 0".into()));
        }

        Ok(())
    }
}
