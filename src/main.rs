//! narramix CLI - Audiobook mastering from the command line
//!
//! Command-line interface for the narramix mastering pipeline

use clap::{Parser, Subcommand};
use narramix::{
    pipeline::{MasteringPipeline, MusicSource},
    synth::AmbientMood,
    MasterConfig, Result,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "narramix",
    about = "Audiobook mastering: merge, duck, and polish narration audio",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge audio files into one master WAV
    Merge {
        /// Input audio files, joined in the given order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output WAV path
        #[arg(short, long, default_value = "merged.wav")]
        output: PathBuf,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Master sample rate override (Hz)
        #[arg(long)]
        sample_rate: Option<u32>,
    },

    /// Master narration over a ducked music bed
    Master {
        /// Narration audio file
        #[arg(short, long)]
        voice: PathBuf,

        /// Music bed file (omit to synthesize an ambient pad)
        #[arg(short, long)]
        music: Option<PathBuf>,

        /// Ambient pad mood when no music file is given
        #[arg(long)]
        mood: Option<AmbientMood>,

        /// Output WAV path
        #[arg(short, long, default_value = "mastered.wav")]
        output: PathBuf,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Ducking threshold override (0-1)
        #[arg(long)]
        threshold: Option<f32>,

        /// Ducked music gain override (0-1)
        #[arg(long)]
        duck_ratio: Option<f32>,

        /// Attack time override (seconds)
        #[arg(long)]
        attack: Option<f32>,

        /// Release time override (seconds)
        #[arg(long)]
        release: Option<f32>,

        /// Music volume override (0-1)
        #[arg(long)]
        music_volume: Option<f32>,
    },

    /// Stitch raw narration PCM16 segment files into one WAV
    Assemble {
        /// Raw PCM16 segment files, joined in the given order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Segment sample rate (Hz)
        #[arg(long, default_value_t = narramix::NARRATION_SAMPLE_RATE)]
        sample_rate: u32,

        /// Segment channel count
        #[arg(long, default_value_t = narramix::NARRATION_CHANNELS)]
        channels: usize,

        /// Output WAV path
        #[arg(short, long, default_value = "narration.wav")]
        output: PathBuf,
    },

    /// Render a standalone ambient pad
    Pad {
        /// Pad duration in seconds
        #[arg(short, long)]
        duration: f64,

        /// Pad mood
        #[arg(long, default_value = "neutral")]
        mood: AmbientMood,

        /// Noise seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Output WAV path
        #[arg(short, long, default_value = "pad.wav")]
        output: PathBuf,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Generate default configuration file
    InitConfig {
        /// Output path for config file
        #[arg(short, long, default_value = "narramix.yaml")]
        output: PathBuf,
    },

    /// Show information about the system
    Info,
}

fn load_config(path: Option<PathBuf>) -> Result<MasterConfig> {
    match path {
        Some(path) => MasterConfig::load(path),
        None => Ok(MasterConfig::default()),
    }
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Merge {
            inputs,
            output,
            config,
            sample_rate,
        } => {
            log::info!("narramix merge");
            log::info!("==============");

            let mut cfg = load_config(config)?;
            if let Some(rate) = sample_rate {
                cfg.master_sample_rate = rate;
            }

            let pipeline = MasteringPipeline::new(cfg)?;
            let result = pipeline.merge_files(&inputs)?;
            result.save(&output)?;

            log::info!("Duration: {}", result.duration_formatted());
            log::info!("Processing time: {:.2}s", result.processing_time);

            println!(
                "✓ Merged {} file(s) into {}",
                inputs.len(),
                output.display()
            );
        }

        Commands::Master {
            voice,
            music,
            mood,
            output,
            config,
            threshold,
            duck_ratio,
            attack,
            release,
            music_volume,
        } => {
            log::info!("narramix master");
            log::info!("===============");

            let mut cfg = load_config(config)?;
            if let Some(v) = threshold {
                cfg.ducking.threshold = v;
            }
            if let Some(v) = duck_ratio {
                cfg.ducking.duck_ratio = v;
            }
            if let Some(v) = attack {
                cfg.ducking.attack_secs = v;
            }
            if let Some(v) = release {
                cfg.ducking.release_secs = v;
            }
            if let Some(v) = music_volume {
                cfg.ducking.music_volume = v;
            }

            let source = match music {
                Some(path) => MusicSource::File(path),
                None => MusicSource::Ambient(mood.unwrap_or(cfg.pad.mood)),
            };

            log::info!("Voice: {}", voice.display());
            log::info!("Output: {}", output.display());

            let pipeline = MasteringPipeline::new(cfg)?;
            let result = pipeline.master_with_music(&voice, &source)?;
            result.save(&output)?;

            log::info!("Duration: {}", result.duration_formatted());
            log::info!("Processing time: {:.2}s", result.processing_time);

            println!("✓ Mastered to {}", output.display());
        }

        Commands::Assemble {
            inputs,
            sample_rate,
            channels,
            output,
        } => {
            log::info!("narramix assemble");
            log::info!("=================");

            let mut segments = Vec::with_capacity(inputs.len());
            for path in &inputs {
                segments.push(std::fs::read(path)?);
            }

            let pipeline = MasteringPipeline::new(MasterConfig::default())?;
            let result = pipeline.assemble_narration(&segments, sample_rate, channels)?;
            result.save(&output)?;

            log::info!("Duration: {}", result.duration_formatted());

            println!(
                "✓ Assembled {} segment(s) into {}",
                inputs.len(),
                output.display()
            );
        }

        Commands::Pad {
            duration,
            mood,
            seed,
            output,
            config,
        } => {
            log::info!("narramix pad");
            log::info!("============");

            let mut cfg = load_config(config)?;
            if let Some(seed) = seed {
                cfg.pad.seed = Some(seed);
            }

            let pipeline = MasteringPipeline::new(cfg)?;
            let result = pipeline.render_pad(duration, mood)?;
            result.save(&output)?;

            println!(
                "✓ Rendered {:.1}s {:?} pad to {}",
                duration,
                mood,
                output.display()
            );
        }

        Commands::InitConfig { output } => {
            log::info!("Creating default configuration...");

            let config = MasterConfig::default();
            config.save(&output)?;

            println!("✓ Configuration saved to: {}", output.display());
        }

        Commands::Info => {
            println!("narramix - Audiobook Mastering Engine");
            println!("=====================================");
            println!("Version: {}", narramix::VERSION);
            println!("Platform: {}", std::env::consts::OS);
            println!("Architecture: {}", std::env::consts::ARCH);
            println!();
            println!("Features:");
            println!(
                "  - Narration PCM16 assembly ({} Hz mono)",
                narramix::NARRATION_SAMPLE_RATE
            );
            println!("  - Offline resampling to the master rate");
            println!("  - Sidechain ducking for music beds");
            println!("  - Ambient pad synthesis (tense, hopeful, neutral)");
            println!("  - Float32 WAV export");
            println!();
            println!("Master sample rate: {} Hz", narramix::MASTER_SAMPLE_RATE);
            println!("Pad tail: {}s", narramix::PAD_TAIL_SECS);
        }
    }

    Ok(())
}
