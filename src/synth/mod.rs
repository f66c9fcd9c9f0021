//! Procedural music synthesis

mod pad;

pub use pad::{AmbientMood, PadSynth};
