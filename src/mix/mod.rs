//! Voice and music mixing

mod ducking;

pub use ducking::{mix_with_ducking, DuckingParams};
