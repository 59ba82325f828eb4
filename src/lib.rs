//! Murmur - mood-driven ambient tone synthesis
//!
//! A small catalog of mood presets, a section-to-preset lookup, and an
//! engine that fades preset tones in on an audio device and tears them
//! down cleanly when stopped or switched.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod synth;

pub use catalog::{Catalog, MoodPreset, ToneParameters};
pub use config::MurmurConfig;
pub use engine::{AmbientController, AmbientEngine};
pub use error::AmbientError;
