//! Configuration schema definitions

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::catalog::{Catalog, MoodPreset};

/// Main configuration for murmur
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MurmurConfig {
    /// Audio output settings
    #[serde(default)]
    pub audio: AudioConfig,

    /// Master settings (volume, fade-in)
    #[serde(default)]
    pub master: MasterConfig,

    /// Suggestion popup timing
    #[serde(default)]
    pub suggestions: SuggestionConfig,

    /// Extra presets and section routing
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl MurmurConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.audio.sample_rate < 8000 || self.audio.sample_rate > 192000 {
            bail!("Sample rate must be between 8000 and 192000");
        }
        if self.audio.buffer_size < 64 || self.audio.buffer_size > 8192 {
            bail!("Buffer size must be between 64 and 8192");
        }

        if !(0.0..=1.0).contains(&self.master.volume) {
            bail!("Master volume must be between 0.0 and 1.0");
        }
        if self.master.fade_in_ms < 10 || self.master.fade_in_ms > 5000 {
            bail!("Fade-in must be between 10 and 5000 ms");
        }

        if self.suggestions.dismiss_after_ms == 0 {
            bail!("Suggestion dismiss interval must be greater than zero");
        }

        // Builds and checks routes, fallback and presets
        let catalog = Catalog::from_config(&self.catalog)?;

        let nyquist = self.audio.sample_rate as f64 / 2.0;
        for preset in catalog.presets() {
            if let Some(tone) = preset.tones.iter().find(|t| t.frequency_hz >= nyquist) {
                bail!(
                    "Preset '{}' has a {} Hz tone, at or above half the {} Hz sample rate",
                    preset.id,
                    tone.frequency_hz,
                    self.audio.sample_rate
                );
            }
        }

        Ok(())
    }
}

/// Audio output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate in Hz for offline rendering (default: 44100)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Buffer size in samples (default: 512)
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Output device name (None = default device)
    #[serde(default)]
    pub device: Option<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            buffer_size: default_buffer_size(),
            device: None,
        }
    }
}

fn default_sample_rate() -> u32 { 44100 }
fn default_buffer_size() -> usize { 512 }

/// Master settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterConfig {
    /// Master volume 0.0-1.0 (default: 0.7)
    #[serde(default = "default_volume")]
    pub volume: f32,

    /// Tone fade-in length in milliseconds (default: 1000)
    #[serde(default = "default_fade_in_ms")]
    pub fade_in_ms: u64,
}

impl MasterConfig {
    pub fn fade_in(&self) -> Duration {
        Duration::from_millis(self.fade_in_ms)
    }
}

impl Default for MasterConfig {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            fade_in_ms: default_fade_in_ms(),
        }
    }
}

fn default_volume() -> f32 { 0.7 }
fn default_fade_in_ms() -> u64 { 1000 }

/// Suggestion popup timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionConfig {
    /// Simulated analysis time before a suggestion appears (default: 1500)
    #[serde(default = "default_analysis_delay_ms")]
    pub analysis_delay_ms: u64,

    /// How long the popup stays open (default: 5000)
    #[serde(default = "default_dismiss_after_ms")]
    pub dismiss_after_ms: u64,
}

impl SuggestionConfig {
    pub fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.analysis_delay_ms)
    }

    pub fn dismiss_after(&self) -> Duration {
        Duration::from_millis(self.dismiss_after_ms)
    }
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            analysis_delay_ms: default_analysis_delay_ms(),
            dismiss_after_ms: default_dismiss_after_ms(),
        }
    }
}

fn default_analysis_delay_ms() -> u64 { 1500 }
fn default_dismiss_after_ms() -> u64 { 5000 }

/// Catalog overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Preset used for unrouted sections (None = calm)
    #[serde(default)]
    pub fallback: Option<String>,

    /// Section name -> preset id, merged over the built-in routes
    #[serde(default)]
    pub routes: HashMap<String, String>,

    /// Presets added after the built-in ones
    #[serde(default)]
    pub presets: Vec<MoodPreset>,
}
