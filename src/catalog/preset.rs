//! Mood presets and their tone parameters

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::synth::Waveform;

/// Largest gain a single tone may carry
pub const MAX_TONE_GAIN: f64 = 0.1;

/// Summed tone gains must stay at or below this to avoid clipping
pub const MAX_TOTAL_GAIN: f64 = 1.0;

/// Synthesis parameters for one tone of a preset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneParameters {
    /// Oscillator frequency in Hz
    pub frequency_hz: f64,

    /// Oscillator shape (default: sine)
    #[serde(default = "default_waveform")]
    pub waveform: Waveform,

    /// Level the tone fades up to, in (0, 0.1]
    pub relative_gain: f64,

    /// Optional low-pass cutoff in Hz
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutoff_hz: Option<f64>,
}

fn default_waveform() -> Waveform {
    Waveform::Sine
}

impl ToneParameters {
    pub fn new(frequency_hz: f64, waveform: Waveform, relative_gain: f64) -> Self {
        Self {
            frequency_hz,
            waveform,
            relative_gain,
            cutoff_hz: None,
        }
    }

    pub fn with_cutoff(mut self, cutoff_hz: f64) -> Self {
        self.cutoff_hz = Some(cutoff_hz);
        self
    }
}

/// A named bundle of tones representing one mood
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodPreset {
    /// Short unique token, e.g. "focus"
    pub id: String,

    /// Human-readable label
    pub display_name: String,

    /// One-word mood label
    #[serde(default)]
    pub mood: String,

    /// Suggestion text shown to the listener
    #[serde(default)]
    pub description: String,

    /// Tones sounded together, in order
    pub tones: Vec<ToneParameters>,
}

impl MoodPreset {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        mood: impl Into<String>,
        description: impl Into<String>,
        tones: Vec<ToneParameters>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            mood: mood.into(),
            description: description.into(),
            tones,
        }
    }

    /// Sum of all tone gains
    pub fn total_gain(&self) -> f64 {
        self.tones.iter().map(|t| t.relative_gain).sum()
    }

    /// Check the preset can be played without clipping
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            bail!("Preset id must not be empty");
        }
        if self.tones.is_empty() {
            bail!("Preset '{}' has no tones", self.id);
        }

        for (i, tone) in self.tones.iter().enumerate() {
            if !(tone.frequency_hz > 0.0 && tone.frequency_hz <= 20000.0) {
                bail!(
                    "Preset '{}' tone {}: frequency must be between 0 and 20000 Hz",
                    self.id,
                    i
                );
            }
            if !(tone.relative_gain > 0.0 && tone.relative_gain <= MAX_TONE_GAIN) {
                bail!(
                    "Preset '{}' tone {}: gain must be in (0, {}]",
                    self.id,
                    i,
                    MAX_TONE_GAIN
                );
            }
            if let Some(cutoff) = tone.cutoff_hz {
                if !(20.0..=20000.0).contains(&cutoff) {
                    bail!(
                        "Preset '{}' tone {}: cutoff must be between 20 and 20000 Hz",
                        self.id,
                        i
                    );
                }
            }
        }

        if self.total_gain() > MAX_TOTAL_GAIN {
            bail!(
                "Preset '{}' gains sum to {:.3}, above {}",
                self.id,
                self.total_gain(),
                MAX_TOTAL_GAIN
            );
        }

        Ok(())
    }
}

/// Gain ladder for the built-in presets: 0.03, 0.04, 0.05, ...
fn ladder(index: usize) -> f64 {
    0.03 + index as f64 * 0.01
}

fn tones(spec: &[(f64, Waveform)]) -> Vec<ToneParameters> {
    spec.iter()
        .enumerate()
        .map(|(i, &(hz, waveform))| ToneParameters::new(hz, waveform, ladder(i)))
        .collect()
}

/// The four presets shipped with murmur
pub fn builtin_presets() -> Vec<MoodPreset> {
    use Waveform::*;

    let mut nature = tones(&[(110.0, Sine), (165.0, Triangle), (220.0, Sine)]);
    nature.push(ToneParameters::new(55.0, Sawtooth, ladder(3)).with_cutoff(400.0));

    vec![
        MoodPreset::new(
            "focus",
            "Deep Focus",
            "productive",
            "Perfect for coding and deep work",
            tones(&[(220.0, Sine), (330.0, Sine), (440.0, Triangle)]),
        ),
        MoodPreset::new(
            "creative",
            "Creative Flow",
            "inspirational",
            "Enhances creative thinking",
            tones(&[(261.63, Sine), (329.63, Triangle), (392.0, Sine)]),
        ),
        MoodPreset::new(
            "calm",
            "Mindful Peace",
            "peaceful",
            "Reduces stress and promotes wellness",
            tones(&[(174.0, Sine), (258.0, Sine), (348.0, Sine)]),
        ),
        MoodPreset::new(
            "nature",
            "Forest Therapy",
            "natural",
            "Connects you with nature",
            nature,
        ),
    ]
}
