//! Phase-accumulating tone oscillator

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Waveform shapes a tone can use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
    Square,
}

impl Waveform {
    /// Lowercase name, as used in config files
    pub fn as_str(&self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Triangle => "triangle",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Square => "square",
        }
    }
}

/// Oscillator producing one waveform at a fixed frequency
#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: Waveform,
    /// Normalized phase in 0..1
    phase: f64,
    increment: f64,
    frequency: f64,
}

impl Oscillator {
    /// Frequency is clamped to 0..0.45 * sample rate
    pub fn new(waveform: Waveform, frequency: f64, sample_rate: f64) -> Self {
        let frequency = frequency.clamp(0.0, sample_rate * 0.45);
        Self {
            waveform,
            phase: 0.0,
            increment: frequency / sample_rate,
            frequency,
        }
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Generate the next sample in -1.0..=1.0
    pub fn generate(&mut self) -> f64 {
        let p = self.phase;
        let sample = match self.waveform {
            Waveform::Sine => (p * 2.0 * PI).sin(),
            Waveform::Triangle => {
                if p < 0.25 {
                    4.0 * p
                } else if p < 0.75 {
                    2.0 - 4.0 * p
                } else {
                    4.0 * p - 4.0
                }
            }
            Waveform::Sawtooth => 2.0 * p - 1.0,
            Waveform::Square => {
                if p < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        };

        self.phase = (self.phase + self.increment).rem_euclid(1.0);

        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sine_starts_at_zero() {
        let mut osc = Oscillator::new(Waveform::Sine, 440.0, 44100.0);
        assert!(osc.generate().abs() < 1e-9);
    }

    #[test]
    fn test_square_cycle() {
        let mut osc = Oscillator::new(Waveform::Square, 1.0, 4.0);

        assert_eq!(osc.generate(), 1.0);
        assert_eq!(osc.generate(), 1.0);
        assert_eq!(osc.generate(), -1.0);
        assert_eq!(osc.generate(), -1.0);
    }

    #[test]
    fn test_sawtooth_ramp() {
        let mut osc = Oscillator::new(Waveform::Sawtooth, 1.0, 4.0);

        assert_eq!(osc.generate(), -1.0);
        assert_eq!(osc.generate(), -0.5);
        assert_eq!(osc.generate(), 0.0);
        assert_eq!(osc.generate(), 0.5);
    }

    #[test]
    fn test_triangle_peaks() {
        let mut osc = Oscillator::new(Waveform::Triangle, 1.0, 4.0);

        assert_eq!(osc.generate(), 0.0);
        assert_eq!(osc.generate(), 1.0);
        assert_eq!(osc.generate(), 0.0);
        assert_eq!(osc.generate(), -1.0);
    }

    #[test]
    fn test_all_waveforms_bounded() {
        for waveform in [Waveform::Sine, Waveform::Triangle, Waveform::Sawtooth, Waveform::Square] {
            let mut osc = Oscillator::new(waveform, 261.63, 44100.0);
            for _ in 0..2000 {
                let s = osc.generate();
                assert!((-1.0..=1.0).contains(&s), "{:?} out of range: {}", waveform, s);
            }
        }
    }

    #[test]
    fn test_tone_above_sample_rate_stays_bounded() {
        for waveform in [Waveform::Sine, Waveform::Triangle, Waveform::Sawtooth, Waveform::Square] {
            for frequency in [4000.0, 8000.0, 12000.0, 20000.0] {
                let mut osc = Oscillator::new(waveform, frequency, 8000.0);
                for _ in 0..8000 {
                    let s = osc.generate();
                    assert!(
                        (-1.0..=1.0).contains(&s),
                        "{:?} at {} Hz out of range: {}",
                        waveform,
                        frequency,
                        s
                    );
                }
            }
        }
    }

    #[test]
    fn test_frequency_clamped_below_nyquist() {
        let osc = Oscillator::new(Waveform::Sawtooth, 12000.0, 8000.0);
        assert!((osc.frequency() - 3600.0).abs() < 1e-9);

        let osc = Oscillator::new(Waveform::Sine, 440.0, 44100.0);
        assert_eq!(osc.frequency(), 440.0);
    }

    #[test]
    fn test_waveform_serde_names() {
        let w: Waveform = serde_yaml::from_str("sawtooth").unwrap();
        assert_eq!(w, Waveform::Sawtooth);
        assert_eq!(Waveform::Triangle.as_str(), "triangle");
    }
}
