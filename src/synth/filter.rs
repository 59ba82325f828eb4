//! Biquad filter stage for tone chains

use std::f64::consts::PI;

/// Butterworth Q, flat passband
const BUTTERWORTH_Q: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Response shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterKind {
    LowPass,
    HighPass,
}

/// Second-order filter (Direct Form II transposed)
#[derive(Debug, Clone)]
pub struct ToneFilter {
    kind: FilterKind,
    cutoff: f64,
    sample_rate: f64,
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
    z1: f64,
    z2: f64,
}

impl ToneFilter {
    /// Low-pass at `cutoff` Hz
    pub fn low_pass(cutoff: f64, sample_rate: f64) -> Self {
        Self::new(FilterKind::LowPass, cutoff, sample_rate)
    }

    /// High-pass at `cutoff` Hz
    pub fn high_pass(cutoff: f64, sample_rate: f64) -> Self {
        Self::new(FilterKind::HighPass, cutoff, sample_rate)
    }

    fn new(kind: FilterKind, cutoff: f64, sample_rate: f64) -> Self {
        let mut filter = Self {
            kind,
            cutoff: 0.0,
            sample_rate,
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            z1: 0.0,
            z2: 0.0,
        };
        filter.set_cutoff(cutoff);
        filter
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Set cutoff, clamped to 20 Hz..0.45 * sample rate
    pub fn set_cutoff(&mut self, hz: f64) {
        self.cutoff = hz.clamp(20.0, self.sample_rate * 0.45);

        let omega = 2.0 * PI * self.cutoff / self.sample_rate;
        let (sin_w, cos_w) = omega.sin_cos();
        let alpha = sin_w / (2.0 * BUTTERWORTH_Q);
        let a0 = 1.0 + alpha;

        let (b0, b1, b2) = match self.kind {
            FilterKind::LowPass => ((1.0 - cos_w) / 2.0, 1.0 - cos_w, (1.0 - cos_w) / 2.0),
            FilterKind::HighPass => ((1.0 + cos_w) / 2.0, -(1.0 + cos_w), (1.0 + cos_w) / 2.0),
        };

        self.b0 = b0 / a0;
        self.b1 = b1 / a0;
        self.b2 = b2 / a0;
        self.a1 = -2.0 * cos_w / a0;
        self.a2 = (1.0 - alpha) / a0;
    }

    /// Clear filter history
    pub fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }

    pub fn process(&mut self, input: f64) -> f64 {
        let output = self.b0 * input + self.z1;
        self.z1 = self.b1 * input - self.a1 * output + self.z2;
        self.z2 = self.b2 * input - self.a2 * output;
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak_after_settling(filter: &mut ToneFilter, freq: f64) -> f64 {
        let mut peak = 0.0f64;
        for i in 0..8820 {
            let t = i as f64 / 44100.0;
            let out = filter.process((2.0 * PI * freq * t).sin());
            if i > 2000 {
                peak = peak.max(out.abs());
            }
        }
        peak
    }

    #[test]
    fn test_cutoff_clamped() {
        let mut filter = ToneFilter::low_pass(5.0, 44100.0);
        assert_eq!(filter.cutoff(), 20.0);

        filter.set_cutoff(30000.0);
        assert!(filter.cutoff() < 22050.0);
    }

    #[test]
    fn test_low_pass_attenuates_highs() {
        let mut filter = ToneFilter::low_pass(400.0, 44100.0);
        assert!(peak_after_settling(&mut filter, 6000.0) < 0.05);
    }

    #[test]
    fn test_low_pass_keeps_lows() {
        let mut filter = ToneFilter::low_pass(400.0, 44100.0);
        assert!(peak_after_settling(&mut filter, 55.0) > 0.9);
    }

    #[test]
    fn test_high_pass_attenuates_lows() {
        let mut filter = ToneFilter::high_pass(1000.0, 44100.0);
        assert_eq!(filter.kind(), FilterKind::HighPass);
        assert!(peak_after_settling(&mut filter, 50.0) < 0.05);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut filter = ToneFilter::low_pass(1000.0, 44100.0);
        for _ in 0..100 {
            filter.process(1.0);
        }
        filter.reset();
        assert!(filter.process(0.0).abs() < 1e-12);
    }
}
