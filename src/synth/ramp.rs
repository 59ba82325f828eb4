//! Linear gain ramp
//!
//! Fades a tone in from silence to its target level, then holds.

/// Ramp stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RampStage {
    Rising,
    Holding,
}

/// Linear fade-in from 0.0 to a target gain
#[derive(Debug, Clone)]
pub struct GainRamp {
    target: f64,
    step: f64,
    level: f64,
    stage: RampStage,
}

impl GainRamp {
    /// Create a ramp reaching `target` after `ramp_samples` samples.
    /// A zero-length ramp jumps straight to the target.
    pub fn new(target: f64, ramp_samples: usize) -> Self {
        if ramp_samples == 0 {
            return Self {
                target,
                step: 0.0,
                level: target,
                stage: RampStage::Holding,
            };
        }

        Self {
            target,
            step: target / ramp_samples as f64,
            level: 0.0,
            stage: RampStage::Rising,
        }
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn stage(&self) -> RampStage {
        self.stage
    }

    /// Current level without advancing
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Return the current level, then advance one sample
    pub fn process(&mut self) -> f64 {
        let current = self.level;

        if self.stage == RampStage::Rising {
            self.level += self.step;
            if self.level >= self.target {
                self.level = self.target;
                self.stage = RampStage::Holding;
            }
        }

        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_starts_silent() {
        let mut ramp = GainRamp::new(0.05, 100);
        assert_eq!(ramp.stage(), RampStage::Rising);
        assert_eq!(ramp.process(), 0.0);
    }

    #[test]
    fn test_ramp_is_linear() {
        let mut ramp = GainRamp::new(0.1, 10);
        let levels: Vec<f64> = (0..11).map(|_| ramp.process()).collect();

        for (i, level) in levels.iter().enumerate() {
            assert!((level - 0.01 * i as f64).abs() < 1e-9, "sample {}: {}", i, level);
        }
    }

    #[test]
    fn test_ramp_holds_at_target() {
        let mut ramp = GainRamp::new(0.04, 441);
        for _ in 0..1000 {
            ramp.process();
        }

        assert_eq!(ramp.stage(), RampStage::Holding);
        assert_eq!(ramp.level(), 0.04);
        assert_eq!(ramp.process(), 0.04);
    }

    #[test]
    fn test_zero_length_ramp() {
        let mut ramp = GainRamp::new(0.03, 0);
        assert_eq!(ramp.stage(), RampStage::Holding);
        assert_eq!(ramp.process(), 0.03);
    }

    #[test]
    fn test_ramp_never_overshoots() {
        let mut ramp = GainRamp::new(0.07, 3);
        for _ in 0..10 {
            assert!(ramp.process() <= 0.07);
        }
    }
}
