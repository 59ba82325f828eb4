//! Tone voice: oscillator -> optional filter -> gain ramp

use super::{GainRamp, Oscillator, ToneFilter};

/// One sounding tone resource
#[derive(Debug, Clone)]
pub struct ToneVoice {
    oscillator: Oscillator,
    filter: Option<ToneFilter>,
    gain: GainRamp,
}

impl ToneVoice {
    pub fn new(oscillator: Oscillator, gain: GainRamp) -> Self {
        Self {
            oscillator,
            filter: None,
            gain,
        }
    }

    /// Insert a filter stage between oscillator and gain
    pub fn with_filter(mut self, filter: ToneFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn oscillator(&self) -> &Oscillator {
        &self.oscillator
    }

    pub fn filter(&self) -> Option<&ToneFilter> {
        self.filter.as_ref()
    }

    /// Gain level the voice is ramping towards
    pub fn target_gain(&self) -> f64 {
        self.gain.target()
    }

    /// Current gain level
    pub fn gain(&self) -> f64 {
        self.gain.level()
    }

    pub fn process(&mut self) -> f64 {
        let mut sample = self.oscillator.generate();
        if let Some(filter) = self.filter.as_mut() {
            sample = filter.process(sample);
        }
        sample * self.gain.process()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::Waveform;

    #[test]
    fn test_voice_fades_in() {
        let osc = Oscillator::new(Waveform::Square, 100.0, 44100.0);
        let mut voice = ToneVoice::new(osc, GainRamp::new(0.05, 4410));

        let early = (0..10).map(|_| voice.process().abs()).fold(0.0f64, f64::max);
        for _ in 0..5000 {
            voice.process();
        }
        let late = (0..10).map(|_| voice.process().abs()).fold(0.0f64, f64::max);

        assert!(early < 0.001, "early peak {}", early);
        assert!((late - 0.05).abs() < 1e-9, "late peak {}", late);
    }

    #[test]
    fn test_voice_output_bounded_by_gain() {
        let osc = Oscillator::new(Waveform::Sawtooth, 55.0, 44100.0);
        let mut voice = ToneVoice::new(osc, GainRamp::new(0.06, 0))
            .with_filter(ToneFilter::low_pass(400.0, 44100.0));

        assert!(voice.filter().is_some());
        for _ in 0..20000 {
            // Biquad ringing can overshoot slightly on a sawtooth edge
            assert!(voice.process().abs() <= 0.06 * 1.5);
        }
    }

    #[test]
    fn test_voice_accessors() {
        let osc = Oscillator::new(Waveform::Sine, 174.0, 48000.0);
        let voice = ToneVoice::new(osc, GainRamp::new(0.03, 48000));

        assert_eq!(voice.oscillator().frequency(), 174.0);
        assert_eq!(voice.target_gain(), 0.03);
        assert_eq!(voice.gain(), 0.0);
    }
}
