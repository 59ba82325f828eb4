//! Synthesis primitives
//!
//! Oscillators, gain ramps, filters and the tone voice that chains them.

mod filter;
mod oscillator;
mod ramp;
mod voice;

pub use filter::{FilterKind, ToneFilter};
pub use oscillator::{Oscillator, Waveform};
pub use ramp::{GainRamp, RampStage};
pub use voice::ToneVoice;
