//! Shared tone graph
//!
//! The mix bus every device renders from. Tone handles hold a reference to
//! the graph and remove their voice on release.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::debug;

use super::device::ToneHandle;
use crate::catalog::ToneParameters;
use crate::error::{AmbientError, Result};
use crate::synth::{GainRamp, Oscillator, ToneFilter, ToneVoice};

/// Graph shared between the control side and the render side
pub type SharedGraph = Arc<Mutex<ToneGraph>>;

/// Live voices summed into one mono signal
pub struct ToneGraph {
    voices: Vec<(u64, ToneVoice)>,
    next_id: u64,
    sample_rate: f64,
    master_volume: f32,
}

impl ToneGraph {
    pub fn new(sample_rate: f64, master_volume: f32) -> Self {
        Self {
            voices: Vec::new(),
            next_id: 0,
            sample_rate,
            master_volume,
        }
    }

    /// Wrap a new graph for sharing
    pub fn shared(sample_rate: f64, master_volume: f32) -> SharedGraph {
        Arc::new(Mutex::new(Self::new(sample_rate, master_volume)))
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 1.0);
    }

    /// Add a voice, returning its id
    pub fn add(&mut self, voice: ToneVoice) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.voices.push((id, voice));
        id
    }

    /// Remove a voice. Returns false if it was already gone.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.voices.len();
        self.voices.retain(|(voice_id, _)| *voice_id != id);
        self.voices.len() != before
    }

    pub fn contains(&self, id: u64) -> bool {
        self.voices.iter().any(|(voice_id, _)| *voice_id == id)
    }

    /// Number of live voices
    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Generate the next mixed sample
    pub fn process(&mut self) -> f64 {
        let mut output = 0.0;
        for (_, voice) in &mut self.voices {
            output += voice.process();
        }
        output * self.master_volume as f64
    }

    /// Fill a mono buffer
    pub fn fill_buffer(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process() as f32;
        }
    }
}

/// Build the oscillator -> filter -> gain chain for one tone
pub fn build_voice(tone: &ToneParameters, ramp: Duration, sample_rate: f64) -> ToneVoice {
    let ramp_samples = (ramp.as_secs_f64() * sample_rate).round() as usize;
    let oscillator = Oscillator::new(tone.waveform, tone.frequency_hz, sample_rate);
    let voice = ToneVoice::new(oscillator, GainRamp::new(tone.relative_gain, ramp_samples));

    match tone.cutoff_hz {
        Some(cutoff) => voice.with_filter(ToneFilter::low_pass(cutoff, sample_rate)),
        None => voice,
    }
}

/// Handle to a voice living in a [`ToneGraph`]
pub struct GraphTone {
    graph: SharedGraph,
    id: u64,
    released: bool,
}

impl GraphTone {
    /// Build a voice for `tone` and connect it to the graph
    pub fn connect(graph: &SharedGraph, tone: &ToneParameters, ramp: Duration) -> Result<Self> {
        let mut guard = graph
            .lock()
            .map_err(|_| AmbientError::audio("tone graph lock poisoned"))?;
        let voice = build_voice(tone, ramp, guard.sample_rate());
        let id = guard.add(voice);
        debug!(
            id,
            frequency_hz = tone.frequency_hz,
            waveform = tone.waveform.as_str(),
            gain = tone.relative_gain,
            "tone connected"
        );

        Ok(Self {
            graph: Arc::clone(graph),
            id,
            released: false,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

impl ToneHandle for GraphTone {
    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        // A poisoned graph is being torn down anyway
        if let Ok(mut graph) = self.graph.lock() {
            graph.remove(self.id);
        }
    }

    fn is_released(&self) -> bool {
        self.released
    }
}

impl Drop for GraphTone {
    fn drop(&mut self) {
        self.release();
    }
}
