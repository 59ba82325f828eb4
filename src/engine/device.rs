//! Audio device abstraction
//!
//! The engine drives any host audio capability through [`AudioDevice`]:
//! bring the device out of suspension, then connect and start one tone
//! chain per preset entry.

use std::time::Duration;

use super::graph::{GraphTone, SharedGraph, ToneGraph};
use crate::catalog::ToneParameters;
use crate::error::{AmbientError, Result};

/// Readiness of the output device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Ready,
    /// Locked until resumed, often pending a user gesture
    Suspended,
}

/// A sounding tone owned by the engine
pub trait ToneHandle {
    /// Stop emission and disconnect. Safe to call more than once.
    fn release(&mut self);

    fn is_released(&self) -> bool;
}

/// Host audio output capability
#[allow(async_fn_in_trait)]
pub trait AudioDevice {
    type Tone: ToneHandle;

    fn state(&self) -> DeviceState;

    /// Move a suspended device to ready. May wait indefinitely.
    async fn resume(&mut self) -> Result<()>;

    /// Build oscillator, filter and gain stages for `tone`, connect them to
    /// the output and start emission. The gain ramps from silence to the
    /// tone's level over `ramp`.
    fn create_tone(&mut self, tone: &ToneParameters, ramp: Duration) -> Result<Self::Tone>;
}

/// Device rendering into memory, for recording and tests
pub struct OfflineDevice {
    graph: SharedGraph,
}

impl OfflineDevice {
    pub fn new(sample_rate: u32, master_volume: f32) -> Self {
        Self {
            graph: ToneGraph::shared(sample_rate as f64, master_volume),
        }
    }

    pub fn graph(&self) -> &SharedGraph {
        &self.graph
    }

    pub fn sample_rate(&self) -> u32 {
        self.graph
            .lock()
            .map(|g| g.sample_rate() as u32)
            .unwrap_or_default()
    }

    /// Number of tones currently connected
    pub fn live_tones(&self) -> usize {
        self.graph.lock().map(|g| g.len()).unwrap_or_default()
    }

    /// Render the next block of mono samples
    pub fn render(&self, buffer: &mut [f32]) -> Result<()> {
        let mut graph = self
            .graph
            .lock()
            .map_err(|_| AmbientError::audio("tone graph lock poisoned"))?;
        graph.fill_buffer(buffer);
        Ok(())
    }
}

impl AudioDevice for OfflineDevice {
    type Tone = GraphTone;

    fn state(&self) -> DeviceState {
        DeviceState::Ready
    }

    async fn resume(&mut self) -> Result<()> {
        Ok(())
    }

    fn create_tone(&mut self, tone: &ToneParameters, ramp: Duration) -> Result<GraphTone> {
        GraphTone::connect(&self.graph, tone, ramp)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::Waveform;

    #[tokio::test]
    async fn test_offline_device_is_ready() {
        let mut device = OfflineDevice::new(44100, 0.7);
        assert_eq!(device.state(), DeviceState::Ready);
        assert!(device.resume().await.is_ok());
        assert_eq!(device.sample_rate(), 44100);
    }

    #[test]
    fn test_offline_device_renders_tones() {
        let mut device = OfflineDevice::new(44100, 1.0);
        let tone = ToneParameters::new(220.0, Waveform::Sine, 0.05);
        let mut handle = device.create_tone(&tone, Duration::ZERO).unwrap();
        assert_eq!(device.live_tones(), 1);

        let mut buffer = vec![0.0f32; 512];
        device.render(&mut buffer).unwrap();
        assert!(buffer.iter().any(|&s| s.abs() > 0.0));

        handle.release();
        assert_eq!(device.live_tones(), 0);

        device.render(&mut buffer).unwrap();
        assert!(buffer.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_tone_above_render_rate_stays_within_gain() {
        let mut device = OfflineDevice::new(8000, 1.0);
        let tone = ToneParameters::new(12000.0, Waveform::Sawtooth, 0.1);
        let _handle = device.create_tone(&tone, Duration::ZERO).unwrap();

        let mut buffer = vec![0.0f32; 8000];
        for _ in 0..4 {
            device.render(&mut buffer).unwrap();
            let peak = buffer.iter().fold(0.0f32, |a, &b| a.max(b.abs()));
            assert!(peak <= 0.1 + 1e-6, "peak {}", peak);
        }
    }
}
