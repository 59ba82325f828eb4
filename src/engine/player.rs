//! Real-time output device using cpal

use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use tracing::{debug, error, info};

use super::device::{AudioDevice, DeviceState};
use super::graph::{GraphTone, SharedGraph, ToneGraph};
use crate::catalog::ToneParameters;
use crate::error::{AmbientError, Result};

/// Output stream fed from a shared tone graph.
///
/// The stream is opened paused; [`AudioDevice::resume`] starts it.
pub struct CpalDevice {
    stream: Stream,
    graph: SharedGraph,
    state: DeviceState,
    name: String,
    sample_rate: u32,
}

impl CpalDevice {
    /// Open the named output device, or the host default when `name` is None
    pub fn open(name: Option<&str>, master_volume: f32) -> Result<Self> {
        let host = cpal::default_host();
        let device = match name {
            Some(wanted) => find_output_device(&host, wanted)?,
            None => host
                .default_output_device()
                .ok_or_else(|| AmbientError::audio("no output device available"))?,
        };
        let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());

        let supported = device
            .default_output_config()
            .map_err(|e| AmbientError::audio(format!("no usable output config: {}", e)))?;
        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.into();
        let sample_rate = config.sample_rate.0;
        let channels = config.channels;

        let graph = ToneGraph::shared(sample_rate as f64, master_volume);

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &config, graph.clone())?,
            SampleFormat::I16 => build_stream::<i16>(&device, &config, graph.clone())?,
            SampleFormat::U16 => build_stream::<u16>(&device, &config, graph.clone())?,
            other => {
                return Err(AmbientError::audio(format!(
                    "unsupported sample format {:?}",
                    other
                )))
            }
        };

        // Some backends start streams on creation
        if let Err(e) = stream.pause() {
            debug!(error = %e, "stream could not be paused after creation");
        }

        info!(device = %device_name, sample_rate, channels, "output device opened");

        Ok(Self {
            stream,
            graph,
            state: DeviceState::Suspended,
            name: device_name,
            sample_rate,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl AudioDevice for CpalDevice {
    type Tone = GraphTone;

    fn state(&self) -> DeviceState {
        self.state
    }

    async fn resume(&mut self) -> Result<()> {
        self.stream
            .play()
            .map_err(|e| AmbientError::audio(format!("failed to start stream: {}", e)))?;
        self.state = DeviceState::Ready;
        debug!(device = %self.name, "output resumed");
        Ok(())
    }

    fn create_tone(&mut self, tone: &ToneParameters, ramp: Duration) -> Result<GraphTone> {
        GraphTone::connect(&self.graph, tone, ramp)
    }
}

fn find_output_device(host: &cpal::Host, wanted: &str) -> Result<Device> {
    let devices = host
        .output_devices()
        .map_err(|e| AmbientError::audio(format!("failed to list output devices: {}", e)))?;

    for device in devices {
        if device.name().map(|n| n == wanted).unwrap_or(false) {
            return Ok(device);
        }
    }

    Err(AmbientError::audio(format!("output device '{}' not found", wanted)))
}

fn build_stream<T>(device: &Device, config: &StreamConfig, graph: SharedGraph) -> Result<Stream>
where
    T: cpal::Sample + cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = config.channels as usize;

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                // Never block the audio thread; a busy graph yields one silent buffer
                match graph.try_lock() {
                    Ok(mut graph) => {
                        for frame in data.chunks_mut(channels) {
                            let sample = T::from_sample(graph.process() as f32);
                            for channel_sample in frame.iter_mut() {
                                *channel_sample = sample;
                            }
                        }
                    }
                    Err(_) => {
                        for sample in data.iter_mut() {
                            *sample = T::from_sample(0.0f32);
                        }
                    }
                }
            },
            |err| {
                error!(error = %err, "audio stream error");
            },
            None,
        )
        .map_err(|e| AmbientError::audio(format!("failed to build output stream: {}", e)))
}

/// Name of the default output device, if any
pub fn default_device_name() -> Option<String> {
    let host = cpal::default_host();
    host.default_output_device().and_then(|d| d.name().ok())
}

/// Output devices with their default stream configs
pub fn list_output_devices() -> Vec<(String, StreamConfig)> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    if let Ok(output_devices) = host.output_devices() {
        for device in output_devices {
            if let (Ok(name), Ok(config)) = (device.name(), device.default_output_config()) {
                devices.push((name, config.into()));
            }
        }
    }

    devices
}
