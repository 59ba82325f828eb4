//! WAV capture of offline renders

use anyhow::{Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Duration;

use super::device::OfflineDevice;

/// Writes mono 32-bit float WAV files
pub struct Recorder {
    writer: WavWriter<BufWriter<File>>,
    sample_rate: u32,
    samples_written: u64,
}

impl Recorder {
    pub fn new(path: &Path, sample_rate: u32) -> Result<Self> {
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };

        let writer = WavWriter::create(path, spec)
            .with_context(|| format!("failed to create WAV file: {:?}", path))?;

        Ok(Self {
            writer,
            sample_rate,
            samples_written: 0,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }

    /// Recorded length in seconds
    pub fn duration_secs(&self) -> f64 {
        self.samples_written as f64 / self.sample_rate as f64
    }

    pub fn write_buffer(&mut self, buffer: &[f32]) -> Result<()> {
        for &sample in buffer {
            self.writer
                .write_sample(sample)
                .context("failed to write sample")?;
        }
        self.samples_written += buffer.len() as u64;
        Ok(())
    }

    /// Render `length` of audio from the device in `block`-sized chunks.
    /// `on_block` receives the running total of samples written.
    pub fn capture(
        &mut self,
        device: &OfflineDevice,
        length: Duration,
        block: usize,
        mut on_block: impl FnMut(u64),
    ) -> Result<()> {
        let total = (length.as_secs_f64() * self.sample_rate as f64).round() as u64;
        let mut buffer = vec![0.0f32; block.max(1)];
        let mut remaining = total;

        while remaining > 0 {
            let n = remaining.min(buffer.len() as u64) as usize;
            device.render(&mut buffer[..n])?;
            self.write_buffer(&buffer[..n])?;
            remaining -= n as u64;
            on_block(self.samples_written);
        }

        Ok(())
    }

    /// Write the header and close the file. Must be called for a valid WAV.
    pub fn finalize(self) -> Result<()> {
        self.writer.finalize().context("failed to finalize WAV file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ToneParameters;
    use crate::engine::AudioDevice;
    use crate::synth::Waveform;
    use tempfile::NamedTempFile;

    #[test]
    fn test_recorder_creation() {
        let file = NamedTempFile::new().unwrap();
        let recorder = Recorder::new(file.path(), 44100).unwrap();

        assert_eq!(recorder.sample_rate(), 44100);
        assert_eq!(recorder.samples_written(), 0);
        assert_eq!(recorder.duration_secs(), 0.0);
    }

    #[test]
    fn test_capture_length() {
        let file = NamedTempFile::new().unwrap();
        let device = OfflineDevice::new(8000, 0.7);
        let mut recorder = Recorder::new(file.path(), 8000).unwrap();

        let mut blocks = 0;
        recorder
            .capture(&device, Duration::from_millis(1500), 512, |_| blocks += 1)
            .unwrap();

        assert_eq!(recorder.samples_written(), 12000);
        assert!((recorder.duration_secs() - 1.5).abs() < 1e-9);
        assert_eq!(blocks, 24);
    }

    #[test]
    fn test_capture_produces_valid_wav() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        let mut device = OfflineDevice::new(8000, 1.0);
        let _tone = device
            .create_tone(
                &ToneParameters::new(220.0, Waveform::Sine, 0.05),
                Duration::from_millis(100),
            )
            .unwrap();

        let mut recorder = Recorder::new(&path, 8000).unwrap();
        recorder
            .capture(&device, Duration::from_millis(500), 256, |_| {})
            .unwrap();
        recorder.finalize().unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 8000);
        assert_eq!(spec.sample_format, SampleFormat::Float);

        let samples: Vec<f32> = reader.into_samples().map(|s| s.unwrap()).collect();
        assert_eq!(samples.len(), 4000);
        // Fade-in: silent start, audible after the ramp
        assert_eq!(samples[0], 0.0);
        let peak = samples[2000..].iter().fold(0.0f32, |a, &b| a.max(b.abs()));
        assert!(peak > 0.04 && peak <= 0.05 + 1e-6, "peak {}", peak);
    }
}
