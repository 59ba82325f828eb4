//! Ambient sound engine
//!
//! Realizes one mood preset at a time on an [`AudioDevice`]. Starting a new
//! preset always tears down the previous one first, so at most one set of
//! tones is ever live.

mod controller;
mod device;
mod graph;
mod player;
mod recorder;

pub use controller::AmbientController;
pub use device::{AudioDevice, DeviceState, OfflineDevice, ToneHandle};
pub use graph::{build_voice, GraphTone, SharedGraph, ToneGraph};
pub use player::{default_device_name, list_output_devices, CpalDevice};
pub use recorder::Recorder;

#[cfg(test)]
pub(crate) use device::testing;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::catalog::{Catalog, MoodPreset};
use crate::error::{AmbientError, Result};

/// Default tone fade-in
pub const DEFAULT_FADE_IN: Duration = Duration::from_millis(1000);

/// What the engine is currently playing
pub struct PlaybackSession<T> {
    active_preset: Option<MoodPreset>,
    live_tones: Vec<T>,
}

impl<T: ToneHandle> PlaybackSession<T> {
    fn new() -> Self {
        Self {
            active_preset: None,
            live_tones: Vec::new(),
        }
    }

    pub fn active_preset(&self) -> Option<&MoodPreset> {
        self.active_preset.as_ref()
    }

    pub fn live_tones(&self) -> &[T] {
        &self.live_tones
    }

    /// Release every tone and forget the preset. Returns how many were live.
    fn clear(&mut self) -> usize {
        let count = self.live_tones.len();
        for mut tone in self.live_tones.drain(..) {
            tone.release();
        }
        self.active_preset = None;
        count
    }
}

/// Plays mood presets on a device
pub struct AmbientEngine<D: AudioDevice> {
    device: D,
    catalog: Arc<Catalog>,
    fade_in: Duration,
    session: PlaybackSession<D::Tone>,
}

impl<D: AudioDevice> AmbientEngine<D> {
    pub fn new(device: D, catalog: Arc<Catalog>) -> Self {
        Self {
            device,
            catalog,
            fade_in: DEFAULT_FADE_IN,
            session: PlaybackSession::new(),
        }
    }

    /// Set the gain ramp used for tones started from now on
    pub fn with_fade_in(mut self, fade_in: Duration) -> Self {
        self.fade_in = fade_in;
        self
    }

    pub fn fade_in(&self) -> Duration {
        self.fade_in
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn session(&self) -> &PlaybackSession<D::Tone> {
        &self.session
    }

    pub fn active_preset(&self) -> Option<&MoodPreset> {
        self.session.active_preset()
    }

    /// True while any tone is live
    pub fn is_active(&self) -> bool {
        !self.session.live_tones.is_empty()
    }

    pub fn live_tone_count(&self) -> usize {
        self.session.live_tones.len()
    }

    /// Play `preset`, replacing whatever is playing.
    ///
    /// Resumes a suspended device first; this is the only await point.
    /// If any tone fails to start, the ones already started are released.
    pub async fn start(&mut self, preset: &MoodPreset) -> Result<()> {
        self.stop();

        if self.device.state() == DeviceState::Suspended {
            debug!("resuming suspended output device");
            self.device.resume().await?;
        }

        for tone in &preset.tones {
            match self.device.create_tone(tone, self.fade_in) {
                Ok(handle) => self.session.live_tones.push(handle),
                Err(e) => {
                    let released = self.session.clear();
                    warn!(preset = %preset.id, released, error = %e, "preset start aborted");
                    return Err(e);
                }
            }
        }
        self.session.active_preset = Some(preset.clone());

        info!(
            preset = %preset.id,
            tones = self.session.live_tones.len(),
            fade_in_ms = self.fade_in.as_millis() as u64,
            "ambient playback started"
        );
        Ok(())
    }

    /// Play the catalog preset with this id
    pub async fn start_by_id(&mut self, id: &str) -> Result<()> {
        let preset = self
            .catalog
            .get(id)
            .cloned()
            .ok_or_else(|| AmbientError::UnknownPreset(id.to_string()))?;
        self.start(&preset).await
    }

    /// Play the preset recommended for a page section
    pub async fn start_for_section(&mut self, section: &str) -> Result<()> {
        let preset = self.catalog.recommend(section).clone();
        self.start(&preset).await
    }

    /// Release every live tone. Does nothing when idle.
    pub fn stop(&mut self) {
        let preset = self.session.active_preset.as_ref().map(|p| p.id.clone());
        let released = self.session.clear();
        if released > 0 {
            info!(preset = preset.as_deref().unwrap_or("-"), released, "ambient playback stopped");
        }
    }
}

impl<D: AudioDevice> Drop for AmbientEngine<D> {
    fn drop(&mut self) {
        self.session.clear();
    }
}
