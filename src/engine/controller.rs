//! Play/pause controller for the ambient widget
//!
//! Owns the engine and the listener's preset selection. Audio failures stop
//! here: they are logged and playback simply stays off.

use tracing::{info, warn};

use super::{AmbientEngine, AudioDevice};
use crate::catalog::{MoodPreset, SuggestionPopup};

pub struct AmbientController<D: AudioDevice> {
    engine: AmbientEngine<D>,
    selected: MoodPreset,
}

impl<D: AudioDevice> AmbientController<D> {
    /// Start idle with the catalog's fallback preset selected
    pub fn new(engine: AmbientEngine<D>) -> Self {
        let selected = engine.catalog().fallback().clone();
        Self { engine, selected }
    }

    pub fn engine(&self) -> &AmbientEngine<D> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut AmbientEngine<D> {
        &mut self.engine
    }

    pub fn selected(&self) -> &MoodPreset {
        &self.selected
    }

    pub fn is_playing(&self) -> bool {
        self.engine.is_active()
    }

    /// Play if stopped, stop if playing. Returns whether sound is now on.
    pub async fn toggle(&mut self) -> bool {
        if self.engine.is_active() {
            self.engine.stop();
            false
        } else {
            self.play_selected().await
        }
    }

    /// Change the selection; a playing engine switches over immediately
    pub async fn select(&mut self, preset: MoodPreset) -> bool {
        info!(preset = %preset.id, name = %preset.display_name, "preset selected");
        let was_playing = self.engine.is_active();
        self.selected = preset;

        if was_playing {
            self.play_selected().await
        } else {
            false
        }
    }

    /// Apply whatever the popup is suggesting, if anything
    pub async fn accept_suggestion(&mut self, popup: &mut SuggestionPopup) -> Option<String> {
        let preset = popup.accept()?;
        let id = preset.id.clone();
        self.select(preset).await;
        Some(id)
    }

    async fn play_selected(&mut self) -> bool {
        let preset = self.selected.clone();
        match self.engine.start(&preset).await {
            Ok(()) => true,
            Err(e) => {
                warn!(preset = %preset.id, error = %e, "ambient audio unavailable, staying silent");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, SuggestionAdvisor};
    use crate::engine::testing::MockDevice;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn controller(device: MockDevice) -> AmbientController<MockDevice> {
        AmbientController::new(AmbientEngine::new(device, Arc::new(Catalog::builtin())))
    }

    #[test]
    fn test_initial_selection_is_calm() {
        let controller = controller(MockDevice::ready());
        assert_eq!(controller.selected().id, "calm");
        assert!(!controller.is_playing());
    }

    #[tokio::test]
    async fn test_toggle_plays_and_stops() {
        let mut controller = controller(MockDevice::suspended());

        assert!(controller.toggle().await);
        assert!(controller.is_playing());
        assert_eq!(controller.engine().live_tone_count(), 3);

        assert!(!controller.toggle().await);
        assert!(!controller.is_playing());
        assert_eq!(controller.engine().device().live(), 0);
    }

    #[tokio::test]
    async fn test_unavailable_audio_is_swallowed() {
        let mut device = MockDevice::suspended();
        device.deny_resume = true;
        let mut controller = controller(device);

        assert!(!controller.toggle().await);
        assert!(!controller.is_playing());

        // Pressing play again retries
        controller.engine_mut().device_mut().deny_resume = false;
        assert!(controller.toggle().await);
    }

    #[tokio::test]
    async fn test_select_while_playing_switches() {
        let mut controller = controller(MockDevice::ready());
        controller.toggle().await;

        let nature = Catalog::builtin().get("nature").cloned().unwrap();
        assert!(controller.select(nature).await);

        assert_eq!(controller.engine().active_preset().unwrap().id, "nature");
        assert_eq!(controller.engine().device().live(), 4);
    }

    #[tokio::test]
    async fn test_select_while_stopped_does_not_play() {
        let mut controller = controller(MockDevice::ready());

        let focus = Catalog::builtin().get("focus").cloned().unwrap();
        assert!(!controller.select(focus).await);

        assert_eq!(controller.selected().id, "focus");
        assert!(!controller.is_playing());
        assert_eq!(controller.engine().device().log.borrow().created, 0);
    }

    #[tokio::test]
    async fn test_accept_suggestion() {
        let mut controller = controller(MockDevice::ready());
        controller.toggle().await;

        let advisor = SuggestionAdvisor::new(Arc::new(Catalog::builtin()), Duration::ZERO);
        let mut popup = SuggestionPopup::new(Duration::from_secs(5));
        let suggestion = advisor.suggest_now("projects", Some(controller.selected().id.as_str()));
        assert!(popup.show(suggestion, Instant::now()));

        let applied = controller.accept_suggestion(&mut popup).await;
        assert_eq!(applied.as_deref(), Some("focus"));
        assert_eq!(controller.engine().active_preset().unwrap().id, "focus");
        assert_eq!(controller.engine().live_tone_count(), 3);

        assert!(controller.accept_suggestion(&mut popup).await.is_none());
    }
}
