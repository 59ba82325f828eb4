//! Section-based preset suggestions
//!
//! The "analysis" is a catalog lookup behind a fixed delay. The popup that
//! presents a suggestion closes itself after a configurable interval.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use super::{Catalog, MoodPreset};
use crate::config::SuggestionConfig;

/// A recommended preset for a section
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub section: String,
    pub preset: MoodPreset,
    /// Id of the preset selected when the suggestion was made
    pub current: Option<String>,
}

impl Suggestion {
    /// True when the suggestion differs from the current selection
    pub fn is_new(&self) -> bool {
        self.current.as_deref() != Some(self.preset.id.as_str())
    }

    /// Text shown in the popup
    pub fn message(&self) -> String {
        format!("Suggested: {}. {}", self.preset.display_name, self.preset.description)
    }
}

/// Produces suggestions after a simulated analysis delay
#[derive(Debug, Clone)]
pub struct SuggestionAdvisor {
    catalog: Arc<Catalog>,
    analysis_delay: Duration,
}

impl SuggestionAdvisor {
    pub fn new(catalog: Arc<Catalog>, analysis_delay: Duration) -> Self {
        Self {
            catalog,
            analysis_delay,
        }
    }

    pub fn from_config(catalog: Arc<Catalog>, config: &SuggestionConfig) -> Self {
        Self::new(catalog, config.analysis_delay())
    }

    pub fn analysis_delay(&self) -> Duration {
        self.analysis_delay
    }

    /// Suggest a preset for `section` without waiting
    pub fn suggest_now(&self, section: &str, current: Option<&str>) -> Suggestion {
        let preset = self.catalog.recommend(section).clone();
        debug!(section, preset = %preset.id, "suggestion ready");

        Suggestion {
            section: section.to_string(),
            preset,
            current: current.map(str::to_string),
        }
    }

    /// Wait out the analysis delay, then suggest
    pub async fn analyze(&self, section: &str, current: Option<&str>) -> Suggestion {
        debug!(section, delay_ms = self.analysis_delay.as_millis() as u64, "analyzing section");
        tokio::time::sleep(self.analysis_delay).await;
        self.suggest_now(section, current)
    }
}

/// One-shot popup presenting a suggestion
#[derive(Debug, Clone)]
pub struct SuggestionPopup {
    dismiss_after: Duration,
    suggestion: Option<Suggestion>,
    shown_at: Option<Instant>,
}

impl SuggestionPopup {
    pub fn new(dismiss_after: Duration) -> Self {
        Self {
            dismiss_after,
            suggestion: None,
            shown_at: None,
        }
    }

    pub fn from_config(config: &SuggestionConfig) -> Self {
        Self::new(config.dismiss_after())
    }

    pub fn dismiss_after(&self) -> Duration {
        self.dismiss_after
    }

    /// Open the popup if the suggestion is new. Returns whether it opened.
    pub fn show(&mut self, suggestion: Suggestion, now: Instant) -> bool {
        let open = suggestion.is_new();
        self.suggestion = Some(suggestion);
        self.shown_at = open.then_some(now);
        open
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        match self.shown_at {
            Some(shown_at) => now.saturating_duration_since(shown_at) < self.dismiss_after,
            None => false,
        }
    }

    /// Last suggestion received, shown or not
    pub fn suggestion(&self) -> Option<&Suggestion> {
        self.suggestion.as_ref()
    }

    pub fn dismiss(&mut self) {
        self.shown_at = None;
    }

    /// Take the suggested preset and close the popup
    pub fn accept(&mut self) -> Option<MoodPreset> {
        self.shown_at = None;
        self.suggestion.take().map(|s| s.preset)
    }
}
