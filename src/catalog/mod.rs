//! Mood preset catalog
//!
//! Holds the presets and answers "which preset suits this page section?".
//! The lookup is total: sections without a route get the fallback preset.

mod preset;
mod suggest;

pub use preset::{builtin_presets, MoodPreset, ToneParameters, MAX_TONE_GAIN, MAX_TOTAL_GAIN};
pub use suggest::{Suggestion, SuggestionAdvisor, SuggestionPopup};

use anyhow::{bail, Result};
use std::collections::HashMap;

use crate::config::CatalogConfig;

/// Preset used when a section has no route
pub const DEFAULT_FALLBACK: &str = "calm";

const BUILTIN_ROUTES: &[(&str, &str)] = &[
    ("home", "creative"),
    ("about", "calm"),
    ("projects", "focus"),
    ("vision", "nature"),
    ("contact", "calm"),
    ("blog", "creative"),
];

/// Normalize a section name: trim, drop a leading '#', lowercase
pub fn normalize_section(section: &str) -> String {
    let trimmed = section.trim();
    trimmed
        .strip_prefix('#')
        .unwrap_or(trimmed)
        .trim()
        .to_ascii_lowercase()
}

/// Fixed set of presets plus section routing
#[derive(Debug, Clone)]
pub struct Catalog {
    presets: Vec<MoodPreset>,
    /// Normalized section -> index into `presets`
    routes: HashMap<String, usize>,
    fallback: usize,
}

impl Catalog {
    /// Build a catalog, checking every route and the fallback resolve.
    /// Two routes whose sections normalize to the same key are an error.
    pub fn new(
        presets: Vec<MoodPreset>,
        routes: HashMap<String, String>,
        fallback: &str,
    ) -> Result<Self> {
        for (i, preset) in presets.iter().enumerate() {
            preset.validate()?;
            if presets[..i].iter().any(|p| p.id == preset.id) {
                bail!("Duplicate preset id '{}'", preset.id);
            }
        }

        let index_of = |id: &str| presets.iter().position(|p| p.id == id);

        let Some(fallback) = index_of(fallback) else {
            bail!("Fallback preset '{}' is not in the catalog", fallback);
        };

        let mut resolved = HashMap::with_capacity(routes.len());
        for (section, id) in &routes {
            let Some(index) = index_of(id) else {
                bail!("Section '{}' routes to unknown preset '{}'", section, id);
            };
            let key = normalize_section(section);
            if resolved.insert(key.clone(), index).is_some() {
                bail!("Section '{}' has more than one route", key);
            }
        }

        Ok(Self {
            presets,
            routes: resolved,
            fallback,
        })
    }

    /// The built-in catalog
    pub fn builtin() -> Self {
        let presets = builtin_presets();
        let routes = BUILTIN_ROUTES
            .iter()
            .filter_map(|&(section, id)| {
                presets
                    .iter()
                    .position(|p| p.id == id)
                    .map(|index| (section.to_string(), index))
            })
            .collect();
        let fallback = presets
            .iter()
            .position(|p| p.id == DEFAULT_FALLBACK)
            .unwrap_or(0);

        Self {
            presets,
            routes,
            fallback,
        }
    }

    /// Built-in catalog extended by config: extra presets, route overrides, fallback
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        let mut presets = builtin_presets();
        presets.extend(config.presets.iter().cloned());

        let mut routes: HashMap<String, String> = BUILTIN_ROUTES
            .iter()
            .map(|&(section, id)| (section.to_string(), id.to_string()))
            .collect();
        let mut overrides: HashMap<String, String> = HashMap::with_capacity(config.routes.len());
        for (section, id) in &config.routes {
            let key = normalize_section(section);
            if overrides.contains_key(&key) {
                bail!("Section '{}' has more than one route", key);
            }
            overrides.insert(key, id.clone());
        }
        routes.extend(overrides);

        let fallback = config.fallback.as_deref().unwrap_or(DEFAULT_FALLBACK);
        Self::new(presets, routes, fallback)
    }

    /// All presets in catalog order
    pub fn presets(&self) -> &[MoodPreset] {
        &self.presets
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Look up a preset by id
    pub fn get(&self, id: &str) -> Option<&MoodPreset> {
        self.presets.iter().find(|p| p.id == id)
    }

    /// The preset used for unrouted sections
    pub fn fallback(&self) -> &MoodPreset {
        &self.presets[self.fallback]
    }

    /// Recommend a preset for a page section. Never fails.
    pub fn recommend(&self, section: &str) -> &MoodPreset {
        let index = self
            .routes
            .get(&normalize_section(section))
            .copied()
            .unwrap_or(self.fallback);
        &self.presets[index]
    }

    /// Routed sections and their preset ids, sorted by section
    pub fn routes(&self) -> Vec<(&str, &str)> {
        let mut routes: Vec<(&str, &str)> = self
            .routes
            .iter()
            .map(|(section, &index)| (section.as_str(), self.presets[index].id.as_str()))
            .collect();
        routes.sort_unstable();
        routes
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
