//! Optional YAML settings with defaults fallback.
//!
//! Everything here has a working default; a settings file only overrides
//! what it names. A broken file is reported and replaced by defaults
//! rather than aborting the run.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use forecast_resolver::HttpStore;
use profiler_common::model::{catalog, ModelSpec};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Provider data root
    pub base_url: String,
    /// Per-probe timeout in seconds
    pub probe_timeout_secs: u64,
    /// Artifact download timeout in seconds
    pub fetch_timeout_secs: u64,
    /// Model ids in auto-selection priority order
    pub model_priority: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: HttpStore::DEFAULT_BASE_URL.to_string(),
            probe_timeout_secs: HttpStore::DEFAULT_PROBE_TIMEOUT.as_secs(),
            fetch_timeout_secs: HttpStore::DEFAULT_FETCH_TIMEOUT.as_secs(),
            model_priority: vec!["hrrr".to_string(), "rap".to_string(), "gfs".to_string()],
        }
    }
}

impl Settings {
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match std::fs::read_to_string(path) {
            Ok(text) => match serde_yaml::from_str(&text) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read settings, using defaults");
                Self::default()
            }
        }
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Resolve the priority list against the catalog; unknown ids are
    /// reported and dropped.
    pub fn priority_models(&self) -> Vec<ModelSpec> {
        self.model_priority
            .iter()
            .filter_map(|id| {
                let found = catalog::by_id(id);
                if found.is_none() {
                    warn!(model = %id, "Unknown model in priority list, ignoring");
                }
                found
            })
            .collect()
    }
}
