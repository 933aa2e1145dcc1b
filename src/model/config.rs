use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration from planflow.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlanConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Where board data lives when no remote backend is wired in
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreConfig {
    /// Path of the local JSON board file. `None` means the embedder
    /// supplies its own backend.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Day column widths selectable by the zoom slider, in pixels
    #[serde(default = "default_zoom_levels")]
    pub zoom_levels: Vec<u32>,
    /// Index into `zoom_levels` used at startup
    #[serde(default = "default_zoom_index")]
    pub zoom_index: usize,
    /// Undo depth before the oldest snapshots are evicted
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            zoom_levels: default_zoom_levels(),
            zoom_index: default_zoom_index(),
            history_limit: default_history_limit(),
        }
    }
}

impl UiConfig {
    /// The configured starting day width, clamped into `zoom_levels`
    pub fn initial_day_width(&self) -> u32 {
        let idx = self.zoom_index.min(self.zoom_levels.len().saturating_sub(1));
        self.zoom_levels.get(idx).copied().unwrap_or(200)
    }
}

fn default_zoom_levels() -> Vec<u32> {
    vec![120, 160, 200, 240, 280]
}

fn default_zoom_index() -> usize {
    2
}

fn default_history_limit() -> usize {
    500
}
