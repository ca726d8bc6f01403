//! Squash and stretch preset registry.
//!
//! Presets are named [`SquashStretchSettings`] loaded from a JSON document so
//! that designers can tune animations without recompiling. The document is a
//! map from preset name to settings; every settings field is optional and
//! falls back to its default:
//!
//! ```json
//! {
//!   "jump": { "axis": 2, "duration": 0.3, "maximum_scale": 1.4 },
//!   "idle_breath": { "axis": 7, "looping": true, "loop_delay": 1.0,
//!                    "initial_scale": 1.0, "maximum_scale": 1.05 }
//! }
//! ```

use std::path::Path;

use bevy_ecs::prelude::Resource;
use log::info;
use rustc_hash::FxHashMap;

use crate::components::squashstretch::SquashStretchSettings;

/// Name of the preset always available in [`SquashStretchPresets::with_builtin`].
pub const DEFAULT_PRESET: &str = "default";

/// Central registry of reusable animator settings keyed by name.
#[derive(Resource, Debug, Clone, Default)]
pub struct SquashStretchPresets {
    pub presets: FxHashMap<String, SquashStretchSettings>,
}

impl SquashStretchPresets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding only the default settings under [`DEFAULT_PRESET`].
    pub fn with_builtin() -> Self {
        let mut store = Self::new();
        store.insert(DEFAULT_PRESET, SquashStretchSettings::default());
        store
    }

    /// Parse presets from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let presets: FxHashMap<String, SquashStretchSettings> =
            serde_json::from_str(json).map_err(|e| format!("Failed to parse presets: {}", e))?;
        Ok(Self { presets })
    }

    /// Load presets from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read presets file {:?}: {}", path, e))?;
        let store = Self::from_json(&json)?;
        info!("Loaded {} squash and stretch presets from {:?}", store.len(), path);
        Ok(store)
    }

    /// Serialize all presets as pretty JSON.
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(&self.presets)
            .map_err(|e| format!("Failed to serialize presets: {}", e))
    }

    pub fn insert(&mut self, name: impl Into<String>, settings: SquashStretchSettings) {
        self.presets.insert(name.into(), settings);
    }

    pub fn get(&self, name: &str) -> Option<&SquashStretchSettings> {
        self.presets.get(name)
    }

    /// Preset names in alphabetical order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.presets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}
