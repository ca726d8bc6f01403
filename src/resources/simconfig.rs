//! Headless runner configuration resource.
//!
//! Settings for the `squashstretch` binary loaded from an INI file. Provides
//! defaults for a safe startup and methods to load/save the configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [simulation]
//! fps = 60
//! frames = 120
//! seed = 1
//! time_scale = 1.0
//!
//! [animator]
//! preset = default
//! presets_path = ./presets.json
//! trigger_every = 0
//! ```
//!
//! `trigger_every = 0` triggers the animator once on the first frame;
//! any other value re-triggers it every that many frames.

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

/// Default safe values for startup
const DEFAULT_FPS: u32 = 60;
const DEFAULT_FRAMES: u32 = 120;
const DEFAULT_SEED: u64 = 1;
const DEFAULT_TIME_SCALE: f32 = 1.0;
const DEFAULT_PRESET: &str = "default";
const DEFAULT_PRESETS_PATH: &str = "./presets.json";
const DEFAULT_TRIGGER_EVERY: u32 = 0;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Runner configuration resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Fixed simulation rate in frames per second.
    pub fps: u32,
    /// Number of frames to simulate.
    pub frames: u32,
    /// Seed for [`AnimRng`](crate::resources::animrng::AnimRng).
    pub seed: u64,
    /// Multiplier applied to every frame delta.
    pub time_scale: f32,
    /// Name of the preset to animate.
    pub preset: String,
    /// JSON file with presets.
    pub presets_path: PathBuf,
    /// Re-trigger period in frames; 0 triggers only once.
    pub trigger_every: u32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SimConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            fps: DEFAULT_FPS,
            frames: DEFAULT_FRAMES,
            seed: DEFAULT_SEED,
            time_scale: DEFAULT_TIME_SCALE,
            preset: DEFAULT_PRESET.to_string(),
            presets_path: PathBuf::from(DEFAULT_PRESETS_PATH),
            trigger_every: DEFAULT_TRIGGER_EVERY,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Fixed frame delta in seconds.
    pub fn frame_delta(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [simulation] section
        if let Some(fps) = config.getuint("simulation", "fps").ok().flatten() {
            self.fps = fps as u32;
        }
        if let Some(frames) = config.getuint("simulation", "frames").ok().flatten() {
            self.frames = frames as u32;
        }
        if let Some(seed) = config.getuint("simulation", "seed").ok().flatten() {
            self.seed = seed;
        }
        if let Some(time_scale) = config.getfloat("simulation", "time_scale").ok().flatten() {
            self.time_scale = time_scale as f32;
        }

        // [animator] section
        if let Some(preset) = config.get("animator", "preset") {
            self.preset = preset;
        }
        if let Some(path) = config.get("animator", "presets_path") {
            self.presets_path = PathBuf::from(path);
        }
        if let Some(every) = config.getuint("animator", "trigger_every").ok().flatten() {
            self.trigger_every = every as u32;
        }

        info!(
            "Loaded config: fps={}, frames={}, seed={}, time_scale={}, preset={}, presets={:?}",
            self.fps, self.frames, self.seed, self.time_scale, self.preset, self.presets_path
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [simulation] section
        config.set("simulation", "fps", Some(self.fps.to_string()));
        config.set("simulation", "frames", Some(self.frames.to_string()));
        config.set("simulation", "seed", Some(self.seed.to_string()));
        config.set("simulation", "time_scale", Some(self.time_scale.to_string()));

        // [animator] section
        config.set("animator", "preset", Some(self.preset.clone()));
        config.set(
            "animator",
            "presets_path",
            Some(self.presets_path.display().to_string()),
        );
        config.set(
            "animator",
            "trigger_every",
            Some(self.trigger_every.to_string()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}
