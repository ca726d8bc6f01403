//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during execution.
//!
//! Overview
//! - `animrng` – seedable random source for play-chance rolls
//! - `presets` – named animator settings loaded from JSON
//! - `simconfig` – INI settings for the headless runner
//! - `worldtime` – simulation time and delta
pub mod animrng;
pub mod presets;
pub mod simconfig;
pub mod worldtime;
