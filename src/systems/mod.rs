//! Engine systems.
//!
//! Submodules overview
//! - [`squashstretch`] – initialize, trigger and advance squash and stretch animators
//! - [`time`] – update simulation time and delta

pub mod squashstretch;
pub mod time;
