//! ECS components for entities.
//!
//! This module groups the component types that can be attached to entities
//! to give them a squash and stretch animation.
//!
//! Submodules overview:
//! - [`axis`] – bitmask of the local axes an animation stretches
//! - [`curve`] – keyframed curve shaping the pulse over time
//! - [`localscale`] – 3D scale written by the animator
//! - [`squashstretch`] – animator settings and per-run state

pub mod axis;
pub mod curve;
pub mod localscale;
pub mod squashstretch;
