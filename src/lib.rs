//! Squash and stretch library.
//!
//! This module exposes the animator's ECS components, resources, systems, and
//! events for use in integration tests, the headless runner, and as a reusable
//! library on top of `bevy_ecs`.

pub mod components;
pub mod events;
pub mod resources;
pub mod sim;
pub mod systems;
