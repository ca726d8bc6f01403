//! Event types used by the animator.
//!
//! Events provide a decoupled way to drive animators from gameplay code
//! without direct access to their components.
//!
//! Submodules:
//! - [`squashstretch`] – play / set-looping requests and finish notifications
pub mod squashstretch;
