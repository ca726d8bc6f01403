//! Squash and stretch control and notification events.
//!
//! - [`PlaySquashStretchEvent`] – start (or restart) an animator's run
//! - [`SetSquashStretchLoopingEvent`] – change an animator's looping flag
//! - [`SquashStretchFinishedEvent`] – emitted when a run terminates
//!
//! The first two are handled by observers in
//! [`crate::systems::squashstretch`]; register them once on the world:
//!
//! ```ignore
//! world.add_observer(play_squash_stretch_observer);
//! world.add_observer(set_looping_observer);
//! world.trigger(PlaySquashStretchEvent { entity });
//! ```

use bevy_ecs::prelude::*;

/// Request to play the animator on `entity`.
///
/// Ignored while the animator loops and does not allow overwriting, or when
/// its axis mask is empty. A run already in flight is cancelled and restarted.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaySquashStretchEvent {
    /// The entity carrying the [`SquashStretch`](crate::components::squashstretch::SquashStretch).
    pub entity: Entity,
}

/// Set the looping flag of the animator on `entity`.
///
/// Does not start or stop the current run.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetSquashStretchLoopingEvent {
    pub entity: Entity,
    pub looping: bool,
}

/// Event emitted when an animator's run ends and it becomes idle.
///
/// Not emitted when a run is cancelled by a restart.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquashStretchFinishedEvent {
    /// The entity whose animator finished.
    pub entity: Entity,
}
