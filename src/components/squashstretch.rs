//! Squash and stretch animator component.
//!
//! [`SquashStretch`] drives the [`LocalScale`](super::localscale::LocalScale)
//! of a target entity with a curve-shaped pulse. It holds two kinds of data:
//!
//! - [`SquashStretchSettings`] – designer-facing configuration. It can be
//!   loaded from JSON presets (see
//!   [`SquashStretchPresets`](crate::resources::presets::SquashStretchPresets)).
//! - runtime state – the baseline scale captured at initialization, the
//!   reversal flag and the current [`Playback`] phase.
//!
//! A run is started by triggering
//! [`PlaySquashStretchEvent`](crate::events::squashstretch::PlaySquashStretchEvent)
//! and advanced once per frame by
//! [`squash_stretch_system`](crate::systems::squashstretch::squash_stretch_system).
//!
//! # Example
//!
//! ```ignore
//! let settings = SquashStretchSettings::default()
//!     .with_axis(SquashStretchAxis::Y)
//!     .with_scales(1.0, 1.5);
//! world.spawn((LocalScale::default(), SquashStretch::new(settings)));
//! ```

use bevy_ecs::prelude::{Component, Entity};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::axis::SquashStretchAxis;
use super::curve::AnimationCurve;

/// Designer configuration of a squash and stretch animation.
///
/// No field is validated; out-of-range probabilities or scales are used as-is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquashStretchSettings {
    /// Free-form notes for whoever tweaks the preset.
    pub notes: String,
    /// Axes multiplied by the animated factor.
    pub axis: SquashStretchAxis,
    /// Length of one cycle in seconds.
    pub duration: f32,
    /// Allow a trigger to restart a looping animation.
    pub can_be_overwritten: bool,
    /// Start playing as soon as the animator is initialized.
    pub play_on_start: bool,
    /// When false, each cycle only plays with `chance_to_play` percent.
    pub plays_every_time: bool,
    /// Percentage (0 to 100) of cycles that play when `plays_every_time` is off.
    pub chance_to_play: f32,
    /// Scale factor at curve value 0.
    pub initial_scale: f32,
    /// Scale factor at curve value 1.
    pub maximum_scale: f32,
    /// Restore the baseline scale when a cycle ends.
    pub reset_after_play: bool,
    /// Flip playback direction at the start of every cycle.
    pub reverse_after_play: bool,
    /// Shape of the pulse over normalized time.
    pub curve: AnimationCurve,
    /// Repeat cycles until looping is turned off.
    pub looping: bool,
    /// Pause between looping cycles in seconds.
    pub loop_delay: f32,
}

impl Default for SquashStretchSettings {
    fn default() -> Self {
        SquashStretchSettings {
            notes: String::new(),
            axis: SquashStretchAxis::Y,
            duration: 0.25,
            can_be_overwritten: false,
            play_on_start: false,
            plays_every_time: true,
            chance_to_play: 100.0,
            initial_scale: 1.0,
            maximum_scale: 1.3,
            reset_after_play: true,
            reverse_after_play: false,
            curve: AnimationCurve::default(),
            looping: false,
            loop_delay: 0.5,
        }
    }
}

impl SquashStretchSettings {
    pub fn with_axis(mut self, axis: SquashStretchAxis) -> Self {
        self.axis = axis;
        self
    }
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }
    pub fn with_scales(mut self, initial: f32, maximum: f32) -> Self {
        self.initial_scale = initial;
        self.maximum_scale = maximum;
        self
    }
    pub fn with_curve(mut self, curve: AnimationCurve) -> Self {
        self.curve = curve;
        self
    }
    pub fn with_looping(mut self, looping: bool, loop_delay: f32) -> Self {
        self.looping = looping;
        self.loop_delay = loop_delay;
        self
    }
    pub fn with_chance(mut self, chance_to_play: f32) -> Self {
        self.plays_every_time = false;
        self.chance_to_play = chance_to_play;
        self
    }
    pub fn with_overwrite(mut self, can_be_overwritten: bool) -> Self {
        self.can_be_overwritten = can_be_overwritten;
        self
    }
    pub fn with_reset(mut self, reset_after_play: bool) -> Self {
        self.reset_after_play = reset_after_play;
        self
    }
    pub fn with_reverse(mut self, reverse_after_play: bool) -> Self {
        self.reverse_after_play = reverse_after_play;
        self
    }
    pub fn with_play_on_start(mut self) -> Self {
        self.play_on_start = true;
        self
    }
}

/// Phase of the animator's single run.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub enum Playback {
    /// No run is active.
    #[default]
    Idle,
    /// At the top of a cycle: roll the play chance and maybe flip direction.
    CycleStart,
    /// A looping cycle lost its play roll; the looping flag is checked again
    /// on the next frame before rolling.
    Skipped,
    /// Interpolating; `elapsed` seconds into the cycle.
    Playing { elapsed: f32 },
    /// The last frame of the cycle was written; wrap up on the next frame.
    Completed,
    /// Waiting between looping cycles.
    LoopDelay { remaining: f32 },
}

/// Squash and stretch animator attached to an entity.
#[derive(Component, Clone, Debug)]
pub struct SquashStretch {
    /// Designer configuration.
    pub settings: SquashStretchSettings,
    /// Entity whose [`LocalScale`](super::localscale::LocalScale) is animated.
    /// `None` means the animator's own entity.
    pub target: Option<Entity>,
    /// Current playback direction.
    pub is_reversed: bool,
    initial_scale: Option<Vec3>,
    loop_delay_wait: f32,
    playback: Playback,
}

impl SquashStretch {
    pub fn new(settings: SquashStretchSettings) -> Self {
        SquashStretch {
            settings,
            target: None,
            is_reversed: false,
            initial_scale: None,
            loop_delay_wait: 0.0,
            playback: Playback::Idle,
        }
    }

    /// Animate another entity's scale, typically a child holding the visual.
    pub fn with_target(mut self, target: Entity) -> Self {
        self.target = Some(target);
        self
    }

    /// Entity whose scale this animator writes.
    pub fn target_or(&self, owner: Entity) -> Entity {
        self.target.unwrap_or(owner)
    }

    /// Capture the baseline scale and the loop delay.
    ///
    /// Only the first call has an effect; the baseline never changes afterwards.
    /// Returns true if this call initialized the animator.
    pub fn initialize(&mut self, baseline: Vec3) -> bool {
        if self.initial_scale.is_some() {
            return false;
        }
        self.initial_scale = Some(baseline);
        self.loop_delay_wait = self.settings.loop_delay;
        true
    }

    pub fn is_initialized(&self) -> bool {
        self.initial_scale.is_some()
    }

    /// Baseline scale captured at initialization.
    pub fn initial_scale(&self) -> Option<Vec3> {
        self.initial_scale
    }

    /// Loop delay as captured at initialization.
    pub fn loop_delay_wait(&self) -> f32 {
        self.loop_delay_wait
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    pub(crate) fn set_playback(&mut self, playback: Playback) {
        self.playback = playback;
    }

    /// True while a run is in flight (including loop delays).
    pub fn is_active(&self) -> bool {
        self.playback != Playback::Idle
    }

    /// Change the looping flag. A running cycle is not interrupted; the new
    /// value is consulted the next time the run decides whether to continue.
    pub fn set_looping(&mut self, looping: bool) {
        self.settings.looping = looping;
    }
}
