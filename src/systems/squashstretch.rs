//! Squash and stretch systems and observers.
//!
//! - [`squash_stretch_init_system`] – captures the baseline scale of newly
//!   added animators and honours `play_on_start`
//! - [`squash_stretch_system`] – advances every active run by one frame
//! - [`play_squash_stretch_observer`] – handles
//!   [`PlaySquashStretchEvent`]
//! - [`set_looping_observer`] – handles [`SetSquashStretchLoopingEvent`]
//!
//! # Frame flow
//!
//! A run walks through [`Playback`] phases:
//!
//! 1. `CycleStart` rolls the play chance (when `plays_every_time` is off),
//!    flips the direction when `reverse_after_play` is set and starts
//!    interpolating in the same frame.
//! 2. `Playing` adds the frame delta, samples the curve at the normalized
//!    position and writes the scale. The frame that reaches the duration is
//!    still written and shown. A non-positive duration skips straight to
//!    `Completed` in the same frame.
//!    A looping animator that loses the roll moves to `Skipped` and checks
//!    the looping flag again on the next frame before rolling.
//! 3. `Completed` restores the baseline (if configured) on the next frame and
//!    either waits `loop_delay` or ends the run.
//! 4. `LoopDelay` counts down, then starts the next cycle in the same frame
//!    if the animator still loops.
//!
//! Ending a run triggers [`SquashStretchFinishedEvent`].
//!
//! # Ordering
//!
//! Run `squash_stretch_init_system` before `squash_stretch_system` so that
//! animators spawned with `play_on_start` move on their first frame.

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use glam::Vec3;
use log::{debug, warn};

use crate::components::axis::SquashStretchAxis;
use crate::components::localscale::LocalScale;
use crate::components::squashstretch::{Playback, SquashStretch};
use crate::events::squashstretch::{
    PlaySquashStretchEvent, SetSquashStretchLoopingEvent, SquashStretchFinishedEvent,
};
use crate::resources::animrng::AnimRng;
use crate::resources::worldtime::WorldTime;

/// Smallest scale factor magnitude written to a transform.
pub const MINIMUM_SCALE_THRESHOLD: f32 = 0.0001;

/// Normalized position on the curve for `elapsed` seconds into a cycle.
pub fn curve_position(elapsed: f32, duration: f32, reversed: bool) -> f32 {
    let t = elapsed / duration;
    if reversed { 1.0 - t } else { t }
}

/// Map a curve value onto the `[initial, maximum]` scale range.
///
/// Results whose magnitude is below [`MINIMUM_SCALE_THRESHOLD`] are replaced
/// by the threshold so the transform never collapses.
pub fn remap_scale(curve_value: f32, initial: f32, maximum: f32) -> f32 {
    let remapped = initial + curve_value * (maximum - initial);
    if remapped.abs() < MINIMUM_SCALE_THRESHOLD {
        MINIMUM_SCALE_THRESHOLD
    } else {
        remapped
    }
}

/// Scale `baseline` by `multiplier` on the selected axes and by its inverse
/// on the others.
pub fn apply_axes(baseline: Vec3, axis: SquashStretchAxis, multiplier: f32) -> Vec3 {
    let scale = |affected: bool, value: f32| {
        if affected {
            value * multiplier
        } else {
            value / multiplier
        }
    };
    Vec3::new(
        scale(axis.affects_x(), baseline.x),
        scale(axis.affects_y(), baseline.y),
        scale(axis.affects_z(), baseline.z),
    )
}

/// Start a new run, cancelling the one in flight.
///
/// Returns false when nothing was started: empty axis mask, or no
/// [`LocalScale`] on the target to take the baseline from.
pub(crate) fn check_and_start(
    owner: Entity,
    ss: &mut SquashStretch,
    scales: &mut Query<&mut LocalScale>,
) -> bool {
    if ss.settings.axis.is_empty() {
        warn!("Axis to affect is set to None on {:?}", owner);
        return false;
    }

    let target = ss.target_or(owner);
    if !ss.is_initialized() {
        match scales.get(target) {
            Ok(scale) => {
                ss.initialize(scale.scale);
            }
            Err(_) => {
                warn!(
                    "Squash and stretch on {:?} has no LocalScale on target {:?}",
                    owner, target
                );
                return false;
            }
        }
    }

    if ss.is_active() {
        debug!("Restarting squash and stretch on {:?}", owner);
        if ss.settings.plays_every_time && ss.settings.reset_after_play {
            if let (Some(baseline), Ok(mut scale)) = (ss.initial_scale(), scales.get_mut(target)) {
                scale.scale = baseline;
            }
        }
    }

    ss.set_playback(Playback::CycleStart);
    debug!("Squash and stretch started on {:?}", owner);
    true
}

/// Advance one animator by `dt` seconds, writing into `scale`.
///
/// Returns true when the run ended during this call.
pub(crate) fn step(
    ss: &mut SquashStretch,
    scale: &mut Vec3,
    baseline: Vec3,
    dt: f32,
    rng: &mut AnimRng,
) -> bool {
    loop {
        match ss.playback() {
            Playback::Idle => return false,
            Playback::CycleStart => {
                if !ss.settings.plays_every_time && rng.roll_percent() >= ss.settings.chance_to_play
                {
                    if ss.settings.looping {
                        ss.set_playback(Playback::Skipped);
                        return false;
                    }
                    ss.set_playback(Playback::Idle);
                    return true;
                }
                if ss.settings.reverse_after_play {
                    ss.is_reversed = !ss.is_reversed;
                }
                ss.set_playback(Playback::Playing { elapsed: 0.0 });
            }
            Playback::Skipped => {
                if !ss.settings.looping {
                    ss.set_playback(Playback::Idle);
                    return true;
                }
                ss.set_playback(Playback::CycleStart);
            }
            Playback::Playing { elapsed } => {
                let settings = &ss.settings;
                let duration = settings.duration;
                // Nothing to interpolate; wrap up this frame.
                if duration.is_nan() || duration <= 0.0 {
                    ss.set_playback(Playback::Completed);
                    continue;
                }

                let elapsed = elapsed + dt;
                let position = curve_position(elapsed, duration, ss.is_reversed);
                let value = settings.curve.evaluate(position);
                let multiplier =
                    remap_scale(value, settings.initial_scale, settings.maximum_scale);
                *scale = apply_axes(baseline, settings.axis, multiplier);

                if elapsed >= duration {
                    ss.set_playback(Playback::Completed);
                } else {
                    ss.set_playback(Playback::Playing { elapsed });
                }
                return false;
            }
            Playback::Completed => {
                if ss.settings.reset_after_play {
                    *scale = baseline;
                }
                if ss.settings.looping {
                    let remaining = ss.loop_delay_wait();
                    ss.set_playback(Playback::LoopDelay { remaining });
                    return false;
                }
                ss.set_playback(Playback::Idle);
                return true;
            }
            Playback::LoopDelay { remaining } => {
                let remaining = remaining - dt;
                if remaining > 0.0 {
                    ss.set_playback(Playback::LoopDelay { remaining });
                    return false;
                }
                if !ss.settings.looping {
                    ss.set_playback(Playback::Idle);
                    return true;
                }
                ss.set_playback(Playback::CycleStart);
            }
        }
    }
}

/// Capture the baseline scale of newly added animators.
///
/// Animators with `play_on_start` are started right away, without the
/// looping/overwrite guard applied to [`PlaySquashStretchEvent`].
pub fn squash_stretch_init_system(
    mut animators: Query<(Entity, &mut SquashStretch), Added<SquashStretch>>,
    mut scales: Query<&mut LocalScale>,
) {
    for (entity, mut ss) in animators.iter_mut() {
        let target = ss.target_or(entity);
        match scales.get(target) {
            Ok(scale) => {
                ss.initialize(scale.scale);
            }
            Err(_) => {
                warn!(
                    "Squash and stretch on {:?} has no LocalScale on target {:?}",
                    entity, target
                );
                continue;
            }
        }
        if ss.settings.play_on_start {
            check_and_start(entity, &mut ss, &mut scales);
        }
    }
}

/// Advance all active squash and stretch runs by the frame delta.
pub fn squash_stretch_system(
    world_time: Res<WorldTime>,
    mut rng: ResMut<AnimRng>,
    mut animators: Query<(Entity, &mut SquashStretch)>,
    mut scales: Query<&mut LocalScale>,
    mut commands: Commands,
) {
    let dt = world_time.delta.max(0.0);
    for (entity, mut ss) in animators.iter_mut() {
        if !ss.is_active() {
            continue;
        }
        let target = ss.target_or(entity);
        let (Some(baseline), Ok(mut scale)) = (ss.initial_scale(), scales.get_mut(target)) else {
            warn!(
                "Squash and stretch on {:?} lost its target {:?}, stopping",
                entity, target
            );
            ss.set_playback(Playback::Idle);
            commands.trigger(SquashStretchFinishedEvent { entity });
            continue;
        };

        let mut current = scale.scale;
        let finished = step(&mut ss, &mut current, baseline, dt, &mut rng);
        if current != scale.scale {
            scale.scale = current;
        }
        if finished {
            debug!("Squash and stretch finished on {:?}", entity);
            commands.trigger(SquashStretchFinishedEvent { entity });
        }
    }
}

/// Observer that plays the animator named by a [`PlaySquashStretchEvent`].
pub fn play_squash_stretch_observer(
    trigger: On<PlaySquashStretchEvent>,
    mut animators: Query<&mut SquashStretch>,
    mut scales: Query<&mut LocalScale>,
) {
    let entity = trigger.event().entity;
    let Ok(mut ss) = animators.get_mut(entity) else {
        warn!("PlaySquashStretchEvent for {:?} without SquashStretch", entity);
        return;
    };
    if ss.settings.looping && !ss.settings.can_be_overwritten {
        return;
    }
    check_and_start(entity, &mut ss, &mut scales);
}

/// Observer that updates the looping flag of an animator.
pub fn set_looping_observer(
    trigger: On<SetSquashStretchLoopingEvent>,
    mut animators: Query<&mut SquashStretch>,
) {
    let event = trigger.event();
    match animators.get_mut(event.entity) {
        Ok(mut ss) => ss.set_looping(event.looping),
        Err(_) => warn!(
            "SetSquashStretchLoopingEvent for {:?} without SquashStretch",
            event.entity
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::curve::AnimationCurve;
    use crate::components::squashstretch::SquashStretchSettings;

    const EPSILON: f32 = 1e-5;
    const DT: f32 = 0.0625;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn vec_approx_eq(a: Vec3, b: Vec3) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
    }

    fn started(settings: SquashStretchSettings, baseline: Vec3) -> SquashStretch {
        let mut ss = SquashStretch::new(settings);
        ss.initialize(baseline);
        ss.set_playback(Playback::CycleStart);
        ss
    }

    // ==================== CURVE POSITION TESTS ====================

    #[test]
    fn test_curve_position_forward() {
        assert!(approx_eq(curve_position(0.0, 0.5, false), 0.0));
        assert!(approx_eq(curve_position(0.25, 0.5, false), 0.5));
        assert!(approx_eq(curve_position(0.5, 0.5, false), 1.0));
    }

    #[test]
    fn test_curve_position_reversed() {
        assert!(approx_eq(curve_position(0.0, 0.5, true), 1.0));
        assert!(approx_eq(curve_position(0.125, 0.5, true), 0.75));
        assert!(approx_eq(curve_position(0.5, 0.5, true), 0.0));
    }

    // ==================== REMAP TESTS ====================

    #[test]
    fn test_remap_endpoints() {
        assert!(approx_eq(remap_scale(0.0, 1.0, 1.3), 1.0));
        assert!(approx_eq(remap_scale(1.0, 1.0, 1.3), 1.3));
        assert!(approx_eq(remap_scale(0.5, 1.0, 2.0), 1.5));
    }

    #[test]
    fn test_remap_equal_scales_returns_initial() {
        for value in [-2.0, 0.0, 0.3, 1.0, 5.0] {
            assert!(approx_eq(remap_scale(value, 1.7, 1.7), 1.7));
        }
    }

    #[test]
    fn test_remap_clamps_near_zero() {
        assert_eq!(remap_scale(1.0, 1.0, 0.0), MINIMUM_SCALE_THRESHOLD);
        assert_eq!(remap_scale(0.0, 0.00005, 1.0), MINIMUM_SCALE_THRESHOLD);
        assert_eq!(remap_scale(0.0, -0.00005, 1.0), MINIMUM_SCALE_THRESHOLD);
    }

    #[test]
    fn test_remap_magnitude_never_below_threshold() {
        for i in -100..=100 {
            let value = i as f32 / 50.0;
            let m = remap_scale(value, 1.0, 0.0);
            assert!(m.abs() >= MINIMUM_SCALE_THRESHOLD, "remap({}) = {}", value, m);
        }
    }

    #[test]
    fn test_remap_keeps_negative_results() {
        assert!(approx_eq(remap_scale(1.0, 1.0, -0.5), -0.5));
    }

    // ==================== AXIS APPLICATION TESTS ====================

    #[test]
    fn test_apply_axes_y_only() {
        let out = apply_axes(Vec3::new(1.0, 2.0, 4.0), SquashStretchAxis::Y, 2.0);
        assert!(vec_approx_eq(out, Vec3::new(0.5, 4.0, 2.0)));
    }

    #[test]
    fn test_apply_axes_all() {
        let out = apply_axes(Vec3::splat(1.5), SquashStretchAxis::ALL, 2.0);
        assert!(vec_approx_eq(out, Vec3::splat(3.0)));
    }

    #[test]
    fn test_apply_axes_identity_multiplier() {
        let baseline = Vec3::new(0.3, 0.6, 0.9);
        let out = apply_axes(baseline, SquashStretchAxis::X | SquashStretchAxis::Z, 1.0);
        assert!(vec_approx_eq(out, baseline));
    }

    // ==================== STEP TESTS ====================

    #[test]
    fn test_step_first_frame_samples_curve() {
        let mut rng = AnimRng::with_seed(1);
        let mut ss = started(SquashStretchSettings::default(), Vec3::ONE);
        let mut scale = Vec3::ONE;

        // 0.0625 / 0.25 = 0.25 -> curve peak -> 1.3
        let finished = step(&mut ss, &mut scale, Vec3::ONE, DT, &mut rng);
        assert!(!finished);
        assert!(vec_approx_eq(scale, Vec3::new(1.0 / 1.3, 1.3, 1.0 / 1.3)));
        assert_eq!(ss.playback(), Playback::Playing { elapsed: DT });
    }

    #[test]
    fn test_step_runs_to_completion_and_resets() {
        let mut rng = AnimRng::with_seed(1);
        let settings = SquashStretchSettings::default()
            .with_curve(AnimationCurve::constant(1.0))
            .with_scales(1.0, 2.0);
        let mut ss = started(settings, Vec3::ONE);
        let mut scale = Vec3::ONE;

        for _ in 0..3 {
            assert!(!step(&mut ss, &mut scale, Vec3::ONE, DT, &mut rng));
            assert!(matches!(ss.playback(), Playback::Playing { .. }));
        }
        // Fourth frame reaches the duration but still shows the animated scale
        assert!(!step(&mut ss, &mut scale, Vec3::ONE, DT, &mut rng));
        assert_eq!(ss.playback(), Playback::Completed);
        assert!(vec_approx_eq(scale, Vec3::new(0.5, 2.0, 0.5)));

        assert!(step(&mut ss, &mut scale, Vec3::ONE, DT, &mut rng));
        assert_eq!(ss.playback(), Playback::Idle);
        assert!(vec_approx_eq(scale, Vec3::ONE));
    }

    #[test]
    fn test_step_without_reset_keeps_last_scale() {
        let mut rng = AnimRng::with_seed(1);
        let settings = SquashStretchSettings::default()
            .with_curve(AnimationCurve::constant(1.0))
            .with_scales(1.0, 2.0)
            .with_reset(false);
        let mut ss = started(settings, Vec3::ONE);
        let mut scale = Vec3::ONE;

        for _ in 0..5 {
            step(&mut ss, &mut scale, Vec3::ONE, DT, &mut rng);
        }
        assert!(!ss.is_active());
        assert!(vec_approx_eq(scale, Vec3::new(0.5, 2.0, 0.5)));
    }

    #[test]
    fn test_step_zero_duration_ends_in_same_frame() {
        let mut rng = AnimRng::with_seed(1);
        let settings = SquashStretchSettings::default()
            .with_duration(0.0)
            .with_reset(false);
        let mut ss = started(settings, Vec3::ONE);
        let mut scale = Vec3::splat(7.0);

        assert!(step(&mut ss, &mut scale, Vec3::ONE, DT, &mut rng));
        assert_eq!(ss.playback(), Playback::Idle);
        assert!(vec_approx_eq(scale, Vec3::splat(7.0)));
    }

    #[test]
    fn test_step_zero_duration_resets_in_same_frame() {
        let mut rng = AnimRng::with_seed(1);
        let mut ss = started(SquashStretchSettings::default().with_duration(0.0), Vec3::ONE);
        let mut scale = Vec3::splat(7.0);

        assert!(step(&mut ss, &mut scale, Vec3::ONE, DT, &mut rng));
        assert!(vec_approx_eq(scale, Vec3::ONE));
    }

    #[test]
    fn test_step_zero_duration_looping_waits_for_delay() {
        let mut rng = AnimRng::with_seed(1);
        let settings = SquashStretchSettings::default()
            .with_duration(0.0)
            .with_looping(true, 0.0);
        let mut ss = started(settings, Vec3::ONE);
        let mut scale = Vec3::ONE;

        for _ in 0..10 {
            assert!(!step(&mut ss, &mut scale, Vec3::ONE, DT, &mut rng));
            assert_eq!(ss.playback(), Playback::LoopDelay { remaining: 0.0 });
        }
    }

    #[test]
    fn test_step_nan_duration_does_not_panic() {
        let mut rng = AnimRng::with_seed(1);
        let mut ss = started(
            SquashStretchSettings::default().with_duration(f32::NAN),
            Vec3::ONE,
        );
        let mut scale = Vec3::ONE;

        assert!(step(&mut ss, &mut scale, Vec3::ONE, DT, &mut rng));
        assert!(vec_approx_eq(scale, Vec3::ONE));
    }

    #[test]
    fn test_step_reverse_flips_each_cycle() {
        let mut rng = AnimRng::with_seed(1);
        let settings = SquashStretchSettings::default()
            .with_curve(AnimationCurve::linear(0.0, 0.0, 1.0, 1.0))
            .with_scales(1.0, 2.0)
            .with_reverse(true);
        let mut ss = started(settings, Vec3::ONE);
        let mut scale = Vec3::ONE;

        step(&mut ss, &mut scale, Vec3::ONE, DT, &mut rng);
        assert!(ss.is_reversed);
        // reversed: position = 1 - 0.25 = 0.75 -> 1.75
        assert!(approx_eq(scale.y, 1.75));

        ss.set_playback(Playback::CycleStart);
        step(&mut ss, &mut scale, Vec3::ONE, DT, &mut rng);
        assert!(!ss.is_reversed);
        assert!(approx_eq(scale.y, 1.25));
    }

    #[test]
    fn test_step_zero_chance_never_plays() {
        let mut rng = AnimRng::with_seed(3);
        let mut ss = started(SquashStretchSettings::default().with_chance(0.0), Vec3::ONE);
        let mut scale = Vec3::ONE;

        assert!(step(&mut ss, &mut scale, Vec3::ONE, DT, &mut rng));
        assert!(!ss.is_active());
        assert!(vec_approx_eq(scale, Vec3::ONE));
    }

    #[test]
    fn test_step_zero_chance_looping_keeps_retrying() {
        let mut rng = AnimRng::with_seed(3);
        let settings = SquashStretchSettings::default()
            .with_chance(0.0)
            .with_looping(true, 0.0);
        let mut ss = started(settings, Vec3::ONE);
        let mut scale = Vec3::ONE;

        for _ in 0..200 {
            assert!(!step(&mut ss, &mut scale, Vec3::ONE, DT, &mut rng));
            assert_eq!(ss.playback(), Playback::Skipped);
        }
        assert!(vec_approx_eq(scale, Vec3::ONE));
    }

    #[test]
    fn test_step_skipped_cycle_ends_when_looping_turned_off() {
        let mut rng = AnimRng::with_seed(3);
        let settings = SquashStretchSettings::default()
            .with_chance(0.0)
            .with_looping(true, 0.0);
        let mut ss = started(settings, Vec3::ONE);
        let mut scale = Vec3::ONE;

        assert!(!step(&mut ss, &mut scale, Vec3::ONE, DT, &mut rng));
        assert_eq!(ss.playback(), Playback::Skipped);

        // Full chance from now on: a roll would play, but the loop was stopped
        ss.settings.chance_to_play = 100.0;
        ss.set_looping(false);
        assert!(step(&mut ss, &mut scale, Vec3::ONE, DT, &mut rng));
        assert_eq!(ss.playback(), Playback::Idle);
        assert!(vec_approx_eq(scale, Vec3::ONE));
    }

    #[test]
    fn test_step_full_chance_always_plays() {
        let mut rng = AnimRng::with_seed(11);
        for _ in 0..100 {
            let mut ss = started(SquashStretchSettings::default().with_chance(100.0), Vec3::ONE);
            let mut scale = Vec3::ONE;
            step(&mut ss, &mut scale, Vec3::ONE, DT, &mut rng);
            assert!(matches!(ss.playback(), Playback::Playing { .. }));
        }
    }

    #[test]
    fn test_step_loop_delay_then_next_cycle() {
        let mut rng = AnimRng::with_seed(1);
        let settings = SquashStretchSettings::default().with_looping(true, 0.125);
        let mut ss = started(settings, Vec3::ONE);
        let mut scale = Vec3::ONE;

        for _ in 0..4 {
            step(&mut ss, &mut scale, Vec3::ONE, DT, &mut rng);
        }
        step(&mut ss, &mut scale, Vec3::ONE, DT, &mut rng);
        assert_eq!(ss.playback(), Playback::LoopDelay { remaining: 0.125 });
        assert!(vec_approx_eq(scale, Vec3::ONE));

        step(&mut ss, &mut scale, Vec3::ONE, DT, &mut rng);
        assert_eq!(ss.playback(), Playback::LoopDelay { remaining: 0.0625 });

        // Delay expires and the next cycle plays its first frame
        step(&mut ss, &mut scale, Vec3::ONE, DT, &mut rng);
        assert_eq!(ss.playback(), Playback::Playing { elapsed: DT });
        assert!(approx_eq(scale.y, 1.3));
    }

    #[test]
    fn test_step_looping_turned_off_during_delay_ends_run() {
        let mut rng = AnimRng::with_seed(1);
        let settings = SquashStretchSettings::default().with_looping(true, 0.125);
        let mut ss = started(settings, Vec3::ONE);
        let mut scale = Vec3::ONE;

        for _ in 0..5 {
            step(&mut ss, &mut scale, Vec3::ONE, DT, &mut rng);
        }
        ss.set_looping(false);
        assert!(!step(&mut ss, &mut scale, Vec3::ONE, DT, &mut rng));
        assert!(step(&mut ss, &mut scale, Vec3::ONE, DT, &mut rng));
        assert!(!ss.is_active());
    }
}
