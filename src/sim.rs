//! Headless world setup and frame stepping.
//!
//! [`Simulation`] owns an ECS [`World`] with the resources and observers the
//! squash and stretch systems need, and the per-frame update [`Schedule`].
//! The binary drives it at a fixed step; tests use it to run whole scenarios.
//!
//! # Frame
//!
//! 1. [`update_world_time`] advances [`WorldTime`] with the frame delta
//! 2. the schedule runs `squash_stretch_init_system` then `squash_stretch_system`
//! 3. change trackers are cleared for the next frame

use bevy_ecs::prelude::*;
use glam::Vec3;

use crate::components::localscale::LocalScale;
use crate::components::squashstretch::{SquashStretch, SquashStretchSettings};
use crate::events::squashstretch::{PlaySquashStretchEvent, SetSquashStretchLoopingEvent};
use crate::resources::animrng::AnimRng;
use crate::resources::worldtime::WorldTime;
use crate::systems::squashstretch::{
    play_squash_stretch_observer, set_looping_observer, squash_stretch_init_system,
    squash_stretch_system,
};
use crate::systems::time::update_world_time;

pub struct Simulation {
    world: World,
    update: Schedule,
}

impl Simulation {
    /// Build a world with a seeded [`AnimRng`] and the animator observers.
    pub fn new(seed: u64) -> Self {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        world.insert_resource(AnimRng::with_seed(seed));
        world.add_observer(play_squash_stretch_observer);
        world.add_observer(set_looping_observer);
        // Ensure the observers are registered before anything triggers events.
        world.flush();

        let mut update = Schedule::default();
        update.add_systems((squash_stretch_init_system, squash_stretch_system).chain());

        Simulation { world, update }
    }

    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.world.resource_mut::<WorldTime>().time_scale = time_scale;
        self
    }

    /// Spawn an entity holding both the animator and the scale it drives.
    pub fn spawn_animator(&mut self, settings: SquashStretchSettings, baseline: Vec3) -> Entity {
        self.world
            .spawn((LocalScale { scale: baseline }, SquashStretch::new(settings)))
            .id()
    }

    /// Spawn an animator that drives the scale of a separate `target` entity.
    pub fn spawn_animator_for(&mut self, settings: SquashStretchSettings, target: Entity) -> Entity {
        self.world
            .spawn(SquashStretch::new(settings).with_target(target))
            .id()
    }

    /// Spawn a plain entity with a scale, e.g. a visual driven by another animator.
    pub fn spawn_scaled(&mut self, baseline: Vec3) -> Entity {
        self.world.spawn(LocalScale { scale: baseline }).id()
    }

    pub fn play(&mut self, entity: Entity) {
        self.world.trigger(PlaySquashStretchEvent { entity });
    }

    pub fn set_looping(&mut self, entity: Entity, looping: bool) {
        self.world.trigger(SetSquashStretchLoopingEvent { entity, looping });
    }

    /// Advance one frame of `dt` unscaled seconds.
    pub fn tick(&mut self, dt: f32) {
        update_world_time(&mut self.world, dt);
        self.update.run(&mut self.world);
        self.world.clear_trackers();
    }

    pub fn scale_of(&self, entity: Entity) -> Option<Vec3> {
        self.world.get::<LocalScale>(entity).map(|s| s.scale)
    }

    pub fn animator(&self, entity: Entity) -> Option<&SquashStretch> {
        self.world.get::<SquashStretch>(entity)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
