//! Random source for animation decisions.
//!
//! Wraps a [`fastrand::Rng`] so that runs can be reproduced by seeding the
//! resource. Used for the per-cycle play chance of
//! [`SquashStretch`](crate::components::squashstretch::SquashStretch).

use bevy_ecs::prelude::Resource;
use fastrand::Rng;

#[derive(Resource, Debug)]
pub struct AnimRng(pub Rng);

impl Default for AnimRng {
    fn default() -> Self {
        AnimRng(Rng::new())
    }
}

impl AnimRng {
    pub fn with_seed(seed: u64) -> Self {
        AnimRng(Rng::with_seed(seed))
    }

    /// Uniform value in `[0, 100)`.
    pub fn roll_percent(&mut self) -> f32 {
        self.0.f32() * 100.0
    }
}
