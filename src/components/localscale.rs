use bevy_ecs::prelude::Component;
use glam::Vec3;

/// Local scale of an entity's transform.
#[derive(Component, Clone, Debug, Copy, PartialEq)]
pub struct LocalScale {
    pub scale: Vec3,
}
impl LocalScale {
    pub fn new(sx: f32, sy: f32, sz: f32) -> Self {
        Self {
            scale: Vec3::new(sx, sy, sz),
        }
    }
    pub fn uniform(s: f32) -> Self {
        Self {
            scale: Vec3::splat(s),
        }
    }
}
impl Default for LocalScale {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}
