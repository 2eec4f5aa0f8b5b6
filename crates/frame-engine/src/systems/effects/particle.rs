//! A single textured particle.

use glam::Vec2;

use crate::extensions::easing::Easing;

/// One short-lived point of a particle system.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    /// Degrees.
    pub rotation: f32,
    /// Seconds since spawn.
    pub age: f32,
    /// Seconds this particle lives.
    pub lifetime: f32,
    pub initial_velocity: Vec2,
    /// Velocity used for the most recent integration step.
    pub velocity: Vec2,
}

impl Particle {
    pub fn new(position: Vec2, initial_velocity: Vec2, lifetime: f32) -> Self {
        Particle {
            position,
            rotation: 0.0,
            age: 0.0,
            lifetime,
            initial_velocity,
            velocity: initial_velocity,
        }
    }

    /// Age normalised to [0, 1].
    pub fn progress(&self) -> f32 {
        if self.lifetime <= 0.0 {
            1.0
        } else {
            (self.age / self.lifetime).clamp(0.0, 1.0)
        }
    }

    /// Advance by `dt` seconds. Velocity is the initial velocity scaled by the
    /// bounded `decay` curve, so speed falls to zero as age reaches lifetime.
    pub fn advance(&mut self, dt: f32, decay: Easing, angular_velocity: f32) {
        self.age += dt;
        self.velocity = self.initial_velocity * decay.remaining(self.progress());
        self.position += self.velocity * dt;
        self.rotation += angular_velocity * dt;
    }

    pub fn is_expired(&self) -> bool {
        self.age >= self.lifetime
    }

    /// Decay-frame index for a sequence whose last valid index is `max_index`.
    pub fn frame_index(&self, max_index: usize) -> usize {
        ((self.progress() * max_index as f32).floor() as usize).min(max_index)
    }
}
