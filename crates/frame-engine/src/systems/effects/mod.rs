//! Particle systems: textured bursts and emitters drawn with additive blending.
//!
//! A `ParticleSystem` owns its particles. Each frame the owning scene calls
//! `update_and_draw`, then drops the system once `in_progress()` is false.

mod particle;
mod rng;

pub use particle::Particle;
pub use rng::Rng;

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::assets::registry::TextureMap;
use crate::extensions::easing::Easing;
use crate::renderer::buffer::{BlendMode, RenderBuffer};

/// Shape of the emission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ParticleKind {
    /// One burst in every direction. Finishes when the last particle expires.
    Explosion,
    /// Continuous emission inside a cone around `direction` (radians, canvas
    /// coordinates so `-PI/2` is up). `spread` is the cone's half angle.
    Fire { direction: f32, spread: f32 },
}

impl ParticleKind {
    /// Rising flame with a quarter-turn cone.
    pub fn fire_upward() -> Self {
        ParticleKind::Fire { direction: -FRAC_PI_2, spread: FRAC_PI_4 }
    }

    fn is_continuous(&self) -> bool {
        matches!(self, ParticleKind::Fire { .. })
    }

    fn sample_direction(&self, rng: &mut Rng) -> Vec2 {
        let angle = match *self {
            ParticleKind::Explosion => rng.next_f32() * TAU,
            ParticleKind::Fire { direction, spread } => direction + rng.range(-spread, spread),
        };
        Vec2::new(angle.cos(), angle.sin())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParticleConfig {
    /// Each particle's lifetime is drawn uniformly from `[min, max)` seconds.
    pub lifetime: (f32, f32),
    /// Burst size, or the population a continuous emitter maintains.
    pub spawn_count: usize,
    /// px/s
    pub initial_speed: f32,
    /// Share of the speed every particle gets; the rest is randomised.
    pub fixed_velocity_fraction: f32,
    /// deg/s
    pub angular_velocity: f32,
    /// Speed multiplier over normalised age.
    pub decay: Easing,
}

impl ParticleConfig {
    pub fn explosion() -> Self {
        Self {
            lifetime: (0.5, 1.0),
            spawn_count: 30,
            initial_speed: 10.0,
            fixed_velocity_fraction: 0.5,
            angular_velocity: 0.0,
            decay: Easing::QuadOut,
        }
    }

    pub fn fire() -> Self {
        Self {
            lifetime: (0.5, 3.0),
            spawn_count: 100,
            decay: Easing::SineInOut,
            ..Self::explosion()
        }
    }
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self::explosion()
    }
}

/// A group of particles sharing one texture and one origin.
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    kind: ParticleKind,
    config: ParticleConfig,
    origin: Vec2,
    texture: String,
    particles: Vec<Particle>,
    emitting: bool,
}

impl ParticleSystem {
    /// Build a system and spawn its first `spawn_count` particles.
    pub fn new(
        kind: ParticleKind,
        origin: Vec2,
        texture: impl Into<String>,
        config: ParticleConfig,
        rng: &mut Rng,
    ) -> Self {
        let mut system = Self {
            kind,
            origin,
            texture: texture.into(),
            particles: Vec::with_capacity(config.spawn_count),
            emitting: kind.is_continuous(),
            config,
        };
        for _ in 0..system.config.spawn_count {
            let p = system.spawn(rng);
            system.particles.push(p);
        }
        system
    }

    pub fn explosion(origin: Vec2, texture: impl Into<String>, rng: &mut Rng) -> Self {
        Self::new(ParticleKind::Explosion, origin, texture, ParticleConfig::explosion(), rng)
    }

    pub fn fire(origin: Vec2, texture: impl Into<String>, rng: &mut Rng) -> Self {
        Self::new(ParticleKind::fire_upward(), origin, texture, ParticleConfig::fire(), rng)
    }

    fn spawn(&self, rng: &mut Rng) -> Particle {
        let cfg = &self.config;
        let lifetime = rng.range(cfg.lifetime.0, cfg.lifetime.1);
        let fixed = cfg.fixed_velocity_fraction.clamp(0.0, 1.0);
        let speed = cfg.initial_speed * (fixed + (1.0 - fixed) * rng.next_f32());
        let velocity = self.kind.sample_direction(rng) * speed;
        Particle::new(self.origin, velocity, lifetime)
    }

    /// Advance every particle by `delta` seconds and record its draw.
    ///
    /// Particles are drawn at their decay frame for the current age, then
    /// expired ones are discarded. A continuous emitter tops its population
    /// back up to `spawn_count` while it is still emitting. A texture that is
    /// not loaded is not drawn, but the particles still age.
    pub fn update_and_draw(
        &mut self,
        canvas: &mut RenderBuffer,
        textures: &TextureMap,
        rng: &mut Rng,
        delta: f32,
    ) {
        let decay = self.config.decay;
        let angular = self.config.angular_velocity;
        for p in &mut self.particles {
            p.advance(delta, decay, angular);
        }

        if let Some(texture) = textures.get(&self.texture) {
            let max_index = texture.decay_frames.len().saturating_sub(1);
            canvas.save();
            canvas.set_blend(BlendMode::Lighter);
            for p in &self.particles {
                canvas.draw_decay_texture(texture, p.frame_index(max_index), p.position, p.rotation);
            }
            canvas.restore();
        }

        self.particles.retain(|p| !p.is_expired());

        if self.emitting {
            let missing = self.config.spawn_count.saturating_sub(self.particles.len());
            for _ in 0..missing {
                let p = self.spawn(rng);
                self.particles.push(p);
            }
        }
    }

    /// False once every particle has expired and nothing more will spawn.
    pub fn in_progress(&self) -> bool {
        !self.particles.is_empty()
    }

    /// Stop replenishing. Live particles finish their lifetimes.
    pub fn stop_emission(&mut self) {
        self.emitting = false;
    }

    pub fn is_emitting(&self) -> bool {
        self.emitting
    }

    /// Move the emission point. Live particles keep their positions.
    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn kind(&self) -> ParticleKind {
        self.kind
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    pub fn texture(&self) -> &str {
        &self.texture
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }
}
