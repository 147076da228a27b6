use glam::{Mat4, Vec3};
use rand::Rng;

use crate::system::ParticleConfig;

/// A single point-like particle, positioned relative to the emitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Seconds since the last reset.
    pub age: f32,
}

impl Particle {
    /// Create a particle in its spawn state.
    pub fn spawn<R: Rng>(config: &ParticleConfig, rng: &mut R) -> Self {
        let mut p = Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            age: 0.0,
        };
        p.reset(config, rng);
        p
    }

    /// Return to the emitter with a fresh launch velocity.
    pub fn reset<R: Rng>(&mut self, config: &ParticleConfig, rng: &mut R) {
        let spread = config.spread.abs();
        self.age = 0.0;
        self.position = Vec3::ZERO;
        self.velocity = Vec3::new(
            rng.random_range(-spread..=spread),
            config.launch_speed,
            rng.random_range(-spread..=spread),
        );
    }

    /// Advance by `dt` seconds. Returns true if the particle hit the ground
    /// and was reset during this step.
    pub fn simulate<R: Rng>(
        &mut self,
        dt: f32,
        config: &ParticleConfig,
        rng: &mut R,
    ) -> bool {
        self.velocity += config.gravity * config.gravity_scale * dt;
        self.position += self.velocity * dt;
        self.age += dt;

        if self.position.y < config.ground_y {
            self.reset(config, rng);
            true
        } else {
            false
        }
    }

    /// Fade-in opacity: `clamp(age * fade_rate, 0, 1)`.
    pub fn alpha(&self, fade_rate: f32) -> f32 {
        (self.age * fade_rate).clamp(0.0, 1.0)
    }
}

/// Read-only view of a particle handed to renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSnapshot {
    pub position: Vec3,
    pub age: f32,
    pub alpha: f32,
}

impl ParticleSnapshot {
    /// Model matrix placing a uniformly scaled particle mesh at the
    /// particle's position, relative to `emitter`.
    pub fn transform(&self, emitter: Mat4, scale: f32) -> Mat4 {
        emitter * Mat4::from_translation(self.position) * Mat4::from_scale(Vec3::splat(scale))
    }
}
