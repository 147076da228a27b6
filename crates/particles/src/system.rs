use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::particle::{Particle, ParticleSnapshot};

/// Upper bound on `warmup_steps`. Warm-up runs synchronously at startup.
pub const MAX_WARMUP_STEPS: u32 = 10_000;

/// A particle config that cannot drive a simulation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("particle config field `{0}` must be finite")]
    NotFinite(&'static str),
    #[error("particle spread must be non-negative, got {0}")]
    NegativeSpread(f32),
    #[error("warm-up of {0} steps exceeds the limit of {MAX_WARMUP_STEPS}")]
    WarmupTooLong(u32),
}

/// Tunables for the fountain. Defaults reproduce the reference scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub pool_size: usize,
    /// Raw gravitational acceleration, scaled by `gravity_scale`.
    pub gravity: Vec3,
    pub gravity_scale: f32,
    /// Particles below this height respawn at the emitter.
    pub ground_y: f32,
    /// Upward launch speed on (re)spawn.
    pub launch_speed: f32,
    /// Horizontal launch velocity is uniform in `[-spread, spread]` on X and Z.
    pub spread: f32,
    /// Warm-up step count is uniform in `0..warmup_steps`.
    pub warmup_steps: u32,
    pub warmup_dt: f32,
    /// Alpha reaches 1 after `1 / fade_rate` seconds.
    pub fade_rate: f32,
    /// Uniform scale applied to the particle mesh when drawing.
    pub particle_scale: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            pool_size: 30,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            gravity_scale: 0.1,
            ground_y: -2.0,
            launch_speed: 1.3,
            spread: 0.3,
            warmup_steps: 300,
            warmup_dt: 1.0 / 60.0,
            fade_rate: 2.0,
            particle_scale: 0.04,
        }
    }
}

impl ParticleConfig {
    /// Check that every tunable is usable. [`ParticleSystem::new`] assumes
    /// a config that passes this check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scalars = [
            ("spread", self.spread),
            ("launch_speed", self.launch_speed),
            ("gravity_scale", self.gravity_scale),
            ("ground_y", self.ground_y),
            ("warmup_dt", self.warmup_dt),
            ("fade_rate", self.fade_rate),
            ("particle_scale", self.particle_scale),
        ];
        if let Some((field, _)) = scalars.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NotFinite(*field));
        }
        if !self.gravity.is_finite() {
            return Err(ConfigError::NotFinite("gravity"));
        }
        if self.spread < 0.0 {
            return Err(ConfigError::NegativeSpread(self.spread));
        }
        if self.warmup_steps > MAX_WARMUP_STEPS {
            return Err(ConfigError::WarmupTooLong(self.warmup_steps));
        }
        Ok(())
    }
}

/// A fixed-size pool of independently simulated particles.
///
/// Owns its RNG so that a seeded system is fully reproducible.
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    config: ParticleConfig,
    particles: Vec<Particle>,
    rng: StdRng,
    reset_count: u64,
}

impl ParticleSystem {
    /// Allocate `config.pool_size` particles, each warmed up by a random
    /// number of fixed steps so the pool starts out of phase.
    pub fn new(config: ParticleConfig, mut rng: StdRng) -> Self {
        let mut particles = Vec::with_capacity(config.pool_size);
        for _ in 0..config.pool_size {
            let mut p = Particle::spawn(&config, &mut rng);
            let warmup = if config.warmup_steps == 0 {
                0
            } else {
                rng.random_range(0..config.warmup_steps)
            };
            for _ in 0..warmup {
                p.simulate(config.warmup_dt, &config, &mut rng);
            }
            particles.push(p);
        }

        tracing::debug!(
            pool_size = config.pool_size,
            "particle pool initialized"
        );

        Self {
            config,
            particles,
            rng,
            reset_count: 0,
        }
    }

    /// Deterministic pool for replay and tests.
    pub fn seeded(config: ParticleConfig, seed: u64) -> Self {
        Self::new(config, StdRng::seed_from_u64(seed))
    }

    /// Pool seeded from the operating system.
    pub fn from_entropy(config: ParticleConfig) -> Self {
        Self::new(config, StdRng::from_os_rng())
    }

    /// Advance every particle by `dt` seconds. Returns how many particles
    /// hit the ground and respawned during this call.
    pub fn step(&mut self, dt: f32) -> usize {
        let _span = tracing::trace_span!("particle_step").entered();
        let mut resets = 0;
        for p in &mut self.particles {
            if p.simulate(dt, &self.config, &mut self.rng) {
                resets += 1;
            }
        }
        self.reset_count += resets as u64;
        if resets > 0 {
            tracing::trace!(resets, "particles respawned");
        }
        resets
    }

    /// Current particle states for drawing, derived from live state.
    pub fn particles(&self) -> impl ExactSizeIterator<Item = ParticleSnapshot> + '_ {
        let fade_rate = self.config.fade_rate;
        self.particles.iter().map(move |p| ParticleSnapshot {
            position: p.position,
            age: p.age,
            alpha: p.alpha(fade_rate),
        })
    }

    /// Raw particle state.
    pub fn raw(&self) -> &[Particle] {
        &self.particles
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Respawns performed by `step` since construction (warm-up excluded).
    pub fn reset_count(&self) -> u64 {
        self.reset_count
    }
}
