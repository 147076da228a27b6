//! Particle fountain: a fixed pool of particles simulated under constant,
//! softened gravity, each respawning at the emitter when it falls below the
//! ground threshold.
//!
//! # Invariants
//! - Pool size never changes after construction.
//! - After every `step`, each particle has `age >= 0` and sits at or above
//!   the ground threshold.
//! - Given the same seed and the same sequence of `step` calls, the pool
//!   evolves identically.

mod particle;
mod system;

pub use particle::{Particle, ParticleSnapshot};
pub use system::{ConfigError, MAX_WARMUP_STEPS, ParticleConfig, ParticleSystem};
