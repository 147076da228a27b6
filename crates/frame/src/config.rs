use std::path::Path;

use serde::{Deserialize, Serialize};
use testbed_particles::ParticleConfig;

use crate::driver::FrameError;

/// Startup configuration. Every field is optional in the JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestbedConfig {
    pub width: u32,
    pub height: u32,
    /// Particle RNG seed. `None` seeds from the OS.
    pub seed: Option<u64>,
    pub particles: ParticleConfig,
}

impl Default for TestbedConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 768,
            seed: None,
            particles: ParticleConfig::default(),
        }
    }
}

impl TestbedConfig {
    /// Load a config from a JSON file.
    pub fn load(path: &Path) -> Result<Self, FrameError> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Reject values the particle pool cannot start from.
    pub fn validate(&self) -> Result<(), FrameError> {
        self.particles
            .validate()
            .map_err(|e| FrameError::InvalidConfig(e.to_string()))
    }

    /// Viewport aspect ratio, guarding against a zero width or height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }
}
