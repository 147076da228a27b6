use testbed_common::FogType;
use testbed_frame::FrameDriver;

/// Frame inspector for developer tooling.
///
/// Read-only queries against a [`FrameDriver`] for the desktop HUD and the
/// CLI.
pub struct FrameInspector;

impl FrameInspector {
    /// Produce a summary of the driver's current state.
    pub fn summary(driver: &FrameDriver) -> FrameSummary {
        let scene = driver.scene();
        FrameSummary {
            frame: driver.frame_count(),
            scene_index: scene.active_scene(),
            scene_count: scene.scene_count(),
            scene_name: driver
                .active_scene()
                .map(|s| s.name.clone())
                .unwrap_or_default(),
            texture_mapping: scene.texture_mapping(),
            complex_lighting: scene.complex_lighting(),
            rotation: scene.rotation(),
            orthographic: scene.orthographic(),
            fog: scene.fog(),
            fog_type: scene.fog_type(),
            particle_resets: driver.particles().reset_count(),
        }
    }

    /// State of one particle in the pool.
    pub fn inspect_particle(driver: &FrameDriver, index: usize) -> Option<ParticleInfo> {
        let fade_rate = driver.particles().config().fade_rate;
        driver.particles().raw().get(index).map(|p| ParticleInfo {
            index,
            position: p.position.to_array(),
            velocity: p.velocity.to_array(),
            age: p.age,
            alpha: p.alpha(fade_rate),
        })
    }

    /// Key bindings as `key: action` lines, in key order.
    pub fn list_bindings(driver: &FrameDriver) -> Vec<String> {
        driver
            .bindings()
            .iter()
            .map(|(key, action)| format!("{key:?}: {}", action.describe()))
            .collect()
    }
}

/// Summary of driver state for the inspector.
#[derive(Debug, Clone)]
pub struct FrameSummary {
    pub frame: u64,
    pub scene_index: usize,
    pub scene_count: usize,
    pub scene_name: String,
    pub texture_mapping: bool,
    pub complex_lighting: bool,
    pub rotation: bool,
    pub orthographic: bool,
    pub fog: bool,
    pub fog_type: FogType,
    pub particle_resets: u64,
}

impl std::fmt::Display for FrameSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let on = |b: bool| if b { "on" } else { "off" };
        write!(
            f,
            "Frame {}: scene {}/{} ({}) texture={} lighting={} rotation={} projection={} fog={}",
            self.frame,
            self.scene_index + 1,
            self.scene_count,
            self.scene_name,
            on(self.texture_mapping),
            if self.complex_lighting { "complex" } else { "simple" },
            on(self.rotation),
            if self.orthographic { "ortho" } else { "perspective" },
            if self.fog { self.fog_type.label() } else { "off" },
        )
    }
}

/// Detailed info about a single particle.
#[derive(Debug, Clone)]
pub struct ParticleInfo {
    pub index: usize,
    pub position: [f32; 3],
    pub velocity: [f32; 3],
    pub age: f32,
    pub alpha: f32,
}

impl std::fmt::Display for ParticleInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Particle [{}] pos=({:.2}, {:.2}, {:.2}) vel=({:.2}, {:.2}, {:.2}) age={:.2} alpha={:.2}",
            self.index,
            self.position[0],
            self.position[1],
            self.position[2],
            self.velocity[0],
            self.velocity[1],
            self.velocity[2],
            self.age,
            self.alpha,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testbed_assets::BuiltinAssets;
    use testbed_frame::{SilentAudio, TestbedConfig};
    use testbed_input::{Key, KeyBindings};

    fn driver() -> FrameDriver {
        let config = TestbedConfig {
            seed: Some(3),
            ..TestbedConfig::default()
        };
        FrameDriver::new(
            &config,
            &mut BuiltinAssets::with_texture_size(4),
            KeyBindings::default(),
            Box::new(SilentAudio),
        )
        .unwrap()
    }

    #[test]
    fn summary_fresh_driver() {
        let summary = FrameInspector::summary(&driver());
        assert_eq!(summary.frame, 0);
        assert_eq!(summary.scene_index, 0);
        assert_eq!(summary.scene_count, 7);
        assert_eq!(summary.scene_name, "banner");
        assert!(summary.texture_mapping && summary.rotation);
        assert!(!summary.fog && !summary.orthographic);
    }

    #[test]
    fn summary_tracks_input_and_ticks() {
        let mut d = driver();
        d.handle_key(Key::F, true);
        d.handle_key(Key::F2, true);
        d.handle_key(Key::Left, true);
        d.tick(1.0 / 60.0);

        let summary = FrameInspector::summary(&d);
        assert_eq!(summary.frame, 1);
        assert_eq!(summary.scene_index, 6);
        assert_eq!(summary.fog_type, FogType::Exponential);
        let s = format!("{summary}");
        assert!(s.contains("scene 7/7 (fountain)"));
        assert!(s.contains("fog=exp"));
    }

    #[test]
    fn inspect_particle_in_range() {
        let d = driver();
        let info = FrameInspector::inspect_particle(&d, 0).unwrap();
        assert!(info.age >= 0.0);
        assert!(info.position[1] >= -2.0);
        assert!(format!("{info}").starts_with("Particle [0]"));
        assert!(FrameInspector::inspect_particle(&d, 30).is_none());
    }

    #[test]
    fn bindings_listed() {
        let lines = FrameInspector::list_bindings(&driver());
        assert_eq!(lines.len(), 11);
        assert!(lines.iter().any(|l| l.starts_with("Escape:")));
    }
}
