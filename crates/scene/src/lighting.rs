use glam::Vec3;
use testbed_common::Light;

/// All lights the scene knows about, in eye space. Which of them are bound
/// each frame is decided by `SceneState::select_lights`.
#[derive(Debug, Clone, PartialEq)]
pub struct LightRig {
    lights: Vec<Light>,
}

impl Default for LightRig {
    /// White head light in front of the camera, then red, green and blue
    /// spot lights arranged in a triangle around the view axis.
    fn default() -> Self {
        const SPOT_OFFSET: f32 = 0.35;
        let mut rig = Self::empty();
        rig.push(Light::point(Vec3::new(0.0, 0.0, -1.7), Vec3::ONE));
        rig.push(Light::spot(
            Vec3::new(0.0, SPOT_OFFSET, -1.0),
            Vec3::new(1.0, 0.2, 0.2),
            128.0,
            15.0,
        ));
        rig.push(Light::spot(
            Vec3::new(-SPOT_OFFSET, -SPOT_OFFSET, -1.0),
            Vec3::new(0.2, 1.0, 0.2),
            90.0,
            25.0,
        ));
        rig.push(Light::spot(
            Vec3::new(SPOT_OFFSET, -SPOT_OFFSET, -1.0),
            Vec3::new(0.2, 0.02, 1.0),
            35.0,
            35.0,
        ));
        rig
    }
}

impl LightRig {
    pub fn empty() -> Self {
        Self { lights: Vec::new() }
    }

    pub fn push(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }
}
