use glam::{Mat4, Vec3, Vec4};
use testbed_common::{FogParams, FogType, Light, MAX_LIGHTS};
use testbed_input::Action;

use crate::catalog::{SceneDesc, SceneTexture};
use crate::lighting::LightRig;

/// Rotation angle added per frame while rotation is enabled.
const ROTATION_STEP: f32 = 0.5;
/// Fog animation phase added per frame, in degrees.
const FOG_PHASE_STEP: f32 = 1.0;
/// Camera position; the camera looks at the origin down -Z.
const CAMERA_EYE: Vec3 = Vec3::new(0.0, 0.0, 2.5);

const PERSPECTIVE_FOV_DEGREES: f32 = 45.0;
const PERSPECTIVE_NEAR: f32 = 0.1;
const PERSPECTIVE_FAR: f32 = 100.0;
const ORTHO_NEAR: f32 = -4.0;
const ORTHO_FAR: f32 = 4.0;

/// Errors from constructing scene state.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("scene catalog is empty")]
    EmptyCatalog,
}

/// Whether the frame loop should keep running after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

/// Projection for the given mode and viewport aspect ratio.
///
/// Orthographic spans `[-aspect, aspect] x [-1, 1]` with near/far `[-4, 4]`;
/// perspective uses a 45 degree vertical field of view, near 0.1, far 100.
/// Right-handed with a 0..1 depth range, so `w_axis.w` is 1 for orthographic
/// and 0 for perspective.
pub fn compute_projection(orthographic: bool, aspect_ratio: f32) -> Mat4 {
    if orthographic {
        Mat4::orthographic_rh(
            -aspect_ratio,
            aspect_ratio,
            -1.0,
            1.0,
            ORTHO_NEAR,
            ORTHO_FAR,
        )
    } else {
        Mat4::perspective_rh(
            PERSPECTIVE_FOV_DEGREES.to_radians(),
            aspect_ratio,
            PERSPECTIVE_NEAR,
            PERSPECTIVE_FAR,
        )
    }
}

/// World rotation for an accumulated rotation angle: a wobble about Y of
/// `sin(angle * 1.5 deg) * 75 deg`.
pub fn world_rotation(rotation_angle: f32) -> Mat4 {
    let degrees = (rotation_angle * 1.5).to_radians().sin() * 75.0;
    Mat4::from_rotation_y(degrees.to_radians())
}

/// Selected scene, feature flags and cached transforms.
#[derive(Debug, Clone)]
pub struct SceneState {
    scene_count: usize,
    active_scene: usize,
    texture_mapping: bool,
    complex_lighting: bool,
    rotation: bool,
    orthographic: bool,
    fog: bool,
    fog_type: FogType,
    rotation_angle: f32,
    fog_phase: f32,
    aspect_ratio: f32,
    projection: Mat4,
    world: Mat4,
}

impl SceneState {
    /// State for `scene_count` scenes with startup defaults: scene 0, texture
    /// mapping and rotation on, everything else off, linear fog.
    pub fn new(scene_count: usize, aspect_ratio: f32) -> Result<Self, SceneError> {
        if scene_count == 0 {
            return Err(SceneError::EmptyCatalog);
        }
        Ok(Self {
            scene_count,
            active_scene: 0,
            texture_mapping: true,
            complex_lighting: false,
            rotation: true,
            orthographic: false,
            fog: false,
            fog_type: FogType::Linear,
            rotation_angle: 0.0,
            fog_phase: 0.0,
            aspect_ratio,
            projection: compute_projection(false, aspect_ratio),
            world: Mat4::IDENTITY,
        })
    }

    pub fn scene_count(&self) -> usize {
        self.scene_count
    }

    pub fn active_scene(&self) -> usize {
        self.active_scene
    }

    pub fn texture_mapping(&self) -> bool {
        self.texture_mapping
    }

    pub fn complex_lighting(&self) -> bool {
        self.complex_lighting
    }

    pub fn rotation(&self) -> bool {
        self.rotation
    }

    pub fn orthographic(&self) -> bool {
        self.orthographic
    }

    pub fn fog(&self) -> bool {
        self.fog
    }

    pub fn fog_type(&self) -> FogType {
        self.fog_type
    }

    pub fn rotation_angle(&self) -> f32 {
        self.rotation_angle
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// World matrix computed by the last `advance_frame`.
    pub fn world(&self) -> Mat4 {
        self.world
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(-CAMERA_EYE)
    }

    pub fn cycle_scene_forward(&mut self) {
        self.active_scene = (self.active_scene + 1) % self.scene_count;
        tracing::debug!(scene = self.active_scene, "next scene");
    }

    pub fn cycle_scene_backward(&mut self) {
        self.active_scene = if self.active_scene == 0 {
            self.scene_count - 1
        } else {
            self.active_scene - 1
        };
        tracing::debug!(scene = self.active_scene, "previous scene");
    }

    pub fn toggle_fog(&mut self) {
        self.fog = !self.fog;
        tracing::debug!(enabled = self.fog, "fog");
    }

    pub fn toggle_complex_lighting(&mut self) {
        self.complex_lighting = !self.complex_lighting;
        tracing::debug!(enabled = self.complex_lighting, "complex lighting");
    }

    pub fn toggle_rotation(&mut self) {
        self.rotation = !self.rotation;
        tracing::debug!(enabled = self.rotation, "rotation");
    }

    pub fn toggle_texture_mapping(&mut self) {
        self.texture_mapping = !self.texture_mapping;
        tracing::debug!(enabled = self.texture_mapping, "texture mapping");
    }

    pub fn set_fog_type(&mut self, fog_type: FogType) {
        self.fog_type = fog_type;
        tracing::debug!(fog_type = fog_type.label(), "fog type");
    }

    /// Flip between perspective and orthographic and recompute the projection.
    pub fn toggle_projection(&mut self) {
        self.orthographic = !self.orthographic;
        self.projection = compute_projection(self.orthographic, self.aspect_ratio);
        tracing::debug!(orthographic = self.orthographic, "projection");
    }

    /// Viewport changed shape; recompute the projection.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
        self.projection = compute_projection(self.orthographic, aspect_ratio);
    }

    /// Apply an input action.
    pub fn apply(&mut self, action: Action) -> Control {
        match action {
            Action::Exit => return Control::Exit,
            Action::NextScene => self.cycle_scene_forward(),
            Action::PrevScene => self.cycle_scene_backward(),
            Action::ToggleFog => self.toggle_fog(),
            Action::SetFogType(t) => self.set_fog_type(t),
            Action::ToggleComplexLighting => self.toggle_complex_lighting(),
            Action::ToggleRotation => self.toggle_rotation(),
            Action::ToggleProjection => self.toggle_projection(),
            Action::ToggleTextureMapping => self.toggle_texture_mapping(),
        }
        Control::Continue
    }

    /// Per-frame update: advance the rotation (when enabled) and the fog
    /// animation, then recompute the world matrix.
    pub fn advance_frame(&mut self) -> Mat4 {
        if self.rotation {
            self.rotation_angle += ROTATION_STEP;
        }
        self.fog_phase += FOG_PHASE_STEP;
        self.world = world_rotation(self.rotation_angle);
        self.world
    }

    /// Fog for the current frame. End distance and density oscillate with
    /// the fog phase.
    pub fn fog_params(&self) -> FogParams {
        FogParams {
            enabled: self.fog,
            fog_type: self.fog_type,
            start: 1.0,
            end: (self.fog_phase.to_radians().cos() + 1.0) * 2.5 + 2.0,
            density: ((self.fog_phase * 0.5).to_radians().cos() + 1.0) * 0.5,
            color: Vec4::new(0.5, 0.5, 0.5, 1.0),
        }
    }

    /// Fill the renderer's light slots: the head light alone in simple mode,
    /// every other rig light in complex mode.
    pub fn select_lights(&self, rig: &LightRig) -> [Option<Light>; MAX_LIGHTS] {
        let mut slots = [None; MAX_LIGHTS];
        let selected = rig
            .lights()
            .iter()
            .enumerate()
            .filter(|(i, _)| {
                if self.complex_lighting {
                    *i > 0
                } else {
                    *i == 0
                }
            })
            .map(|(_, l)| *l)
            .take(MAX_LIGHTS);
        for (slot, light) in slots.iter_mut().zip(selected) {
            *slot = Some(light);
        }
        slots
    }

    /// Texture to bind for `scene`, if texture mapping is on and the scene
    /// has one.
    pub fn active_texture<'a>(&self, scene: &'a SceneDesc) -> Option<&'a SceneTexture> {
        if self.texture_mapping {
            scene.texture.as_ref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SceneCatalog;
    use glam::Vec3;

    fn state(n: usize) -> SceneState {
        SceneState::new(n, 1280.0 / 768.0).unwrap()
    }

    #[test]
    fn defaults() {
        let s = state(7);
        assert_eq!(s.active_scene(), 0);
        assert!(s.texture_mapping());
        assert!(!s.complex_lighting());
        assert!(s.rotation());
        assert!(!s.orthographic());
        assert!(!s.fog());
        assert_eq!(s.fog_type(), FogType::Linear);
        assert_eq!(s.world(), Mat4::IDENTITY);
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert!(matches!(
            SceneState::new(0, 1.0),
            Err(SceneError::EmptyCatalog)
        ));
    }

    #[test]
    fn cycling_wraps_both_ways() {
        let mut s = state(3);
        s.cycle_scene_backward();
        assert_eq!(s.active_scene(), 2);
        s.cycle_scene_forward();
        assert_eq!(s.active_scene(), 0);
    }

    #[test]
    fn cycling_forward_scene_count_times_returns_home() {
        for n in 1..10 {
            let mut s = state(n);
            s.cycle_scene_forward();
            let start = s.active_scene();
            for _ in 0..n {
                s.cycle_scene_forward();
            }
            assert_eq!(s.active_scene(), start);
            for _ in 0..n {
                s.cycle_scene_backward();
            }
            assert_eq!(s.active_scene(), start);
        }
    }

    #[test]
    fn toggles_flip_flags() {
        let mut s = state(2);
        s.toggle_fog();
        s.toggle_complex_lighting();
        s.toggle_rotation();
        s.toggle_texture_mapping();
        assert!(s.fog());
        assert!(s.complex_lighting());
        assert!(!s.rotation());
        assert!(!s.texture_mapping());
        s.set_fog_type(FogType::ExponentialSquared);
        assert_eq!(s.fog_type(), FogType::ExponentialSquared);
    }

    #[test]
    fn orthographic_unit_aspect_is_symmetric_box() {
        let p = compute_projection(true, 1.0);
        assert_eq!(p.w_axis.w, 1.0);
        let near_corner = p.project_point3(Vec3::new(1.0, 1.0, 4.0));
        let far_corner = p.project_point3(Vec3::new(-1.0, -1.0, -4.0));
        assert!((near_corner - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-6);
        assert!((far_corner - Vec3::new(-1.0, -1.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn orthographic_spans_aspect_horizontally() {
        let p = compute_projection(true, 2.0);
        let edge = p.project_point3(Vec3::new(2.0, 1.0, 0.0));
        assert!((edge.x - 1.0).abs() < 1e-6);
        assert!((edge.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn perspective_uses_45_degree_fov() {
        let p = compute_projection(false, 1.0);
        let expected = 1.0 / 22.5f32.to_radians().tan();
        assert!((p.y_axis.y - expected).abs() < 1e-5);
        assert!((p.x_axis.x - expected).abs() < 1e-5);
        assert_eq!(p.w_axis.w, 0.0);
        // near plane maps to depth 0, far plane to depth 1
        let near = p.project_point3(Vec3::new(0.0, 0.0, -0.1));
        let far = p.project_point3(Vec3::new(0.0, 0.0, -100.0));
        assert!(near.z.abs() < 1e-4);
        assert!((far.z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn toggle_projection_flips_w_entry() {
        let mut s = state(1);
        assert_eq!(s.projection().w_axis.w, 0.0);
        s.toggle_projection();
        assert!(s.orthographic());
        assert_eq!(s.projection().w_axis.w, 1.0);
        s.toggle_projection();
        assert_eq!(s.projection().w_axis.w, 0.0);
    }

    #[test]
    fn aspect_change_recomputes_projection() {
        let mut s = state(1);
        s.toggle_projection();
        s.set_aspect_ratio(2.0);
        assert_eq!(s.projection(), compute_projection(true, 2.0));
    }

    #[test]
    fn rotation_is_a_wobble() {
        let mut s = state(1);
        s.advance_frame();
        assert_eq!(s.rotation_angle(), 0.5);
        let expected = world_rotation(0.5);
        assert_eq!(s.world(), expected);

        // angle 60 -> sin(90 deg) * 75 = 75 deg, the peak of the wobble
        let peak = world_rotation(60.0);
        let x = peak.transform_vector3(Vec3::X);
        let expected_x = Vec3::new(75f32.to_radians().cos(), 0.0, -(75f32.to_radians().sin()));
        assert!((x - expected_x).length() < 1e-5);

        // angle 120 -> sin(180 deg) = 0, back to identity
        let back = world_rotation(120.0);
        assert!((back.transform_vector3(Vec3::X) - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn disabled_rotation_holds_angle() {
        let mut s = state(1);
        s.toggle_rotation();
        for _ in 0..10 {
            s.advance_frame();
        }
        assert_eq!(s.rotation_angle(), 0.0);
        assert_eq!(s.world(), Mat4::IDENTITY);
    }

    #[test]
    fn fog_animates_each_frame() {
        let mut s = state(1);
        s.toggle_fog();
        let f0 = s.fog_params();
        assert!(f0.enabled);
        assert_eq!(f0.start, 1.0);
        assert!((f0.end - 7.0).abs() < 1e-6);
        assert!((f0.density - 1.0).abs() < 1e-6);
        for _ in 0..180 {
            s.advance_frame();
        }
        let f180 = s.fog_params();
        assert!((f180.end - 2.0).abs() < 1e-4);
        assert!((f180.density - 0.5).abs() < 1e-4);
    }

    #[test]
    fn view_places_camera_at_2_5() {
        let s = state(1);
        let p = s.view().transform_point3(Vec3::ZERO);
        assert_eq!(p, Vec3::new(0.0, 0.0, -2.5));
    }

    #[test]
    fn light_selection_by_mode() {
        let rig = LightRig::default();
        let mut s = state(1);
        let simple = s.select_lights(&rig);
        assert_eq!(simple[0], Some(rig.lights()[0]));
        assert!(simple[1..].iter().all(Option::is_none));

        s.toggle_complex_lighting();
        let complex = s.select_lights(&rig);
        assert_eq!(complex[0], Some(rig.lights()[1]));
        assert_eq!(complex[2], Some(rig.lights()[3]));
        assert!(complex[3..].iter().all(Option::is_none));
    }

    #[test]
    fn light_selection_caps_at_max_lights() {
        let mut rig = LightRig::empty();
        for i in 0..12 {
            rig.push(Light::point(Vec3::new(i as f32, 0.0, 0.0), Vec3::ONE));
        }
        let mut s = state(1);
        s.toggle_complex_lighting();
        let slots = s.select_lights(&rig);
        assert!(slots.iter().all(Option::is_some));
        assert_eq!(slots[7].map(|l| l.position.x), Some(8.0));
    }

    #[test]
    fn texture_follows_flag_and_scene() {
        let catalog = SceneCatalog::default();
        let mut s = state(catalog.len());
        assert!(s.active_texture(catalog.get(0).unwrap()).is_none());
        assert!(s.active_texture(catalog.get(3).unwrap()).is_some());
        s.toggle_texture_mapping();
        assert!(s.active_texture(catalog.get(3).unwrap()).is_none());
    }

    #[test]
    fn apply_dispatches_actions() {
        let mut s = state(4);
        assert_eq!(s.apply(Action::NextScene), Control::Continue);
        assert_eq!(s.active_scene(), 1);
        s.apply(Action::PrevScene);
        s.apply(Action::PrevScene);
        assert_eq!(s.active_scene(), 3);
        s.apply(Action::SetFogType(FogType::Exponential));
        assert_eq!(s.fog_type(), FogType::Exponential);
        s.apply(Action::ToggleProjection);
        assert!(s.orthographic());
        assert_eq!(s.apply(Action::Exit), Control::Exit);
    }
}
