use std::collections::BTreeMap;

use testbed_assets::{AssetError, AssetProvider, AssetStore, MeshHandle, TextureHandle};
use testbed_input::{Key, KeyBindings};
use testbed_particles::ParticleSystem;
use testbed_render::{DrawCall, FrameSubmission, TextureBinding};
use testbed_scene::{Control, LightRig, SceneCatalog, SceneDesc, SceneError, SceneState};

use crate::audio::Audio;
use crate::config::TestbedConfig;

/// Errors from starting the testbed.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("asset error: {0}")]
    Asset(#[from] AssetError),
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Drives one frame at a time: input, scene update, particles, submission.
pub struct FrameDriver {
    scene: SceneState,
    catalog: SceneCatalog,
    rig: LightRig,
    particles: ParticleSystem,
    bindings: KeyBindings,
    audio: Box<dyn Audio>,
    store: AssetStore,
    /// Mesh handle for each catalog scene, by scene index.
    scene_meshes: Vec<MeshHandle>,
    textures: BTreeMap<String, TextureHandle>,
    frame_count: u64,
}

impl FrameDriver {
    /// Start with the default scene catalog and light rig.
    pub fn new(
        config: &TestbedConfig,
        assets: &mut dyn AssetProvider,
        bindings: KeyBindings,
        audio: Box<dyn Audio>,
    ) -> Result<Self, FrameError> {
        Self::with_catalog(
            config,
            SceneCatalog::default(),
            LightRig::default(),
            assets,
            bindings,
            audio,
        )
    }

    /// Start with an explicit catalog and light rig. Every mesh and texture
    /// the catalog names is loaded up front.
    pub fn with_catalog(
        config: &TestbedConfig,
        catalog: SceneCatalog,
        rig: LightRig,
        assets: &mut dyn AssetProvider,
        bindings: KeyBindings,
        audio: Box<dyn Audio>,
    ) -> Result<Self, FrameError> {
        config.validate()?;
        let scene = SceneState::new(catalog.len(), config.aspect_ratio())?;
        let mut store = AssetStore::new();

        let mut scene_meshes = Vec::with_capacity(catalog.len());
        for desc in catalog.scenes() {
            scene_meshes.push(load_scene_mesh(&mut store, assets, desc)?);
        }

        let mut textures = BTreeMap::new();
        for name in catalog.texture_names() {
            let texture = assets.load_texture(name)?;
            texture.validate(name)?;
            textures.insert(name.to_string(), store.register_texture(name, texture));
        }

        let particles = match config.seed {
            Some(seed) => ParticleSystem::seeded(config.particles.clone(), seed),
            None => ParticleSystem::from_entropy(config.particles.clone()),
        };

        tracing::info!(
            scenes = catalog.len(),
            meshes = store.mesh_count(),
            textures = store.texture_count(),
            particles = particles.len(),
            seed = ?config.seed,
            "frame driver ready"
        );

        Ok(Self {
            scene,
            catalog,
            rig,
            particles,
            bindings,
            audio,
            store,
            scene_meshes,
            textures,
            frame_count: 0,
        })
    }

    /// Dispatch a key event through the bindings.
    pub fn handle_key(&mut self, key: Key, pressed: bool) -> Control {
        let Some(action) = self.bindings.action_for(key, pressed) else {
            return Control::Continue;
        };
        tracing::debug!(?key, action = action.describe(), "key action");
        self.scene.apply(action)
    }

    /// Advance one frame and describe it for a renderer.
    pub fn tick(&mut self, dt: f32) -> FrameSubmission {
        let _span = tracing::info_span!("frame_tick", frame = self.frame_count).entered();

        self.audio.update();
        let world = self.scene.advance_frame();

        let index = self.scene.active_scene();
        let fountain = self
            .catalog
            .get(index)
            .is_some_and(SceneDesc::is_particle_fountain);
        if fountain {
            self.particles.step(dt);
        }

        let mut draws = Vec::new();
        if let Some(&mesh) = self.scene_meshes.get(index) {
            if fountain {
                let scale = self.particles.config().particle_scale;
                draws.extend(
                    self.particles
                        .particles()
                        .map(|p| DrawCall::blended(mesh, p.transform(world, scale), p.alpha)),
                );
            } else {
                draws.push(DrawCall::opaque(mesh, world));
            }
        }

        let fog = self.scene.fog_params();
        let submission = FrameSubmission {
            projection: self.scene.projection(),
            view: self.scene.view(),
            lights: self.scene.select_lights(&self.rig),
            texture: self.texture_binding(index),
            fog,
            clear_color: fog.color,
            draws,
        };

        self.frame_count += 1;
        submission
    }

    fn texture_binding(&self, index: usize) -> TextureBinding {
        let active = self
            .catalog
            .get(index)
            .and_then(|desc| self.scene.active_texture(desc));
        match active {
            Some(tex) => TextureBinding {
                unit: 0,
                texture: self.textures.get(&tex.name).copied(),
                texgen: tex.texgen,
            },
            None => TextureBinding::disabled(),
        }
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.scene.set_aspect_ratio(aspect_ratio);
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn catalog(&self) -> &SceneCatalog {
        &self.catalog
    }

    /// Description of the active scene.
    pub fn active_scene(&self) -> Option<&SceneDesc> {
        self.catalog.get(self.scene.active_scene())
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn store(&self) -> &AssetStore {
        &self.store
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

fn load_scene_mesh(
    store: &mut AssetStore,
    assets: &mut dyn AssetProvider,
    desc: &SceneDesc,
) -> Result<MeshHandle, FrameError> {
    let name = desc.mesh_name();
    let scale = desc.mesh_scale();
    let mesh = assets.load_mesh(name)?;
    mesh.validate(name)?;
    let key = if scale == 1.0 {
        name.to_string()
    } else {
        format!("{name}@{scale}")
    };
    Ok(store.register_mesh(&key, mesh.scaled(scale)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use glam::{Vec2, Vec3};
    use testbed_assets::{BuiltinAssets, Mesh, Texture};
    use testbed_common::{FogType, TexGen};
    use testbed_render::BlendMode;

    const DT: f32 = 1.0 / 60.0;

    fn config() -> TestbedConfig {
        TestbedConfig {
            seed: Some(42),
            ..TestbedConfig::default()
        }
    }

    fn driver() -> FrameDriver {
        let mut assets = BuiltinAssets::with_texture_size(8);
        FrameDriver::new(
            &config(),
            &mut assets,
            KeyBindings::default(),
            Box::new(crate::SilentAudio),
        )
        .unwrap()
    }

    fn press(d: &mut FrameDriver, key: Key) -> Control {
        d.handle_key(key, true)
    }

    #[test]
    fn startup_loads_every_catalog_asset() {
        let d = driver();
        assert_eq!(d.store().mesh_count(), d.catalog().len());
        assert_eq!(d.store().texture_count(), 4);
        assert_eq!(d.frame_count(), 0);
    }

    #[test]
    fn missing_asset_is_fatal() {
        let catalog = SceneCatalog::empty().with_scene(SceneDesc::mesh("x", "teapot", 1.0));
        let mut assets = BuiltinAssets::new();
        let err = FrameDriver::with_catalog(
            &config(),
            catalog,
            LightRig::default(),
            &mut assets,
            KeyBindings::default(),
            Box::new(crate::SilentAudio),
        )
        .err()
        .unwrap();
        assert!(matches!(err, FrameError::Asset(AssetError::NotFound(_))));
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let mut assets = BuiltinAssets::new();
        let result = FrameDriver::with_catalog(
            &config(),
            SceneCatalog::empty(),
            LightRig::default(),
            &mut assets,
            KeyBindings::default(),
            Box::new(crate::SilentAudio),
        );
        assert!(matches!(result, Err(FrameError::Scene(SceneError::EmptyCatalog))));
    }

    #[test]
    fn mesh_scene_submits_one_opaque_draw() {
        let mut d = driver();
        let frame = d.tick(DT);
        assert_eq!(frame.draws.len(), 1);
        assert_eq!(frame.draws[0].blend, BlendMode::Opaque);
        assert_eq!(d.frame_count(), 1);
    }

    #[test]
    fn scene_meshes_are_prescaled() {
        let d = driver();
        let mut assets = BuiltinAssets::new();
        let raw = assets.load_mesh("banner").unwrap();
        let handle = d.scene_meshes[0];
        let loaded = d.store().get_mesh(handle).unwrap();
        assert_eq!(loaded.positions[1], raw.positions[1] * 0.4);
    }

    #[test]
    fn escape_exits_and_key_release_is_ignored() {
        let mut d = driver();
        assert_eq!(d.handle_key(Key::Escape, false), Control::Continue);
        assert_eq!(press(&mut d, Key::Escape), Control::Exit);
    }

    #[test]
    fn fountain_scene_steps_and_blends_particles() {
        let mut d = driver();
        press(&mut d, Key::Left);
        assert!(d.active_scene().unwrap().is_particle_fountain());

        let frame = d.tick(DT);
        assert_eq!(frame.draws.len(), 30);
        assert!(frame.draws.iter().all(|c| c.blend == BlendMode::Alpha));
        assert!(frame.draws.iter().all(|c| (0.0..=1.0).contains(&c.alpha)));
        assert!(!frame.texture.enabled());
    }

    #[test]
    fn particles_only_step_in_the_fountain() {
        let mut d = driver();
        let before: Vec<_> = d.particles().raw().to_vec();
        for _ in 0..10 {
            d.tick(DT);
        }
        assert_eq!(d.particles().raw(), before.as_slice());
    }

    #[test]
    fn texture_follows_toggle_and_scene() {
        let mut d = driver();
        press(&mut d, Key::Right);
        let frame = d.tick(DT);
        assert!(frame.texture.enabled());
        assert_eq!(frame.texture.texgen, TexGen::Disabled);

        press(&mut d, Key::T);
        assert!(!d.tick(DT).texture.enabled());

        press(&mut d, Key::T);
        press(&mut d, Key::Right);
        press(&mut d, Key::Right);
        let frame = d.tick(DT);
        assert_eq!(frame.texture.texgen, TexGen::SphereMap);
        let handle = frame.texture.texture.unwrap();
        assert_eq!(d.store().texture_name(handle), Some("sphere_map"));
    }

    #[test]
    fn banner_scene_has_no_texture() {
        let mut d = driver();
        assert!(!d.tick(DT).texture.enabled());
    }

    #[test]
    fn lighting_toggle_switches_light_slots() {
        let mut d = driver();
        assert_eq!(d.tick(DT).active_lights().count(), 1);
        press(&mut d, Key::L);
        assert_eq!(d.tick(DT).active_lights().count(), 3);
    }

    #[test]
    fn fog_keys_reach_the_submission() {
        let mut d = driver();
        assert!(!d.tick(DT).fog.enabled);
        press(&mut d, Key::F);
        press(&mut d, Key::F3);
        let frame = d.tick(DT);
        assert!(frame.fog.enabled);
        assert_eq!(frame.fog.fog_type, FogType::ExponentialSquared);
        assert_eq!(frame.clear_color, frame.fog.color);
    }

    #[test]
    fn projection_toggle_and_resize() {
        let mut d = driver();
        let perspective = d.tick(DT).projection;
        press(&mut d, Key::P);
        let ortho = d.tick(DT).projection;
        assert_ne!(perspective.w_axis.w, ortho.w_axis.w);

        d.set_aspect_ratio(2.0);
        assert_eq!(d.scene().aspect_ratio(), 2.0);
        assert_eq!(d.tick(DT).projection, testbed_scene::compute_projection(true, 2.0));
    }

    #[test]
    fn rotation_advances_world_matrix() {
        let mut d = driver();
        let first = d.tick(DT).draws[0].world;
        let second = d.tick(DT).draws[0].world;
        assert_ne!(first, second);

        press(&mut d, Key::R);
        let a = d.tick(DT).draws[0].world;
        let b = d.tick(DT).draws[0].world;
        assert_eq!(a, b);
    }

    struct CountingAudio(Rc<Cell<u32>>);

    impl Audio for CountingAudio {
        fn update(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn audio_updates_once_per_tick() {
        let count = Rc::new(Cell::new(0));
        let mut assets = BuiltinAssets::with_texture_size(4);
        let mut d = FrameDriver::new(
            &config(),
            &mut assets,
            KeyBindings::default(),
            Box::new(CountingAudio(count.clone())),
        )
        .unwrap();
        for _ in 0..3 {
            d.tick(DT);
        }
        assert_eq!(count.get(), 3);
    }

    struct TinyAssets;

    impl AssetProvider for TinyAssets {
        fn load_mesh(&mut self, _name: &str) -> Result<Mesh, AssetError> {
            Ok(Mesh::default())
        }

        fn load_texture(&mut self, _name: &str) -> Result<Texture, AssetError> {
            Ok(Texture::from_fn(1, 1, |_, _| [0, 0, 0, 255]))
        }
    }

    /// Serves one triangle with a dangling index, or a short texture.
    struct BrokenAssets {
        bad_texture: bool,
    }

    impl AssetProvider for BrokenAssets {
        fn load_mesh(&mut self, _name: &str) -> Result<Mesh, AssetError> {
            let mut mesh = Mesh::default();
            if !self.bad_texture {
                mesh.positions = vec![Vec3::ZERO, Vec3::X];
                mesh.texcoords = vec![Vec2::ZERO; 2];
                mesh.normals = vec![Vec3::Z; 2];
                mesh.indices = vec![0, 1, 2];
            }
            Ok(mesh)
        }

        fn load_texture(&mut self, _name: &str) -> Result<Texture, AssetError> {
            Ok(Texture {
                width: 2,
                height: 2,
                rgba: vec![0; if self.bad_texture { 3 } else { 16 }],
            })
        }
    }

    #[test]
    fn unusable_mesh_is_fatal() {
        let result = FrameDriver::new(
            &config(),
            &mut BrokenAssets { bad_texture: false },
            KeyBindings::default(),
            Box::new(crate::SilentAudio),
        );
        assert!(matches!(
            result,
            Err(FrameError::Asset(AssetError::InvalidMesh { .. }))
        ));
    }

    #[test]
    fn unusable_texture_is_fatal() {
        let result = FrameDriver::new(
            &config(),
            &mut BrokenAssets { bad_texture: true },
            KeyBindings::default(),
            Box::new(crate::SilentAudio),
        );
        assert!(matches!(
            result,
            Err(FrameError::Asset(AssetError::InvalidTexture { actual: 3, .. }))
        ));
    }

    #[test]
    fn invalid_particle_config_is_rejected_at_startup() {
        let mut config = config();
        config.particles.spread = f32::INFINITY;
        let result = FrameDriver::new(
            &config,
            &mut BuiltinAssets::with_texture_size(8),
            KeyBindings::default(),
            Box::new(crate::SilentAudio),
        );
        assert!(matches!(result, Err(FrameError::InvalidConfig(_))));
    }

    #[test]
    fn custom_provider_and_bindings() {
        let mut bindings = KeyBindings::empty();
        bindings.bind(Key::F1, testbed_input::Action::NextScene);
        let mut d =
            FrameDriver::new(&config(), &mut TinyAssets, bindings, Box::new(crate::SilentAudio))
                .unwrap();
        assert_eq!(press(&mut d, Key::Escape), Control::Continue);
        press(&mut d, Key::F1);
        assert_eq!(d.scene().active_scene(), 1);
    }
}
