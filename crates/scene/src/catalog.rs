use serde::{Deserialize, Serialize};
use testbed_common::TexGen;

/// Texture bound to unit 0 while a scene is shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneTexture {
    pub name: String,
    pub texgen: TexGen,
}

/// What a scene draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneContent {
    /// A single mesh, uniformly scaled at load time.
    Mesh { mesh: String, scale: f32 },
    /// The particle pool, each particle drawn with `mesh`.
    ParticleFountain { mesh: String },
}

/// One selectable scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDesc {
    pub name: String,
    pub content: SceneContent,
    pub texture: Option<SceneTexture>,
}

impl SceneDesc {
    pub fn mesh(name: &str, mesh: &str, scale: f32) -> Self {
        Self {
            name: name.into(),
            content: SceneContent::Mesh {
                mesh: mesh.into(),
                scale,
            },
            texture: None,
        }
    }

    pub fn fountain(name: &str, particle_mesh: &str) -> Self {
        Self {
            name: name.into(),
            content: SceneContent::ParticleFountain {
                mesh: particle_mesh.into(),
            },
            texture: None,
        }
    }

    pub fn with_texture(mut self, texture: &str, texgen: TexGen) -> Self {
        self.texture = Some(SceneTexture {
            name: texture.into(),
            texgen,
        });
        self
    }

    pub fn mesh_name(&self) -> &str {
        match &self.content {
            SceneContent::Mesh { mesh, .. } | SceneContent::ParticleFountain { mesh } => mesh,
        }
    }

    /// Load-time scale. Particle meshes are scaled per particle instead.
    pub fn mesh_scale(&self) -> f32 {
        match &self.content {
            SceneContent::Mesh { scale, .. } => *scale,
            SceneContent::ParticleFountain { .. } => 1.0,
        }
    }

    pub fn is_particle_fountain(&self) -> bool {
        matches!(self.content, SceneContent::ParticleFountain { .. })
    }
}

/// Ordered list of scenes cycled through by the scene keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneCatalog {
    scenes: Vec<SceneDesc>,
}

impl Default for SceneCatalog {
    fn default() -> Self {
        Self::empty()
            .with_scene(SceneDesc::mesh("banner", "banner", 0.4))
            .with_scene(
                SceneDesc::mesh("coarse cube", "cube_coarse", 0.4)
                    .with_texture("serious_games", TexGen::Disabled),
            )
            .with_scene(
                SceneDesc::mesh("fine cube", "cube_fine", 0.4)
                    .with_texture("serious_games", TexGen::Disabled),
            )
            .with_scene(
                SceneDesc::mesh("bumped cube", "cube_bumped", 0.4)
                    .with_texture("sphere_map", TexGen::SphereMap),
            )
            .with_scene(
                SceneDesc::mesh("terrain", "terrain", 1.0).with_texture("grass", TexGen::Disabled),
            )
            .with_scene(
                SceneDesc::mesh("plane", "plane_fine", 1.0).with_texture("metal", TexGen::Disabled),
            )
            .with_scene(SceneDesc::fountain("fountain", "particle"))
    }
}

impl SceneCatalog {
    pub fn empty() -> Self {
        Self { scenes: Vec::new() }
    }

    pub fn with_scene(mut self, scene: SceneDesc) -> Self {
        self.scenes.push(scene);
        self
    }

    pub fn get(&self, index: usize) -> Option<&SceneDesc> {
        self.scenes.get(index)
    }

    pub fn scenes(&self) -> &[SceneDesc] {
        &self.scenes
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Distinct texture names referenced by the catalog, in first-use order.
    pub fn texture_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for scene in &self.scenes {
            if let Some(t) = &scene.texture {
                if !names.contains(&t.name.as_str()) {
                    names.push(&t.name);
                }
            }
        }
        names
    }
}
