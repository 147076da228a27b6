use glam::{Mat4, Vec4};
use testbed_assets::{MeshHandle, TextureHandle};
use testbed_common::{FogParams, Light, MAX_LIGHTS, TexGen};

/// How a draw call's fragments combine with the framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Opaque,
    /// Source alpha over destination, no depth writes.
    Alpha,
}

/// Texture state for unit 0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextureBinding {
    pub unit: u32,
    /// `None` disables texture mapping.
    pub texture: Option<TextureHandle>,
    pub texgen: TexGen,
}

impl TextureBinding {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn enabled(&self) -> bool {
        self.texture.is_some()
    }
}

/// One indexed draw of a registered mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub mesh: MeshHandle,
    pub world: Mat4,
    pub blend: BlendMode,
    /// Multiplies the fragment alpha.
    pub alpha: f32,
}

impl DrawCall {
    pub fn opaque(mesh: MeshHandle, world: Mat4) -> Self {
        Self {
            mesh,
            world,
            blend: BlendMode::Opaque,
            alpha: 1.0,
        }
    }

    pub fn blended(mesh: MeshHandle, world: Mat4, alpha: f32) -> Self {
        Self {
            mesh,
            world,
            blend: BlendMode::Alpha,
            alpha,
        }
    }
}

/// Everything a backend needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSubmission {
    pub projection: Mat4,
    pub view: Mat4,
    /// Light slots in eye space; `None` slots are switched off.
    pub lights: [Option<Light>; MAX_LIGHTS],
    pub texture: TextureBinding,
    pub fog: FogParams,
    pub clear_color: Vec4,
    pub draws: Vec<DrawCall>,
}

impl Default for FrameSubmission {
    fn default() -> Self {
        Self {
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            lights: [None; MAX_LIGHTS],
            texture: TextureBinding::disabled(),
            fog: FogParams::default(),
            clear_color: Vec4::new(0.5, 0.5, 0.5, 1.0),
            draws: Vec::new(),
        }
    }
}

impl FrameSubmission {
    /// Lights that are switched on, with their slot index.
    pub fn active_lights(&self) -> impl Iterator<Item = (usize, &Light)> {
        self.lights
            .iter()
            .enumerate()
            .filter_map(|(i, l)| l.as_ref().map(|l| (i, l)))
    }

    pub fn opaque_draws(&self) -> impl Iterator<Item = &DrawCall> {
        self.draws.iter().filter(|d| d.blend == BlendMode::Opaque)
    }

    pub fn blended_draws(&self) -> impl Iterator<Item = &DrawCall> {
        self.draws.iter().filter(|d| d.blend == BlendMode::Alpha)
    }
}
