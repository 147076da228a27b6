//! Assets: mesh and texture data, the provider seam the frame driver loads
//! through, procedural built-in content, and a content-addressed registry.
//!
//! Renderers consume assets by handle, never by name.

mod builtin;
mod data;
mod store;

pub use builtin::BuiltinAssets;
pub use data::{Mesh, Texture};
pub use store::{AssetStore, MeshHandle, TextureHandle};

/// Errors from loading or validating assets.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("invalid mesh {name}: {reason}")]
    InvalidMesh { name: String, reason: String },
    #[error("invalid texture {name}: expected {expected} bytes, got {actual}")]
    InvalidTexture {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// Source of mesh and texture data, looked up by name.
///
/// The testbed ships [`BuiltinAssets`]; engines with real file loaders
/// implement this trait instead.
pub trait AssetProvider {
    fn load_mesh(&mut self, name: &str) -> Result<Mesh, AssetError>;
    fn load_texture(&mut self, name: &str) -> Result<Texture, AssetError>;
}

pub fn crate_info() -> &'static str {
    "testbed-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("assets"));
    }

    #[test]
    fn errors_render_names() {
        let e = AssetError::NotFound("teapot".into());
        assert!(e.to_string().contains("teapot"));
    }
}
