use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::data::{Mesh, Texture};

/// Handle to a registered mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(pub u64);

/// Handle to a registered texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u64);

/// Content-addressed registry of loaded meshes and textures.
///
/// Handles are derived from the asset name, so registering the same name
/// twice yields the same handle and replaces the data.
#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    meshes: BTreeMap<MeshHandle, (String, Mesh)>,
    textures: BTreeMap<TextureHandle, (String, Texture)>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mesh under `name` and return its handle.
    pub fn register_mesh(&mut self, name: &str, mesh: Mesh) -> MeshHandle {
        let handle = MeshHandle(content_hash("mesh", name));
        tracing::debug!(
            name,
            vertices = mesh.vertex_count(),
            indices = mesh.index_count(),
            "mesh registered"
        );
        self.meshes.insert(handle, (name.to_string(), mesh));
        handle
    }

    /// Register a texture under `name` and return its handle.
    pub fn register_texture(&mut self, name: &str, texture: Texture) -> TextureHandle {
        let handle = TextureHandle(content_hash("texture", name));
        tracing::debug!(
            name,
            width = texture.width,
            height = texture.height,
            "texture registered"
        );
        self.textures.insert(handle, (name.to_string(), texture));
        handle
    }

    pub fn get_mesh(&self, handle: MeshHandle) -> Option<&Mesh> {
        self.meshes.get(&handle).map(|(_, m)| m)
    }

    pub fn get_texture(&self, handle: TextureHandle) -> Option<&Texture> {
        self.textures.get(&handle).map(|(_, t)| t)
    }

    pub fn mesh_name(&self, handle: MeshHandle) -> Option<&str> {
        self.meshes.get(&handle).map(|(n, _)| n.as_str())
    }

    pub fn texture_name(&self, handle: TextureHandle) -> Option<&str> {
        self.textures.get(&handle).map(|(n, _)| n.as_str())
    }

    /// All meshes in handle order.
    pub fn meshes(&self) -> impl Iterator<Item = (MeshHandle, &Mesh)> {
        self.meshes.iter().map(|(h, (_, m))| (*h, m))
    }

    /// All textures in handle order.
    pub fn textures(&self) -> impl Iterator<Item = (TextureHandle, &Texture)> {
        self.textures.iter().map(|(h, (_, t))| (*h, t))
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn len(&self) -> usize {
        self.meshes.len() + self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty() && self.textures.is_empty()
    }
}

/// First 8 bytes of SHA-256 over `kind:name`.
fn content_hash(kind: &str, name: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(kind.as_bytes());
    hasher.update(b":");
    hasher.update(name.as_bytes());
    let result = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&result[..8]);
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AssetProvider, BuiltinAssets};

    #[test]
    fn register_and_get() {
        let mut assets = BuiltinAssets::new();
        let mut store = AssetStore::new();
        let mesh = store.register_mesh("cube_fine", assets.load_mesh("cube_fine").unwrap());
        let tex = store.register_texture("grass", assets.load_texture("grass").unwrap());
        assert!(store.get_mesh(mesh).is_some());
        assert!(store.get_texture(tex).is_some());
        assert_eq!(store.mesh_name(mesh), Some("cube_fine"));
        assert_eq!(store.texture_name(tex), Some("grass"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn same_name_same_handle() {
        let mut store = AssetStore::new();
        let a = store.register_mesh("m", Mesh::default());
        let b = store.register_mesh("m", Mesh::default());
        assert_eq!(a, b);
        assert_eq!(store.mesh_count(), 1);
    }

    #[test]
    fn mesh_and_texture_namespaces_differ() {
        assert_ne!(content_hash("mesh", "x"), content_hash("texture", "x"));
    }

    #[test]
    fn empty_store() {
        let store = AssetStore::new();
        assert!(store.is_empty());
        assert!(store.get_mesh(MeshHandle(1)).is_none());
        assert_eq!(store.meshes().count(), 0);
    }
}
