use glam::{Mat4, Vec2, Vec3};

use crate::AssetError;

/// Indexed triangle mesh with per-vertex texture coordinates and normals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub texcoords: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Uniformly scale positions. Normals are unaffected.
    pub fn scaled(mut self, scale: f32) -> Self {
        for p in &mut self.positions {
            *p *= scale;
        }
        self
    }

    /// Transform positions and normals by `m`.
    pub fn transformed(mut self, m: Mat4) -> Self {
        let normal_matrix = m.inverse().transpose();
        for p in &mut self.positions {
            *p = m.transform_point3(*p);
        }
        for n in &mut self.normals {
            *n = normal_matrix.transform_vector3(*n).normalize_or_zero();
        }
        self
    }

    /// Append another mesh, offsetting its indices.
    pub fn append(&mut self, other: &Mesh) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.texcoords.extend_from_slice(&other.texcoords);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Replace normals with area-weighted averages of adjacent face normals.
    pub fn recompute_normals(&mut self) {
        let mut acc = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let face = (self.positions[b] - self.positions[a])
                .cross(self.positions[c] - self.positions[a]);
            acc[a] += face;
            acc[b] += face;
            acc[c] += face;
        }
        self.normals = acc.into_iter().map(Vec3::normalize_or_zero).collect();
    }

    /// Check attribute lengths and index bounds.
    pub fn validate(&self, name: &str) -> Result<(), AssetError> {
        let invalid = |reason: String| AssetError::InvalidMesh {
            name: name.to_string(),
            reason,
        };
        let n = self.positions.len();
        if self.texcoords.len() != n || self.normals.len() != n {
            return Err(invalid(format!(
                "attribute length mismatch: {} positions, {} texcoords, {} normals",
                n,
                self.texcoords.len(),
                self.normals.len()
            )));
        }
        if self.indices.len() % 3 != 0 {
            return Err(invalid(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }
        if let Some(bad) = self.indices.iter().find(|&&i| i as usize >= n) {
            return Err(invalid(format!("index {bad} out of range for {n} vertices")));
        }
        Ok(())
    }
}

/// RGBA8 texture, row-major, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Texture {
    /// Build a texture by evaluating `f(x, y)` for every texel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 4]) -> Self {
        let mut rgba = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                rgba.extend_from_slice(&f(x, y));
            }
        }
        Self {
            width,
            height,
            rgba,
        }
    }

    pub fn texel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        let px = self.rgba.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn validate(&self, name: &str) -> Result<(), AssetError> {
        let expected = (self.width as usize) * (self.height as usize) * 4;
        if self.rgba.len() != expected {
            return Err(AssetError::InvalidTexture {
                name: name.to_string(),
                expected,
                actual: self.rgba.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Mesh {
        Mesh {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            texcoords: vec![Vec2::ZERO, Vec2::X, Vec2::Y],
            normals: vec![Vec3::Z; 3],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn scaled_scales_positions_only() {
        let m = triangle().scaled(0.4);
        assert_eq!(m.positions[1], Vec3::new(0.4, 0.0, 0.0));
        assert_eq!(m.normals[1], Vec3::Z);
    }

    #[test]
    fn append_offsets_indices() {
        let mut m = triangle();
        m.append(&triangle());
        assert_eq!(m.vertex_count(), 6);
        assert_eq!(m.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(m.triangle_count(), 2);
    }

    #[test]
    fn recomputed_normals_follow_winding() {
        let mut m = triangle();
        m.normals = vec![Vec3::ZERO; 3];
        m.recompute_normals();
        assert!(m.normals.iter().all(|n| (*n - Vec3::Z).length() < 1e-6));
    }

    #[test]
    fn validate_catches_bad_indices() {
        let mut m = triangle();
        assert!(m.validate("tri").is_ok());
        m.indices = vec![0, 1, 3];
        assert!(matches!(
            m.validate("tri"),
            Err(AssetError::InvalidMesh { .. })
        ));
        m.indices = vec![0, 1];
        assert!(m.validate("tri").is_err());
    }

    #[test]
    fn validate_catches_attribute_mismatch() {
        let mut m = triangle();
        m.normals.pop();
        assert!(m.validate("tri").is_err());
    }

    #[test]
    fn texture_from_fn_layout() {
        let t = Texture::from_fn(2, 2, |x, y| [x as u8, y as u8, 0, 255]);
        assert!(t.validate("t").is_ok());
        assert_eq!(t.texel(1, 0), Some([1, 0, 0, 255]));
        assert_eq!(t.texel(0, 1), Some([0, 1, 0, 255]));
        assert_eq!(t.texel(2, 0), None);
    }

    #[test]
    fn texture_validate_size() {
        let t = Texture {
            width: 4,
            height: 4,
            rgba: vec![0; 10],
        };
        assert!(matches!(
            t.validate("bad"),
            Err(AssetError::InvalidTexture { expected: 64, .. })
        ));
    }
}
