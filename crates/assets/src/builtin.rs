use glam::{Mat4, Vec2, Vec3};

use crate::data::{Mesh, Texture};
use crate::{AssetError, AssetProvider};

/// Procedural asset provider. Every asset is generated on request, so the
/// testbed needs no files on disk.
#[derive(Debug, Clone)]
pub struct BuiltinAssets {
    texture_size: u32,
}

impl Default for BuiltinAssets {
    fn default() -> Self {
        Self { texture_size: 128 }
    }
}

impl BuiltinAssets {
    pub const MESHES: [&'static str; 7] = [
        "banner",
        "cube_coarse",
        "cube_fine",
        "cube_bumped",
        "terrain",
        "plane_fine",
        "particle",
    ];

    pub const TEXTURES: [&'static str; 4] = ["serious_games", "sphere_map", "grass", "metal"];

    pub fn new() -> Self {
        Self::default()
    }

    /// Generate textures at `size` x `size` texels.
    pub fn with_texture_size(size: u32) -> Self {
        Self {
            texture_size: size.max(1),
        }
    }
}

impl AssetProvider for BuiltinAssets {
    fn load_mesh(&mut self, name: &str) -> Result<Mesh, AssetError> {
        let mesh = match name {
            "banner" => cuboid(Vec3::new(2.2, 0.5, 0.12), 8),
            "cube_coarse" => cuboid(Vec3::ONE, 1),
            "cube_fine" => cuboid(Vec3::ONE, 16),
            "cube_bumped" => bumped_cube(24),
            "terrain" => terrain(48),
            "plane_fine" => tilted(grid(32)),
            "particle" => cuboid(Vec3::ONE, 1),
            _ => return Err(AssetError::NotFound(name.to_string())),
        };
        mesh.validate(name)?;
        tracing::info!(name, vertices = mesh.vertex_count(), "generated mesh");
        Ok(mesh)
    }

    fn load_texture(&mut self, name: &str) -> Result<Texture, AssetError> {
        let size = self.texture_size;
        let texture = match name {
            "serious_games" => checker(size),
            "sphere_map" => sphere_map(size),
            "grass" => grass(size),
            "metal" => metal(size),
            _ => return Err(AssetError::NotFound(name.to_string())),
        };
        texture.validate(name)?;
        tracing::info!(name, size, "generated texture");
        Ok(texture)
    }
}

/// Subdivided parallelogram spanning `u` and `v` from `origin`, facing
/// `u x v`.
fn patch(origin: Vec3, u: Vec3, v: Vec3, segments: u32) -> Mesh {
    let segments = segments.max(1);
    let normal = u.cross(v).normalize_or_zero();
    let row = segments + 1;
    let mut mesh = Mesh::default();

    for j in 0..=segments {
        for i in 0..=segments {
            let s = i as f32 / segments as f32;
            let t = j as f32 / segments as f32;
            mesh.positions.push(origin + u * s + v * t);
            mesh.texcoords.push(Vec2::new(s, 1.0 - t));
            mesh.normals.push(normal);
        }
    }
    for j in 0..segments {
        for i in 0..segments {
            let a = j * row + i;
            let b = a + 1;
            let c = a + row;
            let d = c + 1;
            mesh.indices.extend_from_slice(&[a, b, d, a, d, c]);
        }
    }
    mesh
}

/// Axis-aligned box centred on the origin with outward-facing faces.
fn cuboid(half: Vec3, segments: u32) -> Mesh {
    let (x, y, z) = (half.x, half.y, half.z);
    #[rustfmt::skip]
    let faces = [
        // origin, u, v
        (Vec3::new(-x, -y,  z), Vec3::new(2.0 * x, 0.0, 0.0), Vec3::new(0.0, 2.0 * y, 0.0)),  // +Z
        (Vec3::new( x, -y, -z), Vec3::new(-2.0 * x, 0.0, 0.0), Vec3::new(0.0, 2.0 * y, 0.0)), // -Z
        (Vec3::new( x, -y,  z), Vec3::new(0.0, 0.0, -2.0 * z), Vec3::new(0.0, 2.0 * y, 0.0)), // +X
        (Vec3::new(-x, -y, -z), Vec3::new(0.0, 0.0, 2.0 * z), Vec3::new(0.0, 2.0 * y, 0.0)),  // -X
        (Vec3::new(-x,  y,  z), Vec3::new(2.0 * x, 0.0, 0.0), Vec3::new(0.0, 0.0, -2.0 * z)), // +Y
        (Vec3::new(-x, -y, -z), Vec3::new(2.0 * x, 0.0, 0.0), Vec3::new(0.0, 0.0, 2.0 * z)),  // -Y
    ];
    let mut mesh = Mesh::default();
    for (origin, u, v) in faces {
        mesh.append(&patch(origin, u, v, segments));
    }
    mesh
}

/// Unit cube with a radial sine bump. Displacement depends only on position,
/// so vertices shared by two faces move together and edges stay closed.
fn bumped_cube(segments: u32) -> Mesh {
    let mut mesh = cuboid(Vec3::ONE, segments);
    for p in &mut mesh.positions {
        let bump = 0.08 * (5.0 * p.x).sin() * (5.0 * p.y).sin() * (5.0 * p.z).sin();
        *p += p.normalize_or_zero() * bump;
    }
    mesh.recompute_normals();
    mesh
}

/// Flat XZ grid over `[-1, 1]`, facing +Y.
fn grid(segments: u32) -> Mesh {
    patch(
        Vec3::new(-1.0, 0.0, 1.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -2.0),
        segments,
    )
}

/// Tip a ground-plane mesh toward a camera on +Z so it is not seen edge-on.
fn tilted(mesh: Mesh) -> Mesh {
    mesh.transformed(Mat4::from_rotation_x(35f32.to_radians()))
}

fn terrain(segments: u32) -> Mesh {
    let mut mesh = grid(segments);
    for p in &mut mesh.positions {
        p.y = 0.15 * (3.0 * p.x).sin() * (2.0 * p.z).cos() + 0.05 * (9.0 * p.x + 4.0 * p.z).sin();
    }
    mesh.recompute_normals();
    tilted(mesh)
}

fn checker(size: u32) -> Texture {
    let cell = (size / 8).max(1);
    let border = (size / 32).max(1);
    Texture::from_fn(size, size, |x, y| {
        if x < border || y < border || x >= size - border || y >= size - border {
            return [20, 30, 60, 255];
        }
        if ((x / cell) + (y / cell)) % 2 == 0 {
            [40, 90, 200, 255]
        } else {
            [235, 235, 235, 255]
        }
    })
}

/// Fake environment as seen in a mirrored ball: sky above, ground below,
/// a bright sun up and to the left.
fn sphere_map(size: u32) -> Texture {
    let half = size as f32 / 2.0;
    Texture::from_fn(size, size, |x, y| {
        let u = (x as f32 + 0.5 - half) / half;
        let v = (half - y as f32 - 0.5) / half;
        let r2 = u * u + v * v;
        if r2 > 1.0 {
            return [0, 0, 0, 255];
        }
        let (sky, horizon, ground) = (
            Vec3::new(60.0, 110.0, 200.0),
            Vec3::new(210.0, 215.0, 225.0),
            Vec3::new(90.0, 70.0, 50.0),
        );
        let mut c = if v >= 0.0 {
            horizon.lerp(sky, v)
        } else {
            horizon.lerp(ground, (-v * 2.0).min(1.0))
        };
        let sun = Vec2::new(u + 0.35, v - 0.45).length();
        c += Vec3::splat(255.0 * (1.0 - sun * 6.0).max(0.0));
        let c = c.min(Vec3::splat(255.0));
        [c.x as u8, c.y as u8, c.z as u8, 255]
    })
}

fn grass(size: u32) -> Texture {
    Texture::from_fn(size, size, |x, y| {
        let n = noise(x, y);
        let shade = |base: i32, amount: u64| {
            (base + (n % (2 * amount + 1)) as i32 - amount as i32).clamp(0, 255) as u8
        };
        [shade(60, 20), shade(140, 35), shade(50, 15), 255]
    })
}

fn metal(size: u32) -> Texture {
    Texture::from_fn(size, size, |x, y| {
        let stripe = 30.0 * (y as f32 * 0.8).sin();
        let grain = (noise(x / 4, y) % 21) as f32 - 10.0;
        let g = (150.0 + stripe + grain).clamp(0.0, 255.0) as u8;
        [g, g, g.saturating_add(8), 255]
    })
}

/// Deterministic per-texel noise.
fn noise(x: u32, y: u32) -> u64 {
    splitmix64(((x as u64) << 32) | y as u64)
}

/// Splitmix64 step function: cheap, well-mixed, reproducible everywhere.
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
