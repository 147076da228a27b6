use glam::Vec4;
use serde::{Deserialize, Serialize};

/// Falloff function used to blend geometry into the fog colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FogType {
    #[default]
    Linear,
    Exponential,
    ExponentialSquared,
}

impl FogType {
    pub const ALL: [FogType; 3] = [
        FogType::Linear,
        FogType::Exponential,
        FogType::ExponentialSquared,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Exponential => "exp",
            Self::ExponentialSquared => "exp2",
        }
    }

    /// Index passed to shaders (0 = linear, 1 = exp, 2 = exp2).
    pub fn shader_index(self) -> u32 {
        match self {
            Self::Linear => 0,
            Self::Exponential => 1,
            Self::ExponentialSquared => 2,
        }
    }
}

/// Fog render parameters for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FogParams {
    pub enabled: bool,
    pub fog_type: FogType,
    pub start: f32,
    pub end: f32,
    pub density: f32,
    pub color: Vec4,
}

impl Default for FogParams {
    fn default() -> Self {
        Self {
            enabled: false,
            fog_type: FogType::Linear,
            start: 1.0,
            end: 7.0,
            density: 1.0,
            color: Vec4::new(0.5, 0.5, 0.5, 1.0),
        }
    }
}

impl FogParams {
    /// Fraction of the surface colour that survives at `distance` from the eye.
    ///
    /// 1.0 means no fog, 0.0 means fully fogged. Mirrors the shader equation.
    pub fn factor(&self, distance: f32) -> f32 {
        if !self.enabled {
            return 1.0;
        }
        let f = match self.fog_type {
            FogType::Linear => {
                let span = self.end - self.start;
                if span.abs() <= f32::EPSILON {
                    if distance < self.end { 1.0 } else { 0.0 }
                } else {
                    (self.end - distance) / span
                }
            }
            FogType::Exponential => (-self.density * distance).exp(),
            FogType::ExponentialSquared => {
                let d = self.density * distance;
                (-(d * d)).exp()
            }
        };
        f.clamp(0.0, 1.0)
    }
}

/// Texture coordinate source for texture unit 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TexGen {
    /// Use the mesh's own texture coordinates.
    #[default]
    Disabled,
    /// Generate coordinates from the eye-space reflection vector.
    SphereMap,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fog(fog_type: FogType) -> FogParams {
        FogParams {
            enabled: true,
            fog_type,
            start: 1.0,
            end: 5.0,
            density: 0.5,
            ..FogParams::default()
        }
    }

    #[test]
    fn disabled_fog_is_transparent() {
        let params = FogParams::default();
        assert_eq!(params.factor(100.0), 1.0);
    }

    #[test]
    fn linear_fog_interpolates_between_start_and_end() {
        let params = fog(FogType::Linear);
        assert_eq!(params.factor(0.5), 1.0);
        assert!((params.factor(3.0) - 0.5).abs() < 1e-6);
        assert_eq!(params.factor(9.0), 0.0);
    }

    #[test]
    fn exponential_fogs_decay() {
        let exp = fog(FogType::Exponential);
        let exp2 = fog(FogType::ExponentialSquared);
        assert!((exp.factor(2.0) - (-1.0f32).exp()).abs() < 1e-6);
        assert!((exp2.factor(2.0) - (-1.0f32).exp()).abs() < 1e-6);
        // exp2 stays clearer near the eye and falls off faster far away
        assert!(exp2.factor(1.0) > exp.factor(1.0));
        assert!(exp2.factor(6.0) < exp.factor(6.0));
    }

    #[test]
    fn degenerate_linear_span_is_a_step() {
        let params = FogParams {
            start: 2.0,
            end: 2.0,
            ..fog(FogType::Linear)
        };
        assert_eq!(params.factor(1.0), 1.0);
        assert_eq!(params.factor(3.0), 0.0);
    }

    #[test]
    fn fog_type_shader_indices_are_distinct() {
        let idx: Vec<u32> = FogType::ALL.iter().map(|t| t.shader_index()).collect();
        assert_eq!(idx, vec![0, 1, 2]);
        assert_eq!(FogType::default(), FogType::Linear);
    }
}
