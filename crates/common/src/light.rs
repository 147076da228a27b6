use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Number of simultaneous light slots a renderer accepts.
pub const MAX_LIGHTS: usize = 8;

/// Shape of a light's emission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LightKind {
    Point,
    /// Cone light. `cutoff_degrees` is the half-angle of the cone.
    Spot {
        direction: Vec3,
        exponent: f32,
        cutoff_degrees: f32,
    },
}

/// A light source in eye space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub kind: LightKind,
    pub position: Vec3,
    /// Diffuse colour. Ambient and specular terms are white.
    pub color: Vec3,
    /// Distance at which the light's contribution reaches zero.
    pub radius: f32,
}

impl Light {
    pub const DEFAULT_RADIUS: f32 = 100.0;

    pub fn point(position: Vec3, color: Vec3) -> Self {
        Self {
            kind: LightKind::Point,
            position,
            color,
            radius: Self::DEFAULT_RADIUS,
        }
    }

    /// Spot light aimed down the view axis (-Z).
    pub fn spot(position: Vec3, color: Vec3, exponent: f32, cutoff_degrees: f32) -> Self {
        Self {
            kind: LightKind::Spot {
                direction: Vec3::NEG_Z,
                exponent,
                cutoff_degrees,
            },
            position,
            color,
            radius: Self::DEFAULT_RADIUS,
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Linear distance attenuation, 1 at the light and 0 at `radius`.
    pub fn attenuation(&self, distance: f32) -> f32 {
        if self.radius <= 0.0 {
            return 0.0;
        }
        (1.0 - distance / self.radius).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_light_defaults() {
        let l = Light::point(Vec3::ZERO, Vec3::ONE);
        assert_eq!(l.kind, LightKind::Point);
        assert_eq!(l.radius, 100.0);
    }

    #[test]
    fn spot_light_faces_view_axis() {
        let l = Light::spot(Vec3::ZERO, Vec3::X, 128.0, 15.0);
        match l.kind {
            LightKind::Spot {
                direction,
                cutoff_degrees,
                ..
            } => {
                assert_eq!(direction, Vec3::NEG_Z);
                assert_eq!(cutoff_degrees, 15.0);
            }
            LightKind::Point => panic!("expected spot light"),
        }
    }

    #[test]
    fn attenuation_falls_to_zero_at_radius() {
        let l = Light::point(Vec3::ZERO, Vec3::ONE).with_radius(10.0);
        assert_eq!(l.attenuation(0.0), 1.0);
        assert!((l.attenuation(5.0) - 0.5).abs() < 1e-6);
        assert_eq!(l.attenuation(20.0), 0.0);
    }
}
