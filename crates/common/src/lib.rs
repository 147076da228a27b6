//! Shared value types passed between the scene model and the renderers.
//!
//! # Invariants
//! - Types here are plain data; they never own GPU or window resources.
//! - Lights are expressed in eye space (camera at the origin, looking down -Z).

mod light;
mod types;

pub use light::{Light, LightKind, MAX_LIGHTS};
pub use types::{FogParams, FogType, TexGen};
