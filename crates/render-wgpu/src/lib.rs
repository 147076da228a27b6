//! wgpu render backend for the testbed.
//!
//! Consumes [`testbed_render::FrameSubmission`]s: up to eight point or spot
//! lights evaluated per fragment, one texture unit with optional sphere-map
//! coordinate generation, linear/exp/exp2 fog, and an alpha-blended pass for
//! particles.
//!
//! # Invariants
//! - Renderer never mutates scene or particle state.
//! - GPU resources are owned by [`WgpuRenderer`] and released on drop.

mod gpu;
mod shaders;

pub use gpu::WgpuRenderer;
