//! Rendering Adapter: renderer-agnostic per-frame submission.
//!
//! # Invariants
//! - Renderers never mutate scene or particle state.
//! - A submission is complete: everything a backend needs to draw the frame
//!   is in it, referenced by asset handle.

mod frame;
mod renderer;

pub use frame::{BlendMode, DrawCall, FrameSubmission, TextureBinding};
pub use renderer::{DebugTextRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "testbed-render v0.1.0"
}
