//! Scene model: which scene is shown, which render features are on, and the
//! transforms and render parameters derived from that each frame.
//!
//! # Invariants
//! - The active scene index always addresses a scene in the catalog.
//! - Projection is recomputed whenever the projection mode or aspect
//!   ratio changes, never lazily.
//! - State is owned by the frame driver; nothing here is global.

mod catalog;
mod lighting;
mod state;

pub use catalog::{SceneCatalog, SceneContent, SceneDesc, SceneTexture};
pub use lighting::LightRig;
pub use state::{Control, SceneError, SceneState, compute_projection, world_rotation};

pub fn crate_info() -> &'static str {
    "testbed-scene v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("scene"));
    }
}
