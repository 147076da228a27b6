//! Frame driver for the fixed-function testbed.
//!
//! Owns the scene state, particle system, key bindings and loaded assets,
//! and turns one frame's input and elapsed time into a
//! [`testbed_render::FrameSubmission`].
//!
//! # Invariants
//! - Frame order: audio update, scene advance, particle step (fountain only),
//!   draw list.
//! - A missing asset fails startup; nothing is loaded lazily.

mod audio;
mod config;
mod driver;

pub use audio::{Audio, SilentAudio};
pub use config::TestbedConfig;
pub use driver::{FrameDriver, FrameError};

pub fn crate_info() -> &'static str {
    "testbed-frame v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("frame"));
    }
}
