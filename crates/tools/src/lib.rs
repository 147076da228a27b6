//! Developer Tooling: read-only inspection of a running frame driver.
//!
//! # Invariants
//! - Inspection never mutates driver state.

mod inspector;

pub use inspector::{FrameInspector, FrameSummary, ParticleInfo};

pub fn crate_info() -> &'static str {
    "testbed-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
