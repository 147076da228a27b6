//! Input: platform-neutral key codes mapped to scene actions.
//!
//! # Invariants
//! - The scene model consumes actions, never raw key codes.
//! - Only key-down events produce actions; key-up is ignored.
//! - Bindings are owned by whoever drives the frame loop; there is no
//!   global callback registry.

pub mod action;
mod bindings;

pub use action::Action;
pub use bindings::{Key, KeyBindings};

pub fn crate_info() -> &'static str {
    "testbed-input v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("input"));
    }
}
