use serde::{Deserialize, Serialize};
use testbed_common::FogType;

/// A discrete scene command produced by a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Leave the frame loop.
    Exit,
    /// Show the next scene, wrapping to the first.
    NextScene,
    /// Show the previous scene, wrapping to the last.
    PrevScene,
    ToggleFog,
    SetFogType(FogType),
    /// Switch between the single head light and the coloured spot lights.
    ToggleComplexLighting,
    ToggleRotation,
    /// Switch between perspective and orthographic projection.
    ToggleProjection,
    ToggleTextureMapping,
}

impl Action {
    /// Short description for help overlays.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Exit => "exit",
            Self::NextScene => "next scene",
            Self::PrevScene => "previous scene",
            Self::ToggleFog => "toggle fog",
            Self::SetFogType(FogType::Linear) => "linear fog",
            Self::SetFogType(FogType::Exponential) => "exponential fog",
            Self::SetFogType(FogType::ExponentialSquared) => "exponential-squared fog",
            Self::ToggleComplexLighting => "toggle spot lights",
            Self::ToggleRotation => "toggle rotation",
            Self::ToggleProjection => "toggle orthographic projection",
            Self::ToggleTextureMapping => "toggle texture mapping",
        }
    }
}
