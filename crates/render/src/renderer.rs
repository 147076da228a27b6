use std::fmt::Write;

use testbed_common::LightKind;

use crate::frame::{BlendMode, FrameSubmission};

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads a finished frame submission and produces output. It
/// never reaches back into scene or particle state.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&mut self, frame: &FrameSubmission) -> Self::Output;
}

/// Debug text renderer.
///
/// Produces a human-readable description of each submitted frame. Used by
/// the CLI for headless runs and by tests of the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    frames: u64,
    /// List every draw call rather than only the counts.
    verbose: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose() -> Self {
        Self {
            frames: 0,
            verbose: true,
        }
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, frame: &FrameSubmission) -> String {
        let mut out = String::new();
        let ortho = frame.projection.w_axis.w != 0.0;
        let _ = writeln!(
            out,
            "=== Frame {} ({}) ===",
            self.frames,
            if ortho { "orthographic" } else { "perspective" }
        );
        self.frames += 1;

        let opaque = frame.opaque_draws().count();
        let blended = frame.blended_draws().count();
        let _ = writeln!(
            out,
            "Draws: {} (opaque={opaque}, blended={blended})",
            frame.draws.len()
        );

        let lights: Vec<String> = frame
            .active_lights()
            .map(|(slot, light)| {
                let kind = match light.kind {
                    LightKind::Point => "point",
                    LightKind::Spot { .. } => "spot",
                };
                format!("{slot}:{kind}")
            })
            .collect();
        let _ = writeln!(out, "Lights: [{}]", lights.join(", "));

        match frame.texture.texture {
            Some(handle) => {
                let _ = writeln!(
                    out,
                    "Texture: unit {} handle={:016x} texgen={:?}",
                    frame.texture.unit, handle.0, frame.texture.texgen
                );
            }
            None => {
                let _ = writeln!(out, "Texture: off");
            }
        }

        if frame.fog.enabled {
            let _ = writeln!(
                out,
                "Fog: {} start={:.2} end={:.2} density={:.3}",
                frame.fog.fog_type.label(),
                frame.fog.start,
                frame.fog.end,
                frame.fog.density
            );
        } else {
            let _ = writeln!(out, "Fog: off");
        }

        if self.verbose {
            for draw in &frame.draws {
                let p = draw.world.w_axis;
                let blend = match draw.blend {
                    BlendMode::Opaque => "opaque",
                    BlendMode::Alpha => "alpha",
                };
                let _ = writeln!(
                    out,
                    "  [{:016x}] {blend} a={:.2} pos=({:.2}, {:.2}, {:.2})",
                    draw.mesh.0, draw.alpha, p.x, p.y, p.z
                );
            }
        }

        out
    }
}
