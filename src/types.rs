//! Plain data types shared by the renderer, the shading model and the GPU
//! backend.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Number of vertices emitted per beam (two triangles).
pub const QUAD_VERTICES: usize = 6;

/// One corner of a beam quad, ready for the GPU.
///
/// All six vertices of a beam carry the same `start`, `end` and `time` so the
/// fragment stage can rebuild the beam no matter which corner it interpolates
/// from.
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct BeamVertex {
    /// Quad corner in world space.
    pub position: [f32; 2],
    /// Beam origin in world space.
    pub start: [f32; 2],
    /// Beam target in world space.
    pub end: [f32; 2],
    /// Seconds since this beam's animation was last reset.
    pub time: f32,
}

/// Thicknesses of the beam layers, in beam space (fractions of the
/// viewport height).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamStyle {
    /// Radius of the white-hot core.
    pub core_thickness: f32,
    /// Radius at which the main beam reaches full intensity.
    pub beam_thickness: f32,
    /// Width of the falloff outside `beam_thickness`.
    pub glow_thickness: f32,
}

impl Default for BeamStyle {
    fn default() -> Self {
        Self {
            core_thickness: 0.003,
            beam_thickness: 0.004,
            glow_thickness: 0.02,
        }
    }
}

impl BeamStyle {
    /// The `u_style` uniform: `(core, beam, glow)`.
    #[must_use]
    pub fn to_uniform(&self) -> [f32; 3] {
        [self.core_thickness, self.beam_thickness, self.glow_thickness]
    }
}

/// Durations of the three animation phases, in seconds.
///
/// All three are expected to be strictly positive.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamTimings {
    /// Time for the beam to extend from origin to target.
    pub grow: f32,
    /// Time the beam stays at full length with a pulsing impact.
    pub linger: f32,
    /// Time for the beam to fade out.
    pub fade: f32,
}

impl Default for BeamTimings {
    fn default() -> Self {
        Self {
            grow: 0.2,
            linger: 0.5,
            fade: 0.3,
        }
    }
}

impl BeamTimings {
    /// The `u_timings` uniform: `(grow, linger, fade)`.
    #[must_use]
    pub fn to_uniform(&self) -> [f32; 3] {
        [self.grow, self.linger, self.fade]
    }
}

/// Everything the renderer snapshots at `begin()`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    /// Layer thicknesses.
    pub style: BeamStyle,
    /// Phase durations.
    pub timings: BeamTimings,
    /// World-space margin added around each beam's bounding box.
    pub pad: f32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            style: BeamStyle::default(),
            timings: BeamTimings::default(),
            pad: 64.0,
        }
    }
}

/// Shader-global parameters uploaded once per frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameUniforms {
    /// Column-major projection matrix (`u_projTrans`).
    pub projection: [f32; 16],
    /// World size used for beam-space normalization (`u_resolution`).
    pub resolution: [f32; 2],
    /// `(grow, linger, fade)` (`u_timings`).
    pub timings: [f32; 3],
    /// `(core, beam, glow)` (`u_style`).
    pub style: [f32; 3],
}

/// A blend factor, named after its GL counterpart.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BlendFactor {
    /// `GL_ONE`
    One,
    /// `GL_SRC_ALPHA`
    SrcAlpha,
    /// `GL_ONE_MINUS_SRC_ALPHA`
    OneMinusSrcAlpha,
}

/// Separate color / alpha blend functions, as passed to
/// `glBlendFuncSeparate`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlendState {
    /// Source factor for RGB.
    pub src_rgb: BlendFactor,
    /// Destination factor for RGB.
    pub dst_rgb: BlendFactor,
    /// Source factor for alpha.
    pub src_alpha: BlendFactor,
    /// Destination factor for alpha.
    pub dst_alpha: BlendFactor,
}

impl BlendState {
    /// Blend mode used while a beam session is open.
    pub const BEAM: Self = Self {
        src_rgb: BlendFactor::SrcAlpha,
        dst_rgb: BlendFactor::OneMinusSrcAlpha,
        src_alpha: BlendFactor::One,
        dst_alpha: BlendFactor::OneMinusSrcAlpha,
    };
}
