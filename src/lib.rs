//! A batched renderer for animated "energy beam" effects, drawn with OpenGL
//! or WebGL2 via [glow].
//!
//! Each beam runs from an origin to a target and cycles through three
//! phases: it **grows** toward the target, **lingers** with a pulsing impact
//! glow, then **fades** while retracting from its base. All of that is
//! computed per pixel by one fragment shader; the CPU only writes six
//! vertices per beam.
//!
//! # Overview
//!
//! - [`BeamRenderer`] brackets a frame with [`begin`](BeamRenderer::begin) /
//!   [`end`](BeamRenderer::end), accepts any number of
//!   [`draw`](BeamRenderer::draw) calls in between, and submits them in as few
//!   draw calls as the vertex buffer allows.
//! - [`BeamDevice`] is the GPU seam. [`GlowDevice`] implements it on a glow
//!   context (feature `glow`, on by default).
//! - [`shading`] reproduces the fragment shader on the CPU, so the per-pixel
//!   math can be inspected and tested without a GPU.
//! - [`BeamScene`] owns a field of beams, a clock and click-to-restart, for
//!   hosts that just want the effect.
//! - [`BeamConfig`] loads style, timings and buffer size from TOML.
//!
//! # Safety
//!
//! Creating a [`GlowDevice`] is `unsafe`: it requires a valid, current
//! OpenGL context that stays current for the device's whole life.
//!
//! [glow]: https://docs.rs/glow

pub mod animation;
mod batch;
mod config;
mod device;
mod error;
mod geometry;
#[cfg(feature = "glow")]
mod gl_device;
mod renderer;
mod scene;
pub mod shaders;
pub mod shading;
mod types;

#[cfg(test)]
mod testing;

pub use animation::{Phase, PhaseState};
pub use batch::VertexBatch;
pub use config::{BeamConfig, DEFAULT_MAX_VERTICES};
pub use device::BeamDevice;
pub use error::{ConfigError, DeviceError, ProtocolViolation};
pub use geometry::{beam_quad, orthographic};
#[cfg(feature = "glow")]
pub use gl_device::GlowDevice;
pub use renderer::BeamRenderer;
pub use scene::{BeamScene, BeamTarget, DEFAULT_BEAMS, WORLD_HEIGHT, WORLD_WIDTH};
pub use shaders::GlslVersion;
pub use types::{
    BeamStyle, BeamTimings, BeamVertex, BlendFactor, BlendState, FrameUniforms, RenderStyle,
    QUAD_VERTICES,
};
