//! The GPU capabilities the beam renderer relies on.

use crate::types::{BeamVertex, BlendState, FrameUniforms};

/// A device context able to run the beam shader program.
///
/// [`GlowDevice`](crate::GlowDevice) is the OpenGL / WebGL2 implementation.
/// The renderer calls these methods strictly in submission order and never
/// from more than one thread.
pub trait BeamDevice {
    /// Largest number of vertices a single [`draw_triangles`] call may
    /// receive.
    ///
    /// [`draw_triangles`]: BeamDevice::draw_triangles
    fn max_vertices(&self) -> usize;

    /// Activate the beam program and upload the frame's uniforms.
    fn bind_program(&mut self, uniforms: &FrameUniforms);

    /// Enable blending with `blend`, or disable it with `None`.
    fn set_blend(&mut self, blend: Option<BlendState>);

    /// Upload `vertices` and draw them as a triangle list.
    ///
    /// Never called with an empty slice or with more than
    /// [`max_vertices`](BeamDevice::max_vertices) vertices.
    fn draw_triangles(&mut self, vertices: &[BeamVertex]);

    /// Release every GPU resource held by the device.
    fn dispose(&mut self);
}
