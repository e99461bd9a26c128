//! The batched beam renderer: session state, style snapshot and flushing.

use log::{debug, trace, warn};

use crate::batch::VertexBatch;
use crate::device::BeamDevice;
use crate::error::{DeviceError, ProtocolViolation};
use crate::geometry::beam_quad;
use crate::types::{BeamStyle, BeamTimings, BeamVertex, BlendState, FrameUniforms, RenderStyle};

/// Identity matrix, the projection until [`BeamRenderer::set_projection`] is
/// called.
#[rustfmt::skip]
const IDENTITY: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 1.0, 0.0,
    0.0, 0.0, 0.0, 1.0,
];

/// Where the renderer is in the `begin` / `end` bracket.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Session {
    Idle,
    /// A frame is open; `pad` is the value captured at `begin`.
    Recording { pad: f32 },
}

/// Draws many animated beams per frame with a single shader and as few draw
/// calls as the vertex buffer allows.
///
/// Each beam becomes one padded quad of six vertices in a shared
/// [`VertexBatch`]. The batch is submitted when the next beam would not fit
/// and once more at [`end`](Self::end), so any number of beams can be drawn
/// per frame.
///
/// # Example
///
/// ```
/// # use beam_renderer_gpu::{BeamDevice, BeamRenderer, BeamVertex, BlendState, FrameUniforms};
/// # struct Null;
/// # impl BeamDevice for Null {
/// #     fn max_vertices(&self) -> usize { 600 }
/// #     fn bind_program(&mut self, _: &FrameUniforms) {}
/// #     fn set_blend(&mut self, _: Option<BlendState>) {}
/// #     fn draw_triangles(&mut self, _: &[BeamVertex]) {}
/// #     fn dispose(&mut self) {}
/// # }
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut renderer = BeamRenderer::new(Null, [500.0, 1000.0])?;
/// renderer.set_style(0.002, 0.002, 0.01);
///
/// // Each frame:
/// renderer.begin()?;
/// renderer.draw([250.0, 500.0], [400.0, 120.0], 0.35)?;
/// renderer.end()?;
///
/// renderer.dispose();
/// # Ok(())
/// # }
/// ```
pub struct BeamRenderer<D: BeamDevice> {
    device: D,
    batch: VertexBatch,
    session: Session,
    projection: [f32; 16],
    resolution: [f32; 2],
    style: RenderStyle,
}

impl<D: BeamDevice> BeamRenderer<D> {
    /// Create a renderer drawing through `device` into a world of size
    /// `resolution`.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::CapacityTooSmall`] if the device cannot hold
    /// the six vertices of a single beam.
    pub fn new(device: D, resolution: [f32; 2]) -> Result<Self, DeviceError> {
        let max_vertices = device.max_vertices();
        let batch =
            VertexBatch::new(max_vertices).ok_or(DeviceError::CapacityTooSmall(max_vertices))?;
        debug!("beam renderer ready, {} vertices per batch", batch.capacity());

        Ok(Self {
            device,
            batch,
            session: Session::Idle,
            projection: IDENTITY,
            resolution,
            style: RenderStyle::default(),
        })
    }

    /// Store the projection used from the next [`begin`](Self::begin).
    pub fn set_projection(&mut self, projection: [f32; 16]) {
        self.projection = projection;
    }

    /// Set the world size beams are normalized against.
    pub fn set_resolution(&mut self, resolution: [f32; 2]) {
        self.resolution = resolution;
    }

    /// Set the grow, linger and fade durations, in seconds.
    ///
    /// All three must be strictly positive.
    pub fn set_timings(&mut self, grow: f32, linger: f32, fade: f32) {
        self.warn_if_recording("set_timings");
        self.style.timings = BeamTimings { grow, linger, fade };
    }

    /// Set the core, beam and glow thicknesses.
    pub fn set_style(&mut self, core: f32, beam: f32, glow: f32) {
        self.warn_if_recording("set_style");
        self.style.style = BeamStyle {
            core_thickness: core,
            beam_thickness: beam,
            glow_thickness: glow,
        };
    }

    /// Set the margin added around each beam's bounding box.
    pub fn set_pad(&mut self, pad: f32) {
        self.warn_if_recording("set_pad");
        self.style.pad = pad;
    }

    /// Replace the whole style at once.
    pub fn apply_style(&mut self, style: &RenderStyle) {
        self.warn_if_recording("apply_style");
        self.style = *style;
    }

    /// The style the next [`begin`](Self::begin) will use.
    #[must_use]
    pub fn render_style(&self) -> &RenderStyle {
        &self.style
    }

    /// `true` between [`begin`](Self::begin) and [`end`](Self::end).
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        matches!(self.session, Session::Recording { .. })
    }

    /// Vertices buffered but not yet submitted.
    #[must_use]
    pub fn pending_vertices(&self) -> usize {
        self.batch.len()
    }

    /// Vertices submitted per draw call at most.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.batch.capacity()
    }

    /// The underlying device.
    #[must_use]
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Open a frame: bind the program, upload the current projection and
    /// style, and enable beam blending.
    ///
    /// # Errors
    ///
    /// [`ProtocolViolation::BeginAlreadyCalled`] if a frame is already open.
    pub fn begin(&mut self) -> Result<(), ProtocolViolation> {
        if self.is_drawing() {
            return Err(ProtocolViolation::BeginAlreadyCalled);
        }
        self.batch.reset();
        self.session = Session::Recording {
            pad: self.style.pad,
        };

        let uniforms = FrameUniforms {
            projection: self.projection,
            resolution: self.resolution,
            timings: self.style.timings.to_uniform(),
            style: self.style.style.to_uniform(),
        };
        self.device.bind_program(&uniforms);
        self.device.set_blend(Some(BlendState::BEAM));
        Ok(())
    }

    /// Queue one beam from `start` to `end`, `time` seconds into its
    /// animation.
    ///
    /// If the beam does not fit in the batch, the pending beams are submitted
    /// first.
    ///
    /// # Errors
    ///
    /// [`ProtocolViolation::BeginNotCalled`] outside a frame.
    pub fn draw(
        &mut self,
        start: [f32; 2],
        end: [f32; 2],
        time: f32,
    ) -> Result<(), ProtocolViolation> {
        let Session::Recording { pad } = self.session else {
            return Err(ProtocolViolation::BeginNotCalled);
        };
        trace!("beam {start:?} -> {end:?} at {time}");

        let quad = beam_quad(start, end, time, pad);
        let device = &mut self.device;
        self.batch
            .append_quad(&quad, |pending| submit(device, pending));
        Ok(())
    }

    /// Submit everything queued so far as one draw call. Does nothing if no
    /// beam is pending.
    ///
    /// # Errors
    ///
    /// [`ProtocolViolation::BeginNotCalled`] outside a frame.
    pub fn flush(&mut self) -> Result<(), ProtocolViolation> {
        if !self.is_drawing() {
            return Err(ProtocolViolation::BeginNotCalled);
        }
        let device = &mut self.device;
        self.batch.drain(|pending| submit(device, pending));
        Ok(())
    }

    /// Close the frame: submit what is pending and disable blending.
    ///
    /// # Errors
    ///
    /// [`ProtocolViolation::BeginNotCalled`] outside a frame.
    pub fn end(&mut self) -> Result<(), ProtocolViolation> {
        self.flush()?;
        self.device.set_blend(None);
        self.session = Session::Idle;
        Ok(())
    }

    /// Release the device's GPU resources.
    pub fn dispose(mut self) {
        if self.is_drawing() {
            warn!("beam renderer disposed inside an open frame; pending beams dropped");
        }
        debug!("disposing beam renderer");
        self.device.dispose();
    }

    fn warn_if_recording(&self, setter: &str) {
        if self.is_drawing() {
            warn!("BeamRenderer::{setter} called inside a frame; it applies from the next begin()");
        }
    }
}

fn submit<D: BeamDevice>(device: &mut D, vertices: &[BeamVertex]) {
    debug!("flushing {} beam vertices", vertices.len());
    device.draw_triangles(vertices);
}
