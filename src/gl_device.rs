//! [`BeamDevice`] implementation on top of [`glow`].

use std::sync::Arc;

use glow::HasContext;
use log::{debug, info};

use crate::device::BeamDevice;
use crate::error::DeviceError;
use crate::shaders::{self, GlslVersion};
use crate::types::{BeamVertex, BlendFactor, BlendState, FrameUniforms};

/// Cached uniform locations for the beam program.
struct BeamUniforms {
    /// `u_projTrans`: combined projection matrix.
    projection: glow::UniformLocation,
    /// `u_resolution`: world size for beam-space normalization.
    resolution: glow::UniformLocation,
    /// `u_timings`: grow, linger and fade durations.
    timings: glow::UniformLocation,
    /// `u_style`: core, beam and glow thicknesses.
    style: glow::UniformLocation,
}

/// Vertex attributes, in [`BeamVertex`] field order: name, component count,
/// byte offset.
const ATTRIBUTES: [(&str, i32, i32); 4] = [
    ("a_position", 2, 0),
    ("a_start", 2, 8),
    ("a_end", 2, 16),
    ("a_time", 1, 24),
];

/// Convert a count to `i32` for GL API calls.
///
/// Counts are bounded by the buffer capacity chosen at creation, which is
/// checked to fit there.
fn gl_count(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn gl_factor(factor: BlendFactor) -> u32 {
    match factor {
        BlendFactor::One => glow::ONE,
        BlendFactor::SrcAlpha => glow::SRC_ALPHA,
        BlendFactor::OneMinusSrcAlpha => glow::ONE_MINUS_SRC_ALPHA,
    }
}

/// Beam program, vertex array and a fixed-size streaming vertex buffer.
///
/// # Example
///
/// ```no_run
/// # use beam_renderer_gpu::{BeamRenderer, GlowDevice, GlslVersion, DEFAULT_MAX_VERTICES};
/// # use std::sync::Arc;
/// # fn example(gl: Arc<glow::Context>) -> Result<(), Box<dyn std::error::Error>> {
/// // During setup (with a current GL context):
/// let device = unsafe { GlowDevice::new(gl, GlslVersion::Es300, DEFAULT_MAX_VERTICES) }?;
/// let mut renderer = BeamRenderer::new(device, [500.0, 1000.0])?;
/// # Ok(())
/// # }
/// ```
pub struct GlowDevice {
    /// The OpenGL context, shared with the host application.
    gl: Arc<glow::Context>,
    program: glow::Program,
    uniforms: BeamUniforms,
    /// Vertex array describing the [`BeamVertex`] layout.
    vao: glow::VertexArray,
    /// Vertex buffer sized for `max_vertices`, overwritten on each draw.
    vbo: glow::Buffer,
    max_vertices: usize,
}

impl GlowDevice {
    /// Compile the beam program and allocate a vertex buffer for
    /// `max_vertices` vertices.
    ///
    /// # Safety
    ///
    /// The `gl` context must be current and valid, and must stay current for
    /// every later call on this device. The caller must ensure that
    /// [`BeamDevice::dispose`] is called before the context is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if shader compilation, program linking, attribute or
    /// uniform lookup, or GL object creation fails, or if `max_vertices`
    /// does not fit a GL buffer size.
    pub unsafe fn new(
        gl: Arc<glow::Context>,
        version: GlslVersion,
        max_vertices: usize,
    ) -> Result<Self, DeviceError> {
        let buffer_bytes = max_vertices
            .checked_mul(std::mem::size_of::<BeamVertex>())
            .and_then(|bytes| i32::try_from(bytes).ok())
            .ok_or_else(|| {
                DeviceError::Resource(format!(
                    "{max_vertices} vertices exceed the GL buffer size limit"
                ))
            })?;

        let program = unsafe {
            shaders::compile_program(
                &gl,
                &version.source(shaders::BEAM_VERTEX_BODY),
                &version.source(shaders::BEAM_FRAGMENT_BODY),
            )?
        };

        let uniforms = match unsafe { Self::uniform_locations(&gl, program) } {
            Ok(uniforms) => uniforms,
            Err(err) => {
                unsafe { gl.delete_program(program) };
                return Err(err);
            }
        };

        let (vao, vbo) = match unsafe { Self::create_buffers(&gl, program, buffer_bytes) } {
            Ok(buffers) => buffers,
            Err(err) => {
                unsafe { gl.delete_program(program) };
                return Err(err);
            }
        };

        info!("beam device ready ({version:?}, {max_vertices} vertices, {buffer_bytes} bytes)");

        Ok(Self {
            gl,
            program,
            uniforms,
            vao,
            vbo,
            max_vertices,
        })
    }

    /// Look up every uniform the beam program declares.
    unsafe fn uniform_locations(
        gl: &glow::Context,
        program: glow::Program,
    ) -> Result<BeamUniforms, DeviceError> {
        let lookup = |name: &'static str| {
            unsafe { gl.get_uniform_location(program, name) }
                .ok_or(DeviceError::MissingUniform(name))
        };
        Ok(BeamUniforms {
            projection: lookup("u_projTrans")?,
            resolution: lookup("u_resolution")?,
            timings: lookup("u_timings")?,
            style: lookup("u_style")?,
        })
    }

    /// Create the VAO and VBO and describe the [`BeamVertex`] layout.
    unsafe fn create_buffers(
        gl: &glow::Context,
        program: glow::Program,
        buffer_bytes: i32,
    ) -> Result<(glow::VertexArray, glow::Buffer), DeviceError> {
        unsafe {
            let vao = gl.create_vertex_array().map_err(DeviceError::Resource)?;
            let vbo = match gl.create_buffer() {
                Ok(vbo) => vbo,
                Err(err) => {
                    gl.delete_vertex_array(vao);
                    return Err(DeviceError::Resource(err));
                }
            };

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_size(glow::ARRAY_BUFFER, buffer_bytes, glow::DYNAMIC_DRAW);

            // BeamVertex is 28 bytes.
            let stride = gl_count(std::mem::size_of::<BeamVertex>());
            for (name, size, offset) in ATTRIBUTES {
                let Some(location) = gl.get_attrib_location(program, name) else {
                    gl.bind_vertex_array(None);
                    gl.delete_buffer(vbo);
                    gl.delete_vertex_array(vao);
                    return Err(DeviceError::MissingAttribute(name));
                };
                gl.enable_vertex_attrib_array(location);
                gl.vertex_attrib_pointer_f32(location, size, glow::FLOAT, false, stride, offset);
            }

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            Ok((vao, vbo))
        }
    }
}

impl BeamDevice for GlowDevice {
    fn max_vertices(&self) -> usize {
        self.max_vertices
    }

    fn bind_program(&mut self, uniforms: &FrameUniforms) {
        let gl = &self.gl;
        let u = &self.uniforms;
        // SAFETY: the context is current per the contract of `GlowDevice::new`.
        unsafe {
            gl.use_program(Some(self.program));
            gl.uniform_matrix_4_f32_slice(Some(&u.projection), false, &uniforms.projection);
            gl.uniform_2_f32(
                Some(&u.resolution),
                uniforms.resolution[0],
                uniforms.resolution[1],
            );
            let [grow, linger, fade] = uniforms.timings;
            gl.uniform_3_f32(Some(&u.timings), grow, linger, fade);
            let [core, beam, glow_thickness] = uniforms.style;
            gl.uniform_3_f32(Some(&u.style), core, beam, glow_thickness);
        }
    }

    fn set_blend(&mut self, blend: Option<BlendState>) {
        let gl = &self.gl;
        // SAFETY: the context is current per the contract of `GlowDevice::new`.
        unsafe {
            match blend {
                Some(state) => {
                    gl.enable(glow::BLEND);
                    gl.blend_func_separate(
                        gl_factor(state.src_rgb),
                        gl_factor(state.dst_rgb),
                        gl_factor(state.src_alpha),
                        gl_factor(state.dst_alpha),
                    );
                }
                None => gl.disable(glow::BLEND),
            }
        }
    }

    fn draw_triangles(&mut self, vertices: &[BeamVertex]) {
        let count = vertices.len().min(self.max_vertices);
        let gl = &self.gl;
        // SAFETY: the context is current per the contract of `GlowDevice::new`,
        // and `count` never exceeds the buffer allocated there.
        unsafe {
            gl.bind_vertex_array(Some(self.vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));
            gl.buffer_sub_data_u8_slice(
                glow::ARRAY_BUFFER,
                0,
                bytemuck::cast_slice(&vertices[..count]),
            );
            gl.draw_arrays(glow::TRIANGLES, 0, gl_count(count));
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_vertex_array(None);
        }
    }

    fn dispose(&mut self) {
        debug!("deleting beam program and buffers");
        let gl = &self.gl;
        // SAFETY: the context is current per the contract of `GlowDevice::new`.
        unsafe {
            gl.delete_program(self.program);
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.vbo);
        }
    }
}
