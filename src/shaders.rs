//! GLSL shader sources and compilation helpers.
//!
//! The bodies are written once against the common subset of GLSL 1.40
//! (OpenGL 3.1) and GLSL ES 3.00 (WebGL2); [`GlslVersion`] supplies the
//! header that differs between the two.

#[cfg(feature = "glow")]
use glow::HasContext;

#[cfg(feature = "glow")]
use crate::error::DeviceError;

/// Which GLSL dialect to prefix the shader bodies with.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum GlslVersion {
    /// `#version 140`, desktop OpenGL 3.1 and later.
    #[default]
    Glsl140,
    /// `#version 300 es`, WebGL2 and OpenGL ES 3.0.
    Es300,
}

impl GlslVersion {
    /// Header placed before every shader body.
    #[must_use]
    pub fn header(self) -> &'static str {
        match self {
            Self::Glsl140 => "#version 140\n",
            Self::Es300 => "#version 300 es\nprecision highp float;\n",
        }
    }

    /// Prefix `body` with this dialect's header.
    #[must_use]
    pub fn source(self, body: &str) -> String {
        let mut source = String::with_capacity(self.header().len() + body.len());
        source.push_str(self.header());
        source.push_str(body);
        source
    }
}

/// Vertex shader body for beam quads.
///
/// Projects the quad corner and forwards the world-space corner, beam
/// endpoints and time unchanged to the fragment stage.
///
/// # Attributes
///
/// | Name         | Type    | Description                        |
/// |--------------|---------|------------------------------------|
/// | `a_position` | `vec2`  | Quad corner in world space         |
/// | `a_start`    | `vec2`  | Beam origin in world space         |
/// | `a_end`      | `vec2`  | Beam target in world space         |
/// | `a_time`     | `float` | Seconds since the beam was reset   |
///
/// # Uniforms
///
/// | Name         | Type   | Description                  |
/// |--------------|--------|------------------------------|
/// | `u_projTrans`| `mat4` | Combined projection matrix   |
pub const BEAM_VERTEX_BODY: &str = r"
in vec2 a_position;
in vec2 a_start;
in vec2 a_end;
in float a_time;

uniform mat4 u_projTrans;

out vec2 v_world;
out vec2 v_start;
out vec2 v_end;
out float v_time;

void main() {
    v_world = a_position;
    v_start = a_start;
    v_end = a_end;
    v_time = a_time;
    gl_Position = u_projTrans * vec4(a_position, 0.0, 1.0);
}
";

/// Fragment shader body for beam quads.
///
/// Rebuilds the beam from its endpoints, animates it through the grow,
/// linger and fade phases, and composites the beam, root and impact layers
/// by accumulating `color * alpha` and normalizing by the summed alpha.
/// [`crate::shading`] is the CPU mirror of this program.
///
/// # Uniforms
///
/// | Name           | Type   | Description                         |
/// |----------------|--------|-------------------------------------|
/// | `u_resolution` | `vec2` | World size used for normalization   |
/// | `u_timings`    | `vec3` | `(grow, linger, fade)` in seconds   |
/// | `u_style`      | `vec3` | `(core, beam, glow)` thicknesses    |
pub const BEAM_FRAGMENT_BODY: &str = r"
in vec2 v_world;
in vec2 v_start;
in vec2 v_end;
in float v_time;

uniform vec2 u_resolution;
uniform vec3 u_timings;
uniform vec3 u_style;

out vec4 frag_color;

const vec3 BEAM_INNER = vec3(0.2, 0.6, 1.0);
const vec3 BEAM_OUTER = vec3(0.1, 0.3, 1.0);
const float ROOT_RADIUS = 0.03;
const float ROOT_GLOW = 0.03;
const float IMPACT_RADIUS = 0.01;
const float IMPACT_GLOW = 0.05;
const float RING_THICKNESS = 0.005;
const float ROOT_FADE_SOFTNESS = 0.2;

vec2 to_beam_space(vec2 p) {
    return (p - 0.5 * u_resolution) / u_resolution.y;
}

void main() {
    vec2 uv = to_beam_space(v_world);
    vec2 center = to_beam_space(v_start);
    vec2 target = to_beam_space(v_end);

    float grow = u_timings.x;
    float linger = u_timings.y;
    float fadeDuration = u_timings.z;
    float localTime = mod(v_time, grow + linger + fadeDuration);

    float coreThickness = u_style.x;
    float beamThickness = u_style.y;
    float glowThickness = u_style.z;

    vec2 toTarget = target - center;
    float targetLength = length(toTarget);
    vec2 beamDir = targetLength > 0.0 ? toTarget / targetLength : vec2(0.0);

    // Phase selection
    float currentLength = targetLength;
    float fade = 1.0;
    float rootIntensity = 1.0;
    float impactIntensity = 0.0;
    float fadeProgress = 0.0;
    bool fading = false;

    if (localTime < grow) {
        currentLength = targetLength * (localTime / grow);
    } else if (localTime < grow + linger) {
        float lingerProgress = (localTime - grow) / linger;
        impactIntensity = 1.0 + 0.2 * sin(lingerProgress * 30.0);
    } else {
        fading = true;
        fadeProgress = (localTime - grow - linger) / fadeDuration;
        fade = 1.0 - fadeProgress;
        rootIntensity = fade;
        impactIntensity = fade * 0.5;
    }

    // Distance to the visible segment
    vec2 p = uv - center;
    float h = currentLength > 0.0 ? clamp(dot(p, beamDir) / currentLength, 0.0, 1.0) : 0.0;
    float dist = length(p - beamDir * h * currentLength);

    float core = smoothstep(coreThickness, 0.0, dist);
    float beam = smoothstep(beamThickness + glowThickness, beamThickness, dist);
    float bloom = smoothstep(beamThickness + glowThickness, beamThickness, dist * 0.5);

    float distFromRoot = length(p);
    float rootAlpha = smoothstep(ROOT_RADIUS + ROOT_GLOW, ROOT_RADIUS * 0.5, distFromRoot);
    float rootCore = smoothstep(ROOT_RADIUS * 0.5, 0.0, distFromRoot);

    vec2 tip = center + beamDir * currentLength;
    float distFromTip = length(uv - tip);
    float ringSize = IMPACT_RADIUS * (1.0 + 0.3 * sin(localTime * 10.0));
    float ring = smoothstep(ringSize + RING_THICKNESS, ringSize, distFromTip)
        - smoothstep(ringSize, ringSize - RING_THICKNESS, distFromTip);
    float impactCore = smoothstep(IMPACT_RADIUS + IMPACT_GLOW, IMPACT_RADIUS, distFromTip);
    float impact = impactCore + ring * 0.5;

    float rootFade = fading
        ? smoothstep(fadeProgress, fadeProgress + ROOT_FADE_SOFTNESS, h)
        : 1.0;

    vec3 beamColor = mix(BEAM_INNER, BEAM_OUTER,
        clamp(dist / (beamThickness + glowThickness), 0.0, 1.0));

    float beamA = max(beam, bloom * 0.5) * fade * rootFade;
    vec3 beamCol = mix(beamColor, vec3(1.0), core);
    float rootA = rootAlpha * rootIntensity;
    vec3 rootCol = mix(beamColor, vec3(1.0), rootCore);
    float impactA = clamp(impact * impactIntensity, 0.0, 1.0);
    vec3 impactCol = mix(beamColor * 1.5, vec3(1.0), 0.5);

    float total = beamA + rootA + impactA;
    if (total <= 0.0) {
        frag_color = vec4(0.0);
        return;
    }
    vec3 accum = beamCol * beamA + rootCol * rootA + impactCol * impactA;
    frag_color = vec4(accum / total, min(total, 1.0));
}
";

/// Compile a shader program from vertex and fragment source strings.
///
/// The compiled shader objects are detached and deleted after successful
/// linking, so only the program handle needs to be cleaned up by the caller.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
///
/// # Errors
///
/// Returns [`DeviceError::Compile`] or [`DeviceError::Link`] with the driver's
/// info log.
#[cfg(feature = "glow")]
pub unsafe fn compile_program(
    gl: &glow::Context,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<glow::Program, DeviceError> {
    let program = unsafe { gl.create_program() }.map_err(DeviceError::Resource)?;

    let vs = unsafe { compile_shader(gl, glow::VERTEX_SHADER, vertex_src) }?;
    let fs = match unsafe { compile_shader(gl, glow::FRAGMENT_SHADER, fragment_src) } {
        Ok(fs) => fs,
        Err(err) => {
            unsafe {
                gl.delete_shader(vs);
                gl.delete_program(program);
            }
            return Err(err);
        }
    };

    unsafe {
        gl.attach_shader(program, vs);
        gl.attach_shader(program, fs);
        gl.link_program(program);

        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            gl.delete_shader(vs);
            gl.delete_shader(fs);
            return Err(DeviceError::Link(log));
        }

        gl.detach_shader(program, vs);
        gl.detach_shader(program, fs);
        gl.delete_shader(vs);
        gl.delete_shader(fs);
    }

    Ok(program)
}

/// Compile a single shader stage (vertex or fragment) from source.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
#[cfg(feature = "glow")]
unsafe fn compile_shader(
    gl: &glow::Context,
    shader_type: u32,
    source: &str,
) -> Result<glow::Shader, DeviceError> {
    unsafe {
        let shader = gl.create_shader(shader_type).map_err(DeviceError::Resource)?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.get_shader_compile_status(shader) {
            let log = gl.get_shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(DeviceError::Compile(log));
        }

        Ok(shader)
    }
}
