//! CPU reference of the beam fragment shader.
//!
//! Everything here mirrors [`BEAM_FRAGMENT_BODY`](crate::shaders::BEAM_FRAGMENT_BODY)
//! line for line so the per-pixel math can be exercised without a GPU.
//! Layers are composited by accumulating `color * alpha` and `alpha`
//! separately and normalizing at the end.

use crate::animation::{Phase, PhaseState};
use crate::types::{BeamStyle, BeamTimings};

/// Beam color on the centerline.
pub const BEAM_INNER_COLOR: [f32; 3] = [0.2, 0.6, 1.0];
/// Beam color at the outer edge of the glow.
pub const BEAM_OUTER_COLOR: [f32; 3] = [0.1, 0.3, 1.0];

const ROOT_RADIUS: f32 = 0.03;
const ROOT_GLOW: f32 = 0.03;
const IMPACT_RADIUS: f32 = 0.01;
const IMPACT_GLOW: f32 = 0.05;
const RING_THICKNESS: f32 = 0.005;
const RING_PULSE_AMPLITUDE: f32 = 0.3;
const RING_PULSE_FREQUENCY: f32 = 10.0;
const ROOT_FADE_SOFTNESS: f32 = 0.2;

/// Frame-constant shader inputs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ShadingParams {
    /// World size used for normalization.
    pub resolution: [f32; 2],
    /// Phase durations.
    pub timings: BeamTimings,
    /// Layer thicknesses.
    pub style: BeamStyle,
}

/// Projection of a pixel onto the visible part of the beam.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SegmentHit {
    /// Clamped position along the visible segment, in `[0, 1]`.
    pub h: f32,
    /// Distance from the pixel to that position.
    pub dist: f32,
}

/// Intensity of every visual layer at one pixel, before compositing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Layers {
    /// Animation values the layers were computed with.
    pub phase: PhaseState,
    /// Distance-field sample.
    pub hit: SegmentHit,
    /// White-hot core.
    pub core: f32,
    /// Main beam body.
    pub beam: f32,
    /// Wide, soft halo around the beam.
    pub bloom: f32,
    /// Glow disc around the origin.
    pub root_alpha: f32,
    /// Bright center of the origin disc.
    pub root_core: f32,
    /// Impact glow plus pulsing ring at the beam tip.
    pub impact: f32,
    /// Retraction mask applied during the fade phase.
    pub root_fade: f32,
}

/// GLSL `smoothstep`, also well-defined for `edge0 > edge1`.
#[must_use]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn mix3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

fn sub(a: [f32; 2], b: [f32; 2]) -> [f32; 2] {
    [a[0] - b[0], a[1] - b[1]]
}

fn length(v: [f32; 2]) -> f32 {
    v[0].hypot(v[1])
}

/// Map a world position into beam space: centered on the viewport and
/// scaled by its height.
#[must_use]
pub fn to_beam_space(p: [f32; 2], resolution: [f32; 2]) -> [f32; 2] {
    [
        (p[0] - 0.5 * resolution[0]) / resolution[1],
        (p[1] - 0.5 * resolution[1]) / resolution[1],
    ]
}

/// Distance from `uv` to the segment starting at `center`, heading along the
/// unit vector `dir` for `current_length`.
///
/// A zero-length segment measures distance to `center`.
#[must_use]
pub fn segment_distance(
    uv: [f32; 2],
    center: [f32; 2],
    dir: [f32; 2],
    current_length: f32,
) -> SegmentHit {
    let p = sub(uv, center);
    let h = if current_length > 0.0 {
        ((p[0] * dir[0] + p[1] * dir[1]) / current_length).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let reach = h * current_length;
    let dist = length([p[0] - dir[0] * reach, p[1] - dir[1] * reach]);
    SegmentHit { h, dist }
}

/// Evaluate every layer for a pixel. All points are already in beam space.
#[must_use]
pub fn layers(
    uv: [f32; 2],
    center: [f32; 2],
    target: [f32; 2],
    time: f32,
    params: &ShadingParams,
) -> Layers {
    let BeamStyle {
        core_thickness,
        beam_thickness,
        glow_thickness,
    } = params.style;

    let to_target = sub(target, center);
    let target_length = length(to_target);
    let dir = if target_length > 0.0 {
        [to_target[0] / target_length, to_target[1] / target_length]
    } else {
        [0.0, 0.0]
    };

    let phase = params.timings.sample(time, target_length);
    let hit = segment_distance(uv, center, dir, phase.current_length);

    let core = smoothstep(core_thickness, 0.0, hit.dist);
    let beam = smoothstep(beam_thickness + glow_thickness, beam_thickness, hit.dist);
    let bloom = smoothstep(beam_thickness + glow_thickness, beam_thickness, hit.dist * 0.5);

    let dist_from_root = length(sub(uv, center));
    let root_alpha = smoothstep(ROOT_RADIUS + ROOT_GLOW, ROOT_RADIUS * 0.5, dist_from_root);
    let root_core = smoothstep(ROOT_RADIUS * 0.5, 0.0, dist_from_root);

    let tip = [
        center[0] + dir[0] * phase.current_length,
        center[1] + dir[1] * phase.current_length,
    ];
    let dist_from_tip = length(sub(uv, tip));
    let pulse = RING_PULSE_AMPLITUDE * (phase.local_time * RING_PULSE_FREQUENCY).sin();
    let ring_size = IMPACT_RADIUS * (1.0 + pulse);
    let ring = smoothstep(ring_size + RING_THICKNESS, ring_size, dist_from_tip)
        - smoothstep(ring_size, ring_size - RING_THICKNESS, dist_from_tip);
    let impact_core = smoothstep(IMPACT_RADIUS + IMPACT_GLOW, IMPACT_RADIUS, dist_from_tip);
    let impact = impact_core + ring * 0.5;

    let root_fade = if phase.phase == Phase::Fade {
        smoothstep(
            phase.fade_progress,
            phase.fade_progress + ROOT_FADE_SOFTNESS,
            hit.h,
        )
    } else {
        1.0
    };

    Layers {
        phase,
        hit,
        core,
        beam,
        bloom,
        root_alpha,
        root_core,
        impact,
        root_fade,
    }
}

impl Layers {
    /// Composite the layers into a straight-alpha RGBA color.
    ///
    /// Each layer contributes in proportion to its own alpha; a pixel no
    /// layer reaches is fully transparent.
    #[must_use]
    pub fn composite(&self, style: &BeamStyle) -> [f32; 4] {
        let edge = style.beam_thickness + style.glow_thickness;
        let beam_color = mix3(
            BEAM_INNER_COLOR,
            BEAM_OUTER_COLOR,
            (self.hit.dist / edge).clamp(0.0, 1.0),
        );
        let white = [1.0; 3];

        let beam_a = self.beam.max(self.bloom * 0.5) * self.phase.fade * self.root_fade;
        let beam_col = mix3(beam_color, white, self.core);

        let root_a = self.root_alpha * self.phase.root_intensity;
        let root_col = mix3(beam_color, white, self.root_core);

        let impact_a = (self.impact * self.phase.impact_intensity).clamp(0.0, 1.0);
        let impact_col = mix3(beam_color.map(|c| c * 1.5), white, 0.5);

        let total = beam_a + root_a + impact_a;
        if total <= 0.0 {
            return [0.0; 4];
        }

        let channel = |i: usize| {
            (beam_col[i] * beam_a + root_col[i] * root_a + impact_col[i] * impact_a) / total
        };
        [channel(0), channel(1), channel(2), total.min(1.0)]
    }
}

/// Shade one pixel given world-space inputs, exactly as the GPU does.
#[must_use]
pub fn shade(
    world: [f32; 2],
    start: [f32; 2],
    end: [f32; 2],
    time: f32,
    params: &ShadingParams,
) -> [f32; 4] {
    let uv = to_beam_space(world, params.resolution);
    let center = to_beam_space(start, params.resolution);
    let target = to_beam_space(end, params.resolution);
    layers(uv, center, target, time, params).composite(&params.style)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn params() -> ShadingParams {
        ShadingParams {
            resolution: [500.0, 1000.0],
            timings: BeamTimings {
                grow: 0.2,
                linger: 0.5,
                fade: 0.3,
            },
            style: BeamStyle::default(),
        }
    }

    /// A time in the middle of the linger phase.
    const LINGER: f32 = 0.45;

    #[test]
    fn smoothstep_handles_both_edge_orders() {
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < EPS);
        assert!((smoothstep(1.0, 0.0, 0.0) - 1.0).abs() < EPS);
        assert!(smoothstep(1.0, 0.0, 2.0).abs() < EPS);
        assert!((smoothstep(0.0, 1.0, 5.0) - 1.0).abs() < EPS);
    }

    #[test]
    fn beam_space_is_centered_and_height_scaled() {
        let res = [500.0, 1000.0];
        assert_eq!(to_beam_space([250.0, 500.0], res), [0.0, 0.0]);
        let corner = to_beam_space([500.0, 1000.0], res);
        assert!((corner[0] - 0.25).abs() < EPS);
        assert!((corner[1] - 0.5).abs() < EPS);
    }

    #[test]
    fn segment_distance_clamps_to_ends() {
        let beyond = segment_distance([2.0, 0.0], [0.0, 0.0], [1.0, 0.0], 1.0);
        assert!((beyond.h - 1.0).abs() < EPS);
        assert!((beyond.dist - 1.0).abs() < EPS);

        let behind = segment_distance([-1.0, 1.0], [0.0, 0.0], [1.0, 0.0], 1.0);
        assert!(behind.h.abs() < EPS);
        assert!((behind.dist - 2.0_f32.sqrt()).abs() < EPS);
    }

    #[test]
    fn zero_length_segment_measures_from_center() {
        let hit = segment_distance([3.0, 4.0], [0.0, 0.0], [0.0, 0.0], 0.0);
        assert!(hit.h.abs() < f32::EPSILON);
        assert!((hit.dist - 5.0).abs() < EPS);
    }

    #[test]
    fn centerline_pixel_gets_full_core_and_beam() {
        let l = layers([0.5, 0.0], [0.0, 0.0], [1.0, 0.0], LINGER, &params());
        assert_eq!(l.phase.phase, Phase::Linger);
        assert!(l.hit.dist.abs() < EPS);
        assert!((l.core - 1.0).abs() < EPS);
        assert!((l.beam - 1.0).abs() < EPS);

        let [.., alpha] = l.composite(&params().style);
        assert!((alpha - 1.0).abs() < EPS);
    }

    #[test]
    fn far_pixel_is_transparent() {
        let l = layers([0.5, 10.0], [0.0, 0.0], [1.0, 0.0], LINGER, &params());
        assert!(l.core.abs() < EPS);
        assert!(l.beam.abs() < EPS);
        assert_eq!(l.composite(&params().style), [0.0; 4]);
    }

    #[test]
    fn grow_phase_hides_the_unreached_part() {
        // At t = 0.1 the beam reaches halfway.
        let reached = layers([0.4, 0.0], [0.0, 0.0], [1.0, 0.0], 0.1, &params());
        let unreached = layers([0.9, 0.0], [0.0, 0.0], [1.0, 0.0], 0.1, &params());
        assert!((reached.beam - 1.0).abs() < EPS);
        assert!(unreached.beam.abs() < EPS);
        assert!((unreached.hit.dist - 0.4).abs() < EPS);
    }

    #[test]
    fn impact_is_dark_while_growing_and_lit_while_lingering() {
        let growing = layers([1.0, 0.0], [0.0, 0.0], [1.0, 0.0], 0.1, &params());
        assert!(growing.phase.impact_intensity.abs() < f32::EPSILON);

        let lingering = layers([1.0, 0.0], [0.0, 0.0], [1.0, 0.0], LINGER, &params());
        assert!(lingering.impact > 0.9);
        assert!(lingering.phase.impact_intensity > 0.7);
    }

    #[test]
    fn root_glow_ignores_beam_length() {
        let at_start = layers([0.0, 0.02], [0.0, 0.0], [1.0, 0.0], 0.0, &params());
        let later = layers([0.0, 0.02], [0.0, 0.0], [1.0, 0.0], LINGER, &params());
        assert!((at_start.root_alpha - later.root_alpha).abs() < EPS);
        assert!(at_start.root_alpha > 0.0);
    }

    #[test]
    fn root_fade_sweeps_from_base_to_tip() {
        // Halfway through fading: near the base is gone, the far end remains.
        let t = 0.2 + 0.5 + 0.15;
        let near_base = layers([0.1, 0.0], [0.0, 0.0], [1.0, 0.0], t, &params());
        let near_tip = layers([0.9, 0.0], [0.0, 0.0], [1.0, 0.0], t, &params());
        assert_eq!(near_base.phase.phase, Phase::Fade);
        assert!(near_base.root_fade.abs() < EPS);
        assert!((near_tip.root_fade - 1.0).abs() < EPS);
    }

    #[test]
    fn composite_is_normalized_by_total_alpha() {
        let l = layers([0.5, 0.0], [0.0, 0.0], [1.0, 0.0], LINGER, &params());
        let [r, g, b, _] = l.composite(&params().style);
        // The core is pure white and it dominates the only lit layer.
        assert!((r - 1.0).abs() < EPS);
        assert!((g - 1.0).abs() < EPS);
        assert!((b - 1.0).abs() < EPS);
    }

    #[test]
    fn shade_in_world_space_matches_beam_space() {
        let p = params();
        let world = shade([250.0, 500.0], [250.0, 500.0], [500.0, 500.0], LINGER, &p);
        let local = layers(
            [0.0, 0.0],
            [0.0, 0.0],
            [0.25, 0.0],
            LINGER,
            &p,
        )
        .composite(&p.style);
        for (a, b) in world.iter().zip(&local) {
            assert!((a - b).abs() < EPS);
        }
    }

    #[test]
    fn degenerate_beam_does_not_produce_nan() {
        let rgba = shade([250.0, 500.0], [250.0, 500.0], [250.0, 500.0], LINGER, &params());
        assert!(rgba.iter().all(|c| c.is_finite()));
        assert!(rgba[3] > 0.0);
    }
}
