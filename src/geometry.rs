//! CPU-side geometry: beam bounding quads and the 2D camera matrix.

use crate::types::{BeamVertex, QUAD_VERTICES};

/// Build the six vertices of the padded, axis-aligned quad that bounds the
/// segment `start..end`.
///
/// Corner order is `(x1,y1) (x2,y1) (x1,y2)` then `(x2,y1) (x1,y2) (x2,y2)`,
/// where `x1 = min(start.x, end.x) - pad` and `x2 = max(start.x, end.x) + pad`
/// (same for y).
#[must_use]
pub fn beam_quad(
    start: [f32; 2],
    end: [f32; 2],
    time: f32,
    pad: f32,
) -> [BeamVertex; QUAD_VERTICES] {
    let x1 = start[0].min(end[0]) - pad;
    let x2 = start[0].max(end[0]) + pad;
    let y1 = start[1].min(end[1]) - pad;
    let y2 = start[1].max(end[1]) + pad;

    let corner = |x: f32, y: f32| BeamVertex {
        position: [x, y],
        start,
        end,
        time,
    };

    [
        corner(x1, y1),
        corner(x2, y1),
        corner(x1, y2),
        corner(x2, y1),
        corner(x1, y2),
        corner(x2, y2),
    ]
}

/// Column-major orthographic projection mapping `[0, width] x [0, height]`
/// onto clip space.
///
/// With `y_down` the world origin is the top-left corner, matching screen and
/// pointer coordinates.
#[must_use]
pub fn orthographic(width: f32, height: f32, y_down: bool) -> [f32; 16] {
    let sx = 2.0 / width;
    let (sy, ty) = if y_down {
        (-2.0 / height, 1.0)
    } else {
        (2.0 / height, -1.0)
    };

    #[rustfmt::skip]
    let matrix = [
        sx,   0.0,  0.0, 0.0,
        0.0,  sy,   0.0, 0.0,
        0.0,  0.0, -1.0, 0.0,
        -1.0, ty,   0.0, 1.0,
    ];
    matrix
}
