//! A ready-made field of beams fanning out from one origin.
//!
//! The scene owns the per-beam state the renderer deliberately does not:
//! target positions, per-beam time multipliers and the shared clock. A host
//! calls [`BeamScene::update`] once per frame with the frame's delta time,
//! [`BeamScene::touch`] when the pointer is pressed, and
//! [`BeamScene::render`] to submit the frame.

use rand::Rng;

use crate::device::BeamDevice;
use crate::error::ProtocolViolation;
use crate::geometry::orthographic;
use crate::renderer::BeamRenderer;

/// Default world width.
pub const WORLD_WIDTH: f32 = 500.0;
/// Default world height.
pub const WORLD_HEIGHT: f32 = 1000.0;
/// Default number of beams.
pub const DEFAULT_BEAMS: usize = 50;

/// One beam target with its own animation speed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BeamTarget {
    /// Where the beam ends, in world space.
    pub position: [f32; 2],
    /// Multiplier applied to the scene clock for this beam.
    pub time_scale: f32,
}

/// Beams from a fixed origin to a set of targets, all restarted together.
#[derive(Clone, Debug)]
pub struct BeamScene {
    world: [f32; 2],
    origin: [f32; 2],
    targets: Vec<BeamTarget>,
    /// Last touched point, drawn as an extra beam at the unscaled clock.
    focus: Option<[f32; 2]>,
    state_time: f32,
}

impl BeamScene {
    /// An empty scene over a `world` of the given size, with the origin at
    /// its center.
    #[must_use]
    pub fn new(world: [f32; 2]) -> Self {
        Self {
            world,
            origin: [world[0] / 2.0, world[1] / 2.0],
            targets: Vec::new(),
            focus: None,
            state_time: 0.0,
        }
    }

    /// A scene with `count` targets spread uniformly over the world, each
    /// animating 1x to 1.5x as fast as the scene clock.
    #[must_use]
    pub fn random<R: Rng>(world: [f32; 2], count: usize, rng: &mut R) -> Self {
        let mut scene = Self::new(world);
        scene.targets = (0..count)
            .map(|_| BeamTarget {
                position: [
                    rng.random_range(0.0..world[0]),
                    rng.random_range(0.0..world[1]),
                ],
                time_scale: rng.random_range(1.0..1.5),
            })
            .collect();
        scene
    }

    /// Add one target.
    pub fn push_target(&mut self, target: BeamTarget) {
        self.targets.push(target);
    }

    /// Current targets.
    #[must_use]
    pub fn targets(&self) -> &[BeamTarget] {
        &self.targets
    }

    /// Where every beam starts.
    #[must_use]
    pub fn origin(&self) -> [f32; 2] {
        self.origin
    }

    /// Move the shared origin.
    pub fn set_origin(&mut self, origin: [f32; 2]) {
        self.origin = origin;
    }

    /// The last touched point, if any.
    #[must_use]
    pub fn focus(&self) -> Option<[f32; 2]> {
        self.focus
    }

    /// Seconds since the last restart.
    #[must_use]
    pub fn state_time(&self) -> f32 {
        self.state_time
    }

    /// World size.
    #[must_use]
    pub fn world(&self) -> [f32; 2] {
        self.world
    }

    /// Y-down orthographic projection covering the world.
    #[must_use]
    pub fn projection(&self) -> [f32; 16] {
        orthographic(self.world[0], self.world[1], true)
    }

    /// Advance the scene clock by `delta` seconds.
    pub fn update(&mut self, delta: f32) {
        self.state_time += delta;
    }

    /// Aim the focus beam at `point` and restart every beam's animation.
    pub fn touch(&mut self, point: [f32; 2]) {
        self.focus = Some(point);
        self.state_time = 0.0;
    }

    /// Draw the whole scene as one frame.
    ///
    /// # Errors
    ///
    /// [`ProtocolViolation::BeginAlreadyCalled`] if `renderer` already has a
    /// frame open.
    pub fn render<D: BeamDevice>(
        &self,
        renderer: &mut BeamRenderer<D>,
    ) -> Result<(), ProtocolViolation> {
        renderer.set_projection(self.projection());
        renderer.set_resolution(self.world);
        renderer.begin()?;
        for target in &self.targets {
            renderer.draw(self.origin, target.position, self.state_time * target.time_scale)?;
        }
        if let Some(focus) = self.focus {
            renderer.draw(self.origin, focus, self.state_time)?;
        }
        renderer.end()
    }
}

impl Default for BeamScene {
    fn default() -> Self {
        Self::new([WORLD_WIDTH, WORLD_HEIGHT])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::{DeviceEvent, RecordingDevice};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn random_targets_stay_in_world() {
        let mut rng = StdRng::seed_from_u64(7);
        let scene = BeamScene::random([WORLD_WIDTH, WORLD_HEIGHT], DEFAULT_BEAMS, &mut rng);
        assert_eq!(scene.targets().len(), DEFAULT_BEAMS);
        assert_eq!(scene.origin(), [250.0, 500.0]);
        for target in scene.targets() {
            assert!((0.0..WORLD_WIDTH).contains(&target.position[0]));
            assert!((0.0..WORLD_HEIGHT).contains(&target.position[1]));
            assert!((1.0..1.5).contains(&target.time_scale));
        }
    }

    #[test]
    fn same_seed_same_scene() {
        let a = BeamScene::random([100.0, 100.0], 5, &mut StdRng::seed_from_u64(1));
        let b = BeamScene::random([100.0, 100.0], 5, &mut StdRng::seed_from_u64(1));
        assert_eq!(a.targets(), b.targets());
    }

    #[test]
    fn touch_restarts_the_clock() {
        let mut scene = BeamScene::default();
        scene.update(0.5);
        scene.update(0.25);
        assert!((scene.state_time() - 0.75).abs() < f32::EPSILON);

        scene.touch([600.0, 600.0]);
        assert_eq!(scene.focus(), Some([600.0, 600.0]));
        assert!(scene.state_time().abs() < f32::EPSILON);
    }

    #[test]
    fn render_draws_one_beam_per_target_with_scaled_time() {
        let mut scene = BeamScene::default();
        scene.push_target(BeamTarget {
            position: [100.0, 100.0],
            time_scale: 1.0,
        });
        scene.push_target(BeamTarget {
            position: [400.0, 900.0],
            time_scale: 1.5,
        });
        scene.update(0.4);

        let mut renderer = BeamRenderer::new(RecordingDevice::new(600), [1.0, 1.0]).unwrap();
        scene.render(&mut renderer).unwrap();
        assert!(!renderer.is_drawing());

        let device = renderer.device();
        let DeviceEvent::Bind(uniforms) = &device.events()[0] else {
            panic!("expected bind first, got {:?}", device.events()[0]);
        };
        assert_eq!(uniforms.resolution, [WORLD_WIDTH, WORLD_HEIGHT]);
        assert_eq!(uniforms.projection, scene.projection());

        let draw = device.draws().next().unwrap();
        assert_eq!(draw.len(), 12);
        assert_eq!(draw[0].start, [250.0, 500.0]);
        assert_eq!(draw[0].end, [100.0, 100.0]);
        assert!((draw[0].time - 0.4).abs() < 1e-6);
        assert_eq!(draw[6].end, [400.0, 900.0]);
        assert!((draw[6].time - 0.6).abs() < 1e-6);
    }

    #[test]
    fn focus_beam_is_drawn_after_targets() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut scene = BeamScene::random([WORLD_WIDTH, WORLD_HEIGHT], 3, &mut rng);
        scene.touch([600.0, 600.0]);
        scene.update(0.1);

        let mut renderer = BeamRenderer::new(RecordingDevice::new(600), [1.0, 1.0]).unwrap();
        scene.render(&mut renderer).unwrap();

        let draw = renderer.device().draws().next().unwrap();
        assert_eq!(draw.len(), 24);
        assert_eq!(draw[18].end, [600.0, 600.0]);
        assert!((draw[18].time - 0.1).abs() < 1e-6);
    }

    #[test]
    fn render_into_an_open_frame_fails() {
        let scene = BeamScene::default();
        let mut renderer = BeamRenderer::new(RecordingDevice::new(60), [1.0, 1.0]).unwrap();
        renderer.begin().unwrap();
        assert_eq!(scene.render(&mut renderer), Err(ProtocolViolation::BeginAlreadyCalled));
    }
}
