//! Test doubles shared by the unit tests.

use std::cell::Cell;
use std::rc::Rc;

use crate::device::BeamDevice;
use crate::types::{BeamVertex, BlendState, FrameUniforms};

/// Install `env_logger` once so `RUST_LOG=trace cargo test` shows the
/// renderer's logging.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One call the renderer made on the device.
#[derive(Clone, Debug, PartialEq)]
pub enum DeviceEvent {
    Bind(FrameUniforms),
    Blend(Option<BlendState>),
    Draw(Vec<BeamVertex>),
    Dispose,
}

/// A [`BeamDevice`] that records every call instead of touching a GPU.
pub struct RecordingDevice {
    capacity: usize,
    events: Vec<DeviceEvent>,
    disposed: Rc<Cell<bool>>,
}

impl RecordingDevice {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            events: Vec::new(),
            disposed: Rc::new(Cell::new(false)),
        }
    }

    pub fn events(&self) -> &[DeviceEvent] {
        &self.events
    }

    pub fn draws(&self) -> impl Iterator<Item = &[BeamVertex]> {
        self.events.iter().filter_map(|event| match event {
            DeviceEvent::Draw(vertices) => Some(vertices.as_slice()),
            _ => None,
        })
    }

    pub fn draw_calls(&self) -> usize {
        self.draws().count()
    }

    pub fn submitted_vertices(&self) -> usize {
        self.draws().map(<[BeamVertex]>::len).sum()
    }

    /// Flag that flips once [`BeamDevice::dispose`] has run, observable after
    /// the device itself is gone.
    pub fn disposed_handle(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.disposed)
    }
}

impl BeamDevice for RecordingDevice {
    fn max_vertices(&self) -> usize {
        self.capacity
    }

    fn bind_program(&mut self, uniforms: &FrameUniforms) {
        self.events.push(DeviceEvent::Bind(*uniforms));
    }

    fn set_blend(&mut self, blend: Option<BlendState>) {
        self.events.push(DeviceEvent::Blend(blend));
    }

    fn draw_triangles(&mut self, vertices: &[BeamVertex]) {
        assert!(!vertices.is_empty(), "empty draw call");
        assert!(vertices.len() <= self.capacity, "draw call over capacity");
        self.events.push(DeviceEvent::Draw(vertices.to_vec()));
    }

    fn dispose(&mut self) {
        self.disposed.set(true);
        self.events.push(DeviceEvent::Dispose);
    }
}
