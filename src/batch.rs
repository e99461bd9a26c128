//! Fixed-capacity vertex batch with quad-atomic auto-flush.

use crate::types::{BeamVertex, QUAD_VERTICES};

/// Owned, append-only staging buffer for beam vertices.
///
/// The capacity is always a whole number of quads, so a beam's six vertices
/// never straddle two submissions.
#[derive(Debug)]
pub struct VertexBatch {
    vertices: Vec<BeamVertex>,
    capacity: usize,
}

impl VertexBatch {
    /// Create a batch holding at most `max_vertices`, rounded down to a
    /// multiple of [`QUAD_VERTICES`].
    ///
    /// Returns `None` if not even one quad fits.
    #[must_use]
    pub fn new(max_vertices: usize) -> Option<Self> {
        let capacity = max_vertices - max_vertices % QUAD_VERTICES;
        if capacity == 0 {
            return None;
        }
        Some(Self {
            vertices: Vec::with_capacity(capacity),
            capacity,
        })
    }

    /// Maximum number of vertices held before a flush.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Vertices waiting to be submitted.
    #[must_use]
    pub fn pending(&self) -> &[BeamVertex] {
        &self.vertices
    }

    /// Number of vertices waiting to be submitted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// `true` when nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Append one quad, first handing the pending vertices to `flush` if the
    /// quad would not fit.
    ///
    /// Returns `true` if a flush happened.
    pub fn append_quad<F>(&mut self, quad: &[BeamVertex; QUAD_VERTICES], flush: F) -> bool
    where
        F: FnOnce(&[BeamVertex]),
    {
        let flushed = self.vertices.len() + QUAD_VERTICES > self.capacity;
        if flushed {
            self.drain(flush);
        }
        self.vertices.extend_from_slice(quad);
        flushed
    }

    /// Hand all pending vertices to `submit` in one call and reset the
    /// cursor. Does nothing when the batch is empty.
    ///
    /// Returns the number of vertices submitted.
    pub fn drain<F>(&mut self, submit: F) -> usize
    where
        F: FnOnce(&[BeamVertex]),
    {
        let count = self.vertices.len();
        if count > 0 {
            submit(&self.vertices);
            self.vertices.clear();
        }
        count
    }

    /// Drop pending vertices without submitting them.
    pub fn reset(&mut self) {
        self.vertices.clear();
    }
}
