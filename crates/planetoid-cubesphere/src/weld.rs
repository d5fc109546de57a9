//! Vertex welding by quantized position.
//!
//! Adjacent cube faces generate their shared edge and corner points
//! independently. Rounding every position onto an integer grid whose pitch
//! scales with the mesh resolution maps those near-coincident points to the
//! same key, and the welder hands back one shared index for all of them.

use glam::Vec3;
use rustc_hash::FxHashMap;

/// Quantization steps per unit of distance, per unit of resolution.
pub const WELD_SCALE_PER_RESOLUTION: f32 = 4.0;

/// Integer grid key for a position: `round(p * resolution * 4)` per axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct QuantizedVec3 {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl QuantizedVec3 {
    /// Quantize `position` at the tolerance implied by `resolution`.
    #[must_use]
    pub fn new(position: Vec3, resolution: u32) -> Self {
        let scale = resolution as f32 * WELD_SCALE_PER_RESOLUTION;
        let q = (position * scale).round();
        Self {
            x: q.x as i32,
            y: q.y as i32,
            z: q.z as i32,
        }
    }
}

/// Deduplicating vertex store used while building one mesh.
///
/// Positions and their (zeroed) normal slots are appended in first-seen
/// order. Call [`clear`](Self::clear) before every rebuild.
#[derive(Debug, Default)]
pub struct VertexWelder {
    lookup: FxHashMap<QuantizedVec3, u32>,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
}

impl VertexWelder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the vertex at `position`, inserting it if no vertex with the
    /// same quantized key exists yet.
    pub fn add_vertex(&mut self, position: Vec3, resolution: u32) -> u32 {
        let key = QuantizedVec3::new(position, resolution);
        if let Some(&index) = self.lookup.get(&key) {
            return index;
        }

        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.normals.push(Vec3::ZERO);
        self.lookup.insert(key, index);
        index
    }

    /// Drop every stored vertex and key.
    pub fn clear(&mut self) {
        self.lookup.clear();
        self.positions.clear();
        self.normals.clear();
    }

    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Move the accumulated positions and normals out, leaving the welder empty.
    pub fn take_vertices(&mut self) -> (Vec<Vec3>, Vec<Vec3>) {
        self.lookup.clear();
        (
            std::mem::take(&mut self.positions),
            std::mem::take(&mut self.normals),
        )
    }
}
