//! Closed sphere meshes built from six welded cube faces.

use glam::Vec3;
use tracing::{debug, warn};

use crate::{CubeFace, VertexWelder, unit_sphere_point};

/// Largest accepted grid resolution. Higher values are clamped.
pub const MAX_RESOLUTION: u32 = 1024;

/// Welded triangle mesh of a (possibly displaced) sphere.
///
/// Every index is below `positions.len()`, and triangles wind
/// counter-clockwise seen from outside. `normals` holds one zeroed slot per
/// position; shading derives normals on the GPU.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SphereMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}

/// Triangle count of a sphere at `resolution`: `6 * (res - 1)² * 2`, or 0
/// below resolution 2.
#[must_use]
pub fn expected_triangle_count(resolution: u32) -> usize {
    if resolution < 2 {
        return 0;
    }
    let cells = (resolution as usize - 1).pow(2);
    6 * cells * 2
}

/// Reusable cube-sphere builder.
///
/// Owns the welder so repeated regenerations reuse its allocations; all
/// welder state is discarded at the start of each [`generate`](Self::generate).
#[derive(Debug, Default)]
pub struct SphereGenerator {
    welder: VertexWelder,
    face_indices: Vec<u32>,
}

impl SphereGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sphere with `resolution` grid points per face edge.
    ///
    /// `surface` maps each unit-sphere point to its final position (scale by
    /// radius, displace by terrain, ...). It must be deterministic: welding
    /// relies on shared edge points producing identical output.
    ///
    /// Resolutions below 2 yield an empty mesh; resolutions above
    /// [`MAX_RESOLUTION`] are clamped.
    pub fn generate(&mut self, resolution: u32, mut surface: impl FnMut(Vec3) -> Vec3) -> SphereMesh {
        self.welder.clear();
        self.face_indices.clear();

        if resolution < 2 {
            warn!(resolution, "Sphere resolution below 2, emitting empty mesh");
            return SphereMesh::default();
        }
        let res = if resolution > MAX_RESOLUTION {
            warn!(resolution, max = MAX_RESOLUTION, "Clamping sphere resolution");
            MAX_RESOLUTION
        } else {
            resolution
        };

        let mut indices = Vec::with_capacity(expected_triangle_count(res) * 3);

        for face in CubeFace::ALL {
            // Weld the whole face grid first so each point is evaluated once.
            self.face_indices.clear();
            for y in 0..res {
                for x in 0..res {
                    let position = surface(unit_sphere_point(face, res, x, y));
                    self.face_indices.push(self.welder.add_vertex(position, res));
                }
            }

            let at = |x: u32, y: u32| self.face_indices[(y * res + x) as usize];
            for y in 0..res - 1 {
                for x in 0..res - 1 {
                    let i0 = at(x, y);
                    let i1 = at(x + 1, y);
                    let i2 = at(x, y + 1);
                    let i3 = at(x + 1, y + 1);
                    indices.extend_from_slice(&[i0, i3, i2, i0, i1, i3]);
                }
            }
        }

        let (positions, normals) = self.welder.take_vertices();
        debug!(
            resolution = res,
            vertices = positions.len(),
            triangles = indices.len() / 3,
            "Generated cube-sphere"
        );

        SphereMesh {
            positions,
            normals,
            indices,
        }
    }
}
