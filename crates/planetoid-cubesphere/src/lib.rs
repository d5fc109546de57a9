//! Cube-sphere meshing: six projected grid faces welded into one closed sphere.

mod cube_face;
mod projection;
mod sphere;
mod weld;

pub use cube_face::CubeFace;
pub use projection::{cube_point, grid_percent, unit_sphere_point};
pub use sphere::{MAX_RESOLUTION, SphereGenerator, SphereMesh, expected_triangle_count};
pub use weld::{QuantizedVec3, VertexWelder, WELD_SCALE_PER_RESOLUTION};
