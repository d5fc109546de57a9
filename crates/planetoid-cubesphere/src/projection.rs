//! Grid-to-cube and cube-to-sphere mapping for a single face.
//!
//! Grid coordinates `(x, y)` run over `0..resolution` along
//! [`CubeFace::axis_a`] and [`CubeFace::axis_b`]; the outermost rows land on the
//! cube edges so adjacent faces share their boundary points exactly.

use glam::Vec3;

use crate::CubeFace;

/// Fraction of the way across a face for grid index `i`, in `[0, 1]`.
///
/// A resolution below 2 has no span; the divisor is clamped so the result
/// stays finite.
#[inline]
#[must_use]
pub fn grid_percent(i: u32, resolution: u32) -> f32 {
    let span = resolution.saturating_sub(1).max(1);
    i as f32 / span as f32
}

/// Point on the surface of the `[-1, 1]` cube for grid cell `(x, y)` of `face`.
///
/// `up + (px - 0.5) * 2 * axis_a + (py - 0.5) * 2 * axis_b`
#[inline]
#[must_use]
pub fn cube_point(face: CubeFace, resolution: u32, x: u32, y: u32) -> Vec3 {
    let px = grid_percent(x, resolution);
    let py = grid_percent(y, resolution);
    face.normal() + (px - 0.5) * 2.0 * face.axis_a() + (py - 0.5) * 2.0 * face.axis_b()
}

/// [`cube_point`] projected onto the unit sphere by normalization.
#[inline]
#[must_use]
pub fn unit_sphere_point(face: CubeFace, resolution: u32, x: u32, y: u32) -> Vec3 {
    cube_point(face, resolution, x, y).normalize()
}
