//! CPU evaluation of the layered noise elevation field.
//!
//! The same formula runs in the planet vertex shader; this copy serves
//! surface queries, tests and the CPU displacement path.

use glam::{DVec3, Vec3};
use noise::{NoiseFn, Perlin};

use crate::{NoiseLayer, ShapeConfig};

/// Permutation seed of the shared Perlin table.
const PERMUTATION_SEED: u32 = 0;

/// Evaluates elevation and displaced positions for a [`ShapeConfig`].
///
/// The Perlin permutation table is fixed; [`ShapeConfig::seed`] shifts the
/// sampling domain instead, which keeps CPU and GPU results aligned.
#[derive(Clone, Debug)]
pub struct Displacement {
    noise: Perlin,
}

impl Default for Displacement {
    fn default() -> Self {
        Self::new()
    }
}

impl Displacement {
    #[must_use]
    pub fn new() -> Self {
        Self {
            noise: Perlin::new(PERMUTATION_SEED),
        }
    }

    /// Contribution of one layer at `point`, ignoring its `enabled` flag.
    #[must_use]
    pub fn layer_value(&self, point: Vec3, seed: f32, layer: &NoiseLayer) -> f32 {
        layer_value_with(point, seed, layer, |p| self.noise.get(p.to_array()))
    }

    /// Sum of the enabled layers at `point` (a unit-sphere direction).
    #[must_use]
    pub fn elevation(&self, point: Vec3, shape: &ShapeConfig) -> f32 {
        elevation_with(point, shape, |p| self.noise.get(p.to_array()))
    }

    /// Final surface position for unit-sphere `point`:
    /// `point * radius * (1 + elevation)`.
    #[must_use]
    pub fn displace(&self, point: Vec3, shape: &ShapeConfig) -> Vec3 {
        point * shape.effective_radius() * (1.0 + self.elevation(point, shape))
    }
}

/// Layer formula over an arbitrary noise source returning roughly `[-1, 1]`.
///
/// Octave `k` samples `(point + center + seed) * base_roughness * roughness^k`
/// with amplitude `persistence^k`; the sum of `(n + 1) / 2 * amplitude` is
/// cut at `min_value` and scaled by `strength`.
pub fn layer_value_with(
    point: Vec3,
    seed: f32,
    layer: &NoiseLayer,
    mut sample: impl FnMut(DVec3) -> f64,
) -> f32 {
    let p: DVec3 = (point + layer.center + Vec3::splat(seed)).as_dvec3();

    let mut sum = 0.0;
    let mut frequency = f64::from(layer.base_roughness);
    let mut amplitude = 1.0;
    for _ in 0..layer.effective_octaves() {
        sum += (sample(p * frequency) + 1.0) * 0.5 * amplitude;
        frequency *= f64::from(layer.roughness);
        amplitude *= f64::from(layer.persistence);
    }

    let value = (sum - f64::from(layer.min_value)).max(0.0) * f64::from(layer.strength);
    value as f32
}

/// Sum of [`layer_value_with`] over the enabled layers of `shape`.
pub fn elevation_with(point: Vec3, shape: &ShapeConfig, mut sample: impl FnMut(DVec3) -> f64) -> f32 {
    shape
        .enabled_layers()
        .map(|layer| layer_value_with(point, shape.seed, layer, &mut sample))
        .sum()
}

/// One-off displacement with a fresh [`Displacement`].
#[must_use]
pub fn displace(point: Vec3, shape: &ShapeConfig) -> Vec3 {
    Displacement::new().displace(point, shape)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn sample_points() -> Vec<Vec3> {
        vec![
            Vec3::new(0.6, 0.8, 0.0),
            Vec3::new(0.0, 0.28, 0.96),
            Vec3::new(-0.48, 0.6, -0.64),
            Vec3::new(0.36, -0.48, 0.8),
            Vec3::new(-0.8, -0.36, 0.48),
        ]
    }

    /// A layer with no sea-level cutoff so every sample contributes.
    fn open_layer() -> NoiseLayer {
        NoiseLayer {
            min_value: 0.0,
            strength: 0.3,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_layers_gives_plain_sphere() {
        let shape = ShapeConfig::new(4.0, 10);
        let d = Displacement::new();
        for p in sample_points() {
            assert_eq!(d.elevation(p, &shape), 0.0);
            assert!((d.displace(p, &shape) - p * 4.0).length() < EPSILON);
        }
    }

    #[test]
    fn test_displacement_is_deterministic() {
        let shape = ShapeConfig {
            noise_layers: vec![open_layer(), NoiseLayer::default()],
            ..Default::default()
        };
        let a = Displacement::new();
        let b = Displacement::new();
        for p in sample_points() {
            assert_eq!(a.displace(p, &shape), b.displace(p, &shape));
            assert_eq!(a.displace(p, &shape), displace(p, &shape));
        }
    }

    #[test]
    fn test_disabled_layer_contributes_nothing() {
        let mut with_disabled = ShapeConfig::new(2.0, 10);
        with_disabled.add_layer(open_layer());
        with_disabled.add_layer(NoiseLayer {
            strength: 1.5,
            enabled: false,
            ..open_layer()
        });

        let mut only_first = ShapeConfig::new(2.0, 10);
        only_first.add_layer(open_layer());

        let d = Displacement::new();
        for p in sample_points() {
            assert_eq!(d.elevation(p, &with_disabled), d.elevation(p, &only_first));
        }
    }

    #[test]
    fn test_elevation_is_sum_of_layers() {
        let first = open_layer();
        let second = NoiseLayer {
            base_roughness: 2.5,
            center: Vec3::new(1.0, 2.0, 3.0),
            ..open_layer()
        };
        let mut shape = ShapeConfig::new(1.0, 10);
        shape.add_layer(first.clone());
        shape.add_layer(second.clone());

        let d = Displacement::new();
        for p in sample_points() {
            let expected = d.layer_value(p, 0.0, &first) + d.layer_value(p, 0.0, &second);
            assert!((d.elevation(p, &shape) - expected).abs() < EPSILON);
        }
    }

    #[test]
    fn test_elevation_never_negative() {
        let mut shape = ShapeConfig::new(1.0, 10);
        shape.add_layer(open_layer());
        shape.add_layer(NoiseLayer::default());
        let d = Displacement::new();
        for p in sample_points() {
            assert!(d.elevation(p, &shape) >= 0.0);
        }
    }

    #[test]
    fn test_high_min_value_flattens_layer() {
        let layer = NoiseLayer {
            min_value: 100.0,
            ..Default::default()
        };
        let d = Displacement::new();
        for p in sample_points() {
            assert_eq!(d.layer_value(p, 0.0, &layer), 0.0);
        }
    }

    #[test]
    fn test_zero_strength_flattens_layer() {
        let layer = NoiseLayer {
            strength: 0.0,
            ..open_layer()
        };
        let d = Displacement::new();
        for p in sample_points() {
            assert_eq!(d.layer_value(p, 0.0, &layer), 0.0);
        }
    }

    #[test]
    fn test_seed_shifts_the_field() {
        let layer = open_layer();
        let d = Displacement::new();
        let changed = sample_points()
            .into_iter()
            .any(|p| d.layer_value(p, 0.0, &layer) != d.layer_value(p, 37.5, &layer));
        assert!(changed);
    }

    #[test]
    fn test_constant_noise_sums_weighted_octaves() {
        let layer = NoiseLayer {
            octaves: 3,
            persistence: 0.5,
            min_value: 0.25,
            strength: 2.0,
            ..Default::default()
        };
        // n = 0 gives 0.5 per octave: 0.5 * (1 + 0.5 + 0.25) = 0.875.
        let value = layer_value_with(Vec3::X, 0.0, &layer, |_| 0.0);
        assert!((value - (0.875 - 0.25) * 2.0).abs() < EPSILON);

        // n = -1 zeroes every octave, leaving nothing above the cutoff.
        assert_eq!(layer_value_with(Vec3::X, 0.0, &layer, |_| -1.0), 0.0);
    }

    #[test]
    fn test_octaves_sample_offset_point_at_growing_frequency() {
        let layer = NoiseLayer {
            octaves: 3,
            base_roughness: 2.0,
            roughness: 3.0,
            center: Vec3::new(1.0, 0.0, -1.0),
            ..Default::default()
        };
        let mut samples = Vec::new();
        layer_value_with(Vec3::Y, 0.5, &layer, |p| {
            samples.push(p);
            0.0
        });

        let offset = DVec3::new(1.5, 1.5, -0.5);
        assert_eq!(samples, vec![offset * 2.0, offset * 6.0, offset * 18.0]);
    }

    #[test]
    fn test_octave_cap_applies_to_any_noise_source() {
        let layer = NoiseLayer {
            octaves: 40,
            ..Default::default()
        };
        let mut calls = 0;
        layer_value_with(Vec3::Z, 0.0, &layer, |_| {
            calls += 1;
            0.0
        });
        assert_eq!(calls, crate::MAX_OCTAVES);
    }

    #[test]
    fn test_elevation_with_skips_disabled_layers() {
        let mut shape = ShapeConfig::new(1.0, 10);
        shape.add_layer(NoiseLayer {
            octaves: 1,
            min_value: 0.0,
            strength: 1.0,
            ..Default::default()
        });
        shape.add_layer(NoiseLayer {
            octaves: 1,
            min_value: 0.0,
            strength: 5.0,
            enabled: false,
            ..Default::default()
        });
        assert!((elevation_with(Vec3::X, &shape, |_| 1.0) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_perlin_field_matches_generic_formula() {
        let perlin = Perlin::new(PERMUTATION_SEED);
        let layer = open_layer();
        let d = Displacement::new();
        for p in sample_points() {
            let generic = layer_value_with(p, 3.0, &layer, |q| perlin.get(q.to_array()));
            assert_eq!(d.layer_value(p, 3.0, &layer), generic);
        }
    }

    #[test]
    fn test_degenerate_radius_is_clamped() {
        let shape = ShapeConfig::new(0.0, 10);
        let p = Displacement::new().displace(Vec3::X, &shape);
        assert!(p.is_finite());
        assert!((p.length() - ShapeConfig::MIN_RADIUS).abs() < EPSILON);
    }
}
