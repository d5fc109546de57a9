//! Parameters of one fractal noise layer.

use glam::Vec3;

/// Upper bound on octaves evaluated per layer, on CPU and GPU alike.
pub const MAX_OCTAVES: u32 = 10;

/// One layer of fractal noise contributing to planet elevation.
///
/// Octave `i` samples at frequency `base_roughness * roughness^i` with
/// amplitude `persistence^i`. The octave sum is shifted down by `min_value`,
/// floored at zero, and scaled by `strength`.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseLayer {
    pub strength: f32,
    /// Frequency multiplier between octaves.
    pub roughness: f32,
    /// Frequency of the first octave.
    pub base_roughness: f32,
    pub octaves: u32,
    /// Amplitude multiplier between octaves.
    pub persistence: f32,
    /// Octave sums below this contribute nothing (sea level).
    pub min_value: f32,
    /// Offset applied to the sample point before scaling.
    pub center: Vec3,
    pub enabled: bool,
}

impl Default for NoiseLayer {
    fn default() -> Self {
        Self {
            strength: 0.5,
            roughness: 2.1,
            base_roughness: 1.0,
            octaves: 5,
            persistence: 0.6,
            min_value: 1.1,
            center: Vec3::ZERO,
            enabled: true,
        }
    }
}

impl NoiseLayer {
    /// Octave count actually evaluated.
    #[must_use]
    pub fn effective_octaves(&self) -> u32 {
        self.octaves.min(MAX_OCTAVES)
    }
}
