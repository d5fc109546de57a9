//! The planet's shape: radius, mesh resolution, seed and ordered noise layers.

use tracing::debug;

use crate::NoiseLayer;

/// Complete description of the planet surface.
///
/// Layer order matters: layers are summed in order and only the first eight
/// reach the GPU.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeConfig {
    pub radius: f32,
    /// Grid points per cube-face edge.
    pub resolution: u32,
    pub noise_layers: Vec<NoiseLayer>,
    /// Shifts every layer's sample domain.
    pub seed: f32,
}

impl Default for ShapeConfig {
    /// Radius 4, resolution 50, one default ("ocean") layer.
    fn default() -> Self {
        Self {
            radius: 4.0,
            resolution: 50,
            noise_layers: vec![NoiseLayer::default()],
            seed: 0.0,
        }
    }
}

impl ShapeConfig {
    /// Smallest radius used for geometry; anything below (or NaN) is clamped.
    pub const MIN_RADIUS: f32 = 1e-3;

    /// A shape with no noise layers.
    #[must_use]
    pub fn new(radius: f32, resolution: u32) -> Self {
        Self {
            radius,
            resolution,
            noise_layers: Vec::new(),
            seed: 0.0,
        }
    }

    /// Radius clamped to [`MIN_RADIUS`](Self::MIN_RADIUS).
    #[must_use]
    pub fn effective_radius(&self) -> f32 {
        if self.radius.is_finite() && self.radius > Self::MIN_RADIUS {
            self.radius
        } else {
            Self::MIN_RADIUS
        }
    }

    pub fn add_layer(&mut self, layer: NoiseLayer) {
        self.noise_layers.push(layer);
        debug!(count = self.noise_layers.len(), "Added noise layer");
    }

    /// Remove and return the layer at `index`, if it exists.
    pub fn remove_layer(&mut self, index: usize) -> Option<NoiseLayer> {
        (index < self.noise_layers.len()).then(|| self.noise_layers.remove(index))
    }

    /// Swap two layers. Returns `false` (and does nothing) if either index is
    /// out of range or they are equal.
    pub fn swap_layers(&mut self, a: usize, b: usize) -> bool {
        let len = self.noise_layers.len();
        if a == b || a >= len || b >= len {
            return false;
        }
        self.noise_layers.swap(a, b);
        true
    }

    pub fn enabled_layers(&self) -> impl Iterator<Item = &NoiseLayer> {
        self.noise_layers.iter().filter(|layer| layer.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(strength: f32) -> NoiseLayer {
        NoiseLayer {
            strength,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_has_ocean_layer() {
        let shape = ShapeConfig::default();
        assert_eq!(shape.radius, 4.0);
        assert_eq!(shape.resolution, 50);
        assert_eq!(shape.noise_layers, vec![NoiseLayer::default()]);
    }

    #[test]
    fn test_effective_radius_clamps_degenerate_values() {
        for radius in [0.0, -3.0, f32::NAN, f32::NEG_INFINITY] {
            let shape = ShapeConfig::new(radius, 10);
            assert_eq!(shape.effective_radius(), ShapeConfig::MIN_RADIUS);
        }
        assert_eq!(ShapeConfig::new(2.5, 10).effective_radius(), 2.5);
    }

    #[test]
    fn test_remove_layer() {
        let mut shape = ShapeConfig::new(1.0, 4);
        shape.add_layer(layer(0.1));
        shape.add_layer(layer(0.2));
        assert_eq!(shape.remove_layer(0).map(|l| l.strength), Some(0.1));
        assert_eq!(shape.noise_layers.len(), 1);
        assert!(shape.remove_layer(5).is_none());
    }

    #[test]
    fn test_swap_layers_reorders() {
        let mut shape = ShapeConfig::new(1.0, 4);
        for s in [0.1, 0.2, 0.3] {
            shape.add_layer(layer(s));
        }
        assert!(shape.swap_layers(0, 2));
        let order: Vec<f32> = shape.noise_layers.iter().map(|l| l.strength).collect();
        assert_eq!(order, vec![0.3, 0.2, 0.1]);
        assert!(!shape.swap_layers(1, 1));
        assert!(!shape.swap_layers(0, 3));
    }

    #[test]
    fn test_enabled_layers_skips_disabled() {
        let mut shape = ShapeConfig::new(1.0, 4);
        shape.add_layer(layer(0.1));
        shape.add_layer(NoiseLayer {
            enabled: false,
            ..layer(0.2)
        });
        let enabled: Vec<f32> = shape.enabled_layers().map(|l| l.strength).collect();
        assert_eq!(enabled, vec![0.1]);
    }
}
