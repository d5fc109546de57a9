//! Per-frame and per-shape uniform blocks shared by both pipelines.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use planetoid_terrain::{NoiseLayer, ShapeConfig};

/// Noise layers evaluated on the GPU. Further layers are ignored there.
pub const MAX_GPU_LAYERS: usize = 8;

/// Camera and model transforms.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
}

static_assertions::assert_eq_size!(FrameUniform, [u8; 128]);

impl FrameUniform {
    pub fn new(view_proj: Mat4, model: Mat4) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
        }
    }
}

/// One entry of the `layers` array in `NoiseParams`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct NoiseLayerUniform {
    pub center: [f32; 3],
    pub strength: f32,
    pub roughness: f32,
    pub base_roughness: f32,
    pub persistence: f32,
    pub min_value: f32,
    pub octaves: u32,
    pub enabled: u32,
    pub _padding: [u32; 2],
}

static_assertions::assert_eq_size!(NoiseLayerUniform, [u8; 48]);

impl From<&NoiseLayer> for NoiseLayerUniform {
    fn from(layer: &NoiseLayer) -> Self {
        Self {
            center: layer.center.to_array(),
            strength: layer.strength,
            roughness: layer.roughness,
            base_roughness: layer.base_roughness,
            persistence: layer.persistence,
            min_value: layer.min_value,
            octaves: layer.effective_octaves(),
            enabled: u32::from(layer.enabled),
            _padding: [0; 2],
        }
    }
}

/// Displacement inputs for the planet vertex stage.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct NoiseUniform {
    pub layers: [NoiseLayerUniform; MAX_GPU_LAYERS],
    pub layer_count: u32,
    pub seed: f32,
    /// Elevation mapped to the top of the colour ramp.
    pub max_elevation: f32,
    pub radius: f32,
    /// Non-zero when vertices arrive undisplaced.
    pub displace_on_gpu: u32,
    pub _padding: [u32; 3],
}

static_assertions::assert_eq_size!(NoiseUniform, [u8; 416]);

/// Layers of `shape` beyond [`MAX_GPU_LAYERS`], if any.
pub fn dropped_gpu_layers(shape: &ShapeConfig) -> Option<usize> {
    shape
        .noise_layers
        .len()
        .checked_sub(MAX_GPU_LAYERS)
        .filter(|&extra| extra > 0)
}

impl NoiseUniform {
    pub fn from_shape(shape: &ShapeConfig, max_elevation: f32, displace_on_gpu: bool) -> Self {
        let mut layers = [NoiseLayerUniform::default(); MAX_GPU_LAYERS];
        for (slot, layer) in layers.iter_mut().zip(&shape.noise_layers) {
            *slot = NoiseLayerUniform::from(layer);
        }

        Self {
            layers,
            layer_count: shape.noise_layers.len().min(MAX_GPU_LAYERS) as u32,
            seed: shape.seed,
            max_elevation,
            radius: shape.effective_radius(),
            displace_on_gpu: u32::from(displace_on_gpu),
            _padding: [0; 3],
        }
    }
}
