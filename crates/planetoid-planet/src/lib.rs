//! Planet rendering: scattering derivation, GPU uniforms, owned sphere
//! buffers, and the planet/atmosphere pipelines.

mod pipeline;
mod renderer;
mod scatter;
mod shaders;
mod sphere_buffers;
mod uniforms;

pub use pipeline::{PlanetBindings, SphereStyle, create_sphere_pipeline};
pub use renderer::{PlanetRenderOptions, PlanetRenderer};
pub use scatter::{
    REFERENCE_WAVELENGTH, SCALE_DEPTH, ScatteringParams, ScatteringSettings, ScatteringUniform,
};
pub use shaders::{ATMOSPHERE_SHADER, PLANET_SHADER, SHADER_SOURCES};
pub use sphere_buffers::SphereRenderer;
pub use uniforms::{
    FrameUniform, MAX_GPU_LAYERS, NoiseLayerUniform, NoiseUniform, dropped_gpu_layers,
};
