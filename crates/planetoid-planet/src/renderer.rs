//! Planet and atmosphere drawing.

use std::path::PathBuf;

use planetoid_cubesphere::SphereGenerator;
use planetoid_render::{ShaderError, ShaderLibrary};
use planetoid_terrain::{Displacement, ShapeConfig};
use tracing::{info, warn};

use crate::pipeline::{PlanetBindings, SphereStyle, create_sphere_pipeline};
use crate::shaders::{ATMOSPHERE_SHADER, PLANET_SHADER, SHADER_SOURCES};
use crate::{
    FrameUniform, MAX_GPU_LAYERS, NoiseUniform, ScatteringUniform, SphereRenderer, dropped_gpu_layers,
};

#[derive(Debug, Clone, Default)]
pub struct PlanetRenderOptions {
    /// Read WGSL from this directory instead of the embedded copies.
    pub shader_dir: Option<PathBuf>,
    /// Displace vertices on the CPU when building the mesh.
    pub cpu_displacement: bool,
}

/// Owns the planet and atmosphere meshes, their pipelines and uniforms.
///
/// The shape last passed to [`rebuild`](Self::rebuild) is the one rendered;
/// edits to a working copy stay invisible until the next rebuild.
pub struct PlanetRenderer {
    bindings: PlanetBindings,
    planet_pipeline: wgpu::RenderPipeline,
    atmosphere_pipeline: wgpu::RenderPipeline,
    planet: SphereRenderer,
    atmosphere: SphereRenderer,
    generator: SphereGenerator,
    displacement: Displacement,
    applied: ShapeConfig,
    /// Noise block for `applied`, built once per rebuild.
    noise: NoiseUniform,
    cpu_displacement: bool,
}

impl PlanetRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        options: &PlanetRenderOptions,
    ) -> Result<Self, ShaderError> {
        let mut shaders = match &options.shader_dir {
            Some(dir) => ShaderLibrary::new().with_shader_dir(dir.clone()),
            None => ShaderLibrary::new(),
        };
        let planet_module = shaders.load(device, "planet", PLANET_SHADER, &SHADER_SOURCES)?;
        let atmosphere_module =
            shaders.load(device, "atmosphere", ATMOSPHERE_SHADER, &SHADER_SOURCES)?;

        let bindings = PlanetBindings::new(device);
        let planet_pipeline = create_sphere_pipeline(
            device,
            "planet-pipeline",
            &planet_module,
            &bindings,
            surface_format,
            SphereStyle::Opaque,
        );
        let atmosphere_pipeline = create_sphere_pipeline(
            device,
            "atmosphere-pipeline",
            &atmosphere_module,
            &bindings,
            surface_format,
            SphereStyle::Additive,
        );

        info!(
            cpu_displacement = options.cpu_displacement,
            "Planet renderer ready"
        );

        let applied = ShapeConfig::new(1.0, 0);
        let noise = NoiseUniform::from_shape(&applied, 0.0, !options.cpu_displacement);

        Ok(Self {
            bindings,
            planet_pipeline,
            atmosphere_pipeline,
            planet: SphereRenderer::new("planet"),
            atmosphere: SphereRenderer::new("atmosphere"),
            generator: SphereGenerator::new(),
            displacement: Displacement::new(),
            applied,
            noise,
            cpu_displacement: options.cpu_displacement,
        })
    }

    /// Regenerate both spheres for `shape` and make it the rendered shape.
    pub fn rebuild(&mut self, device: &wgpu::Device, shape: &ShapeConfig, atmosphere_thickness: f32) {
        let radius = shape.effective_radius();

        let planet_mesh = if self.cpu_displacement {
            let displacement = &self.displacement;
            self.generator
                .generate(shape.resolution, |p| displacement.displace(p, shape))
        } else {
            self.generator.generate(shape.resolution, |p| p * radius)
        };
        self.planet.upload(device, &planet_mesh);

        let shell_radius = radius * (1.0 + atmosphere_thickness);
        let shell_mesh = self
            .generator
            .generate(shape.resolution, |p| p * shell_radius);
        self.atmosphere.upload(device, &shell_mesh);

        if let Some(dropped) = dropped_gpu_layers(shape) {
            warn!(
                layers = shape.noise_layers.len(),
                max = MAX_GPU_LAYERS,
                dropped,
                "Only the first noise layers reach the GPU"
            );
        }
        self.noise = NoiseUniform::from_shape(shape, atmosphere_thickness, !self.cpu_displacement);
        self.applied = shape.clone();
        info!(
            resolution = shape.resolution,
            radius,
            layers = shape.noise_layers.len(),
            vertices = planet_mesh.vertex_count(),
            "Planet rebuilt"
        );
    }

    pub fn applied_shape(&self) -> &ShapeConfig {
        &self.applied
    }

    /// Upload this frame's uniforms.
    pub fn update(&self, queue: &wgpu::Queue, frame: &FrameUniform, scattering: &ScatteringUniform) {
        self.bindings.write(queue, frame, scattering, &self.noise);
    }

    pub fn draw_planet(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.planet_pipeline);
        pass.set_bind_group(0, &self.bindings.bind_group, &[]);
        self.planet.draw(pass);
    }

    pub fn draw_atmosphere(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.atmosphere_pipeline);
        pass.set_bind_group(0, &self.bindings.bind_group, &[]);
        self.atmosphere.draw(pass);
    }
}
