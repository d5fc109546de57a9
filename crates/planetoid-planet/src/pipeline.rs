//! Uniform buffers, the shared bind group, and the two render pipelines.

use planetoid_render::{DepthBuffer, PositionVertex};
use wgpu::util::DeviceExt;

use crate::{FrameUniform, NoiseUniform, ScatteringUniform};

/// Uniform buffers bound at group 0: frame (0), scattering (1), noise (2).
pub struct PlanetBindings {
    pub layout: wgpu::BindGroupLayout,
    pub bind_group: wgpu::BindGroup,
    pub frame_buffer: wgpu::Buffer,
    pub scattering_buffer: wgpu::Buffer,
    pub noise_buffer: wgpu::Buffer,
}

fn uniform_entry(binding: u32, size: usize) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: std::num::NonZeroU64::new(size as u64),
        },
        count: None,
    }
}

fn uniform_buffer(device: &wgpu::Device, label: &str, contents: &[u8]) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

impl PlanetBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("planet-bgl"),
            entries: &[
                uniform_entry(0, std::mem::size_of::<FrameUniform>()),
                uniform_entry(1, std::mem::size_of::<ScatteringUniform>()),
                uniform_entry(2, std::mem::size_of::<NoiseUniform>()),
            ],
        });

        let frame_buffer = uniform_buffer(
            device,
            "frame-uniform",
            bytemuck::bytes_of(&<FrameUniform as bytemuck::Zeroable>::zeroed()),
        );
        let scattering_buffer = uniform_buffer(
            device,
            "scattering-uniform",
            bytemuck::bytes_of(&<ScatteringUniform as bytemuck::Zeroable>::zeroed()),
        );
        let noise_buffer = uniform_buffer(
            device,
            "noise-uniform",
            bytemuck::bytes_of(&<NoiseUniform as bytemuck::Zeroable>::zeroed()),
        );

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("planet-bg"),
            layout: &layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: frame_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: scattering_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: noise_buffer.as_entire_binding(),
                },
            ],
        });

        Self {
            layout,
            bind_group,
            frame_buffer,
            scattering_buffer,
            noise_buffer,
        }
    }

    pub fn write(
        &self,
        queue: &wgpu::Queue,
        frame: &FrameUniform,
        scattering: &ScatteringUniform,
        noise: &NoiseUniform,
    ) {
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(frame));
        queue.write_buffer(&self.scattering_buffer, 0, bytemuck::bytes_of(scattering));
        queue.write_buffer(&self.noise_buffer, 0, bytemuck::bytes_of(noise));
    }
}

/// How a sphere pipeline blends and culls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SphereStyle {
    /// Back-face culled, depth written.
    Opaque,
    /// Both faces, added onto the target, depth tested but not written.
    Additive,
}

impl SphereStyle {
    fn blend(self) -> Option<wgpu::BlendState> {
        match self {
            Self::Opaque => None,
            Self::Additive => {
                let add = wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                };
                Some(wgpu::BlendState {
                    color: add,
                    alpha: add,
                })
            }
        }
    }

    fn cull_mode(self) -> Option<wgpu::Face> {
        match self {
            Self::Opaque => Some(wgpu::Face::Back),
            Self::Additive => None,
        }
    }

    fn depth_state(self) -> wgpu::DepthStencilState {
        match self {
            Self::Opaque => DepthBuffer::opaque_state(),
            Self::Additive => DepthBuffer::overlay_state(),
        }
    }
}

/// Build a sphere pipeline from a module exposing `vs_main` and `fs_main`.
pub fn create_sphere_pipeline(
    device: &wgpu::Device,
    label: &str,
    module: &wgpu::ShaderModule,
    bindings: &PlanetBindings,
    surface_format: wgpu::TextureFormat,
    style: SphereStyle,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[&bindings.layout],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module,
            entry_point: Some("vs_main"),
            buffers: &[PositionVertex::layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: style.cull_mode(),
            ..Default::default()
        },
        depth_stencil: Some(style.depth_state()),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: style.blend(),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview_mask: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_style() {
        let style = SphereStyle::Opaque;
        assert!(style.blend().is_none());
        assert_eq!(style.cull_mode(), Some(wgpu::Face::Back));
        assert!(style.depth_state().depth_write_enabled);
    }

    #[test]
    fn test_additive_style_blends_one_one_without_depth_write() {
        let style = SphereStyle::Additive;
        let blend = style.blend().unwrap();
        assert_eq!(blend.color.src_factor, wgpu::BlendFactor::One);
        assert_eq!(blend.color.dst_factor, wgpu::BlendFactor::One);
        assert_eq!(blend.color.operation, wgpu::BlendOperation::Add);
        assert!(style.cull_mode().is_none());
        let depth = style.depth_state();
        assert!(!depth.depth_write_enabled);
        assert_eq!(depth.depth_compare, DepthBuffer::COMPARE_FUNCTION);
    }
}
