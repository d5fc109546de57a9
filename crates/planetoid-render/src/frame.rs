//! Per-frame command encoding.
//!
//! [`FrameEncoder`] owns the command encoder and the acquired surface texture
//! for one frame; [`RenderPassBuilder`] describes how a pass treats the color
//! and depth attachments.

use crate::DepthBuffer;

#[derive(Debug, Clone, Copy)]
enum ColorLoad {
    Clear(wgpu::Color),
    Keep,
}

/// Declarative render pass configuration.
#[derive(Debug, Clone, Copy)]
pub struct RenderPassBuilder {
    color: ColorLoad,
    clear_depth: bool,
    label: Option<&'static str>,
}

impl Default for RenderPassBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPassBuilder {
    /// Clears color to black and depth to the reverse-Z far plane.
    pub fn new() -> Self {
        Self {
            color: ColorLoad::Clear(wgpu::Color::BLACK),
            clear_depth: true,
            label: None,
        }
    }

    pub fn clear_color(mut self, rgb: [f32; 3]) -> Self {
        self.color = ColorLoad::Clear(wgpu::Color {
            r: f64::from(rgb[0]),
            g: f64::from(rgb[1]),
            b: f64::from(rgb[2]),
            a: 1.0,
        });
        self
    }

    /// Draw on top of what earlier passes produced this frame.
    pub fn load_existing(mut self) -> Self {
        self.color = ColorLoad::Keep;
        self.clear_depth = false;
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    fn begin<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
        color_view: &'e wgpu::TextureView,
        depth_view: &'e wgpu::TextureView,
    ) -> wgpu::RenderPass<'e> {
        let load = match self.color {
            ColorLoad::Clear(color) => wgpu::LoadOp::Clear(color),
            ColorLoad::Keep => wgpu::LoadOp::Load,
        };
        let depth_load = if self.clear_depth {
            wgpu::LoadOp::Clear(DepthBuffer::CLEAR_VALUE)
        } else {
            wgpu::LoadOp::Load
        };

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: self.label,
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: depth_load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

/// Command encoding for one frame, submitted and presented by
/// [`submit`](Self::submit) or on drop.
pub struct FrameEncoder<'q> {
    encoder: Option<wgpu::CommandEncoder>,
    queue: &'q wgpu::Queue,
    surface_texture: Option<wgpu::SurfaceTexture>,
    surface_view: wgpu::TextureView,
}

impl<'q> FrameEncoder<'q> {
    pub fn new(
        device: &wgpu::Device,
        queue: &'q wgpu::Queue,
        surface_texture: wgpu::SurfaceTexture,
    ) -> Self {
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame-encoder"),
        });
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            encoder: Some(encoder),
            queue,
            surface_texture: Some(surface_texture),
            surface_view,
        }
    }

    /// Begin a pass targeting the surface and `depth`. `None` after submit.
    pub fn begin_render_pass<'a>(
        &'a mut self,
        builder: &RenderPassBuilder,
        depth: &'a DepthBuffer,
    ) -> Option<wgpu::RenderPass<'a>> {
        let encoder = self.encoder.as_mut()?;
        Some(builder.begin(encoder, &self.surface_view, &depth.view))
    }

    pub fn submit(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        if let (Some(encoder), Some(surface_texture)) =
            (self.encoder.take(), self.surface_texture.take())
        {
            self.queue.submit([encoder.finish()]);
            surface_texture.present();
        }
    }
}

impl Drop for FrameEncoder<'_> {
    fn drop(&mut self) {
        if self.encoder.is_some() {
            log::warn!("FrameEncoder dropped without submit(), submitting");
            self.finish();
        }
    }
}
