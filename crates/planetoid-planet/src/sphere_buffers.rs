//! GPU ownership of generated sphere meshes.

use planetoid_cubesphere::SphereMesh;
use planetoid_render::{BufferAllocator, MeshBuffer, PositionVertex};
use tracing::debug;

/// Exclusive owner of one sphere's vertex and index buffers.
///
/// Uploading a new mesh destroys the previous buffers first; dropping the
/// owner releases whatever it still holds.
pub struct SphereRenderer {
    label: &'static str,
    buffers: Option<MeshBuffer>,
}

impl SphereRenderer {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            buffers: None,
        }
    }

    /// Replace the GPU copy with `mesh`. An empty mesh leaves nothing to draw.
    pub fn upload(&mut self, device: &wgpu::Device, mesh: &SphereMesh) {
        self.release();
        if mesh.is_empty() {
            debug!(label = self.label, "Empty sphere mesh, nothing uploaded");
            return;
        }

        let vertices: Vec<PositionVertex> = mesh
            .positions
            .iter()
            .map(|p| PositionVertex {
                position: p.to_array(),
            })
            .collect();
        self.buffers =
            Some(BufferAllocator::new(device).create_mesh(self.label, &vertices, &mesh.indices));
        debug!(
            label = self.label,
            vertices = vertices.len(),
            indices = mesh.indices.len(),
            "Uploaded sphere"
        );
    }

    /// Destroy and drop the current buffers, if any.
    pub fn release(&mut self) {
        if let Some(old) = self.buffers.take() {
            old.destroy();
        }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if let Some(buffers) = &self.buffers {
            buffers.draw(pass);
        }
    }

    pub fn index_count(&self) -> u32 {
        self.buffers.as_ref().map_or(0, |b| b.index_count)
    }

    pub fn is_loaded(&self) -> bool {
        self.buffers.is_some()
    }
}

impl Drop for SphereRenderer {
    fn drop(&mut self) {
        self.release();
    }
}
