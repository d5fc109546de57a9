//! wgpu plumbing shared by the planet renderers: device and surface, depth
//! buffer, per-frame encoding, mesh buffers, shader loading and GPU error
//! accounting.

pub mod buffer;
pub mod depth;
pub mod error_monitor;
pub mod frame;
pub mod gpu;
pub mod shader;

pub use buffer::{BufferAllocator, MeshBuffer, PositionVertex};
pub use depth::DepthBuffer;
pub use error_monitor::GpuErrorMonitor;
pub use frame::{FrameEncoder, RenderPassBuilder};
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use shader::{
    DirIncludes, EmbeddedIncludes, IncludeSource, ShaderError, ShaderLibrary, preprocess_includes,
};
