//! Backend abstraction traits for the rendering system
//!
//! A backend owns GPU resources. The core only uploads meshes once, clears
//! the framebuffer and issues one draw per drawable per frame.

use crate::render::{ClearFlags, Mesh, MeshData, MeshId, PhongUniforms, RenderError};

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Main rendering backend trait
pub trait RenderBackend {
    /// Upload mesh data and return a handle to the GPU copy
    fn compile_mesh(&mut self, data: &MeshData) -> BackendResult<MeshId>;

    /// Clear framebuffer attachments
    fn clear(&mut self, flags: ClearFlags);

    /// Draw `mesh` with Phong shading
    fn draw(&mut self, mesh: &Mesh, uniforms: &PhongUniforms) -> BackendResult<()>;
}
