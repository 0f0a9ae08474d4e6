//! Rendering module
//!
//! Backend-agnostic rendering pieces: mesh data and handles, colors, the
//! Phong shading model and the [`Primitive`] drawable. GPU work goes through
//! the [`RenderBackend`] trait.

pub mod backend;
pub mod color;
pub mod mesh;
pub mod phong;
pub mod primitive;

pub use backend::{BackendResult, RenderBackend};
pub use color::{Color3, Color4};
pub use mesh::{Mesh, MeshData, MeshId, MeshVertex};
pub use phong::{PhongShader, PhongUniforms};
pub use primitive::Primitive;

use bitflags::bitflags;
use thiserror::Error;

use crate::scene::SceneError;

bitflags! {
    /// Framebuffer attachments to clear
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u8 {
        /// Color attachment
        const COLOR = 0b01;
        /// Depth attachment
        const DEPTH = 0b10;
    }
}

/// Rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// Rendering context could not be created
    #[error("Context creation failed: {0}")]
    ContextCreation(String),

    /// Backend rejected a mesh upload
    #[error("Mesh compilation failed: {0}")]
    MeshCompilation(String),

    /// Mesh data is malformed
    #[error("Invalid mesh data: {0}")]
    InvalidMesh(String),

    /// A draw call failed
    #[error("Draw failed: {0}")]
    Draw(String),

    /// Scene lookup failed during traversal
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}
