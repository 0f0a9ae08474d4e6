//! # Scene Engine
//!
//! A minimal real-time 3D scene runtime: a transform-node hierarchy, a
//! perspective camera, Phong-shaded drawables in ordered groups, and a timed
//! update/draw loop.
//!
//! ## Features
//!
//! - **Scene Graph**: arena-backed nodes with parent/local transform frames
//! - **Camera**: perspective projection with aspect-ratio policies
//! - **Drawables**: trait-object drawables with a per-drawable position
//! - **Frame Loop**: timeline-driven update, draw and present with an optional frame budget
//! - **Headless Platform**: run and test the loop without a window or GPU
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! struct Demo {
//!     sphere: Option<DrawableId>,
//! }
//!
//! impl Application for Demo {
//!     fn initialize<H: Host, B: RenderBackend>(&mut self, layer: &mut ApplicationLayer<H, B>) -> Result<(), AppError> {
//!         self.sphere = Some(layer.add_sphere(Vec3::new(2.0, 1.0, -6.0), 75.0)?);
//!         Ok(())
//!     }
//!
//!     fn update<H: Host, B: RenderBackend>(&mut self, layer: &mut ApplicationLayer<H, B>, delta_time: f32) -> Result<(), AppError> {
//!         if let Some(id) = self.sphere {
//!             let slot = layer.drawable_mut(id)?;
//!             let position = slot.position() + Vec3::new(0.0, 0.0, -1.0) * delta_time;
//!             slot.update_position(position);
//!         }
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApplicationConfig::default();
//!     let host = HeadlessHost::from_config(&config.window);
//!     let mut engine = Engine::new(&config, Demo { sphere: None }, host, RecordingBackend::new())?;
//!     engine.run()?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod core;
pub mod foundation;
pub mod input;
pub mod platform;
pub mod render;
pub mod scene;

mod application;
mod engine;
mod layer;

pub use application::{AppError, Application};
pub use engine::{Engine, EngineError};
pub use layer::{ApplicationLayer, SPHERE_RINGS, SPHERE_SEGMENTS};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::{ApplicationConfig, Config},
        foundation::{
            math::{Deg, Mat4, Mat4Ext, Rad, Vec3},
            time::Timeline,
        },
        platform::{HeadlessHost, Host, HostEvent, RecordingBackend},
        render::{Color3, Color4, RenderBackend},
        scene::{Camera, DrawableId, NodeId, SceneGraph, TransformFrame},
        AppError, Application, ApplicationLayer, Engine, EngineError,
    };
}
