//! Application trait and lifecycle management

use thiserror::Error;

use crate::engine::EngineError;
use crate::layer::ApplicationLayer;
use crate::platform::Host;
use crate::render::RenderBackend;
use crate::scene::SceneError;

/// Application lifecycle trait
///
/// Implement this trait to drive a scene from the frame loop. The engine
/// calls [`Application::update`] once per iteration, before the frame is
/// drawn.
pub trait Application {
    /// Initialize the application
    ///
    /// Called once after the application layer is built. Use this to add
    /// the initial drawables.
    fn initialize<H: Host, B: RenderBackend>(&mut self, layer: &mut ApplicationLayer<H, B>) -> Result<(), AppError>;

    /// Update the application
    ///
    /// # Arguments
    /// * `layer` - Scene, camera and timing access
    /// * `delta_time` - Duration of the previous frame in seconds
    fn update<H: Host, B: RenderBackend>(
        &mut self,
        layer: &mut ApplicationLayer<H, B>,
        delta_time: f32,
    ) -> Result<(), AppError>;

    /// Cleanup the application
    ///
    /// Called once when the loop has finished.
    fn cleanup<H: Host, B: RenderBackend>(&mut self, _layer: &mut ApplicationLayer<H, B>) {}
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Scene access failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}
