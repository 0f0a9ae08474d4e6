//! Core engine implementation
//!
//! [`Engine`] pairs an [`Application`] with its [`ApplicationLayer`] and runs
//! the frame loop: read the previous frame duration, update the
//! application, request a redraw, then let the layer draw and poll events.
//! An optional frame budget ends the loop after a fixed number of
//! iterations.

use thiserror::Error;

use crate::application::Application;
use crate::config::ConfigError;
use crate::core::ApplicationConfig;
use crate::foundation::time::TimelineError;
use crate::layer::ApplicationLayer;
use crate::platform::Host;
use crate::render::{RenderBackend, RenderError};
use crate::scene::{ProjectionError, SceneError};

/// Main engine struct
///
/// The engine coordinates the application and its layer and manages the
/// main loop.
pub struct Engine<A: Application, H: Host, B: RenderBackend> {
    layer: ApplicationLayer<H, B>,
    app: A,
    frame_budget: Option<u64>,
    frames_run: u64,
    finished: bool,
}

impl<A: Application, H: Host, B: RenderBackend> Engine<A, H, B> {
    /// Build the application layer from `config` and initialize `app`
    pub fn new(config: &ApplicationConfig, app: A, host: H, backend: B) -> Result<Self, EngineError> {
        let layer = ApplicationLayer::new(config, host, backend)?;
        Self::from_layer(layer, app, config.engine.frame_budget)
    }

    /// Initialize `app` on an existing layer.
    ///
    /// With `frame_budget = Some(k)` the loop stops after `k` iterations.
    pub fn from_layer(mut layer: ApplicationLayer<H, B>, mut app: A, frame_budget: Option<u64>) -> Result<Self, EngineError> {
        log::info!("Initializing engine...");
        app.initialize(&mut layer)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {e}")))?;

        match frame_budget {
            Some(frames) => log::info!("Frame budget: {frames} frame(s)"),
            None => log::debug!("No frame budget, running until close"),
        }

        Ok(Self {
            layer,
            app,
            frame_budget,
            frames_run: 0,
            finished: false,
        })
    }

    /// Run one frame-loop iteration.
    ///
    /// Returns `Ok(false)` on the iteration that exhausts the frame budget or
    /// observes a close request, and on every call after that without doing
    /// any work. A zero budget runs nothing. An error also ends the loop.
    pub fn main_loop_iteration(&mut self) -> Result<bool, EngineError> {
        if self.finished {
            return Ok(false);
        }
        if self.frame_budget == Some(0) {
            self.finish("frame budget of zero");
            return Ok(false);
        }

        let keep_running = match self.tick() {
            Ok(keep_running) => keep_running,
            Err(e) => {
                self.finish("error");
                return Err(e);
            }
        };
        self.frames_run += 1;

        let budget_left = self.frame_budget.map_or(true, |frames| self.frames_run < frames);
        if !keep_running {
            self.finish("host requested close");
        } else if !budget_left {
            self.finish("frame budget exhausted");
        }
        Ok(keep_running && budget_left)
    }

    fn tick(&mut self) -> Result<bool, EngineError> {
        let delta_time = self.layer.get_frame_delta();
        self.app
            .update(&mut self.layer, delta_time)
            .map_err(|e| EngineError::ApplicationError(format!("App update: {e}")))?;
        self.layer.redraw();
        self.layer.main_loop_iteration()
    }

    fn finish(&mut self, reason: &str) {
        self.finished = true;
        log::info!("Main loop finished after {} frame(s): {reason}", self.frames_run);
    }

    /// Run the main loop until it finishes, then clean up the application
    pub fn run(&mut self) -> Result<(), EngineError> {
        log::info!("Starting main loop...");
        while self.main_loop_iteration()? {}

        self.app.cleanup(&mut self.layer);
        log::info!("Engine shutdown complete");
        Ok(())
    }

    /// Completed iterations
    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }

    /// Configured frame budget
    pub fn frame_budget(&self) -> Option<u64> {
        self.frame_budget
    }

    /// Whether the loop has ended
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The application layer
    pub fn layer(&self) -> &ApplicationLayer<H, B> {
        &self.layer
    }

    /// Mutable access to the application layer
    pub fn layer_mut(&mut self) -> &mut ApplicationLayer<H, B> {
        &mut self.layer
    }

    /// The application
    pub fn app(&self) -> &A {
        &self.app
    }

    /// Mutable access to the application
    pub fn app_mut(&mut self) -> &mut A {
        &mut self.app
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Initialization error
    #[error("Engine initialization failed: {0}")]
    InitializationFailed(String),

    /// Scene graph error
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Camera projection error
    #[error("Projection error: {0}")]
    Projection(#[from] ProjectionError),

    /// Rendering error
    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    /// Frame timing error
    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Application error
    #[error("Application error: {0}")]
    ApplicationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::AppError;
    use crate::platform::{HeadlessHost, RecordingBackend};

    #[derive(Default)]
    struct Counter {
        initialized: bool,
        updates: u32,
        cleaned_up: bool,
        fail_on: Option<u32>,
    }

    impl Application for Counter {
        fn initialize<H: Host, B: RenderBackend>(&mut self, _layer: &mut ApplicationLayer<H, B>) -> Result<(), AppError> {
            self.initialized = true;
            Ok(())
        }

        fn update<H: Host, B: RenderBackend>(&mut self, _layer: &mut ApplicationLayer<H, B>, _delta: f32) -> Result<(), AppError> {
            self.updates += 1;
            if self.fail_on == Some(self.updates) {
                return Err(AppError::Custom("boom".to_string()));
            }
            Ok(())
        }

        fn cleanup<H: Host, B: RenderBackend>(&mut self, _layer: &mut ApplicationLayer<H, B>) {
            self.cleaned_up = true;
        }
    }

    fn engine(app: Counter, budget: Option<u64>) -> Engine<Counter, HeadlessHost, RecordingBackend> {
        let mut config = ApplicationConfig::default();
        config.engine.frame_budget = budget;
        Engine::new(&config, app, HeadlessHost::new(320, 240), RecordingBackend::new()).unwrap()
    }

    #[test]
    fn test_budget_stops_exactly() {
        let mut engine = engine(Counter::default(), Some(3));
        assert!(engine.app().initialized);

        assert!(engine.main_loop_iteration().unwrap());
        assert!(engine.main_loop_iteration().unwrap());
        assert!(!engine.main_loop_iteration().unwrap());
        assert!(!engine.main_loop_iteration().unwrap());

        assert_eq!(engine.frames_run(), 3);
        assert_eq!(engine.app().updates, 3);
        assert_eq!(engine.layer().host().swap_count(), 3);
    }

    #[test]
    fn test_zero_budget_runs_nothing() {
        let mut engine = engine(Counter::default(), Some(0));
        assert!(!engine.main_loop_iteration().unwrap());
        assert_eq!(engine.app().updates, 0);
        assert!(engine.is_finished());
    }

    #[test]
    fn test_run_cleans_up() {
        let mut engine = engine(Counter::default(), Some(5));
        engine.run().unwrap();
        assert_eq!(engine.frames_run(), 5);
        assert!(engine.app().cleaned_up);
    }

    #[test]
    fn test_update_error_ends_loop() {
        let app = Counter {
            fail_on: Some(2),
            ..Counter::default()
        };
        let mut engine = engine(app, None);

        assert!(engine.main_loop_iteration().unwrap());
        assert!(matches!(engine.main_loop_iteration(), Err(EngineError::ApplicationError(_))));
        assert!(!engine.main_loop_iteration().unwrap());
        assert_eq!(engine.app().updates, 2);
    }
}
