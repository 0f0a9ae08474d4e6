//! Spheres demo application
//!
//! Two spheres and a cube in front of an orbit camera. The nearer sphere
//! drifts away from the camera at one unit per second. Runs on the headless
//! platform for a fixed number of frames and logs where the sphere ended up.
//!
//! Usage: `spheres [config.toml|config.ron]`

use std::thread;
use std::time::Duration;

use scene_engine::config::ConfigError;
use scene_engine::foundation::logging;
use scene_engine::prelude::*;
use thiserror::Error;

/// Frames to run when the configuration sets no budget
const DEFAULT_FRAME_BUDGET: u64 = 600;

/// Target frame interval for the headless loop
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Error, Debug)]
enum DemoError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

struct SpheresDemo {
    spheres: Vec<DrawableId>,
    velocity: Vec3,
}

impl SpheresDemo {
    fn new() -> Self {
        Self {
            spheres: Vec::with_capacity(2),
            velocity: Vec3::new(0.0, 0.0, -1.0),
        }
    }
}

impl Application for SpheresDemo {
    fn initialize<H: Host, B: RenderBackend>(&mut self, layer: &mut ApplicationLayer<H, B>) -> Result<(), AppError> {
        log::info!("Populating scene...");
        self.spheres.push(layer.add_sphere(Vec3::new(0.0, 0.0, -8.0), 35.0)?);
        self.spheres.push(layer.add_sphere(Vec3::new(2.0, 1.0, -6.0), 75.0)?);
        layer.add_cube(Vec3::new(-2.0, -1.0, -7.0), 200.0)?;
        Ok(())
    }

    fn update<H: Host, B: RenderBackend>(&mut self, layer: &mut ApplicationLayer<H, B>, delta_time: f32) -> Result<(), AppError> {
        let Some(&moving) = self.spheres.get(1) else {
            return Err(AppError::Custom("moving sphere was never created".to_string()));
        };
        let slot = layer.drawable_mut(moving)?;
        let position = slot.position() + self.velocity * delta_time;
        slot.update_position(position);

        thread::sleep(FRAME_INTERVAL);
        Ok(())
    }

    fn cleanup<H: Host, B: RenderBackend>(&mut self, layer: &mut ApplicationLayer<H, B>) {
        if let Some(position) = self.spheres.get(1).and_then(|&id| layer.drawable(id).ok()).map(|slot| slot.position()) {
            log::info!("Moving sphere finished at {:?}", position);
        }
        log::info!("Presented {} frame(s)", layer.timeline().frame_count());
    }
}

fn load_config() -> Result<ApplicationConfig, ConfigError> {
    let mut config = match std::env::args().nth(1) {
        Some(path) => ApplicationConfig::load_from_file(&path)?,
        None => ApplicationConfig::new("basic engine"),
    };
    config.engine.frame_budget.get_or_insert(DEFAULT_FRAME_BUDGET);
    Ok(config)
}

fn run() -> Result<(), DemoError> {
    let config = load_config()?;
    logging::init(&config.engine.log_level);

    log::info!("Starting spheres demo");
    let host = HeadlessHost::from_config(&config.window);
    let mut engine = Engine::new(&config, SpheresDemo::new(), host, RecordingBackend::new())?;
    engine.run()?;

    log::info!("Spheres demo finished after {} frame(s)", engine.frames_run());
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        log::error!("Application error: {e}");
        eprintln!("spheres: {e}");
        std::process::exit(1);
    }
}
