//! # Unified Configuration System
//!
//! All settings of a scene application in one serde-friendly tree. Defaults
//! reproduce the stock demo scene: a camera five units back along +Z with a
//! 35° perspective, extend aspect policy, and a single white-specular Phong
//! light.
//!
//! ## Configuration Categories
//!
//! - **Engine Config**: logging and frame budget
//! - **Window Config**: host window title and size
//! - **Camera Config**: projection and placement of the default camera
//! - **Controls Config**: pointer and key bindings for the camera
//! - **Lighting Config**: Phong shader parameters shared by all primitives

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::input::Key;
use crate::scene::AspectRatioPolicy;

/// # Engine Configuration
///
/// Core loop behaviour and logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log filter, used when `RUST_LOG` is unset
    pub log_level: String,
    /// Stop the frame loop after this many frames. `None` runs until the
    /// host asks to close.
    pub frame_budget: Option<u64>,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            frame_budget: None,
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the frame budget
    pub fn with_frame_budget(mut self, frames: u64) -> Self {
        self.frame_budget = Some(frames);
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Window configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "basic engine".to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// # Camera Configuration
///
/// Projection parameters follow the usual perspective contract:
/// `0 < fov < 180`, `near > 0`, `far > near`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Aspect ratio of the raw projection (before viewport correction)
    pub aspect_ratio: f32,
    /// Near clip plane distance
    pub near: f32,
    /// Far clip plane distance
    pub far: f32,
    /// How the projection adapts to the viewport shape
    pub aspect_ratio_policy: AspectRatioPolicy,
    /// Initial distance of the camera from the origin along +Z
    pub distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 35.0,
            aspect_ratio: 1.0,
            near: 0.01,
            far: 1000.0,
            aspect_ratio_policy: AspectRatioPolicy::Extend,
            distance: 5.0,
        }
    }
}

impl CameraConfig {
    /// Validate projection ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "camera.fov_degrees must be in (0, 180), got {}",
                self.fov_degrees
            )));
        }
        if !(self.aspect_ratio > 0.0 && self.aspect_ratio.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "camera.aspect_ratio must be positive, got {}",
                self.aspect_ratio
            )));
        }
        if !(self.near > 0.0) {
            return Err(ConfigError::Invalid(format!("camera.near must be positive, got {}", self.near)));
        }
        if !(self.far > self.near && self.far.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "camera.far ({}) must be greater than camera.near ({})",
                self.far, self.near
            )));
        }
        if !self.distance.is_finite() {
            return Err(ConfigError::Invalid("camera.distance must be finite".to_string()));
        }
        Ok(())
    }
}

/// Binds a key to a fixed camera translation in the camera's local frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyBinding {
    /// Key that triggers the move
    pub key: Key,
    /// Unit direction, scaled by [`ControlsConfig::key_step`]
    pub direction: [f32; 3],
}

impl KeyBinding {
    /// Create a binding
    pub fn new(key: Key, direction: [f32; 3]) -> Self {
        Self { key, direction }
    }
}

/// # Controls Configuration
///
/// Left-drag orbits the camera, bound keys step it along its local axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Radians of rotation per window width/height of pointer travel
    pub mouse_sensitivity: f32,
    /// Distance travelled per key press
    pub key_step: f32,
    /// Key that asks the host to close, if any
    pub close_key: Option<Key>,
    /// Camera movement bindings
    pub key_bindings: Vec<KeyBinding>,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 3.0,
            key_step: 0.1,
            close_key: Some(Key::Escape),
            key_bindings: vec![
                KeyBinding::new(Key::D, [0.0, 0.0, -1.0]),
                KeyBinding::new(Key::S, [0.0, 0.0, 1.0]),
                KeyBinding::new(Key::R, [-1.0, 0.0, 0.0]),
                KeyBinding::new(Key::T, [1.0, 0.0, 0.0]),
                KeyBinding::new(Key::W, [0.0, -1.0, 0.0]),
                KeyBinding::new(Key::B, [0.0, 1.0, 0.0]),
            ],
        }
    }
}

impl ControlsConfig {
    /// Validate control parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.mouse_sensitivity.is_finite() && self.mouse_sensitivity >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "controls.mouse_sensitivity must be non-negative, got {}",
                self.mouse_sensitivity
            )));
        }
        if !self.key_step.is_finite() {
            return Err(ConfigError::Invalid("controls.key_step must be finite".to_string()));
        }
        Ok(())
    }

    /// Direction bound to `key`, scaled by the key step
    pub fn translation_for(&self, key: Key) -> Option<[f32; 3]> {
        self.key_bindings
            .iter()
            .find(|binding| binding.key == key)
            .map(|binding| binding.direction.map(|component| component * self.key_step))
    }
}

/// # Lighting Configuration
///
/// Colors are `0xRRGGBB` literals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Light position in camera space; `w = 0` makes it directional
    pub light_position: [f32; 4],
    /// Ambient color
    pub ambient_color: u32,
    /// Specular color
    pub specular_color: u32,
    /// Specular exponent
    pub shininess: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            light_position: [13.0, 2.0, 5.0, 0.0],
            ambient_color: 0x0011_1111,
            specular_color: 0x00ff_ffff,
            shininess: 80.0,
        }
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration that encompasses all engine subsystems.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Window configuration
    pub window: WindowConfig,
    /// Default camera configuration
    pub camera: CameraConfig,
    /// Input bindings
    pub controls: ControlsConfig,
    /// Shared Phong shader parameters
    pub lighting: LightingConfig,
}

impl ApplicationConfig {
    /// Create a new application configuration with defaults
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            window: WindowConfig {
                title: title.into(),
                ..WindowConfig::default()
            },
            ..Self::default()
        }
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        self.camera.validate()?;
        self.controls.validate()?;
        if !(self.lighting.shininess >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "lighting.shininess must be non-negative, got {}",
                self.lighting.shininess
            )));
        }
        Ok(())
    }
}

impl Config for ApplicationConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        ApplicationConfig::default().validate().unwrap();
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config = ApplicationConfig::from_toml_str(
            r#"
            [engine]
            frame_budget = 120

            [camera]
            fov_degrees = 60.0
            aspect_ratio_policy = "Clip"
            "#,
        )
        .unwrap();

        assert_eq!(config.engine.frame_budget, Some(120));
        assert_eq!(config.engine.log_level, "info");
        assert_eq!(config.camera.fov_degrees, 60.0);
        assert_eq!(config.camera.aspect_ratio_policy, AspectRatioPolicy::Clip);
        assert_eq!(config.camera.near, 0.01);
        assert_eq!(config.controls, ControlsConfig::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ApplicationConfig::new("round trip").engine_with_budget(30);
        let text = config.to_toml_string().unwrap();
        let parsed = ApplicationConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_file_round_trip_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let config = ApplicationConfig::new("from disk").engine_with_budget(42);

        for name in ["scene.toml", "scene.ron"] {
            let path = dir.path().join(name);
            config.save_to_file(&path).unwrap();
            let loaded = ApplicationConfig::load_from_file(&path).unwrap();
            assert_eq!(loaded, config, "{name}");
        }
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");

        assert!(matches!(
            ApplicationConfig::default().save_to_file(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        assert!(!path.exists());

        std::fs::write(&path, "{}").unwrap();
        assert!(matches!(
            ApplicationConfig::load_from_file(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            ApplicationConfig::load_from_file(dir.path().join("missing.toml")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_ron_parse() {
        let config = ApplicationConfig::from_ron_str(
            "(camera: (near: 0.5, far: 50.0), controls: (key_step: 0.25))",
        )
        .unwrap();
        assert_eq!(config.camera.near, 0.5);
        assert_eq!(config.camera.far, 50.0);
        assert_eq!(config.controls.key_step, 0.25);
    }

    #[test]
    fn test_invalid_projection_rejected() {
        let mut config = ApplicationConfig::default();
        config.camera.fov_degrees = 180.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = ApplicationConfig::default();
        config.camera.far = config.camera.near;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = ApplicationConfig::default();
        config.camera.near = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_zero_window_rejected() {
        let mut config = ApplicationConfig::default();
        config.window.height = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_key_translation_scaled_by_step() {
        let controls = ControlsConfig {
            key_step: 0.5,
            ..ControlsConfig::default()
        };
        assert_eq!(controls.translation_for(Key::D), Some([0.0, 0.0, -0.5]));
        assert_eq!(controls.translation_for(Key::T), Some([0.5, 0.0, 0.0]));
        assert_eq!(controls.translation_for(Key::Q), None);
    }

    impl ApplicationConfig {
        fn engine_with_budget(mut self, frames: u64) -> Self {
            self.engine = self.engine.with_frame_budget(frames);
            self
        }
    }
}
