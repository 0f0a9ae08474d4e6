//! # Core Engine Module
//!
//! Shared configuration for every subsystem of a scene application.
//!
//! ## Organization
//!
//! - **Config**: Unified configuration tree ([`ApplicationConfig`]) loaded
//!   through the [`Config`] trait

pub mod config;

pub use crate::config::{Config, ConfigError};
pub use config::{
    ApplicationConfig, CameraConfig, ControlsConfig, EngineConfig, KeyBinding, LightingConfig,
    WindowConfig,
};
