//! Input handling
//!
//! Key and button codes shared by hosts and configuration, plus the
//! [`CameraController`] that turns pointer drags and key presses into camera
//! node transformations.

use serde::{Deserialize, Serialize};

use crate::core::ControlsConfig;
use crate::foundation::math::{Mat4Ext, Rad, Vec2, Vec3};
use crate::platform::HostEvent;
use crate::scene::{NodeId, SceneError, SceneGraph, TransformFrame};

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

/// Orbit-and-step camera control.
///
/// Dragging with the left button rotates the camera node about its own
/// right axis and the parent Y axis, both in the parent frame, so the camera
/// orbits the parent origin. Bound keys translate it along its local axes.
#[derive(Debug, Clone)]
pub struct CameraController {
    controls: ControlsConfig,
    dragging: bool,
    previous_position: Vec2,
}

impl CameraController {
    /// Create a controller with the given bindings
    pub fn new(controls: ControlsConfig) -> Self {
        Self {
            controls,
            dragging: false,
            previous_position: Vec2::zeros(),
        }
    }

    /// Active bindings
    pub fn controls(&self) -> &ControlsConfig {
        &self.controls
    }

    /// Whether a left-button drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Apply `event` to `camera_node`.
    ///
    /// `window_size` is in window coordinates, the same space as pointer
    /// positions. Returns whether the event was consumed.
    pub fn handle(
        &mut self,
        event: &HostEvent,
        graph: &mut SceneGraph,
        camera_node: NodeId,
        window_size: (u32, u32),
    ) -> Result<bool, SceneError> {
        match *event {
            HostEvent::MousePressed {
                button: MouseButton::Left,
                position,
            } => {
                self.dragging = true;
                self.previous_position = position;
                Ok(true)
            }
            HostEvent::MouseReleased {
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = false;
                Ok(true)
            }
            HostEvent::MouseMoved { position } if self.dragging => {
                let (width, height) = window_size;
                if width == 0 || height == 0 {
                    self.previous_position = position;
                    return Ok(false);
                }
                let travel = position - self.previous_position;
                let delta = Vec2::new(travel.x / width as f32, travel.y / height as f32) * self.controls.mouse_sensitivity;
                self.previous_position = position;

                let right = graph.local_transform(camera_node)?.right().normalize();
                graph
                    .rotate(camera_node, Rad(-delta.y), &right, TransformFrame::Parent)?
                    .rotate_y(camera_node, Rad(-delta.x), TransformFrame::Parent)?;
                log::trace!("Camera orbit by {delta:?}");
                Ok(true)
            }
            HostEvent::KeyPressed(key) => match self.controls.translation_for(key) {
                Some(offset) => {
                    graph.translate(camera_node, &Vec3::from(offset), TransformFrame::Local)?;
                    log::trace!("Camera step {offset:?} for {key:?}");
                    Ok(true)
                }
                None => Ok(false),
            },
            _ => Ok(false),
        }
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(ControlsConfig::default())
    }
}
