//! Platform abstraction
//!
//! The [`Host`] trait is everything the frame loop needs from a windowing
//! layer: sizes, input events, buffer presentation and the close and redraw
//! flags. [`headless`] provides an in-memory host and render backend.

pub mod headless;

pub use crate::input::{Key, MouseButton};
pub use headless::{DrawCall, HeadlessHost, RecordingBackend};

use crate::foundation::math::Vec2;

/// Input and window events delivered by a host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// The framebuffer was resized
    Resized {
        /// New framebuffer width in pixels
        width: u32,
        /// New framebuffer height in pixels
        height: u32,
    },
    /// A mouse button went down at a window-space position
    MousePressed {
        /// Button pressed
        button: MouseButton,
        /// Pointer position in window coordinates
        position: Vec2,
    },
    /// A mouse button went up
    MouseReleased {
        /// Button released
        button: MouseButton,
        /// Pointer position in window coordinates
        position: Vec2,
    },
    /// The pointer moved
    MouseMoved {
        /// Pointer position in window coordinates
        position: Vec2,
    },
    /// A key went down
    KeyPressed(Key),
    /// A key went up
    KeyReleased(Key),
    /// The user asked to close the window
    CloseRequested,
}

/// Window and context services consumed by the frame loop
pub trait Host {
    /// Framebuffer size in pixels
    fn viewport_size(&self) -> (u32, u32);

    /// Window size in window coordinates. Differs from the framebuffer
    /// size on HiDPI displays.
    fn window_size(&self) -> (u32, u32);

    /// Drain pending events
    fn poll_events(&mut self) -> Vec<HostEvent>;

    /// Present the back buffer
    fn swap_buffers(&mut self);

    /// Whether the loop should stop
    fn should_close(&self) -> bool;

    /// Ask the loop to stop (or cancel a pending stop)
    fn set_should_close(&mut self, should_close: bool);

    /// Ask for a redraw on the next iteration
    fn request_redraw(&mut self);

    /// Consume a pending redraw request
    fn take_redraw_request(&mut self) -> bool;
}
