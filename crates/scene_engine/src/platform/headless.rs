//! Headless platform
//!
//! [`HeadlessHost`] replays scripted event batches, one batch per poll, and
//! [`RecordingBackend`] keeps every clear and draw call in memory. Together
//! they run the frame loop without a window or GPU.

use std::collections::VecDeque;

use crate::core::WindowConfig;
use crate::platform::{Host, HostEvent};
use crate::render::{BackendResult, ClearFlags, Mesh, MeshData, MeshId, PhongUniforms, RenderBackend, RenderError};

/// Host without a window
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    window_size: (u32, u32),
    viewport_size: (u32, u32),
    script: VecDeque<Vec<HostEvent>>,
    close_after_polls: Option<u64>,
    polls: u64,
    swaps: u64,
    redraw_requested: bool,
    should_close: bool,
}

impl HeadlessHost {
    /// Create a host whose window and framebuffer are `width` × `height`
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            window_size: (width, height),
            viewport_size: (width, height),
            script: VecDeque::new(),
            close_after_polls: None,
            polls: 0,
            swaps: 0,
            redraw_requested: false,
            should_close: false,
        }
    }

    /// Create a host sized from window configuration
    pub fn from_config(config: &WindowConfig) -> Self {
        log::info!("Headless host '{}' at {}x{}", config.title, config.width, config.height);
        Self::new(config.width, config.height)
    }

    /// Use a different framebuffer size, as on HiDPI displays
    pub fn with_viewport_size(mut self, width: u32, height: u32) -> Self {
        self.viewport_size = (width, height);
        self
    }

    /// Report should-close once `polls` event polls have happened
    pub fn close_after(mut self, polls: u64) -> Self {
        self.close_after_polls = Some(polls);
        self
    }

    /// Queue a batch of events, delivered by a later poll
    pub fn push_events(&mut self, events: impl IntoIterator<Item = HostEvent>) {
        self.script.push_back(events.into_iter().collect());
    }

    /// Number of polls so far
    pub fn poll_count(&self) -> u64 {
        self.polls
    }

    /// Number of presented frames
    pub fn swap_count(&self) -> u64 {
        self.swaps
    }
}

impl Host for HeadlessHost {
    fn viewport_size(&self) -> (u32, u32) {
        self.viewport_size
    }

    fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    fn poll_events(&mut self) -> Vec<HostEvent> {
        self.polls += 1;
        let events = self.script.pop_front().unwrap_or_default();

        for event in &events {
            if let HostEvent::Resized { width, height } = *event {
                let (window_width, window_height) = self.window_size;
                let (viewport_width, viewport_height) = self.viewport_size;
                // Keep the framebuffer-to-window ratio across resizes
                self.window_size = (
                    rescale(width, window_width, viewport_width),
                    rescale(height, window_height, viewport_height),
                );
                self.viewport_size = (width, height);
            }
        }
        if self.close_after_polls.is_some_and(|limit| self.polls >= limit) {
            self.should_close = true;
        }

        log::trace!("Headless poll {} delivered {} event(s)", self.polls, events.len());
        events
    }

    fn swap_buffers(&mut self) {
        self.swaps += 1;
    }

    fn should_close(&self) -> bool {
        self.should_close
    }

    fn set_should_close(&mut self, should_close: bool) {
        self.should_close = should_close;
    }

    fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }
}

/// `size * window / viewport`, saturating at `u32::MAX`
fn rescale(size: u32, window: u32, viewport: u32) -> u32 {
    let scaled = u64::from(size) * u64::from(window.max(1)) / u64::from(viewport.max(1));
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    /// Mesh drawn
    pub mesh: MeshId,
    /// Uniforms it was drawn with
    pub uniforms: PhongUniforms,
}

/// Render backend that records instead of rendering
#[derive(Debug, Default)]
pub struct RecordingBackend {
    meshes: Vec<MeshId>,
    clears: Vec<ClearFlags>,
    draw_calls: Vec<DrawCall>,
    fail_compilation: bool,
}

impl RecordingBackend {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose mesh uploads always fail
    pub fn with_failing_compilation() -> Self {
        Self {
            fail_compilation: true,
            ..Self::default()
        }
    }

    /// Meshes uploaded so far
    pub fn compiled_meshes(&self) -> &[MeshId] {
        &self.meshes
    }

    /// Clears issued so far
    pub fn clears(&self) -> &[ClearFlags] {
        &self.clears
    }

    /// Draw calls recorded since the last take
    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draw_calls
    }

    /// Drain the recorded draw calls
    pub fn take_draw_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.draw_calls)
    }
}

impl RenderBackend for RecordingBackend {
    fn compile_mesh(&mut self, data: &MeshData) -> BackendResult<MeshId> {
        if self.fail_compilation {
            return Err(RenderError::MeshCompilation(format!(
                "headless backend refused {} vertices",
                data.vertices.len()
            )));
        }
        let id = MeshId(self.meshes.len() as u32);
        self.meshes.push(id);
        Ok(id)
    }

    fn clear(&mut self, flags: ClearFlags) {
        self.clears.push(flags);
    }

    fn draw(&mut self, mesh: &Mesh, uniforms: &PhongUniforms) -> BackendResult<()> {
        if !self.meshes.contains(&mesh.id()) {
            return Err(RenderError::Draw(format!("mesh '{}' was never compiled", mesh.name())));
        }
        self.draw_calls.push(DrawCall {
            mesh: mesh.id(),
            uniforms: *uniforms,
        });
        Ok(())
    }
}
