//! Application layer
//!
//! Owns everything between the user and the scene: the host and render
//! backend, the scene graph with its camera and default drawable group, the
//! shared Phong shader and primitive meshes, camera controls and the frame
//! timeline.
//!
//! One [`ApplicationLayer::main_loop_iteration`] draws a frame if a redraw
//! was requested, then polls and dispatches host events.

use std::rc::Rc;

use crate::core::ApplicationConfig;
use crate::engine::EngineError;
use crate::foundation::math::{Deg, Vec3};
use crate::foundation::time::{Clock, Timeline};
use crate::input::CameraController;
use crate::platform::{Host, HostEvent};
use crate::render::{ClearFlags, Color3, Color4, Mesh, MeshData, PhongShader, Primitive, RenderBackend};
use crate::scene::{Camera, DrawableId, DrawableSlot, GroupId, NodeId, SceneError, SceneGraph, TransformFrame};

/// Latitude bands of the built-in sphere mesh
pub const SPHERE_RINGS: u32 = 16;

/// Longitude slices of the built-in sphere mesh
pub const SPHERE_SEGMENTS: u32 = 32;

/// Scene, camera and platform glue for one window
pub struct ApplicationLayer<H: Host, B: RenderBackend> {
    host: H,
    backend: B,
    graph: SceneGraph,
    camera: Camera,
    manipulator: NodeId,
    drawables: GroupId,
    shader: Rc<PhongShader>,
    cube_mesh: Rc<Mesh>,
    sphere_mesh: Rc<Mesh>,
    controller: CameraController,
    timeline: Timeline,
}

impl<H: Host, B: RenderBackend> ApplicationLayer<H, B> {
    /// Build the default scene and start the timeline on the system clock
    pub fn new(config: &ApplicationConfig, host: H, backend: B) -> Result<Self, EngineError> {
        Self::build(config, host, backend, Timeline::new())
    }

    /// Build the default scene with the timeline reading `clock`
    pub fn with_clock(config: &ApplicationConfig, host: H, backend: B, clock: Box<dyn Clock>) -> Result<Self, EngineError> {
        Self::build(config, host, backend, Timeline::with_clock(clock))
    }

    fn build(config: &ApplicationConfig, host: H, mut backend: B, mut timeline: Timeline) -> Result<Self, EngineError> {
        log::info!("Initializing application layer '{}'", config.window.title);
        config.validate()?;

        let mut graph = SceneGraph::new();
        let camera_node = graph.add_node(graph.root())?;
        graph.translate(camera_node, &Vec3::new(0.0, 0.0, config.camera.distance), TransformFrame::Parent)?;

        let mut camera = Camera::new(&graph, camera_node)?;
        camera
            .set_aspect_ratio_policy(config.camera.aspect_ratio_policy)
            .set_projection(
                Deg(config.camera.fov_degrees),
                config.camera.aspect_ratio,
                config.camera.near,
                config.camera.far,
            )?;
        let (width, height) = host.viewport_size();
        camera.set_viewport(width, height);

        let manipulator = graph.add_node(graph.root())?;
        let drawables = graph.add_group("drawables");

        let shader = Rc::new(PhongShader::from_config(&config.lighting));
        let cube_mesh = Rc::new(Mesh::compile(&mut backend, "cube", &MeshData::cube_solid())?);
        let sphere_data = MeshData::uv_sphere_solid(SPHERE_RINGS, SPHERE_SEGMENTS)?;
        let sphere_mesh = Rc::new(Mesh::compile(&mut backend, "uv sphere", &sphere_data)?);

        timeline.start();
        log::info!("Application layer ready, viewport {width}x{height}");

        Ok(Self {
            host,
            backend,
            graph,
            camera,
            manipulator,
            drawables,
            shader,
            cube_mesh,
            sphere_mesh,
            controller: CameraController::new(config.controls.clone()),
            timeline,
        })
    }

    /// Create a node under `parent` at `initial_position` and attach a
    /// Phong-shaded primitive to it
    pub fn add_drawable(
        &mut self,
        parent: NodeId,
        group: GroupId,
        mesh: Rc<Mesh>,
        shader: Rc<PhongShader>,
        initial_position: Vec3,
        color: Color4,
    ) -> Result<DrawableId, SceneError> {
        let node = self.graph.add_node(parent)?;
        self.graph.translate(node, &initial_position, TransformFrame::Parent)?;
        self.graph
            .attach_drawable_at(node, group, initial_position, Primitive::new(mesh, shader, color))
    }

    /// Add a cube to the default group, colored by hue in degrees
    pub fn add_cube(&mut self, initial_position: Vec3, hue_degrees: f32) -> Result<DrawableId, SceneError> {
        let mesh = Rc::clone(&self.cube_mesh);
        self.add_primitive(mesh, initial_position, hue_degrees)
    }

    /// Add a sphere to the default group, colored by hue in degrees
    pub fn add_sphere(&mut self, initial_position: Vec3, hue_degrees: f32) -> Result<DrawableId, SceneError> {
        let mesh = Rc::clone(&self.sphere_mesh);
        self.add_primitive(mesh, initial_position, hue_degrees)
    }

    fn add_primitive(&mut self, mesh: Rc<Mesh>, initial_position: Vec3, hue_degrees: f32) -> Result<DrawableId, SceneError> {
        let shader = Rc::clone(&self.shader);
        let color = Color3::from_hue(hue_degrees).opaque();
        self.add_drawable(self.manipulator, self.drawables, mesh, shader, initial_position, color)
    }

    /// Seconds spent on the previous frame
    pub fn get_frame_delta(&self) -> f32 {
        self.timeline.previous_frame_duration()
    }

    /// Request a redraw on the next iteration
    pub fn redraw(&mut self) {
        self.host.request_redraw();
    }

    /// Render one frame: clear, draw the default group, present, and mark
    /// the frame boundary
    pub fn draw_event(&mut self) -> Result<(), EngineError> {
        self.backend.clear(ClearFlags::COLOR | ClearFlags::DEPTH);
        let drawn = self.camera.draw(&self.graph, self.drawables, &mut self.backend)?;
        self.host.swap_buffers();
        self.timeline.next_frame()?;
        log::trace!("Frame {} presented with {drawn} drawable(s)", self.timeline.frame_count());
        Ok(())
    }

    /// Route one host event
    pub fn dispatch(&mut self, event: &HostEvent) -> Result<(), EngineError> {
        match *event {
            HostEvent::Resized { width, height } => {
                self.camera.set_viewport(width, height);
                log::debug!("Viewport resized to {width}x{height}");
            }
            HostEvent::CloseRequested => {
                log::info!("Close requested by host");
                self.host.set_should_close(true);
            }
            HostEvent::KeyPressed(key) if self.controller.controls().close_key == Some(key) => {
                log::info!("Close requested with {key:?}");
                self.host.set_should_close(true);
            }
            _ => {
                let window_size = self.host.window_size();
                self.controller
                    .handle(event, &mut self.graph, self.camera.node(), window_size)?;
            }
        }
        Ok(())
    }

    /// Draw if a redraw is pending, then poll and dispatch events.
    ///
    /// Returns `false` once the host wants to close.
    pub fn main_loop_iteration(&mut self) -> Result<bool, EngineError> {
        if self.host.take_redraw_request() {
            self.draw_event()?;
        }
        for event in self.host.poll_events() {
            self.dispatch(&event)?;
        }
        Ok(!self.host.should_close())
    }

    /// The scene graph
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Mutable access to the scene graph
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    /// A drawable slot
    pub fn drawable(&self, id: DrawableId) -> Result<&DrawableSlot, SceneError> {
        self.graph.drawable(id)
    }

    /// Mutable access to a drawable slot
    pub fn drawable_mut(&mut self, id: DrawableId) -> Result<&mut DrawableSlot, SceneError> {
        self.graph.drawable_mut(id)
    }

    /// The camera
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable access to the camera
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Parent node of every primitive added through this layer
    pub fn manipulator(&self) -> NodeId {
        self.manipulator
    }

    /// Group drawn each frame
    pub fn drawable_group(&self) -> GroupId {
        self.drawables
    }

    /// Shared Phong shader
    pub fn shader(&self) -> &Rc<PhongShader> {
        &self.shader
    }

    /// Shared cube mesh
    pub fn cube_mesh(&self) -> &Rc<Mesh> {
        &self.cube_mesh
    }

    /// Shared sphere mesh
    pub fn sphere_mesh(&self) -> &Rc<Mesh> {
        &self.sphere_mesh
    }

    /// Frame timeline
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// The host
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The render backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the render backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
