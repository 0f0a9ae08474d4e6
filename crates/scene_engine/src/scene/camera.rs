//! # Scene Camera
//!
//! A camera is a scene node plus a perspective projection. The view matrix
//! is the inverse of the node's absolute transform, so moving the node moves
//! the viewpoint.
//!
//! ## Coordinate System
//!
//! Right-handed, Y up, looking down -Z in view space. Projections use the
//! OpenGL clip convention produced by `nalgebra::Matrix4::new_perspective`.
//!
//! ## Aspect Ratio Correction
//!
//! The raw projection has a fixed aspect. When the viewport shape differs,
//! [`AspectRatioPolicy`] decides which axis gets rescaled.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::graph::{GroupId, NodeId, SceneGraph};
use super::SceneError;
use crate::foundation::math::{Deg, Mat4, Mat4Ext, Rad, Vec2, Vec3};
use crate::render::{RenderBackend, RenderError};

/// How the projection adapts when the viewport aspect differs from the
/// projection aspect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatioPolicy {
    /// Stretch the image to the viewport
    #[default]
    NotPreserved,
    /// Keep the aspect and show more of the scene along the longer axis
    Extend,
    /// Keep the aspect and crop the scene along the shorter axis
    Clip,
}

/// Invalid projection parameters
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ProjectionError {
    /// Field of view outside (0°, 180°)
    #[error("Field of view must be in (0, 180) degrees, got {0}")]
    InvalidFieldOfView(f32),

    /// Non-positive aspect ratio
    #[error("Aspect ratio must be positive, got {0}")]
    InvalidAspectRatio(f32),

    /// Non-positive near plane
    #[error("Near plane must be positive, got {0}")]
    InvalidNearPlane(f32),

    /// Far plane not beyond the near plane
    #[error("Far plane ({far}) must be greater than near plane ({near})")]
    InvalidFarPlane {
        /// Requested near plane
        near: f32,
        /// Requested far plane
        far: f32,
    },
}

/// Perspective camera bound to a scene node
#[derive(Debug, Clone)]
pub struct Camera {
    node: NodeId,
    policy: AspectRatioPolicy,
    fov: Deg,
    aspect: f32,
    near: f32,
    far: f32,
    raw_projection: Mat4,
    projection: Mat4,
    viewport: (u32, u32),
}

impl Camera {
    /// Create a camera looking through `node`.
    ///
    /// Starts with a 35° perspective, aspect 1, clip planes at 0.01 and 1000,
    /// no viewport and [`AspectRatioPolicy::NotPreserved`].
    pub fn new(graph: &SceneGraph, node: NodeId) -> Result<Self, SceneError> {
        graph.node(node)?;

        let fov = Deg(35.0);
        let (aspect, near, far) = (1.0, 0.01, 1000.0);
        let raw_projection = perspective(fov, aspect, near, far);
        Ok(Self {
            node,
            policy: AspectRatioPolicy::default(),
            fov,
            aspect,
            near,
            far,
            raw_projection,
            projection: raw_projection,
            viewport: (0, 0),
        })
    }

    /// Node the camera looks through
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Current aspect ratio policy
    pub fn aspect_ratio_policy(&self) -> AspectRatioPolicy {
        self.policy
    }

    /// Change the aspect ratio policy and recompute the projection
    pub fn set_aspect_ratio_policy(&mut self, policy: AspectRatioPolicy) -> &mut Self {
        self.policy = policy;
        self.fix_aspect_ratio();
        self
    }

    /// Set a perspective projection.
    ///
    /// `fov` is the vertical field of view. Invalid parameters leave the
    /// camera unchanged.
    pub fn set_projection(
        &mut self,
        fov: impl Into<Deg>,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Result<&mut Self, ProjectionError> {
        let fov = fov.into();
        if !(fov.0 > 0.0 && fov.0 < 180.0) {
            return Err(ProjectionError::InvalidFieldOfView(fov.0));
        }
        if !(aspect > 0.0 && aspect.is_finite()) {
            return Err(ProjectionError::InvalidAspectRatio(aspect));
        }
        if !(near > 0.0 && near.is_finite()) {
            return Err(ProjectionError::InvalidNearPlane(near));
        }
        if !(far > near && far.is_finite()) {
            return Err(ProjectionError::InvalidFarPlane { near, far });
        }

        self.fov = fov;
        self.aspect = aspect;
        self.near = near;
        self.far = far;
        self.raw_projection = perspective(fov, aspect, near, far);
        self.fix_aspect_ratio();

        log::debug!(
            "Camera projection: fov {:.1}°, aspect {aspect:.3}, near {near}, far {far}",
            fov.0
        );
        Ok(self)
    }

    /// Vertical field of view
    pub fn fov(&self) -> Deg {
        self.fov
    }

    /// Aspect ratio of the raw projection
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Near clip plane distance
    pub fn near(&self) -> f32 {
        self.near
    }

    /// Far clip plane distance
    pub fn far(&self) -> f32 {
        self.far
    }

    /// Set the viewport size in pixels and recompute the aspect correction.
    ///
    /// A zero width or height disables the correction.
    pub fn set_viewport(&mut self, width: u32, height: u32) -> &mut Self {
        self.viewport = (width, height);
        self.fix_aspect_ratio();
        log::trace!("Camera viewport set to {width}x{height}");
        self
    }

    /// Viewport size in pixels
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Projection before aspect correction
    pub fn raw_projection_matrix(&self) -> &Mat4 {
        &self.raw_projection
    }

    /// Aspect-corrected projection matrix
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection
    }

    /// World-to-camera matrix: the inverse of the camera node's absolute
    /// transform
    pub fn view_matrix(&self, graph: &SceneGraph) -> Result<Mat4, SceneError> {
        graph
            .absolute_transform(self.node)?
            .try_inverse()
            .ok_or(SceneError::SingularTransform(self.node))
    }

    /// Draw every member of `group` in insertion order.
    ///
    /// Each drawable receives `view * world`. Returns the number of
    /// drawables drawn.
    pub fn draw(&self, graph: &SceneGraph, group: GroupId, backend: &mut dyn RenderBackend) -> Result<usize, RenderError> {
        let view = self.view_matrix(graph)?;
        let members = graph.group(group)?;

        let mut drawn = 0;
        for id in members.iter() {
            let transformation = view * graph.drawable_world_transform(id)?;
            graph
                .drawable(id)?
                .drawable()
                .draw(&transformation, self, backend)?;
            drawn += 1;
        }

        log::trace!("Drew {drawn} drawable(s) from group '{}'", members.name());
        Ok(drawn)
    }

    fn fix_aspect_ratio(&mut self) {
        self.projection = aspect_ratio_fix(self.policy, &self.raw_projection, self.viewport) * self.raw_projection;
    }
}

fn perspective(fov: Deg, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::new_perspective(aspect, Rad::from(fov).0, near, far)
}

/// Scaling that makes `projection` keep its aspect on `viewport`
fn aspect_ratio_fix(policy: AspectRatioPolicy, projection: &Mat4, viewport: (u32, u32)) -> Mat4 {
    let (width, height) = viewport;
    if policy == AspectRatioPolicy::NotPreserved || width == 0 || height == 0 {
        return Mat4::identity();
    }

    let scale = Vec2::new(projection[(0, 0)].abs(), projection[(1, 1)].abs());
    let relative = Vec2::new(width as f32 * scale.x, height as f32 * scale.y);

    let factors = if (relative.x > relative.y) == (policy == AspectRatioPolicy::Extend) {
        Vec3::new(relative.y / relative.x, 1.0, 1.0)
    } else {
        Vec3::new(1.0, relative.x / relative.y, 1.0)
    };
    Mat4::scaling(&factors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::RecordingBackend;
    use crate::scene::{Drawable, TransformFrame};
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    const EPSILON: f32 = 1e-5;

    /// Records every transformation it is drawn with
    struct Probe {
        tag: usize,
        log: Rc<RefCell<Vec<(usize, Mat4, Mat4)>>>,
    }

    impl Drawable for Probe {
        fn draw(&self, transformation: &Mat4, camera: &Camera, _: &mut dyn RenderBackend) -> Result<(), RenderError> {
            self.log
                .borrow_mut()
                .push((self.tag, *transformation, *camera.projection_matrix()));
            Ok(())
        }
    }

    fn camera_at_z5(graph: &mut SceneGraph) -> Camera {
        let node = graph.add_node(graph.root()).unwrap();
        graph.translate(node, &Vec3::new(0.0, 0.0, 5.0), TransformFrame::Parent).unwrap();
        let mut camera = Camera::new(graph, node).unwrap();
        camera.set_projection(Deg(35.0), 1.0, 0.01, 1000.0).unwrap();
        camera
    }

    #[test]
    fn test_view_matrix_inverts_camera_node() {
        let mut graph = SceneGraph::new();
        let camera = camera_at_z5(&mut graph);

        let view = camera.view_matrix(&graph).unwrap();
        assert_relative_eq!(view, Mat4::translation(&Vec3::new(0.0, 0.0, -5.0)), epsilon = EPSILON);
        assert_relative_eq!(
            view * graph.absolute_transform(camera.node()).unwrap(),
            Mat4::identity(),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_end_to_end_view_depth() {
        let mut graph = SceneGraph::new();
        let camera = camera_at_z5(&mut graph);
        let group = graph.add_group("drawables");
        let log = Rc::new(RefCell::new(Vec::new()));
        let node = graph.add_node(graph.root()).unwrap();
        graph
            .attach_drawable_at(node, group, Vec3::new(2.0, 1.0, -6.0), Probe { tag: 0, log: log.clone() })
            .unwrap();

        let mut backend = RecordingBackend::new();
        assert_eq!(camera.draw(&graph, group, &mut backend).unwrap(), 1);

        let calls = log.borrow();
        let view_position = calls[0].1.translation_part();
        assert_relative_eq!(view_position, Vec3::new(2.0, 1.0, -11.0), epsilon = EPSILON);
    }

    #[test]
    fn test_draw_order_is_deterministic() {
        let mut graph = SceneGraph::new();
        let camera = camera_at_z5(&mut graph);
        let group = graph.add_group("drawables");
        let log = Rc::new(RefCell::new(Vec::new()));
        let node = graph.add_node(graph.root()).unwrap();
        for tag in 0..5 {
            let position = Vec3::new(tag as f32, 0.0, -1.0);
            graph
                .attach_drawable_at(node, group, position, Probe { tag, log: log.clone() })
                .unwrap();
        }

        let mut backend = RecordingBackend::new();
        camera.draw(&graph, group, &mut backend).unwrap();
        let first: Vec<_> = log.borrow_mut().drain(..).collect();
        camera.draw(&graph, group, &mut backend).unwrap();
        let second: Vec<_> = log.borrow().clone();

        assert_eq!(first, second);
        assert_eq!(first.iter().map(|call| call.0).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_invalid_projection_leaves_camera_unchanged() {
        let mut graph = SceneGraph::new();
        let mut camera = camera_at_z5(&mut graph);
        let before = *camera.projection_matrix();

        assert_eq!(
            camera.set_projection(Deg(0.0), 1.0, 0.1, 10.0).map(|_| ()),
            Err(ProjectionError::InvalidFieldOfView(0.0))
        );
        assert_eq!(
            camera.set_projection(Deg(180.0), 1.0, 0.1, 10.0).map(|_| ()),
            Err(ProjectionError::InvalidFieldOfView(180.0))
        );
        assert_eq!(
            camera.set_projection(Deg(60.0), 0.0, 0.1, 10.0).map(|_| ()),
            Err(ProjectionError::InvalidAspectRatio(0.0))
        );
        assert_eq!(
            camera.set_projection(Deg(60.0), 1.0, 0.0, 10.0).map(|_| ()),
            Err(ProjectionError::InvalidNearPlane(0.0))
        );
        assert_eq!(
            camera.set_projection(Deg(60.0), 1.0, 1.0, 1.0).map(|_| ()),
            Err(ProjectionError::InvalidFarPlane { near: 1.0, far: 1.0 })
        );

        assert_eq!(*camera.projection_matrix(), before);
        assert_eq!(camera.fov(), Deg(35.0));
    }

    #[test]
    fn test_vertical_fov() {
        let mut graph = SceneGraph::new();
        let mut camera = camera_at_z5(&mut graph);
        camera.set_projection(Deg(90.0), 2.0, 0.1, 100.0).unwrap();

        let projection = camera.projection_matrix();
        assert_relative_eq!(projection[(1, 1)], 1.0, epsilon = EPSILON);
        assert_relative_eq!(projection[(0, 0)], 0.5, epsilon = EPSILON);
    }

    #[test]
    fn test_extend_shrinks_longer_axis() {
        let mut graph = SceneGraph::new();
        let mut camera = camera_at_z5(&mut graph);
        let raw = *camera.raw_projection_matrix();
        camera
            .set_aspect_ratio_policy(AspectRatioPolicy::Extend)
            .set_viewport(800, 600);

        let fixed = camera.projection_matrix();
        assert_relative_eq!(fixed[(0, 0)], raw[(0, 0)] * 0.75, epsilon = EPSILON);
        assert_relative_eq!(fixed[(1, 1)], raw[(1, 1)], epsilon = EPSILON);

        camera.set_viewport(600, 800);
        let fixed = camera.projection_matrix();
        assert_relative_eq!(fixed[(0, 0)], raw[(0, 0)], epsilon = EPSILON);
        assert_relative_eq!(fixed[(1, 1)], raw[(1, 1)] * 0.75, epsilon = EPSILON);
    }

    #[test]
    fn test_clip_grows_shorter_axis() {
        let mut graph = SceneGraph::new();
        let mut camera = camera_at_z5(&mut graph);
        let raw = *camera.raw_projection_matrix();
        camera
            .set_aspect_ratio_policy(AspectRatioPolicy::Clip)
            .set_viewport(800, 600);

        let fixed = camera.projection_matrix();
        assert_relative_eq!(fixed[(0, 0)], raw[(0, 0)], epsilon = EPSILON);
        assert_relative_eq!(fixed[(1, 1)], raw[(1, 1)] * 800.0 / 600.0, epsilon = EPSILON);
    }

    #[test]
    fn test_fix_accounts_for_projection_aspect() {
        let mut graph = SceneGraph::new();
        let mut camera = camera_at_z5(&mut graph);
        camera
            .set_aspect_ratio_policy(AspectRatioPolicy::Extend)
            .set_viewport(800, 600);
        camera.set_projection(Deg(35.0), 2.0, 0.01, 1000.0).unwrap();

        // A 2:1 projection on a 4:3 viewport shows more vertically
        let raw = *camera.raw_projection_matrix();
        let fixed = camera.projection_matrix();
        assert_relative_eq!(fixed[(0, 0)], raw[(0, 0)], epsilon = EPSILON);
        assert_relative_eq!(fixed[(1, 1)], raw[(1, 1)] * (4.0 / 3.0) / 2.0, epsilon = EPSILON);
    }

    #[test]
    fn test_no_fix_without_viewport_or_policy() {
        let mut graph = SceneGraph::new();
        let mut camera = camera_at_z5(&mut graph);
        camera.set_viewport(800, 600);
        assert_eq!(camera.projection_matrix(), camera.raw_projection_matrix());

        camera
            .set_aspect_ratio_policy(AspectRatioPolicy::Clip)
            .set_viewport(0, 600);
        assert_eq!(camera.projection_matrix(), camera.raw_projection_matrix());
    }

    #[test]
    fn test_camera_on_removed_node() {
        let mut graph = SceneGraph::new();
        let camera = camera_at_z5(&mut graph);
        let group = graph.add_group("drawables");
        graph.remove_node(camera.node()).unwrap();

        let mut backend = RecordingBackend::new();
        assert!(matches!(
            camera.draw(&graph, group, &mut backend),
            Err(RenderError::Scene(SceneError::NodeNotFound(_)))
        ));
    }
}
