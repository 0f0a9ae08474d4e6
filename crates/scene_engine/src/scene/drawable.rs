//! Drawables attached to scene nodes
//!
//! A drawable belongs to exactly one node and one [`DrawableGroup`]. Its
//! world matrix is the absolute transform of its node with the translation
//! column replaced by the drawable's own position, so rotation and scale are
//! inherited while placement is set directly.
//!
//! [`DrawableGroup`]: super::DrawableGroup

use super::graph::{DrawableId, GroupId, NodeId, SceneGraph};
use super::{Camera, SceneError};
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
use crate::render::{RenderBackend, RenderError};

/// Something the camera can draw
pub trait Drawable {
    /// Issue draw calls for this drawable.
    ///
    /// `transformation` is the camera-relative (view × world) matrix.
    fn draw(&self, transformation: &Mat4, camera: &Camera, backend: &mut dyn RenderBackend) -> Result<(), RenderError>;
}

/// Storage entry for one attached drawable
pub struct DrawableSlot {
    node: NodeId,
    group: GroupId,
    position: Vec3,
    drawable: Box<dyn Drawable>,
}

impl std::fmt::Debug for DrawableSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawableSlot")
            .field("node", &self.node)
            .field("group", &self.group)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

impl DrawableSlot {
    /// Node the drawable is attached to
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Group the drawable is registered in
    pub fn group(&self) -> GroupId {
        self.group
    }

    /// World-space position used in place of the node's translation
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Move the drawable. Only the position override changes.
    pub fn update_position(&mut self, position: Vec3) -> &mut Self {
        self.position = position;
        self
    }

    /// The drawable behaviour
    pub fn drawable(&self) -> &dyn Drawable {
        self.drawable.as_ref()
    }
}

impl SceneGraph {
    /// Attach `drawable` to `node` and append it to `group`.
    ///
    /// The position starts at the node's current absolute translation.
    pub fn attach_drawable(
        &mut self,
        node: NodeId,
        group: GroupId,
        drawable: impl Drawable + 'static,
    ) -> Result<DrawableId, SceneError> {
        let position = self.absolute_transform(node)?.translation_part();
        self.attach_drawable_at(node, group, position, drawable)
    }

    /// Attach `drawable` to `node` at an explicit world position
    pub fn attach_drawable_at(
        &mut self,
        node: NodeId,
        group: GroupId,
        position: Vec3,
        drawable: impl Drawable + 'static,
    ) -> Result<DrawableId, SceneError> {
        self.node(node)?;
        self.group(group)?;

        let id = self.drawables.insert(DrawableSlot {
            node,
            group,
            position,
            drawable: Box::new(drawable),
        });
        self.nodes[node].drawables.push(id);
        self.groups[group].push(id);

        log::debug!("Attached drawable {id:?} to node {node:?} at {position:?}");
        Ok(id)
    }

    /// Detach and destroy a drawable
    pub fn remove_drawable(&mut self, id: DrawableId) -> Result<(), SceneError> {
        let node = self.drawable(id)?.node;
        if let Some(entry) = self.nodes.get_mut(node) {
            entry.drawables.retain(|&drawable| drawable != id);
        }
        self.forget_drawable(id);
        Ok(())
    }

    /// Drop a drawable slot and its group membership, leaving node lists alone
    pub(super) fn forget_drawable(&mut self, id: DrawableId) {
        if let Some(slot) = self.drawables.remove(id) {
            if let Some(group) = self.groups.get_mut(slot.group) {
                group.remove(id);
            }
        }
    }

    /// Borrow a drawable slot
    pub fn drawable(&self, id: DrawableId) -> Result<&DrawableSlot, SceneError> {
        self.drawables.get(id).ok_or(SceneError::DrawableNotFound(id))
    }

    /// Mutably borrow a drawable slot
    pub fn drawable_mut(&mut self, id: DrawableId) -> Result<&mut DrawableSlot, SceneError> {
        self.drawables.get_mut(id).ok_or(SceneError::DrawableNotFound(id))
    }

    /// Drawables attached directly to `node`
    pub fn drawables_of(&self, node: NodeId) -> Result<&[DrawableId], SceneError> {
        Ok(self.node(node)?.drawables())
    }

    /// Number of live drawables
    pub fn drawable_count(&self) -> usize {
        self.drawables.len()
    }

    /// World matrix of a drawable: the node's absolute rotation and scale
    /// with the drawable's position as translation
    pub fn drawable_world_transform(&self, id: DrawableId) -> Result<Mat4, SceneError> {
        let slot = self.drawable(id)?;
        Ok(self.absolute_transform(slot.node)?.with_translation(&slot.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Deg, Rad};
    use crate::scene::TransformFrame;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    struct Noop;

    impl Drawable for Noop {
        fn draw(&self, _: &Mat4, _: &Camera, _: &mut dyn RenderBackend) -> Result<(), RenderError> {
            Ok(())
        }
    }

    #[test]
    fn test_attach_starts_at_node_translation() {
        let mut graph = SceneGraph::new();
        let group = graph.add_group("drawables");
        let node = graph.add_node(graph.root()).unwrap();
        graph.translate(node, &Vec3::new(1.0, 2.0, 3.0), TransformFrame::Parent).unwrap();

        let id = graph.attach_drawable(node, group, Noop).unwrap();
        assert_eq!(graph.drawable(id).unwrap().position(), Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(
            graph.drawable_world_transform(id).unwrap(),
            graph.absolute_transform(node).unwrap(),
            epsilon = EPSILON
        );
        assert_eq!(graph.drawables_of(node).unwrap(), &[id]);
    }

    #[test]
    fn test_position_override_keeps_rotation_scaling() {
        let mut graph = SceneGraph::new();
        let group = graph.add_group("drawables");
        let parent = graph.add_node(graph.root()).unwrap();
        let node = graph.add_node(parent).unwrap();
        graph
            .rotate(parent, Rad(0.7), &Vec3::new(0.0, 1.0, 1.0), TransformFrame::Parent)
            .unwrap()
            .translate(parent, &Vec3::new(4.0, 4.0, 4.0), TransformFrame::Parent)
            .unwrap();
        graph
            .scale(node, &Vec3::new(2.0, 0.5, 1.5), TransformFrame::Local)
            .unwrap()
            .rotate_z(node, Deg(30.0), TransformFrame::Local)
            .unwrap();

        let position = Vec3::new(2.0, 1.0, -6.0);
        let id = graph.attach_drawable_at(node, group, position, Noop).unwrap();

        let world = graph.drawable_world_transform(id).unwrap();
        let absolute = graph.absolute_transform(node).unwrap();
        assert_eq!(world.translation_part(), position);
        assert_relative_eq!(world.rotation_scaling(), absolute.rotation_scaling(), epsilon = EPSILON);
        assert_eq!(world.row(3).transpose(), absolute.row(3).transpose());
    }

    #[test]
    fn test_update_position_chains() {
        let mut graph = SceneGraph::new();
        let group = graph.add_group("drawables");
        let id = graph.attach_drawable(graph.root(), group, Noop).unwrap();

        graph
            .drawable_mut(id)
            .unwrap()
            .update_position(Vec3::new(1.0, 0.0, 0.0))
            .update_position(Vec3::new(0.0, 0.0, -2.0));

        assert_eq!(graph.drawable(id).unwrap().position(), Vec3::new(0.0, 0.0, -2.0));
        // The node is untouched
        assert_eq!(graph.absolute_transform(graph.root()).unwrap(), Mat4::identity());
    }

    #[test]
    fn test_remove_drawable_leaves_group_and_node() {
        let mut graph = SceneGraph::new();
        let group = graph.add_group("drawables");
        let node = graph.add_node(graph.root()).unwrap();
        let first = graph.attach_drawable(node, group, Noop).unwrap();
        let second = graph.attach_drawable(node, group, Noop).unwrap();

        graph.remove_drawable(first).unwrap();

        assert_eq!(graph.drawables_of(node).unwrap(), &[second]);
        assert_eq!(graph.group(group).unwrap().iter().collect::<Vec<_>>(), vec![second]);
        assert_eq!(graph.remove_drawable(first), Err(SceneError::DrawableNotFound(first)));
    }

    #[test]
    fn test_removing_node_destroys_its_drawables() {
        let mut graph = SceneGraph::new();
        let group = graph.add_group("drawables");
        let parent = graph.add_node(graph.root()).unwrap();
        let child = graph.add_node(parent).unwrap();
        let keep = graph.attach_drawable(graph.root(), group, Noop).unwrap();
        let inner = graph.attach_drawable(child, group, Noop).unwrap();

        graph.remove_node(parent).unwrap();

        assert_eq!(graph.drawable_count(), 1);
        assert!(graph.drawable(inner).is_err());
        assert_eq!(graph.group(group).unwrap().iter().collect::<Vec<_>>(), vec![keep]);
    }
}
