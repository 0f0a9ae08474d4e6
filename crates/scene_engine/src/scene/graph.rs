//! Transform node hierarchy
//!
//! Nodes are stored in a `slotmap` arena and addressed by generational
//! [`NodeId`] keys, so ids of removed nodes are detected instead of aliasing
//! new ones. Absolute transforms are computed on demand by walking up to the
//! root; nothing is cached.

use slotmap::{new_key_type, SlotMap};

use super::drawable::DrawableSlot;
use super::group::DrawableGroup;
use super::SceneError;
use crate::foundation::math::{Mat4, Mat4Ext, Rad, Vec3};

new_key_type! {
    /// Handle to a transform node in a [`SceneGraph`]
    pub struct NodeId;

    /// Handle to a drawable attached to a node
    pub struct DrawableId;

    /// Handle to a drawable group
    pub struct GroupId;
}

/// Frame in which a relative transformation is expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformFrame {
    /// Apply in the node's own frame: `local = local * delta`
    Local,
    /// Apply in the parent's frame: `local = delta * local`
    #[default]
    Parent,
}

/// A transform node
#[derive(Debug, Clone)]
pub struct Node {
    pub(super) local: Mat4,
    pub(super) parent: Option<NodeId>,
    pub(super) children: Vec<NodeId>,
    pub(super) drawables: Vec<DrawableId>,
}

impl Node {
    fn new(parent: Option<NodeId>) -> Self {
        Self {
            local: Mat4::identity(),
            parent,
            children: Vec::new(),
            drawables: Vec::new(),
        }
    }

    /// Transformation relative to the parent
    pub fn local_transform(&self) -> &Mat4 {
        &self.local
    }

    /// Parent node, `None` only for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in attachment order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Drawables attached to this node
    pub fn drawables(&self) -> &[DrawableId] {
        &self.drawables
    }
}

/// Arena holding the node hierarchy, its drawables and drawable groups
#[derive(Debug)]
pub struct SceneGraph {
    pub(super) nodes: SlotMap<NodeId, Node>,
    pub(super) drawables: SlotMap<DrawableId, DrawableSlot>,
    pub(super) groups: SlotMap<GroupId, DrawableGroup>,
    root: NodeId,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a graph containing only the scene root
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new(None));
        Self {
            nodes,
            drawables: SlotMap::with_key(),
            groups: SlotMap::with_key(),
            root,
        }
    }

    /// The scene root. Its absolute transform is always identity.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether `node` is alive in this graph
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    /// Number of live nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Borrow a node
    pub fn node(&self, node: NodeId) -> Result<&Node, SceneError> {
        self.nodes.get(node).ok_or(SceneError::NodeNotFound(node))
    }

    fn node_mut(&mut self, node: NodeId) -> Result<&mut Node, SceneError> {
        self.nodes.get_mut(node).ok_or(SceneError::NodeNotFound(node))
    }

    fn mutable_node(&mut self, node: NodeId) -> Result<&mut Node, SceneError> {
        if node == self.root {
            return Err(SceneError::RootIsImmutable);
        }
        self.node_mut(node)
    }

    /// Create a child of `parent` with an identity local transform
    pub fn add_node(&mut self, parent: NodeId) -> Result<NodeId, SceneError> {
        self.node(parent)?;
        let node = self.nodes.insert(Node::new(Some(parent)));
        self.node_mut(parent)?.children.push(node);
        log::trace!("Added node {node:?} under {parent:?}");
        Ok(node)
    }

    /// Parent of `node`
    pub fn parent(&self, node: NodeId) -> Result<Option<NodeId>, SceneError> {
        Ok(self.node(node)?.parent)
    }

    /// Children of `node` in attachment order
    pub fn children(&self, node: NodeId) -> Result<&[NodeId], SceneError> {
        Ok(&self.node(node)?.children)
    }

    /// Whether `node` lies strictly below `ancestor`
    pub fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> Result<bool, SceneError> {
        self.node(ancestor)?;
        let mut current = self.node(node)?.parent;
        while let Some(id) = current {
            if id == ancestor {
                return Ok(true);
            }
            current = self.node(id)?.parent;
        }
        Ok(false)
    }

    /// Move `node` under `new_parent`, appending it to the new parent's
    /// children.
    ///
    /// Fails with [`SceneError::CycleDetected`] when `new_parent` is `node`
    /// itself or one of its descendants. The hierarchy is unchanged on error.
    pub fn set_parent(&mut self, node: NodeId, new_parent: NodeId) -> Result<&mut Self, SceneError> {
        if node == self.root {
            return Err(SceneError::RootIsImmutable);
        }
        let old_parent = self.node(node)?.parent;
        self.node(new_parent)?;

        if node == new_parent || self.is_descendant(new_parent, node)? {
            return Err(SceneError::CycleDetected {
                node,
                parent: new_parent,
            });
        }
        if old_parent == Some(new_parent) {
            return Ok(self);
        }

        if let Some(old_parent) = old_parent {
            self.node_mut(old_parent)?.children.retain(|&child| child != node);
        }
        self.node_mut(new_parent)?.children.push(node);
        self.node_mut(node)?.parent = Some(new_parent);

        log::debug!("Re-parented {node:?} from {old_parent:?} to {new_parent:?}");
        Ok(self)
    }

    /// Remove `node`, its whole subtree and every drawable attached in it.
    ///
    /// Returns the number of nodes removed.
    pub fn remove_node(&mut self, node: NodeId) -> Result<usize, SceneError> {
        if node == self.root {
            return Err(SceneError::RootIsImmutable);
        }
        if let Some(parent) = self.node(node)?.parent {
            self.node_mut(parent)?.children.retain(|&child| child != node);
        }

        let mut pending = vec![node];
        let mut removed = 0;
        while let Some(id) = pending.pop() {
            let Some(entry) = self.nodes.remove(id) else {
                continue;
            };
            for drawable in entry.drawables {
                self.forget_drawable(drawable);
            }
            pending.extend(entry.children);
            removed += 1;
        }

        log::debug!("Removed {removed} node(s) rooted at {node:?}");
        Ok(removed)
    }

    /// Local transformation of `node`
    pub fn local_transform(&self, node: NodeId) -> Result<Mat4, SceneError> {
        Ok(self.node(node)?.local)
    }

    /// Replace the local transformation of `node`
    pub fn set_transformation(&mut self, node: NodeId, transformation: Mat4) -> Result<&mut Self, SceneError> {
        self.mutable_node(node)?.local = transformation;
        Ok(self)
    }

    /// Reset the local transformation of `node` to identity
    pub fn reset_transformation(&mut self, node: NodeId) -> Result<&mut Self, SceneError> {
        self.set_transformation(node, Mat4::identity())
    }

    /// Compose `delta` with the local transformation of `node`
    pub fn transform(&mut self, node: NodeId, delta: &Mat4, frame: TransformFrame) -> Result<&mut Self, SceneError> {
        let entry = self.mutable_node(node)?;
        entry.local = match frame {
            TransformFrame::Local => entry.local * delta,
            TransformFrame::Parent => delta * entry.local,
        };
        Ok(self)
    }

    /// Translate `node` by `offset`
    pub fn translate(&mut self, node: NodeId, offset: &Vec3, frame: TransformFrame) -> Result<&mut Self, SceneError> {
        self.transform(node, &Mat4::translation(offset), frame)
    }

    /// Rotate `node` around `axis`. The axis does not need to be normalized.
    pub fn rotate(
        &mut self,
        node: NodeId,
        angle: impl Into<Rad>,
        axis: &Vec3,
        frame: TransformFrame,
    ) -> Result<&mut Self, SceneError> {
        self.transform(node, &Mat4::rotation(angle.into(), axis), frame)
    }

    /// Rotate `node` around the X axis
    pub fn rotate_x(&mut self, node: NodeId, angle: impl Into<Rad>, frame: TransformFrame) -> Result<&mut Self, SceneError> {
        self.transform(node, &Mat4::rotation_x(angle.into()), frame)
    }

    /// Rotate `node` around the Y axis
    pub fn rotate_y(&mut self, node: NodeId, angle: impl Into<Rad>, frame: TransformFrame) -> Result<&mut Self, SceneError> {
        self.transform(node, &Mat4::rotation_y(angle.into()), frame)
    }

    /// Rotate `node` around the Z axis
    pub fn rotate_z(&mut self, node: NodeId, angle: impl Into<Rad>, frame: TransformFrame) -> Result<&mut Self, SceneError> {
        self.transform(node, &Mat4::rotation_z(angle.into()), frame)
    }

    /// Scale `node` by per-axis `factors`
    pub fn scale(&mut self, node: NodeId, factors: &Vec3, frame: TransformFrame) -> Result<&mut Self, SceneError> {
        self.transform(node, &Mat4::scaling(factors), frame)
    }

    /// Absolute transformation of `node`: the product of local transforms
    /// from the root down to `node`.
    pub fn absolute_transform(&self, node: NodeId) -> Result<Mat4, SceneError> {
        let entry = self.node(node)?;
        let mut absolute = entry.local;
        let mut current = entry.parent;
        while let Some(id) = current {
            let ancestor = self.node(id)?;
            absolute = ancestor.local * absolute;
            current = ancestor.parent;
        }
        Ok(absolute)
    }
}
