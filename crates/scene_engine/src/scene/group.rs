//! Drawable groups
//!
//! A group is the unit a camera draws. Members are visited in insertion
//! order with no depth sorting.

use super::graph::{DrawableId, GroupId, SceneGraph};
use super::SceneError;

/// Ordered set of drawables drawn together
#[derive(Debug, Clone, Default)]
pub struct DrawableGroup {
    name: String,
    order: Vec<DrawableId>,
}

impl DrawableGroup {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            order: Vec::new(),
        }
    }

    /// Group name, for logging
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of drawables in the group
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the group has no drawables
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Drawables in draw order
    pub fn iter(&self) -> impl Iterator<Item = DrawableId> + '_ {
        self.order.iter().copied()
    }

    /// Whether `id` is a member
    pub fn contains(&self, id: DrawableId) -> bool {
        self.order.contains(&id)
    }

    pub(super) fn push(&mut self, id: DrawableId) {
        self.order.push(id);
    }

    pub(super) fn remove(&mut self, id: DrawableId) {
        self.order.retain(|&member| member != id);
    }
}

impl SceneGraph {
    /// Create an empty drawable group
    pub fn add_group(&mut self, name: impl Into<String>) -> GroupId {
        let group = DrawableGroup::new(name);
        log::debug!("Created drawable group '{}'", group.name);
        self.groups.insert(group)
    }

    /// Borrow a drawable group
    pub fn group(&self, id: GroupId) -> Result<&DrawableGroup, SceneError> {
        self.groups.get(id).ok_or(SceneError::GroupNotFound(id))
    }
}
