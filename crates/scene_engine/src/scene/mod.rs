//! Scene graph
//!
//! Transform nodes live in a [`SceneGraph`] arena. Every node except the root
//! has exactly one parent, and a node's absolute transform is the product of
//! its ancestors' local transforms. Drawables hang off nodes and are visited
//! through [`DrawableGroup`]s by a [`Camera`].

pub mod camera;
pub mod drawable;
pub mod graph;
pub mod group;

pub use camera::{AspectRatioPolicy, Camera, ProjectionError};
pub use drawable::{Drawable, DrawableSlot};
pub use graph::{DrawableId, GroupId, Node, NodeId, SceneGraph, TransformFrame};
pub use group::DrawableGroup;

use thiserror::Error;

/// Scene graph errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
    /// The node id is stale or belongs to another graph
    #[error("Node {0:?} not found")]
    NodeNotFound(NodeId),

    /// The drawable id is stale or belongs to another graph
    #[error("Drawable {0:?} not found")]
    DrawableNotFound(DrawableId),

    /// The group id is stale or belongs to another graph
    #[error("Drawable group {0:?} not found")]
    GroupNotFound(GroupId),

    /// Re-parenting would make a node its own ancestor
    #[error("Cannot parent {node:?} under {parent:?}: would create a cycle")]
    CycleDetected {
        /// Node being moved
        node: NodeId,
        /// Requested parent
        parent: NodeId,
    },

    /// The scene root cannot be moved, removed or transformed
    #[error("The scene root cannot be modified")]
    RootIsImmutable,

    /// A transform that must be inverted is singular
    #[error("Absolute transform of {0:?} is not invertible")]
    SingularTransform(NodeId),
}
