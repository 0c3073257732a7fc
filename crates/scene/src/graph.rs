//! Node storage and parent/child bookkeeping.

use crate::geometry::{Geometry, Material};
use glam::Vec3;
use std::collections::HashMap;
use thiserror::Error;
use tracing::trace;

/// Handle to a node owned by a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeHandle(u64);

/// Errors raised by scene graph mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SceneError {
    /// The handle does not refer to a live node.
    #[error("unknown scene node {0:?}")]
    UnknownNode(NodeHandle),
    /// The node already has a parent.
    #[error("scene node {0:?} is already attached")]
    AlreadyAttached(NodeHandle),
    /// Attaching would make a node its own ancestor.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    Cycle {
        /// Proposed parent.
        parent: NodeHandle,
        /// Proposed child.
        child: NodeHandle,
    },
    /// The root node cannot be moved or removed.
    #[error("the root node cannot be modified this way")]
    RootImmutable,
}

/// Deferred operation applied to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeAction {
    /// Detach the node from its parent and release its subtree.
    RemoveFromParent,
}

/// A scene node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    /// Optional name used for lookups and debugging.
    pub name: Option<String>,
    /// Attached shape.
    pub geometry: Option<Geometry>,
    /// Appearance of the geometry.
    pub material: Option<Material>,
    /// Translation relative to the parent.
    pub position: Vec3,
    parent: Option<NodeHandle>,
    children: Vec<NodeHandle>,
}

impl Node {
    /// Parent of this node, if attached.
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }
}

/// Owns every node of a scene.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: HashMap<NodeHandle, Node>,
    root: NodeHandle,
    next_handle: u64,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a graph containing only the root node.
    pub fn new() -> Self {
        let root = NodeHandle(0);
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            Node {
                name: Some("root".to_string()),
                ..Default::default()
            },
        );
        Self {
            nodes,
            root,
            next_handle: 1,
        }
    }

    /// Handle of the root node.
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    /// Number of live nodes, including the root and detached nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether only the root remains.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Create a detached node carrying `geometry`.
    pub fn create_node(&mut self, geometry: Option<Geometry>) -> NodeHandle {
        let handle = NodeHandle(self.next_handle);
        self.next_handle += 1;
        self.nodes.insert(
            handle,
            Node {
                geometry,
                ..Default::default()
            },
        );
        handle
    }

    /// Look up a node.
    pub fn node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(&handle)
    }

    /// Look up a node mutably.
    pub fn node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(&handle)
    }

    fn require(&self, handle: NodeHandle) -> Result<&Node, SceneError> {
        self.nodes.get(&handle).ok_or(SceneError::UnknownNode(handle))
    }

    /// Children of `handle`, empty for unknown nodes.
    pub fn children(&self, handle: NodeHandle) -> &[NodeHandle] {
        self.nodes
            .get(&handle)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Attach a detached node under `parent`.
    pub fn add_child(&mut self, parent: NodeHandle, child: NodeHandle) -> Result<(), SceneError> {
        if child == self.root {
            return Err(SceneError::RootImmutable);
        }
        self.require(parent)?;
        if self.require(child)?.parent.is_some() {
            return Err(SceneError::AlreadyAttached(child));
        }
        if self.is_ancestor(child, parent) {
            return Err(SceneError::Cycle { parent, child });
        }

        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
        Ok(())
    }

    /// Whether `ancestor` is `node` or lies on its parent chain.
    fn is_ancestor(&self, ancestor: NodeHandle, node: NodeHandle) -> bool {
        let mut current = Some(node);
        while let Some(handle) = current {
            if handle == ancestor {
                return true;
            }
            current = self.nodes.get(&handle).and_then(|n| n.parent);
        }
        false
    }

    /// Whether the node is reachable from the root.
    pub fn is_attached(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(&handle) && self.is_ancestor(self.root, handle)
    }

    /// World-space translation of a node.
    pub fn world_position(&self, handle: NodeHandle) -> Option<Vec3> {
        let mut node = self.nodes.get(&handle)?;
        let mut position = node.position;
        while let Some(parent) = node.parent {
            node = self.nodes.get(&parent)?;
            position += node.position;
        }
        Some(position)
    }

    /// Move a node so its world-space translation equals `position`.
    pub fn set_world_position(&mut self, handle: NodeHandle, position: Vec3) -> Result<(), SceneError> {
        let parent_position = match self.require(handle)?.parent {
            Some(parent) => self.world_position(parent).unwrap_or(Vec3::ZERO),
            None => Vec3::ZERO,
        };
        if let Some(node) = self.nodes.get_mut(&handle) {
            node.position = position - parent_position;
        }
        Ok(())
    }

    /// Apply `action` to a node, returning how many nodes were released.
    pub fn run_action(&mut self, handle: NodeHandle, action: NodeAction) -> Result<usize, SceneError> {
        match action {
            NodeAction::RemoveFromParent => self.remove_from_parent(handle),
        }
    }

    fn remove_from_parent(&mut self, handle: NodeHandle) -> Result<usize, SceneError> {
        if handle == self.root {
            return Err(SceneError::RootImmutable);
        }
        let parent = self.require(handle)?.parent;
        if let Some(parent) = parent {
            if let Some(parent) = self.nodes.get_mut(&parent) {
                parent.children.retain(|c| *c != handle);
            }
        }

        let mut released = 0;
        let mut stack = vec![handle];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                stack.extend(node.children);
                released += 1;
            }
        }
        trace!(?handle, released, "Removed node subtree");
        Ok(released)
    }

    /// Attached nodes in depth-first order, starting at the root.
    pub fn traverse(&self) -> Vec<NodeHandle> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(handle) = stack.pop() {
            order.push(handle);
            stack.extend(self.children(handle).iter().rev().copied());
        }
        order
    }

    /// First attached node named `name`, in traversal order.
    pub fn find_by_name(&self, name: &str) -> Option<NodeHandle> {
        self.traverse()
            .into_iter()
            .find(|handle| self.nodes[handle].name.as_deref() == Some(name))
    }
}
