use glam::{Affine3A, Quat, Vec3};
use slotmap::{SlotMap, SparseSecondaryMap};

use crate::scene::NodeHandle;
use crate::scene::morph::MorphTargets;
use crate::scene::node::Node;
use crate::scene::transform_system;

/// Scene graph.
///
/// Pure data layer holding named transform nodes and their component maps.
/// The rig reads and writes node transforms through the world-space helpers
/// below, which always reflect the current TRS values of the whole parent
/// chain (no stale cache).
#[derive(Debug, Default)]
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    pub morph_targets: SparseSecondaryMap<NodeHandle, MorphTargets>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Node management
    // ========================================================================

    /// Starts building a node.
    pub fn build_node(&'_ mut self, name: &str) -> NodeBuilder<'_> {
        NodeBuilder::new(self, name)
    }

    /// Adds a node at the root of the scene.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    /// Creates an empty named node at the root of the scene.
    pub fn create_node_with_name(&mut self, name: &str) -> NodeHandle {
        self.add_node(Node::new(name))
    }

    pub fn add_to_parent(&mut self, child: Node, parent: NodeHandle) -> NodeHandle {
        let handle = self.add_node(child);
        self.attach(handle, parent);
        handle
    }

    /// Makes `child` a child of `parent`, keeping both sides in sync.
    ///
    /// The child's local transform is kept as-is, so its world transform
    /// changes to follow the new parent. Attaching a node under itself or
    /// under one of its descendants is refused.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent || self.is_ancestor(child, parent) {
            log::warn!("Refusing to attach node under itself or its descendant");
            return;
        }
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            log::error!("Node not found during attach");
            return;
        }

        let old_parent = self.nodes.get(child).and_then(|n| n.parent);
        if let Some(p) = old_parent {
            if let Some(n) = self.nodes.get_mut(p)
                && let Some(i) = n.children.iter().position(|&x| x == child)
            {
                n.children.remove(i);
            }
        } else if let Some(i) = self.root_nodes.iter().position(|&x| x == child) {
            self.root_nodes.remove(i);
        }

        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
            c.transform.mark_dirty();
        }
    }

    /// Whether `ancestor` appears on `node`'s parent chain.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeHandle, node: NodeHandle) -> bool {
        let mut current = self.nodes.get(node).and_then(|n| n.parent);
        while let Some(handle) = current {
            if handle == ancestor {
                return true;
            }
            current = self.nodes.get(handle).and_then(|n| n.parent);
        }
        false
    }

    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[must_use]
    pub fn get_name(&self, handle: NodeHandle) -> Option<&str> {
        self.nodes.get(handle).map(|n| n.name.as_str())
    }

    /// Finds the first node with the given name.
    #[must_use]
    pub fn find_node_by_name(&self, name: &str) -> Option<NodeHandle> {
        self.nodes
            .iter()
            .find_map(|(handle, node)| (node.name == name).then_some(handle))
    }

    // ========================================================================
    // World-space queries (fresh, parent chain walked every call)
    // ========================================================================

    /// World matrix of a node computed from the current local transforms.
    /// Unknown handles yield the identity.
    #[must_use]
    pub fn world_matrix(&self, handle: NodeHandle) -> Affine3A {
        let Some(node) = self.nodes.get(handle) else {
            return Affine3A::IDENTITY;
        };
        let local = node.transform.compute_local_matrix();
        match node.parent {
            Some(parent) => self.world_matrix(parent) * local,
            None => local,
        }
    }

    /// World matrix of a node's parent (identity for root nodes).
    #[must_use]
    pub fn parent_world_matrix(&self, handle: NodeHandle) -> Affine3A {
        match self.nodes.get(handle).and_then(|n| n.parent) {
            Some(parent) => self.world_matrix(parent),
            None => Affine3A::IDENTITY,
        }
    }

    #[must_use]
    pub fn world_position(&self, handle: NodeHandle) -> Vec3 {
        self.world_matrix(handle).translation.into()
    }

    /// World rotation as the product of local rotations along the chain.
    #[must_use]
    pub fn world_rotation(&self, handle: NodeHandle) -> Quat {
        let Some(node) = self.nodes.get(handle) else {
            return Quat::IDENTITY;
        };
        match node.parent {
            Some(parent) => (self.world_rotation(parent) * node.transform.rotation).normalize(),
            None => node.transform.rotation,
        }
    }

    /// World rotation of a node's parent (identity for root nodes).
    #[must_use]
    pub fn parent_world_rotation(&self, handle: NodeHandle) -> Quat {
        match self.nodes.get(handle).and_then(|n| n.parent) {
            Some(parent) => self.world_rotation(parent),
            None => Quat::IDENTITY,
        }
    }

    /// Moves a node so its world position is `position`.
    pub fn set_world_position(&mut self, handle: NodeHandle, position: Vec3) {
        let local = self
            .parent_world_matrix(handle)
            .inverse()
            .transform_point3(position);
        if let Some(node) = self.nodes.get_mut(handle) {
            node.transform.set_position(local);
        }
    }

    /// Rotates a node so its world rotation is `rotation`.
    pub fn set_world_rotation(&mut self, handle: NodeHandle, rotation: Quat) {
        let local = (self.parent_world_rotation(handle).inverse() * rotation).normalize();
        if let Some(node) = self.nodes.get_mut(handle) {
            node.transform.set_rotation(local);
        }
    }

    // ========================================================================
    // Morph targets
    // ========================================================================

    pub fn set_morph_targets(&mut self, handle: NodeHandle, targets: MorphTargets) {
        self.morph_targets.insert(handle, targets);
    }

    #[must_use]
    pub fn morph_targets(&self, handle: NodeHandle) -> Option<&MorphTargets> {
        self.morph_targets.get(handle)
    }

    pub fn morph_targets_mut(&mut self, handle: NodeHandle) -> Option<&mut MorphTargets> {
        self.morph_targets.get_mut(handle)
    }

    // ========================================================================
    // Matrix propagation
    // ========================================================================

    /// Refreshes the cached world matrices of the whole scene and returns
    /// how many were rewritten.
    pub fn update_matrix_world(&mut self) -> usize {
        transform_system::propagate_world_matrices(&mut self.nodes, &self.root_nodes)
    }
}

/// Fluent node construction.
pub struct NodeBuilder<'a> {
    scene: &'a mut Scene,
    node: Node,
    parent: Option<NodeHandle>,
}

impl<'a> NodeBuilder<'a> {
    pub fn new(scene: &'a mut Scene, name: &str) -> Self {
        Self {
            scene,
            node: Node::new(name),
            parent: None,
        }
    }

    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.node.transform.position = position;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.node.transform.rotation = rotation;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, s: f32) -> Self {
        self.node.transform.scale = Vec3::splat(s);
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent: NodeHandle) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Inserts the node into the scene and returns its handle.
    pub fn build(self) -> NodeHandle {
        let handle = self.scene.add_node(self.node);
        if let Some(parent) = self.parent {
            self.scene.attach(handle, parent);
        }
        handle
    }
}
