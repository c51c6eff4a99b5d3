//! World-matrix propagation.
//!
//! Rig solvers never read these cached matrices. They walk the parent chain
//! through [`Scene::world_matrix`](crate::scene::Scene::world_matrix), since
//! root motion earlier in a tick moves nodes that later solvers read.
//! Propagation runs once at the end of the tick so renderers and downstream
//! IK see one consistent pose.

use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::NodeHandle;
use crate::scene::node::Node;

struct Pending {
    handle: NodeHandle,
    parent_world: Affine3A,
    parent_dirty: bool,
}

/// Refreshes cached world matrices below `roots`, depth first, without
/// recursion.
///
/// A node is rewritten when its own TRS changed or an ancestor was
/// rewritten. Returns the number of world matrices rewritten.
pub fn propagate_world_matrices(nodes: &mut SlotMap<NodeHandle, Node>, roots: &[NodeHandle]) -> usize {
    let mut pending: Vec<Pending> = roots
        .iter()
        .rev()
        .map(|&handle| Pending {
            handle,
            parent_world: Affine3A::IDENTITY,
            parent_dirty: false,
        })
        .collect();
    let mut rewritten = 0;

    while let Some(Pending {
        handle,
        parent_world,
        parent_dirty,
    }) = pending.pop()
    {
        let Some(node) = nodes.get_mut(handle) else {
            continue;
        };

        let dirty = node.transform.update_local_matrix() || parent_dirty;
        if dirty {
            node.transform.world_matrix = parent_world * node.transform.local_matrix;
            rewritten += 1;
        }

        let world = node.transform.world_matrix;
        pending.extend(node.children.iter().rev().map(|&child| Pending {
            handle: child,
            parent_world: world,
            parent_dirty: dirty,
        }));
    }

    rewritten
}
