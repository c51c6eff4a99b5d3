//! Scene graph module
//!
//! The transform hierarchy the rig reads from and writes to:
//! - Node: named scene node (parent/children + transform)
//! - Transform: local TRS with cached matrices
//! - Scene: node container with world-space helpers
//! - MorphTargets: blend-shape weights attached to a node
//! - TransformSystem: world-matrix propagation

pub mod morph;
pub mod node;
pub mod scene;
pub mod transform;
pub mod transform_system;

pub use morph::MorphTargets;
pub use node::Node;
pub use scene::{NodeBuilder, Scene};
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
}
