//! Head aim: cone-limited look-at with exponential smoothing.

use glam::{Quat, Vec3};

use crate::math::{self, FORWARD, UP};
use crate::rig::config::HeadConfig;
use crate::scene::{NodeHandle, Scene};

/// Head aim solver.
#[derive(Debug, Clone)]
pub struct HeadAim {
    pub config: HeadConfig,
}

impl HeadAim {
    #[must_use]
    pub fn new(config: HeadConfig) -> Self {
        Self { config }
    }

    /// Local rotation the head should have to look along `local_dir` (a
    /// direction in the head's parent space), limited to the cone.
    ///
    /// Returns `None` for a degenerate direction.
    #[must_use]
    pub fn aim_rotation(&self, local_dir: Vec3) -> Option<Quat> {
        let clamped = math::rotate_towards(FORWARD, local_dir, self.config.max_angle.to_radians())?;
        math::look_rotation(clamped, UP)
    }

    /// Rotates `head` toward `target` (world space) for one tick.
    pub fn update(&self, scene: &mut Scene, head: NodeHandle, target: Vec3, dt: f32) {
        let head_pos = scene.world_position(head);
        let to_target = scene
            .parent_world_matrix(head)
            .inverse()
            .transform_vector3(target - head_pos);

        let Some(aim) = self.aim_rotation(to_target) else {
            log::trace!("head aim skipped: target coincides with head");
            return;
        };

        if let Some(node) = scene.get_node_mut(head) {
            let rotation =
                math::smooth_quat(node.transform.rotation, aim, self.config.turn_rate, dt);
            node.transform.set_rotation(rotation);
        }
    }
}
