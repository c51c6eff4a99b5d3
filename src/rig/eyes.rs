//! Eye convergence with per-axis Euler limits.
//!
//! Both eyes track one shared world-space look rotation. Limits are applied
//! in local Euler space *after* the slerp, so an eye can swing past its
//! bound for the duration of the interpolation and then snap back to it.
//! Roll is always discarded.

use glam::{EulerRot, Quat, Vec3};

use crate::math::{self, UP};
use crate::rig::config::{EyeConfig, EyeLimits};
use crate::scene::{NodeHandle, Scene};

/// Clamps a local eye rotation to `limits`, dropping roll.
///
/// The rotation is decomposed Y-X-Z (yaw, pitch, roll), yaw and pitch are
/// wrapped into `(-180, 180]` and clamped, and the result is recomposed
/// with zero roll.
#[must_use]
pub fn clamp_eye_rotation(local: Quat, limits: &EyeLimits) -> Quat {
    let (yaw, pitch, _roll) = local.to_euler(EulerRot::YXZ);

    let pitch = math::clamp_degrees(
        math::wrap_degrees(pitch.to_degrees()),
        limits.min_x,
        limits.max_x,
    );
    let yaw = math::clamp_degrees(
        math::wrap_degrees(yaw.to_degrees()),
        limits.min_y,
        limits.max_y,
    );

    Quat::from_euler(EulerRot::YXZ, yaw.to_radians(), pitch.to_radians(), 0.0)
}

/// Eye convergence solver.
#[derive(Debug, Clone)]
pub struct EyeConvergence {
    pub config: EyeConfig,
}

impl EyeConvergence {
    #[must_use]
    pub fn new(config: EyeConfig) -> Self {
        Self { config }
    }

    /// Updates both eyes for one tick.
    ///
    /// `head` is the convergence origin, `up` the character's up axis.
    pub fn update(
        &self,
        scene: &mut Scene,
        head: NodeHandle,
        left_eye: NodeHandle,
        right_eye: NodeHandle,
        up: Vec3,
        target: Vec3,
        dt: f32,
    ) {
        let head_pos = scene.world_position(head);
        let up = up.try_normalize().unwrap_or(UP);

        let Some(look) = math::look_rotation(target - head_pos, up) else {
            log::trace!("eye convergence skipped: target coincides with head");
            return;
        };

        let factor = math::smoothing_factor(self.config.track_rate, dt);
        Self::converge(scene, left_eye, look, factor, &self.config.left);
        Self::converge(scene, right_eye, look, factor, &self.config.right);
    }

    fn converge(scene: &mut Scene, eye: NodeHandle, look: Quat, factor: f32, limits: &EyeLimits) {
        let world = scene.world_rotation(eye).slerp(look, factor);
        let local = (scene.parent_world_rotation(eye).inverse() * world).normalize();
        let clamped = clamp_eye_rotation(local, limits);

        if let Some(node) = scene.get_node_mut(eye) {
            node.transform.set_rotation(clamped);
        }
    }
}
