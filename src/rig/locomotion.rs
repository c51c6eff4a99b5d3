//! Root motion toward a moving target.
//!
//! Turning and translation are both driven by velocities that are low-pass
//! filtered toward their targets, never assigned directly, so the root's
//! motion is continuous.

use glam::{Quat, Vec3};

use crate::math::{self, FORWARD, UP};
use crate::rig::config::LocomotionConfig;
use crate::scene::{NodeHandle, Scene};

/// Beyond this yaw error (degrees) the root turns in place.
const WALK_CONE: f32 = 90.0;

/// Root locomotion controller with persistent velocity state.
#[derive(Debug, Clone)]
pub struct Locomotion {
    pub config: LocomotionConfig,
    velocity: Vec3,
    angular_velocity: f32,
}

impl Locomotion {
    #[must_use]
    pub fn new(config: LocomotionConfig) -> Self {
        Self {
            config,
            velocity: Vec3::ZERO,
            angular_velocity: 0.0,
        }
    }

    /// Current smoothed linear velocity (world space, units/s).
    #[inline]
    #[must_use]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Current smoothed yaw velocity in degrees per second.
    #[inline]
    #[must_use]
    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    /// Yaw velocity the controller steers toward for a given yaw error.
    #[must_use]
    pub fn target_angular_velocity(&self, angle: f32) -> f32 {
        if angle.abs() <= self.config.max_angle {
            0.0
        } else {
            self.config.turn_speed.copysign(angle)
        }
    }

    /// Linear velocity the controller steers toward.
    ///
    /// `direction` is the up-plane projection of root-to-target, `angle` the
    /// yaw error in degrees and `distance` the reference-to-target distance.
    #[must_use]
    pub fn target_velocity(&self, direction: Vec3, angle: f32, distance: f32) -> Vec3 {
        if angle.abs() >= WALK_CONE {
            return Vec3::ZERO;
        }
        let Some(dir) = direction.try_normalize() else {
            return Vec3::ZERO;
        };

        if distance > self.config.max_distance {
            dir * self.config.move_speed
        } else if distance < self.config.min_distance {
            -dir * self.config.move_speed
        } else {
            Vec3::ZERO
        }
    }

    /// Advances the root one tick.
    ///
    /// `reference` is the node the band distance is measured from; pass the
    /// root itself to measure from the root origin.
    pub fn update(
        &mut self,
        scene: &mut Scene,
        root: NodeHandle,
        reference: NodeHandle,
        target: Vec3,
        dt: f32,
    ) {
        let dt = dt.max(0.0);
        let root_pos = scene.world_position(root);
        let root_rot = scene.world_rotation(root);

        let forward = math::project_on_plane(root_rot * FORWARD, UP);
        let toward = math::project_on_plane(target - root_pos, UP);
        let angle = math::signed_angle(forward, toward, UP);

        // Turning
        let target_angular = self.target_angular_velocity(angle);
        self.angular_velocity = math::smooth_f32(
            self.angular_velocity,
            target_angular,
            self.config.turn_acceleration,
            dt,
        );
        let yaw = Quat::from_axis_angle(UP, (self.angular_velocity * dt).to_radians());
        scene.set_world_rotation(root, (yaw * root_rot).normalize());

        // Translation
        let distance = scene.world_position(reference).distance(target);
        let target_velocity = self.target_velocity(toward, angle, distance);
        self.velocity = math::smooth_vec3(
            self.velocity,
            target_velocity,
            self.config.move_acceleration,
            dt,
        );

        scene.set_world_position(root, root_pos + self.velocity * dt);
    }
}
