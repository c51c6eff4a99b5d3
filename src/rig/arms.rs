use crate::math;
use crate::rig::config::ArmConfig;
use crate::scene::{NodeHandle, Scene};

/// Scene nodes driven by one arm: the hand IK target and the anchor it
/// reaches for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmNodes {
    pub target: NodeHandle,
    pub anchor: NodeHandle,
}

/// Hand targets trail their grab anchors with exponential smoothing.
///
/// No chain solving happens here; the downstream IK bends the arm.
#[derive(Debug, Clone)]
pub struct ArmPlacement {
    pub config: ArmConfig,
    arms: Vec<ArmNodes>,
}

impl ArmPlacement {
    #[must_use]
    pub fn new(config: ArmConfig, arms: Vec<ArmNodes>) -> Self {
        Self { config, arms }
    }

    #[must_use]
    pub fn arms(&self) -> &[ArmNodes] {
        &self.arms
    }

    pub fn update(&self, scene: &mut Scene, dt: f32) {
        let factor = math::smoothing_factor(self.config.follow_rate, dt);

        for arm in &self.arms {
            let anchor_pos = scene.world_position(arm.anchor);
            let anchor_rot = scene.world_rotation(arm.anchor);

            let pos = scene.world_position(arm.target).lerp(anchor_pos, factor);
            let rot = scene.world_rotation(arm.target).slerp(anchor_rot, factor);

            scene.set_world_position(arm.target, pos);
            scene.set_world_rotation(arm.target, rot);
        }
    }
}
