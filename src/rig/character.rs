use crate::errors::{Result, RigError};
use crate::math::UP;
use crate::rig::arms::ArmPlacement;
use crate::rig::binding::{RigNodeNames, RigNodes};
use crate::rig::config::RigConfig;
use crate::rig::expression::{ExpressionChannels, FacialExpression};
use crate::rig::eyes::EyeConvergence;
use crate::rig::gait::Gait;
use crate::rig::head::HeadAim;
use crate::rig::locomotion::Locomotion;
use crate::rig::target::Target;
use crate::scene::Scene;

/// One character's procedural rig.
///
/// Owns every solver and all state that persists between frames (root
/// velocities, the step in flight, the expression fade). Characters are
/// independent; nothing is shared between instances.
///
/// # Per-tick order
///
/// [`update`](Self::update) runs, in this fixed order:
///
/// 1. head aim
/// 2. eye convergence
/// 3. locomotion (root turn + translation)
/// 4. gait (foot steps, landing ahead by the velocity from step 3)
/// 5. arm placement
/// 6. facial expression
/// 7. world-matrix propagation
///
/// Head and eyes therefore aim from last frame's root pose; feet and arms
/// read the root pose already moved this tick.
#[derive(Debug, Clone)]
pub struct CharacterRig {
    nodes: RigNodes,
    head: HeadAim,
    eyes: EyeConvergence,
    locomotion: Locomotion,
    gait: Gait,
    arms: ArmPlacement,
    expression: FacialExpression,
}

impl CharacterRig {
    /// Binds the rig to named nodes in `scene`.
    ///
    /// Fails on invalid configuration, missing nodes, a face without morph
    /// targets, or unresolved blend channel names.
    pub fn new(scene: &mut Scene, names: &RigNodeNames, config: RigConfig) -> Result<Self> {
        config.validate()?;
        let nodes = RigNodes::bind(scene, names)?;
        Self::from_nodes(scene, nodes, config)
    }

    /// Builds the rig from already resolved handles.
    pub fn from_nodes(scene: &mut Scene, nodes: RigNodes, config: RigConfig) -> Result<Self> {
        config.validate()?;

        let morph = scene.morph_targets(nodes.face).ok_or_else(|| {
            RigError::MissingMorphTargets(scene.get_name(nodes.face).unwrap_or_default().to_owned())
        })?;
        let channels = ExpressionChannels::resolve(morph, &config.expression)?;

        log::info!(
            "Rig bound: {} arm(s), {} morph channel(s) driven",
            nodes.arms.len(),
            channels.happy.len() + channels.sad.len() + channels.shared.len()
        );

        let RigConfig {
            head,
            eyes,
            locomotion,
            gait,
            arms,
            expression,
        } = config;

        let rig = Self {
            head: HeadAim::new(head),
            eyes: EyeConvergence::new(eyes),
            locomotion: Locomotion::new(locomotion),
            gait: Gait::new(gait, nodes.left_leg, nodes.right_leg),
            arms: ArmPlacement::new(arms, nodes.arms.clone()),
            expression: FacialExpression::new(expression, channels, nodes.face),
            nodes,
        };
        rig.expression.apply_settled(scene);

        Ok(rig)
    }

    /// Runs one tick of the pipeline.
    pub fn update(&mut self, scene: &mut Scene, target: &Target, dt: f32) {
        let goal = target.position;
        let n = &self.nodes;

        self.head.update(scene, n.head, goal, dt);

        let up = scene.world_rotation(n.root) * UP;
        self.eyes
            .update(scene, n.head, n.left_eye, n.right_eye, up, goal, dt);

        self.locomotion
            .update(scene, n.root, n.locomotion_reference, goal, dt);

        self.gait
            .update(scene, n.root, self.locomotion.velocity(), dt);

        self.arms.update(scene, dt);

        let distance = scene.world_position(n.expression_reference).distance(goal);
        self.expression.update(scene, distance, dt);

        scene.update_matrix_world();
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    #[must_use]
    pub fn nodes(&self) -> &RigNodes {
        &self.nodes
    }

    #[must_use]
    pub fn head(&self) -> &HeadAim {
        &self.head
    }

    #[must_use]
    pub fn eyes(&self) -> &EyeConvergence {
        &self.eyes
    }

    #[must_use]
    pub fn locomotion(&self) -> &Locomotion {
        &self.locomotion
    }

    #[must_use]
    pub fn gait(&self) -> &Gait {
        &self.gait
    }

    #[must_use]
    pub fn arms(&self) -> &ArmPlacement {
        &self.arms
    }

    #[must_use]
    pub fn expression(&self) -> &FacialExpression {
        &self.expression
    }
}
