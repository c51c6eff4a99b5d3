//! Alternating two-leg stepping.
//!
//! Each leg is either idle or running a timed [`StepTrajectory`]. The gait
//! keeps a single "last mover" and only ever lets one leg step at a time:
//!
//! - While a leg is stepping it is advanced; nothing else starts. On the
//!   tick its step completes it becomes the last mover.
//! - When no leg is stepping, the leg that did *not* move last is checked
//!   first. The first leg found farther than `step_distance` from its home
//!   anchor starts a step, and that step is advanced by the same tick.
//!
//! Steps always run to completion.

use glam::{Quat, Vec3};

use crate::math::{self, FORWARD, UP};
use crate::rig::config::GaitConfig;
use crate::scene::{NodeHandle, Scene};

/// Which leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegSide {
    Left,
    Right,
}

impl LegSide {
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    #[inline]
    fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }
}

/// Scene nodes driven by one leg: the foot IK target and its home anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegNodes {
    pub target: NodeHandle,
    pub home: NodeHandle,
}

// ============================================================================
// StepTrajectory
// ============================================================================

/// One foot step: a quadratic arc from `start` through a lifted midpoint to
/// `end`, played over `duration` seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct StepTrajectory {
    start: Vec3,
    midpoint: Vec3,
    end: Vec3,
    duration: f32,
    elapsed: f32,
}

impl StepTrajectory {
    /// Builds a step whose midpoint is raised along `lift_dir` by
    /// `|end - start| * lift_factor`.
    #[must_use]
    pub fn new(start: Vec3, end: Vec3, lift_dir: Vec3, lift_factor: f32, duration: f32) -> Self {
        let lift = lift_dir.normalize_or_zero() * start.distance(end) * lift_factor;
        Self {
            start,
            midpoint: (start + end) * 0.5 + lift,
            end,
            duration,
            elapsed: 0.0,
        }
    }

    #[inline]
    #[must_use]
    pub fn start(&self) -> Vec3 {
        self.start
    }

    #[inline]
    #[must_use]
    pub fn midpoint(&self) -> Vec3 {
        self.midpoint
    }

    #[inline]
    #[must_use]
    pub fn end(&self) -> Vec3 {
        self.end
    }

    #[inline]
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[inline]
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// `elapsed / duration`, deliberately not capped at 1.
    #[must_use]
    pub fn normalized_time(&self) -> f32 {
        if self.duration > 0.0 {
            self.elapsed / self.duration
        } else {
            1.0
        }
    }

    /// Position on the arc at normalized time `t` (saturated to `[0, 1]`).
    #[must_use]
    pub fn sample(&self, t: f32) -> Vec3 {
        math::quadratic_bezier(self.start, self.midpoint, self.end, t)
    }

    /// Current position on the arc; exactly `end` once finished.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        if self.is_finished() {
            return self.end;
        }
        self.sample(self.normalized_time())
    }

    /// Advances the step clock and returns the new position.
    pub fn advance(&mut self, dt: f32) -> Vec3 {
        self.elapsed += dt.max(0.0);
        self.position()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        math::duration_reached(self.elapsed, self.duration)
    }
}

// ============================================================================
// Gait
// ============================================================================

/// Per-leg state.
#[derive(Debug, Clone)]
pub struct Leg {
    pub nodes: LegNodes,
    step: Option<StepTrajectory>,
}

impl Leg {
    #[must_use]
    pub fn new(nodes: LegNodes) -> Self {
        Self { nodes, step: None }
    }

    #[inline]
    #[must_use]
    pub fn is_stepping(&self) -> bool {
        self.step.is_some()
    }

    /// The step in flight, if any.
    #[must_use]
    pub fn step(&self) -> Option<&StepTrajectory> {
        self.step.as_ref()
    }
}

/// Two-leg alternating gait state machine.
#[derive(Debug, Clone)]
pub struct Gait {
    pub config: GaitConfig,
    legs: [Leg; 2],
    last_mover: Option<LegSide>,
}

impl Gait {
    #[must_use]
    pub fn new(config: GaitConfig, left: LegNodes, right: LegNodes) -> Self {
        Self {
            config,
            legs: [Leg::new(left), Leg::new(right)],
            last_mover: None,
        }
    }

    #[must_use]
    pub fn leg(&self, side: LegSide) -> &Leg {
        &self.legs[side.index()]
    }

    /// The leg that most recently completed a step.
    #[inline]
    #[must_use]
    pub fn last_mover(&self) -> Option<LegSide> {
        self.last_mover
    }

    /// The leg currently mid-step, if any.
    #[must_use]
    pub fn stepping_leg(&self) -> Option<LegSide> {
        [LegSide::Left, LegSide::Right]
            .into_iter()
            .find(|&side| self.leg(side).is_stepping())
    }

    /// Distance between a leg's IK target and its home anchor.
    #[must_use]
    pub fn distance_from_home(&self, scene: &Scene, side: LegSide) -> f32 {
        let nodes = self.leg(side).nodes;
        scene
            .world_position(nodes.target)
            .distance(scene.world_position(nodes.home))
    }

    /// Order in which idle legs are offered a step.
    fn candidates(&self) -> [LegSide; 2] {
        match self.last_mover {
            Some(last) => [last.other(), last],
            None => [LegSide::Left, LegSide::Right],
        }
    }

    /// Advances the gait one tick.
    ///
    /// `root` supplies the facing for planted feet; `root_velocity` scales
    /// how far ahead of home a new step lands.
    pub fn update(&mut self, scene: &mut Scene, root: NodeHandle, root_velocity: Vec3, dt: f32) {
        let foot_rotation = Self::foot_rotation(scene, root);

        if let Some(side) = self.stepping_leg() {
            self.advance_leg(scene, side, foot_rotation, dt);
            return;
        }

        for side in self.candidates() {
            if self.distance_from_home(scene, side) > self.config.step_distance {
                self.start_step(scene, side, root_velocity);
                self.advance_leg(scene, side, foot_rotation, dt);
                return;
            }
        }
    }

    /// Feet face the root's backward direction.
    fn foot_rotation(scene: &Scene, root: NodeHandle) -> Option<Quat> {
        let root_rot = scene.world_rotation(root);
        math::look_rotation(-(root_rot * FORWARD), root_rot * UP)
    }

    fn start_step(&mut self, scene: &Scene, side: LegSide, root_velocity: Vec3) {
        let nodes = self.leg(side).nodes;
        let start = scene.world_position(nodes.target);
        let home = scene.world_position(nodes.home);
        let end = home + root_velocity * self.config.overshoot_fraction;
        let lift_dir = scene.world_rotation(nodes.home) * self.config.lift_axis;

        log::debug!("{side:?} leg starts step: {start} -> {end}");

        self.legs[side.index()].step = Some(StepTrajectory::new(
            start,
            end,
            lift_dir,
            self.config.lift_factor,
            self.config.step_duration,
        ));
    }

    fn advance_leg(&mut self, scene: &mut Scene, side: LegSide, foot_rotation: Option<Quat>, dt: f32) {
        let leg = &mut self.legs[side.index()];
        let Some(step) = leg.step.as_mut() else {
            return;
        };

        let position = step.advance(dt);
        let finished = step.is_finished();
        let target = leg.nodes.target;

        scene.set_world_position(target, position);
        if let Some(rotation) = foot_rotation {
            scene.set_world_rotation(target, rotation);
        }

        if finished {
            leg.step = None;
            self.last_mover = Some(side);
            log::debug!("{side:?} leg finished step at {position}");
        }
    }
}
