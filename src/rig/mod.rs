//! Procedural rig solvers.
//!
//! - [`HeadAim`]: cone-limited look-at for the head bone
//! - [`EyeConvergence`]: shared eye look with per-axis Euler limits
//! - [`Locomotion`]: root turn/translate toward the target inside a distance band
//! - [`Gait`]: alternating foot steps along lifted arcs
//! - [`ArmPlacement`]: hand targets trailing grab anchors
//! - [`FacialExpression`]: distance-triggered happy/sad morph cross-fade
//! - [`CharacterRig`]: binds all of the above and runs them once per tick

pub mod arms;
pub mod binding;
pub mod character;
pub mod config;
pub mod expression;
pub mod eyes;
pub mod gait;
pub mod head;
pub mod locomotion;
pub mod target;

pub use arms::{ArmNodes, ArmPlacement};
pub use binding::{ArmNodeNames, LegNodeNames, RigNodeNames, RigNodes};
pub use character::CharacterRig;
pub use config::{
    ArmConfig, EyeConfig, EyeLimits, ExpressionConfig, GaitConfig, HeadConfig, InitialExpression,
    LocomotionConfig, RigConfig,
};
pub use expression::{Expression, ExpressionChannels, ExpressionState, FacialExpression};
pub use eyes::EyeConvergence;
pub use gait::{Gait, LegNodes, LegSide, StepTrajectory};
pub use head::HeadAim;
pub use locomotion::Locomotion;
pub use target::Target;
