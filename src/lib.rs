#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod errors;
pub mod math;
pub mod rig;
pub mod scene;

pub use errors::{Result, RigError};
pub use rig::{CharacterRig, RigConfig, RigNodeNames, Target};
pub use scene::{MorphTargets, Node, NodeHandle, Scene, Transform};
