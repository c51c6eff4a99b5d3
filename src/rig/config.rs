//! Rig Configuration
//!
//! Every tunable of the rig lives in [`RigConfig`], grouped per solver.
//! All sections implement `Default` and deserialize with `#[serde(default)]`,
//! so a JSON document only needs to name the values it overrides.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use myth_rig::RigConfig;
//!
//! let config = RigConfig::from_json(r#"{
//!     "head": { "max_angle": 45.0 },
//!     "gait": { "step_distance": 0.6 }
//! }"#)?;
//! ```
//!
//! Angles are in degrees, rates are in 1/s (see
//! [`smoothing_factor`](crate::math::smoothing_factor)), distances in scene
//! units and durations in seconds.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, RigError};

// ---------------------------------------------------------------------------
// Per-solver sections
// ---------------------------------------------------------------------------

/// Head aim tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadConfig {
    /// Cone half-angle around the parent-space forward axis.
    pub max_angle: f32,
    /// Exponential smoothing rate toward the aim rotation.
    pub turn_rate: f32,
}

impl Default for HeadConfig {
    fn default() -> Self {
        Self {
            max_angle: 30.0,
            turn_rate: 2.0,
        }
    }
}

/// Per-eye local Euler bounds in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EyeLimits {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Default for EyeLimits {
    fn default() -> Self {
        Self {
            min_x: -20.0,
            max_x: 20.0,
            min_y: -30.0,
            max_y: 30.0,
        }
    }
}

impl EyeLimits {
    fn validate(&self, eye: &str) -> Result<()> {
        check_range(&format!("{eye}.x"), self.min_x, self.max_x)?;
        check_range(&format!("{eye}.y"), self.min_y, self.max_y)
    }
}

/// Eye convergence tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EyeConfig {
    pub track_rate: f32,
    pub left: EyeLimits,
    pub right: EyeLimits,
}

impl Default for EyeConfig {
    fn default() -> Self {
        Self {
            track_rate: 3.0,
            left: EyeLimits::default(),
            right: EyeLimits::default(),
        }
    }
}

/// Root motion tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Yaw speed in degrees per second while turning.
    pub turn_speed: f32,
    pub turn_acceleration: f32,
    pub move_speed: f32,
    pub move_acceleration: f32,
    /// Retreat when the target is closer than this.
    pub min_distance: f32,
    /// Approach when the target is farther than this.
    pub max_distance: f32,
    /// Yaw dead zone in degrees.
    pub max_angle: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            turn_speed: 100.0,
            turn_acceleration: 5.0,
            move_speed: 2.0,
            move_acceleration: 5.0,
            min_distance: 2.0,
            max_distance: 4.0,
            max_angle: 20.0,
        }
    }
}

/// Foot stepping tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaitConfig {
    /// A foot steps once it drifts farther than this from its home anchor.
    pub step_distance: f32,
    pub step_duration: f32,
    /// Landing point lead: `home + root_velocity * overshoot_fraction`.
    pub overshoot_fraction: f32,
    /// Arc height as a fraction of the step length.
    pub lift_factor: f32,
    /// Home-local axis the arc bulges along.
    pub lift_axis: Vec3,
}

impl Default for GaitConfig {
    fn default() -> Self {
        Self {
            step_distance: 0.4,
            step_duration: 0.25,
            overshoot_fraction: 0.3,
            lift_factor: 0.3,
            lift_axis: Vec3::NEG_Z,
        }
    }
}

/// Hand target following.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmConfig {
    pub follow_rate: f32,
}

impl Default for ArmConfig {
    fn default() -> Self {
        Self { follow_rate: 10.0 }
    }
}

/// Which expression the face starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InitialExpression {
    Neutral,
    Happy,
    #[default]
    Sad,
}

/// Facial expression tuning and channel names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpressionConfig {
    /// Happy below this reference-to-target distance, sad above.
    pub distance_threshold: f32,
    /// Cross-fade duration in seconds.
    pub duration: f32,
    pub happy_channels: Vec<String>,
    pub sad_channels: Vec<String>,
    /// Channels driven by the happy-axis weight in both directions.
    pub shared_channels: Vec<String>,
    pub initial: InitialExpression,
}

impl Default for ExpressionConfig {
    fn default() -> Self {
        Self {
            distance_threshold: 3.0,
            duration: 1.0,
            happy_channels: vec!["HappyFace".to_owned(), "OpenMouth".to_owned()],
            sad_channels: vec!["SadFace".to_owned()],
            shared_channels: vec!["PupilSmall".to_owned()],
            initial: InitialExpression::Sad,
        }
    }
}

// ---------------------------------------------------------------------------
// RigConfig
// ---------------------------------------------------------------------------

/// Complete rig tuning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    pub head: HeadConfig,
    pub eyes: EyeConfig,
    pub locomotion: LocomotionConfig,
    pub gait: GaitConfig,
    pub arms: ArmConfig,
    pub expression: ExpressionConfig,
}

impl RigConfig {
    /// Parses a JSON document and validates it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every section for setup errors.
    pub fn validate(&self) -> Result<()> {
        check_range("head.max_angle", 0.0, self.head.max_angle)?;
        check_non_negative("head.turn_rate", self.head.turn_rate)?;

        check_non_negative("eyes.track_rate", self.eyes.track_rate)?;
        self.eyes.left.validate("left_eye")?;
        self.eyes.right.validate("right_eye")?;

        let loco = &self.locomotion;
        check_non_negative("locomotion.turn_speed", loco.turn_speed)?;
        check_non_negative("locomotion.turn_acceleration", loco.turn_acceleration)?;
        check_non_negative("locomotion.move_speed", loco.move_speed)?;
        check_non_negative("locomotion.move_acceleration", loco.move_acceleration)?;
        check_non_negative("locomotion.min_distance", loco.min_distance)?;
        check_non_negative("locomotion.max_distance", loco.max_distance)?;
        check_non_negative("locomotion.max_angle", loco.max_angle)?;
        if loco.min_distance > loco.max_distance {
            return Err(RigError::InvalidParameter {
                name: "locomotion.max_distance".to_owned(),
                value: loco.max_distance,
            });
        }

        check_positive("gait.step_distance", self.gait.step_distance)?;
        check_positive("gait.step_duration", self.gait.step_duration)?;
        check_non_negative("gait.overshoot_fraction", self.gait.overshoot_fraction)?;
        check_non_negative("gait.lift_factor", self.gait.lift_factor)?;

        check_non_negative("arms.follow_rate", self.arms.follow_rate)?;

        check_non_negative("expression.distance_threshold", self.expression.distance_threshold)?;
        check_positive("expression.duration", self.expression.duration)?;

        Ok(())
    }
}

fn check_range(limit: &str, min: f32, max: f32) -> Result<()> {
    if min > max || min.is_nan() || max.is_nan() {
        return Err(RigError::InvalidAngleLimit {
            limit: limit.to_owned(),
            min,
            max,
        });
    }
    Ok(())
}

fn check_non_negative(name: &str, value: f32) -> Result<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(RigError::InvalidParameter {
            name: name.to_owned(),
            value,
        })
    }
}

fn check_positive(name: &str, value: f32) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(RigError::InvalidParameter {
            name: name.to_owned(),
            value,
        })
    }
}
