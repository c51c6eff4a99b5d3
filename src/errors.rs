//! Error Types
//!
//! This module defines the error types used throughout the rig.
//!
//! # Overview
//!
//! The main error type [`RigError`] covers the setup-time failure modes:
//! - Scene binding failures (missing nodes, missing morph channels)
//! - Configuration validation errors (inverted angle bounds, bad parameters)
//! - Configuration parsing errors
//!
//! The per-frame update never fails. Degenerate geometry (zero-length look
//! vectors, coincident step endpoints) is absorbed by the solvers, which hold
//! their previous value instead.
//!
//! # Usage
//!
//! ```rust,ignore
//! use myth_rig::errors::{RigError, Result};
//!
//! fn bind_rig() -> Result<()> {
//!     // Setup operations that may fail return Result
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the rig.
#[derive(Error, Debug)]
pub enum RigError {
    // ========================================================================
    // Scene Binding Errors
    // ========================================================================
    /// A node referenced by name does not exist in the scene.
    #[error("Rig node not found: {0}")]
    NodeNotFound(String),

    /// The node expected to carry facial morph targets has none.
    #[error("Node has no morph targets: {0}")]
    MissingMorphTargets(String),

    /// A blend channel name could not be resolved to an index.
    #[error("Blend channel not found: {0}")]
    BlendChannelNotFound(String),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// An angular range has its lower bound above its upper bound.
    #[error("Invalid angle limit '{limit}': min {min} > max {max}")]
    InvalidAngleLimit {
        /// Which limit was malformed (e.g. `left_eye.y`)
        limit: String,
        /// The lower bound in degrees
        min: f32,
        /// The upper bound in degrees
        max: f32,
    },

    /// A tuning parameter is out of its valid range.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter path (e.g. `gait.step_duration`)
        name: String,
        /// The offending value
        value: f32,
    },

    /// JSON parsing error.
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Alias for `Result<T, RigError>`.
pub type Result<T> = std::result::Result<T, RigError>;
