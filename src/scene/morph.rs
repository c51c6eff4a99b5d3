//! Morph target (blend shape) weights attached to a scene node.
//!
//! Channel names are resolved to indices once at setup via
//! [`MorphTargets::resolve`]; the per-frame path only uses indices.

use rustc_hash::FxHashMap;

use crate::errors::{Result, RigError};

/// Largest weight a morph channel accepts.
pub const MAX_MORPH_WEIGHT: f32 = 100.0;

/// Named morph channels and their current weights in `[0, 100]`.
#[derive(Debug, Clone, Default)]
pub struct MorphTargets {
    names: Vec<String>,
    weights: Vec<f32>,
    lookup: FxHashMap<String, usize>,
}

impl MorphTargets {
    /// Creates a channel set with every weight at zero.
    #[must_use]
    pub fn new<S: AsRef<str>>(names: &[S]) -> Self {
        let names: Vec<String> = names.iter().map(|n| n.as_ref().to_owned()).collect();
        let lookup = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();
        Self {
            weights: vec![0.0; names.len()],
            names,
            lookup,
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.lookup.get(name).copied()
    }

    /// Resolves a channel name, failing with [`RigError::BlendChannelNotFound`].
    pub fn resolve(&self, name: &str) -> Result<usize> {
        self.index_of(name)
            .ok_or_else(|| RigError::BlendChannelNotFound(name.to_owned()))
    }

    #[must_use]
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn weight(&self, index: usize) -> Option<f32> {
        self.weights.get(index).copied()
    }

    /// Sets a channel weight, clamped to `[0, 100]`. Out-of-range indices are ignored.
    pub fn set_weight(&mut self, index: usize, weight: f32) {
        if let Some(slot) = self.weights.get_mut(index) {
            *slot = weight.clamp(0.0, MAX_MORPH_WEIGHT);
        }
    }

    #[must_use]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }
}
