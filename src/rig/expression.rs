//! Distance-triggered facial expression cross-fade.
//!
//! The face settles in one of [`Expression`]'s states. When the target comes
//! closer than `distance_threshold` the face cross-fades to happy; when it
//! moves beyond it, to sad. A single in-flight [`Transition`] token guards
//! the machine: triggers are ignored until the running fade completes, and
//! a fade cannot be cancelled.
//!
//! During a fade the arriving expression's channels get `w` and the
//! departing expression's channels get `100 - w`. Shared channels (the small
//! pupil) always take the happy-axis weight, whichever way the fade runs.

use smallvec::SmallVec;

use crate::errors::Result;
use crate::math;
use crate::rig::config::{ExpressionConfig, InitialExpression};
use crate::scene::morph::MAX_MORPH_WEIGHT;
use crate::scene::{MorphTargets, NodeHandle, Scene};

/// A settled facial expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expression {
    Neutral,
    Happy,
    Sad,
}

impl From<InitialExpression> for Expression {
    fn from(initial: InitialExpression) -> Self {
        match initial {
            InitialExpression::Neutral => Self::Neutral,
            InitialExpression::Happy => Self::Happy,
            InitialExpression::Sad => Self::Sad,
        }
    }
}

/// Observable state of the expression machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionState {
    Neutral,
    TransitioningToHappy,
    Happy,
    TransitioningToSad,
    Sad,
}

/// The in-flight cross-fade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from: Expression,
    pub to: Expression,
    pub elapsed: f32,
}

impl Transition {
    /// Arriving weight in `[0, 100]`, linear in elapsed time.
    #[must_use]
    pub fn weight(&self, duration: f32) -> f32 {
        if duration <= 0.0 || self.is_complete(duration) {
            return MAX_MORPH_WEIGHT;
        }
        (self.elapsed / duration).min(1.0) * MAX_MORPH_WEIGHT
    }

    #[must_use]
    pub fn is_complete(&self, duration: f32) -> bool {
        math::duration_reached(self.elapsed, duration)
    }
}

/// Morph channel indices, resolved once at setup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpressionChannels {
    pub happy: SmallVec<[usize; 4]>,
    pub sad: SmallVec<[usize; 4]>,
    pub shared: SmallVec<[usize; 2]>,
}

impl ExpressionChannels {
    /// Resolves the configured channel names against a face's morph targets.
    pub fn resolve(morph: &MorphTargets, config: &ExpressionConfig) -> Result<Self> {
        let lookup = |names: &[String]| -> Result<SmallVec<[usize; 4]>> {
            names.iter().map(|n| morph.resolve(n)).collect()
        };

        Ok(Self {
            happy: lookup(&config.happy_channels)?,
            sad: lookup(&config.sad_channels)?,
            shared: config
                .shared_channels
                .iter()
                .map(|n| morph.resolve(n))
                .collect::<Result<_>>()?,
        })
    }

    fn of(&self, expression: Expression) -> &[usize] {
        match expression {
            Expression::Neutral => &[],
            Expression::Happy => self.happy.as_slice(),
            Expression::Sad => self.sad.as_slice(),
        }
    }
}

/// Facial expression state machine for one face.
#[derive(Debug, Clone)]
pub struct FacialExpression {
    pub config: ExpressionConfig,
    channels: ExpressionChannels,
    face: NodeHandle,
    settled: Expression,
    transition: Option<Transition>,
}

impl FacialExpression {
    #[must_use]
    pub fn new(config: ExpressionConfig, channels: ExpressionChannels, face: NodeHandle) -> Self {
        let settled = config.initial.into();
        Self {
            config,
            channels,
            face,
            settled,
            transition: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> ExpressionState {
        match (self.transition, self.settled) {
            (Some(t), _) if t.to == Expression::Happy => ExpressionState::TransitioningToHappy,
            (Some(_), _) => ExpressionState::TransitioningToSad,
            (None, Expression::Neutral) => ExpressionState::Neutral,
            (None, Expression::Happy) => ExpressionState::Happy,
            (None, Expression::Sad) => ExpressionState::Sad,
        }
    }

    #[must_use]
    pub fn settled(&self) -> Expression {
        self.settled
    }

    #[must_use]
    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    /// Arriving weight of the running fade, or 100 once settled.
    #[must_use]
    pub fn weight(&self) -> f32 {
        self.transition
            .map_or(MAX_MORPH_WEIGHT, |t| t.weight(self.config.duration))
    }

    #[must_use]
    pub fn channels(&self) -> &ExpressionChannels {
        &self.channels
    }

    /// Writes the settled expression's weights to the face.
    pub fn apply_settled(&self, scene: &mut Scene) {
        let (happy, sad) = match self.settled {
            Expression::Neutral => (0.0, 0.0),
            Expression::Happy => (MAX_MORPH_WEIGHT, 0.0),
            Expression::Sad => (0.0, MAX_MORPH_WEIGHT),
        };
        let Some(morph) = scene.morph_targets_mut(self.face) else {
            return;
        };
        for &index in self.channels.happy.iter().chain(&self.channels.shared) {
            morph.set_weight(index, happy);
        }
        for &index in &self.channels.sad {
            morph.set_weight(index, sad);
        }
    }

    /// Evaluates the trigger and advances any running fade by `dt`.
    ///
    /// `distance` is the reference-to-target distance this tick.
    pub fn update(&mut self, scene: &mut Scene, distance: f32, dt: f32) {
        if self.transition.is_none() {
            let wanted = if distance < self.config.distance_threshold {
                Some(Expression::Happy)
            } else if distance > self.config.distance_threshold {
                Some(Expression::Sad)
            } else {
                None
            };

            if let Some(to) = wanted.filter(|&to| to != self.settled) {
                log::debug!("expression fade {:?} -> {to:?} (distance {distance:.3})", self.settled);
                self.transition = Some(Transition {
                    from: self.settled,
                    to,
                    elapsed: 0.0,
                });
            }
        }

        let Some(mut transition) = self.transition else {
            return;
        };

        transition.elapsed += dt.max(0.0);
        let weight = transition.weight(self.config.duration);
        self.write(scene, transition.from, transition.to, weight);

        if transition.is_complete(self.config.duration) {
            log::debug!("expression settled on {:?}", transition.to);
            self.settled = transition.to;
            self.transition = None;
        } else {
            self.transition = Some(transition);
        }
    }

    fn write(&self, scene: &mut Scene, from: Expression, to: Expression, weight: f32) {
        let Some(morph) = scene.morph_targets_mut(self.face) else {
            return;
        };

        for &index in self.channels.of(from) {
            morph.set_weight(index, MAX_MORPH_WEIGHT - weight);
        }
        for &index in self.channels.of(to) {
            morph.set_weight(index, weight);
        }

        let happy_axis = if to == Expression::Happy {
            weight
        } else if from == Expression::Happy {
            MAX_MORPH_WEIGHT - weight
        } else {
            0.0
        };
        for &index in &self.channels.shared {
            morph.set_weight(index, happy_axis);
        }
    }
}
