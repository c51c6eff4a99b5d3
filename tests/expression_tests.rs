//! Facial expression tests
//!
//! Tests for:
//! - Initial settled weights
//! - Linear cross-fade: arriving w, departing 100 - w, shared channels
//! - Fade length at a 60 fps frame time
//! - Single in-flight transition (no retrigger, no cancel)
//! - Threshold equality and neutral start

use myth_rig::rig::{
    Expression, ExpressionChannels, ExpressionConfig, ExpressionState, FacialExpression,
    InitialExpression,
};
use myth_rig::{MorphTargets, NodeHandle, Scene};

const HAPPY: usize = 0;
const MOUTH: usize = 1;
const SAD: usize = 2;
const PUPIL: usize = 3;

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn face_scene() -> (Scene, NodeHandle) {
    let mut scene = Scene::new();
    let face = scene.create_node_with_name("Face");
    scene.set_morph_targets(
        face,
        MorphTargets::new(&["HappyFace", "OpenMouth", "SadFace", "PupilSmall"]),
    );
    (scene, face)
}

fn expression(scene: &mut Scene, face: NodeHandle, config: ExpressionConfig) -> FacialExpression {
    let channels =
        ExpressionChannels::resolve(scene.morph_targets(face).unwrap(), &config).unwrap();
    let expression = FacialExpression::new(config, channels, face);
    expression.apply_settled(scene);
    expression
}

fn weight(scene: &Scene, face: NodeHandle, channel: usize) -> f32 {
    scene.morph_targets(face).unwrap().weight(channel).unwrap()
}

// ============================================================================
// Setup
// ============================================================================

#[test]
fn starts_sad_by_default() {
    let (mut scene, face) = face_scene();
    let expr = expression(&mut scene, face, ExpressionConfig::default());

    assert_eq!(expr.state(), ExpressionState::Sad);
    assert_eq!(weight(&scene, face, SAD), 100.0);
    assert_eq!(weight(&scene, face, HAPPY), 0.0);
    assert_eq!(weight(&scene, face, MOUTH), 0.0);
    assert_eq!(weight(&scene, face, PUPIL), 0.0);
}

#[test]
fn resolves_channel_indices_once() {
    let (mut scene, face) = face_scene();
    let expr = expression(&mut scene, face, ExpressionConfig::default());

    let channels = expr.channels();
    assert_eq!(channels.happy.as_slice(), &[HAPPY, MOUTH]);
    assert_eq!(channels.sad.as_slice(), &[SAD]);
    assert_eq!(channels.shared.as_slice(), &[PUPIL]);
}

// ============================================================================
// Cross-fade
// ============================================================================

#[test]
fn sad_to_happy_ramps_linearly() {
    let (mut scene, face) = face_scene();
    let mut expr = expression(&mut scene, face, ExpressionConfig::default());

    let mut last = 0.0;
    for tick in 1..=3 {
        expr.update(&mut scene, 1.0, 0.25);
        assert_eq!(expr.state(), ExpressionState::TransitioningToHappy);

        let w = weight(&scene, face, HAPPY);
        assert!(approx_eq(w, 25.0 * tick as f32));
        assert!(w > last);
        assert!(approx_eq(weight(&scene, face, MOUTH), w));
        assert!(approx_eq(weight(&scene, face, PUPIL), w));
        assert!(approx_eq(w + weight(&scene, face, SAD), 100.0));
        last = w;
    }

    expr.update(&mut scene, 1.0, 0.25);
    assert_eq!(expr.state(), ExpressionState::Happy);
    assert_eq!(expr.settled(), Expression::Happy);
    assert!(expr.transition().is_none());
    assert!(approx_eq(weight(&scene, face, HAPPY), 100.0));
    assert!(approx_eq(weight(&scene, face, SAD), 0.0));
}

#[test]
fn default_fade_settles_on_last_frame_at_60_fps() {
    let (mut scene, face) = face_scene();
    let mut expr = expression(&mut scene, face, ExpressionConfig::default());
    let dt = 1.0 / 60.0;

    for _ in 0..59 {
        expr.update(&mut scene, 1.0, dt);
    }
    assert_eq!(expr.state(), ExpressionState::TransitioningToHappy);
    assert!(weight(&scene, face, HAPPY) < 100.0);

    // One second of frames in total
    expr.update(&mut scene, 1.0, dt);
    assert_eq!(expr.state(), ExpressionState::Happy);
    assert_eq!(expr.weight(), 100.0);
    assert_eq!(weight(&scene, face, HAPPY), 100.0);
    assert_eq!(weight(&scene, face, PUPIL), 100.0);
    assert_eq!(weight(&scene, face, SAD), 0.0);
}

#[test]
fn happy_to_sad_fades_shared_channel_out() {
    let (mut scene, face) = face_scene();
    let config = ExpressionConfig {
        initial: InitialExpression::Happy,
        ..ExpressionConfig::default()
    };
    let mut expr = expression(&mut scene, face, config);
    assert!(approx_eq(weight(&scene, face, PUPIL), 100.0));

    expr.update(&mut scene, 10.0, 0.25);
    assert_eq!(expr.state(), ExpressionState::TransitioningToSad);
    assert!(approx_eq(weight(&scene, face, SAD), 25.0));
    assert!(approx_eq(weight(&scene, face, HAPPY), 75.0));
    assert!(approx_eq(weight(&scene, face, PUPIL), 75.0));

    for _ in 0..3 {
        expr.update(&mut scene, 10.0, 0.25);
    }
    assert_eq!(expr.state(), ExpressionState::Sad);
    assert!(approx_eq(weight(&scene, face, PUPIL), 0.0));
}

#[test]
fn transition_is_not_cancelled_by_opposite_trigger() {
    let (mut scene, face) = face_scene();
    let mut expr = expression(&mut scene, face, ExpressionConfig::default());

    expr.update(&mut scene, 1.0, 0.25);
    // Target walks away mid-fade: the happy fade still completes
    for _ in 0..3 {
        expr.update(&mut scene, 10.0, 0.25);
        assert_ne!(expr.state(), ExpressionState::TransitioningToSad);
    }
    assert_eq!(expr.state(), ExpressionState::Happy);

    // Only now does the far target start the sad fade
    expr.update(&mut scene, 10.0, 0.25);
    assert_eq!(expr.state(), ExpressionState::TransitioningToSad);
}

#[test]
fn transition_never_restarts_mid_flight() {
    let (mut scene, face) = face_scene();
    let mut expr = expression(&mut scene, face, ExpressionConfig::default());

    expr.update(&mut scene, 1.0, 0.25);
    expr.update(&mut scene, 1.0, 0.25);
    let elapsed = expr.transition().unwrap().elapsed;
    assert!(approx_eq(elapsed, 0.5));
    assert!(approx_eq(expr.weight(), 50.0));
}

#[test]
fn settled_state_is_not_retriggered() {
    let (mut scene, face) = face_scene();
    let mut expr = expression(&mut scene, face, ExpressionConfig::default());

    for _ in 0..10 {
        expr.update(&mut scene, 10.0, 0.25);
        assert_eq!(expr.state(), ExpressionState::Sad);
        assert!(expr.transition().is_none());
    }
}

#[test]
fn threshold_distance_triggers_nothing() {
    let (mut scene, face) = face_scene();
    let mut expr = expression(&mut scene, face, ExpressionConfig::default());

    expr.update(&mut scene, 3.0, 0.25);
    assert_eq!(expr.state(), ExpressionState::Sad);
}

#[test]
fn negative_dt_does_not_advance() {
    let (mut scene, face) = face_scene();
    let mut expr = expression(&mut scene, face, ExpressionConfig::default());

    expr.update(&mut scene, 1.0, -0.5);
    assert_eq!(expr.state(), ExpressionState::TransitioningToHappy);
    assert_eq!(expr.transition().unwrap().elapsed, 0.0);
    assert_eq!(weight(&scene, face, SAD), 100.0);
}

// ============================================================================
// Neutral
// ============================================================================

#[test]
fn neutral_start_fades_into_happy() {
    let (mut scene, face) = face_scene();
    let config = ExpressionConfig {
        initial: InitialExpression::Neutral,
        ..ExpressionConfig::default()
    };
    let mut expr = expression(&mut scene, face, config);
    assert_eq!(expr.state(), ExpressionState::Neutral);
    assert!(scene.morph_targets(face).unwrap().weights().iter().all(|&w| w == 0.0));

    expr.update(&mut scene, 1.0, 0.5);
    assert!(approx_eq(weight(&scene, face, HAPPY), 50.0));
    assert!(approx_eq(weight(&scene, face, PUPIL), 50.0));
    assert_eq!(weight(&scene, face, SAD), 0.0);
}

#[test]
fn neutral_start_fades_into_sad() {
    let (mut scene, face) = face_scene();
    let config = ExpressionConfig {
        initial: InitialExpression::Neutral,
        ..ExpressionConfig::default()
    };
    let mut expr = expression(&mut scene, face, config);

    expr.update(&mut scene, 5.0, 0.5);
    assert_eq!(expr.state(), ExpressionState::TransitioningToSad);
    assert!(approx_eq(weight(&scene, face, SAD), 50.0));
    assert_eq!(weight(&scene, face, HAPPY), 0.0);
    assert_eq!(weight(&scene, face, PUPIL), 0.0);
}
