//! Character rig integration tests
//!
//! Tests for:
//! - Binding by name and setup-time errors
//! - Config JSON loading and validation
//! - End-to-end ticks: approach, stepping, expression, arms
//! - Independent characters sharing one scene

use glam::{EulerRot, Vec3};
use myth_rig::math::FORWARD;
use myth_rig::rig::{ExpressionState, LegSide};
use myth_rig::{CharacterRig, MorphTargets, RigConfig, RigError, RigNodeNames, Scene, Target};

const DT: f32 = 1.0 / 60.0;
const CHANNELS: [&str; 4] = ["HappyFace", "OpenMouth", "SadFace", "PupilSmall"];

// ============================================================================
// Helpers
// ============================================================================

/// Builds a character rooted at `origin` with every node name prefixed.
fn build_character(scene: &mut Scene, prefix: &str, origin: Vec3) {
    let n = |name: &str| format!("{prefix}{name}");

    let root = scene.build_node(&n("Root")).with_position(origin).build();
    let head = scene
        .build_node(&n("Head"))
        .with_position(Vec3::new(0.0, 1.5, 0.0))
        .with_parent(root)
        .build();
    for (eye, x) in [("LeftEye", -0.05), ("RightEye", 0.05)] {
        scene
            .build_node(&n(eye))
            .with_position(Vec3::new(x, 0.05, 0.1))
            .with_parent(head)
            .build();
    }
    let face = scene.build_node(&n("Face")).with_parent(head).build();
    scene.set_morph_targets(face, MorphTargets::new(&CHANNELS));

    for (side, x) in [("Left", -0.2), ("Right", 0.2)] {
        let home = Vec3::new(x, 0.0, 0.0);
        let grab = Vec3::new(x * 2.0, 1.0, 0.3);
        scene
            .build_node(&n(&format!("{side}LegHome")))
            .with_position(home)
            .with_parent(root)
            .build();
        scene
            .build_node(&n(&format!("{side}LegTarget")))
            .with_position(origin + home)
            .build();
        scene
            .build_node(&n(&format!("{side}GrabAnchor")))
            .with_position(grab)
            .with_parent(root)
            .build();
        scene
            .build_node(&n(&format!("{side}HandTarget")))
            .with_position(origin + grab)
            .build();
    }
}

fn prefixed_names(prefix: &str) -> RigNodeNames {
    let p = |name: &str| format!("{prefix}{name}");
    let mut names = RigNodeNames::default();
    names.root = p(&names.root);
    names.head = p(&names.head);
    names.left_eye = p(&names.left_eye);
    names.right_eye = p(&names.right_eye);
    names.face = p(&names.face);
    for leg in [&mut names.left_leg, &mut names.right_leg] {
        leg.target = p(&leg.target);
        leg.home = p(&leg.home);
    }
    for arm in &mut names.arms {
        arm.target = p(&arm.target);
        arm.anchor = p(&arm.anchor);
    }
    names
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn character() -> (Scene, CharacterRig) {
    init_logging();
    let mut scene = Scene::new();
    build_character(&mut scene, "", Vec3::ZERO);
    let rig = CharacterRig::new(&mut scene, &RigNodeNames::default(), RigConfig::default())
        .expect("default character binds");
    (scene, rig)
}

fn morph_weight(scene: &Scene, rig: &CharacterRig, name: &str) -> f32 {
    let morph = scene.morph_targets(rig.nodes().face).unwrap();
    morph.weight(morph.index_of(name).unwrap()).unwrap()
}

// ============================================================================
// Binding
// ============================================================================

#[test]
fn binds_default_names() {
    let (scene, rig) = character();
    let nodes = rig.nodes();

    assert_eq!(scene.get_name(nodes.root), Some("Root"));
    assert_eq!(scene.get_name(nodes.left_leg.home), Some("LeftLegHome"));
    assert_eq!(nodes.arms.len(), 2);
    assert_eq!(nodes.locomotion_reference, nodes.root);
    assert_eq!(nodes.expression_reference, nodes.head);
}

#[test]
fn initial_face_is_applied_at_bind() {
    let (scene, rig) = character();
    assert_eq!(rig.expression().state(), ExpressionState::Sad);
    assert_eq!(morph_weight(&scene, &rig, "SadFace"), 100.0);
    assert_eq!(morph_weight(&scene, &rig, "HappyFace"), 0.0);
}

#[test]
fn missing_node_is_reported_by_name() {
    let mut scene = Scene::new();
    build_character(&mut scene, "", Vec3::ZERO);
    let names = RigNodeNames {
        left_eye: "Monocle".to_owned(),
        ..RigNodeNames::default()
    };

    let err = CharacterRig::new(&mut scene, &names, RigConfig::default()).unwrap_err();
    assert!(matches!(err, RigError::NodeNotFound(name) if name == "Monocle"));
}

#[test]
fn missing_reference_node_is_reported() {
    let mut scene = Scene::new();
    build_character(&mut scene, "", Vec3::ZERO);
    let names = RigNodeNames {
        expression_reference: Some("Nose".to_owned()),
        ..RigNodeNames::default()
    };

    let err = CharacterRig::new(&mut scene, &names, RigConfig::default()).unwrap_err();
    assert!(matches!(err, RigError::NodeNotFound(name) if name == "Nose"));
}

#[test]
fn face_without_morph_targets_is_rejected() {
    let mut scene = Scene::new();
    build_character(&mut scene, "", Vec3::ZERO);
    let names = RigNodeNames {
        face: "Head".to_owned(),
        ..RigNodeNames::default()
    };

    let err = CharacterRig::new(&mut scene, &names, RigConfig::default()).unwrap_err();
    assert!(matches!(err, RigError::MissingMorphTargets(name) if name == "Head"));
}

#[test]
fn missing_blend_channel_is_rejected() {
    let mut scene = Scene::new();
    build_character(&mut scene, "", Vec3::ZERO);
    let face = scene.find_node_by_name("Face").unwrap();
    scene.set_morph_targets(face, MorphTargets::new(&["HappyFace", "SadFace", "PupilSmall"]));

    let err =
        CharacterRig::new(&mut scene, &RigNodeNames::default(), RigConfig::default()).unwrap_err();
    assert!(matches!(err, RigError::BlendChannelNotFound(name) if name == "OpenMouth"));
}

#[test]
fn custom_reference_nodes_bind() {
    let mut scene = Scene::new();
    build_character(&mut scene, "", Vec3::ZERO);
    let names = RigNodeNames {
        locomotion_reference: Some("Head".to_owned()),
        expression_reference: Some("Face".to_owned()),
        ..RigNodeNames::default()
    };

    let rig = CharacterRig::new(&mut scene, &names, RigConfig::default()).unwrap();
    assert_eq!(rig.nodes().locomotion_reference, rig.nodes().head);
    assert_eq!(rig.nodes().expression_reference, rig.nodes().face);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn inverted_eye_limit_is_rejected() {
    let mut scene = Scene::new();
    build_character(&mut scene, "", Vec3::ZERO);
    let mut config = RigConfig::default();
    config.eyes.right.min_y = 40.0;

    let err = CharacterRig::new(&mut scene, &RigNodeNames::default(), config).unwrap_err();
    assert!(matches!(err, RigError::InvalidAngleLimit { ref limit, .. } if limit == "right_eye.y"));
}

#[test]
fn non_positive_step_duration_is_rejected() {
    let mut config = RigConfig::default();
    config.gait.step_duration = 0.0;
    assert!(matches!(
        config.validate(),
        Err(RigError::InvalidParameter { ref name, .. }) if name == "gait.step_duration"
    ));
}

#[test]
fn inverted_distance_band_is_rejected() {
    let mut config = RigConfig::default();
    config.locomotion.min_distance = 5.0;
    assert!(matches!(config.validate(), Err(RigError::InvalidParameter { .. })));
}

#[test]
fn config_loads_from_json() {
    let config = RigConfig::from_json(
        r#"{
            "head": { "max_angle": 45.0 },
            "eyes": { "left": { "min_y": -10.0, "max_y": 10.0 } },
            "gait": { "step_distance": 0.6, "lift_axis": [0.0, 1.0, 0.0] },
            "expression": { "initial": "Neutral", "distance_threshold": 2.5 }
        }"#,
    )
    .unwrap();

    assert_eq!(config.head.max_angle, 45.0);
    assert_eq!(config.eyes.left.max_y, 10.0);
    assert_eq!(config.eyes.left.max_x, 20.0);
    assert_eq!(config.gait.lift_axis, Vec3::Y);
    assert_eq!(config.gait.step_duration, 0.25);
    assert_eq!(config.expression.distance_threshold, 2.5);
    assert_eq!(config.locomotion, RigConfig::default().locomotion);
}

#[test]
fn config_json_errors() {
    assert!(matches!(
        RigConfig::from_json("{ not json"),
        Err(RigError::ConfigParse(_))
    ));
    assert!(matches!(
        RigConfig::from_json(r#"{ "head": { "max_angle": -5.0 } }"#),
        Err(RigError::InvalidAngleLimit { .. })
    ));
}

#[test]
fn config_round_trips_through_json() {
    let config = RigConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(RigConfig::from_json(&json).unwrap(), config);
}

// ============================================================================
// End-to-end
// ============================================================================

#[test]
fn walks_toward_far_target() {
    let (mut scene, mut rig) = character();
    let target = Target::new(Vec3::new(3.0, 1.5, 10.0));
    let step_distance = rig.gait().config.step_distance;

    let mut steps_seen = 0;
    let mut was_stepping = false;
    for _ in 0..600 {
        rig.update(&mut scene, &target, DT);

        let stepping = rig.gait().stepping_leg().is_some();
        if stepping && !was_stepping {
            steps_seen += 1;
        }
        was_stepping = stepping;

        for eye in [rig.nodes().left_eye, rig.nodes().right_eye] {
            let local = scene.get_node(eye).unwrap().transform.rotation;
            let (yaw, pitch, _) = local.to_euler(EulerRot::YXZ);
            assert!(yaw.to_degrees().abs() <= 30.0 + 1e-3);
            assert!(pitch.to_degrees().abs() <= 20.0 + 1e-3);
        }
    }

    let root = rig.nodes().root;
    let distance = scene.world_position(root).distance(target.position);
    assert!((2.0..=4.0).contains(&distance), "root rested at {distance}");
    assert!(steps_seen >= 2, "only {steps_seen} step(s) while walking");

    // Head looks at the target
    let head = rig.nodes().head;
    let forward = scene.world_rotation(head) * FORWARD;
    let wanted = (target.position - scene.world_position(head)).normalize();
    assert!(forward.angle_between(wanted).to_degrees() < 2.0);

    // Still far enough to stay sad
    assert_eq!(rig.expression().state(), ExpressionState::Sad);

    // Hands caught up with their anchors
    for arm in rig.arms().arms() {
        let d = scene.world_position(arm.target).distance(scene.world_position(arm.anchor));
        assert!(d < 0.05);
    }

    // Feet settle within reach of home once the root stops
    let mut settled = false;
    for _ in 0..120 {
        rig.update(&mut scene, &target, DT);
        let gait = rig.gait();
        if gait.stepping_leg().is_none()
            && gait.distance_from_home(&scene, LegSide::Left) <= step_distance
            && gait.distance_from_home(&scene, LegSide::Right) <= step_distance
        {
            settled = true;
            break;
        }
    }
    assert!(settled);
}

#[test]
fn approach_is_bounded_by_move_speed() -> anyhow::Result<()> {
    init_logging();
    let mut scene = Scene::new();
    build_character(&mut scene, "", Vec3::ZERO);
    let config = RigConfig::from_json(r#"{ "locomotion": { "move_speed": 1.5 } }"#)?;
    let mut rig = CharacterRig::new(&mut scene, &RigNodeNames::default(), config)?;

    let target = Target::new(Vec3::new(0.0, 0.0, 30.0));
    let root = rig.nodes().root;
    let mut elapsed = 0.0;
    for _ in 0..300 {
        rig.update(&mut scene, &target, DT);
        elapsed += DT;

        let travelled = scene.world_position(root).length();
        assert!(travelled <= 1.5 * elapsed + 1e-4);
        assert!(rig.locomotion().velocity().z >= 0.0);
    }
    assert!(scene.world_position(root).z > 0.0);
    Ok(())
}

#[test]
fn close_target_makes_face_happy() {
    let (mut scene, mut rig) = character();
    // Inside the locomotion band, inside the expression threshold
    let target = Target::new(Vec3::new(0.0, 1.5, 2.5));

    for _ in 0..120 {
        rig.update(&mut scene, &target, DT);
    }

    assert_eq!(rig.expression().state(), ExpressionState::Happy);
    assert!((morph_weight(&scene, &rig, "HappyFace") - 100.0).abs() < 1e-3);
    assert!((morph_weight(&scene, &rig, "PupilSmall") - 100.0).abs() < 1e-3);
    assert!(morph_weight(&scene, &rig, "SadFace").abs() < 1e-3);
    assert_eq!(scene.world_position(rig.nodes().root), Vec3::ZERO);
}

#[test]
fn update_refreshes_cached_world_matrices() {
    let (mut scene, mut rig) = character();
    let target = Target::new(Vec3::new(-4.0, 1.0, 8.0));

    for _ in 0..30 {
        rig.update(&mut scene, &target, DT);
    }

    for handle in [rig.nodes().head, rig.nodes().left_eye, rig.nodes().left_leg.target] {
        let cached = *scene.get_node(handle).unwrap().world_matrix();
        assert!(cached.abs_diff_eq(scene.world_matrix(handle), 1e-4));
    }
}

#[test]
fn zero_dt_tick_is_stable() {
    let (mut scene, mut rig) = character();
    let target = Target::new(Vec3::new(1.0, 1.5, 9.0));

    rig.update(&mut scene, &target, 0.0);

    assert_eq!(scene.world_position(rig.nodes().root), Vec3::ZERO);
    assert_eq!(rig.locomotion().velocity(), Vec3::ZERO);
    assert_eq!(rig.expression().state(), ExpressionState::Sad);
}

#[test]
fn characters_are_independent() {
    let mut scene = Scene::new();
    build_character(&mut scene, "A/", Vec3::ZERO);
    build_character(&mut scene, "B/", Vec3::new(20.0, 0.0, 0.0));

    let mut a = CharacterRig::new(&mut scene, &prefixed_names("A/"), RigConfig::default()).unwrap();
    let mut b = CharacterRig::new(&mut scene, &prefixed_names("B/"), RigConfig::default()).unwrap();

    // Close to A, far from B
    let target = Target::new(Vec3::new(0.0, 1.5, 2.5));
    for _ in 0..120 {
        a.update(&mut scene, &target, DT);
        b.update(&mut scene, &target, DT);
    }

    assert_eq!(a.expression().state(), ExpressionState::Happy);
    assert_ne!(b.expression().state(), ExpressionState::Happy);
    assert_eq!(scene.world_position(a.nodes().root), Vec3::ZERO);
    assert!(b.locomotion().velocity().length() > 0.0 || b.locomotion().angular_velocity() != 0.0);
}
