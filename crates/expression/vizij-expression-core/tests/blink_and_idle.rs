use rand::rngs::StdRng;
use rand::SeedableRng;
use vizij_expression::{
    BlinkConfig, Config, ExpressionEngine, ExpressionEvent, IdleConfig, IdleMotion, Scene,
};

const DT: f32 = 1.0 / 60.0;

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn fast_blink() -> Config {
    Config {
        blink: BlinkConfig {
            min_interval: 0.5,
            interval_jitter: 0.0,
            duration: 0.15,
        },
        ..Config::default()
    }
}

#[test]
fn blink_closes_every_blink_channel_then_reopens() {
    let mut scene = Scene::new();
    let face = scene.add_mesh(
        "Wolf3D_Head",
        &["eyeBlinkLeft", "eyeBlinkRight", "Eye_Close_L", "mouthSmile"],
    );
    let mut eng: ExpressionEngine<usize> =
        ExpressionEngine::with_rng(fast_blink(), StdRng::seed_from_u64(5));
    eng.load_rig(scene.index());
    assert_eq!(
        eng.blink_channels().collect::<Vec<_>>(),
        vec!["eyeBlinkLeft", "eyeBlinkRight", "Eye_Close_L"]
    );

    let mut started = 0;
    let mut ended = 0;
    for _ in 0..120 {
        let events = eng.update(DT, "neutral", &mut scene).events.clone();
        started += events
            .iter()
            .filter(|e| **e == ExpressionEvent::BlinkStarted)
            .count();
        ended += events
            .iter()
            .filter(|e| **e == ExpressionEvent::BlinkEnded)
            .count();

        let expected = if eng.is_blinking() { 1.0 } else { 0.0 };
        for name in ["eyeBlinkLeft", "eyeBlinkRight", "Eye_Close_L"] {
            assert_eq!(scene.weight(face, name), Some(expected));
        }
        assert_eq!(scene.weight(face, "mouthSmile"), Some(0.0));
    }
    // 2 s at a 0.5 s interval plus 0.15 s closed
    assert!(started >= 2, "only {started} blinks");
    assert!(ended >= started - 1);
}

#[test]
fn open_eyes_hold_blink_channels_at_zero_under_wink() {
    let mut scene = Scene::new();
    let face = scene.add_mesh("Face", &["eyeBlinkLeft"]);
    let mut eng: ExpressionEngine<usize> =
        ExpressionEngine::with_rng(Config::default(), StdRng::seed_from_u64(5));
    eng.load_rig(scene.index());

    // first blink cannot land before 2 s
    for _ in 0..60 {
        eng.update(DT, "wink", &mut scene);
    }
    assert!(!eng.is_blinking());
    assert_eq!(scene.weight(face, "eyeBlinkLeft"), Some(0.0));
    // the expression itself still tracked the channel
    approx(eng.weight("eyeBlinkLeft"), 0.8, 1e-4);
}

#[test]
fn wink_does_not_leak_into_blink_channels_between_blinks() {
    let mut scene = Scene::new();
    let face = scene.add_mesh("Face", &["eyeBlinkLeft", "eyeBlinkRight"]);
    let mut eng: ExpressionEngine<usize> =
        ExpressionEngine::with_rng(fast_blink(), StdRng::seed_from_u64(5));
    eng.load_rig(scene.index());

    let mut saw_blink = false;
    let mut saw_open = false;
    for _ in 0..180 {
        eng.update(DT, "wink", &mut scene);
        let expected = if eng.is_blinking() {
            saw_blink = true;
            1.0
        } else {
            saw_open = true;
            0.0
        };
        assert_eq!(scene.weight(face, "eyeBlinkLeft"), Some(expected));
        assert_eq!(scene.weight(face, "eyeBlinkRight"), Some(expected));
    }
    assert!(saw_blink && saw_open);
}

#[test]
fn idle_motion_drives_head_and_both_eyes() {
    let mut scene = Scene::new();
    scene.add_group("Armature");
    let head = scene.add_bone("Head");
    let left = scene.add_bone("LeftEye");
    let right = scene.add_bone("RightEye");
    let mut eng: ExpressionEngine<usize> =
        ExpressionEngine::with_rng(Config::default(), StdRng::seed_from_u64(1));
    eng.load_rig(scene.index());

    for _ in 0..90 {
        eng.update(DT, "neutral", &mut scene);
    }
    let pose = IdleMotion::new(IdleConfig::default()).pose_at(eng.clock());
    let head_rot = scene.bone_rotation(head).unwrap();
    approx(head_rot[0], pose.head[0], 1e-6);
    approx(head_rot[1], pose.head[1], 1e-6);
    assert_eq!(head_rot[2], 0.0);
    for eye in [left, right] {
        let rot = scene.bone_rotation(eye).unwrap();
        approx(rot[0], pose.eyes[0], 1e-6);
        approx(rot[1], pose.eyes[1], 1e-6);
    }
    // t = 1.5 s
    approx(head_rot[0], (1.5f32 * 0.5).sin() * 0.1, 1e-4);
}

#[test]
fn eyes_stay_put_without_a_pair() {
    let mut scene = Scene::new();
    let head = scene.add_bone("Neck");
    let left = scene.add_bone("LeftEye");
    let mut eng: ExpressionEngine<usize> =
        ExpressionEngine::with_rng(Config::default(), StdRng::seed_from_u64(1));
    eng.load_rig(scene.index());

    eng.update(0.5, "neutral", &mut scene);
    assert_ne!(scene.bone_rotation(head), Some([0.0; 3]));
    assert_eq!(scene.bone_rotation(left), Some([0.0; 3]));
}

#[test]
fn disabled_idle_leaves_bones_alone() {
    let mut scene = Scene::new();
    let head = scene.add_bone("Head");
    let cfg = Config {
        idle: IdleConfig {
            enabled: false,
            ..IdleConfig::default()
        },
        ..Config::default()
    };
    let mut eng: ExpressionEngine<usize> =
        ExpressionEngine::with_rng(cfg, StdRng::seed_from_u64(1));
    eng.load_rig(scene.index());
    eng.update(1.0, "neutral", &mut scene);
    assert_eq!(scene.bone_rotation(head), Some([0.0; 3]));
}

#[test]
fn empty_rig_still_runs_timers() {
    let mut scene = Scene::new();
    let mut eng: ExpressionEngine<usize> =
        ExpressionEngine::with_rng(fast_blink(), StdRng::seed_from_u64(2));
    eng.load_rig(scene.index());
    let mut blinked = false;
    for _ in 0..60 {
        blinked |= eng
            .update(DT, "happy", &mut scene)
            .events
            .contains(&ExpressionEvent::BlinkStarted);
    }
    assert!(blinked);
    assert_eq!(eng.current_label(), "happy");
    assert!(eng.morph_target_names().is_empty());
}
