//! End-to-end: simulated keyboard hands through the tracking thread into the
//! sphere, without opening a window.

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use gesture_sphere::app::AppState;
use gesture_sphere::config::AppConfig;
use gesture_sphere::source::{SimInput, SimLandmarkSource, SimPose};
use hand_gesture::{Gesture, NavigationIntent};
use sphere_motion::{MotionMode, ParticleConfig};

fn app() -> (AppState, mpsc::Sender<SimInput>) {
    let (tx, rx) = mpsc::channel();
    let cfg = AppConfig {
        poll_ms:   2,
        particles: ParticleConfig { count: 32, ..ParticleConfig::default() },
        ..AppConfig::default()
    };
    (AppState::new(&cfg, Box::new(SimLandmarkSource::new(rx))), tx)
}

fn tick_until(app: &mut AppState, done: impl Fn(&AppState) -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        app.tick(0.0);
        if done(app) {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    false
}

#[test]
fn spreading_two_hands_grows_the_sphere() {
    let (mut app, tx) = app();
    assert!(app.set_tracking(true));

    tx.send(SimInput::Pose(SimPose::TwoHands { closed: false })).unwrap();
    tx.send(SimInput::Separation(0.3)).unwrap();
    assert!(tick_until(&mut app, |a| a.latest().gesture.gesture == Gesture::Spread));
    assert_eq!(app.mode(), MotionMode::TwoHandReactive);
    assert_eq!(app.latest().hands.len(), 2);

    assert!(tick_until(&mut app, |a| a.params().scale > 2.0));
}

#[test]
fn moving_hands_turns_the_sphere() {
    let (mut app, tx) = app();
    app.set_tracking(true);

    tx.send(SimInput::Pose(SimPose::TwoHands { closed: false })).unwrap();
    tx.send(SimInput::Nudge { dx: -0.25, dy: 0.0 }).unwrap();
    // mean x 0.25 -> rotation_y = 0.75 * 2pi
    let target = 0.75 * std::f32::consts::TAU;
    assert!(tick_until(&mut app, |a| (a.latest().gesture.rotation_y - target).abs() < 1e-3));
}

#[test]
fn one_hand_pose_navigates_and_freezes() {
    let (mut app, tx) = app();
    app.set_tracking(true);

    tx.send(SimInput::Pose(SimPose::OneHand([false, true, true, true, false]))).unwrap();
    assert!(tick_until(&mut app, |a| a.scroller().section() == NavigationIntent::Contact));
    assert_eq!(app.mode(), MotionMode::OneHandFrozen);

    tx.send(SimInput::Pose(SimPose::OneHand([false; 5]))).unwrap();
    assert!(tick_until(&mut app, |a| a.scroller().section() == NavigationIntent::Home));
    assert_eq!(app.scroller().scrolls(), 2);
}

#[test]
fn disabling_tracking_forgets_the_hands() {
    let (mut app, tx) = app();
    app.set_tracking(true);
    tx.send(SimInput::Pose(SimPose::TwoHands { closed: true })).unwrap();
    assert!(tick_until(&mut app, |a| a.latest().gesture.gesture == Gesture::Fist));

    assert!(!app.set_tracking(false));
    assert!(app.latest().gesture.is_idle());
    assert!(app.latest().hands.is_empty());
    app.tick(1.0);
    assert_eq!(app.mode(), MotionMode::IdleSpin);
}
