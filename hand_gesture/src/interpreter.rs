//! Gesture interpreter: turns one frame of raw landmarks into a
//! [`GestureFrame`].
//!
//! # Algorithm
//!
//! Each hand is reduced to a [`HandObservation`] (palm centroid, five
//! extension flags).  Then, by hand count:
//!
//! * **0 hands**: the idle frame.  Carried state is left alone.
//! * **1 hand**: the index/middle/ring/pinky pattern picks a
//!   [`NavigationIntent`]; the thumb is ignored.
//! * **2 hands**: the mean centroid maps directly onto two rotation angles,
//!   the inter-palm distance picks the [`Gesture`].
//!
//! The only state kept between frames is the previous mean centroid and its
//! timestamp, used for the centroid velocity.

use std::f32::consts::TAU;
use std::time::Instant;

use serde::Deserialize;
use tracing::{debug, trace};

use crate::error::LandmarkError;
use crate::frame::{Gesture, GestureFrame, NavigationIntent, Velocity};
use crate::hand::{Finger, HandObservation};
use crate::landmark::{HandLandmarks, LandmarkPoint};

// ════════════════════════════════════════════════════════════════════════════
// InterpreterConfig
// ════════════════════════════════════════════════════════════════════════════

/// Classification thresholds.  Defaults are the tuned reference values.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Tip must be this many times further from the wrist than the base.
    pub extension_ratio:    f32,
    /// Raw palm distance that maps to a normalized distance of 1.0.
    pub distance_scale:     f32,
    /// Normalized distance below which two hands are `Close`.
    pub close_below:        f32,
    /// Normalized distance above which two hands are `Spread`.
    pub spread_above:       f32,
    pub open_min_fingers:   usize,
    pub closed_max_fingers: usize,
    /// Floor on the frame interval used for velocity, seconds.
    pub min_dt_secs:        f32,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            extension_ratio:    1.1,
            distance_scale:     0.5,
            close_below:        0.3,
            spread_above:       0.7,
            open_min_fingers:   3,
            closed_max_fingers: 1,
            min_dt_secs:        0.001,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureInterpreter
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug)]
struct Carried {
    centroid: LandmarkPoint,
    at:       Instant,
}

pub struct GestureInterpreter {
    config:  InterpreterConfig,
    carried: Option<Carried>,
}

impl GestureInterpreter {
    pub fn new(config: InterpreterConfig) -> Self {
        GestureInterpreter { config, carried: None }
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Forget the previous centroid and timestamp.
    pub fn reset(&mut self) {
        self.carried = None;
    }

    /// Interpret one frame, substituting the idle frame for malformed input.
    pub fn interpret(&mut self, hands: &[Vec<LandmarkPoint>], at: Instant) -> GestureFrame {
        match self.try_interpret(hands, at) {
            Ok(frame) => frame,
            Err(e) => {
                debug!("discarding malformed detection: {}", e);
                GestureFrame::idle()
            }
        }
    }

    /// Interpret one frame.
    ///
    /// Every hand is validated before any state changes, so an `Err` leaves
    /// the interpreter exactly as it was.
    pub fn try_interpret(
        &mut self,
        hands: &[Vec<LandmarkPoint>],
        at:    Instant,
    ) -> Result<GestureFrame, LandmarkError> {
        let hands = validate_hands(hands)?;
        Ok(self.interpret_hands(&hands, at))
    }

    /// Interpret already-validated hands.
    pub fn interpret_hands(&mut self, hands: &[HandLandmarks], at: Instant) -> GestureFrame {
        if hands.is_empty() || hands.len() > 2 {
            return GestureFrame::idle();
        }

        let observed: Vec<HandObservation> = hands
            .iter()
            .map(|h| HandObservation::observe(h, &self.config))
            .collect();

        let mean = LandmarkPoint::mean(observed.iter().map(|h| h.centroid))
            .unwrap_or_default();
        let centroid_velocity = self.advance(mean, at);

        let mut frame = GestureFrame {
            hand_count:      observed.len(),
            detected:        true,
            centroid_velocity,
            ..GestureFrame::idle()
        };

        if let [a, b] = observed.as_slice() {
            self.fill_two_hand(&mut frame, a, b, mean);
        } else {
            frame.one_hand_active = true;
            frame.navigation      = navigation_intent(&observed[0]);
        }

        trace!(
            hands = frame.hand_count,
            gesture = frame.gesture.as_str(),
            navigation = frame.navigation.as_str(),
            "interpreted frame"
        );
        frame.hands = observed;
        frame
    }

    fn fill_two_hand(
        &self,
        frame: &mut GestureFrame,
        a:     &HandObservation,
        b:     &HandObservation,
        mean:  LandmarkPoint,
    ) {
        let cfg = &self.config;

        frame.two_hand_active     = true;
        frame.avg_finger_spread   = (a.finger_spread + b.finger_spread) / 2.0;
        frame.both_closed         = a.is_closed && b.is_closed;
        frame.rotation_y          = wrap_angle((1.0 - mean.x) * TAU);
        frame.rotation_x          = wrap_angle(mean.y * TAU);
        frame.hands_distance      = a.centroid.distance(&b.centroid);
        frame.normalized_distance = (frame.hands_distance / cfg.distance_scale).clamp(0.0, 1.0);

        frame.gesture = if frame.both_closed {
            Gesture::Fist
        } else if frame.normalized_distance < cfg.close_below {
            Gesture::Close
        } else if frame.normalized_distance > cfg.spread_above {
            Gesture::Spread
        } else {
            Gesture::Approach
        };
    }

    /// Update the carried centroid and return the velocity since the last
    /// observed frame.  The first observation has zero velocity.
    fn advance(&mut self, centroid: LandmarkPoint, at: Instant) -> Velocity {
        let velocity = match self.carried {
            Some(prev) => {
                let dt = at
                    .saturating_duration_since(prev.at)
                    .as_secs_f32()
                    .max(self.config.min_dt_secs);
                Velocity {
                    x: (centroid.x - prev.centroid.x) / dt,
                    y: (centroid.y - prev.centroid.y) / dt,
                }
            }
            None => Velocity::default(),
        };
        self.carried = Some(Carried { centroid, at });
        velocity
    }
}

impl Default for GestureInterpreter {
    fn default() -> Self {
        GestureInterpreter::new(InterpreterConfig::default())
    }
}

/// Fold an angle into `[0, 2π)`.  `rem_euclid` alone can round a tiny
/// negative angle up to exactly `2π`.
pub fn wrap_angle(angle: f32) -> f32 {
    let r = angle.rem_euclid(TAU);
    if r >= TAU { 0.0 } else { r }
}

/// Check a raw detection: at most two hands, each exactly 21 finite points.
pub fn validate_hands(hands: &[Vec<LandmarkPoint>]) -> Result<Vec<HandLandmarks>, LandmarkError> {
    if hands.len() > 2 {
        return Err(LandmarkError::TooManyHands { found: hands.len() });
    }
    hands
        .iter()
        .map(|pts| HandLandmarks::from_points(pts))
        .collect()
}

/// One-hand finger pattern → section.  The thumb does not participate.
pub fn navigation_intent(hand: &HandObservation) -> NavigationIntent {
    let pattern = (
        hand.is_extended(Finger::Index),
        hand.is_extended(Finger::Middle),
        hand.is_extended(Finger::Ring),
        hand.is_extended(Finger::Pinky),
    );
    match pattern {
        _ if hand.open_fingers == 0        => NavigationIntent::Home,
        (false, false, false, false)       => NavigationIntent::Home,
        (true,  false, false, false)       => NavigationIntent::Projects,
        (true,  true,  false, false)       => NavigationIntent::Skills,
        (true,  true,  true,  false)       => NavigationIntent::Contact,
        _                                  => NavigationIntent::None,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth;
    use std::f32::consts::PI;
    use std::time::Duration;

    const OPEN:   [bool; 5] = [true; 5];
    const CLOSED: [bool; 5] = [false; 5];

    fn p(x: f32, y: f32) -> LandmarkPoint {
        LandmarkPoint::new(x, y)
    }

    fn one(extended: [bool; 5]) -> GestureFrame {
        let mut it = GestureInterpreter::default();
        it.interpret(&[synth::hand(p(0.5, 0.5), extended)], Instant::now())
    }

    fn two(a: LandmarkPoint, b: LandmarkPoint, ea: [bool; 5], eb: [bool; 5]) -> GestureFrame {
        let mut it = GestureInterpreter::default();
        it.interpret(&[synth::hand(a, ea), synth::hand(b, eb)], Instant::now())
    }

    #[test]
    fn no_hands_is_idle() {
        let mut it = GestureInterpreter::default();
        assert_eq!(it.interpret(&[], Instant::now()), GestureFrame::idle());
    }

    #[test]
    fn one_hand_flags() {
        let f = one(OPEN);
        assert!(f.detected);
        assert!(f.one_hand_active);
        assert!(!f.two_hand_active);
        assert_eq!(f.hand_count, 1);
        assert_eq!(f.gesture, Gesture::Idle);
        assert_eq!(f.normalized_distance, 0.5);
    }

    #[test]
    fn navigation_table() {
        assert_eq!(one(CLOSED).navigation,                             NavigationIntent::Home);
        assert_eq!(one([true, false, false, false, false]).navigation, NavigationIntent::Home);
        assert_eq!(one([false, true, false, false, false]).navigation, NavigationIntent::Projects);
        assert_eq!(one([true, true, true, false, false]).navigation,   NavigationIntent::Skills);
        assert_eq!(one([false, true, true, true, false]).navigation,   NavigationIntent::Contact);
        assert_eq!(one([false, true, true, false, true]).navigation,   NavigationIntent::None);
        assert_eq!(one(OPEN).navigation,                               NavigationIntent::None);
    }

    #[test]
    fn both_fists_win_regardless_of_distance() {
        let near = two(p(0.45, 0.5), p(0.55, 0.5), CLOSED, CLOSED);
        let far  = two(p(0.1, 0.5),  p(0.9, 0.5),  CLOSED, CLOSED);
        assert_eq!(near.gesture, Gesture::Fist);
        assert_eq!(far.gesture,  Gesture::Fist);
        assert!(far.both_closed);
    }

    #[test]
    fn distance_classes() {
        assert_eq!(two(p(0.45, 0.5), p(0.55, 0.5), OPEN, OPEN).gesture, Gesture::Close);
        assert_eq!(two(p(0.40, 0.5), p(0.60, 0.5), OPEN, OPEN).gesture, Gesture::Approach);
        assert_eq!(two(p(0.20, 0.5), p(0.80, 0.5), OPEN, OPEN).gesture, Gesture::Spread);
    }

    #[test]
    fn distance_normalization() {
        let f = two(p(0.25, 0.5), p(0.75, 0.5), OPEN, OPEN);
        assert!((f.normalized_distance - 1.0).abs() < 1e-5);
        let f = two(p(0.5, 0.5), p(0.5, 0.5), OPEN, OPEN);
        assert_eq!(f.normalized_distance, 0.0);
        let f = two(p(0.0, 0.5), p(1.0, 0.5), OPEN, OPEN);
        assert_eq!(f.normalized_distance, 1.0);
    }

    #[test]
    fn rotation_maps_mean_position() {
        let f = two(p(0.3, 0.5), p(0.7, 0.5), OPEN, OPEN);
        assert!((f.rotation_y - PI).abs() < 1e-4);
        assert!((f.rotation_x - PI).abs() < 1e-4);

        let f = two(p(0.7, 0.25), p(0.8, 0.25), OPEN, OPEN);
        assert!((f.rotation_y - 0.25 * TAU).abs() < 1e-4);
        assert!((f.rotation_x - 0.25 * TAU).abs() < 1e-4);
    }

    #[test]
    fn rotation_stays_below_a_full_turn_at_the_edge() {
        let f = two(p(0.3, -1e-9), p(0.7, -1e-9), OPEN, OPEN);
        assert!(f.rotation_x >= 0.0 && f.rotation_x < TAU);
        assert!(f.rotation_y >= 0.0 && f.rotation_y < TAU);

        let f = two(p(1.0, 0.5), p(1.0, 0.5), OPEN, OPEN);
        assert!(f.rotation_y < TAU);

        assert_eq!(wrap_angle(-1e-9), 0.0);
        assert_eq!(wrap_angle(TAU), 0.0);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-6);
    }

    #[test]
    fn spread_is_mean_of_both_hands() {
        let f = two(p(0.3, 0.5), p(0.7, 0.5), OPEN, [false, true, true, false, false]);
        assert!((f.avg_finger_spread - 0.7).abs() < 1e-6);
        assert_eq!(f.navigation, NavigationIntent::None);
    }

    #[test]
    fn velocity_from_consecutive_frames() {
        let mut it = GestureInterpreter::default();
        let t0 = Instant::now();
        let first = it.interpret(&[synth::open_hand(p(0.5, 0.5))], t0);
        assert_eq!(first.centroid_velocity, Velocity::default());

        let f = it.interpret(&[synth::open_hand(p(0.6, 0.5))], t0 + Duration::from_millis(100));
        assert!((f.centroid_velocity.x - 1.0).abs() < 1e-3);
        assert!(f.centroid_velocity.y.abs() < 1e-3);
    }

    #[test]
    fn velocity_dt_is_floored() {
        let mut it = GestureInterpreter::default();
        let t0 = Instant::now();
        it.interpret(&[synth::open_hand(p(0.5, 0.5))], t0);
        let f = it.interpret(&[synth::open_hand(p(0.501, 0.5))], t0);
        assert!((f.centroid_velocity.x - 1.0).abs() < 1e-2);
    }

    #[test]
    fn idle_frame_keeps_carried_state() {
        let mut it = GestureInterpreter::default();
        let t0 = Instant::now();
        it.interpret(&[synth::open_hand(p(0.5, 0.5))], t0);
        it.interpret(&[], t0 + Duration::from_millis(50));
        let f = it.interpret(&[synth::open_hand(p(0.6, 0.5))], t0 + Duration::from_millis(100));
        assert!((f.centroid_velocity.x - 1.0).abs() < 1e-3);
    }

    #[test]
    fn malformed_hand_is_rejected_without_side_effects() {
        let mut it = GestureInterpreter::default();
        let t0 = Instant::now();
        it.interpret(&[synth::open_hand(p(0.5, 0.5))], t0);

        let mut bad = synth::open_hand(p(0.9, 0.9));
        bad[3].x = f32::NAN;
        let err = it.try_interpret(&[bad.clone()], t0 + Duration::from_millis(50));
        assert_eq!(err, Err(LandmarkError::NonFinite { index: 3 }));
        assert_eq!(it.interpret(&[bad], t0), GestureFrame::idle());

        let f = it.interpret(&[synth::open_hand(p(0.6, 0.5))], t0 + Duration::from_millis(100));
        assert!((f.centroid_velocity.x - 1.0).abs() < 1e-3);
    }

    #[test]
    fn short_hand_and_three_hands_are_rejected() {
        let mut it = GestureInterpreter::default();
        let short = vec![p(0.5, 0.5); 20];
        assert!(matches!(
            it.try_interpret(&[short], Instant::now()),
            Err(LandmarkError::WrongPointCount { found: 20, .. })
        ));

        let h = synth::open_hand(p(0.5, 0.5));
        assert_eq!(
            it.try_interpret(&[h.clone(), h.clone(), h], Instant::now()),
            Err(LandmarkError::TooManyHands { found: 3 })
        );
    }
}
