//! Optional minimum-dwell filter for discrete classifications.
//!
//! The interpreter re-classifies every frame with no memory, so a marginal
//! pose can flicker between two gestures.  A [`GestureStabilizer`] with a
//! non-zero dwell only lets a new classification through once it has been
//! seen continuously for that long.  A zero dwell passes every frame through
//! unchanged.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::frame::{Gesture, GestureFrame, NavigationIntent};

// ════════════════════════════════════════════════════════════════════════════
// Dwell<T>
// ════════════════════════════════════════════════════════════════════════════

/// A value that only changes after the new value has dwelt for `dwell`.
#[derive(Clone, Debug)]
pub struct Dwell<T> {
    stable:    T,
    candidate: T,
    since:     Option<Instant>,
    dwell:     Duration,
}

impl<T: Copy + PartialEq> Dwell<T> {
    pub fn new(initial: T, dwell: Duration) -> Self {
        Dwell { stable: initial, candidate: initial, since: None, dwell }
    }

    pub fn stable(&self) -> T {
        self.stable
    }

    /// Observe `value` at `at` and return the stable value.
    pub fn update(&mut self, value: T, at: Instant) -> T {
        if value == self.stable {
            self.candidate = value;
            self.since     = None;
            return self.stable;
        }

        let since = match self.since {
            Some(since) if self.candidate == value => since,
            _ => {
                self.candidate = value;
                self.since     = Some(at);
                at
            }
        };

        if at.saturating_duration_since(since) >= self.dwell {
            self.stable = value;
            self.since  = None;
        }
        self.stable
    }

    /// Jump straight to `value`, dropping any pending candidate.
    pub fn reset(&mut self, value: T) {
        self.stable    = value;
        self.candidate = value;
        self.since     = None;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureStabilizer
// ════════════════════════════════════════════════════════════════════════════

/// Applies a [`Dwell`] to the two-hand gesture and the one-hand navigation
/// intent of each frame.
///
/// A field is only filtered while its branch is active; frames outside the
/// branch reset it to the idle value, so the frame's idle defaults are
/// never overwritten.  The first frame of a branch is reported as
/// classified and seeds the dwell.
#[derive(Clone, Debug)]
pub struct GestureStabilizer {
    gesture:    Dwell<Gesture>,
    navigation: Dwell<NavigationIntent>,
    two_hand:   bool,
    one_hand:   bool,
}

impl GestureStabilizer {
    pub fn new(dwell: Duration) -> Self {
        GestureStabilizer {
            gesture:    Dwell::new(Gesture::Idle, dwell),
            navigation: Dwell::new(NavigationIntent::None, dwell),
            two_hand:   false,
            one_hand:   false,
        }
    }

    pub fn stabilize(&mut self, mut frame: GestureFrame, at: Instant) -> GestureFrame {
        if frame.two_hand_active {
            let raw = frame.gesture;
            if !self.two_hand {
                self.gesture.reset(raw);
            }
            frame.gesture = self.gesture.update(raw, at);
            if frame.gesture != raw {
                debug!("holding gesture {} over {}", frame.gesture.as_str(), raw.as_str());
            }
        } else {
            self.gesture.reset(frame.gesture);
        }

        if frame.one_hand_active {
            if !self.one_hand {
                self.navigation.reset(frame.navigation);
            }
            frame.navigation = self.navigation.update(frame.navigation, at);
        } else {
            self.navigation.reset(frame.navigation);
        }

        self.two_hand = frame.two_hand_active;
        self.one_hand = frame.one_hand_active;
        frame
    }

    pub fn reset(&mut self) {
        self.gesture.reset(Gesture::Idle);
        self.navigation.reset(NavigationIntent::None);
        self.two_hand = false;
        self.one_hand = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_hand(gesture: Gesture) -> GestureFrame {
        GestureFrame {
            hand_count:      2,
            detected:        true,
            two_hand_active: true,
            gesture,
            ..GestureFrame::idle()
        }
    }

    #[test]
    fn zero_dwell_is_passthrough() {
        let mut s = GestureStabilizer::new(Duration::ZERO);
        let t0 = Instant::now();
        for g in [Gesture::Spread, Gesture::Close, Gesture::Fist, Gesture::Approach] {
            assert_eq!(s.stabilize(two_hand(g), t0).gesture, g);
        }
    }

    #[test]
    fn change_waits_for_dwell() {
        let mut d = Dwell::new(Gesture::Approach, Duration::from_millis(100));
        let t0 = Instant::now();
        assert_eq!(d.update(Gesture::Spread, t0), Gesture::Approach);
        assert_eq!(d.update(Gesture::Spread, t0 + Duration::from_millis(60)), Gesture::Approach);
        assert_eq!(d.update(Gesture::Spread, t0 + Duration::from_millis(100)), Gesture::Spread);
    }

    #[test]
    fn flicker_restarts_the_clock() {
        let mut d = Dwell::new(Gesture::Approach, Duration::from_millis(100));
        let t0 = Instant::now();
        d.update(Gesture::Spread, t0);
        d.update(Gesture::Close, t0 + Duration::from_millis(80));
        assert_eq!(d.update(Gesture::Spread, t0 + Duration::from_millis(120)), Gesture::Approach);
        assert_eq!(d.update(Gesture::Spread, t0 + Duration::from_millis(220)), Gesture::Spread);
    }

    fn one_hand(navigation: NavigationIntent) -> GestureFrame {
        GestureFrame {
            hand_count:      1,
            detected:        true,
            one_hand_active: true,
            navigation,
            ..GestureFrame::idle()
        }
    }

    #[test]
    fn entering_two_hands_reports_the_classification() {
        let mut s = GestureStabilizer::new(Duration::from_millis(100));
        let t0 = Instant::now();
        let f = s.stabilize(two_hand(Gesture::Fist), t0);
        assert!(f.two_hand_active);
        assert_eq!(f.gesture, Gesture::Fist);

        // Changes inside the branch still wait.
        let t1 = t0 + Duration::from_millis(10);
        assert_eq!(s.stabilize(two_hand(Gesture::Spread), t1).gesture, Gesture::Fist);

        // Leaving and coming back re-seeds.
        s.stabilize(GestureFrame::idle(), t1);
        let t2 = t1 + Duration::from_millis(10);
        assert_eq!(s.stabilize(two_hand(Gesture::Close), t2).gesture, Gesture::Close);
    }

    #[test]
    fn entering_one_hand_reports_the_intent() {
        let mut s = GestureStabilizer::new(Duration::from_millis(100));
        let t0 = Instant::now();
        s.stabilize(two_hand(Gesture::Spread), t0);
        let f = s.stabilize(one_hand(NavigationIntent::Skills), t0);
        assert_eq!(f.navigation, NavigationIntent::Skills);
        let t1 = t0 + Duration::from_millis(20);
        assert_eq!(s.stabilize(one_hand(NavigationIntent::Home), t1).navigation, NavigationIntent::Skills);
    }

    #[test]
    fn idle_frames_are_untouched() {
        let mut s = GestureStabilizer::new(Duration::from_secs(10));
        let t0 = Instant::now();
        s.stabilize(two_hand(Gesture::Spread), t0);
        assert_eq!(s.stabilize(GestureFrame::idle(), t0), GestureFrame::idle());
    }
}
