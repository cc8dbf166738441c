//! Motion smoother: the sphere's visual state.
//!
//! Each visual parameter is a `(current, target)` pair.  Targets move only
//! when a gesture frame is applied; currents chase their targets by one
//! exponential step every render tick, whether or not a new frame arrived.

use hand_gesture::{Gesture, GestureFrame};
use serde::Deserialize;
use tracing::debug;

// ════════════════════════════════════════════════════════════════════════════
// Smoothed — one (current, target) pair
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Smoothed {
    pub current: f32,
    pub target:  f32,
}

impl Smoothed {
    pub const fn new(value: f32) -> Self {
        Smoothed { current: value, target: value }
    }

    /// Move `current` a fraction `k` of the way to `target`.
    pub fn decay(&mut self, k: f32) {
        self.current += (self.target - self.current) * k;
    }

    /// Set both halves at once, with no transition.
    pub fn snap(&mut self, value: f32) {
        self.current = value;
        self.target  = value;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Rates
// ════════════════════════════════════════════════════════════════════════════

/// Per-tick smoothing fractions.  Higher is snappier and twitchier.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DecayRates {
    pub scale:    f32,
    pub glow:     f32,
    pub rotation: f32,
    /// Idle spin speed, radians per second of animation time.
    pub idle_spin: f32,
}

impl Default for DecayRates {
    fn default() -> Self {
        DecayRates {
            scale:     0.08,
            glow:      0.1,
            rotation:  0.05,
            idle_spin: 0.3,
        }
    }
}

/// `(scale, glow)` targets for a two-hand gesture.
pub fn gesture_targets(gesture: Gesture) -> (f32, f32) {
    match gesture {
        Gesture::Fist     => (0.3, 1.5),
        Gesture::Close    => (0.4, 1.2),
        Gesture::Spread   => (2.2, 0.3),
        Gesture::Approach
        | Gesture::Idle   => (1.0, 0.0),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MotionMode
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionMode {
    /// No hands: slow spin around Y.
    IdleSpin,
    /// Two hands drive scale, glow and rotation.
    TwoHandReactive,
    /// One hand is navigating: the sphere is held neutral.
    OneHandFrozen,
}

impl MotionMode {
    /// Chosen from the frame's flags alone.
    pub fn select(frame: &GestureFrame) -> Self {
        if !frame.detected {
            MotionMode::IdleSpin
        } else if frame.two_hand_active {
            MotionMode::TwoHandReactive
        } else if frame.one_hand_active {
            MotionMode::OneHandFrozen
        } else {
            MotionMode::IdleSpin
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// VisualState / VisualParams
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualState {
    pub scale:      Smoothed,
    pub glow:       Smoothed,
    pub rotation_y: Smoothed,
    pub rotation_x: Smoothed,
}

impl VisualState {
    pub const NEUTRAL: VisualState = VisualState {
        scale:      Smoothed::new(1.0),
        glow:       Smoothed::new(0.0),
        rotation_y: Smoothed::new(0.0),
        rotation_x: Smoothed::new(0.0),
    };

    pub fn params(&self) -> VisualParams {
        VisualParams {
            scale:      self.scale.current,
            glow:       self.glow.current,
            rotation_y: self.rotation_y.current,
            rotation_x: self.rotation_x.current,
        }
    }
}

impl Default for VisualState {
    fn default() -> Self {
        VisualState::NEUTRAL
    }
}

/// The displayed values, re-sampled by the renderer every tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualParams {
    pub scale:      f32,
    pub glow:       f32,
    pub rotation_y: f32,
    pub rotation_x: f32,
}

impl VisualParams {
    pub const NEUTRAL: VisualParams = VisualParams {
        scale:      1.0,
        glow:       0.0,
        rotation_y: 0.0,
        rotation_x: 0.0,
    };
}

// ════════════════════════════════════════════════════════════════════════════
// MotionSmoother
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct MotionSmoother {
    state: VisualState,
    rates: DecayRates,
    mode:  MotionMode,
}

impl MotionSmoother {
    pub fn new(rates: DecayRates) -> Self {
        MotionSmoother {
            state: VisualState::NEUTRAL,
            rates,
            mode:  MotionMode::IdleSpin,
        }
    }

    pub fn state(&self) -> &VisualState  { &self.state }
    pub fn mode(&self)  -> MotionMode    { self.mode }
    pub fn rates(&self) -> &DecayRates   { &self.rates }
    pub fn params(&self) -> VisualParams { self.state.params() }

    /// Update targets from `frame`.  `elapsed` is animation time in seconds
    /// and only drives the idle spin.
    pub fn apply(&mut self, frame: &GestureFrame, elapsed: f32) {
        let mode = MotionMode::select(frame);
        if mode != self.mode {
            debug!("motion mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }

        let s = &mut self.state;
        match mode {
            MotionMode::TwoHandReactive => {
                let (scale, glow) = gesture_targets(frame.gesture);
                s.scale.target      = scale;
                s.glow.target       = glow;
                s.rotation_y.target = frame.rotation_y;
                s.rotation_x.target = frame.rotation_x;
            }
            MotionMode::IdleSpin => {
                s.scale.target      = 1.0;
                s.glow.target       = 0.0;
                s.rotation_y.target = elapsed * self.rates.idle_spin;
                s.rotation_x.target = 0.0;
            }
            MotionMode::OneHandFrozen => {
                s.scale.snap(1.0);
                s.glow.snap(0.0);
                s.rotation_y.snap(0.0);
                s.rotation_x.snap(0.0);
            }
        }
    }

    /// One exponential step of every current toward its target.
    pub fn decay(&mut self) {
        let r = &self.rates;
        let s = &mut self.state;
        s.scale.decay(r.scale);
        s.glow.decay(r.glow);
        s.rotation_y.decay(r.rotation);
        s.rotation_x.decay(r.rotation);
    }

    /// A full render tick: apply the latest frame (stale or not), then decay.
    pub fn tick(&mut self, latest: &GestureFrame, elapsed: f32) -> VisualParams {
        self.apply(latest, elapsed);
        self.decay();
        self.params()
    }

    pub fn reset(&mut self) {
        self.state = VisualState::NEUTRAL;
        self.mode  = MotionMode::IdleSpin;
    }
}

impl Default for MotionSmoother {
    fn default() -> Self {
        MotionSmoother::new(DecayRates::default())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
