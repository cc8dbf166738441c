//! # sphere_motion
//!
//! Turns a stream of [`GestureFrame`](hand_gesture::GestureFrame)s into the
//! continuously-read visual parameters of the particle sphere.
//!
//! ## Modes
//!
//! | Latest frame | Mode | Targets |
//! |---|---|---|
//! | no hands | `IdleSpin` | scale 1, glow 0, rotation Y = 0.3 rad/s × time |
//! | two hands | `TwoHandReactive` | gesture table; rotations copied from frame |
//! | one hand | `OneHandFrozen` | current and target snapped to neutral |
//!
//! | Gesture | Scale | Glow |
//! |---|---|---|
//! | fist | 0.3 | 1.5 |
//! | close | 0.4 | 1.2 |
//! | spread | 2.2 | 0.3 |
//! | approach | 1.0 | 0.0 |
//!
//! While tracking is off, an [`AmbientSphere`] replaces all of the above:
//! 3000 particles turning at 0.1 rad/s about Y and nodding by
//! `sin(0.2·t)·0.1` about X.
//!
//! The renderer pulls [`VisualParams`] once per tick; nothing is pushed.

pub mod smoother;
pub mod particles;
pub mod ambient;

pub use smoother::{
    gesture_targets, DecayRates, MotionMode, MotionSmoother, Smoothed, VisualParams, VisualState,
};
pub use particles::{ParticleConfig, ParticleField};
pub use ambient::{AmbientConfig, AmbientSphere};
