//! # hand_gesture
//!
//! Interprets per-frame hand-landmark detections (21 normalized points per
//! hand, as produced by a MediaPipe-style hand detector) into a small set of
//! semantic gestures and continuous control signals.
//!
//! ## Hands → output
//!
//! | Hands | Pose | Output |
//! |---|---|---|
//! | 0 | — | idle frame |
//! | 1 | no fingers (thumb ignored) | `Home` |
//! | 1 | index | `Projects` |
//! | 1 | index + middle | `Skills` |
//! | 1 | index + middle + ring | `Contact` |
//! | 2 | both closed | `Fist` |
//! | 2 | palms < 0.15 apart | `Close` |
//! | 2 | palms > 0.35 apart | `Spread` |
//! | 2 | otherwise | `Approach` |
//!
//! Two-hand frames also carry `rotation_y`/`rotation_x`, a direct mapping of
//! the pair's mean image position onto `[0, 2π)`.
//!
//! ## Quick start
//!
//! ```rust
//! use std::time::Instant;
//! use hand_gesture::{synth, Gesture, GestureInterpreter, LandmarkPoint};
//!
//! let mut interpreter = GestureInterpreter::default();
//! let hands = vec![
//!     synth::fist(LandmarkPoint::new(0.3, 0.5)),
//!     synth::fist(LandmarkPoint::new(0.7, 0.5)),
//! ];
//! let frame = interpreter.interpret(&hands, Instant::now());
//! assert_eq!(frame.gesture, Gesture::Fist);
//! ```

pub mod error;
pub mod landmark;
pub mod hand;
pub mod frame;
pub mod interpreter;
pub mod navigation;
pub mod debounce;
pub mod synth;

pub use error::LandmarkError;
pub use landmark::{HandLandmarks, LandmarkPoint, HAND_CONNECTIONS, LANDMARK_COUNT};
pub use hand::{Finger, HandObservation};
pub use frame::{Gesture, GestureFrame, NavigationIntent, Velocity};
pub use interpreter::{validate_hands, GestureInterpreter, InterpreterConfig};
pub use navigation::{NavigationEffect, NavigationTrigger, TriggerMode};
pub use debounce::{Dwell, GestureStabilizer};
