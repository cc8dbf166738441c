//! # gesture_sphere
//!
//! A particle sphere steered by hand gestures.  Hand landmarks come from a
//! [`source::LandmarkSource`], are interpreted on a tracking thread, and the
//! resulting gesture frames drive a smoothed sphere and a section bar.
//!
//! ## Gesture → Action mapping
//!
//! | Hands | Pose | Action |
//! |---|---|---|
//! | 0 | — | Sphere spins slowly around Y |
//! | 1 | fist | Scroll to top (Home) |
//! | 1 | index | Scroll to Projects |
//! | 1 | index + middle | Scroll to Skills |
//! | 1 | index + middle + ring | Scroll to Contact |
//! | 2 | both fists | Sphere shrinks to 0.3, glow 1.5 |
//! | 2 | close together | Sphere shrinks to 0.4, glow 1.2 |
//! | 2 | far apart | Sphere grows to 2.2, glow 0.3 |
//! | 2 | in between | Sphere at rest size |
//!
//! With two hands up, their mean position in the image sets the sphere's
//! rotation directly.  Tracking is off until enabled; until then a dimmer,
//! sparser sphere turns slowly on its own.
//!
//! ## Sources
//!
//! * `keyboard` (default): simulated hands driven from the window.
//! * `demo`: a looping scripted tour of every gesture.
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Effect |
//! |---|---|
//! | `G` | Toggle hand tracking |
//! | `0` | No hands |
//! | `1`–`4` | One hand: fist, index, index+middle, index+middle+ring |
//! | `5` | One open hand |
//! | `O` / `F` | Two open hands / two fists |
//! | Arrows (hold) | Move the hands |
//! | `Z` / `X` (hold) | Narrow / widen the gap between two hands |
//! | `Q` / `Esc` | Quit |

pub mod error;
pub mod config;
pub mod logging;
pub mod source;
pub mod session;
pub mod visualizer;
pub mod app;

pub use error::{AcquisitionError, AppError, Result};
