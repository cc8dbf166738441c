//! Synthetic hands.
//!
//! Builds a plausible 21-point hand around a palm centre with any
//! combination of extended fingers.  The palm centroid of the result equals
//! the requested centre, so callers can place hands precisely.  Used by the
//! keyboard simulator, the scripted demo and tests.

use crate::hand::Finger;
use crate::landmark::{LandmarkPoint, LANDMARK_COUNT, WRIST};

/// Finger-base offsets from the palm centre.  Together with the wrist they
/// sum to zero, which keeps the centroid on the centre.
const WRIST_OFFSET: (f32, f32) = (0.0, 0.10);
const BASE_OFFSETS: [(f32, f32); 5] = [
    (-0.035,  0.07),   // thumb CMC
    (-0.03,  -0.02),   // index MCP
    (-0.01,  -0.03),   // middle MCP
    ( 0.01,  -0.025),  // ring MCP
    ( 0.03,  -0.025),  // pinky MCP
];

/// Distance of each joint from the finger base along the finger direction.
const EXTENDED_REACH: [f32; 3] = [0.03, 0.055, 0.08];
const CURLED_REACH:   [f32; 3] = [0.02, 0.005, -0.02];

/// Landmarks for a hand centred at `center` with the given thumb..pinky
/// extension flags.
pub fn hand(center: LandmarkPoint, extended: [bool; 5]) -> Vec<LandmarkPoint> {
    let at = |(dx, dy): (f32, f32)| LandmarkPoint::new(center.x + dx, center.y + dy);

    let mut pts = vec![LandmarkPoint::default(); LANDMARK_COUNT];
    let wrist = at(WRIST_OFFSET);
    pts[WRIST] = wrist;

    for (i, finger) in Finger::ALL.into_iter().enumerate() {
        let base = at(BASE_OFFSETS[i]);
        let (dx, dy) = (base.x - wrist.x, base.y - wrist.y);
        let len = (dx * dx + dy * dy).sqrt();
        let (ux, uy) = (dx / len, dy / len);

        let reach = if extended[i] { EXTENDED_REACH } else { CURLED_REACH };
        let chain = finger.chain();
        pts[chain[0]] = base;
        for (j, r) in reach.iter().enumerate() {
            pts[chain[j + 1]] = LandmarkPoint::new(base.x + ux * r, base.y + uy * r);
        }
    }
    pts
}

/// Open hand (all five extended).
pub fn open_hand(center: LandmarkPoint) -> Vec<LandmarkPoint> {
    hand(center, [true; 5])
}

/// Closed fist.
pub fn fist(center: LandmarkPoint) -> Vec<LandmarkPoint> {
    hand(center, [false; 5])
}
