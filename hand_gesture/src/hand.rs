//! Per-hand geometric features derived from one frame of landmarks.

use crate::interpreter::InterpreterConfig;
use crate::landmark::*;

// ════════════════════════════════════════════════════════════════════════════
// Finger
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb, Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky,
    ];

    /// Landmark chain from the finger base to its tip.
    pub fn chain(self) -> [usize; 4] {
        match self {
            Finger::Thumb  => [THUMB_CMC,  THUMB_MCP,  THUMB_IP,   THUMB_TIP],
            Finger::Index  => [INDEX_MCP,  INDEX_PIP,  INDEX_DIP,  INDEX_TIP],
            Finger::Middle => [MIDDLE_MCP, MIDDLE_PIP, MIDDLE_DIP, MIDDLE_TIP],
            Finger::Ring   => [RING_MCP,   RING_PIP,   RING_DIP,   RING_TIP],
            Finger::Pinky  => [PINKY_MCP,  PINKY_PIP,  PINKY_DIP,  PINKY_TIP],
        }
    }

    pub fn base(self) -> usize { self.chain()[0] }
    pub fn tip(self)  -> usize { self.chain()[3] }

    fn slot(self) -> usize {
        self as usize
    }
}

/// A finger counts as extended when its tip lies further from the wrist than
/// `ratio` times its base does.
pub fn is_finger_extended(hand: &HandLandmarks, finger: Finger, ratio: f32) -> bool {
    let wrist    = hand.wrist();
    let base_d   = hand.point(finger.base()).distance(&wrist);
    let tip_d    = hand.point(finger.tip()).distance(&wrist);
    tip_d > base_d * ratio
}

// ════════════════════════════════════════════════════════════════════════════
// HandObservation
// ════════════════════════════════════════════════════════════════════════════

/// Features of one detected hand in one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct HandObservation {
    /// Palm centroid in image space.
    pub centroid:     LandmarkPoint,
    /// Extension flags, thumb..pinky.
    pub extended:     [bool; 5],
    pub open_fingers: usize,
    pub is_open:      bool,
    pub is_closed:    bool,
    /// `open_fingers / 5`.
    pub finger_spread: f32,
    /// Centroid mapped to `[-1, 1]` on both axes and mirrored, for use as a
    /// 3-D control axis.
    pub display:      (f32, f32),
}

impl HandObservation {
    pub fn observe(hand: &HandLandmarks, cfg: &InterpreterConfig) -> Self {
        let centroid = hand.palm_centroid();

        let mut extended = [false; 5];
        for finger in Finger::ALL {
            extended[finger.slot()] = is_finger_extended(hand, finger, cfg.extension_ratio);
        }
        let open_fingers = extended.iter().filter(|&&e| e).count();

        HandObservation {
            centroid,
            extended,
            open_fingers,
            is_open:       open_fingers >= cfg.open_min_fingers,
            is_closed:     open_fingers <= cfg.closed_max_fingers,
            finger_spread: open_fingers as f32 / 5.0,
            display:       (-(centroid.x * 2.0 - 1.0), -(centroid.y * 2.0 - 1.0)),
        }
    }

    pub fn is_extended(&self, finger: Finger) -> bool {
        self.extended[finger.slot()]
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
