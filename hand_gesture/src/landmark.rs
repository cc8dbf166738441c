//! Landmark points and the fixed 21-point hand layout produced by the
//! detector.

use crate::error::LandmarkError;

// ════════════════════════════════════════════════════════════════════════════
// Anatomical indices
// ════════════════════════════════════════════════════════════════════════════

pub const WRIST:      usize = 0;
pub const THUMB_CMC:  usize = 1;
pub const THUMB_MCP:  usize = 2;
pub const THUMB_IP:   usize = 3;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_MCP:  usize = 5;
pub const INDEX_PIP:  usize = 6;
pub const INDEX_DIP:  usize = 7;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP:   usize = 13;
pub const RING_PIP:   usize = 14;
pub const RING_DIP:   usize = 15;
pub const RING_TIP:   usize = 16;
pub const PINKY_MCP:  usize = 17;
pub const PINKY_PIP:  usize = 18;
pub const PINKY_DIP:  usize = 19;
pub const PINKY_TIP:  usize = 20;

/// Points per detected hand.
pub const LANDMARK_COUNT: usize = 21;

/// Wrist plus the four finger-base knuckles; their mean is the palm centroid.
pub const PALM_LANDMARKS: [usize; 5] = [WRIST, INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];

/// Skeleton bones, for drawing a detected hand.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC),  (THUMB_CMC, THUMB_MCP),   (THUMB_MCP, THUMB_IP),   (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP),  (INDEX_MCP, INDEX_PIP),   (INDEX_PIP, INDEX_DIP),  (INDEX_DIP, INDEX_TIP),
    (INDEX_MCP, MIDDLE_MCP), (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    (MIDDLE_MCP, RING_MCP),  (RING_MCP, RING_PIP),     (RING_PIP, RING_DIP),     (RING_DIP, RING_TIP),
    (RING_MCP, PINKY_MCP),   (WRIST, PINKY_MCP),       (PINKY_MCP, PINKY_PIP),   (PINKY_PIP, PINKY_DIP),
    (PINKY_DIP, PINKY_TIP),
];

// ════════════════════════════════════════════════════════════════════════════
// LandmarkPoint
// ════════════════════════════════════════════════════════════════════════════

/// A single keypoint in normalized image space (`0.0..=1.0` on both axes,
/// y pointing down).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LandmarkPoint {
    pub x: f32,
    pub y: f32,
}

impl LandmarkPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        LandmarkPoint { x, y }
    }

    /// Euclidean distance in image space.
    pub fn distance(&self, other: &LandmarkPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Mean of a non-empty set of points.
    pub fn mean<I>(points: I) -> Option<LandmarkPoint>
    where
        I: IntoIterator<Item = LandmarkPoint>,
    {
        let (mut sx, mut sy, mut n) = (0.0f32, 0.0f32, 0usize);
        for p in points {
            sx += p.x;
            sy += p.y;
            n  += 1;
        }
        (n > 0).then(|| LandmarkPoint::new(sx / n as f32, sy / n as f32))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandLandmarks
// ════════════════════════════════════════════════════════════════════════════

/// The 21 landmarks of one detected hand, validated.
///
/// Construction is the only place detector output is checked: anything that
/// holds a `HandLandmarks` may index all 21 points and assume finite values.
/// Points slightly outside `[0, 1]` are kept, since detectors overshoot at
/// the frame edges.
#[derive(Clone, Debug, PartialEq)]
pub struct HandLandmarks {
    points: [LandmarkPoint; LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn from_points(points: &[LandmarkPoint]) -> Result<Self, LandmarkError> {
        let points: [LandmarkPoint; LANDMARK_COUNT] =
            points.try_into().map_err(|_| LandmarkError::WrongPointCount {
                expected: LANDMARK_COUNT,
                found:    points.len(),
            })?;

        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(LandmarkError::NonFinite { index });
        }
        Ok(HandLandmarks { points })
    }

    pub fn point(&self, index: usize) -> LandmarkPoint {
        self.points[index]
    }

    pub fn points(&self) -> &[LandmarkPoint; LANDMARK_COUNT] {
        &self.points
    }

    pub fn wrist(&self) -> LandmarkPoint {
        self.points[WRIST]
    }

    /// Mean of the wrist and the four knuckles.
    pub fn palm_centroid(&self) -> LandmarkPoint {
        let n = PALM_LANDMARKS.len() as f32;
        let (sx, sy) = PALM_LANDMARKS
            .iter()
            .map(|&i| self.points[i])
            .fold((0.0f32, 0.0f32), |(sx, sy), p| (sx + p.x, sy + p.y));
        LandmarkPoint::new(sx / n, sy / n)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
