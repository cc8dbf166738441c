//! The interpreter's per-frame output.

use crate::hand::HandObservation;

// ════════════════════════════════════════════════════════════════════════════
// Gesture
// ════════════════════════════════════════════════════════════════════════════

/// Two-hand gesture classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gesture {
    /// No two-hand gesture is active.
    Idle,
    /// Both hands closed.
    Fist,
    /// Hands near each other.
    Close,
    /// Hands far apart.
    Spread,
    /// Hands at a middling distance.
    Approach,
}

impl Gesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gesture::Idle     => "idle",
            Gesture::Fist     => "fist",
            Gesture::Close    => "close",
            Gesture::Spread   => "spread",
            Gesture::Approach => "approach",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// NavigationIntent
// ════════════════════════════════════════════════════════════════════════════

/// Page section requested by a one-hand finger pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavigationIntent {
    Home,
    Projects,
    Skills,
    Contact,
    None,
}

impl NavigationIntent {
    /// Anchor of the target section.  `Home` scrolls to the top of the page
    /// and has no anchor.
    pub fn section_id(&self) -> Option<&'static str> {
        match self {
            NavigationIntent::Projects => Some("projects"),
            NavigationIntent::Skills   => Some("skills"),
            NavigationIntent::Contact  => Some("contact"),
            NavigationIntent::Home | NavigationIntent::None => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, NavigationIntent::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationIntent::Home     => "home",
            NavigationIntent::Projects => "projects",
            NavigationIntent::Skills   => "skills",
            NavigationIntent::Contact  => "contact",
            NavigationIntent::None     => "none",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureFrame
// ════════════════════════════════════════════════════════════════════════════

/// Finite-difference velocity of the mean hand centroid, normalized units
/// per second.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

/// One frame's classification of hand state.
///
/// Every field always holds a defined value.  Two-hand fields are only
/// meaningful when `two_hand_active`, the navigation intent only when
/// `one_hand_active`; otherwise they hold the idle defaults of
/// [`GestureFrame::idle`].
#[derive(Clone, Debug, PartialEq)]
pub struct GestureFrame {
    pub hand_count:      usize,
    pub detected:        bool,
    pub two_hand_active: bool,
    pub one_hand_active: bool,

    // ── two-hand ─────────────────────────────────────────────────────────
    pub gesture:             Gesture,
    pub normalized_distance: f32,
    /// Raw distance between the two palm centroids.
    pub hands_distance:      f32,
    pub rotation_y:          f32,
    pub rotation_x:          f32,
    pub avg_finger_spread:   f32,
    pub both_closed:         bool,

    // ── one-hand ─────────────────────────────────────────────────────────
    pub navigation: NavigationIntent,

    pub centroid_velocity: Velocity,
    pub hands:             Vec<HandObservation>,
}

impl GestureFrame {
    pub fn idle() -> Self {
        GestureFrame {
            hand_count:          0,
            detected:            false,
            two_hand_active:     false,
            one_hand_active:     false,
            gesture:             Gesture::Idle,
            normalized_distance: 0.5,
            hands_distance:      0.5,
            rotation_y:          0.0,
            rotation_x:          0.0,
            avg_finger_spread:   0.5,
            both_closed:         false,
            navigation:          NavigationIntent::None,
            centroid_velocity:   Velocity::default(),
            hands:               Vec::new(),
        }
    }

    pub fn is_idle(&self) -> bool {
        !self.detected
    }
}

impl Default for GestureFrame {
    fn default() -> Self {
        GestureFrame::idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_defaults() {
        let f = GestureFrame::idle();
        assert!(f.is_idle());
        assert_eq!(f.gesture, Gesture::Idle);
        assert_eq!(f.normalized_distance, 0.5);
        assert_eq!(f.rotation_x, 0.0);
        assert_eq!(f.rotation_y, 0.0);
        assert_eq!(f.navigation, NavigationIntent::None);
    }

    #[test]
    fn section_ids() {
        assert_eq!(NavigationIntent::Home.section_id(), None);
        assert_eq!(NavigationIntent::Skills.section_id(), Some("skills"));
        assert!(NavigationIntent::None.is_none());
    }
}
