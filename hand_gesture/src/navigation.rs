//! Turning per-frame navigation intents into scroll commands.
//!
//! A held pose produces the same intent on every frame.  [`NavigationTrigger`]
//! decides which of those frames actually issue a command.

use serde::Deserialize;
use tracing::debug;

use crate::frame::{GestureFrame, NavigationIntent};

/// The page-side collaborator that performs the scroll.
pub trait NavigationEffect {
    fn navigate(&mut self, intent: NavigationIntent);
}

/// When a held navigation pose fires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    /// Once per transition into a pose.
    #[default]
    Edge,
    /// On every frame the pose is held.
    Level,
}

#[derive(Clone, Debug)]
pub struct NavigationTrigger {
    mode: TriggerMode,
    last: NavigationIntent,
}

impl NavigationTrigger {
    pub fn new(mode: TriggerMode) -> Self {
        NavigationTrigger { mode, last: NavigationIntent::None }
    }

    pub fn mode(&self) -> TriggerMode {
        self.mode
    }

    /// Feed the latest frame; returns the intent to act on, if any.
    ///
    /// Frames that are not one-hand frames count as `None`, so dropping the
    /// hand and raising it again re-arms an edge trigger.
    pub fn update(&mut self, frame: &GestureFrame) -> Option<NavigationIntent> {
        let intent = if frame.one_hand_active {
            frame.navigation
        } else {
            NavigationIntent::None
        };

        let fire = !intent.is_none()
            && match self.mode {
                TriggerMode::Edge  => intent != self.last,
                TriggerMode::Level => true,
            };

        if intent != self.last {
            debug!("navigation intent {} -> {}", self.last.as_str(), intent.as_str());
        }
        self.last = intent;
        fire.then_some(intent)
    }

    /// Feed a frame and forward any resulting command to `effect`.
    pub fn dispatch<E: NavigationEffect + ?Sized>(
        &mut self,
        frame:  &GestureFrame,
        effect: &mut E,
    ) -> Option<NavigationIntent> {
        let fired = self.update(frame);
        if let Some(intent) = fired {
            effect.navigate(intent);
        }
        fired
    }

    pub fn reset(&mut self) {
        self.last = NavigationIntent::None;
    }
}

impl Default for NavigationTrigger {
    fn default() -> Self {
        NavigationTrigger::new(TriggerMode::Edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_hand(intent: NavigationIntent) -> GestureFrame {
        GestureFrame {
            hand_count:      1,
            detected:        true,
            one_hand_active: true,
            navigation:      intent,
            ..GestureFrame::idle()
        }
    }

    #[derive(Default)]
    struct Recorder(Vec<NavigationIntent>);

    impl NavigationEffect for Recorder {
        fn navigate(&mut self, intent: NavigationIntent) {
            self.0.push(intent);
        }
    }

    #[test]
    fn edge_fires_once_per_hold() {
        let mut t = NavigationTrigger::new(TriggerMode::Edge);
        let mut rec = Recorder::default();
        for _ in 0..5 {
            t.dispatch(&one_hand(NavigationIntent::Skills), &mut rec);
        }
        assert_eq!(rec.0, vec![NavigationIntent::Skills]);
    }

    #[test]
    fn edge_fires_on_each_new_pose() {
        let mut t = NavigationTrigger::default();
        assert_eq!(t.update(&one_hand(NavigationIntent::Projects)), Some(NavigationIntent::Projects));
        assert_eq!(t.update(&one_hand(NavigationIntent::Contact)),  Some(NavigationIntent::Contact));
        assert_eq!(t.update(&one_hand(NavigationIntent::Contact)),  None);
    }

    #[test]
    fn edge_rearms_after_hand_leaves() {
        let mut t = NavigationTrigger::default();
        assert!(t.update(&one_hand(NavigationIntent::Home)).is_some());
        assert!(t.update(&GestureFrame::idle()).is_none());
        assert!(t.update(&one_hand(NavigationIntent::Home)).is_some());
    }

    #[test]
    fn edge_rearms_after_unmapped_pose() {
        let mut t = NavigationTrigger::default();
        assert!(t.update(&one_hand(NavigationIntent::Home)).is_some());
        assert!(t.update(&one_hand(NavigationIntent::None)).is_none());
        assert!(t.update(&one_hand(NavigationIntent::Home)).is_some());
    }

    #[test]
    fn level_repeats_while_held() {
        let mut t = NavigationTrigger::new(TriggerMode::Level);
        let mut rec = Recorder::default();
        for _ in 0..3 {
            t.dispatch(&one_hand(NavigationIntent::Projects), &mut rec);
        }
        assert_eq!(rec.0.len(), 3);
    }

    #[test]
    fn two_hand_frames_never_navigate() {
        let mut t = NavigationTrigger::new(TriggerMode::Level);
        let frame = GestureFrame {
            hand_count:      2,
            detected:        true,
            two_hand_active: true,
            navigation:      NavigationIntent::Home,
            ..GestureFrame::idle()
        };
        assert_eq!(t.update(&frame), None);
    }
}
