//! Landmark sources: where per-frame hand detections come from.
//!
//! The tracking session only sees [`LandmarkSource`]; it does not care
//! whether detections come from a camera pipeline, the keyboard simulator or
//! a script.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use hand_gesture::{synth, LandmarkPoint};
use tracing::{debug, info};

use crate::error::AcquisitionError;

// ════════════════════════════════════════════════════════════════════════════
// Detection
// ════════════════════════════════════════════════════════════════════════════

/// One frame of detector output: up to two hands of 21 points each, in
/// normalized image coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub hands: Vec<Vec<LandmarkPoint>>,
    pub at:    Instant,
}

impl Detection {
    pub fn new(hands: Vec<Vec<LandmarkPoint>>) -> Self {
        Detection { hands, at: Instant::now() }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait — unified interface for camera, sim and script
// ════════════════════════════════════════════════════════════════════════════

/// A camera-plus-detector pipeline, driven from the tracking worker thread.
pub trait LandmarkSource: Send + 'static {
    fn name(&self) -> &str;

    /// Open the underlying device.
    fn acquire(&mut self) -> Result<(), AcquisitionError>;

    /// Wait up to roughly `timeout` for the next detection.
    fn poll(&mut self, timeout: Duration) -> Option<Detection>;

    /// Release whatever `acquire` opened, including after a failed
    /// `acquire`.  Must be harmless when nothing is held.
    fn release(&mut self);
}

// ════════════════════════════════════════════════════════════════════════════
// SimLandmarkSource — keyboard simulation
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    Pose(SimPose),
    /// Move the simulated hands by a fraction of the image.
    Nudge { dx: f32, dy: f32 },
    /// Widen (positive) or narrow the gap between two hands.
    Separation(f32),
}

/// Which hands the simulator shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimPose {
    NoHands,
    /// One hand, thumb..pinky extension flags.
    OneHand([bool; 5]),
    TwoHands { closed: bool },
}

const SIM_MIN_GAP: f32 = 0.0;
const SIM_MAX_GAP: f32 = 0.8;

/// Simulated hands, positioned in image space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimHands {
    pub pose:   SimPose,
    pub center: LandmarkPoint,
    pub gap:    f32,
}

impl Default for SimHands {
    fn default() -> Self {
        SimHands {
            pose:   SimPose::NoHands,
            center: LandmarkPoint::new(0.5, 0.5),
            gap:    0.25,
        }
    }
}

impl SimHands {
    pub fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::Pose(pose) => self.pose = pose,
            SimInput::Nudge { dx, dy } => {
                self.center.x = (self.center.x + dx).clamp(0.0, 1.0);
                self.center.y = (self.center.y + dy).clamp(0.0, 1.0);
            }
            SimInput::Separation(d) => {
                self.gap = (self.gap + d).clamp(SIM_MIN_GAP, SIM_MAX_GAP);
            }
        }
    }

    pub fn landmarks(&self) -> Vec<Vec<LandmarkPoint>> {
        let c = self.center;
        match self.pose {
            SimPose::NoHands => Vec::new(),
            SimPose::OneHand(fingers) => vec![synth::hand(c, fingers)],
            SimPose::TwoHands { closed } => {
                let fingers = [!closed; 5];
                let half = self.gap / 2.0;
                vec![
                    synth::hand(LandmarkPoint::new(c.x - half, c.y), fingers),
                    synth::hand(LandmarkPoint::new(c.x + half, c.y), fingers),
                ]
            }
        }
    }
}

/// Landmark source driven by [`SimInput`] events from the visualizer's
/// window.  Emits the current simulated hands once per poll, like a camera
/// that never stops producing frames.
pub struct SimLandmarkSource {
    rx:    Receiver<SimInput>,
    hands: SimHands,
    open:  bool,
}

impl SimLandmarkSource {
    pub fn new(rx: Receiver<SimInput>) -> Self {
        SimLandmarkSource { rx, hands: SimHands::default(), open: false }
    }

    pub fn hands(&self) -> &SimHands {
        &self.hands
    }
}

impl LandmarkSource for SimLandmarkSource {
    fn name(&self) -> &str {
        "keyboard simulator"
    }

    fn acquire(&mut self) -> Result<(), AcquisitionError> {
        self.open = true;
        info!("simulated camera opened");
        Ok(())
    }

    fn poll(&mut self, timeout: Duration) -> Option<Detection> {
        match self.rx.recv_timeout(timeout) {
            Ok(input) => self.hands.apply(input),
            Err(RecvTimeoutError::Timeout) => {}
            // Window gone: keep the last pose, just pace the frames.
            Err(RecvTimeoutError::Disconnected) => thread::sleep(timeout),
        }
        while let Ok(input) = self.rx.try_recv() {
            self.hands.apply(input);
        }
        self.open.then(|| Detection::new(self.hands.landmarks()))
    }

    fn release(&mut self) {
        if std::mem::take(&mut self.open) {
            info!("simulated camera released");
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ScriptedSource — canned detections for the demo and tests
// ════════════════════════════════════════════════════════════════════════════

/// Shared acquire/release counters, readable after the source has moved
/// onto the worker thread.
#[derive(Clone, Debug, Default)]
pub struct SourceProbe {
    acquired: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
    polled:   Arc<AtomicUsize>,
}

impl SourceProbe {
    pub fn acquired(&self) -> usize { self.acquired.load(Ordering::SeqCst) }
    pub fn released(&self) -> usize { self.released.load(Ordering::SeqCst) }
    pub fn polled(&self)   -> usize { self.polled.load(Ordering::SeqCst) }

    /// True while an acquisition is outstanding.
    pub fn is_held(&self) -> bool {
        self.acquired() > self.released()
    }
}

/// Plays a fixed list of detections, one per `interval`.
pub struct ScriptedSource {
    steps:    Vec<Vec<Vec<LandmarkPoint>>>,
    cursor:   usize,
    interval: Duration,
    looping:  bool,
    refuse:   Option<AcquisitionError>,
    probe:    SourceProbe,
}

impl ScriptedSource {
    pub fn new(steps: Vec<Vec<Vec<LandmarkPoint>>>) -> Self {
        ScriptedSource {
            steps,
            cursor:   0,
            interval: Duration::from_millis(1),
            looping:  false,
            refuse:   None,
            probe:    SourceProbe::default(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }

    /// Make every `acquire` fail with `err`.
    pub fn refusing(mut self, err: AcquisitionError) -> Self {
        self.refuse = Some(err);
        self
    }

    pub fn probe(&self) -> SourceProbe {
        self.probe.clone()
    }

    /// A looping tour of every gesture at roughly camera rate.
    pub fn demo() -> Self {
        ScriptedSource::new(demo_tour())
            .with_interval(Duration::from_millis(33))
            .looping()
    }

    fn next_step(&mut self) -> Option<Vec<Vec<LandmarkPoint>>> {
        if self.steps.is_empty() {
            return None;
        }
        if self.cursor >= self.steps.len() {
            if !self.looping {
                return None;
            }
            self.cursor = 0;
        }
        let step = self.steps[self.cursor].clone();
        self.cursor += 1;
        Some(step)
    }
}

impl LandmarkSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted source"
    }

    fn acquire(&mut self) -> Result<(), AcquisitionError> {
        if let Some(err) = &self.refuse {
            return Err(err.clone());
        }
        self.probe.acquired.fetch_add(1, Ordering::SeqCst);
        debug!("scripted source acquired ({} steps)", self.steps.len());
        Ok(())
    }

    fn poll(&mut self, timeout: Duration) -> Option<Detection> {
        self.probe.polled.fetch_add(1, Ordering::SeqCst);
        match self.next_step() {
            Some(hands) => {
                thread::sleep(self.interval.min(timeout));
                Some(Detection::new(hands))
            }
            None => {
                thread::sleep(timeout);
                None
            }
        }
    }

    fn release(&mut self) {
        if !self.probe.is_held() {
            return;
        }
        self.probe.released.fetch_add(1, Ordering::SeqCst);
        debug!("scripted source released");
    }
}

/// Frames for [`ScriptedSource::demo`]: idle, a two-hand orbit, hands
/// closing from spread to close, fists, then the four navigation poses.
fn demo_tour() -> Vec<Vec<Vec<LandmarkPoint>>> {
    let mut steps = Vec::new();
    let pair = |c: LandmarkPoint, gap: f32, fingers: [bool; 5]| {
        vec![
            synth::hand(LandmarkPoint::new(c.x - gap / 2.0, c.y), fingers),
            synth::hand(LandmarkPoint::new(c.x + gap / 2.0, c.y), fingers),
        ]
    };

    steps.extend(std::iter::repeat(Vec::new()).take(45));

    for i in 0..120 {
        let a = i as f32 / 120.0 * std::f32::consts::TAU;
        let c = LandmarkPoint::new(0.5 + 0.15 * a.cos(), 0.5 + 0.15 * a.sin());
        steps.push(pair(c, 0.45, [true; 5]));
    }

    let center = LandmarkPoint::new(0.5, 0.5);
    for i in 0..90 {
        let gap = 0.45 - 0.4 * i as f32 / 89.0;
        steps.push(pair(center, gap, [true; 5]));
    }
    steps.extend(std::iter::repeat(pair(center, 0.3, [false; 5])).take(60));

    for fingers in [
        [false, true,  false, false, false],
        [false, true,  true,  false, false],
        [false, true,  true,  true,  false],
        [false; 5],
    ] {
        steps.extend(std::iter::repeat(vec![synth::hand(center, fingers)]).take(45));
        steps.extend(std::iter::repeat(Vec::new()).take(15));
    }
    steps
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
