//! Tracking session: owns the landmark source and the worker thread that
//! turns detections into gesture frames.
//!
//! # Lifecycle
//!
//! ```text
//!            start() ok                     stop() / drop
//!  Stopped ───────────────▶ Running ────────────────────────▶ Stopped
//!     ▲  │                                                     (source
//!     │  │ start() err: logged once, released, parked, stays   released)
//!     └──┘ Stopped
//! ```
//!
//! `start` and `stop` are idempotent.  Between them the source is moved onto
//! the worker thread and handed back when the worker is joined.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use hand_gesture::{
    validate_hands, GestureFrame, GestureInterpreter, GestureStabilizer, HandLandmarks,
    InterpreterConfig,
};
use tracing::{debug, error, info, warn};

use crate::error::{AppError, Result};
use crate::source::LandmarkSource;

// ════════════════════════════════════════════════════════════════════════════
// TrackedFrame
// ════════════════════════════════════════════════════════════════════════════

/// One interpreted detection plus the landmarks it came from, for the
/// skeleton overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackedFrame {
    pub gesture: GestureFrame,
    pub hands:   Vec<HandLandmarks>,
}

impl TrackedFrame {
    pub fn idle() -> Self {
        TrackedFrame { gesture: GestureFrame::idle(), hands: Vec::new() }
    }
}

impl Default for TrackedFrame {
    fn default() -> Self {
        TrackedFrame::idle()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SessionConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub interpreter:   InterpreterConfig,
    pub dwell:         Duration,
    /// Upper bound on one `poll`, and so on how long `stop` waits.
    pub poll_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            interpreter:   InterpreterConfig::default(),
            dwell:         Duration::ZERO,
            poll_interval: Duration::from_millis(33),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Acquired — releases the source even if the worker unwinds
// ════════════════════════════════════════════════════════════════════════════

struct Acquired(Option<Box<dyn LandmarkSource>>);

impl Acquired {
    fn source(&mut self) -> Option<&mut (dyn LandmarkSource + 'static)> {
        self.0.as_deref_mut()
    }

    fn release(mut self) -> Option<Box<dyn LandmarkSource>> {
        let mut source = self.0.take()?;
        source.release();
        Some(source)
    }
}

impl Drop for Acquired {
    fn drop(&mut self) {
        if let Some(source) = self.0.as_mut() {
            warn!("releasing {} during unwind", source.name());
            source.release();
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// TrackingSession
// ════════════════════════════════════════════════════════════════════════════

struct Worker {
    stop:   Arc<AtomicBool>,
    handle: JoinHandle<Option<Box<dyn LandmarkSource>>>,
    frames: Receiver<TrackedFrame>,
}

pub struct TrackingSession {
    /// Parked here while stopped; `None` while the worker holds it.
    source: Option<Box<dyn LandmarkSource>>,
    worker: Option<Worker>,
    config: SessionConfig,
}

impl TrackingSession {
    pub fn new(source: Box<dyn LandmarkSource>, config: SessionConfig) -> Self {
        TrackingSession { source: Some(source), worker: None, config }
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Acquire the source and start interpreting.  A no-op while running.
    ///
    /// On acquisition failure the error is logged, anything partially opened
    /// is released, and the session stays stopped.  There is no automatic
    /// retry.
    pub fn start(&mut self) -> Result<()> {
        if self.worker.is_some() {
            return Ok(());
        }
        let mut source = self.source.take().ok_or(AppError::SourceLost)?;

        if let Err(e) = source.acquire() {
            error!("{} failed to start: {}", source.name(), e);
            source.release();
            self.source = Some(source);
            return Err(e.into());
        }
        info!("hand tracking started ({})", source.name());

        let stop = Arc::new(AtomicBool::new(false));
        let (tx, frames) = mpsc::channel();
        let config = self.config.clone();
        let flag = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("hand-tracking".into())
            .spawn(move || track(Acquired(Some(source)), config, flag, tx))?;

        self.worker = Some(Worker { stop, handle, frames });
        Ok(())
    }

    /// Stop the worker and release the source.  A no-op while stopped.
    /// Returns once the worker has exited, within about one poll interval.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else { return };
        worker.stop.store(true, Ordering::SeqCst);
        match worker.handle.join() {
            Ok(Some(source)) => {
                info!("hand tracking stopped ({})", source.name());
                self.source = Some(source);
            }
            Ok(None) => warn!("tracking worker returned without its source"),
            Err(_) => error!("tracking worker panicked; landmark source lost"),
        }
    }

    /// Newest frame produced since the last call, if any.
    pub fn latest(&mut self) -> Option<TrackedFrame> {
        let worker = self.worker.as_ref()?;
        let mut newest = None;
        loop {
            match worker.frames.try_recv() {
                Ok(frame) => newest = Some(frame),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!("tracking worker has exited");
                    break;
                }
            }
        }
        newest
    }
}

impl Drop for TrackingSession {
    fn drop(&mut self) {
        self.stop();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Worker loop
// ════════════════════════════════════════════════════════════════════════════

fn track(
    mut acquired: Acquired,
    config:       SessionConfig,
    stop:         Arc<AtomicBool>,
    tx:           Sender<TrackedFrame>,
) -> Option<Box<dyn LandmarkSource>> {
    let mut interpreter = GestureInterpreter::new(config.interpreter);
    let mut stabilizer  = GestureStabilizer::new(config.dwell);

    while !stop.load(Ordering::SeqCst) {
        let Some(source) = acquired.source() else { break };
        let Some(detection) = source.poll(config.poll_interval) else { continue };
        if stop.load(Ordering::SeqCst) {
            break;
        }

        // A malformed detection is dropped; the previous frame stays current.
        let hands = match validate_hands(&detection.hands) {
            Ok(hands) => hands,
            Err(e) => {
                debug!("dropping detection: {}", e);
                continue;
            }
        };

        let frame = interpreter.interpret_hands(&hands, detection.at);
        let gesture = stabilizer.stabilize(frame, detection.at);
        if tx.send(TrackedFrame { gesture, hands }).is_err() {
            break;
        }
    }

    acquired.release()
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use hand_gesture::{synth, Gesture, LandmarkPoint};

    use crate::error::AcquisitionError;
    use crate::source::{ScriptedSource, SourceProbe};

    fn fast() -> SessionConfig {
        SessionConfig { poll_interval: Duration::from_millis(2), ..SessionConfig::default() }
    }

    fn fists() -> Vec<Vec<LandmarkPoint>> {
        vec![
            synth::fist(LandmarkPoint::new(0.3, 0.5)),
            synth::fist(LandmarkPoint::new(0.7, 0.5)),
        ]
    }

    fn session(script: ScriptedSource) -> (TrackingSession, SourceProbe) {
        let probe = script.probe();
        (TrackingSession::new(Box::new(script), fast()), probe)
    }

    /// Poll `latest` until a frame arrives or a second passes.
    fn wait_for_frame(s: &mut TrackingSession) -> Option<TrackedFrame> {
        let deadline = Instant::now() + Duration::from_secs(1);
        while Instant::now() < deadline {
            if let Some(f) = s.latest() {
                return Some(f);
            }
            thread::sleep(Duration::from_millis(1));
        }
        None
    }

    #[test]
    fn frames_flow_while_running() {
        let (mut s, probe) = session(ScriptedSource::new(vec![fists()]).looping());
        s.start().unwrap();
        assert!(s.is_running());
        assert!(probe.is_held());

        let f = wait_for_frame(&mut s).expect("no frame");
        assert_eq!(f.gesture.gesture, Gesture::Fist);
        assert_eq!(f.hands.len(), 2);

        s.stop();
        assert!(!s.is_running());
        assert!(!probe.is_held());
        assert!(s.latest().is_none());
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let (mut s, probe) = session(ScriptedSource::new(vec![fists()]).looping());
        s.start().unwrap();
        s.start().unwrap();
        assert_eq!(probe.acquired(), 1);

        s.stop();
        s.stop();
        assert_eq!(probe.released(), 1);

        s.start().unwrap();
        s.stop();
        assert_eq!(probe.acquired(), 2);
        assert_eq!(probe.released(), 2);
    }

    #[test]
    fn acquisition_failure_leaves_session_stopped() {
        let script = ScriptedSource::new(vec![fists()]).refusing(AcquisitionError::PermissionDenied);
        let (mut s, probe) = session(script);

        let err = s.start().unwrap_err();
        assert!(matches!(err, AppError::Acquisition(AcquisitionError::PermissionDenied)));
        assert!(!s.is_running());
        assert!(!probe.is_held());
        assert_eq!(probe.polled(), 0);

        // Source is still parked, so a manual retry reaches it again.
        assert!(matches!(s.start(), Err(AppError::Acquisition(_))));
    }

    #[test]
    fn drop_releases_the_source() {
        let (mut s, probe) = session(ScriptedSource::new(vec![fists()]).looping());
        s.start().unwrap();
        drop(s);
        assert_eq!(probe.released(), 1);
        assert!(!probe.is_held());
    }

    #[test]
    fn malformed_detections_are_dropped() {
        let broken = vec![vec![LandmarkPoint::new(0.5, 0.5); 3]];
        let nan = {
            let mut h = synth::open_hand(LandmarkPoint::new(0.5, 0.5));
            h[4].x = f32::NAN;
            vec![h]
        };
        let (mut s, _probe) = session(ScriptedSource::new(vec![fists(), broken, nan]));
        s.start().unwrap();

        thread::sleep(Duration::from_millis(50));
        let f = s.latest().expect("no frame");
        assert_eq!(f.gesture.gesture, Gesture::Fist);
        assert!(s.latest().is_none());
    }

    #[test]
    fn latest_keeps_only_the_newest() {
        let one = vec![synth::open_hand(LandmarkPoint::new(0.5, 0.5))];
        let (mut s, _probe) = session(ScriptedSource::new(vec![fists(), fists(), one]));
        s.start().unwrap();

        thread::sleep(Duration::from_millis(50));
        let f = s.latest().expect("no frame");
        assert_eq!(f.gesture.hand_count, 1);
        assert!(f.gesture.one_hand_active);
    }
}
