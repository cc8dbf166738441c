//! Top-level application state machine.
//!
//! `AppState` owns the `TrackingSession`, the latest tracked frame, the
//! `MotionSmoother`, the `ParticleField` and the navigation trigger.  While
//! tracking is off it shows the `AmbientSphere` instead.  The run loop ticks
//! it once per rendered frame and hands the result to the visualizer.

use std::sync::mpsc;
use std::time::Instant;

use hand_gesture::{NavigationEffect, NavigationIntent, NavigationTrigger};
use sphere_motion::{
    AmbientSphere, MotionMode, MotionSmoother, ParticleField, VisualParams, VisualState,
};
use tracing::info;

use crate::config::{AppConfig, SourceKind};
use crate::error::Result;
use crate::session::{SessionConfig, TrackedFrame, TrackingSession};
use crate::source::{LandmarkSource, ScriptedSource, SimInput, SimLandmarkSource};
use crate::visualizer::{Visualizer, WindowCommand};

// ════════════════════════════════════════════════════════════════════════════
// PageScroller
// ════════════════════════════════════════════════════════════════════════════

/// The page the section bar stands for.  Records which section is in view.
#[derive(Clone, Debug)]
pub struct PageScroller {
    section: NavigationIntent,
    scrolls: usize,
}

impl PageScroller {
    pub fn new() -> Self {
        PageScroller { section: NavigationIntent::Home, scrolls: 0 }
    }

    pub fn section(&self) -> NavigationIntent { self.section }
    pub fn scrolls(&self) -> usize            { self.scrolls }
}

impl Default for PageScroller {
    fn default() -> Self {
        PageScroller::new()
    }
}

impl NavigationEffect for PageScroller {
    fn navigate(&mut self, intent: NavigationIntent) {
        match intent.section_id() {
            Some(id) => info!("scrolling to #{}", id),
            None     => info!("scrolling to top"),
        }
        self.section  = intent;
        self.scrolls += 1;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    // ── tracking ─────────────────────────────────────────────────────────
    session:  TrackingSession,
    tracking: bool,
    latest:   TrackedFrame,

    // ── sphere ───────────────────────────────────────────────────────────
    smoother:  MotionSmoother,
    particles: ParticleField,
    ambient:   AmbientSphere,
    params:    VisualParams,

    // ── navigation ───────────────────────────────────────────────────────
    trigger:  NavigationTrigger,
    scroller: PageScroller,

    // ── status message ───────────────────────────────────────────────────
    pub status: String,
}

impl AppState {
    pub fn new(cfg: &AppConfig, source: Box<dyn LandmarkSource>) -> Self {
        let session_cfg = SessionConfig {
            interpreter:   cfg.interpreter.clone(),
            dwell:         cfg.dwell(),
            poll_interval: cfg.poll_interval(),
        };

        AppState {
            session:   TrackingSession::new(source, session_cfg),
            tracking:  false,
            latest:    TrackedFrame::idle(),
            smoother:  MotionSmoother::new(cfg.smoothing.clone()),
            particles: ParticleField::new(cfg.particles.clone()),
            ambient:   AmbientSphere::new(cfg.ambient.clone()),
            params:    VisualParams::NEUTRAL,
            trigger:   NavigationTrigger::new(cfg.navigation),
            scroller:  PageScroller::new(),
            status:    "Tracking off - press G to start".to_string(),
        }
    }

    // ── tracking toggle ──────────────────────────────────────────────────

    /// Turn tracking on or off.  Returns whether tracking is now on.
    ///
    /// Repeating the current state does nothing.  A failed start leaves
    /// tracking off and is not retried.
    pub fn set_tracking(&mut self, enabled: bool) -> bool {
        if enabled == self.tracking {
            return self.tracking;
        }

        if enabled {
            match self.session.start() {
                Ok(()) => {
                    self.tracking = true;
                    self.status   = "Tracking on".to_string();
                }
                Err(e) => {
                    self.go_idle();
                    self.status = format!("Tracking unavailable: {}", e);
                }
            }
        } else {
            self.session.stop();
            self.tracking = false;
            self.go_idle();
            self.status = "Tracking off".to_string();
        }
        self.tracking
    }

    pub fn toggle_tracking(&mut self) -> bool {
        self.set_tracking(!self.tracking)
    }

    /// Forget every trace of tracked hands.
    fn go_idle(&mut self) {
        self.latest = TrackedFrame::idle();
        self.smoother.reset();
        self.trigger.reset();
    }

    // ── per-frame tick ───────────────────────────────────────────────────

    /// Advance one render frame.  `elapsed` is seconds since start.
    ///
    /// The newest tracked frame, if any arrived, replaces the current one;
    /// otherwise the previous frame is re-applied.  With tracking off the
    /// ambient sphere is a function of `elapsed` alone.
    pub fn tick(&mut self, elapsed: f32) -> VisualParams {
        if !self.tracking {
            self.params = self.ambient.params(elapsed);
            return self.params;
        }

        if let Some(frame) = self.session.latest() {
            if let Some(intent) = self.trigger.dispatch(&frame.gesture, &mut self.scroller) {
                self.status = format!("Navigate: {}", intent.as_str());
            }
            self.latest = frame;
        }

        let params = self.smoother.tick(&self.latest.gesture, elapsed);
        self.particles.update(&params, elapsed, self.latest.gesture.two_hand_active);
        self.params = params;
        params
    }

    // ── accessors for the render loop ────────────────────────────────────

    pub fn is_tracking(&self) -> bool           { self.tracking }
    pub fn latest(&self) -> &TrackedFrame       { &self.latest }
    pub fn params(&self) -> VisualParams        { self.params }
    pub fn visual_state(&self) -> &VisualState  { self.smoother.state() }
    pub fn mode(&self) -> MotionMode            { self.smoother.mode() }

    /// The field on screen: the gesture sphere while tracking, the ambient
    /// one otherwise.
    pub fn particles(&self) -> &ParticleField {
        if self.tracking { &self.particles } else { self.ambient.field() }
    }
    pub fn scroller(&self) -> &PageScroller     { &self.scroller }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// This is the entry point called from `main.rs`.  It creates the visualizer
/// and the landmark source named by `cfg.source`, then drives the
/// input/tick/render loop at ~60 fps until the window closes.
pub fn run(cfg: AppConfig) -> Result<()> {
    // ── Sim input channel ─────────────────────────────────────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let source: Box<dyn LandmarkSource> = match cfg.source {
        SourceKind::Keyboard => Box::new(SimLandmarkSource::new(sim_rx)),
        SourceKind::Demo     => Box::new(ScriptedSource::demo()),
    };

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let mut vis = Visualizer::new(sim_tx)?;

    // ── App state ─────────────────────────────────────────────────────────
    let mut app = AppState::new(&cfg, source);
    if cfg.tracking_enabled {
        app.set_tracking(true);
    }

    // ── Main loop ─────────────────────────────────────────────────────────
    let clock = Instant::now();
    while vis.is_open() {
        for command in vis.poll_input() {
            match command {
                WindowCommand::Quit           => return Ok(()),
                WindowCommand::ToggleTracking => { app.toggle_tracking(); }
            }
        }

        app.tick(clock.elapsed().as_secs_f32());

        vis.render(
            app.particles(),
            &app.params(),
            app.latest(),
            app.scroller().section(),
            app.is_tracking(),
            &app.status,
        );
    }

    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
