//! Application configuration, loaded from TOML.
//!
//! Every section is optional; missing keys take their defaults.
//!
//! ```toml
//! tracking_enabled = true
//! source           = "demo"
//! dwell_ms         = 80
//! navigation       = "edge"
//!
//! [interpreter]
//! close_below  = 0.25
//!
//! [smoothing]
//! scale = 0.1
//!
//! [particles]
//! count = 4000
//!
//! [ambient]
//! spin = 0.05
//! ```

use std::path::Path;
use std::time::Duration;

use hand_gesture::{InterpreterConfig, TriggerMode};
use serde::Deserialize;
use sphere_motion::{AmbientConfig, DecayRates, ParticleConfig};
use tracing::info;

use crate::error::Result;

/// Where landmarks come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Poses driven from the window's keyboard.
    #[default]
    Keyboard,
    /// A looping scripted tour of every gesture.
    Demo,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Start with hand tracking on.  Off by default: the camera is opt-in.
    pub tracking_enabled: bool,
    pub source:           SourceKind,
    pub log_level:        String,
    /// Minimum hold before a changed gesture or intent is reported.
    /// Zero reports every frame as classified.
    pub dwell_ms:         u64,
    /// How long the tracking worker waits for a detection per poll.
    pub poll_ms:          u64,
    pub navigation:       TriggerMode,
    pub interpreter:      InterpreterConfig,
    pub smoothing:        DecayRates,
    pub particles:        ParticleConfig,
    /// The sphere shown while tracking is off.
    pub ambient:          AmbientConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            tracking_enabled: false,
            source:           SourceKind::Keyboard,
            log_level:        "info".to_string(),
            dwell_ms:         0,
            poll_ms:          33,
            navigation:       TriggerMode::Edge,
            interpreter:      InterpreterConfig::default(),
            smoothing:        DecayRates::default(),
            particles:        ParticleConfig::default(),
            ambient:          AmbientConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let cfg = Self::from_toml(&text)?;
        info!("loaded config from {}", path.display());
        Ok(cfg)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn dwell(&self) -> Duration {
        Duration::from_millis(self.dwell_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_ms.max(1))
    }
}
