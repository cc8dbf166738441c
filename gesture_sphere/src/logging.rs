//! Console logging.

use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use crate::error::{AppError, Result};

/// Install the global subscriber.
///
/// `level` is the default (`"info"`, `"debug"`, ...); an unparseable level
/// falls back to `info`.  `RUST_LOG` takes precedence when set.
pub fn init(level: &str) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(parse_level(level).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}

fn parse_level(level: &str) -> LevelFilter {
    level.parse().unwrap_or(LevelFilter::INFO)
}
