//! gesture_sphere — interactive entry point.

use std::path::Path;

use anyhow::Context;
use gesture_sphere::app::run;
use gesture_sphere::config::{AppConfig, SourceKind};
use gesture_sphere::logging;

const DEFAULT_CONFIG: &str = "gesture_sphere.toml";

const USAGE: &str = "\
usage: gesture_sphere [--config <path>] [--demo] [--track] [--quick]

  --config <path>  load settings from a TOML file
  --demo           play the scripted gesture tour instead of keyboard hands
  --track          start with hand tracking on
  --quick          ignore ./gesture_sphere.toml and use defaults";

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if has_flag(&args, "--help") || has_flag(&args, "-h") {
        println!("{}", USAGE);
        return Ok(());
    }

    let mut cfg = load_config(&args)?;
    if has_flag(&args, "--demo")  { cfg.source = SourceKind::Demo; }
    if has_flag(&args, "--track") { cfg.tracking_enabled = true; }

    logging::init(&cfg.log_level)?;

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          Gesture Sphere — hand-driven particle field         ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    match cfg.source {
        SourceKind::Keyboard => println!("  Source: keyboard simulation  (use --demo for the scripted tour)"),
        SourceKind::Demo     => println!("  Source: scripted demo"),
    }
    println!("  Tracking: {}  (press G to toggle)", if cfg.tracking_enabled { "on" } else { "off" });
    println!();
    println!("  Opening visualizer window…");
    println!();

    run(cfg).context("visualizer exited with an error")
}

fn load_config(args: &[String]) -> anyhow::Result<AppConfig> {
    if let Some(path) = flag_value(args, "--config") {
        return AppConfig::load(path).with_context(|| format!("failed to load config {}", path));
    }
    if has_flag(args, "--quick") || !Path::new(DEFAULT_CONFIG).exists() {
        return Ok(AppConfig::default());
    }
    AppConfig::load(DEFAULT_CONFIG).with_context(|| format!("failed to load {}", DEFAULT_CONFIG))
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}
