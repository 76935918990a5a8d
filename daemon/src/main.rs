//! dragsense: headless host for the drag detector.

mod cli;
mod logging;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use dragsense_core::{
    config_file_path, get_config_dir, load_config_from, DetectorConfig, Point, WindowTree,
};
use dragsense_platform::{detect_with_config, start_detector, NativeWindowTree};
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{info, warn};

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("dragsense: error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let command = cli.command();

    // An explicit --config must load; the default location falls back.
    let path = cli.config.clone().unwrap_or_else(config_file_path);
    let (config, load_error) = match load_config_from(&path) {
        Ok(config) => (config, None),
        Err(e) if cli.config.is_some() => {
            return Err(e).with_context(|| format!("failed to load config {:?}", path));
        }
        Err(e) => (DetectorConfig::default(), Some(e)),
    };

    let log_dir = match &command {
        Commands::Watch { log_dir: Some(dir), .. } => Some(dir.clone()),
        Commands::Watch { .. } if config.logging.file => Some(get_config_dir().join("logs")),
        _ => None,
    };
    let _log_guard = logging::setup(&config.logging.level, log_dir.as_deref());
    if let Some(e) = load_error {
        warn!(?path, "Failed to load config: {}, using defaults", e);
    }

    match command {
        Commands::Watch { json, .. } => watch(&config, json),
        Commands::Check { x, y, json } => check(&config, x.zip(y), json),
        Commands::Config { path: show_path } => print_config(&config, &path, show_path),
    }
}

fn watch(config: &DetectorConfig, json: bool) -> Result<ExitCode> {
    let detector = start_detector(config, None).context("failed to start detector")?;
    info!(threshold = ?detector.threshold(), "Watching drags");

    loop {
        match detector.recv_timeout(Duration::from_millis(250)) {
            Ok(Some(report)) => {
                if json {
                    println!("{}", serde_json::to_string(&report)?);
                } else {
                    println!("{}", output::format_report(&report));
                }
            }
            Ok(None) => {
                if !detector.is_running() {
                    detector.stop();
                    anyhow::bail!("detector stopped unexpectedly");
                }
            }
            Err(e) => return Err(e).context("detector disconnected"),
        }
    }
}

fn check(config: &DetectorConfig, point: Option<(i32, i32)>, json: bool) -> Result<ExitCode> {
    let point = match point {
        Some((x, y)) => Point::new(x, y),
        None => NativeWindowTree::default()
            .cursor_position()
            .context("cursor position unavailable; pass --x and --y")?,
    };

    let outcome = detect_with_config(point, config);
    let eligible = outcome.is_eligible();
    if json {
        let result = output::CheckResult {
            point,
            eligible,
            outcome: &outcome,
        };
        println!("{}", serde_json::to_string(&result)?);
    } else {
        println!("({}, {}) {}", point.x, point.y, output::describe(&outcome));
    }

    Ok(if eligible {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn print_config(config: &DetectorConfig, path: &Path, show_path: bool) -> Result<ExitCode> {
    if show_path {
        println!("{}", path.display());
    } else {
        print!("{}", serde_yaml::to_string(config).context("failed to serialize config")?);
    }
    Ok(ExitCode::SUCCESS)
}
