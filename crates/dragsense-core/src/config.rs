//! Detector configuration and its YAML storage.

use crate::error::ConfigError;
use crate::extension::{ExtensionPolicy, DEFAULT_EXTENSIONS};
use crate::gesture::DragThreshold;
use crate::surface::SurfaceKind;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Top-level detector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub threshold: ThresholdConfig,
    /// Allow-list of drag-eligible extensions (`.pdf`, `md`, ...).
    pub extensions: Vec<String>,
    pub surfaces: SurfaceClasses,
    /// Button whose press starts a drag session.
    pub button: PointerButton,
    /// Capacity of the input -> orchestration hand-off queue.
    pub queue_capacity: usize,
    pub logging: LoggingConfig,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            threshold: ThresholdConfig::default(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            surfaces: SurfaceClasses::default(),
            button: PointerButton::Left,
            queue_capacity: 16,
            logging: LoggingConfig::default(),
        }
    }
}

impl DetectorConfig {
    /// Build the immutable extension set for this configuration.
    pub fn extension_policy(&self) -> ExtensionPolicy {
        ExtensionPolicy::new(&self.extensions)
    }

    /// Resolve the drag threshold, filling unset axes from `system`.
    pub fn drag_threshold(&self, system: DragThreshold) -> DragThreshold {
        DragThreshold {
            x: self.threshold.x.unwrap_or(system.x),
            y: self.threshold.y.unwrap_or(system.y),
        }
    }

    /// Queue capacity, never zero.
    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity.max(1)
    }
}

/// Movement threshold overrides. Unset axes use the system drag metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub x: Option<u32>,
    pub y: Option<u32>,
}

/// Window class names identifying file-browsing surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceClasses {
    pub explorer_classes: Vec<String>,
    pub desktop_classes: Vec<String>,
}

impl Default for SurfaceClasses {
    fn default() -> Self {
        Self {
            explorer_classes: vec!["CabinetWClass".into()],
            desktop_classes: vec!["Progman".into(), "WorkerW".into()],
        }
    }
}

impl SurfaceClasses {
    /// Surface kind for an exact class-name match.
    pub fn kind_of(&self, class: &str) -> Option<SurfaceKind> {
        if self.explorer_classes.iter().any(|c| c == class) {
            Some(SurfaceKind::ExplorerWindow)
        } else if self.desktop_classes.iter().any(|c| c == class) {
            Some(SurfaceKind::Desktop)
        } else {
            None
        }
    }
}

/// Pointer buttons that can start a drag session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Logging options for the host binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also write a daily-rotating log file.
    pub file: bool,
    /// Default filter level when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: false,
            level: "info".into(),
        }
    }
}

/// Get the config directory for dragsense.
pub fn get_config_dir() -> PathBuf {
    let base = dirs_next::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("dragsense")
}

/// Default config file path.
pub fn config_file_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load a config file. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<DetectorConfig, ConfigError> {
    if !path.exists() {
        debug!(?path, "No config file, using defaults");
        return Ok(DetectorConfig::default());
    }
    let config = load_yaml(path)?;
    info!(?path, "Loaded config");
    Ok(config)
}

/// Load a config file, falling back to defaults on any error.
pub fn load_or_default(path: &Path) -> DetectorConfig {
    match load_config_from(path) {
        Ok(config) => config,
        Err(e) => {
            warn!(?path, "Failed to load config: {}, using defaults", e);
            DetectorConfig::default()
        }
    }
}

fn load_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}
