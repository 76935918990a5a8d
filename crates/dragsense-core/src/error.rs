//! Error types for dragsense-core.

use thiserror::Error;

/// Failures reported by a shell automation provider.
///
/// These are expected under normal shell activity (navigation in progress,
/// a window closing) and are never surfaced from a detection; the resolver
/// turns them into a [`crate::DetectionOutcome`] reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomationError {
    #[error("automation root unavailable: {0}")]
    RootUnavailable(String),
    #[error("surface enumeration failed: {0}")]
    Enumeration(String),
    #[error("surface {index} unavailable: {reason}")]
    SurfaceUnavailable { index: usize, reason: String },
    #[error("window id query failed: {0}")]
    WindowId(String),
    #[error("desktop surface lookup failed: {0}")]
    DesktopLookup(String),
    #[error("active document unavailable: {0}")]
    Document(String),
    #[error("folder view unavailable: {0}")]
    FolderView(String),
    #[error("selected items unavailable: {0}")]
    SelectedItems(String),
    #[error("selected item {index} unavailable: {reason}")]
    Item { index: usize, reason: String },
}

/// Result type for automation calls.
pub type AutomationResult<T> = Result<T, AutomationError>;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Engine startup errors. Detection itself never fails; only starting the
/// engine does.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("automation apartment initialization failed: {0}")]
    Apartment(String),
    #[error("orchestration context failed to start: {0}")]
    Orchestration(String),
    #[error("orchestration context is gone")]
    Disconnected,
}

/// Result type for engine startup.
pub type EngineResult<T> = Result<T, EngineError>;
