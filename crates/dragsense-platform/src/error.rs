//! Common error types for dragsense-platform.

use dragsense_core::EngineError;
use thiserror::Error;

/// Platform-level errors.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("pointer hook installation failed: {0}")]
    HookInstall(String),
    #[error("COM initialization failed: {0}")]
    ComInit(String),
    #[error("failed to spawn thread: {0}")]
    Thread(String),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Result type for platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;
