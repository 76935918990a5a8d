//! dragsense-platform: platform-specific I/O boundary for dragsense.
//!
//! This crate provides:
//! - Global pointer hook feeding the gesture state machine (native
//!   `WH_MOUSE_LL` on Windows, `rdev` elsewhere)
//! - Window hierarchy queries for surface classification
//! - Shell automation over COM for reading a surface's selection
//! - System drag metrics
//! - Wiring that assembles a running detector
//!
//! ## Module Structure
//!
//! - `error` - Common error types
//! - `pointer_hook` - Global pointer hook
//! - `window` - Window hierarchy queries
//! - `shell` - Shell automation provider and COM apartment scope
//! - `metrics` - System drag threshold
//! - `detector` - Detector assembly and the synchronous predicate

mod detector;
mod error;
mod metrics;
mod pointer_hook;
mod shell;
mod window;

// Re-export error types
pub use error::{PlatformError, PlatformResult};

// Re-export pointer hook
pub use pointer_hook::{start_pointer_hook, PointerHookHandle, PointerSink};

// Re-export window tree
pub use window::{NativeWindowTree, NullWindowTree};

// Re-export shell automation
#[cfg(windows)]
pub use shell::ComApartment;
pub use shell::ShellAutomation;

pub use metrics::system_drag_threshold;

// Re-export detector wiring
pub use detector::{
    detect_at_cursor, detect_dragged_eligible_file, detect_with_config, native_orchestrator,
    start_detector, DetectorHandle, NativeOrchestrator,
};
