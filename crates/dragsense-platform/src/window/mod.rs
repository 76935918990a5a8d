//! OS window hierarchy queries used to classify the surface under the cursor.
//!
//! Platform implementations:
//! - Windows: Uses Win32 API (`windows.rs`)
//! - Other platforms: No window tree; every lookup misses

use dragsense_core::{Point, WindowId, WindowTree};

#[cfg(windows)]
mod windows;

#[cfg(windows)]
pub use self::windows::Win32WindowTree as NativeWindowTree;

#[cfg(not(windows))]
pub use self::NullWindowTree as NativeWindowTree;

/// Window tree for platforms without a queryable hierarchy.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullWindowTree;

impl WindowTree for NullWindowTree {
    fn window_at(&self, _point: Point) -> Option<WindowId> {
        None
    }

    fn parent(&self, _window: WindowId) -> Option<WindowId> {
        None
    }

    fn class_name(&self, _window: WindowId) -> Option<String> {
        None
    }
}
