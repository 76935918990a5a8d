//! System drag metrics.
//!
//! Platform implementations:
//! - Windows: `GetSystemMetrics(SM_CXDRAG / SM_CYDRAG)`
//! - Other platforms: 4 px on both axes

use dragsense_core::DragThreshold;

/// Drag threshold configured in the OS.
#[cfg(windows)]
pub fn system_drag_threshold() -> DragThreshold {
    use windows_sys::Win32::UI::WindowsAndMessaging::{GetSystemMetrics, SM_CXDRAG, SM_CYDRAG};

    let fallback = DragThreshold::default();
    let (x, y) = unsafe { (GetSystemMetrics(SM_CXDRAG), GetSystemMetrics(SM_CYDRAG)) };
    // GetSystemMetrics reports failure as 0
    DragThreshold {
        x: u32::try_from(x).ok().filter(|v| *v > 0).unwrap_or(fallback.x),
        y: u32::try_from(y).ok().filter(|v| *v > 0).unwrap_or(fallback.y),
    }
}

/// Drag threshold configured in the OS.
#[cfg(not(windows))]
pub fn system_drag_threshold() -> DragThreshold {
    DragThreshold::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_threshold_is_positive() {
        let threshold = system_drag_threshold();
        assert!(threshold.x > 0);
        assert!(threshold.y > 0);
    }
}
