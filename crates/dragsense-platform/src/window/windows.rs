//! Windows implementation of the window tree using Win32.

use dragsense_core::{Point, WindowId, WindowTree};
use std::ffi::OsString;
use std::os::windows::ffi::OsStringExt;
use windows_sys::Win32::Foundation::{HWND, POINT};
use windows_sys::Win32::UI::WindowsAndMessaging::{
    GetClassNameW, GetCursorPos, GetParent, WindowFromPoint,
};

/// Longest class name Win32 allows.
const MAX_CLASS_NAME: usize = 256;

/// Live view of the desktop window hierarchy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32WindowTree;

impl WindowTree for Win32WindowTree {
    fn window_at(&self, point: Point) -> Option<WindowId> {
        let hwnd = unsafe { WindowFromPoint(POINT { x: point.x, y: point.y }) };
        if hwnd.is_null() {
            return None;
        }
        Some(WindowId(hwnd as usize))
    }

    fn parent(&self, window: WindowId) -> Option<WindowId> {
        let parent = unsafe { GetParent(window.0 as HWND) };
        if parent.is_null() {
            return None;
        }
        Some(WindowId(parent as usize))
    }

    fn class_name(&self, window: WindowId) -> Option<String> {
        let mut buf: Vec<u16> = vec![0; MAX_CLASS_NAME];
        let len = unsafe { GetClassNameW(window.0 as HWND, buf.as_mut_ptr(), buf.len() as i32) };
        if len <= 0 {
            return None;
        }
        buf.truncate(len as usize);
        Some(OsString::from_wide(&buf).to_string_lossy().into_owned())
    }

    fn cursor_position(&self) -> Option<Point> {
        let mut pt = POINT { x: 0, y: 0 };
        if unsafe { GetCursorPos(&mut pt) } == 0 {
            return None;
        }
        Some(Point::new(pt.x, pt.y))
    }
}
