//! Window classification: find the file-browsing surface owning a window.

use crate::config::SurfaceClasses;
use crate::gesture::Point;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Upper bound on ancestor hops.
const MAX_ANCESTOR_DEPTH: usize = 256;

/// Opaque OS window identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowId(pub usize);

/// Read-only queries against the OS window hierarchy.
pub trait WindowTree {
    /// Top-level or child window under a screen point.
    fn window_at(&self, point: Point) -> Option<WindowId>;

    /// Parent of `window`, or `None` at the root.
    fn parent(&self, window: WindowId) -> Option<WindowId>;

    /// Window class name of `window`.
    fn class_name(&self, window: WindowId) -> Option<String>;

    /// Live cursor position, if the platform can report it.
    fn cursor_position(&self) -> Option<Point> {
        None
    }
}

/// Kind of file-browsing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceKind {
    ExplorerWindow,
    Desktop,
}

/// A classified file-browsing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceHandle {
    pub window: WindowId,
    pub kind: SurfaceKind,
}

/// Walk from `window` (inclusive) up through its ancestors and return the
/// nearest one whose class is a known explorer or desktop class.
pub fn classify_surface<T: WindowTree + ?Sized>(
    tree: &T,
    classes: &SurfaceClasses,
    window: WindowId,
) -> Option<SurfaceHandle> {
    let mut current = Some(window);
    let mut depth = 0;

    while let Some(hwnd) = current {
        if depth == MAX_ANCESTOR_DEPTH {
            trace!(?window, "ancestor chain too deep, giving up");
            return None;
        }
        depth += 1;

        if let Some(class) = tree.class_name(hwnd) {
            trace!(?hwnd, %class, "inspecting ancestor");
            if let Some(kind) = classes.kind_of(&class) {
                return Some(SurfaceHandle { window: hwnd, kind });
            }
        }
        current = tree.parent(hwnd);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::FakeWindowTree;

    #[test]
    fn test_explorer_ancestor() {
        let tree = FakeWindowTree::new()
            .window(1, "CabinetWClass", None)
            .window(2, "ShellTabWindowClass", Some(1))
            .window(3, "DirectUIHWND", Some(2));
        let handle = classify_surface(&tree, &SurfaceClasses::default(), WindowId(3));
        assert_eq!(
            handle,
            Some(SurfaceHandle { window: WindowId(1), kind: SurfaceKind::ExplorerWindow })
        );
    }

    #[test]
    fn test_start_window_is_inclusive() {
        let tree = FakeWindowTree::new().window(9, "Progman", None);
        let handle = classify_surface(&tree, &SurfaceClasses::default(), WindowId(9));
        assert_eq!(
            handle,
            Some(SurfaceHandle { window: WindowId(9), kind: SurfaceKind::Desktop })
        );
    }

    #[test]
    fn test_nearest_match_wins() {
        // Explorer hosted under a desktop-class ancestor: stop at the explorer.
        let tree = FakeWindowTree::new()
            .window(1, "WorkerW", None)
            .window(2, "CabinetWClass", Some(1))
            .window(3, "SysListView32", Some(2));
        let handle = classify_surface(&tree, &SurfaceClasses::default(), WindowId(3));
        assert_eq!(handle.map(|h| h.kind), Some(SurfaceKind::ExplorerWindow));
        assert_eq!(handle.map(|h| h.window), Some(WindowId(2)));
    }

    #[test]
    fn test_no_match_reaches_root() {
        let tree = FakeWindowTree::new()
            .window(1, "Chrome_WidgetWin_1", None)
            .window(2, "Chrome_RenderWidgetHostHWND", Some(1));
        assert_eq!(classify_surface(&tree, &SurfaceClasses::default(), WindowId(2)), None);
    }

    #[test]
    fn test_class_match_is_exact() {
        let tree = FakeWindowTree::new().window(1, "cabinetwclass", None);
        assert_eq!(classify_surface(&tree, &SurfaceClasses::default(), WindowId(1)), None);
    }

    #[test]
    fn test_cycle_terminates() {
        let tree = FakeWindowTree::new()
            .window(1, "A", Some(2))
            .window(2, "B", Some(1));
        assert_eq!(classify_surface(&tree, &SurfaceClasses::default(), WindowId(1)), None);
    }
}
