//! Detection orchestrator: screen point -> surface -> selection -> outcome.

use crate::config::SurfaceClasses;
use crate::extension::ExtensionPolicy;
use crate::gesture::Point;
use crate::selection::{resolve_eligible_selection, AutomationProvider};
use crate::surface::{classify_surface, SurfaceHandle, WindowId, WindowTree};
use serde::{Deserialize, Serialize};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Why a detection produced its boolean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DetectionOutcome {
    /// No window under the point.
    NoWindowAtPoint,
    /// The window's ancestors contain no explorer or desktop class.
    NotAFileSurface { window: WindowId },
    /// The automation root or its enumeration is unavailable right now.
    AutomationUnavailable { detail: String },
    /// No automation surface corresponds to the classified window.
    SurfaceNotFound { surface: SurfaceHandle },
    /// Document, folder view or selected items could not be obtained.
    SelectionUnavailable { detail: String },
    EmptySelection,
    NoEligibleItem { inspected: usize },
    Eligible { path: String, inspected: usize },
    /// The automation provider panicked mid-resolution.
    ProviderPanicked,
}

impl DetectionOutcome {
    pub fn is_eligible(&self) -> bool {
        matches!(self, DetectionOutcome::Eligible { .. })
    }
}

/// Runs detections. Must live on the context that owns the automation
/// interface; it is the only component that calls into it.
pub struct DetectionOrchestrator<W, P> {
    tree: W,
    provider: P,
    policy: Arc<ExtensionPolicy>,
    classes: SurfaceClasses,
}

impl<W: WindowTree, P: AutomationProvider> DetectionOrchestrator<W, P> {
    pub fn new(tree: W, provider: P, policy: Arc<ExtensionPolicy>, classes: SurfaceClasses) -> Self {
        Self {
            tree,
            provider,
            policy,
            classes,
        }
    }

    pub fn policy(&self) -> &ExtensionPolicy {
        &self.policy
    }

    /// Synchronous predicate: is an eligible file selected on the surface
    /// under `point`?
    pub fn detect(&self, point: Point) -> bool {
        self.detect_at(point).is_eligible()
    }

    /// Handle a hand-off from the input context. The live cursor position
    /// is preferred; `last_known` is used only when it cannot be read.
    pub fn on_drag_detection_requested(&self, last_known: Point) -> DetectionOutcome {
        let point = self.tree.cursor_position().unwrap_or(last_known);
        self.detect_at(point)
    }

    /// Run one detection at `point`, never failing.
    pub fn detect_at(&self, point: Point) -> DetectionOutcome {
        let outcome = match catch_unwind(AssertUnwindSafe(|| self.resolve(point))) {
            Ok(outcome) => outcome,
            Err(_) => {
                error!(?point, "Automation provider panicked during detection");
                DetectionOutcome::ProviderPanicked
            }
        };

        if let DetectionOutcome::Eligible { path, .. } = &outcome {
            info!(?point, %path, "Dragging an eligible file");
        } else {
            debug!(?point, ?outcome, "No eligible file");
        }
        outcome
    }

    fn resolve(&self, point: Point) -> DetectionOutcome {
        let Some(window) = self.tree.window_at(point) else {
            return DetectionOutcome::NoWindowAtPoint;
        };
        let Some(surface) = classify_surface(&self.tree, &self.classes, window) else {
            return DetectionOutcome::NotAFileSurface { window };
        };
        debug!(?surface, "Resolved file surface");
        resolve_eligible_selection(&self.provider, &self.policy, surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{FakeProvider, FakeSurface, FakeWindowTree};
    use crate::gesture::{DragThreshold, GestureStateMachine, PointerEvent};
    use crate::selection::SelectionItem;

    fn explorer_tree() -> FakeWindowTree {
        FakeWindowTree::new()
            .window(10, "CabinetWClass", None)
            .window(11, "DirectUIHWND", Some(10))
            .at(Point::new(110, 100), 11)
    }

    fn orchestrator(
        tree: FakeWindowTree,
        provider: FakeProvider,
        extensions: &[&str],
    ) -> DetectionOrchestrator<FakeWindowTree, FakeProvider> {
        DetectionOrchestrator::new(
            tree,
            provider,
            Arc::new(ExtensionPolicy::new(extensions)),
            SurfaceClasses::default(),
        )
    }

    #[test]
    fn test_drag_to_detection_end_to_end() {
        let mut machine = GestureStateMachine::new(DragThreshold::uniform(3));
        let provider = FakeProvider::new()
            .with_surface(FakeSurface::new(10).with_items(vec![SelectionItem::file(r"C:\docs\a.md")]));
        let detector = orchestrator(explorer_tree(), provider, &[".md"]);

        let mut results = Vec::new();
        for event in [
            PointerEvent::button_down(100, 100),
            PointerEvent::moved(101, 100),
            PointerEvent::moved(110, 100),
        ] {
            if let Some(point) = machine.process(&event).detect_at {
                results.push(detector.on_drag_detection_requested(point));
            }
        }

        assert_eq!(results.len(), 1);
        assert!(results[0].is_eligible());
    }

    #[test]
    fn test_unclassified_window_makes_no_automation_call() {
        let tree = FakeWindowTree::new()
            .window(1, "Chrome_WidgetWin_1", None)
            .window(2, "Chrome_RenderWidgetHostHWND", Some(1))
            .at(Point::new(5, 5), 2);
        let provider = FakeProvider::new()
            .with_surface(FakeSurface::new(1).with_items(vec![SelectionItem::file("a.md")]));
        let log = provider.log();
        let detector = orchestrator(tree, provider, &[".md"]);

        assert!(!detector.detect(Point::new(5, 5)));
        assert_eq!(
            detector.detect_at(Point::new(5, 5)),
            DetectionOutcome::NotAFileSurface { window: WindowId(2) }
        );
        assert_eq!(log.total(), 0);
    }

    #[test]
    fn test_no_window_at_point() {
        let provider = FakeProvider::new();
        let log = provider.log();
        let detector = orchestrator(FakeWindowTree::new(), provider, &[".md"]);
        assert_eq!(detector.detect_at(Point::new(1, 1)), DetectionOutcome::NoWindowAtPoint);
        assert_eq!(log.total(), 0);
    }

    #[test]
    fn test_live_cursor_preferred() {
        let tree = explorer_tree().cursor(Point::new(110, 100));
        let provider = FakeProvider::new()
            .with_surface(FakeSurface::new(10).with_items(vec![SelectionItem::file("a.md")]));
        let detector = orchestrator(tree, provider, &[".md"]);
        // The captured position points nowhere; the live cursor is over explorer.
        assert!(detector.on_drag_detection_requested(Point::new(-1, -1)).is_eligible());
    }

    #[test]
    fn test_provider_panic_is_contained() {
        let provider = FakeProvider::new().panicking();
        let detector = orchestrator(explorer_tree(), provider, &[".md"]);
        assert_eq!(
            detector.detect_at(Point::new(110, 100)),
            DetectionOutcome::ProviderPanicked
        );
        assert!(!detector.detect(Point::new(110, 100)));
    }

    #[test]
    fn test_desktop_surface() {
        let tree = FakeWindowTree::new()
            .window(1, "Progman", None)
            .window(2, "SHELLDLL_DefView", Some(1))
            .window(3, "SysListView32", Some(2))
            .at(Point::new(40, 40), 3);
        let provider = FakeProvider::new()
            .with_desktop(FakeSurface::new(0).with_items(vec![SelectionItem::file("todo.txt")]));
        let detector = orchestrator(tree, provider, &[".txt"]);
        assert!(detector.detect(Point::new(40, 40)));
    }

    #[test]
    fn test_outcome_serializes_with_reason_tag() {
        let json = serde_yaml::to_string(&DetectionOutcome::NoEligibleItem { inspected: 3 }).unwrap();
        assert!(json.contains("reason: no_eligible_item"));
        assert!(json.contains("inspected: 3"));
    }
}
