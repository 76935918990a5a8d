//! Rendering of detection results for the terminal.

use dragsense_core::{DetectionOutcome, DetectionReport, Point};
use serde::Serialize;

/// One-shot `check` result.
#[derive(Debug, Serialize)]
pub struct CheckResult<'a> {
    pub point: Point,
    pub eligible: bool,
    pub outcome: &'a DetectionOutcome,
}

/// Short human-readable reason.
pub fn describe(outcome: &DetectionOutcome) -> String {
    match outcome {
        DetectionOutcome::NoWindowAtPoint => "no window at point".into(),
        DetectionOutcome::NotAFileSurface { window } => {
            format!("window {:#x} is not a file surface", window.0)
        }
        DetectionOutcome::AutomationUnavailable { detail } => {
            format!("automation unavailable: {}", detail)
        }
        DetectionOutcome::SurfaceNotFound { surface } => {
            format!("no automation surface for {:?} {:#x}", surface.kind, surface.window.0)
        }
        DetectionOutcome::SelectionUnavailable { detail } => {
            format!("selection unavailable: {}", detail)
        }
        DetectionOutcome::EmptySelection => "nothing selected".into(),
        DetectionOutcome::NoEligibleItem { inspected } => {
            format!("no eligible item among {} selected", inspected)
        }
        DetectionOutcome::Eligible { path, .. } => format!("eligible: {}", path),
        DetectionOutcome::ProviderPanicked => "automation provider panicked".into(),
    }
}

/// One line per watched detection.
pub fn format_report(report: &DetectionReport) -> String {
    let Point { x, y } = report.request.position;
    format!(
        "[{:>8}ms] ({}, {}) {} ({}ms)",
        report.request.timestamp_ms,
        x,
        y,
        describe(&report.outcome),
        report.elapsed_ms
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use dragsense_core::{DetectionRequest, SurfaceHandle, SurfaceKind, WindowId};

    #[test]
    fn test_format_eligible_report() {
        let report = DetectionReport {
            request: DetectionRequest {
                position: Point::new(110, -4),
                timestamp_ms: 1500,
            },
            eligible: true,
            outcome: DetectionOutcome::Eligible {
                path: r"C:\docs\a.md".into(),
                inspected: 1,
            },
            elapsed_ms: 12,
        };
        assert_eq!(
            format_report(&report),
            r"[    1500ms] (110, -4) eligible: C:\docs\a.md (12ms)"
        );
    }

    #[test]
    fn test_describe_surface_not_found() {
        let outcome = DetectionOutcome::SurfaceNotFound {
            surface: SurfaceHandle {
                window: WindowId(0x1f),
                kind: SurfaceKind::ExplorerWindow,
            },
        };
        assert_eq!(describe(&outcome), "no automation surface for ExplorerWindow 0x1f");
    }

    #[test]
    fn test_check_result_json() {
        let outcome = DetectionOutcome::EmptySelection;
        let json = serde_json::to_string(&CheckResult {
            point: Point::new(1, 2),
            eligible: false,
            outcome: &outcome,
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"point":{"x":1,"y":2},"eligible":false,"outcome":{"reason":"empty_selection"}}"#
        );
    }
}
