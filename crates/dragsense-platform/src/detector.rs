//! Assembles a running detector from the platform adapters.

use crate::error::{PlatformError, PlatformResult};
use crate::metrics::system_drag_threshold;
use crate::pointer_hook::{start_pointer_hook, PointerHookHandle, PointerSink};
use crate::shell::ShellAutomation;
use crate::window::NativeWindowTree;
use dragsense_core::{
    DetectionOrchestrator, DetectionOutcome, DetectionReport, DetectorConfig, DragThreshold,
    EngineError, EngineResult, InputDriver, OrchestrationWorker, OrchestratorHandle, Point,
    PointerButton, PointerEvent, ReportObserver, WindowTree,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Orchestrator over the native window tree and shell automation.
pub type NativeOrchestrator = DetectionOrchestrator<NativeWindowTree, ShellAutomation>;

/// Build an orchestrator for `config`.
///
/// The shell provider enters a COM apartment on the calling thread; the
/// orchestrator must be used and dropped on that thread.
pub fn native_orchestrator(config: &DetectorConfig) -> PlatformResult<NativeOrchestrator> {
    Ok(DetectionOrchestrator::new(
        NativeWindowTree::default(),
        ShellAutomation::new()?,
        Arc::new(config.extension_policy()),
        config.surfaces.clone(),
    ))
}

/// A running detector: pointer hook plus orchestration thread.
pub struct DetectorHandle {
    hook: PointerHookHandle,
    worker: OrchestratorHandle,
    threshold: DragThreshold,
}

impl DetectorHandle {
    /// Effective drag threshold.
    pub fn threshold(&self) -> DragThreshold {
        self.threshold
    }

    /// Next report, if one is ready.
    pub fn try_recv(&self) -> Option<DetectionReport> {
        self.worker.try_recv()
    }

    /// Wait up to `timeout` for the next report.
    pub fn recv_timeout(&self, timeout: Duration) -> EngineResult<Option<DetectionReport>> {
        self.worker.recv_timeout(timeout)
    }

    /// All reports currently queued.
    pub fn drain(&self) -> Vec<DetectionReport> {
        self.worker.drain()
    }

    /// Whether both threads are still alive.
    pub fn is_running(&self) -> bool {
        self.hook.is_running() && self.worker.is_running()
    }

    /// Stop the hook first so no new requests arrive, then the worker.
    pub fn stop(&self) {
        self.hook.stop();
        self.worker.stop();
    }
}

/// Start the hook and orchestration thread for `config`.
///
/// `observer` runs on the orchestration thread after every detection.
pub fn start_detector(
    config: &DetectorConfig,
    observer: Option<ReportObserver>,
) -> PlatformResult<DetectorHandle> {
    start_detector_with(config, observer, start_pointer_hook)
}

fn start_detector_with<H>(
    config: &DetectorConfig,
    observer: Option<ReportObserver>,
    install_hook: H,
) -> PlatformResult<DetectorHandle>
where
    H: FnOnce(PointerButton, PointerSink) -> PlatformResult<PointerHookHandle>,
{
    let threshold = config.drag_threshold(system_drag_threshold());
    let policy = config.extension_policy();
    if policy.is_empty() {
        warn!("No eligible extensions configured; every detection will be negative");
    }
    let factory_config = config.clone();

    let worker = OrchestrationWorker::spawn(
        config.queue_capacity(),
        move || {
            native_orchestrator(&factory_config).map_err(|e| match e {
                PlatformError::Engine(inner) => inner,
                other => EngineError::Apartment(other.to_string()),
            })
        },
        observer,
    )?;

    let mut driver = InputDriver::new(threshold, worker.requester());
    let sink: PointerSink = Box::new(move |event: PointerEvent| {
        driver.handle(&event);
    });

    let hook = match install_hook(config.button, sink) {
        Ok(hook) => hook,
        Err(e) => {
            worker.shutdown();
            return Err(e);
        }
    };

    info!(
        ?threshold,
        button = ?config.button,
        extensions = ?policy.sorted(),
        "Detector started"
    );
    Ok(DetectorHandle {
        hook,
        worker,
        threshold,
    })
}

/// Is an eligible file selected on the surface under `point`?
///
/// Runs on the calling thread inside its own apartment scope with the
/// default configuration. Any failure yields `false`.
pub fn detect_dragged_eligible_file(point: Point) -> bool {
    detect_with_config(point, &DetectorConfig::default()).is_eligible()
}

/// Same as [`detect_dragged_eligible_file`] at the current cursor position.
pub fn detect_at_cursor() -> bool {
    match NativeWindowTree::default().cursor_position() {
        Some(point) => detect_dragged_eligible_file(point),
        None => false,
    }
}

/// One detection at `point` with `config`, reporting the reason.
pub fn detect_with_config(point: Point, config: &DetectorConfig) -> DetectionOutcome {
    match native_orchestrator(config) {
        Ok(orchestrator) => orchestrator.detect_at(point),
        Err(e) => DetectionOutcome::AutomationUnavailable {
            detail: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{bounded, TryRecvError};

    #[test]
    fn test_hook_failure_shuts_down_worker() {
        // The observer lives on the orchestration thread; its sender
        // disconnects once that thread has exited.
        let (alive_tx, alive_rx) = bounded::<()>(1);
        let observer: ReportObserver = Box::new(move |_: &DetectionReport| {
            let _ = alive_tx.try_send(());
        });

        let result = start_detector_with(&DetectorConfig::default(), Some(observer), |_, _| {
            Err(PlatformError::HookInstall("rejected".into()))
        });

        assert!(matches!(result, Err(PlatformError::HookInstall(_))));
        assert_eq!(alive_rx.try_recv(), Err(TryRecvError::Disconnected));
    }

    #[cfg(not(windows))]
    #[test]
    fn test_detection_without_window_tree_is_not_eligible() {
        assert_eq!(
            detect_with_config(Point::new(10, 10), &DetectorConfig::default()),
            DetectionOutcome::NoWindowAtPoint
        );
        assert!(!detect_dragged_eligible_file(Point::new(10, 10)));
        assert!(!detect_at_cursor());
    }

    #[cfg(not(windows))]
    #[test]
    fn test_native_orchestrator_uses_config_policy() {
        let config = DetectorConfig {
            extensions: vec!["md".into()],
            ..DetectorConfig::default()
        };
        let orchestrator = native_orchestrator(&config).unwrap();
        assert!(orchestrator.policy().is_eligible("notes.MD"));
        assert!(!orchestrator.policy().is_eligible("notes.txt"));
    }
}
