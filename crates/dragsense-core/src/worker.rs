//! Execution contexts: the input-side driver and the orchestration thread.
//!
//! The input context runs [`InputDriver::handle`] synchronously for every
//! pointer event and must return quickly, so a detection signal is only
//! posted to a bounded channel. The orchestration thread owns the
//! automation interface for its whole lifetime and drains that channel in
//! FIFO order.

use crate::error::{EngineError, EngineResult};
use crate::gesture::{DragPhase, DragThreshold, GestureOutcome, GestureStateMachine, Point, PointerEvent};
use crate::orchestrator::{DetectionOrchestrator, DetectionOutcome};
use crate::selection::AutomationProvider;
use crate::surface::WindowTree;
use crossbeam_channel::{bounded, select, Receiver, RecvTimeoutError, Sender, TrySendError};
use serde::{Deserialize, Serialize};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// Hand-off signal from the input context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionRequest {
    /// Pointer position of the triggering event.
    pub position: Point,
    /// Input-source timestamp of the triggering event (ms).
    pub timestamp_ms: u64,
}

/// Result of one processed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionReport {
    pub request: DetectionRequest,
    pub eligible: bool,
    pub outcome: DetectionOutcome,
    /// Time spent resolving, in milliseconds.
    pub elapsed_ms: u64,
}

/// Callback fired on the orchestration thread after every detection.
pub type ReportObserver = Box<dyn FnMut(&DetectionReport) + Send>;

/// Owns the gesture state machine on the input side.
pub struct InputDriver {
    machine: GestureStateMachine,
    request_tx: Sender<DetectionRequest>,
}

impl InputDriver {
    pub fn new(threshold: DragThreshold, request_tx: Sender<DetectionRequest>) -> Self {
        Self {
            machine: GestureStateMachine::new(threshold),
            request_tx,
        }
    }

    pub fn phase(&self) -> DragPhase {
        self.machine.phase()
    }

    /// Feed one event. Never blocks: a detection signal is posted with
    /// `try_send` and dropped with a warning if the queue is full.
    pub fn handle(&mut self, event: &PointerEvent) -> GestureOutcome {
        let outcome = self.machine.process(event);
        if let Some(position) = outcome.detect_at {
            let request = DetectionRequest {
                position,
                timestamp_ms: event.timestamp_ms,
            };
            match self.request_tx.try_send(request) {
                Ok(()) => trace!(?position, "Detection requested"),
                Err(TrySendError::Full(_)) => {
                    warn!(?position, "Detection queue full, dropping request")
                }
                Err(TrySendError::Disconnected(_)) => {
                    warn!("Orchestration context gone, dropping request")
                }
            }
        }
        outcome
    }
}

/// Handle to the orchestration thread.
pub struct OrchestratorHandle {
    request_tx: Sender<DetectionRequest>,
    report_rx: Receiver<DetectionReport>,
    stop_tx: Sender<()>,
    thread: Option<JoinHandle<()>>,
}

impl OrchestratorHandle {
    /// Sender for the input context.
    pub fn requester(&self) -> Sender<DetectionRequest> {
        self.request_tx.clone()
    }

    /// Post a request directly (non-blocking).
    pub fn request(&self, position: Point) -> EngineResult<()> {
        match self.request_tx.try_send(DetectionRequest { position, timestamp_ms: 0 }) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                warn!(?position, "Detection queue full, dropping request");
                Ok(())
            }
            Err(TrySendError::Disconnected(_)) => Err(EngineError::Disconnected),
        }
    }

    /// Try to receive a report (non-blocking).
    pub fn try_recv(&self) -> Option<DetectionReport> {
        self.report_rx.try_recv().ok()
    }

    /// Wait up to `timeout` for a report.
    pub fn recv_timeout(&self, timeout: Duration) -> EngineResult<Option<DetectionReport>> {
        match self.report_rx.recv_timeout(timeout) {
            Ok(report) => Ok(Some(report)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(EngineError::Disconnected),
        }
    }

    /// Receive all pending reports.
    pub fn drain(&self) -> Vec<DetectionReport> {
        let mut reports = Vec::new();
        while let Ok(report) = self.report_rx.try_recv() {
            reports.push(report);
        }
        reports
    }

    /// Signal the thread to stop after the detection in progress.
    pub fn stop(&self) {
        let _ = self.stop_tx.try_send(());
    }

    /// Check if the orchestration thread is still running.
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().map_or(false, |t| !t.is_finished())
    }

    /// Stop and wait for the thread to finish.
    pub fn shutdown(mut self) {
        self.stop();
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for OrchestratorHandle {
    fn drop(&mut self) {
        self.stop();
        // Don't join: a hung automation call would block the dropper.
        let _ = self.thread.take();
    }
}

/// Spawns the orchestration context.
pub struct OrchestrationWorker;

impl OrchestrationWorker {
    /// Spawn the orchestration thread.
    ///
    /// `factory` runs on the new thread so apartment-bound automation
    /// objects are created where they are used; its error is returned here.
    /// The orchestrator (and whatever apartment its provider holds) is
    /// dropped when the thread exits.
    pub fn spawn<W, P, F>(
        capacity: usize,
        factory: F,
        mut observer: Option<ReportObserver>,
    ) -> EngineResult<OrchestratorHandle>
    where
        W: WindowTree + 'static,
        P: AutomationProvider + 'static,
        F: FnOnce() -> EngineResult<DetectionOrchestrator<W, P>> + Send + 'static,
    {
        let (request_tx, request_rx) = bounded::<DetectionRequest>(capacity.max(1));
        let (report_tx, report_rx) = bounded::<DetectionReport>(256);
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let (ready_tx, ready_rx) = bounded::<EngineResult<()>>(1);

        let thread = thread::Builder::new()
            .name("dragsense-orchestrator".into())
            .spawn(move || {
                let orchestrator = match factory() {
                    Ok(orchestrator) => {
                        let _ = ready_tx.send(Ok(()));
                        orchestrator
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                info!("Orchestration thread started");

                loop {
                    select! {
                        recv(stop_rx) -> _ => break,
                        recv(request_rx) -> msg => {
                            let Ok(request) = msg else { break };
                            let report = run_detection(&orchestrator, request);
                            if let Some(observer) = observer.as_mut() {
                                observer(&report);
                            }
                            if let Err(e) = report_tx.try_send(report) {
                                debug!("Report not queued: {}", e);
                            }
                        }
                    }
                }

                info!("Orchestration thread exiting");
            })
            .map_err(|e| EngineError::Orchestration(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(OrchestratorHandle {
                request_tx,
                report_rx,
                stop_tx,
                thread: Some(thread),
            }),
            Ok(Err(e)) => {
                let _ = thread.join();
                Err(e)
            }
            Err(_) => {
                let _ = thread.join();
                Err(EngineError::Orchestration(
                    "orchestration thread exited during startup".into(),
                ))
            }
        }
    }
}

fn run_detection<W: WindowTree, P: AutomationProvider>(
    orchestrator: &DetectionOrchestrator<W, P>,
    request: DetectionRequest,
) -> DetectionReport {
    let started = Instant::now();
    let outcome = orchestrator.on_drag_detection_requested(request.position);
    DetectionReport {
        request,
        eligible: outcome.is_eligible(),
        outcome,
        elapsed_ms: started.elapsed().as_millis() as u64,
    }
}
