//! Global pointer hook feeding the gesture state machine.
//!
//! The sink runs synchronously on the hook thread for every relevant event
//! and must return quickly. Events are always forwarded to the next hook.
//!
//! Platform implementations:
//! - Windows: Uses native SetWindowsHookEx(WH_MOUSE_LL) API (`windows_native.rs`)
//! - Other platforms: Uses rdev crate (`rdev_impl.rs`)

use crate::error::{PlatformError, PlatformResult};
use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use dragsense_core::{PointerButton, PointerEvent};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::info;

#[cfg(windows)]
mod windows_native;

#[cfg(not(windows))]
mod rdev_impl;

/// Callback receiving pointer events on the hook thread.
pub type PointerSink = Box<dyn FnMut(PointerEvent) + Send>;

/// How long to wait for the hook thread to confirm installation. rdev never
/// confirms, so silence past this point counts as success there.
const STARTUP_GRACE: Duration = Duration::from_millis(500);

/// Handle to control the pointer hook.
pub struct PointerHookHandle {
    stop_tx: Sender<()>,
    thread: Option<JoinHandle<()>>,
}

impl PointerHookHandle {
    /// Signal the hook to stop.
    pub fn stop(&self) {
        let _ = self.stop_tx.try_send(());
    }

    /// Check if the hook thread is still running.
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().map_or(false, |t| !t.is_finished())
    }
}

impl Drop for PointerHookHandle {
    fn drop(&mut self) {
        self.stop();
        // Take the thread handle but don't join it - the rdev listener blocks
        // and never returns once started
        let _ = self.thread.take();
    }
}

/// Install the global pointer hook.
///
/// `sink` sees `ButtonDown`/`ButtonUp` for `button` only and every move.
/// Fails if the OS rejects the hook; the engine must not run without it.
pub fn start_pointer_hook(button: PointerButton, sink: PointerSink) -> PlatformResult<PointerHookHandle> {
    let (stop_tx, stop_rx) = bounded(1);
    let (ready_tx, ready_rx) = bounded::<PlatformResult<()>>(1);

    #[cfg(windows)]
    let spawned = thread::Builder::new()
        .name("dragsense-pointer-hook".into())
        .spawn(move || windows_native::start_hook(button, sink, ready_tx, stop_rx));

    #[cfg(not(windows))]
    let spawned = thread::Builder::new()
        .name("dragsense-pointer-hook".into())
        .spawn(move || rdev_impl::start_hook(button, sink, ready_tx, stop_rx));

    let thread = spawned.map_err(|e| PlatformError::Thread(e.to_string()))?;

    match ready_rx.recv_timeout(STARTUP_GRACE) {
        Ok(Ok(())) | Err(RecvTimeoutError::Timeout) => {
            info!(?button, "Pointer hook running");
            Ok(PointerHookHandle {
                stop_tx,
                thread: Some(thread),
            })
        }
        Ok(Err(e)) => Err(e),
        Err(RecvTimeoutError::Disconnected) => Err(PlatformError::HookInstall(
            "hook thread exited during startup".into(),
        )),
    }
}
