//! Windows native implementation of the pointer hook.
//!
//! Uses WH_MOUSE_LL. The hook procedure runs on this thread's message loop,
//! so the sink is stored in thread-local storage.

use super::PointerSink;
use crate::error::{PlatformError, PlatformResult};
use crossbeam_channel::{Receiver, Sender};
use dragsense_core::{PointerButton, PointerEvent, PointerEventKind, Point};
use std::cell::RefCell;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};
use windows_sys::Win32::Foundation::{GetLastError, LPARAM, LRESULT, WPARAM};
use windows_sys::Win32::System::LibraryLoader::GetModuleHandleW;
use windows_sys::Win32::System::Threading::GetCurrentThreadId;
use windows_sys::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, PostThreadMessageW, SetWindowsHookExW,
    TranslateMessage, UnhookWindowsHookEx, HC_ACTION, MSG, MSLLHOOKSTRUCT, WH_MOUSE_LL,
    WM_LBUTTONDOWN, WM_LBUTTONUP, WM_MBUTTONDOWN, WM_MBUTTONUP, WM_MOUSEMOVE, WM_QUIT,
    WM_RBUTTONDOWN, WM_RBUTTONUP,
};

// Thread-local storage for the hook procedure
thread_local! {
    static SINK: RefCell<Option<PointerSink>> = const { RefCell::new(None) };
    static BUTTON: RefCell<PointerButton> = const { RefCell::new(PointerButton::Left) };
    static START_TIME: RefCell<Option<Instant>> = const { RefCell::new(None) };
}

/// Run the hook and its message loop until stopped.
pub fn start_hook(
    button: PointerButton,
    sink: PointerSink,
    ready_tx: Sender<PlatformResult<()>>,
    stop_rx: Receiver<()>,
) {
    info!("Pointer hook thread started (Windows native)");

    let thread_id = Arc::new(AtomicU32::new(unsafe { GetCurrentThreadId() }));

    SINK.with(|s| *s.borrow_mut() = Some(sink));
    BUTTON.with(|b| *b.borrow_mut() = button);
    START_TIME.with(|t| *t.borrow_mut() = Some(Instant::now()));

    let mouse_hook = unsafe {
        SetWindowsHookExW(
            WH_MOUSE_LL,
            Some(mouse_hook_proc),
            GetModuleHandleW(std::ptr::null()),
            0,
        )
    };
    if mouse_hook.is_null() {
        let code = unsafe { GetLastError() };
        error!(code, "Failed to install mouse hook");
        let _ = ready_tx.send(Err(PlatformError::HookInstall(format!(
            "SetWindowsHookExW failed with error {}",
            code
        ))));
        return;
    }
    debug!("Mouse hook installed");
    let _ = ready_tx.send(Ok(()));

    // Spawn a thread to monitor stop signal
    let tid = thread_id.clone();
    let stop_thread = std::thread::spawn(move || loop {
        if stop_rx.recv_timeout(Duration::from_millis(50)).is_ok() {
            info!("Stop signal received, posting WM_QUIT");
            let id = tid.load(Ordering::SeqCst);
            if id != 0 {
                unsafe { PostThreadMessageW(id, WM_QUIT, 0, 0) };
            }
            break;
        }
        if tid.load(Ordering::SeqCst) == 0 {
            break;
        }
    });

    let mut msg: MSG = unsafe { std::mem::zeroed() };
    loop {
        let ret = unsafe { GetMessageW(&mut msg, std::ptr::null_mut(), 0, 0) };
        if ret <= 0 {
            // WM_QUIT or error
            break;
        }
        unsafe {
            TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }

    info!("Unhooking");
    unsafe {
        UnhookWindowsHookEx(mouse_hook);
    }
    thread_id.store(0, Ordering::SeqCst);
    SINK.with(|s| s.borrow_mut().take());

    let _ = stop_thread.join();
    info!("Pointer hook thread exiting");
}

/// Low-level mouse hook procedure.
unsafe extern "system" fn mouse_hook_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code == HC_ACTION as i32 {
        let ms = &*(lparam as *const MSLLHOOKSTRUCT);
        let position = Point::new(ms.pt.x, ms.pt.y);
        let button = BUTTON.with(|b| *b.borrow());

        if let Some(kind) = event_kind(wparam as u32, button) {
            dispatch(PointerEvent {
                kind,
                position,
                timestamp_ms: elapsed_ms(),
            });
        }
    }

    CallNextHookEx(std::ptr::null_mut(), code, wparam, lparam)
}

/// Map a mouse message to an event for the configured `button`. Moves
/// always pass; other buttons, the wheel and X buttons are ignored.
fn event_kind(msg: u32, button: PointerButton) -> Option<PointerEventKind> {
    match (msg, button) {
        (WM_MOUSEMOVE, _) => Some(PointerEventKind::Move),
        (WM_LBUTTONDOWN, PointerButton::Left)
        | (WM_RBUTTONDOWN, PointerButton::Right)
        | (WM_MBUTTONDOWN, PointerButton::Middle) => Some(PointerEventKind::ButtonDown),
        (WM_LBUTTONUP, PointerButton::Left)
        | (WM_RBUTTONUP, PointerButton::Right)
        | (WM_MBUTTONUP, PointerButton::Middle) => Some(PointerEventKind::ButtonUp),
        _ => None,
    }
}

fn elapsed_ms() -> u64 {
    START_TIME.with(|time| {
        time.borrow()
            .as_ref()
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0)
    })
}

fn dispatch(event: PointerEvent) {
    SINK.with(|sink| {
        // A re-entrant call (sink pumping messages) is dropped rather than
        // double-borrowing the sink.
        if let Ok(mut guard) = sink.try_borrow_mut() {
            if let Some(sink) = guard.as_mut() {
                sink(event);
            }
        }
    });
}
