//! rdev-based implementation of the pointer hook.

use super::PointerSink;
use crate::error::{PlatformError, PlatformResult};
use crossbeam_channel::{Receiver, Sender};
use dragsense_core::{Point, PointerButton, PointerEvent, PointerEventKind};
use rdev::{listen, Event, EventType};
use std::time::Instant;
use tracing::{error, info};

fn matches_button(wanted: PointerButton, button: rdev::Button) -> bool {
    matches!(
        (wanted, button),
        (PointerButton::Left, rdev::Button::Left)
            | (PointerButton::Right, rdev::Button::Right)
            | (PointerButton::Middle, rdev::Button::Middle)
    )
}

/// Start the pointer hook using rdev. Blocks until the listener fails.
pub fn start_hook(
    button: PointerButton,
    mut sink: PointerSink,
    ready_tx: Sender<PlatformResult<()>>,
    stop_rx: Receiver<()>,
) {
    info!("Pointer hook thread started (rdev)");
    let start_time = Instant::now();
    // rdev reports no position on button events
    let mut last_position = Point::default();
    let mut stopped = false;

    let callback = move |event: Event| {
        if stopped || stop_rx.try_recv().is_ok() {
            stopped = true;
            return;
        }

        let kind = match event.event_type {
            EventType::MouseMove { x, y } => {
                last_position = Point::new(x as i32, y as i32);
                Some(PointerEventKind::Move)
            }
            EventType::ButtonPress(b) if matches_button(button, b) => {
                Some(PointerEventKind::ButtonDown)
            }
            EventType::ButtonRelease(b) if matches_button(button, b) => {
                Some(PointerEventKind::ButtonUp)
            }
            _ => None,
        };

        if let Some(kind) = kind {
            sink(PointerEvent {
                kind,
                position: last_position,
                timestamp_ms: start_time.elapsed().as_millis() as u64,
            });
        }
    };

    if let Err(error) = listen(callback) {
        error!(?error, "Pointer hook error");
        let _ = ready_tx.send(Err(PlatformError::HookInstall(format!("{:?}", error))));
    }

    info!("Pointer hook thread exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_only_configured_button() {
        assert!(matches_button(PointerButton::Left, rdev::Button::Left));
        assert!(matches_button(PointerButton::Middle, rdev::Button::Middle));
        assert!(!matches_button(PointerButton::Left, rdev::Button::Right));
        assert!(!matches_button(PointerButton::Right, rdev::Button::Unknown(4)));
    }
}
