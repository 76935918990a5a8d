//! Provider for platforms without a shell automation interface.

use dragsense_core::{
    AutomationError, AutomationProvider, AutomationResult, SelectedItems, SelectionItem,
    SelectionSource, SurfaceEnumerator, WindowId,
};

/// Provider for platforms without a shell automation interface.
///
/// Its automation objects are uninhabited: no root can ever be acquired.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

impl Unsupported {
    pub fn new() -> crate::error::PlatformResult<Self> {
        Ok(Self)
    }
}

/// Uninhabited automation object.
#[derive(Debug)]
pub enum Never {}

impl AutomationProvider for Unsupported {
    type Root = Never;

    fn acquire_root(&self) -> AutomationResult<Never> {
        Err(AutomationError::RootUnavailable(
            "shell automation is only available on Windows".into(),
        ))
    }
}

impl SurfaceEnumerator for Never {
    type Surface = Never;

    fn count(&self) -> AutomationResult<usize> {
        match *self {}
    }

    fn surface(&self, _index: usize) -> AutomationResult<Never> {
        match *self {}
    }

    fn desktop(&self) -> AutomationResult<Never> {
        match *self {}
    }
}

impl SelectionSource for Never {
    type Items = Never;

    fn window_id(&self) -> AutomationResult<WindowId> {
        match *self {}
    }

    fn selected_items(&self) -> AutomationResult<Never> {
        match *self {}
    }
}

impl SelectedItems for Never {
    fn count(&self) -> AutomationResult<usize> {
        match *self {}
    }

    fn item(&self, _index: usize) -> AutomationResult<SelectionItem> {
        match *self {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dragsense_core::{
        resolve_eligible_selection, DetectionOutcome, ExtensionPolicy, SurfaceHandle, SurfaceKind,
    };

    #[test]
    fn test_unsupported_root_is_unavailable() {
        let outcome = resolve_eligible_selection(
            &Unsupported,
            &ExtensionPolicy::default(),
            SurfaceHandle { window: WindowId(1), kind: SurfaceKind::Desktop },
        );
        assert!(matches!(outcome, DetectionOutcome::AutomationUnavailable { .. }));
    }
}
