//! Selection resolution through the shell automation interface.
//!
//! The automation objects are modeled as narrow capability traits so the
//! real provider (COM shell windows on Windows) and test fakes plug in the
//! same way. Every object acquired here is dropped before the resolver
//! returns; nothing is cached between calls because a surface's selection
//! can change between drags.

use crate::error::AutomationResult;
use crate::extension::ExtensionPolicy;
use crate::orchestrator::DetectionOutcome;
use crate::surface::{SurfaceHandle, SurfaceKind, WindowId};
use tracing::{debug, trace};

/// One selected item of a file-browsing surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionItem {
    pub path: String,
    pub is_directory: bool,
}

impl SelectionItem {
    pub fn file(path: impl Into<String>) -> Self {
        Self { path: path.into(), is_directory: false }
    }

    pub fn directory(path: impl Into<String>) -> Self {
        Self { path: path.into(), is_directory: true }
    }
}

/// Entry point of the automation interface.
pub trait AutomationProvider {
    type Root: SurfaceEnumerator;

    /// Acquire the shell-level collection of open file-browsing surfaces.
    fn acquire_root(&self) -> AutomationResult<Self::Root>;
}

/// The collection of open file-browsing surfaces.
pub trait SurfaceEnumerator {
    type Surface: SelectionSource;

    /// Number of surfaces, read once per enumeration.
    fn count(&self) -> AutomationResult<usize>;

    /// Surface at `index` in the collection's order.
    fn surface(&self, index: usize) -> AutomationResult<Self::Surface>;

    /// Direct lookup of the desktop's surface.
    fn desktop(&self) -> AutomationResult<Self::Surface>;
}

/// A file-browsing surface that exposes its current selection.
pub trait SelectionSource {
    type Items: SelectedItems;

    /// OS window hosting this surface.
    fn window_id(&self) -> AutomationResult<WindowId>;

    /// Active document -> folder view -> selected items.
    fn selected_items(&self) -> AutomationResult<Self::Items>;
}

/// The selected-items collection of a folder view.
pub trait SelectedItems {
    fn count(&self) -> AutomationResult<usize>;

    fn item(&self, index: usize) -> AutomationResult<SelectionItem>;
}

/// Decide whether `surface` currently has at least one selected,
/// non-directory item whose extension is allowed by `policy`.
pub fn resolve_eligible_selection<P: AutomationProvider + ?Sized>(
    provider: &P,
    policy: &ExtensionPolicy,
    surface: SurfaceHandle,
) -> DetectionOutcome {
    let root = match provider.acquire_root() {
        Ok(root) => root,
        Err(e) => {
            debug!("Automation root unavailable: {}", e);
            return DetectionOutcome::AutomationUnavailable { detail: e.to_string() };
        }
    };

    let target = match surface.kind {
        SurfaceKind::Desktop => match root.desktop() {
            Ok(desktop) => Some(desktop),
            Err(e) => {
                debug!("Desktop surface unresolved: {}", e);
                None
            }
        },
        SurfaceKind::ExplorerWindow => match find_surface(&root, surface.window) {
            Ok(found) => found,
            Err(outcome) => return outcome,
        },
    };

    let Some(target) = target else {
        return DetectionOutcome::SurfaceNotFound { surface };
    };

    inspect_selection(&target, policy)
}

/// First enumerated surface whose window matches `window`.
fn find_surface<R: SurfaceEnumerator>(
    root: &R,
    window: WindowId,
) -> Result<Option<R::Surface>, DetectionOutcome> {
    let count = root.count().map_err(|e| {
        debug!("Surface enumeration failed: {}", e);
        DetectionOutcome::AutomationUnavailable { detail: e.to_string() }
    })?;

    for index in 0..count {
        let candidate = match root.surface(index) {
            Ok(candidate) => candidate,
            Err(e) => {
                trace!(index, "Skipping surface: {}", e);
                continue;
            }
        };
        match candidate.window_id() {
            Ok(id) if id == window => {
                trace!(index, ?window, "Matched surface");
                return Ok(Some(candidate));
            }
            Ok(_) => {}
            Err(e) => trace!(index, "Surface window id unavailable: {}", e),
        }
    }

    Ok(None)
}

fn inspect_selection<S: SelectionSource>(
    surface: &S,
    policy: &ExtensionPolicy,
) -> DetectionOutcome {
    let items = match surface.selected_items() {
        Ok(items) => items,
        Err(e) => {
            debug!("Selection unavailable: {}", e);
            return DetectionOutcome::SelectionUnavailable { detail: e.to_string() };
        }
    };

    let count = match items.count() {
        Ok(count) => count,
        Err(e) => {
            debug!("Selection count unavailable: {}", e);
            return DetectionOutcome::SelectionUnavailable { detail: e.to_string() };
        }
    };
    if count == 0 {
        return DetectionOutcome::EmptySelection;
    }

    let mut inspected = 0;
    for index in 0..count {
        inspected += 1;
        let item = match items.item(index) {
            Ok(item) => item,
            Err(e) => {
                trace!(index, "Skipping selected item: {}", e);
                continue;
            }
        };
        if item.is_directory {
            trace!(path = %item.path, "Skipping directory");
            continue;
        }
        if policy.is_eligible(&item.path) {
            return DetectionOutcome::Eligible { path: item.path, inspected };
        }
    }

    DetectionOutcome::NoEligibleItem { inspected }
}
