//! Test doubles for the window tree and the shell automation provider.

use crate::error::{AutomationError, AutomationResult};
use crate::gesture::Point;
use crate::selection::{
    AutomationProvider, SelectedItems, SelectionItem, SelectionSource, SurfaceEnumerator,
};
use crate::surface::{WindowId, WindowTree};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// In-memory window hierarchy.
#[derive(Debug, Clone, Default)]
pub struct FakeWindowTree {
    windows: HashMap<usize, (String, Option<usize>)>,
    points: HashMap<Point, usize>,
    cursor: Option<Point>,
}

impl FakeWindowTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window(mut self, id: usize, class: &str, parent: Option<usize>) -> Self {
        self.windows.insert(id, (class.to_string(), parent));
        self
    }

    pub fn at(mut self, point: Point, id: usize) -> Self {
        self.points.insert(point, id);
        self
    }

    pub fn cursor(mut self, point: Point) -> Self {
        self.cursor = Some(point);
        self
    }
}

impl WindowTree for FakeWindowTree {
    fn window_at(&self, point: Point) -> Option<WindowId> {
        self.points.get(&point).copied().map(WindowId)
    }

    fn parent(&self, window: WindowId) -> Option<WindowId> {
        self.windows
            .get(&window.0)
            .and_then(|(_, parent)| *parent)
            .map(WindowId)
    }

    fn class_name(&self, window: WindowId) -> Option<String> {
        self.windows.get(&window.0).map(|(class, _)| class.clone())
    }

    fn cursor_position(&self) -> Option<Point> {
        self.cursor
    }
}

/// Counters shared by a fake provider and every object it hands out.
#[derive(Debug, Default)]
pub struct CallLog {
    roots: AtomicUsize,
    surfaces: AtomicUsize,
    items: AtomicUsize,
}

impl CallLog {
    pub fn roots_acquired(&self) -> usize {
        self.roots.load(Ordering::SeqCst)
    }

    pub fn surfaces_visited(&self) -> usize {
        self.surfaces.load(Ordering::SeqCst)
    }

    pub fn items_read(&self) -> usize {
        self.items.load(Ordering::SeqCst)
    }

    /// Total automation calls of any kind.
    pub fn total(&self) -> usize {
        self.roots_acquired() + self.surfaces_visited() + self.items_read()
    }
}

/// A fake file-browsing surface.
#[derive(Debug, Clone)]
pub struct FakeSurface {
    window: usize,
    available: bool,
    window_error: bool,
    selection: AutomationResult<Vec<AutomationResult<SelectionItem>>>,
    log: Arc<CallLog>,
}

impl FakeSurface {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            available: true,
            window_error: false,
            selection: Ok(Vec::new()),
            log: Arc::default(),
        }
    }

    /// A surface whose enumeration entry cannot be retrieved.
    pub fn unavailable() -> Self {
        Self { available: false, ..Self::new(0) }
    }

    pub fn with_window_error(mut self) -> Self {
        self.window_error = true;
        self
    }

    pub fn with_items(mut self, items: Vec<SelectionItem>) -> Self {
        self.selection = Ok(items.into_iter().map(Ok).collect());
        self
    }

    pub fn with_broken_item_first(mut self) -> Self {
        if let Ok(items) = &mut self.selection {
            items.insert(
                0,
                Err(AutomationError::Item { index: 0, reason: "gone".into() }),
            );
        }
        self
    }

    pub fn with_selection_error(mut self, error: AutomationError) -> Self {
        self.selection = Err(error);
        self
    }

    fn attached(&self, log: &Arc<CallLog>) -> Self {
        Self { log: log.clone(), ..self.clone() }
    }
}

impl SelectionSource for FakeSurface {
    type Items = FakeItems;

    fn window_id(&self) -> AutomationResult<WindowId> {
        if self.window_error {
            return Err(AutomationError::WindowId("no HWND".into()));
        }
        Ok(WindowId(self.window))
    }

    fn selected_items(&self) -> AutomationResult<FakeItems> {
        let items = self.selection.clone()?;
        Ok(FakeItems { items, log: self.log.clone() })
    }
}

pub struct FakeItems {
    items: Vec<AutomationResult<SelectionItem>>,
    log: Arc<CallLog>,
}

impl SelectedItems for FakeItems {
    fn count(&self) -> AutomationResult<usize> {
        Ok(self.items.len())
    }

    fn item(&self, index: usize) -> AutomationResult<SelectionItem> {
        self.log.items.fetch_add(1, Ordering::SeqCst);
        self.items.get(index).cloned().unwrap_or(Err(AutomationError::Item {
            index,
            reason: "out of range".into(),
        }))
    }
}

/// A fake automation provider.
#[derive(Debug, Clone, Default)]
pub struct FakeProvider {
    surfaces: Vec<FakeSurface>,
    desktop: Option<FakeSurface>,
    root_error: Option<AutomationError>,
    panic_on_root: bool,
    log: Arc<CallLog>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_surface(mut self, surface: FakeSurface) -> Self {
        self.surfaces.push(surface.attached(&self.log));
        self
    }

    pub fn with_desktop(mut self, surface: FakeSurface) -> Self {
        self.desktop = Some(surface.attached(&self.log));
        self
    }

    pub fn with_root_error(mut self, error: AutomationError) -> Self {
        self.root_error = Some(error);
        self
    }

    pub fn panicking(mut self) -> Self {
        self.panic_on_root = true;
        self
    }

    pub fn log(&self) -> Arc<CallLog> {
        self.log.clone()
    }
}

impl AutomationProvider for FakeProvider {
    type Root = FakeRoot;

    fn acquire_root(&self) -> AutomationResult<FakeRoot> {
        self.log.roots.fetch_add(1, Ordering::SeqCst);
        if self.panic_on_root {
            panic!("automation provider blew up");
        }
        if let Some(error) = &self.root_error {
            return Err(error.clone());
        }
        Ok(FakeRoot {
            surfaces: self.surfaces.clone(),
            desktop: self.desktop.clone(),
            log: self.log.clone(),
        })
    }
}

pub struct FakeRoot {
    surfaces: Vec<FakeSurface>,
    desktop: Option<FakeSurface>,
    log: Arc<CallLog>,
}

impl SurfaceEnumerator for FakeRoot {
    type Surface = FakeSurface;

    fn count(&self) -> AutomationResult<usize> {
        Ok(self.surfaces.len())
    }

    fn surface(&self, index: usize) -> AutomationResult<FakeSurface> {
        self.log.surfaces.fetch_add(1, Ordering::SeqCst);
        match self.surfaces.get(index) {
            Some(surface) if surface.available => Ok(surface.clone()),
            _ => Err(AutomationError::SurfaceUnavailable {
                index,
                reason: "closed".into(),
            }),
        }
    }

    fn desktop(&self) -> AutomationResult<FakeSurface> {
        self.desktop
            .clone()
            .ok_or_else(|| AutomationError::DesktopLookup("no desktop view".into()))
    }
}
