//! Windows implementation of shell automation over COM.
//!
//! Every object here is apartment-bound: create and use it on the thread
//! that owns the [`ComApartment`].

use crate::error::{PlatformError, PlatformResult};
use dragsense_core::{
    AutomationError, AutomationProvider, AutomationResult, SelectedItems, SelectionItem,
    SelectionSource, SurfaceEnumerator, WindowId,
};
use std::marker::PhantomData;
use tracing::{debug, warn};
use windows::core::{Interface, VARIANT};
use windows::Win32::Foundation::RPC_E_CHANGED_MODE;
use windows::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CoUninitialize, CLSCTX_ALL, COINIT_APARTMENTTHREADED,
};
use windows::Win32::UI::Shell::{
    FolderItems, IShellFolderViewDual, IShellWindows, IWebBrowser2, ShellWindows, SWC_DESKTOP,
    SWFO_NEEDDISPATCH,
};

/// Single-threaded apartment scope for the current thread.
///
/// Uninitializes on drop only if this guard's initialization succeeded.
pub struct ComApartment {
    initialized: bool,
    // COM apartments are per thread
    _not_send: PhantomData<*const ()>,
}

impl ComApartment {
    pub fn enter() -> PlatformResult<Self> {
        let hr = unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) };
        if hr == RPC_E_CHANGED_MODE {
            // Thread already lives in a multithreaded apartment; shell
            // objects still work through marshaling.
            warn!("Thread already initialized with a different COM apartment");
            return Ok(Self { initialized: false, _not_send: PhantomData });
        }
        if hr.is_err() {
            return Err(PlatformError::ComInit(format!("CoInitializeEx failed: {:?}", hr)));
        }
        debug!("COM apartment entered");
        Ok(Self { initialized: true, _not_send: PhantomData })
    }
}

impl Drop for ComApartment {
    fn drop(&mut self) {
        if self.initialized {
            unsafe { CoUninitialize() };
            debug!("COM apartment left");
        }
    }
}

/// Automation provider backed by the shell windows collection.
pub struct ShellAutomation {
    _apartment: ComApartment,
}

impl ShellAutomation {
    /// Enter an apartment on the current thread and build the provider.
    pub fn new() -> PlatformResult<Self> {
        Ok(Self { _apartment: ComApartment::enter()? })
    }
}

impl AutomationProvider for ShellAutomation {
    type Root = ShellRoot;

    fn acquire_root(&self) -> AutomationResult<ShellRoot> {
        let windows: IShellWindows = unsafe { CoCreateInstance(&ShellWindows, None, CLSCTX_ALL) }
            .map_err(|e| AutomationError::RootUnavailable(e.to_string()))?;
        Ok(ShellRoot { windows })
    }
}

pub struct ShellRoot {
    windows: IShellWindows,
}

impl SurfaceEnumerator for ShellRoot {
    type Surface = ShellSurface;

    fn count(&self) -> AutomationResult<usize> {
        let count = unsafe { self.windows.Count() }
            .map_err(|e| AutomationError::Enumeration(e.to_string()))?;
        Ok(count.max(0) as usize)
    }

    fn surface(&self, index: usize) -> AutomationResult<ShellSurface> {
        let unavailable = |reason: String| AutomationError::SurfaceUnavailable { index, reason };
        let dispatch = unsafe { self.windows.Item(&VARIANT::from(index as i32)) }
            .map_err(|e| unavailable(e.to_string()))?;
        let browser = dispatch
            .cast::<IWebBrowser2>()
            .map_err(|e| unavailable(e.to_string()))?;
        Ok(ShellSurface { browser })
    }

    fn desktop(&self) -> AutomationResult<ShellSurface> {
        let empty = VARIANT::default();
        let mut hwnd: i32 = 0;
        let dispatch = unsafe {
            self.windows
                .FindWindowSW(&empty, &empty, SWC_DESKTOP, &mut hwnd, SWFO_NEEDDISPATCH)
        }
        .map_err(|e| AutomationError::DesktopLookup(e.to_string()))?;
        let browser = dispatch
            .cast::<IWebBrowser2>()
            .map_err(|e| AutomationError::DesktopLookup(e.to_string()))?;
        Ok(ShellSurface { browser })
    }
}

pub struct ShellSurface {
    browser: IWebBrowser2,
}

impl SelectionSource for ShellSurface {
    type Items = ShellItems;

    fn window_id(&self) -> AutomationResult<WindowId> {
        let hwnd = unsafe { self.browser.HWND() }
            .map_err(|e| AutomationError::WindowId(e.to_string()))?;
        Ok(WindowId(hwnd.0 as usize))
    }

    fn selected_items(&self) -> AutomationResult<ShellItems> {
        let document = unsafe { self.browser.Document() }
            .map_err(|e| AutomationError::Document(e.to_string()))?;
        let view = document
            .cast::<IShellFolderViewDual>()
            .map_err(|e| AutomationError::FolderView(e.to_string()))?;
        let items = unsafe { view.SelectedItems() }
            .map_err(|e| AutomationError::SelectedItems(e.to_string()))?;
        Ok(ShellItems { items })
    }
}

pub struct ShellItems {
    items: FolderItems,
}

impl SelectedItems for ShellItems {
    fn count(&self) -> AutomationResult<usize> {
        let count = unsafe { self.items.Count() }
            .map_err(|e| AutomationError::SelectedItems(e.to_string()))?;
        Ok(count.max(0) as usize)
    }

    fn item(&self, index: usize) -> AutomationResult<SelectionItem> {
        let failed = |reason: String| AutomationError::Item { index, reason };
        let item = unsafe { self.items.Item(&VARIANT::from(index as i32)) }
            .map_err(|e| failed(e.to_string()))?;
        let is_folder = unsafe { item.IsFolder() }.map_err(|e| failed(e.to_string()))?;
        let path = unsafe { item.Path() }.map_err(|e| failed(e.to_string()))?;
        Ok(SelectionItem {
            path: path.to_string(),
            is_directory: is_folder.0 != 0,
        })
    }
}
