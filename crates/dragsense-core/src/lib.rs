//! dragsense-core: drag-intent detection engine.
//!
//! Design goal: keep this crate UI-agnostic and platform-agnostic.
//! OS access (pointer hook, window hierarchy, shell automation) lives in
//! `dragsense-platform` and reaches the engine through the traits below.
//!
//! ## Module Structure
//!
//! - `extension` - Allow-list of drag-eligible file extensions
//! - `gesture` - Pointer event stream -> drag phases + detection signal
//! - `surface` - Window hierarchy classification (explorer window / desktop)
//! - `selection` - Shell selection resolution through the automation traits
//! - `orchestrator` - Point -> surface -> selection -> outcome
//! - `worker` - Orchestration context thread and the input-side driver
//! - `config` - YAML configuration model and loader

mod config;
mod error;
mod extension;
mod gesture;
mod orchestrator;
mod selection;
mod surface;
mod worker;

#[cfg(test)]
mod fakes;

pub use config::{
    config_file_path, get_config_dir, load_config_from, load_or_default, DetectorConfig,
    LoggingConfig, PointerButton, SurfaceClasses, ThresholdConfig,
};
pub use error::{AutomationError, AutomationResult, ConfigError, EngineError, EngineResult};
pub use extension::{normalize_extension, ExtensionPolicy, DEFAULT_EXTENSIONS};
pub use gesture::{
    DragPhase, DragSession, DragThreshold, GestureOutcome, GestureStateMachine, PhaseChange,
    Point, PointerEvent, PointerEventKind,
};
pub use orchestrator::{DetectionOrchestrator, DetectionOutcome};
pub use selection::{
    resolve_eligible_selection, AutomationProvider, SelectedItems, SelectionItem, SelectionSource,
    SurfaceEnumerator,
};
pub use surface::{classify_surface, SurfaceHandle, SurfaceKind, WindowId, WindowTree};
pub use worker::{
    DetectionReport, DetectionRequest, InputDriver, OrchestrationWorker, OrchestratorHandle,
    ReportObserver,
};
