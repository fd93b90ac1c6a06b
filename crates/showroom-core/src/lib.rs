pub mod constants;
pub mod contact;
pub mod drag;
pub mod hydration;
pub mod materials;
pub mod model;
pub mod panel;
pub mod perf;
pub mod pointer;
pub mod scene;
pub mod stage;
pub mod state;
pub mod theme;
pub mod timeline;
pub mod work;

pub use constants::*;
pub use drag::DragState;
pub use hydration::{
    active_slide, FetchPriority, HydrationCommand, HydrationController, HydrationMode,
    HydrationPhase, ImageKind, ImageSource, NetworkHints, PreloadSchedule,
};
pub use materials::{MaterialParams, MaterialRegistry, MaterialRegistryEntry};
pub use model::{CpuMesh, MaterialDesc, MaterialId, ModelAsset, ModelError, Vertex};
pub use panel::{Panel, PanelChanged, PanelController};
pub use perf::{DeviceHints, PerfProfile};
pub use pointer::PointerTracker;
pub use scene::{EnvLookup, SceneController};
pub use stage::{FrameOutcome, Stage, StageEffect, UiEvent};
pub use state::*;
pub use theme::{Theme, ThemePreset};
pub use timeline::{compute_state, smoothstep, BeatSet, BeatTable, SceneBeat, TimelineState};
pub use work::{MediaConfig, WorkCatalog, WorkItem};
