//! Progressive image loading for the work carousel.
//!
//! Images start as placeholders. The controller decides which ones receive a
//! real source and with which fetch priority, and reacts to load/error
//! notifications. It never touches the DOM: it returns [`HydrationCommand`]s
//! that the platform layer applies.

use crate::constants::{
    MAIN_HYDRATION_RADIUS, PRELOAD_FALLBACK_DELAY_MS, PRELOAD_IDLE_TIMEOUT_MS,
    THUMB_HYDRATION_RADIUS,
};
use crate::work::{WorkCatalog, MAIN_WIDTHS};
use smallvec::{smallvec, SmallVec};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Main,
    Thumb,
}

impl ImageKind {
    fn radius(self) -> usize {
        match self {
            ImageKind::Main => MAIN_HYDRATION_RADIUS,
            ImageKind::Thumb => THUMB_HYDRATION_RADIUS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchPriority {
    High,
    Low,
    Auto,
}

impl FetchPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            FetchPriority::High => "high",
            FetchPriority::Low => "low",
            FetchPriority::Auto => "auto",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HydrationMode {
    Eager,
    Background,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HydrationPhase {
    #[default]
    Unhydrated,
    Hydrating,
    FallbackHydrating,
    Loaded,
    Errored,
}

/// Declarative source attributes carried by a placeholder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageSource {
    pub src: String,
    pub src_set: Option<String>,
    pub sizes: Option<String>,
    pub fallback: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HydrationRecord {
    pub source: ImageSource,
    pub phase: HydrationPhase,
    pub fallback_tried: bool,
}

impl HydrationRecord {
    pub fn new(source: ImageSource) -> Self {
        Self {
            source,
            ..Default::default()
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.phase == HydrationPhase::Loaded
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HydrationCommand {
    /// Assign real sources; the platform attaches load/error listeners.
    Assign {
        kind: ImageKind,
        index: usize,
        src: String,
        src_set: Option<String>,
        sizes: Option<String>,
        priority: FetchPriority,
    },
    /// Swap to the fallback source (dropping any srcset) and listen again.
    AssignFallback {
        kind: ImageKind,
        index: usize,
        src: String,
    },
    MarkLoaded {
        kind: ImageKind,
        index: usize,
    },
    MarkErrored {
        kind: ImageKind,
        index: usize,
    },
    DetachListeners {
        kind: ImageKind,
        index: usize,
    },
}

pub type Commands = SmallVec<[HydrationCommand; 2]>;

/// Connection signals used to gate background preloading.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NetworkHints {
    pub save_data: bool,
    pub effective_type: Option<String>,
}

impl NetworkHints {
    pub fn allows_background_preload(&self) -> bool {
        if self.save_data {
            return false;
        }
        !matches!(self.effective_type.as_deref(), Some("slow-2g") | Some("2g"))
    }
}

/// When to run the background preload after first paint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreloadSchedule {
    Idle { timeout_ms: u32 },
    Delay { ms: u32 },
}

pub fn preload_schedule(idle_callback_supported: bool) -> PreloadSchedule {
    if idle_callback_supported {
        PreloadSchedule::Idle {
            timeout_ms: PRELOAD_IDLE_TIMEOUT_MS,
        }
    } else {
        PreloadSchedule::Delay {
            ms: PRELOAD_FALLBACK_DELAY_MS,
        }
    }
}

/// Index of the slide whose center is nearest to `viewport_center`.
/// Ties go to the first slide found.
pub fn active_slide(slide_centers: &[f32], viewport_center: f32) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, c) in slide_centers.iter().enumerate() {
        let d = (c - viewport_center).abs();
        if !d.is_finite() {
            continue;
        }
        match best {
            Some((_, bd)) if d >= bd => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

#[derive(Clone, Debug, Default)]
pub struct HydrationController {
    main: Vec<HydrationRecord>,
    thumbs: Vec<HydrationRecord>,
    active: usize,
    primed: bool,
    preload_decided: bool,
}

impl HydrationController {
    pub fn new(main: Vec<ImageSource>, thumbs: Vec<ImageSource>) -> Self {
        Self {
            main: main.into_iter().map(HydrationRecord::new).collect(),
            thumbs: thumbs.into_iter().map(HydrationRecord::new).collect(),
            ..Default::default()
        }
    }

    /// Sources for every catalog item following the optimized media layout.
    pub fn from_catalog(catalog: &WorkCatalog, main_sizes: &str) -> Self {
        let main = catalog
            .items()
            .iter()
            .map(|item| ImageSource {
                src: item.main_url(MAIN_WIDTHS[0]),
                src_set: Some(item.main_src_set()),
                sizes: Some(main_sizes.to_string()),
                fallback: Some(item.original_url()),
            })
            .collect();
        let thumbs = catalog
            .items()
            .iter()
            .map(|item| ImageSource {
                src: item.thumb_url(),
                src_set: None,
                sizes: None,
                fallback: Some(item.original_url()),
            })
            .collect();
        Self::new(main, thumbs)
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn len(&self, kind: ImageKind) -> usize {
        self.records(kind).len()
    }

    pub fn record(&self, kind: ImageKind, index: usize) -> Option<&HydrationRecord> {
        self.records(kind).get(index)
    }

    fn records(&self, kind: ImageKind) -> &[HydrationRecord] {
        match kind {
            ImageKind::Main => &self.main,
            ImageKind::Thumb => &self.thumbs,
        }
    }

    fn records_mut(&mut self, kind: ImageKind) -> &mut [HydrationRecord] {
        match kind {
            ImageKind::Main => &mut self.main,
            ImageKind::Thumb => &mut self.thumbs,
        }
    }

    fn priority_for(&self, index: usize, mode: HydrationMode) -> FetchPriority {
        match mode {
            HydrationMode::Background => FetchPriority::Low,
            HydrationMode::Eager if index == self.active => FetchPriority::High,
            HydrationMode::Eager => FetchPriority::Low,
        }
    }

    /// Assign real sources to one image. At most once per image.
    pub fn hydrate(
        &mut self,
        kind: ImageKind,
        index: usize,
        mode: HydrationMode,
    ) -> Option<HydrationCommand> {
        let priority = self.priority_for(index, mode);
        let record = self.records_mut(kind).get_mut(index)?;
        if record.phase != HydrationPhase::Unhydrated {
            return None;
        }
        record.phase = HydrationPhase::Hydrating;
        Some(HydrationCommand::Assign {
            kind,
            index,
            src: record.source.src.clone(),
            src_set: record.source.src_set.clone(),
            sizes: record.source.sizes.clone(),
            priority,
        })
    }

    /// Make `index` the active slide and hydrate its neighbourhood.
    pub fn set_active(&mut self, index: usize) -> Vec<HydrationCommand> {
        let count = self.main.len().max(self.thumbs.len());
        if count == 0 {
            return Vec::new();
        }
        self.active = index.min(count - 1);
        let mut out = Vec::new();
        for kind in [ImageKind::Main, ImageKind::Thumb] {
            let len = self.len(kind);
            if len == 0 {
                continue;
            }
            let lo = self.active.saturating_sub(kind.radius());
            let hi = (self.active + kind.radius()).min(len - 1);
            for i in lo..=hi {
                out.extend(self.hydrate(kind, i, HydrationMode::Eager));
            }
        }
        out
    }

    /// First eager pass. Runs once per session; later calls return nothing.
    pub fn prime(&mut self, active: usize) -> Vec<HydrationCommand> {
        if self.primed {
            return Vec::new();
        }
        self.primed = true;
        log::debug!("[carousel] prime active={active}");
        self.set_active(active)
    }

    pub fn is_primed(&self) -> bool {
        self.primed
    }

    /// Hydrate every remaining image at low priority, unless the connection
    /// asks to save data. Decided once per session.
    pub fn preload_all(&mut self, network: &NetworkHints) -> Vec<HydrationCommand> {
        if self.preload_decided {
            return Vec::new();
        }
        self.preload_decided = true;
        if !network.allows_background_preload() {
            log::info!("[carousel] background preload skipped ({network:?})");
            return Vec::new();
        }
        let mut out = Vec::new();
        for kind in [ImageKind::Main, ImageKind::Thumb] {
            for i in 0..self.len(kind) {
                out.extend(self.hydrate(kind, i, HydrationMode::Background));
            }
        }
        log::info!("[carousel] background preload images={}", out.len());
        out
    }

    pub fn on_load(&mut self, kind: ImageKind, index: usize) -> Commands {
        let Some(record) = self.records_mut(kind).get_mut(index) else {
            return Commands::new();
        };
        match record.phase {
            HydrationPhase::Hydrating | HydrationPhase::FallbackHydrating => {
                record.phase = HydrationPhase::Loaded;
                smallvec![
                    HydrationCommand::DetachListeners { kind, index },
                    HydrationCommand::MarkLoaded { kind, index },
                ]
            }
            _ => Commands::new(),
        }
    }

    /// One substitution with the fallback source; a second failure is final.
    pub fn on_error(&mut self, kind: ImageKind, index: usize) -> Commands {
        let Some(record) = self.records_mut(kind).get_mut(index) else {
            return Commands::new();
        };
        match record.phase {
            HydrationPhase::Hydrating if !record.fallback_tried && record.source.fallback.is_some() => {
                record.fallback_tried = true;
                record.phase = HydrationPhase::FallbackHydrating;
                let src = record.source.fallback.clone().unwrap_or_default();
                log::warn!("[carousel] {kind:?}#{index} failed; trying fallback {src}");
                smallvec![
                    HydrationCommand::DetachListeners { kind, index },
                    HydrationCommand::AssignFallback { kind, index, src },
                ]
            }
            HydrationPhase::Hydrating | HydrationPhase::FallbackHydrating => {
                record.phase = HydrationPhase::Errored;
                log::warn!("[carousel] {kind:?}#{index} failed to load");
                smallvec![
                    HydrationCommand::DetachListeners { kind, index },
                    HydrationCommand::MarkErrored { kind, index },
                ]
            }
            _ => Commands::new(),
        }
    }
}
