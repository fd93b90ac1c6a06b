// Host-side tests for the carousel image hydration controller.

use showroom_core::hydration::*;
use showroom_core::{MediaConfig, WorkCatalog};
use rand::prelude::*;
use std::collections::BTreeSet;

fn sources(n: usize, with_fallback: bool) -> Vec<ImageSource> {
    (0..n)
        .map(|i| ImageSource {
            src: format!("/media/optimized/main-900/{i}.jpg"),
            src_set: Some(format!("/media/optimized/main-1800/{i}.jpg 1800w")),
            sizes: None,
            fallback: with_fallback.then(|| format!("/media/{i}.jpg")),
        })
        .collect()
}

fn controller(n: usize) -> HydrationController {
    HydrationController::new(sources(n, true), sources(n, true))
}

fn touched(cmds: &[HydrationCommand], want: ImageKind) -> BTreeSet<usize> {
    cmds.iter()
        .filter_map(|c| match c {
            HydrationCommand::Assign { kind, index, .. } if *kind == want => Some(*index),
            _ => None,
        })
        .collect()
}

// Property: main images within radius 1, thumbs within radius 4, nothing else.
#[test]
fn radius_limited_hydration_for_every_active_index() {
    let n = 12;
    for active in 0..n {
        let mut c = controller(n);
        let cmds = c.set_active(active);
        let mains = touched(&cmds, ImageKind::Main);
        let thumbs = touched(&cmds, ImageKind::Thumb);
        let want_main: BTreeSet<usize> = (0..n).filter(|i| i.abs_diff(active) <= 1).collect();
        let want_thumb: BTreeSet<usize> = (0..n).filter(|i| i.abs_diff(active) <= 4).collect();
        assert_eq!(mains, want_main, "active={active}");
        assert_eq!(thumbs, want_thumb, "active={active}");
        for i in 0..n {
            let hydrated = c.record(ImageKind::Main, i).unwrap().phase != HydrationPhase::Unhydrated;
            assert_eq!(hydrated, want_main.contains(&i));
        }
    }
}

#[test]
fn active_slide_gets_high_priority_neighbours_low() {
    let mut c = controller(5);
    let cmds = c.set_active(2);
    let mut seen = 0;
    for cmd in &cmds {
        if let HydrationCommand::Assign {
            kind,
            index,
            priority,
            ..
        } = cmd
        {
            seen += 1;
            let want = if *index == 2 {
                FetchPriority::High
            } else {
                FetchPriority::Low
            };
            assert_eq!(*priority, want, "{kind:?} #{index}");
        }
    }
    assert_eq!(seen, 3 + 5);
}

#[test]
fn hydration_happens_once_per_image() {
    let mut c = controller(6);
    let first = c.set_active(2);
    assert!(!first.is_empty());
    let again = c.set_active(2);
    assert!(again.is_empty());
    assert_eq!(c.hydrate(ImageKind::Main, 2, HydrationMode::Eager), None);
    let next = c.set_active(3);
    assert_eq!(touched(&next, ImageKind::Main), BTreeSet::from([4]));
}

#[test]
fn out_of_range_active_index_is_clamped() {
    let mut c = controller(3);
    let cmds = c.set_active(99);
    assert_eq!(c.active(), 2);
    assert_eq!(touched(&cmds, ImageKind::Main), BTreeSet::from([1, 2]));
    let mut empty = HydrationController::new(Vec::new(), Vec::new());
    assert!(empty.set_active(0).is_empty());
}

#[test]
fn error_falls_back_exactly_once_then_is_terminal() {
    let mut c = controller(3);
    c.set_active(0);
    let first = c.on_error(ImageKind::Main, 0);
    assert_eq!(
        first.as_slice(),
        &[
            HydrationCommand::DetachListeners {
                kind: ImageKind::Main,
                index: 0
            },
            HydrationCommand::AssignFallback {
                kind: ImageKind::Main,
                index: 0,
                src: "/media/0.jpg".into()
            },
        ]
    );
    let rec = c.record(ImageKind::Main, 0).unwrap();
    assert!(rec.fallback_tried);
    assert_eq!(rec.phase, HydrationPhase::FallbackHydrating);

    let second = c.on_error(ImageKind::Main, 0);
    assert!(second
        .iter()
        .any(|cmd| matches!(cmd, HydrationCommand::MarkErrored { index: 0, .. })));
    assert!(!second
        .iter()
        .any(|cmd| matches!(cmd, HydrationCommand::AssignFallback { .. } | HydrationCommand::Assign { .. })));
    assert_eq!(
        c.record(ImageKind::Main, 0).unwrap().phase,
        HydrationPhase::Errored
    );
    // Further events change nothing.
    assert!(c.on_error(ImageKind::Main, 0).is_empty());
    assert!(c.on_load(ImageKind::Main, 0).is_empty());
}

#[test]
fn error_without_fallback_is_terminal_immediately() {
    let mut c = HydrationController::new(sources(2, false), Vec::new());
    c.set_active(0);
    let cmds = c.on_error(ImageKind::Main, 0);
    assert!(cmds
        .iter()
        .any(|cmd| matches!(cmd, HydrationCommand::MarkErrored { .. })));
    assert_eq!(
        c.record(ImageKind::Main, 0).unwrap().phase,
        HydrationPhase::Errored
    );
}

#[test]
fn load_marks_loaded_and_detaches() {
    let mut c = controller(2);
    c.set_active(0);
    let cmds = c.on_load(ImageKind::Thumb, 1);
    assert_eq!(cmds.len(), 2);
    assert!(c.record(ImageKind::Thumb, 1).unwrap().is_loaded());
    assert!(c.on_load(ImageKind::Thumb, 1).is_empty());
    // Events for unhydrated or unknown images are ignored.
    let mut fresh = controller(2);
    assert!(fresh.on_load(ImageKind::Main, 0).is_empty());
    assert!(fresh.on_error(ImageKind::Main, 7).is_empty());
}

#[test]
fn prime_and_preload_run_once() {
    let mut c = controller(10);
    assert!(!c.prime(0).is_empty());
    assert!(c.prime(5).is_empty());
    assert!(c.is_primed());

    let net = NetworkHints::default();
    let rest = c.preload_all(&net);
    assert!(rest.iter().all(|cmd| matches!(
        cmd,
        HydrationCommand::Assign {
            priority: FetchPriority::Low,
            ..
        }
    )));
    // Everything not primed: 10 mains - 2 + 10 thumbs - 5.
    assert_eq!(rest.len(), 13);
    assert!(c.preload_all(&net).is_empty());
}

#[test]
fn preload_is_gated_by_data_saver_and_slow_links() {
    for net in [
        NetworkHints {
            save_data: true,
            effective_type: Some("4g".into()),
        },
        NetworkHints {
            save_data: false,
            effective_type: Some("2g".into()),
        },
        NetworkHints {
            save_data: false,
            effective_type: Some("slow-2g".into()),
        },
    ] {
        assert!(!net.allows_background_preload());
        let mut c = controller(4);
        assert!(c.preload_all(&net).is_empty());
    }
    assert!(NetworkHints {
        save_data: false,
        effective_type: Some("3g".into())
    }
    .allows_background_preload());
}

#[test]
fn preload_schedule_prefers_idle_callback() {
    assert!(matches!(preload_schedule(true), PreloadSchedule::Idle { .. }));
    assert_eq!(
        preload_schedule(false),
        PreloadSchedule::Delay { ms: 1200 }
    );
}

#[test]
fn active_slide_is_nearest_center_first_on_ties() {
    assert_eq!(active_slide(&[], 10.0), None);
    assert_eq!(active_slide(&[0.0, 100.0, 200.0], 120.0), Some(1));
    assert_eq!(active_slide(&[0.0, 100.0, 200.0], 150.0), Some(1));
    assert_eq!(active_slide(&[f32::NAN, 300.0], 0.0), Some(1));
}

#[test]
fn catalog_sources_follow_media_layout() {
    let mut rng = StdRng::seed_from_u64(3);
    let catalog = WorkCatalog::shuffled(&MediaConfig::default(), &mut rng);
    let c = HydrationController::from_catalog(&catalog, "100vw");
    let rec = c.record(ImageKind::Main, 0).unwrap();
    let first = &catalog.items()[0];
    assert_eq!(rec.source.src, first.main_url(900));
    assert_eq!(rec.source.fallback.as_deref(), Some(first.original_url().as_str()));
    let thumb = c.record(ImageKind::Thumb, 0).unwrap();
    assert!(thumb.source.src.starts_with("/media/optimized/thumb-360/"));
}
