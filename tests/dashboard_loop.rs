//! End-to-end pipeline tests: producer updates, input listener, renderer,
//! and lifecycle flags running against the headless harness.
//!
//! Events enqueued through the public API before the quit key are applied in
//! order ahead of the stop event, so every scenario is deterministic: build
//! the dashboard, enqueue, send the quit rune, join, inspect the grid.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use termdash::dashboard::Dashboard;
use termdash::harness::{EventFeeder, MemorySurface, SurfaceHandle, scripted_events};

const QUIT: char = 'q';

fn start(dash: &Arc<Dashboard>, width: u16, height: u16) -> (SurfaceHandle, EventFeeder, JoinHandle<()>) {
    let surface = MemorySurface::new(width, height);
    let handle = surface.handle();
    let (feeder, events) = scripted_events();
    let runner = Arc::clone(dash);
    let joiner = thread::spawn(move || {
        runner
            .run(surface, events, &[QUIT])
            .expect("headless run should not fail");
    });
    (handle, feeder, joiner)
}

fn wait_until(what: &str, mut done: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !done() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(1));
    }
}

// ══════════════════════════════════════════════════════════════════
// Section 1: rendered content
// ══════════════════════════════════════════════════════════════════

#[test]
fn key_value_scenario_renders_exact_row() {
    let dash = Arc::new(Dashboard::new());
    dash.register_key_val(1, 0, 1, 20, "Count");
    let (handle, feeder, joiner) = start(&dash, 40, 6);

    dash.update_key_val(1, "42");
    feeder.key(QUIT);
    joiner.join().unwrap();

    assert_eq!(&handle.row_text(1)[..20], "Count ........... 42");
}

#[test]
fn rolling_log_scenario_shows_last_three_lines() {
    let dash = Arc::new(Dashboard::new());
    dash.register_line(2, 0, 1, 3, None);
    let (handle, feeder, joiner) = start(&dash, 40, 6);

    for line in ["a", "b", "c", "d"] {
        dash.update_line(2, line);
    }
    feeder.key(QUIT);
    joiner.join().unwrap();

    assert_eq!(handle.row_text(1).trim_end(), "b");
    assert_eq!(handle.row_text(2).trim_end(), "c");
    assert_eq!(handle.row_text(3).trim_end(), "d");
}

#[test]
fn updates_apply_in_submission_order() {
    let dash = Arc::new(Dashboard::new());
    dash.register_key_val(1, 0, 0, 20, "Tick");
    let (handle, feeder, joiner) = start(&dash, 40, 4);

    for n in 1..=5 {
        dash.update_key_val(1, n.to_string());
    }
    feeder.key(QUIT);
    joiner.join().unwrap();

    assert_eq!(&handle.row_text(0)[..20], "Tick ............. 5");
}

#[test]
fn unknown_field_updates_are_silently_dropped() {
    let dash = Arc::new(Dashboard::new());
    dash.register_key_val(1, 0, 0, 20, "Known");
    let (handle, feeder, joiner) = start(&dash, 40, 4);

    dash.update_key_val(99, "ghost");
    dash.update_key_val(1, "ok");
    feeder.key(QUIT);
    joiner.join().unwrap();

    // Only the known field produced a frame flush.
    assert_eq!(handle.shows(), 1);
    assert!(handle.row_text(0).starts_with("Known"));
}

#[test]
fn timestamped_log_lines_carry_a_clock_prefix() {
    let dash = Arc::new(Dashboard::new());
    dash.register_line(3, 0, 0, 2, Some("%H:%M:%S "));
    let (handle, feeder, joiner) = start(&dash, 40, 4);

    dash.update_line(3, "started");
    feeder.key(QUIT);
    joiner.join().unwrap();

    let row = handle.row_text(0);
    assert_eq!(&row[2..3], ":");
    assert_eq!(&row[5..6], ":");
    assert_eq!(&row[9..16], "started");
}

// ══════════════════════════════════════════════════════════════════
// Section 2: repaint and resize
// ══════════════════════════════════════════════════════════════════

#[test]
fn resize_repaints_banners_without_producer_resubmission() {
    let dash = Arc::new(Dashboard::new());
    dash.register_header(1, 0, 0, 20, "ab\tcd\tef");
    dash.register_key_val(2, 0, 2, 20, "Count");
    let (handle, feeder, joiner) = start(&dash, 40, 6);

    dash.update_key_val(2, "7");
    // Initial banner frame + one field frame.
    wait_until("first two frames", || handle.shows() >= 2);

    // A real resize invalidates all previously flushed content.
    handle.clear();
    feeder.resize();
    feeder.key(QUIT);
    joiner.join().unwrap();

    assert_eq!(&handle.row_text(0)[..20], "ab       cd       ef");
    // Key/value content is not cached, so its row stays blank until the
    // producer submits again.
    assert_eq!(handle.row_text(2).trim_end(), "");
    assert_eq!(handle.syncs(), 1);
}

#[test]
fn refresh_chord_forces_full_sync() {
    let dash = Arc::new(Dashboard::new());
    dash.register_header_line(1, 0, 0, 20, "\t status ");
    let (handle, feeder, joiner) = start(&dash, 40, 4);

    feeder.refresh();
    feeder.key(QUIT);
    joiner.join().unwrap();

    assert_eq!(handle.syncs(), 1);
    let row: String = handle.row_text(0).chars().take(20).collect();
    assert!(row.contains(" status "));
    assert!(row.starts_with('─'));
}

// ══════════════════════════════════════════════════════════════════
// Section 3: lifecycle
// ══════════════════════════════════════════════════════════════════

#[test]
fn quit_rune_stops_loop_and_flips_flags() {
    let dash = Arc::new(Dashboard::new());
    dash.register_key_val(1, 0, 0, 20, "Count");

    assert!(!dash.active());
    assert!(dash.updateable());

    let (_handle, feeder, joiner) = start(&dash, 40, 4);
    wait_until("renderer start", || dash.active());

    feeder.key(QUIT);
    joiner.join().unwrap();

    assert!(!dash.active());
    assert!(!dash.updateable());
}

#[test]
fn late_updates_never_panic_and_are_counted() {
    let dash = Arc::new(Dashboard::new());
    dash.register_key_val(1, 0, 0, 20, "Count");
    let (_handle, feeder, joiner) = start(&dash, 40, 4);

    feeder.key(QUIT);
    joiner.join().unwrap();

    dash.update_key_val(1, "too late");
    dash.update_line(1, "also too late");
    assert_eq!(dash.dropped_updates(), 2);
}

#[test]
fn concurrent_producers_all_land_before_shutdown() {
    let dash = Arc::new(Dashboard::new());
    for id in 0..4u32 {
        dash.register_key_val(id, 0, u16::try_from(id).unwrap(), 20, format!("P{id}"));
    }
    let (handle, feeder, joiner) = start(&dash, 40, 8);

    let producers: Vec<_> = (0..4u32)
        .map(|id| {
            let dash = Arc::clone(&dash);
            thread::spawn(move || {
                for n in 0..50 {
                    dash.update_key_val(id, n.to_string());
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }

    feeder.key(QUIT);
    joiner.join().unwrap();

    for id in 0..4u16 {
        assert_eq!(&handle.row_text(id)[..20], format!("P{id} .............. 49"));
    }
}

#[test]
fn second_run_while_active_is_rejected() {
    let dash = Arc::new(Dashboard::new());
    let (_handle, feeder, joiner) = start(&dash, 40, 4);
    wait_until("renderer start", || dash.active());

    let surface = MemorySurface::new(10, 2);
    let (_feeder2, events2) = scripted_events();
    let err = dash.run(surface, events2, &[QUIT]).unwrap_err();
    assert_eq!(err.code(), "TD-1003");

    feeder.key(QUIT);
    joiner.join().unwrap();
}
