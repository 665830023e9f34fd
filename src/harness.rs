//! Headless surface and scripted event source for deterministic tests.
//!
//! Drives the registry/channel/renderer pipeline without a real terminal —
//! no PTY, no timing dependencies. The dashboard runs exactly as in
//! production with the crossterm backend swapped out.

#![allow(missing_docs)]

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::Mutex;

use crate::surface::{CellGrid, EventSource, Surface, SurfaceEvent};
use crate::theme::CellStyle;

// ──────────────────── memory surface ────────────────────

struct MemoryState {
    grid: CellGrid,
    shows: u64,
    syncs: u64,
}

/// In-memory [`Surface`] with a fixed size.
pub struct MemorySurface {
    inner: Arc<Mutex<MemoryState>>,
}

/// Cloneable view of a [`MemorySurface`]'s grid and flush counters, usable
/// while the surface itself is owned by a running dashboard.
#[derive(Clone)]
pub struct SurfaceHandle {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemorySurface {
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryState {
                grid: CellGrid::new(width, height),
                shows: 0,
                syncs: 0,
            })),
        }
    }

    #[must_use]
    pub fn handle(&self) -> SurfaceHandle {
        SurfaceHandle {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Surface for MemorySurface {
    fn size(&self) -> (u16, u16) {
        self.inner.lock().grid.size()
    }

    fn set_cell(&mut self, x: u16, y: u16, ch: char, style: CellStyle) {
        self.inner.lock().grid.set(x, y, ch, style);
    }

    fn show(&mut self) -> std::io::Result<()> {
        self.inner.lock().shows += 1;
        Ok(())
    }

    fn sync(&mut self) -> std::io::Result<()> {
        self.inner.lock().syncs += 1;
        Ok(())
    }
}

impl SurfaceHandle {
    /// Full row text, trailing blanks included.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        self.inner.lock().grid.row_text(y)
    }

    #[must_use]
    pub fn cell(&self, x: u16, y: u16) -> Option<(char, CellStyle)> {
        self.inner.lock().grid.get(x, y)
    }

    /// Snapshot of every row, top to bottom.
    #[must_use]
    pub fn rows(&self) -> Vec<String> {
        let state = self.inner.lock();
        let (_, height) = state.grid.size();
        (0..height).map(|y| state.grid.row_text(y)).collect()
    }

    #[must_use]
    pub fn shows(&self) -> u64 {
        self.inner.lock().shows
    }

    #[must_use]
    pub fn syncs(&self) -> u64 {
        self.inner.lock().syncs
    }

    /// Blank the grid, simulating terminal content loss (what a real resize
    /// does to previously flushed frames).
    pub fn clear(&self) {
        self.inner.lock().grid.clear();
    }
}

// ──────────────────── scripted events ────────────────────

/// Scripted [`EventSource`] fed from a test thread. The source ends when the
/// last [`EventFeeder`] is dropped.
pub struct ScriptedEvents {
    rx: Receiver<SurfaceEvent>,
}

/// Feeder half of [`scripted_events`].
#[derive(Clone)]
pub struct EventFeeder {
    tx: Sender<SurfaceEvent>,
}

#[must_use]
pub fn scripted_events() -> (EventFeeder, ScriptedEvents) {
    let (tx, rx) = unbounded();
    (EventFeeder { tx }, ScriptedEvents { rx })
}

impl EventSource for ScriptedEvents {
    fn next_event(&mut self) -> Option<SurfaceEvent> {
        self.rx.recv().ok()
    }
}

impl EventFeeder {
    pub fn key(&self, ch: char) {
        let _ = self.tx.send(SurfaceEvent::Key(ch));
    }

    pub fn refresh(&self) {
        let _ = self.tx.send(SurfaceEvent::Refresh);
    }

    pub fn resize(&self) {
        let _ = self.tx.send(SurfaceEvent::Resize);
    }
}
