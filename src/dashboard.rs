//! The dashboard instance: field registry, update channel, lifecycle flags,
//! and the public producer/renderer API.
//!
//! Concurrency model: arbitrarily many producer threads call `update_*`
//! (fire-and-forget; a full buffer applies backpressure), one input listener
//! thread feeds control events, and the thread that calls [`Dashboard::run`]
//! owns the renderer loop — the only code that mutates field state or writes
//! to the surface. Coordination happens solely through the bounded update
//! channel and two independently guarded lifecycle booleans.
//!
//! Overlapping fields are not arbitrated: cells are written in event order
//! and the last writer wins.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use crossbeam_channel::{Receiver, Sender, bounded};
use parking_lot::Mutex;

use crate::errors::{DashError, Result};
use crate::event::{CHANNEL_CAPACITY, UpdateEvent};
use crate::field::{Field, FieldId, FieldMap};
use crate::input;
use crate::render::{Applied, Renderer};
use crate::surface::{CrosstermEvents, CrosstermSurface, EventSource, Surface};
use crate::theme::Palette;

/// Runtime knobs shared by every component of one dashboard instance.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Bounded capacity of the update channel. Producers block when it is
    /// full; values below one are clamped.
    pub channel_capacity: usize,
    /// Style set for rendered cells.
    pub palette: Palette,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            channel_capacity: CHANNEL_CAPACITY,
            palette: Palette::default(),
        }
    }
}

/// A live, concurrently updated terminal dashboard.
///
/// Register fields up front, hand the instance (typically in an `Arc`) to
/// producer threads, then call [`Dashboard::run`] — it blocks until a quit
/// rune arrives. Producers poll [`Dashboard::updateable`] to decide whether
/// to keep generating updates; calls made after shutdown are counted and
/// dropped, never an error.
pub struct Dashboard {
    fields: Mutex<FieldMap>,
    tx: Sender<UpdateEvent>,
    // Kept alongside the sender so producer sends can never observe a
    // disconnected channel; late sends park in the bounded buffer.
    rx: Receiver<UpdateEvent>,
    running: Mutex<bool>,
    updateable: Mutex<bool>,
    dropped: AtomicU64,
    palette: Palette,
}

impl Dashboard {
    /// Dashboard with the default channel capacity and palette.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DashboardConfig::default())
    }

    /// Dashboard with explicit runtime knobs.
    #[must_use]
    pub fn with_config(config: DashboardConfig) -> Self {
        let (tx, rx) = bounded(config.channel_capacity.max(1));
        Self {
            fields: Mutex::new(FieldMap::new()),
            tx,
            rx,
            running: Mutex::new(false),
            updateable: Mutex::new(true),
            dropped: AtomicU64::new(0),
            palette: config.palette,
        }
    }

    // ──────────────────── registration ────────────────────

    /// Register a key/value row of `width` columns at `(x, y)` with the
    /// static key `label`. Safe to call from any thread, including while the
    /// dashboard is running; re-registering an id replaces the field.
    pub fn register_key_val(
        &self,
        id: FieldId,
        x: u16,
        y: u16,
        width: i32,
        label: impl Into<String>,
    ) {
        self.register(id, Field::key_value(x, y, width, label.into()));
    }

    /// Register a banner row. `template` holds up to three tab-delimited
    /// segments laid out left/center/right; gaps are blank-filled. A `width`
    /// of zero runs to the screen's right edge, a negative width stops that
    /// many columns before it.
    pub fn register_header(
        &self,
        id: FieldId,
        x: u16,
        y: u16,
        width: i32,
        template: impl Into<String>,
    ) {
        self.register(id, Field::banner(x, y, width, template.into()));
    }

    /// Register a divider banner: like [`Dashboard::register_header`] but
    /// the gaps are drawn as a horizontal rule.
    pub fn register_header_line(
        &self,
        id: FieldId,
        x: u16,
        y: u16,
        width: i32,
        template: impl Into<String>,
    ) {
        self.register(id, Field::rule(x, y, width, template.into()));
    }

    /// Register a rolling log pane occupying `line_count` rows below
    /// `(x, y)`. With a `timestamp_format` (chrono syntax), each submitted
    /// line is prefixed with the formatted current time.
    pub fn register_line(
        &self,
        id: FieldId,
        x: u16,
        y: u16,
        line_count: usize,
        timestamp_format: Option<&str>,
    ) {
        self.register(
            id,
            Field::rolling_log(x, y, line_count, timestamp_format.map(str::to_string)),
        );
    }

    fn register(&self, id: FieldId, field: Field) {
        self.fields.lock().insert(id, field);
    }

    // ──────────────────── producer surface ────────────────────

    /// Update the value of a key/value field. Fire-and-forget: never blocks
    /// on rendering, never returns an error. Unknown ids are dropped by the
    /// renderer.
    pub fn update_key_val(&self, id: FieldId, value: impl Into<String>) {
        self.push_update(id, value.into());
    }

    /// Append a line to a rolling log field. Same delivery contract as
    /// [`Dashboard::update_key_val`].
    pub fn update_line(&self, id: FieldId, line: impl Into<String>) {
        self.push_update(id, line.into());
    }

    fn push_update(&self, id: FieldId, text: String) {
        if !self.updateable() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            log::trace!("update for field {id} dropped after stop");
            return;
        }
        // The receiver lives in `self`, so the send can only block on a full
        // buffer (intentional backpressure), never fail.
        let _ = self.tx.send(UpdateEvent::Field { id, text });
    }

    // ──────────────────── lifecycle ────────────────────

    /// True while the renderer loop is executing.
    #[must_use]
    pub fn active(&self) -> bool {
        *self.running.lock()
    }

    /// True while producers should keep issuing updates. Flips to false the
    /// moment the renderer consumes the stop event.
    #[must_use]
    pub fn updateable(&self) -> bool {
        *self.updateable.lock()
    }

    /// Number of updates refused because the dashboard had already stopped.
    #[must_use]
    pub fn dropped_updates(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Run the dashboard over an arbitrary surface/event-source pair.
    ///
    /// Spawns the input listener, then drains the update channel in the
    /// calling thread until a rune from `quit_runes` (or the end of the
    /// event stream) produces the stop event. Events enqueued before the
    /// call are applied first, in order.
    ///
    /// # Errors
    /// Fails if a run is already in progress or the listener thread cannot
    /// be spawned. Rendering itself is best-effort and never errors.
    pub fn run<S, E>(&self, mut surface: S, events: E, quit_runes: &[char]) -> Result<()>
    where
        S: Surface,
        E: EventSource + Send + 'static,
    {
        {
            let mut running = self.running.lock();
            if *running {
                return Err(DashError::Runtime {
                    details: "dashboard is already running".into(),
                });
            }
            *running = true;
        }
        *self.updateable.lock() = true;

        let quit: HashSet<char> = quit_runes.iter().copied().collect();
        let tx = self.tx.clone();
        let listener = thread::Builder::new()
            .name("termdash-input".into())
            .spawn(move || input::listen(events, &tx, &quit));
        let listener = match listener {
            Ok(handle) => handle,
            Err(err) => {
                *self.running.lock() = false;
                return Err(DashError::Runtime {
                    details: format!("failed to spawn input listener: {err}"),
                });
            }
        };

        log::debug!("dashboard renderer loop started");
        let mut renderer = Renderer::new(&mut surface, &self.fields, self.palette);
        renderer.initial_paint();
        loop {
            let Ok(event) = self.rx.recv() else { break };
            if renderer.apply(event) == Applied::Stopped {
                *self.updateable.lock() = false;
                break;
            }
        }
        *self.running.lock() = false;
        log::debug!(
            "dashboard renderer loop stopped ({} late updates dropped)",
            self.dropped_updates()
        );
        let _ = listener.join();
        Ok(())
    }

    /// Run over the real terminal: raw mode, alternate screen, hidden
    /// cursor, restored on return.
    ///
    /// # Errors
    /// Returns [`DashError::TerminalInit`] when the terminal cannot be set
    /// up; nothing is rendered in that case.
    pub fn run_terminal(&self, quit_runes: &[char]) -> Result<()> {
        let surface =
            CrosstermSurface::new().map_err(|source| DashError::TerminalInit { source })?;
        self.run(surface, CrosstermEvents, quit_runes)
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}
