//! Terminal surface abstraction and the crossterm backend.
//!
//! The renderer addresses the terminal as a character grid: place a styled
//! rune at `(x, y)`, flush a frame, or replay the whole grid after a resize.
//! Input arrives as a blocking event stream. Both capabilities are traits so
//! the full pipeline runs headless in tests (see [`crate::harness`]).

#![allow(clippy::cast_possible_truncation)]

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Attribute, Print, SetAttribute, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};

use crate::theme::{CellStyle, ColorMode};

// ──────────────────── capability traits ────────────────────

/// Render-side capability: a character grid owned by one thread at a time.
pub trait Surface {
    /// Current size as (columns, rows).
    fn size(&self) -> (u16, u16);

    /// Place one styled rune. Out-of-bounds writes are ignored.
    fn set_cell(&mut self, x: u16, y: u16, ch: char, style: CellStyle);

    /// Flush one frame of queued cell writes.
    fn show(&mut self) -> io::Result<()>;

    /// Full-screen repaint: re-query the size and replay every cell. Used
    /// after resize, where all previously flushed content is invalid.
    fn sync(&mut self) -> io::Result<()>;
}

/// Input-side capability. `next_event` blocks until the terminal delivers
/// something; `None` means the event stream has ended.
pub trait EventSource {
    /// Next translated terminal event, or `None` once the stream is closed.
    fn next_event(&mut self) -> Option<SurfaceEvent>;
}

/// Terminal events after backend translation.
///
/// Control chords are folded into control runes so quit sets can name them:
/// `Esc` arrives as `'\u{1b}'` and `Ctrl-C` as `'\u{3}'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// A key press.
    Key(char),
    /// The redraw chord (`Ctrl-L`).
    Refresh,
    /// The terminal reported a new size.
    Resize,
}

// ──────────────────── cell grid ────────────────────

/// In-memory cell store. Backs `sync` replay in the crossterm surface and
/// the whole of the headless test surface.
#[derive(Debug, Clone)]
pub(crate) struct CellGrid {
    width: u16,
    height: u16,
    cells: Vec<(char, CellStyle)>,
}

impl CellGrid {
    pub(crate) fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![(' ', CellStyle::default()); usize::from(width) * usize::from(height)],
        }
    }

    pub(crate) const fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    /// Returns false when the write fell outside the grid.
    pub(crate) fn set(&mut self, x: u16, y: u16, ch: char, style: CellStyle) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = (ch, style);
                true
            }
            None => false,
        }
    }

    pub(crate) fn get(&self, x: u16, y: u16) -> Option<(char, CellStyle)> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Resize, preserving the overlapping region.
    pub(crate) fn resize(&mut self, width: u16, height: u16) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        let mut next = Self::new(width, height);
        for y in 0..self.height.min(height) {
            for x in 0..self.width.min(width) {
                if let Some((ch, style)) = self.get(x, y) {
                    next.set(x, y, ch, style);
                }
            }
        }
        *self = next;
    }

    /// Full row as text, including trailing blanks.
    pub(crate) fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y).map(|(ch, _)| ch))
            .collect()
    }

    fn cells(&self) -> impl Iterator<Item = (u16, u16, char, CellStyle)> + '_ {
        self.cells.iter().enumerate().map(|(idx, &(ch, style))| {
            let x = (idx % usize::from(self.width)) as u16;
            let y = (idx / usize::from(self.width)) as u16;
            (x, y, ch, style)
        })
    }

    /// Reset every cell to a blank, keeping the size.
    pub(crate) fn clear(&mut self) {
        self.cells.fill((' ', CellStyle::default()));
    }
}

// ──────────────────── crossterm surface ────────────────────

/// Crossterm-backed [`Surface`]: raw mode, alternate screen, hidden cursor.
///
/// Cell writes are queued into an in-memory buffer and hit the terminal on
/// `show`/`sync`. The grid mirror makes `sync` able to clear the screen and
/// replay everything after a resize. The terminal is restored on drop, even
/// on early error returns.
pub struct CrosstermSurface {
    out: io::Stdout,
    buf: Vec<u8>,
    grid: CellGrid,
    colors: ColorMode,
    last_style: Option<CellStyle>,
}

impl CrosstermSurface {
    /// Switch the terminal into dashboard mode.
    ///
    /// # Errors
    /// Returns the underlying I/O error if raw mode, the alternate screen,
    /// or the size query fails; anything already set up is rolled back.
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen, Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(err);
        }
        let (width, height) = match terminal::size() {
            Ok(dims) => dims,
            Err(err) => {
                let _ = execute!(out, LeaveAlternateScreen, Show);
                let _ = terminal::disable_raw_mode();
                return Err(err);
            }
        };
        Ok(Self {
            out,
            buf: Vec::with_capacity(4096),
            grid: CellGrid::new(width, height),
            colors: ColorMode::from_environment(),
            last_style: None,
        })
    }

    fn queue_style(&mut self, style: CellStyle) {
        if self.last_style == Some(style) {
            return;
        }
        // Writes into the Vec buffer cannot fail.
        let _ = queue!(self.buf, SetAttribute(Attribute::Reset));
        if style.bold {
            let _ = queue!(self.buf, SetAttribute(Attribute::Bold));
        }
        if self.colors == ColorMode::Enabled {
            let _ = queue!(self.buf, SetForegroundColor(style.fg));
        }
        self.last_style = Some(style);
    }
}

impl Surface for CrosstermSurface {
    fn size(&self) -> (u16, u16) {
        self.grid.size()
    }

    fn set_cell(&mut self, x: u16, y: u16, ch: char, style: CellStyle) {
        if !self.grid.set(x, y, ch, style) {
            return;
        }
        self.queue_style(style);
        let _ = queue!(self.buf, MoveTo(x, y), Print(ch));
    }

    fn show(&mut self) -> io::Result<()> {
        self.out.write_all(&self.buf)?;
        self.buf.clear();
        self.out.flush()
    }

    fn sync(&mut self) -> io::Result<()> {
        if let Ok((width, height)) = terminal::size() {
            self.grid.resize(width, height);
        }
        self.buf.clear();
        self.last_style = None;
        let _ = queue!(self.buf, Clear(ClearType::All));
        let cells: Vec<_> = self.grid.cells().filter(|&(_, _, ch, _)| ch != ' ').collect();
        for (x, y, ch, style) in cells {
            self.queue_style(style);
            let _ = queue!(self.buf, MoveTo(x, y), Print(ch));
        }
        self.show()
    }
}

impl Drop for CrosstermSurface {
    fn drop(&mut self) {
        let _ = execute!(self.out, LeaveAlternateScreen, Show);
        let _ = terminal::disable_raw_mode();
    }
}

// ──────────────────── crossterm events ────────────────────

/// Blocking [`EventSource`] over `crossterm::event::read`.
#[derive(Debug, Default)]
pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn next_event(&mut self) -> Option<SurfaceEvent> {
        loop {
            match crossterm::event::read() {
                Ok(Event::Key(key)) => {
                    if key.kind == KeyEventKind::Release {
                        continue;
                    }
                    if let Some(event) = translate_key(&key) {
                        return Some(event);
                    }
                }
                Ok(Event::Resize(..)) => return Some(SurfaceEvent::Resize),
                // Mouse, focus, and paste events are reserved for future
                // field kinds.
                Ok(_) => {}
                Err(_) => return None,
            }
        }
    }
}

fn translate_key(key: &KeyEvent) -> Option<SurfaceEvent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('l') => Some(SurfaceEvent::Refresh),
            KeyCode::Char('c') => Some(SurfaceEvent::Key('\u{3}')),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Esc => Some(SurfaceEvent::Key('\u{1b}')),
        KeyCode::Char(ch) => Some(SurfaceEvent::Key(ch)),
        _ => None,
    }
}
