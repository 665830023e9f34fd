//! Renderer state machine: applies queued events to fields and paints rows.
//!
//! The renderer is the sole mutator of field state and the sole writer to
//! the surface. Key/value rows use an exact-fit dot layout with an overflow
//! fallback; banner rows distribute up to three template segments across the
//! field width; rolling logs redraw their whole window on every update so
//! stale runes from a longer previous line never survive.

#![allow(clippy::cast_possible_truncation)]

use std::fmt::Write as _;

use parking_lot::Mutex;

use crate::event::UpdateEvent;
use crate::field::{FieldId, FieldKind, FieldMap, LineRing};
use crate::surface::Surface;
use crate::theme::{CellStyle, Palette};

/// Widest renderable field row.
pub(crate) const MAX_FIELD_WIDTH: usize = 256;
/// Key/value separator fill.
const DOT: char = '.';
/// Indicator run for key/value content that cannot fit its field.
const OVERFLOW: char = '◆';
/// Gap fill for rule fields.
const RULE_LINE: char = '─';
/// Suffix marking a truncated rolling-log row.
const ELLIPSIS: &str = "..";

/// Outcome of applying one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Applied {
    Continue,
    Stopped,
}

// ──────────────────── renderer ────────────────────

pub(crate) struct Renderer<'a, S: Surface> {
    surface: &'a mut S,
    fields: &'a Mutex<FieldMap>,
    palette: Palette,
}

impl<'a, S: Surface> Renderer<'a, S> {
    pub(crate) fn new(surface: &'a mut S, fields: &'a Mutex<FieldMap>, palette: Palette) -> Self {
        Self {
            surface,
            fields,
            palette,
        }
    }

    /// First frame: banner/rule fields are the only content that exists
    /// before any producer update arrives.
    pub(crate) fn initial_paint(&mut self) {
        if self.paint_banners() > 0
            && let Err(err) = self.surface.show()
        {
            log::warn!("initial frame flush failed: {err}");
        }
    }

    /// Apply one queued event; returns whether the loop should continue.
    pub(crate) fn apply(&mut self, event: UpdateEvent) -> Applied {
        match event {
            UpdateEvent::Repaint => {
                self.paint_banners();
                if let Err(err) = self.surface.sync() {
                    log::warn!("full-screen sync failed: {err}");
                }
                Applied::Continue
            }
            UpdateEvent::Stop => Applied::Stopped,
            UpdateEvent::Field { id, text } => {
                self.apply_field(id, text);
                Applied::Continue
            }
        }
    }

    fn apply_field(&mut self, id: FieldId, text: String) {
        let palette = self.palette;
        let mut map = self.fields.lock();
        let Some(field) = map.get_mut(&id) else {
            log::trace!("update for unregistered field {id} dropped");
            return;
        };
        let (x, y, width) = (field.x, field.y, field.width);
        match &mut field.kind {
            FieldKind::KeyValue { label } => {
                key_value(&mut *self.surface, &palette, x, y, width, label, &text);
            }
            FieldKind::RollingLog {
                ring,
                timestamp_format,
                prefix_len,
            } => {
                let line = match timestamp_format {
                    Some(format) => {
                        let prefix = render_timestamp(format);
                        *prefix_len = prefix.len();
                        prefix + &text
                    }
                    None => text,
                };
                ring.push(line);
                rolling_rows(&mut *self.surface, palette.log, x, y, ring);
            }
            // Banner content is fixed at registration; producer updates
            // addressed to one are a no-op.
            FieldKind::Banner { .. } | FieldKind::Rule { .. } => return,
        }
        drop(map);
        if let Err(err) = self.surface.show() {
            log::warn!("frame flush failed: {err}");
        }
    }

    /// Paint every banner/rule field from its stored template; returns how
    /// many were painted.
    pub(crate) fn paint_banners(&mut self) -> usize {
        let palette = self.palette;
        let map = self.fields.lock();
        let mut painted = 0;
        for field in map.values() {
            match &field.kind {
                FieldKind::Banner { template } => {
                    banner_row(
                        &mut *self.surface,
                        palette.banner,
                        ' ',
                        palette.banner,
                        field.x,
                        field.y,
                        field.width,
                        template,
                    );
                    painted += 1;
                }
                FieldKind::Rule { template } => {
                    banner_row(
                        &mut *self.surface,
                        palette.banner,
                        RULE_LINE,
                        palette.rule,
                        field.x,
                        field.y,
                        field.width,
                        template,
                    );
                    painted += 1;
                }
                _ => {}
            }
        }
        painted
    }
}

// ──────────────────── row painters ────────────────────

/// Write runs of text left to right from `x`, clipping at column `clip`.
fn put<S: Surface>(
    surface: &mut S,
    style: CellStyle,
    x: usize,
    y: usize,
    clip: usize,
    parts: &[&str],
) {
    if y > usize::from(u16::MAX) {
        return;
    }
    let mut col = x;
    for part in parts {
        for ch in part.chars() {
            if col >= clip {
                return;
            }
            surface.set_cell(col as u16, y as u16, ch, style);
            col += 1;
        }
    }
}

/// Resolve a declared width against the screen: `0` runs to the right edge,
/// a negative width ends that many columns before it.
pub(crate) fn resolve_width(x: usize, width: i32, screen_w: usize) -> usize {
    let left = x as i64;
    let right = if width <= 0 {
        screen_w as i64 + i64::from(width)
    } else {
        left + i64::from(width)
    };
    if right <= left { 0 } else { (right - left) as usize }
}

/// `label + dot-fill + value`, exact fit, or a full-width overflow run when
/// label, value, and the two surrounding spaces cannot fit.
pub(crate) fn key_value<S: Surface>(
    surface: &mut S,
    palette: &Palette,
    x: u16,
    y: u16,
    width: i32,
    label: &str,
    value: &str,
) {
    let (screen_w, _) = surface.size();
    let screen_w = usize::from(screen_w);
    let x = usize::from(x);
    let y = usize::from(y);
    let wd = resolve_width(x, width, screen_w).min(MAX_FIELD_WIDTH);
    let key_len = label.chars().count();
    let val_len = value.chars().count();
    if key_len + val_len + 4 <= wd {
        let fill: String = std::iter::repeat_n(DOT, wd - 2 - key_len - val_len).collect();
        put(surface, palette.key, x, y, screen_w, &[label, " ", &fill, " "]);
        put(surface, palette.value, x + wd - val_len, y, screen_w, &[value]);
    } else {
        let run: String = std::iter::repeat_n(OVERFLOW, wd).collect();
        put(surface, palette.key, x, y, screen_w, &[&run]);
    }
}

/// Split a tab-delimited template into exactly three segments, padding with
/// empty segments when fewer were supplied.
pub(crate) fn split_segments(template: &str) -> [&str; 3] {
    let mut parts = template.split('\t');
    [
        parts.next().unwrap_or(""),
        parts.next().unwrap_or(""),
        parts.next().unwrap_or(""),
    ]
}

/// Distribute the slack between segment lengths and the field width across
/// the two inter-segment gaps: at least one column each, the left gap taking
/// the odd column.
pub(crate) fn banner_gaps(total: usize, seg_total: usize) -> (usize, usize) {
    let gap = total.saturating_sub(seg_total);
    if gap < 2 {
        return (1, 1);
    }
    (gap - gap / 2, gap / 2)
}

/// Three-segment banner row. `gap_ch`/`gap_style` select between blank fill
/// (header) and a horizontal rule (divider).
#[allow(clippy::too_many_arguments)]
pub(crate) fn banner_row<S: Surface>(
    surface: &mut S,
    seg_style: CellStyle,
    gap_ch: char,
    gap_style: CellStyle,
    x: u16,
    y: u16,
    width: i32,
    template: &str,
) {
    let (screen_w, _) = surface.size();
    let screen_w = usize::from(screen_w);
    let x = usize::from(x);
    let y = usize::from(y);
    let wd = resolve_width(x, width, screen_w);
    if wd == 0 {
        return;
    }
    let [a, b, c] = split_segments(template);
    let seg_total = a.chars().count() + b.chars().count() + c.chars().count();
    let (left_gap, right_gap) = banner_gaps(wd, seg_total);
    let clip = screen_w.min(x + wd);

    let left_fill: String = std::iter::repeat_n(gap_ch, left_gap).collect();
    let right_fill: String = std::iter::repeat_n(gap_ch, right_gap).collect();

    let mut col = x;
    put(surface, seg_style, col, y, clip, &[a]);
    col += a.chars().count();
    put(surface, gap_style, col, y, clip, &[&left_fill]);
    col += left_gap;
    put(surface, seg_style, col, y, clip, &[b]);
    col += b.chars().count();
    put(surface, gap_style, col, y, clip, &[&right_fill]);
    col += right_gap;
    put(surface, seg_style, col, y, clip, &[c]);
}

/// Redraw every occupied rolling-log row, oldest on top. Rows that fit are
/// blank-padded to the screen's right edge; rows that overflow lose their
/// tail to a two-column ellipsis marker.
pub(crate) fn rolling_rows<S: Surface>(
    surface: &mut S,
    style: CellStyle,
    x: u16,
    y: u16,
    ring: &LineRing,
) {
    let (screen_w, _) = surface.size();
    let screen_w = usize::from(screen_w);
    let left = usize::from(x);
    for (j, line) in ring.iter_chronological().enumerate() {
        let top = usize::from(y) + j;
        let len = line.chars().count();
        if left + len <= screen_w {
            let pad: String = std::iter::repeat_n(' ', screen_w - len - left).collect();
            put(surface, style, left, top, screen_w, &[line, &pad]);
        } else {
            let keep = screen_w.saturating_sub(left + ELLIPSIS.len());
            let cut: String = line.chars().take(keep).collect();
            put(surface, style, left, top, screen_w, &[&cut, ELLIPSIS]);
        }
    }
}

/// Format the current local time, tolerating bad format strings with an
/// empty prefix rather than surfacing an error mid-render.
fn render_timestamp(format: &str) -> String {
    let mut prefix = String::new();
    if write!(prefix, "{}", chrono::Local::now().format(format)).is_err() {
        prefix.clear();
    }
    prefix
}
