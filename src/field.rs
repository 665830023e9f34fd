//! Field descriptors and the rolling-log ring buffer.
//!
//! A field is one registered screen element. Geometry is fixed at
//! registration; the only state the renderer mutates afterwards is a rolling
//! log's ring and its recorded timestamp-prefix length.

use std::collections::HashMap;

/// Application-chosen field identifier. Re-registering an id overwrites the
/// prior descriptor.
pub type FieldId = u32;

/// Registry guarded by the dashboard's single field mutex.
pub(crate) type FieldMap = HashMap<FieldId, Field>;

/// One registered screen element.
///
/// `width == 0` extends the field to the screen's right edge; a negative
/// `width` ends the field that many columns before the right edge. Off-screen
/// geometry is never rejected — rows are clipped at render time.
#[derive(Debug, Clone)]
pub(crate) struct Field {
    pub(crate) x: u16,
    pub(crate) y: u16,
    pub(crate) width: i32,
    pub(crate) kind: FieldKind,
}

/// Kind-specific rendering rule and mutable state.
#[derive(Debug, Clone)]
pub(crate) enum FieldKind {
    /// `label`, dot fill, right-aligned value.
    KeyValue { label: String },
    /// Tab-delimited 2- or 3-segment banner, gaps blank-filled.
    Banner { template: String },
    /// Like `Banner`, but gaps are drawn as a horizontal rule.
    Rule { template: String },
    /// Ring of the most recent lines, optionally timestamp-prefixed.
    /// `prefix_len` records the rendered byte length of the latest prefix.
    RollingLog {
        ring: LineRing,
        timestamp_format: Option<String>,
        prefix_len: usize,
    },
}

impl Field {
    pub(crate) fn key_value(x: u16, y: u16, width: i32, label: String) -> Self {
        Self {
            x,
            y,
            width,
            kind: FieldKind::KeyValue { label },
        }
    }

    pub(crate) fn banner(x: u16, y: u16, width: i32, template: String) -> Self {
        Self {
            x,
            y,
            width,
            kind: FieldKind::Banner { template },
        }
    }

    pub(crate) fn rule(x: u16, y: u16, width: i32, template: String) -> Self {
        Self {
            x,
            y,
            width,
            kind: FieldKind::Rule { template },
        }
    }

    pub(crate) fn rolling_log(
        x: u16,
        y: u16,
        line_count: usize,
        timestamp_format: Option<String>,
    ) -> Self {
        Self {
            x,
            y,
            width: 0,
            kind: FieldKind::RollingLog {
                ring: LineRing::new(line_count),
                timestamp_format,
                prefix_len: 0,
            },
        }
    }
}

// ──────────────────── rolling-log ring ────────────────────

/// Fixed-capacity ring of the most recent text lines.
///
/// Invariants: `capacity >= 1`; after `n` total pushes, `filled()` equals
/// `min(n, capacity)` and `write_pos()` equals `n % capacity`.
#[derive(Debug, Clone)]
pub(crate) struct LineRing {
    lines: Vec<String>,
    capacity: usize,
    write_pos: usize,
}

impl LineRing {
    /// A requested capacity of zero is clamped to one; registration never
    /// reports errors.
    pub(crate) fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: Vec::with_capacity(capacity),
            capacity,
            write_pos: 0,
        }
    }

    pub(crate) const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of occupied slots.
    pub(crate) fn filled(&self) -> usize {
        self.lines.len()
    }

    #[cfg(test)]
    pub(crate) const fn write_pos(&self) -> usize {
        self.write_pos
    }

    pub(crate) fn push(&mut self, line: String) {
        if self.lines.len() < self.capacity {
            self.lines.push(line);
        } else {
            self.lines[self.write_pos] = line;
        }
        self.write_pos = (self.write_pos + 1) % self.capacity;
    }

    /// Occupied lines, oldest first.
    pub(crate) fn iter_chronological(&self) -> impl Iterator<Item = &str> {
        let len = self.lines.len();
        let start = if len < self.capacity { 0 } else { self.write_pos };
        (0..len).map(move |i| self.lines[(start + i) % self.capacity].as_str())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn ring_fills_then_wraps() {
        let mut ring = LineRing::new(3);
        for line in ["a", "b", "c", "d"] {
            ring.push(line.to_string());
        }
        assert_eq!(ring.filled(), 3);
        assert_eq!(ring.write_pos(), 1);
        let rows: Vec<&str> = ring.iter_chronological().collect();
        assert_eq!(rows, ["b", "c", "d"]);
    }

    #[test]
    fn ring_partial_fill_keeps_submission_order() {
        let mut ring = LineRing::new(5);
        ring.push("first".to_string());
        ring.push("second".to_string());
        assert_eq!(ring.filled(), 2);
        let rows: Vec<&str> = ring.iter_chronological().collect();
        assert_eq!(rows, ["first", "second"]);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut ring = LineRing::new(0);
        assert_eq!(ring.capacity(), 1);
        ring.push("only".to_string());
        ring.push("newer".to_string());
        let rows: Vec<&str> = ring.iter_chronological().collect();
        assert_eq!(rows, ["newer"]);
    }

    proptest! {
        #[test]
        fn ring_invariants_hold_for_any_push_sequence(
            capacity in 1usize..8,
            pushes in 0usize..40,
        ) {
            let mut ring = LineRing::new(capacity);
            for n in 0..pushes {
                ring.push(n.to_string());
            }
            prop_assert_eq!(ring.filled(), pushes.min(capacity));
            prop_assert_eq!(ring.write_pos(), pushes % capacity);

            // Chronological view is the last `filled` pushes in order.
            let rows: Vec<String> =
                ring.iter_chronological().map(str::to_string).collect();
            let expected: Vec<String> = (pushes.saturating_sub(ring.filled())..pushes)
                .map(|n| n.to_string())
                .collect();
            prop_assert_eq!(rows, expected);
        }
    }
}
