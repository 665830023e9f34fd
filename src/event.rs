//! Update-channel event protocol.
//!
//! Every state change flows through one bounded channel: producer field
//! updates and internally generated control events share it, so the renderer
//! observes a single total order consistent with enqueue order. There is no
//! coalescing — a field updated faster than once per frame visibly passes
//! through every intermediate value.

use crate::field::FieldId;

/// Default bounded capacity for the update channel. Producers block when the
/// buffer is full; backpressure is intentional.
pub(crate) const CHANNEL_CAPACITY: usize = 256;

/// One queued dashboard mutation or control signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum UpdateEvent {
    /// Producer update addressed to a registered field. Unknown ids are
    /// silently dropped by the renderer.
    Field { id: FieldId, text: String },
    /// Re-render every banner/rule field and force a full-screen sync.
    /// Generated on resize and on the redraw chord.
    Repaint,
    /// Terminate the render loop. The input listener enqueues exactly one,
    /// as its final event.
    Stop,
}
