//! Convenience re-exports for dashboard consumers.
//!
//! ```rust,no_run
//! use termdash::prelude::*;
//! ```

pub use crate::dashboard::{Dashboard, DashboardConfig};
pub use crate::errors::{DashError, Result};
pub use crate::field::FieldId;
pub use crate::surface::{CrosstermEvents, CrosstermSurface, EventSource, Surface, SurfaceEvent};
pub use crate::theme::{CellStyle, ColorMode, Palette};
