#![forbid(unsafe_code)]

//! termdash — live, concurrently-updated terminal dashboard.
//!
//! Fields (key/value rows, banner headers, divider rules, rolling log panes)
//! are registered once and then refreshed continuously from any number of
//! producer threads, while a single renderer thread owns the terminal. All
//! state changes flow through one ordered, bounded update channel, so every
//! field passes through its intermediate values in submission order — no
//! coalescing, no debouncing.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::thread;
//! use std::time::Duration;
//!
//! use termdash::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let dash = Arc::new(Dashboard::new());
//!     dash.register_header(0, 0, 0, 0, "\tbuild monitor");
//!     dash.register_key_val(1, 1, 2, 40, "Jobs");
//!     dash.register_line(2, 1, 4, 5, Some("%H:%M:%S "));
//!
//!     let producer = Arc::clone(&dash);
//!     thread::spawn(move || {
//!         let mut n = 0u32;
//!         while producer.updateable() {
//!             n += 1;
//!             producer.update_key_val(1, n.to_string());
//!             producer.update_line(2, format!("job {n} finished"));
//!             thread::sleep(Duration::from_millis(500));
//!         }
//!     });
//!
//!     // Blocks until q, Q, or Esc.
//!     dash.run_terminal(&['q', 'Q', '\u{1b}'])
//! }
//! ```

pub mod prelude;

pub mod dashboard;
pub mod errors;
pub mod harness;
pub mod surface;
pub mod theme;

mod event;
mod field;
mod input;
mod render;

pub use field::FieldId;
