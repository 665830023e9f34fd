//! Live dashboard demo with randomized producer threads.
//!
//! Usage:
//!   cargo run --example monitor
//!
//! Registers a banner, two key/value rows, a timestamped rolling log, and a
//! divider, then updates them from three producer threads until q, Q, or
//! Esc is pressed. Ctrl-L forces a full repaint.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::Rng;
use termdash::prelude::*;

const BANNER_TOP: FieldId = 0;
const COUNT: FieldId = 1;
const LOG: FieldId = 2;
const DIVIDER: FieldId = 3;
const NAME: FieldId = 4;
const BANNER_BOTTOM: FieldId = 5;

fn count_ticker(dash: &Dashboard) {
    let mut n: u64 = 0;
    while dash.updateable() {
        n += 1;
        dash.update_key_val(COUNT, n.to_string());
        thread::sleep(Duration::from_millis(1000));
    }
}

fn name_picker(dash: &Dashboard) {
    let names = ["Shiawassee", "Prairie", "Natasha", "Tess", "Grant"];
    let mut rng = rand::rng();
    while dash.updateable() {
        dash.update_key_val(NAME, names[rng.random_range(0..names.len())]);
        thread::sleep(Duration::from_millis(750));
    }
}

fn log_writer(dash: &Dashboard) {
    let filler = "x".repeat(48);
    let mut rng = rand::rng();
    let mut n: u64 = 0;
    while dash.updateable() {
        n += 1;
        let width = rng.random_range(1..=filler.len());
        dash.update_line(LOG, format!("log line {n} {}", &filler[..width]));
        thread::sleep(Duration::from_millis(1250));
    }
}

fn main() -> Result<()> {
    let dash = Arc::new(Dashboard::new());

    dash.register_header(BANNER_TOP, 0, 0, 0, "\ttermdash demo");
    dash.register_key_val(COUNT, 1, 2, 40, "Count");
    dash.register_line(LOG, 1, 3, 5, Some("%H:%M:%S "));
    dash.register_header_line(DIVIDER, 1, 9, 40, "\t names ");
    dash.register_key_val(NAME, 1, 10, 40, "Name");
    dash.register_header(
        BANNER_BOTTOM,
        0,
        12,
        0,
        " demo \trunning\t press q to quit ",
    );

    for producer in [count_ticker, name_picker, log_writer] {
        let dash = Arc::clone(&dash);
        thread::spawn(move || producer(&dash));
    }

    dash.run_terminal(&['q', 'Q', '\u{1b}'])
}
