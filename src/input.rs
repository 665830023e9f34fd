//! Input listener: translates terminal events into control events.

use std::collections::HashSet;

use crossbeam_channel::Sender;

use crate::event::UpdateEvent;
use crate::surface::{EventSource, SurfaceEvent};

/// Runs once per `Dashboard::run` invocation, on its own thread.
///
/// Resize notifications and the redraw chord become `Repaint` events on the
/// shared update channel, preserving order relative to concurrent producer
/// updates. A rune in `quit` (or the end of the event stream) ends the
/// listener; the final event it enqueues is always exactly one `Stop`, and
/// nothing follows it.
pub(crate) fn listen<E: EventSource>(
    mut events: E,
    tx: &Sender<UpdateEvent>,
    quit: &HashSet<char>,
) {
    loop {
        match events.next_event() {
            Some(SurfaceEvent::Key(ch)) if quit.contains(&ch) => break,
            Some(SurfaceEvent::Refresh | SurfaceEvent::Resize) => {
                if tx.send(UpdateEvent::Repaint).is_err() {
                    break;
                }
            }
            // Remaining input is reserved for future field kinds.
            Some(SurfaceEvent::Key(_)) => {}
            None => break,
        }
    }
    let _ = tx.send(UpdateEvent::Stop);
    log::debug!("input listener stopped");
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;

    use super::*;
    use crate::harness::scripted_events;

    fn quit_set(runes: &[char]) -> HashSet<char> {
        runes.iter().copied().collect()
    }

    fn drain(rx: &crossbeam_channel::Receiver<UpdateEvent>) -> Vec<UpdateEvent> {
        let mut out = Vec::new();
        while let Ok(event) = rx.try_recv() {
            out.push(event);
        }
        out
    }

    #[test]
    fn resize_and_refresh_map_to_repaint_and_quit_ends_with_stop() {
        let (feeder, events) = scripted_events();
        feeder.resize();
        feeder.key('x');
        feeder.refresh();
        feeder.key('q');

        let (tx, rx) = bounded(16);
        listen(events, &tx, &quit_set(&['q']));

        assert_eq!(
            drain(&rx),
            [UpdateEvent::Repaint, UpdateEvent::Repaint, UpdateEvent::Stop]
        );
    }

    #[test]
    fn closed_event_stream_still_produces_stop() {
        let (feeder, events) = scripted_events();
        feeder.resize();
        drop(feeder);

        let (tx, rx) = bounded(16);
        listen(events, &tx, &quit_set(&['q']));

        assert_eq!(drain(&rx), [UpdateEvent::Repaint, UpdateEvent::Stop]);
    }

    #[test]
    fn escape_rune_in_quit_set_terminates_listener() {
        let (feeder, events) = scripted_events();
        feeder.key('\u{1b}');
        feeder.resize(); // never read

        let (tx, rx) = bounded(16);
        listen(events, &tx, &quit_set(&['q', '\u{1b}']));

        assert_eq!(drain(&rx), [UpdateEvent::Stop]);
    }
}
