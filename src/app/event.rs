//! Terminal event abstraction.
//!
//! Wraps crossterm events into a simpler enum and runs a background task that
//! forwards them over a channel so the main loop stays non-blocking.  The
//! delayed entrance start reports through the same channel.

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    /// The entrance startup delay elapsed.
    EntranceStart,
}

/// Spawns a blocking reader that polls the terminal and forwards events
/// through `tx`.  Exits once the receiver is dropped.
pub fn spawn_event_reader(tx: mpsc::UnboundedSender<AppEvent>, poll_rate: Duration) {
    tokio::task::spawn_blocking(move || loop {
        if tx.is_closed() {
            break;
        }
        // Poll with a timeout so a dropped receiver is noticed promptly.
        if !event::poll(poll_rate).unwrap_or(false) {
            continue;
        }
        let Ok(ev) = event::read() else {
            continue;
        };
        let app_event = match ev {
            CtEvent::Key(k) => AppEvent::Key(k),
            CtEvent::Mouse(m) => AppEvent::Mouse(m),
            CtEvent::Resize(w, h) => AppEvent::Resize(w, h),
            _ => continue,
        };
        if tx.send(app_event).is_err() {
            break; // receiver dropped
        }
    });
}

/// Pending entrance start.  Sends [`AppEvent::EntranceStart`] after the
/// delay; dropping the guard cancels it.
#[derive(Debug)]
pub struct DelayedStart {
    handle: JoinHandle<()>,
}

impl DelayedStart {
    pub fn spawn(delay: Duration, tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // A closed channel means the UI is gone; nothing to start.
            if tx.send(AppEvent::EntranceStart).is_err() {
                tracing::debug!("entrance start dropped after teardown");
            }
        });
        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for DelayedStart {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
