//! # Notification Controller
//!
//! Holds at most one transient message per screen.
//!
//! - **Success** messages count down: every [`COUNTDOWN_TICK`] the progress
//!   drops by `100 / COUNTDOWN_TICKS` and the message clears itself when it
//!   reaches zero.
//! - **Error** messages stay until dismissed or until the user edits a field.
//!
//! Each notification gets a fresh generation number. The countdown runs on a
//! [`ScopedTimer`] owned by the center, so replacing or dismissing a message
//! aborts the old countdown, and ticks that were already queued are ignored
//! because their generation no longer matches.

use crate::timer::ScopedTimer;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

pub const COUNTDOWN_TICK: Duration = Duration::from_millis(100);
pub const COUNTDOWN_TICKS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
    remaining_ticks: u32,
}

impl Notification {
    /// Percentage of the success window left, in `[0, 100]`. Errors stay at 100.
    pub fn progress(&self) -> f32 {
        self.remaining_ticks as f32 * 100.0 / COUNTDOWN_TICKS as f32
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}

/// One countdown step, tagged with the generation that scheduled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownTick {
    generation: u64,
}

pub struct NotificationCenter {
    current: Option<Notification>,
    generation: u64,
    timer: Option<ScopedTimer>,
    ticks: mpsc::UnboundedSender<CountdownTick>,
}

impl NotificationCenter {
    /// Countdown ticks are delivered on `ticks`; feed them back through
    /// [`NotificationCenter::on_tick`].
    pub fn new(ticks: mpsc::UnboundedSender<CountdownTick>) -> Self {
        Self {
            current: None,
            generation: 0,
            timer: None,
            ticks,
        }
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// Replaces the current notification, cancelling any running countdown.
    pub fn notify(&mut self, kind: NotificationKind, text: impl Into<String>) {
        self.generation += 1;
        self.timer = None;
        let text = text.into();
        debug!(?kind, %text, "notify");

        if kind == NotificationKind::Success {
            let generation = self.generation;
            self.timer = Some(ScopedTimer::repeating(
                COUNTDOWN_TICK,
                COUNTDOWN_TICKS,
                self.ticks.clone(),
                move |_| CountdownTick { generation },
            ));
        }

        self.current = Some(Notification {
            kind,
            text,
            remaining_ticks: COUNTDOWN_TICKS,
        });
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.notify(NotificationKind::Success, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.notify(NotificationKind::Error, text);
    }

    pub fn dismiss(&mut self) {
        self.generation += 1;
        self.timer = None;
        self.current = None;
    }

    /// Clears the notification only if it is an error. Returns whether it did.
    pub fn dismiss_error(&mut self) -> bool {
        if self.current.as_ref().is_some_and(Notification::is_error) {
            self.dismiss();
            true
        } else {
            false
        }
    }

    /// Applies one countdown step. Returns true when the visible state changed.
    pub fn on_tick(&mut self, tick: CountdownTick) -> bool {
        if tick.generation != self.generation {
            return false;
        }
        let Some(current) = self.current.as_mut() else {
            return false;
        };
        current.remaining_ticks = current.remaining_ticks.saturating_sub(1);
        if current.remaining_ticks == 0 {
            debug!(text = %current.text, "success notification expired");
            self.current = None;
            self.timer = None;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center() -> (NotificationCenter, mpsc::UnboundedReceiver<CountdownTick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (NotificationCenter::new(tx), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_counts_down_and_expires_after_three_seconds() {
        let (mut center, mut ticks) = center();
        let start = tokio::time::Instant::now();
        center.success("Department created successfully!");

        let mut last = center.current().unwrap().progress();
        assert_eq!(last, 100.0);
        while let Some(tick) = ticks.recv().await {
            assert!(center.on_tick(tick));
            match center.current() {
                Some(n) => {
                    assert!(n.progress() < last, "progress must strictly decrease");
                    last = n.progress();
                }
                None => break,
            }
        }

        assert!(center.current().is_none());
        assert_eq!(start.elapsed(), Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_has_no_countdown() {
        let (mut center, mut ticks) = center();
        center.error("Failed to save department");

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(ticks.try_recv().is_err());
        assert_eq!(center.current().unwrap().text, "Failed to save department");
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_notification_ignores_stale_ticks() {
        let (mut center, mut ticks) = center();
        center.success("first");
        tokio::time::sleep(Duration::from_millis(250)).await;
        let stale: Vec<_> = std::iter::from_fn(|| ticks.try_recv().ok()).collect();
        assert_eq!(stale.len(), 2);

        center.error("second");
        for tick in stale {
            assert!(!center.on_tick(tick));
        }
        assert_eq!(center.current().unwrap().text, "second");
    }

    #[tokio::test]
    async fn test_dismiss_error_leaves_success_alone() {
        let (mut center, _ticks) = center();
        center.success("saved");
        assert!(!center.dismiss_error());
        assert!(center.current().is_some());

        center.error("broken");
        assert!(center.dismiss_error());
        assert!(center.current().is_none());
    }
}
