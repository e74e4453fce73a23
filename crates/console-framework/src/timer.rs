//! # Scoped Timers
//!
//! A [`ScopedTimer`] owns a spawned Tokio task that delivers timer events into
//! a channel. Dropping the timer aborts the task, so replacing a timer (or
//! dropping its owner at teardown) can never deliver a late event from the
//! old schedule. Receivers still compare generations, since an event may
//! already sit in the channel when the timer is dropped.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

pub struct ScopedTimer {
    handle: JoinHandle<()>,
}

impl ScopedTimer {
    /// Sends `make(n)` for `n` in `1..=ticks`, one every `period`.
    pub fn repeating<T, F>(period: Duration, ticks: u32, events: mpsc::UnboundedSender<T>, mut make: F) -> Self
    where
        T: Send + 'static,
        F: FnMut(u32) -> T + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            for n in 1..=ticks {
                tokio::time::sleep(period).await;
                if events.send(make(n)).is_err() {
                    trace!("timer receiver gone");
                    break;
                }
            }
        });
        Self { handle }
    }

    /// Sends `event` once after `delay`.
    pub fn once<T: Send + 'static>(delay: Duration, events: mpsc::UnboundedSender<T>, event: T) -> Self {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(event);
        });
        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_repeating_timer_delivers_every_tick() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _timer = ScopedTimer::repeating(Duration::from_millis(100), 3, tx, |n| n);

        let start = tokio::time::Instant::now();
        assert_eq!(rx.recv().await, Some(1));
        assert_eq!(rx.recv().await, Some(2));
        assert_eq!(rx.recv().await, Some(3));
        assert_eq!(rx.recv().await, None);
        assert_eq!(start.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_timer_cancels_pending_events() {
        let (tx, mut rx) = mpsc::unbounded_channel::<&'static str>();
        let timer = ScopedTimer::once(Duration::from_millis(50), tx, "late");
        drop(timer);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rx.try_recv().is_err());
    }
}
