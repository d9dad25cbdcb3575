//! Tick sources for the countdown widget.
//!
//! A source hands out a guard when the timer enters `Running`; dropping the
//! guard releases the source. Every tick is stamped with the generation it
//! was started for, so ticks still queued from a released source can be
//! recognized and discarded.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::trace;

/// One-second signal delivered to a [`super::TimerWidget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

/// Something that can deliver periodic ticks while a guard is held.
pub trait TickSource {
    type Guard;

    /// Begin ticking for `generation`. Ticking stops when the guard drops.
    fn start(&self, generation: u64) -> Self::Guard;
}

/// Tick source without a background task: the owner calls
/// [`super::TimerWidget::tick`] itself. Tracks how many guards are alive.
#[derive(Debug, Clone, Default)]
pub struct ManualTickSource {
    active: Arc<AtomicUsize>,
}

impl ManualTickSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of guards currently held.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct ManualGuard {
    active: Arc<AtomicUsize>,
}

impl Drop for ManualGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

impl TickSource for ManualTickSource {
    type Guard = ManualGuard;

    fn start(&self, _generation: u64) -> ManualGuard {
        self.active.fetch_add(1, Ordering::SeqCst);
        ManualGuard {
            active: Arc::clone(&self.active),
        }
    }
}

/// Tokio interval task pushing [`Tick`]s into an unbounded channel.
///
/// Must be started from within a tokio runtime.
#[derive(Debug, Clone)]
pub struct IntervalTickSource {
    period: Duration,
    tx: mpsc::UnboundedSender<Tick>,
}

impl IntervalTickSource {
    /// Source plus the receiving end the owner drains into
    /// [`super::TimerWidget::on_tick`].
    pub fn channel(period: Duration) -> (Self, mpsc::UnboundedReceiver<Tick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { period, tx }, rx)
    }

    pub fn every_second() -> (Self, mpsc::UnboundedReceiver<Tick>) {
        Self::channel(Duration::from_secs(1))
    }
}

/// Aborts the interval task on drop.
#[derive(Debug)]
pub struct IntervalGuard {
    handle: JoinHandle<()>,
}

impl Drop for IntervalGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl TickSource for IntervalTickSource {
    type Guard = IntervalGuard;

    fn start(&self, generation: u64) -> IntervalGuard {
        let tx = self.tx.clone();
        let period = self.period;
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                trace!(generation, "tick");
                if tx.send(Tick { generation }).is_err() {
                    break;
                }
            }
        });
        IntervalGuard { handle }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_guards_are_counted() {
        let source = ManualTickSource::new();
        let a = source.start(1);
        let b = source.start(2);
        assert_eq!(source.active(), 2);
        drop(a);
        assert_eq!(source.active(), 1);
        drop(b);
        assert_eq!(source.active(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn interval_source_stops_after_guard_drop() {
        let (source, mut rx) = IntervalTickSource::channel(Duration::from_secs(1));
        let guard = source.start(7);

        let tick = rx.recv().await.unwrap();
        assert_eq!(tick, Tick { generation: 7 });

        drop(guard);
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_secs(5)).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
    }
}
