// src/core/timer.rs — Countdown ticker bound to an active recording

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Message delivered by a running timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Tick { generation: u64 },
}

/// A background task that emits one tick per interval until cancelled.
///
/// Each timer carries a generation number. The controller only honours ticks
/// whose generation matches the live timer, so a tick already queued by a
/// cancelled timer cannot touch the session after it has moved on.
pub struct RecordingTimer {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl RecordingTimer {
    /// Spawn the ticker. The first tick arrives one full interval after start.
    pub fn start(
        interval: Duration,
        generation: u64,
        tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send(TimerEvent::Tick { generation }).is_err() {
                    break;
                }
            }
        });
        tracing::debug!("Recording timer {} started", generation);
        Self {
            generation,
            handle: Some(handle),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop ticking. Safe to call more than once.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!("Recording timer {} cancelled", self.generation);
        }
    }
}

impl Drop for RecordingTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_interval() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timer = RecordingTimer::start(Duration::from_secs(1), 7, tx);
        assert!(timer.is_running());

        for _ in 0..3 {
            let event = rx.recv().await.unwrap();
            assert_eq!(event, TimerEvent::Tick { generation: 7 });
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_ticks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = RecordingTimer::start(Duration::from_secs(1), 1, tx);
        rx.recv().await.unwrap();
        timer.cancel();
        timer.cancel();

        // Once the task is aborted its sender is dropped and the channel closes.
        tokio::time::sleep(Duration::from_secs(5)).await;
        while let Ok(event) = rx.try_recv() {
            // At most one tick may have been queued before the abort landed.
            assert_eq!(event, TimerEvent::Tick { generation: 1 });
        }
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        {
            let _timer = RecordingTimer::start(Duration::from_secs(1), 3, tx);
        }
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(rx.recv().await.is_none());
    }
}
