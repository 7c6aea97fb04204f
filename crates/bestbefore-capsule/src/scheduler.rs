//! One-shot unlock alarms.
//!
//! The countdown display dies with its screen; the alarm does not. A
//! [`UnlockScheduler`] owns the pending alarms and fires each one exactly
//! once at its instant, handing the payload to a [`NotificationSink`] —
//! the seam where a platform notification service plugs in.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::info;

/// Payload delivered when a capsule unlocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockAlarm {
    pub room_id: String,
    pub room_name: String,
}

pub trait NotificationSink: Send + Sync + 'static {
    fn notify(&self, alarm: &UnlockAlarm);
}

/// Default sink: a structured log line standing in for the platform
/// notification surface.
pub struct LogNotificationSink;

impl NotificationSink for LogNotificationSink {
    fn notify(&self, alarm: &UnlockAlarm) {
        info!(
            room_id = %alarm.room_id,
            room_name = %alarm.room_name,
            "Time capsule unlocked: \"{}\" is now available to see",
            alarm.room_name
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlarmHandle(u64);

/// Capability interface for one-shot scheduling.
pub trait UnlockScheduler: Send + Sync {
    /// Schedule a single firing at `at`. Any pending alarm for the same room
    /// is cancelled first — one alarm per room, cancel-then-set.
    fn schedule(&self, at: DateTime<Utc>, alarm: UnlockAlarm) -> AlarmHandle;

    /// Cancel a pending alarm. A handle that already fired is a no-op.
    fn cancel(&self, handle: AlarmHandle);
}

struct AlarmEntry {
    room_id: String,
    task: JoinHandle<()>,
}

struct Inner {
    next_id: u64,
    pending: HashMap<u64, AlarmEntry>,
}

/// In-process scheduler: one sleeping task per pending alarm. Fires for as
/// long as the owning process lives; an OS alarm manager implementation
/// would replace this behind the same trait.
pub struct TokioUnlockScheduler {
    sink: Arc<dyn NotificationSink>,
    inner: Arc<Mutex<Inner>>,
}

impl TokioUnlockScheduler {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            sink,
            inner: Arc::new(Mutex::new(Inner {
                next_id: 1,
                pending: HashMap::new(),
            })),
        }
    }

    pub fn pending_count(&self) -> usize {
        self.inner.lock().map(|i| i.pending.len()).unwrap_or(0)
    }
}

impl UnlockScheduler for TokioUnlockScheduler {
    fn schedule(&self, at: DateTime<Utc>, alarm: UnlockAlarm) -> AlarmHandle {
        let delay = (at - Utc::now()).to_std().unwrap_or_default();

        let mut inner = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        // Cancel-then-set: a stale alarm must never coexist with a new one
        // for the same room.
        let stale: Vec<u64> = inner
            .pending
            .iter()
            .filter(|(_, entry)| entry.room_id == alarm.room_id)
            .map(|(id, _)| *id)
            .collect();
        for id in stale {
            if let Some(entry) = inner.pending.remove(&id) {
                entry.task.abort();
                info!(room_id = %alarm.room_id, "Replaced pending unlock alarm");
            }
        }

        let id = inner.next_id;
        inner.next_id += 1;

        let sink = self.sink.clone();
        let registry = self.inner.clone();
        let room_id = alarm.room_id.clone();

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            sink.notify(&alarm);
            if let Ok(mut inner) = registry.lock() {
                inner.pending.remove(&id);
            }
        });

        inner.pending.insert(id, AlarmEntry { room_id, task });
        AlarmHandle(id)
    }

    fn cancel(&self, handle: AlarmHandle) {
        let mut inner = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(entry) = inner.pending.remove(&handle.0) {
            entry.task.abort();
            info!(room_id = %entry.room_id, "Unlock alarm cancelled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;

    struct ChannelSink(mpsc::UnboundedSender<UnlockAlarm>);

    impl NotificationSink for ChannelSink {
        fn notify(&self, alarm: &UnlockAlarm) {
            let _ = self.0.send(alarm.clone());
        }
    }

    fn scheduler_with_channel() -> (TokioUnlockScheduler, mpsc::UnboundedReceiver<UnlockAlarm>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (TokioUnlockScheduler::new(Arc::new(ChannelSink(tx))), rx)
    }

    fn alarm(room_id: &str, name: &str) -> UnlockAlarm {
        UnlockAlarm {
            room_id: room_id.into(),
            room_name: name.into(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn alarm_fires_once_at_its_instant() {
        let (scheduler, mut rx) = scheduler_with_channel();
        scheduler.schedule(Utc::now() + chrono::Duration::seconds(30), alarm("r1", "NYC Trip"));
        assert_eq!(scheduler.pending_count(), 1);

        let fired = rx.recv().await.unwrap();
        assert_eq!(fired.room_name, "NYC Trip");

        tokio::time::advance(Duration::from_secs(120)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_alarm_never_fires() {
        let (scheduler, mut rx) = scheduler_with_channel();
        let handle =
            scheduler.schedule(Utc::now() + chrono::Duration::seconds(10), alarm("r1", "Nature"));
        scheduler.cancel(handle);

        tokio::time::advance(Duration::from_secs(60)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_a_room_replaces_its_pending_alarm() {
        let (scheduler, mut rx) = scheduler_with_channel();
        scheduler.schedule(Utc::now() + chrono::Duration::seconds(5), alarm("r1", "old"));
        scheduler.schedule(Utc::now() + chrono::Duration::seconds(15), alarm("r1", "new"));
        assert_eq!(scheduler.pending_count(), 1);

        let fired = rx.recv().await.unwrap();
        assert_eq!(fired.room_name, "new");

        tokio::time::advance(Duration::from_secs(60)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn alarms_for_different_rooms_are_independent() {
        let (scheduler, mut rx) = scheduler_with_channel();
        scheduler.schedule(Utc::now() + chrono::Duration::seconds(5), alarm("r1", "Travel"));
        scheduler.schedule(Utc::now() + chrono::Duration::seconds(10), alarm("r2", "Foreign"));
        assert_eq!(scheduler.pending_count(), 2);

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.room_name, "Travel");
        assert_eq!(second.room_name, "Foreign");
    }

    #[tokio::test(start_paused = true)]
    async fn past_instant_fires_immediately() {
        let (scheduler, mut rx) = scheduler_with_channel();
        scheduler.schedule(Utc::now() - chrono::Duration::seconds(5), alarm("r1", "Late"));
        let fired = rx.recv().await.unwrap();
        assert_eq!(fired.room_name, "Late");
    }
}
