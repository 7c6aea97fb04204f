//! Capsule lock countdown.
//!
//! A lock is an unlock instant attached to a room. While the owning screen is
//! live, a [`Countdown`] task recomputes the remaining time once per second
//! and publishes a zero-padded `HH:MM:SS` rendering over a watch channel.
//! Reaching zero clears the lock state exactly once and stops the task.
//!
//! Dropping the `Countdown` (screen teardown) aborts the tick task and
//! nothing else — the unlock alarm in [`crate::scheduler`] is independent of
//! screen lifetime. Re-entering the screen starts a fresh countdown from the
//! persisted unlock instant.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

pub const ZERO_DISPLAY: &str = "00:00:00";

/// Lock duration entered in the capsule dialog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockOffset {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl LockOffset {
    pub fn total_seconds(&self) -> u64 {
        self.hours as u64 * 3_600 + self.minutes as u64 * 60 + self.seconds as u64
    }
}

/// `now + offset`, or `None` when the offset totals zero — starting a capsule
/// with no duration is a no-op.
pub fn unlock_instant(now: DateTime<Utc>, offset: LockOffset) -> Option<DateTime<Utc>> {
    let total = offset.total_seconds();
    if total == 0 {
        return None;
    }
    Some(now + chrono::Duration::seconds(total as i64))
}

/// Zero-padded `HH:MM:SS`. Hours widen past two digits instead of wrapping.
pub fn format_hms(total_seconds: u64) -> String {
    let h = total_seconds / 3_600;
    let m = (total_seconds / 60) % 60;
    let s = total_seconds % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

/// Time until the unlock instant, clamped at zero.
pub fn remaining_until(unlock_at: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (unlock_at - now).to_std().unwrap_or(Duration::ZERO)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownState {
    pub display: String,
    pub unlocked: bool,
}

/// Live one-second countdown toward an unlock instant.
///
/// Owns the tick task; dropping it stops recomputation. Subscribers read the
/// latest state from the watch channel and observe the channel closing after
/// the single unlock transition.
pub struct Countdown {
    state: watch::Receiver<CountdownState>,
    task: JoinHandle<()>,
}

impl Countdown {
    /// Start ticking toward `unlock_at`, measured from the wall clock now.
    pub fn start(unlock_at: DateTime<Utc>) -> Self {
        Self::start_with_remaining(remaining_until(unlock_at, Utc::now()))
    }

    /// Start ticking with an explicit remaining duration. The deadline is
    /// tracked on the monotonic clock from here on, so a suspended tick
    /// cannot stretch the countdown.
    pub fn start_with_remaining(remaining: Duration) -> Self {
        let deadline = Instant::now() + remaining;
        let initial_secs = secs_left(deadline);
        let (tx, rx) = watch::channel(CountdownState {
            display: format_hms(initial_secs),
            unlocked: initial_secs == 0,
        });

        let task = tokio::spawn(async move {
            if tx.borrow().unlocked {
                return;
            }

            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.tick().await; // first tick completes immediately

            loop {
                interval.tick().await;
                let left = secs_left(deadline);
                if left == 0 {
                    let _ = tx.send(CountdownState {
                        display: ZERO_DISPLAY.to_string(),
                        unlocked: true,
                    });
                    break;
                }
                let _ = tx.send(CountdownState {
                    display: format_hms(left),
                    unlocked: false,
                });
            }
        });

        Self { state: rx, task }
    }

    pub fn subscribe(&self) -> watch::Receiver<CountdownState> {
        self.state.clone()
    }

    pub fn current(&self) -> CountdownState {
        self.state.borrow().clone()
    }

    pub fn is_unlocked(&self) -> bool {
        self.state.borrow().unlocked
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Seconds left until `deadline`, rounded up so a freshly started countdown
/// shows its full duration and zero is only shown at (or past) the deadline.
fn secs_left(deadline: Instant) -> u64 {
    let left = deadline.saturating_duration_since(Instant::now());
    (left.as_millis() as u64).div_ceil(1_000)
}
