pub mod countdown;
pub mod scheduler;

pub use countdown::{Countdown, CountdownState, LockOffset, format_hms, unlock_instant};
pub use scheduler::{
    AlarmHandle, LogNotificationSink, NotificationSink, TokioUnlockScheduler, UnlockAlarm,
    UnlockScheduler,
};
