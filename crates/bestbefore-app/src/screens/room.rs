use std::path::Path;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use bestbefore_capsule::countdown::{
    Countdown, CountdownState, LockOffset, ZERO_DISPLAY, unlock_instant,
};
use bestbefore_capsule::scheduler::{AlarmHandle, UnlockAlarm};
use bestbefore_types::api::UpdateRoomRequest;
use bestbefore_types::models::{CalendarEvent, PhotoRef, Room, Session};

use crate::context::AppContext;

/// The two photo frames on the room wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSlot {
    One,
    Two,
}

/// A single room: photo frames, dialogs, and the capsule lock.
pub struct RoomScreen {
    pub room_id: String,
    pub room_name: String,
    pub show_profile_menu: bool,
    pub show_capsule_dialog: bool,
    pub show_room_info: bool,
    pub show_calendar_dialog: bool,
    /// While `now < unlock_at` the room content is locked.
    pub unlock_at: Option<DateTime<Utc>>,
    pub countdown_text: String,
    pub frame1: Option<PhotoRef>,
    pub frame2: Option<PhotoRef>,
    pub calendar_events: Vec<CalendarEvent>,
    pub error_message: Option<String>,
    selected_frame: Option<FrameSlot>,
    countdown: Option<Countdown>,
    alarm: Option<AlarmHandle>,
}

impl RoomScreen {
    /// Enter a room. An unexpired persisted unlock instant resumes the
    /// countdown display; the unlock alarm itself was scheduled when the
    /// capsule started and is not touched here.
    pub fn open(room: &Room) -> Self {
        let mut screen = Self {
            room_id: room.id.clone(),
            room_name: room.name.clone(),
            show_profile_menu: false,
            show_capsule_dialog: false,
            show_room_info: false,
            show_calendar_dialog: false,
            unlock_at: None,
            countdown_text: ZERO_DISPLAY.to_string(),
            frame1: room.photos.first().cloned(),
            frame2: room.photos.get(1).cloned(),
            calendar_events: Vec::new(),
            error_message: None,
            selected_frame: None,
            countdown: None,
            alarm: None,
        };

        if let Some(at) = room.unlock_at {
            if Utc::now() < at {
                screen.resume_countdown(at);
            }
        }

        screen
    }

    pub fn toggle_profile_menu(&mut self) {
        self.show_profile_menu = !self.show_profile_menu;
    }

    pub fn toggle_capsule_dialog(&mut self) {
        self.show_capsule_dialog = !self.show_capsule_dialog;
    }

    pub fn toggle_room_info(&mut self) {
        self.show_room_info = !self.show_room_info;
    }

    pub fn toggle_calendar_dialog(&mut self) {
        self.show_calendar_dialog = !self.show_calendar_dialog;
    }

    pub fn select_frame(&mut self, slot: FrameSlot) {
        self.selected_frame = Some(slot);
    }

    /// Upload a photo into the selected frame and keep the hosted URL.
    pub async fn attach_photo(&mut self, ctx: &AppContext, session: &Session, path: &Path) {
        let Some(slot) = self.selected_frame else {
            return;
        };

        match ctx
            .client
            .upload_room_photo(&session.token, &self.room_id, path)
            .await
        {
            Ok(url) => {
                let photo = Some(PhotoRef { url });
                match slot {
                    FrameSlot::One => self.frame1 = photo,
                    FrameSlot::Two => self.frame2 = photo,
                }
                self.selected_frame = None;
            }
            Err(e) => self.error_message = Some(e.to_string()),
        }
    }

    /// Start (or restart) the capsule lock. A zero total is a no-op. The
    /// lock state and the unlock alarm are set regardless of whether the
    /// backend accepts the unlock date; a failed PATCH only surfaces inline.
    pub async fn start_time_capsule(
        &mut self,
        ctx: &AppContext,
        session: &Session,
        offset: LockOffset,
    ) {
        let Some(unlock_at) = unlock_instant(Utc::now(), offset) else {
            return;
        };

        // One alarm per room; the scheduler cancels any pending one first.
        self.alarm = Some(ctx.scheduler.schedule(
            unlock_at,
            UnlockAlarm {
                room_id: self.room_id.clone(),
                room_name: self.room_name.clone(),
            },
        ));
        self.resume_countdown(unlock_at);

        if let Err(e) = ctx
            .client
            .update_room(
                &session.token,
                &self.room_id,
                &UpdateRoomRequest {
                    unlock_date: Some(unlock_at),
                    ..Default::default()
                },
            )
            .await
        {
            self.error_message = Some(e.to_string());
        }
    }

    /// Pull the latest tick into the screen. Once the countdown reports
    /// unlocked the lock state is cleared and the tick task is dropped.
    pub fn sync_countdown(&mut self) {
        let Some(countdown) = &self.countdown else {
            return;
        };
        let state = countdown.current();
        self.countdown_text = state.display;
        if state.unlocked {
            self.unlock_at = None;
            self.countdown = None;
        }
    }

    pub fn is_locked(&self) -> bool {
        self.unlock_at.is_some_and(|at| Utc::now() < at)
    }

    pub fn has_scheduled_alarm(&self) -> bool {
        self.alarm.is_some()
    }

    /// Live countdown feed for anything that wants push updates instead of
    /// polling [`Self::sync_countdown`].
    pub fn countdown_updates(&self) -> Option<watch::Receiver<CountdownState>> {
        self.countdown.as_ref().map(|c| c.subscribe())
    }

    pub async fn rename(&mut self, ctx: &AppContext, session: &Session, name: &str) {
        match ctx
            .client
            .rename_room(&session.token, &self.room_id, name)
            .await
        {
            Ok(()) => self.room_name = name.to_string(),
            Err(e) => self.error_message = Some(e.to_string()),
        }
    }

    /// Delete the room. Cancels the pending unlock alarm — a notification
    /// for a room that no longer exists must never fire.
    pub async fn delete(&mut self, ctx: &AppContext, session: &Session) -> bool {
        match ctx.client.delete_room(&session.token, &self.room_id).await {
            Ok(()) => {
                if let Some(handle) = self.alarm.take() {
                    ctx.scheduler.cancel(handle);
                }
                self.countdown = None;
                self.unlock_at = None;
                true
            }
            Err(e) => {
                self.error_message = Some(e.to_string());
                false
            }
        }
    }

    pub async fn load_calendar_events(&mut self, ctx: &AppContext, session: &Session) {
        match ctx.client.calendar_events(&session.token).await {
            Ok(events) => self.calendar_events = events,
            Err(e) => self.error_message = Some(e.to_string()),
        }
    }

    fn resume_countdown(&mut self, unlock_at: DateTime<Utc>) {
        let countdown = Countdown::start(unlock_at);
        self.countdown_text = countdown.current().display;
        self.unlock_at = Some(unlock_at);
        self.countdown = Some(countdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AppContext, Config};
    use bestbefore_types::models::CapsuleDuration;
    use uuid::Uuid;

    fn offline_ctx() -> AppContext {
        AppContext::new(&Config {
            api_url: "http://127.0.0.1:9".into(),
            data_dir: std::env::temp_dir().join(format!("bb_room_{}", Uuid::new_v4())),
            app_check_token: None,
        })
        .unwrap()
    }

    fn session() -> Session {
        Session {
            token: "tok".into(),
            user_id: "u1".into(),
            user_name: "Arya".into(),
            user_email: "arya@example.com".into(),
        }
    }

    fn room(unlock_at: Option<DateTime<Utc>>) -> Room {
        Room {
            id: "r1".into(),
            name: "NYC Trip".into(),
            owner_id: None,
            owner_email: None,
            created_at: Utc::now(),
            is_public: true,
            is_collaboration: false,
            capsule: CapsuleDuration::default(),
            unlock_at,
            photos: vec![],
        }
    }

    #[tokio::test]
    async fn zero_offset_start_is_a_noop() {
        let ctx = offline_ctx();
        let mut screen = RoomScreen::open(&room(None));

        screen
            .start_time_capsule(&ctx, &session(), LockOffset::default())
            .await;

        assert!(screen.unlock_at.is_none());
        assert!(!screen.has_scheduled_alarm());
        assert_eq!(screen.countdown_text, ZERO_DISPLAY);
        // A no-op start never talks to the backend.
        assert!(screen.error_message.is_none());
    }

    #[tokio::test]
    async fn capsule_locks_locally_even_if_persistence_fails() {
        let ctx = offline_ctx();
        let mut screen = RoomScreen::open(&room(None));

        screen
            .start_time_capsule(
                &ctx,
                &session(),
                LockOffset {
                    hours: 1,
                    minutes: 1,
                    seconds: 1,
                },
            )
            .await;

        assert!(screen.is_locked());
        assert!(screen.has_scheduled_alarm());
        assert_eq!(screen.countdown_text, "01:01:01");
        // The PATCH went nowhere; the failure surfaces inline only.
        assert!(screen.error_message.is_some());
    }

    #[tokio::test]
    async fn reentry_resumes_countdown_from_persisted_instant() {
        let unlock = Utc::now() + chrono::Duration::seconds(90);
        let screen = RoomScreen::open(&room(Some(unlock)));

        assert!(screen.is_locked());
        assert_eq!(screen.countdown_text, "00:01:30");
        // Re-entry only restarts the display; the alarm belongs to the
        // original start.
        assert!(!screen.has_scheduled_alarm());
    }

    #[tokio::test]
    async fn expired_instant_opens_unlocked() {
        let unlock = Utc::now() - chrono::Duration::seconds(5);
        let screen = RoomScreen::open(&room(Some(unlock)));

        assert!(!screen.is_locked());
        assert_eq!(screen.countdown_text, ZERO_DISPLAY);
    }

    #[test]
    fn dialog_flags_toggle_independently() {
        let mut screen = RoomScreen::open(&room(None));
        screen.toggle_capsule_dialog();
        screen.toggle_room_info();
        assert!(screen.show_capsule_dialog);
        assert!(screen.show_room_info);
        assert!(!screen.show_profile_menu);

        screen.toggle_capsule_dialog();
        assert!(!screen.show_capsule_dialog);
    }
}
