use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
}

impl User {
    /// Display name, falling back to "User" when the backend has none.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("User")
    }
}

/// The locally cached login: bearer token plus the profile fields needed
/// to render screens without a round-trip. Lives from login to logout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
}

/// Lock duration components as entered by the user when creating a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapsuleDuration {
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
}

impl CapsuleDuration {
    pub fn total_seconds(&self) -> u64 {
        self.days as u64 * 86_400 + self.hours as u64 * 3_600 + self.minutes as u64 * 60
    }

    pub fn is_zero(&self) -> bool {
        self.total_seconds() == 0
    }
}

impl Default for CapsuleDuration {
    // Rooms created without explicit duration lock for three weeks.
    fn default() -> Self {
        Self {
            days: 21,
            hours: 0,
            minutes: 0,
        }
    }
}

/// Reference to an uploaded room photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRef {
    pub url: String,
}

/// A named collection of photos with visibility and lock settings.
///
/// This is the single canonical shape; the wire DTO in [`crate::api`]
/// tolerates the backend's missing fields and maps into this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub owner_id: Option<String>,
    pub owner_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_public: bool,
    pub is_collaboration: bool,
    pub capsule: CapsuleDuration,
    /// While `now < unlock_at` the room's content is locked.
    pub unlock_at: Option<DateTime<Utc>>,
    pub photos: Vec<PhotoRef>,
}

impl Room {
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.unlock_at.is_some_and(|at| now < at)
    }
}

/// An event pulled from the user's calendar provider, offered as a seed
/// for a new room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub calendar_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn capsule_duration_totals() {
        let d = CapsuleDuration {
            days: 1,
            hours: 2,
            minutes: 30,
        };
        assert_eq!(d.total_seconds(), 86_400 + 7_200 + 1_800);
        assert!(!d.is_zero());

        let zero = CapsuleDuration {
            days: 0,
            hours: 0,
            minutes: 0,
        };
        assert!(zero.is_zero());
    }

    #[test]
    fn default_duration_is_three_weeks() {
        assert_eq!(CapsuleDuration::default().total_seconds(), 21 * 86_400);
    }

    #[test]
    fn room_lock_state_follows_unlock_instant() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let mut room = Room {
            id: "r1".into(),
            name: "Trip".into(),
            owner_id: None,
            owner_email: None,
            created_at: now,
            is_public: true,
            is_collaboration: false,
            capsule: CapsuleDuration::default(),
            unlock_at: None,
            photos: vec![],
        };
        assert!(!room.is_locked(now));

        room.unlock_at = Some(now + chrono::Duration::hours(1));
        assert!(room.is_locked(now));
        assert!(!room.is_locked(now + chrono::Duration::hours(2)));
        // Unlock instant itself counts as unlocked.
        assert!(!room.is_locked(now + chrono::Duration::hours(1)));
    }
}
