//! Wire types for the BestBefore REST backend.
//!
//! The backend's JSON is looser than the canonical models: ids arrive as
//! `_id`, booleans and capsule fields may be absent, and dates show up as
//! either ISO-8601 strings or epoch milliseconds depending on the endpoint.
//! Everything tolerant lives here; [`crate::models`] stays strict.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{CalendarEvent, CapsuleDuration, PhotoRef, Room, User};

/// Dates on the wire: accepts ISO-8601 or epoch milliseconds, always
/// serializes ISO-8601.
pub mod wire_date {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Millis(i64),
        Text(String),
    }

    fn into_datetime<E: serde::de::Error>(repr: Repr) -> Result<DateTime<Utc>, E> {
        match repr {
            Repr::Millis(ms) => Utc
                .timestamp_millis_opt(ms)
                .single()
                .ok_or_else(|| E::custom(format!("epoch millis out of range: {ms}"))),
            Repr::Text(s) => DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| E::custom(format!("invalid date {s:?}: {e}"))),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        into_datetime(Repr::deserialize(d)?)
    }

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
    }

    pub mod option {
        use super::*;

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            Option::<Repr>::deserialize(d)?
                .map(into_datetime::<D::Error>)
                .transpose()
        }

        pub fn serialize<S: Serializer>(
            dt: &Option<DateTime<Utc>>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match dt {
                Some(dt) => super::serialize(dt, s),
                None => s.serialize_none(),
            }
        }
    }
}

// -- Auth --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserDto,
    pub token: String,
}

impl From<UserDto> for User {
    fn from(dto: UserDto) -> Self {
        User {
            id: dto.id,
            name: dto.name,
            email: dto.email,
        }
    }
}

// -- Rooms --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoDto {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub owner_email: Option<String>,
    #[serde(with = "wire_date")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_public: Option<bool>,
    #[serde(default)]
    pub is_collaboration: Option<bool>,
    #[serde(default)]
    pub capsule_duration_days: Option<u32>,
    #[serde(default)]
    pub capsule_duration_hours: Option<u32>,
    #[serde(default)]
    pub capsule_duration_minutes: Option<u32>,
    #[serde(
        default,
        with = "wire_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub unlock_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub photos: Vec<PhotoDto>,
}

impl From<RoomDto> for Room {
    fn from(dto: RoomDto) -> Self {
        Room {
            id: dto.id,
            name: dto.name,
            owner_id: dto.owner_id,
            owner_email: dto.owner_email,
            created_at: dto.created_at,
            is_public: dto.is_public.unwrap_or(false),
            is_collaboration: dto.is_collaboration.unwrap_or(false),
            capsule: CapsuleDuration {
                days: dto.capsule_duration_days.unwrap_or(21),
                hours: dto.capsule_duration_hours.unwrap_or(0),
                minutes: dto.capsule_duration_minutes.unwrap_or(0),
            },
            unlock_at: dto.unlock_date,
            photos: dto.photos.into_iter().map(|p| PhotoRef { url: p.url }).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub name: String,
    pub is_public: bool,
    pub is_collaboration: bool,
    pub capsule_duration_days: u32,
    pub capsule_duration_hours: u32,
    pub capsule_duration_minutes: u32,
    #[serde(
        default,
        with = "wire_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub unlock_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomResponse {
    pub id: String,
}

/// Partial update; absent fields are left untouched by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoomRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_collaboration: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capsule_duration_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capsule_duration_hours: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capsule_duration_minutes: Option<u32>,
    #[serde(
        default,
        with = "wire_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub unlock_date: Option<DateTime<Utc>>,
}

// -- Photo upload --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPhotoResponse {
    pub image_url: String,
}

// -- Calendar --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarAuthResponse {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEventDto {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(with = "wire_date")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "wire_date")]
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub calendar_name: Option<String>,
}

impl From<CalendarEventDto> for CalendarEvent {
    fn from(dto: CalendarEventDto) -> Self {
        CalendarEvent {
            id: dto.id,
            title: dto.title,
            description: dto.description,
            location: dto.location,
            start_time: dto.start_time,
            end_time: dto.end_time,
            calendar_name: dto.calendar_name,
        }
    }
}

// -- Account --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEmailRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePasswordRequest {
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn room_dto_decodes_iso_date_and_fills_defaults() {
        let json = r#"{
            "_id": "665f1c2e9b1d8a0012345678",
            "name": "NYC Trip",
            "createdAt": "2025-06-01T12:00:00Z"
        }"#;
        let room: Room = serde_json::from_str::<RoomDto>(json).unwrap().into();

        assert_eq!(room.id, "665f1c2e9b1d8a0012345678");
        assert!(!room.is_public);
        assert!(!room.is_collaboration);
        assert_eq!(room.capsule.days, 21);
        assert_eq!(room.capsule.hours, 0);
        assert!(room.unlock_at.is_none());
        assert!(room.photos.is_empty());
    }

    #[test]
    fn room_dto_decodes_epoch_millis_date() {
        let json = r#"{
            "_id": "abc",
            "name": "Daily Trip",
            "createdAt": 1748779200000,
            "isPublic": true,
            "unlockDate": 1748782800000
        }"#;
        let room: Room = serde_json::from_str::<RoomDto>(json).unwrap().into();

        assert_eq!(
            room.created_at,
            Utc.timestamp_millis_opt(1_748_779_200_000).unwrap()
        );
        assert!(room.is_public);
        assert_eq!(
            room.unlock_at,
            Some(Utc.timestamp_millis_opt(1_748_782_800_000).unwrap())
        );
    }

    #[test]
    fn room_dto_rejects_malformed_date() {
        let json = r#"{"_id": "x", "name": "y", "createdAt": "yesterday"}"#;
        assert!(serde_json::from_str::<RoomDto>(json).is_err());
    }

    #[test]
    fn update_request_skips_absent_fields() {
        let req = UpdateRoomRequest {
            name: Some("Renamed".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&req).unwrap();
        let obj = value.as_object().unwrap();

        assert_eq!(obj.len(), 1);
        assert_eq!(obj["name"], "Renamed");
    }

    #[test]
    fn unlock_date_serializes_as_iso_string() {
        let req = UpdateRoomRequest {
            unlock_date: Some(Utc.with_ymd_and_hms(2025, 6, 1, 13, 0, 0).unwrap()),
            ..Default::default()
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["unlockDate"], "2025-06-01T13:00:00Z");
    }
}
