use reqwest::Method;

use bestbefore_types::api::{CalendarAuthResponse, CalendarEventDto};
use bestbefore_types::models::CalendarEvent;

use crate::error::{ClientError, Result};
use crate::http::{ApiClient, expect_success};

impl ApiClient {
    /// `GET /calendar/auth` — URL the user visits to grant calendar access.
    pub async fn calendar_auth_url(&self, token: &str) -> Result<String> {
        let resp = self
            .authed(Method::GET, "calendar/auth", token)
            .send()
            .await
            .map_err(ClientError::from_reqwest)?;
        let resp = expect_success(resp, "Calendar auth").await?;

        let auth: CalendarAuthResponse = resp.json().await.map_err(ClientError::from_reqwest)?;
        Ok(auth.url)
    }

    /// `GET /calendar/events` — upcoming events, offered as room seeds.
    pub async fn calendar_events(&self, token: &str) -> Result<Vec<CalendarEvent>> {
        let resp = self
            .authed(Method::GET, "calendar/events", token)
            .send()
            .await
            .map_err(ClientError::from_reqwest)?;
        let resp = expect_success(resp, "Fetch calendar events").await?;

        let dtos: Vec<CalendarEventDto> = resp.json().await.map_err(ClientError::from_reqwest)?;
        Ok(dtos.into_iter().map(CalendarEvent::from).collect())
    }
}
