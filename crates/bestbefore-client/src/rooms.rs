use reqwest::Method;
use tracing::info;

use bestbefore_types::api::{CreateRoomRequest, CreateRoomResponse, RoomDto, UpdateRoomRequest};
use bestbefore_types::models::Room;
use bestbefore_types::validate::validate_non_empty;

use crate::error::{ClientError, Result};
use crate::http::{ApiClient, expect_success};

impl ApiClient {
    /// `GET /rooms` — every room visible to the signed-in user.
    pub async fn rooms(&self, token: &str) -> Result<Vec<Room>> {
        self.fetch_rooms(token, "rooms", "Fetch rooms").await
    }

    /// `GET /rooms/saved` — rooms the user bookmarked via [`Self::keep_room`].
    pub async fn saved_rooms(&self, token: &str) -> Result<Vec<Room>> {
        self.fetch_rooms(token, "rooms/saved", "Fetch saved rooms")
            .await
    }

    /// `POST /rooms`. Returns the new room's id.
    pub async fn create_room(&self, token: &str, req: &CreateRoomRequest) -> Result<String> {
        validate_non_empty(&req.name, "a room name")?;

        let resp = self
            .authed(Method::POST, "rooms", token)
            .json(req)
            .send()
            .await
            .map_err(ClientError::from_reqwest)?;
        let resp = expect_success(resp, "Create room").await?;

        let created: CreateRoomResponse = resp.json().await.map_err(ClientError::from_reqwest)?;
        info!(room_id = %created.id, name = %req.name, "Room created");
        Ok(created.id)
    }

    /// `PATCH /rooms/{id}` — partial update; only the fields set in `req`
    /// change on the backend.
    pub async fn update_room(&self, token: &str, id: &str, req: &UpdateRoomRequest) -> Result<()> {
        let resp = self
            .authed(Method::PATCH, &format!("rooms/{id}"), token)
            .json(req)
            .send()
            .await
            .map_err(ClientError::from_reqwest)?;
        expect_success(resp, "Update room").await?;
        Ok(())
    }

    pub async fn rename_room(&self, token: &str, id: &str, name: &str) -> Result<()> {
        validate_non_empty(name, "a room name")?;
        self.update_room(
            token,
            id,
            &UpdateRoomRequest {
                name: Some(name.to_string()),
                ..Default::default()
            },
        )
        .await
    }

    /// `DELETE /rooms/{id}`.
    pub async fn delete_room(&self, token: &str, id: &str) -> Result<()> {
        let resp = self
            .authed(Method::DELETE, &format!("rooms/{id}"), token)
            .send()
            .await
            .map_err(ClientError::from_reqwest)?;
        expect_success(resp, "Delete room").await?;
        info!(room_id = %id, "Room deleted");
        Ok(())
    }

    /// `POST /rooms/{id}/keep` — bookmark a room into the saved list.
    pub async fn keep_room(&self, token: &str, id: &str) -> Result<()> {
        let resp = self
            .authed(Method::POST, &format!("rooms/{id}/keep"), token)
            .send()
            .await
            .map_err(ClientError::from_reqwest)?;
        expect_success(resp, "Keep room").await?;
        Ok(())
    }

    async fn fetch_rooms(&self, token: &str, path: &str, action: &str) -> Result<Vec<Room>> {
        let resp = self
            .authed(Method::GET, path, token)
            .send()
            .await
            .map_err(ClientError::from_reqwest)?;
        let resp = expect_success(resp, action).await?;

        let dtos: Vec<RoomDto> = resp.json().await.map_err(ClientError::from_reqwest)?;
        Ok(dtos.into_iter().map(Room::from).collect())
    }
}
