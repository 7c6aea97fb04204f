use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::{Body, Method};
use tokio_util::io::ReaderStream;
use tracing::info;

use bestbefore_types::api::UploadPhotoResponse;

use crate::error::{ClientError, Result};
use crate::http::{ApiClient, expect_success};

impl ApiClient {
    /// `POST /upload/room-photo` — multipart upload of a photo file attached
    /// to a room. The file is streamed from disk, not buffered. Returns the
    /// hosted image URL.
    pub async fn upload_room_photo(
        &self,
        token: &str,
        room_id: &str,
        photo_path: &Path,
    ) -> Result<String> {
        let meta = tokio::fs::metadata(photo_path)
            .await
            .map_err(|e| ClientError::Validation(format!("Cannot read photo: {e}")))?;
        let file = tokio::fs::File::open(photo_path)
            .await
            .map_err(|e| ClientError::Validation(format!("Cannot read photo: {e}")))?;

        let file_name = photo_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());

        let part = Part::stream_with_length(Body::wrap_stream(ReaderStream::new(file)), meta.len())
            .file_name(file_name)
            .mime_str(mime_for(photo_path))
            .map_err(ClientError::from_reqwest)?;

        let form = Form::new()
            .part("image", part)
            .text("roomId", room_id.to_string());

        let resp = self
            .authed(Method::POST, "upload/room-photo", token)
            .multipart(form)
            .send()
            .await
            .map_err(ClientError::from_reqwest)?;
        let resp = expect_success(resp, "Photo upload").await?;

        let uploaded: UploadPhotoResponse = resp.json().await.map_err(ClientError::from_reqwest)?;
        info!(room_id = %room_id, url = %uploaded.image_url, "Photo uploaded");
        Ok(uploaded.image_url)
    }
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        _ => "image/jpeg",
    }
}
