use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use tracing::warn;

use crate::error::{ClientError, Result};

/// Fixed connect/read timeout for every request. Single attempt, no retries.
const TIMEOUT: Duration = Duration::from_secs(30);

/// Header carrying the platform app-integrity token, when one is available.
const APP_CHECK_HEADER: &str = "X-Firebase-AppCheck";

/// Source of the platform integrity token attached to outgoing requests.
///
/// The token comes from whatever attestation service the host platform
/// provides; this crate only forwards it. A provider that fails (or the
/// absence of a provider) degrades to sending no header and letting the
/// backend decide.
pub trait AppCheckProvider: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// Thin client over the BestBefore REST backend.
///
/// One `reqwest::Client` (one connection pool) per instance. Authenticated
/// calls take the session token explicitly; there is no ambient login state
/// in here.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    app_check: Option<Arc<dyn AppCheckProvider>>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(TIMEOUT)
            .timeout(TIMEOUT)
            .build()
            .map_err(ClientError::from_reqwest)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            app_check: None,
        })
    }

    pub fn with_app_check(mut self, provider: Arc<dyn AppCheckProvider>) -> Self {
        self.app_check = Some(provider);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self
            .http
            .request(method, format!("{}/{}", self.base_url, path));

        if let Some(provider) = &self.app_check {
            match provider.token() {
                Some(token) if !token.is_empty() => {
                    req = req.header(APP_CHECK_HEADER, token);
                }
                _ => warn!("app-check token unavailable, sending without it"),
            }
        }

        req
    }

    pub(crate) fn authed(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        self.request(method, path)
            .header("Authorization", format!("Bearer {token}"))
    }
}

/// Fold a non-2xx response into a message like "Login failed: 401" or, when
/// the backend sent a body, "Login failed (401): <body>".
pub(crate) async fn expect_success(resp: Response, action: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = if body.is_empty() {
        format!("{action} failed: {}", status.as_u16())
    } else {
        format!("{action} failed ({}): {}", status.as_u16(), body)
    };

    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}
