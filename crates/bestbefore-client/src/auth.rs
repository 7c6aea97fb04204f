use reqwest::Method;
use tracing::info;

use bestbefore_types::api::{AuthResponse, LoginRequest, SignupRequest};
use bestbefore_types::models::Session;
use bestbefore_types::validate::{validate_email, validate_login_input, validate_password};

use crate::error::{ClientError, Result};
use crate::http::{ApiClient, expect_success};

impl ApiClient {
    /// `POST /signup`. Name, email and password are validated locally first.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<AuthResponse> {
        validate_email(email)?;
        validate_password(password)?;

        let body = SignupRequest {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };

        let resp = self
            .request(Method::POST, "signup")
            .json(&body)
            .send()
            .await
            .map_err(ClientError::from_reqwest)?;
        let resp = expect_success(resp, "Signup").await?;

        let auth: AuthResponse = resp.json().await.map_err(ClientError::from_reqwest)?;
        info!(user_id = %auth.user.id, "Signed up");
        Ok(auth)
    }

    /// `POST /login`. Empty email or password short-circuits with a
    /// validation message; no request goes out.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        validate_login_input(email, password)?;

        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let resp = self
            .request(Method::POST, "login")
            .json(&body)
            .send()
            .await
            .map_err(ClientError::from_reqwest)?;
        let resp = expect_success(resp, "Login").await?;

        let auth: AuthResponse = resp.json().await.map_err(ClientError::from_reqwest)?;
        info!(user_id = %auth.user.id, "Logged in");
        Ok(auth)
    }
}

/// Build the locally cached session from a successful auth response.
pub fn session_from_auth(auth: &AuthResponse) -> Session {
    Session {
        token: auth.token.clone(),
        user_id: auth.user.id.clone(),
        user_name: auth.user.name.clone().unwrap_or_else(|| "User".into()),
        user_email: auth.user.email.clone(),
    }
}
