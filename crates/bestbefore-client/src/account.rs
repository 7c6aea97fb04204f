use reqwest::Method;
use tracing::info;

use bestbefore_types::api::{UpdateEmailRequest, UpdatePasswordRequest};
use bestbefore_types::validate::{validate_email, validate_password};

use crate::error::{ClientError, Result};
use crate::http::{ApiClient, expect_success};

impl ApiClient {
    /// `PATCH /user/email`.
    pub async fn update_email(&self, token: &str, email: &str) -> Result<()> {
        validate_email(email)?;

        let resp = self
            .authed(Method::PATCH, "user/email", token)
            .json(&UpdateEmailRequest {
                email: email.trim().to_string(),
            })
            .send()
            .await
            .map_err(ClientError::from_reqwest)?;
        expect_success(resp, "Email update").await?;
        info!("Email updated");
        Ok(())
    }

    /// `PATCH /user/password`.
    pub async fn update_password(&self, token: &str, password: &str) -> Result<()> {
        validate_password(password)?;

        let resp = self
            .authed(Method::PATCH, "user/password", token)
            .json(&UpdatePasswordRequest {
                password: password.to_string(),
            })
            .send()
            .await
            .map_err(ClientError::from_reqwest)?;
        expect_success(resp, "Password update").await?;
        info!("Password updated");
        Ok(())
    }
}
