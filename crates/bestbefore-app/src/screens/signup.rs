use bestbefore_client::auth::session_from_auth;
use bestbefore_types::models::Session;
use bestbefore_types::validate::{MIN_PASSWORD_LEN, is_valid_email};

use crate::context::AppContext;

#[derive(Debug, Default)]
pub struct SignupScreen {
    pub name: String,
    pub email: String,
    pub password: String,
    pub error_message: Option<String>,
    pub is_loading: bool,
}

impl SignupScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_name(&mut self, value: &str) {
        self.name = value.to_string();
        self.error_message = None;
    }

    pub fn update_email(&mut self, value: &str) {
        self.email = value.to_string();
        self.error_message = None;
    }

    pub fn update_password(&mut self, value: &str) {
        self.password = value.to_string();
        self.error_message = None;
    }

    /// Submit. Email and password are rejected locally before any request;
    /// success caches the session and returns it.
    pub async fn attempt_signup(&mut self, ctx: &AppContext) -> Option<Session> {
        let email = self.email.trim();

        if !is_valid_email(email) {
            self.error_message = Some("Please enter a valid email".into());
            return None;
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            self.error_message = Some(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            ));
            return None;
        }

        self.is_loading = true;
        self.error_message = None;

        let result = ctx
            .client
            .signup(self.name.trim(), email, &self.password)
            .await;
        self.is_loading = false;

        match result {
            Ok(auth) => {
                let session = session_from_auth(&auth);
                if let Err(e) = ctx.store.save_session(&session) {
                    self.error_message = Some(e.to_string());
                    return None;
                }
                Some(session)
            }
            Err(e) => {
                self.error_message = Some(e.to_string());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AppContext, Config};
    use uuid::Uuid;

    fn offline_ctx() -> AppContext {
        AppContext::new(&Config {
            api_url: "http://127.0.0.1:9".into(),
            data_dir: std::env::temp_dir().join(format!("bb_signup_{}", Uuid::new_v4())),
            app_check_token: None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn malformed_email_is_rejected_before_any_request() {
        let ctx = offline_ctx();
        let mut screen = SignupScreen::new();
        screen.update_name("Arya");
        screen.update_email("user.example.com");
        screen.update_password("secret1");

        assert!(screen.attempt_signup(&ctx).await.is_none());
        assert_eq!(
            screen.error_message.as_deref(),
            Some("Please enter a valid email")
        );
    }

    #[tokio::test]
    async fn short_password_is_rejected_before_any_request() {
        let ctx = offline_ctx();
        let mut screen = SignupScreen::new();
        screen.update_name("Arya");
        screen.update_email("arya@example.com");
        screen.update_password("five5");

        assert!(screen.attempt_signup(&ctx).await.is_none());
        assert_eq!(
            screen.error_message.as_deref(),
            Some("Password must be at least 6 characters")
        );
    }
}
