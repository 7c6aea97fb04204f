use tracing::debug;

use bestbefore_client::auth::session_from_auth;
use bestbefore_types::models::Session;

use crate::context::AppContext;

/// Staged login flow: the opening screen, then the email field, then the
/// password field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginStage {
    #[default]
    Initial,
    EmailInput,
    PasswordInput,
}

#[derive(Debug, Default)]
pub struct LoginScreen {
    pub stage: LoginStage,
    pub email: String,
    pub password: String,
    pub error_message: Option<String>,
    pub is_loading: bool,
}

impl LoginScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_email(&mut self, value: &str) {
        self.email = value.to_string();
        self.error_message = None;
    }

    pub fn update_password(&mut self, value: &str) {
        self.password = value.to_string();
        self.error_message = None;
    }

    pub fn begin_email_entry(&mut self) {
        self.stage = LoginStage::EmailInput;
    }

    /// Advance to the password field; refuses with an inline message while
    /// the email field is empty.
    pub fn advance_to_password(&mut self) {
        if self.email.is_empty() {
            self.error_message = Some("Please enter your email or nickname".into());
            return;
        }
        self.stage = LoginStage::PasswordInput;
    }

    /// Submit. Empty fields short-circuit with a validation message and no
    /// network call; success caches the session and returns it.
    pub async fn attempt_login(&mut self, ctx: &AppContext) -> Option<Session> {
        if self.email.is_empty() || self.password.is_empty() {
            self.error_message = Some("Please enter both email/nickname and password".into());
            return None;
        }

        self.is_loading = true;
        self.error_message = None;

        let result = ctx.client.login(&self.email, &self.password).await;
        self.is_loading = false;

        match result {
            Ok(auth) => {
                let session = session_from_auth(&auth);
                if let Err(e) = ctx.store.save_session(&session) {
                    self.error_message = Some(e.to_string());
                    return None;
                }
                debug!(user_id = %session.user_id, "Session cached");
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
        // Nothing listens here; a test that avoids the network must not
        // even produce a transport error.
        AppContext::new(&Config {
            api_url: "http://127.0.0.1:9".into(),
            data_dir: std::env::temp_dir().join(format!("bb_login_{}", Uuid::new_v4())),
            app_check_token: None,
        })
        .unwrap()
    }

    #[test]
    fn advancing_without_email_sets_message() {
        let mut screen = LoginScreen::new();
        screen.begin_email_entry();
        screen.advance_to_password();

        assert_eq!(screen.stage, LoginStage::EmailInput);
        assert_eq!(
            screen.error_message.as_deref(),
            Some("Please enter your email or nickname")
        );
    }

    #[test]
    fn editing_a_field_clears_the_error() {
        let mut screen = LoginScreen::new();
        screen.advance_to_password();
        assert!(screen.error_message.is_some());

        screen.update_email("arya@example.com");
        assert!(screen.error_message.is_none());
    }

    #[tokio::test]
    async fn empty_submit_fails_validation_without_network() {
        let ctx = offline_ctx();
        let mut screen = LoginScreen::new();
        screen.update_email("arya@example.com");

        let session = screen.attempt_login(&ctx).await;

        assert!(session.is_none());
        assert!(!screen.is_loading);
        // A transport error would read "network error: ..."; the validation
        // message proves no request was attempted.
        assert_eq!(
            screen.error_message.as_deref(),
            Some("Please enter both email/nickname and password")
        );
        assert!(!ctx.store.is_logged_in().unwrap());
    }

    #[tokio::test]
    async fn failed_login_surfaces_inline_message() {
        let ctx = offline_ctx();
        let mut screen = LoginScreen::new();
        screen.update_email("arya@example.com");
        screen.update_password("secret1");

        let session = screen.attempt_login(&ctx).await;

        assert!(session.is_none());
        let msg = screen.error_message.unwrap();
        assert!(msg.starts_with("network error"), "got: {msg}");
    }
}
