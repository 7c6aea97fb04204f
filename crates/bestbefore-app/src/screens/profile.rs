use bestbefore_types::models::Session;

use crate::context::AppContext;

/// Profile and settings: account fields plus the persisted UI preferences.
#[derive(Debug, Default)]
pub struct ProfileScreen {
    pub user_name: String,
    pub user_email: String,
    pub theme: String,
    pub accent_color: u32,
    pub error_message: Option<String>,
    pub is_loading: bool,
}

impl ProfileScreen {
    pub fn open(ctx: &AppContext, session: &Session) -> Self {
        Self {
            user_name: session.user_name.clone(),
            user_email: session.user_email.clone(),
            theme: ctx.store.theme().unwrap_or_else(|_| "Default".into()),
            accent_color: ctx
                .store
                .accent_color()
                .unwrap_or(bestbefore_store::prefs::DEFAULT_ACCENT_COLOR),
            error_message: None,
            is_loading: false,
        }
    }

    pub fn set_theme(&mut self, ctx: &AppContext, theme: &str) {
        match ctx.store.save_theme(theme) {
            Ok(()) => self.theme = theme.to_string(),
            Err(e) => self.error_message = Some(e.to_string()),
        }
    }

    pub fn set_accent_color(&mut self, ctx: &AppContext, argb: u32) {
        match ctx.store.save_accent_color(argb) {
            Ok(()) => self.accent_color = argb,
            Err(e) => self.error_message = Some(e.to_string()),
        }
    }

    /// Validate, PATCH, and refresh the cached session email.
    pub async fn change_email(&mut self, ctx: &AppContext, session: &Session, email: &str) {
        self.is_loading = true;
        self.error_message = None;

        let result = ctx.client.update_email(&session.token, email).await;
        self.is_loading = false;

        match result {
            Ok(()) => {
                self.user_email = email.trim().to_string();
                let mut updated = session.clone();
                updated.user_email = self.user_email.clone();
                if let Err(e) = ctx.store.save_session(&updated) {
                    self.error_message = Some(e.to_string());
                }
            }
            Err(e) => self.error_message = Some(e.to_string()),
        }
    }

    pub async fn change_password(&mut self, ctx: &AppContext, session: &Session, password: &str) {
        self.is_loading = true;
        self.error_message = None;

        let result = ctx.client.update_password(&session.token, password).await;
        self.is_loading = false;

        if let Err(e) = result {
            self.error_message = Some(e.to_string());
        }
    }

    /// Clear the cached session wholesale. Preferences survive.
    pub fn logout(&mut self, ctx: &AppContext) {
        if let Err(e) = ctx.store.clear_session() {
            self.error_message = Some(e.to_string());
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
            data_dir: std::env::temp_dir().join(format!("bb_profile_{}", Uuid::new_v4())),
            app_check_token: None,
        })
        .unwrap()
    }

    fn session() -> Session {
        Session {
            token: "tok".into(),
            user_id: "u1".into(),
            user_name: "Arya".into(),
            user_email: "arya@example.com".into(),
        }
    }

    #[tokio::test]
    async fn invalid_email_change_is_rejected_locally() {
        let ctx = offline_ctx();
        let session = session();
        let mut screen = ProfileScreen::open(&ctx, &session);

        screen.change_email(&ctx, &session, "not-an-email").await;

        assert_eq!(
            screen.error_message.as_deref(),
            Some("Please enter a valid email")
        );
        assert_eq!(screen.user_email, "arya@example.com");
    }

    #[tokio::test]
    async fn short_password_change_is_rejected_locally() {
        let ctx = offline_ctx();
        let session = session();
        let mut screen = ProfileScreen::open(&ctx, &session);

        screen.change_password(&ctx, &session, "five5").await;

        assert_eq!(
            screen.error_message.as_deref(),
            Some("Password must be at least 6 characters")
        );
    }

    #[test]
    fn theme_and_accent_persist_through_logout() {
        let ctx = offline_ctx();
        let session = session();
        ctx.store.save_session(&session).unwrap();

        let mut screen = ProfileScreen::open(&ctx, &session);
        screen.set_theme(&ctx, "Midnight");
        screen.set_accent_color(&ctx, 0xFFFF_4081);
        screen.logout(&ctx);

        assert!(!ctx.store.is_logged_in().unwrap());
        assert_eq!(ctx.store.theme().unwrap(), "Midnight");
        assert_eq!(ctx.store.accent_color().unwrap(), 0xFFFF_4081);
        assert!(screen.error_message.is_none());
    }
}
