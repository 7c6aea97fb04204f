//! Explicitly passed app context: client, local store, alarm scheduler.
//!
//! Screens receive `&AppContext` per intent instead of reaching into any
//! global session singleton; the session itself is loaded from the store
//! where a call needs it.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result, bail};

use bestbefore_capsule::{LogNotificationSink, TokioUnlockScheduler, UnlockScheduler};
use bestbefore_client::{ApiClient, AppCheckProvider};
use bestbefore_store::Store;
use bestbefore_types::models::Session;

const DEFAULT_API_URL: &str = "http://localhost:3000";
const STORE_FILE: &str = "bestbefore.db";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub data_dir: PathBuf,
    pub app_check_token: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var("BESTBEFORE_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.into()),
            data_dir: std::env::var("BESTBEFORE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            app_check_token: std::env::var("BESTBEFORE_APP_CHECK_TOKEN").ok(),
        }
    }
}

/// Integrity token handed in through the environment; real deployments
/// would put a platform attestation client behind [`AppCheckProvider`].
struct StaticAppCheck(String);

impl AppCheckProvider for StaticAppCheck {
    fn token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

pub struct AppContext {
    pub client: ApiClient,
    pub store: Store,
    pub scheduler: Arc<dyn UnlockScheduler>,
}

impl AppContext {
    pub fn new(config: &Config) -> Result<Self> {
        let mut client = ApiClient::new(&config.api_url)
            .with_context(|| format!("cannot build client for {}", config.api_url))?;
        if let Some(token) = &config.app_check_token {
            client = client.with_app_check(Arc::new(StaticAppCheck(token.clone())));
        }

        std::fs::create_dir_all(&config.data_dir)
            .with_context(|| format!("cannot create data dir {}", config.data_dir.display()))?;
        let store = Store::open(&config.data_dir.join(STORE_FILE))?;

        let scheduler: Arc<dyn UnlockScheduler> =
            Arc::new(TokioUnlockScheduler::new(Arc::new(LogNotificationSink)));

        Ok(Self {
            client,
            store,
            scheduler,
        })
    }

    /// The cached login, or an error telling the user to log in first.
    pub fn require_session(&self) -> Result<Session> {
        match self.store.load_session()? {
            Some(session) => Ok(session),
            None => bail!("Not logged in — run `bestbefore login` first"),
        }
    }
}
