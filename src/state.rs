use crate::config::AppConfig;
use crate::gemini::{AiClient, GeminiClient};
use crate::line::{LineClient, Messenger};
use crate::store::Store;
use std::{sync::Arc, time::Duration};
use time::{OffsetDateTime, UtcOffset};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Store,
    pub ai: Arc<dyn AiClient>,
    pub messenger: Arc<dyn Messenger>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let timeout = Duration::from_secs(config.http_timeout_secs);

        let messenger =
            Arc::new(LineClient::new(config.line.clone(), timeout)?) as Arc<dyn Messenger>;
        let ai = Arc::new(GeminiClient::new(config.gemini.clone(), timeout)?) as Arc<dyn AiClient>;

        Ok(Self::from_parts(config, ai, messenger))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        ai: Arc<dyn AiClient>,
        messenger: Arc<dyn Messenger>,
    ) -> Self {
        Self {
            config,
            store: Store::new(),
            ai,
            messenger,
        }
    }

    /// Current time in the configured local offset.
    pub fn local_now(&self) -> OffsetDateTime {
        let offset = UtcOffset::from_hms(self.config.tz_offset_hours, 0, 0).unwrap_or(UtcOffset::UTC);
        OffsetDateTime::now_utc().to_offset(offset)
    }
}
