use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct LineConfig {
    pub channel_secret: String,
    pub channel_access_token: String,
    pub api_base: String,
    pub data_api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub line: LineConfig,
    pub gemini: GeminiConfig,
    pub http_timeout_secs: u64,
    /// Offset used for dates and BP timestamps (Taiwan by default).
    pub tz_offset_hours: i8,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let line = LineConfig {
            channel_secret: std::env::var("LINE_CHANNEL_SECRET")?,
            channel_access_token: std::env::var("LINE_CHANNEL_ACCESS_TOKEN")?,
            api_base: env_or("LINE_API_BASE", "https://api.line.me"),
            data_api_base: env_or("LINE_DATA_API_BASE", "https://api-data.line.me"),
        };
        let gemini = GeminiConfig {
            api_key: std::env::var("GEMINI_API_KEY")?,
            model: env_or("GEMINI_MODEL", "gemini-1.5-flash"),
            api_base: env_or(
                "GEMINI_API_BASE",
                "https://generativelanguage.googleapis.com",
            ),
        };
        Ok(Self {
            line,
            gemini,
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30),
            tz_offset_hours: std::env::var("TZ_OFFSET_HOURS")
                .ok()
                .and_then(|v| v.parse::<i8>().ok())
                .unwrap_or(8),
        })
    }
}
