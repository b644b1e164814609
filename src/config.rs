use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// Most results the Bot API accepts in one inline answer.
pub const MAX_INLINE_RESULTS: u32 = 50;

/// Categories each search returns results for.
pub const SEARCH_CATEGORIES: u32 = 4;

/// Largest per-category limit whose full answer still fits one inline answer.
pub const MAX_SEARCH_LIMIT: u32 = MAX_INLINE_RESULTS / SEARCH_CATEGORIES;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Webhook,
    Polling,
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunMode::Webhook => write!(f, "webhook"),
            RunMode::Polling => write!(f, "polling"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub spotify: SpotifyConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// Username without the leading `@`, quoted in the /start reply.
    #[serde(default = "default_bot_username")]
    pub bot_username: String,
    /// Optional Bot API server override (self-hosted telegram-bot-api).
    #[serde(default)]
    pub api_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_search_limit")]
    pub limit: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: default_search_limit(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default)]
    pub mode: RunMode,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,
    /// Public URL registered with `setWebhook` at startup, when set.
    #[serde(default)]
    pub public_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            mode: RunMode::default(),
            listen_addr: default_listen_addr(),
            webhook_path: default_webhook_path(),
            public_url: None,
        }
    }
}

fn default_bot_username() -> String {
    "sptfyqbot".to_string()
}

fn default_api_base_url() -> String {
    "https://api.spotify.com/v1".to_string()
}

fn default_token_url() -> String {
    "https://accounts.spotify.com/api/token".to_string()
}

fn default_search_limit() -> u32 {
    10
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_webhook_path() -> String {
    "/update".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = Self::parse(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.telegram.bot_token.trim().is_empty() {
            anyhow::bail!("telegram.bot_token must not be empty");
        }
        if self.spotify.client_id.trim().is_empty() || self.spotify.client_secret.trim().is_empty()
        {
            anyhow::bail!("spotify.client_id and spotify.client_secret must both be set");
        }
        if !(1..=MAX_SEARCH_LIMIT).contains(&self.search.limit) {
            anyhow::bail!(
                "search.limit must be between 1 and {} ({} categories x limit must fit {} inline results), got {}",
                MAX_SEARCH_LIMIT,
                SEARCH_CATEGORIES,
                MAX_INLINE_RESULTS,
                self.search.limit
            );
        }
        if !self.server.webhook_path.starts_with('/') {
            anyhow::bail!(
                "server.webhook_path must start with '/', got {:?}",
                self.server.webhook_path
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[telegram]
bot_token = "123:ABC"

[spotify]
client_id = "id"
client_secret = "secret"
"#;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = Config::parse(MINIMAL).unwrap();
        assert_eq!(config.telegram.bot_username, "sptfyqbot");
        assert!(config.telegram.api_url.is_none());
        assert_eq!(config.spotify.api_base_url, "https://api.spotify.com/v1");
        assert_eq!(
            config.spotify.token_url,
            "https://accounts.spotify.com/api/token"
        );
        assert_eq!(config.search.limit, 10);
        assert_eq!(config.server.mode, RunMode::Webhook);
        assert_eq!(config.server.listen_addr.port(), 8080);
        assert_eq!(config.server.webhook_path, "/update");
        assert!(config.server.public_url.is_none());
    }

    #[test]
    fn test_full_config() {
        let content = r#"
[telegram]
bot_token = "123:ABC"
bot_username = "mybot"
api_url = "http://localhost:8081"

[spotify]
client_id = "id"
client_secret = "secret"

[search]
limit = 4

[server]
mode = "polling"
listen_addr = "127.0.0.1:9000"
webhook_path = "/hook"
public_url = "https://bot.example.com/hook"
"#;
        let config = Config::parse(content).unwrap();
        assert_eq!(config.telegram.bot_username, "mybot");
        assert_eq!(
            config.telegram.api_url.as_deref(),
            Some("http://localhost:8081")
        );
        assert_eq!(config.search.limit, 4);
        assert_eq!(config.server.mode, RunMode::Polling);
        assert_eq!(config.server.listen_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.server.webhook_path, "/hook");
    }

    #[test]
    fn test_limit_out_of_range_rejected() {
        let zero = format!("{MINIMAL}\n[search]\nlimit = 0\n");
        assert!(Config::parse(&zero).is_err());

        let too_many = format!("{MINIMAL}\n[search]\nlimit = 13\n");
        assert!(Config::parse(&too_many).is_err());

        let catalog_max = format!("{MINIMAL}\n[search]\nlimit = 50\n");
        assert!(Config::parse(&catalog_max).is_err());

        let max = format!("{MINIMAL}\n[search]\nlimit = 12\n");
        assert_eq!(Config::parse(&max).unwrap().search.limit, 12);
    }

    #[test]
    fn test_largest_limit_fits_one_inline_answer() {
        assert_eq!(MAX_SEARCH_LIMIT, 12);
        assert!(MAX_SEARCH_LIMIT * SEARCH_CATEGORIES <= MAX_INLINE_RESULTS);
        assert!((MAX_SEARCH_LIMIT + 1) * SEARCH_CATEGORIES > MAX_INLINE_RESULTS);
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let content = r#"
[telegram]
bot_token = "123:ABC"

[spotify]
client_id = "id"
client_secret = ""
"#;
        let err = Config::parse(content).unwrap_err();
        assert!(err.to_string().contains("client_secret"));
    }

    #[test]
    fn test_webhook_path_must_be_absolute() {
        let content = format!("{MINIMAL}\n[server]\nwebhook_path = \"update\"\n");
        assert!(Config::parse(&content).is_err());
    }

    #[test]
    fn test_missing_telegram_section_fails() {
        let content = r#"
[spotify]
client_id = "id"
client_secret = "secret"
"#;
        assert!(Config::parse(content).is_err());
    }
}
