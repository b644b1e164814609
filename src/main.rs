mod bot;
mod cards;
mod commands;
mod config;
mod platform;
mod search;
mod server;
mod spotify;
#[cfg(test)]
mod testing;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::bot::{TracingReporter, UpdateRouter};
use crate::commands::CommandHandler;
use crate::config::{Config, RunMode};
use crate::platform::telegram::{self, TelegramApi};
use crate::search::SearchPipeline;
use crate::spotify::auth::ClientCredentialsAuth;
use crate::spotify::SpotifyClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,spotify_inline_bot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded successfully");
    info!("  Bot: @{}", config.telegram.bot_username);
    info!("  Search limit: {}", config.search.limit);
    info!("  Mode: {}", config.server.mode);

    let http = reqwest::Client::new();
    let auth = Arc::new(ClientCredentialsAuth::new(http.clone(), &config.spotify));
    let catalog = Arc::new(SpotifyClient::new(http, &config.spotify));

    let bot = telegram::build_bot(
        &config.telegram.bot_token,
        config.telegram.api_url.as_deref(),
    )?;
    let chat = Arc::new(TelegramApi::new(bot.clone()));

    let router = Arc::new(UpdateRouter::new(
        CommandHandler::new(chat.clone(), &config.telegram.bot_username),
        SearchPipeline::new(chat, catalog, auth, config.search.limit),
        Arc::new(TracingReporter),
    ));

    info!("Bot is starting...");
    match config.server.mode {
        RunMode::Webhook => {
            if let Some(public_url) = config.server.public_url.as_deref() {
                telegram::register_webhook(&bot, public_url).await?;
            }
            server::run(
                config.server.listen_addr,
                &config.server.webhook_path,
                router,
            )
            .await?;
        }
        RunMode::Polling => telegram::run_polling(bot, router).await?,
    }

    Ok(())
}
