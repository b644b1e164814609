use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use teloxide::prelude::*;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, InlineQueryId, InlineQueryResult,
    InlineQueryResultArticle, InputMessageContent, InputMessageContentText, ParseMode,
};
use tracing::{debug, info, warn};

use crate::bot::UpdateRouter;
use crate::platform::{
    ButtonAction, ChatApi, IncomingUpdate, InlineQuery, Keyboard, ResultCard, TextMessage,
};

/// Inbound update as delivered by the Bot API. Only the fields the bot reads
/// are modelled; everything else is ignored.
#[derive(Debug, Deserialize)]
pub struct TelegramUpdate {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<WireMessage>,
    #[serde(default)]
    pub inline_query: Option<WireInlineQuery>,
}

#[derive(Debug, Deserialize)]
pub struct WireMessage {
    #[serde(default)]
    pub from: Option<WireUser>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireInlineQuery {
    pub id: String,
    pub from: WireUser,
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct WireUser {
    pub id: i64,
}

impl From<TelegramUpdate> for IncomingUpdate {
    fn from(update: TelegramUpdate) -> Self {
        if let Some(query) = update.inline_query {
            return IncomingUpdate::InlineQuery(InlineQuery {
                id: query.id,
                sender_id: query.from.id,
                query: query.query,
            });
        }

        match update.message {
            Some(WireMessage {
                from: Some(user),
                text: Some(text),
            }) => IncomingUpdate::TextMessage(TextMessage {
                sender_id: user.id,
                text,
            }),
            _ => IncomingUpdate::Other,
        }
    }
}

/// Parse a raw webhook body into an update.
pub fn parse_update(body: &[u8]) -> Result<IncomingUpdate> {
    let update: TelegramUpdate =
        serde_json::from_slice(body).context("Failed to parse Telegram update")?;
    debug!("Received update {}", update.update_id);
    Ok(update.into())
}

/// Re-read a teloxide update through the webhook wire structs so both run
/// modes share one conversion.
fn from_teloxide(update: &Update) -> Result<IncomingUpdate> {
    let value = serde_json::to_value(update).context("Failed to serialize polled update")?;
    let update: TelegramUpdate =
        serde_json::from_value(value).context("Failed to read polled update")?;
    Ok(update.into())
}

/// Build the teloxide client, honouring an optional Bot API server override.
pub fn build_bot(token: &str, api_url: Option<&str>) -> Result<Bot> {
    let bot = Bot::new(token);
    match api_url {
        Some(url) => {
            let url = reqwest::Url::parse(url)
                .with_context(|| format!("Invalid telegram.api_url: {}", url))?;
            Ok(bot.set_api_url(url))
        }
        None => Ok(bot),
    }
}

/// Point the Bot API at our webhook.
pub async fn register_webhook(bot: &Bot, public_url: &str) -> Result<()> {
    let url = reqwest::Url::parse(public_url)
        .with_context(|| format!("Invalid server.public_url: {}", public_url))?;
    bot.set_webhook(url)
        .await
        .context("Failed to register webhook with Telegram")?;
    info!("Webhook registered at {}", public_url);
    Ok(())
}

fn keyboard_markup(keyboard: Keyboard) -> InlineKeyboardMarkup {
    let rows = keyboard.into_iter().map(|row| {
        row.into_iter()
            .map(|button| match button.action {
                ButtonAction::SwitchInlineQueryCurrentChat(query) => {
                    InlineKeyboardButton::switch_inline_query_current_chat(button.text, query)
                }
                ButtonAction::SwitchInlineQuery(query) => {
                    InlineKeyboardButton::switch_inline_query(button.text, query)
                }
            })
            .collect::<Vec<_>>()
    });
    InlineKeyboardMarkup::new(rows)
}

fn article_from_card(card: ResultCard) -> InlineQueryResult {
    let mut content = InputMessageContentText::new(card.body);
    content.parse_mode = Some(ParseMode::Html);

    let mut article =
        InlineQueryResultArticle::new(card.id, card.title, InputMessageContent::Text(content));
    article.description = card.subtitle;
    article.thumbnail_url = card.thumbnail_url.and_then(|url| match reqwest::Url::parse(&url) {
        Ok(url) => Some(url),
        Err(e) => {
            warn!("Dropping invalid thumbnail URL '{}': {}", url, e);
            None
        }
    });

    InlineQueryResult::Article(article)
}

/// `ChatApi` backed by the Telegram Bot API
pub struct TelegramApi {
    bot: Bot,
}

impl TelegramApi {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatApi for TelegramApi {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<Keyboard>,
    ) -> Result<()> {
        let mut request = self.bot.send_message(ChatId(chat_id), text);
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(keyboard_markup(keyboard));
        }
        request
            .await
            .with_context(|| format!("Failed to send message to chat {}", chat_id))?;
        Ok(())
    }

    async fn answer_inline_query(&self, query_id: &str, cards: Vec<ResultCard>) -> Result<()> {
        let results: Vec<InlineQueryResult> = cards.into_iter().map(article_from_card).collect();
        self.bot
            .answer_inline_query(InlineQueryId(query_id.to_string()), results)
            .await
            .with_context(|| format!("Failed to answer inline query {}", query_id))?;
        Ok(())
    }
}

/// Long-poll the Bot API and feed every update through the router.
pub async fn run_polling(bot: Bot, router: Arc<UpdateRouter>) -> Result<()> {
    info!("Starting Telegram long polling...");

    let handler = dptree::endpoint(|update: Update, router: Arc<UpdateRouter>| async move {
        match from_teloxide(&update) {
            Ok(incoming) => router.dispatch(incoming).await,
            Err(e) => warn!("Skipping update {:?}: {:#}", update.id, e),
        }
        respond(())
    });

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![router])
        .error_handler(LoggingErrorHandler::with_custom_text("polling"))
        .build()
        .dispatch()
        .await;

    Ok(())
}
