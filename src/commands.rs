use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::platform::{ButtonAction, ChatApi, Keyboard, KeyboardButton, TextMessage};

pub const START_COMMAND: &str = "/start";

pub fn onboarding_text(bot_username: &str) -> String {
    format!(
        "This bot allows you search & share songs, albums and artists from Spotify. \
         It works on every dialog, just type @{} in message input",
        bot_username
    )
}

/// Both buttons open the inline search with an empty query.
pub fn start_keyboard() -> Keyboard {
    vec![vec![
        KeyboardButton {
            text: "🔍 Search songs, albums, artists and playlists".to_string(),
            action: ButtonAction::SwitchInlineQueryCurrentChat(String::new()),
        },
        KeyboardButton {
            text: "🔗 Find and share songs, albums, artists and playlists".to_string(),
            action: ButtonAction::SwitchInlineQuery(String::new()),
        },
    ]]
}

/// Replies to the /start command; other text is ignored.
pub struct CommandHandler {
    chat: Arc<dyn ChatApi>,
    onboarding: String,
}

impl CommandHandler {
    pub fn new(chat: Arc<dyn ChatApi>, bot_username: &str) -> Self {
        Self {
            chat,
            onboarding: onboarding_text(bot_username),
        }
    }

    pub async fn handle(&self, message: &TextMessage) -> Result<()> {
        if !message.text.starts_with(START_COMMAND) {
            return Ok(());
        }

        info!("/start from user {}", message.sender_id);

        self.chat
            .send_message(message.sender_id, &self.onboarding, Some(start_keyboard()))
            .await
    }
}
