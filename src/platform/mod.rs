pub mod telegram;

use anyhow::Result;
use async_trait::async_trait;

/// An inbound event, reduced to the kinds the bot reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum IncomingUpdate {
    TextMessage(TextMessage),
    InlineQuery(InlineQuery),
    /// Any other event kind; ignored on purpose.
    Other,
}

impl IncomingUpdate {
    pub fn kind(&self) -> &'static str {
        match self {
            IncomingUpdate::TextMessage(_) => "text_message",
            IncomingUpdate::InlineQuery(_) => "inline_query",
            IncomingUpdate::Other => "other",
        }
    }
}

/// A text message received from a user
#[derive(Debug, Clone, PartialEq)]
pub struct TextMessage {
    pub sender_id: i64,
    pub text: String,
}

/// A free-text search typed in the message input of any chat
#[derive(Debug, Clone, PartialEq)]
pub struct InlineQuery {
    pub id: String,
    pub sender_id: i64,
    pub query: String,
}

/// One selectable search result, rendered by the client as an article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCard {
    pub id: String,
    pub title: String,
    /// HTML-subset markup sent when the card is picked.
    pub body: String,
    pub thumbnail_url: Option<String>,
    pub subtitle: Option<String>,
}

/// What pressing a keyboard button does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    /// Pre-fill the inline trigger in the current chat's input box
    SwitchInlineQueryCurrentChat(String),
    /// Let the user pick a chat, then pre-fill the inline trigger there
    SwitchInlineQuery(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardButton {
    pub text: String,
    pub action: ButtonAction,
}

/// Inline keyboard attached to a message, as rows of buttons.
pub type Keyboard = Vec<Vec<KeyboardButton>>;

/// Outbound calls to the chat platform.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn send_message(&self, chat_id: i64, text: &str, keyboard: Option<Keyboard>)
        -> Result<()>;

    async fn answer_inline_query(&self, query_id: &str, cards: Vec<ResultCard>) -> Result<()>;
}
