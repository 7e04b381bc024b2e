//! Transport seam between the form logic and Telegram.
//!
//! `MessageSender` is everything the form needs to send, and `InboundEvent` is
//! the read-only view of an incoming update. `TelegramSender` binds both to teloxide.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{FileId, InputFile, ParseMode};

use crate::dialogue::FormInput;
use crate::errors::TransportError;
use crate::submission::Submitter;

use super::ui_builder::{reply_markup, ReplyKeyboard};

/// Outbound side of the chat transport. Bodies use Telegram's HTML subset.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_text(
        &self,
        chat: ChatId,
        body: &str,
        keyboard: Option<ReplyKeyboard>,
    ) -> Result<(), TransportError>;

    async fn send_photo(
        &self,
        chat: ChatId,
        image_ref: &str,
        caption: &str,
    ) -> Result<(), TransportError>;
}

/// `MessageSender` backed by the Telegram Bot API
#[derive(Clone)]
pub struct TelegramSender {
    bot: Bot,
}

impl TelegramSender {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl MessageSender for TelegramSender {
    async fn send_text(
        &self,
        chat: ChatId,
        body: &str,
        keyboard: Option<ReplyKeyboard>,
    ) -> Result<(), TransportError> {
        let request = self
            .bot
            .send_message(chat, body)
            .parse_mode(ParseMode::Html);

        match keyboard {
            Some(keyboard) => request.reply_markup(reply_markup(keyboard)).await?,
            None => request.await?,
        };
        Ok(())
    }

    async fn send_photo(
        &self,
        chat: ChatId,
        image_ref: &str,
        caption: &str,
    ) -> Result<(), TransportError> {
        self.bot
            .send_photo(chat, InputFile::file_id(FileId(image_ref.to_string())))
            .caption(caption)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }
}

/// Content of an incoming message
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MessageContent {
    Text(String),
    Photo {
        file_id: String,
        caption: Option<String>,
    },
    /// Stickers, documents, voice notes and everything else the form ignores
    Other,
}

impl MessageContent {
    pub fn text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Text a slash command is read from: the body of a text message or a photo caption
    pub fn command_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(text) => Some(text),
            MessageContent::Photo { caption, .. } => caption.as_deref(),
            MessageContent::Other => None,
        }
    }

    /// The content as a form answer, if it can be one
    pub fn as_form_input(&self) -> Option<FormInput<'_>> {
        match self {
            MessageContent::Text(text) => Some(FormInput::Text(text)),
            MessageContent::Photo { file_id, caption } => Some(FormInput::Photo {
                file_id,
                caption: caption.as_deref(),
            }),
            MessageContent::Other => None,
        }
    }

    /// Content type name for log records
    pub fn kind(&self) -> &'static str {
        match self {
            MessageContent::Text(_) => "text",
            MessageContent::Photo { .. } => "photo",
            MessageContent::Other => "other",
        }
    }
}

/// Read-only view of one incoming message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundEvent {
    pub conversation_id: ChatId,
    pub sender: Submitter,
    pub content: MessageContent,
}

impl InboundEvent {
    pub fn from_message(msg: &Message) -> Self {
        let sender = match msg.from.as_ref() {
            Some(user) => Submitter {
                id: user.id.0,
                username: user.username.clone(),
            },
            None => Submitter {
                id: msg.chat.id.0.unsigned_abs(),
                username: None,
            },
        };

        let content = if let Some(largest_photo) = msg.photo().and_then(|photos| photos.last()) {
            MessageContent::Photo {
                file_id: largest_photo.file.id.0.clone(),
                caption: msg.caption().map(str::to_string),
            }
        } else if let Some(text) = msg.text() {
            MessageContent::Text(text.to_string())
        } else {
            MessageContent::Other
        };

        Self {
            conversation_id: msg.chat.id,
            sender,
            content,
        }
    }
}
