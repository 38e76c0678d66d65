//! Telegram channel publishing.
//!
//! Chunks are sent one at a time, in order, with HTML parse mode. A failed
//! send is returned to the caller immediately; later chunks are not sent.

use crate::error::PublishError;
use teloxide::prelude::*;
use teloxide::types::{ChatId, ParseMode, Recipient};
use tracing::{debug, info, instrument};

/// Destination for composed message chunks.
pub trait Publish {
    async fn send(&self, text: &str) -> Result<(), PublishError>;
}

/// [`Publish`] to a single Telegram chat or channel.
#[derive(Debug, Clone)]
pub struct TelegramPublisher {
    bot: Bot,
    recipient: Recipient,
}

impl TelegramPublisher {
    pub fn new(bot: Bot, recipient: Recipient) -> Self {
        Self { bot, recipient }
    }
}

impl Publish for TelegramPublisher {
    #[instrument(level = "debug", skip_all, fields(chars = text.chars().count()))]
    async fn send(&self, text: &str) -> Result<(), PublishError> {
        self.bot
            .send_message(self.recipient.clone(), text)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }
}

/// Interpret a configured channel identifier.
///
/// Numeric values are chat ids (`-1001234567890`); anything else is a public
/// channel username, with the leading `@` added when missing.
pub fn parse_recipient(channel: &str) -> Recipient {
    let channel = channel.trim();
    match channel.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) if channel.starts_with('@') => Recipient::ChannelUsername(channel.to_string()),
        Err(_) => Recipient::ChannelUsername(format!("@{channel}")),
    }
}

/// Send `chunks` sequentially. Returns the number sent.
#[instrument(level = "info", skip_all, fields(chunks = chunks.len()))]
pub async fn publish_chunks<P: Publish>(
    publisher: &P,
    chunks: &[String],
) -> Result<usize, PublishError> {
    for (i, chunk) in chunks.iter().enumerate() {
        publisher.send(chunk).await?;
        debug!(index = i, "Sent chunk");
    }
    info!(sent = chunks.len(), "Published article chunks");
    Ok(chunks.len())
}
