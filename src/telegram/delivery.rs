//! Sends controller replies through the Bot API

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, MessageId};
use teloxide::{ApiError, RequestError};

use crate::conversation::{Keyboard, Outbound, Target};

/// Converts a transport-neutral keyboard into Telegram inline markup.
pub fn to_markup(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    let rows: Vec<Vec<InlineKeyboardButton>> = keyboard
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|button| InlineKeyboardButton::callback(button.label.clone(), button.action.to_string()))
                .collect()
        })
        .collect();
    InlineKeyboardMarkup::new(rows)
}

/// The two Bot API calls replies are delivered with.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        markup: Option<InlineKeyboardMarkup>,
    ) -> Result<(), RequestError>;

    async fn edit_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        markup: Option<InlineKeyboardMarkup>,
    ) -> Result<(), RequestError>;
}

#[async_trait]
impl MessageSender for Bot {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        markup: Option<InlineKeyboardMarkup>,
    ) -> Result<(), RequestError> {
        let mut request = self.send_message(chat_id, text);
        if let Some(markup) = markup {
            request = request.reply_markup(markup);
        }
        request.await?;
        Ok(())
    }

    async fn edit_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        markup: Option<InlineKeyboardMarkup>,
    ) -> Result<(), RequestError> {
        let mut request = self.edit_message_text(chat_id, message_id, text);
        if let Some(markup) = markup {
            request = request.reply_markup(markup);
        }
        request.await?;
        Ok(())
    }
}

/// Delivers replies in order.
///
/// `origin` is the message whose inline button produced the event, if any.
/// A failed send is logged and the remaining replies still go out.
pub async fn deliver<S: MessageSender + ?Sized>(
    sender: &S,
    chat_id: ChatId,
    origin: Option<MessageId>,
    replies: Vec<Outbound>,
) {
    for reply in replies {
        let destination = match reply.target {
            Target::Chat(id) => ChatId(id),
            Target::Sender | Target::Origin => chat_id,
        };
        if let Err(e) = send(sender, chat_id, origin, &reply).await {
            log::error!("Failed to deliver message to chat {}: {}", destination, e);
        }
    }
}

async fn send<S: MessageSender + ?Sized>(
    sender: &S,
    chat_id: ChatId,
    origin: Option<MessageId>,
    reply: &Outbound,
) -> Result<(), RequestError> {
    let markup = reply.keyboard.as_ref().map(to_markup);

    match (reply.target, origin) {
        (Target::Origin, Some(message_id)) => {
            match sender.edit_text(chat_id, message_id, &reply.text, markup.clone()).await {
                Ok(()) | Err(RequestError::Api(ApiError::MessageNotModified)) => Ok(()),
                Err(e) => {
                    log::warn!("Editing message {} failed ({}), sending a new one", message_id.0, e);
                    sender.send_text(chat_id, &reply.text, markup).await
                }
            }
        }
        (Target::Origin, None) | (Target::Sender, _) => sender.send_text(chat_id, &reply.text, markup).await,
        (Target::Chat(id), _) => sender.send_text(ChatId(id), &reply.text, markup).await,
    }
}
